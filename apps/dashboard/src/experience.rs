//! Work experience form. Entries are keyed by id; new entries carry a
//! provisional id until the gateway creates them.

use chrono::Datelike;
use profile_board_common::validation::{
    validate_text, COMPANY_MAX_LEN, DESCRIPTION_MAX_LEN, TITLE_MAX_LEN,
};
use profile_board_common::{
    DateFields, ExperienceChanges, ExperienceRecord, Profile, ValidationError,
};
use serde_json::Value;
use tracing::{debug, warn};

use crate::form::{EditForm, FieldId, FormErrors};
use crate::ids::{EntityId, ProvisionalIds};
use crate::plan::{Intent, SubmitPlan};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExperienceEntry {
    pub id: EntityId,
    pub company_name: String,
    pub job_title: String,
    pub job_description: String,
    pub dates: DateFields,
    /// Set when the stored `job_dates` could not be decoded. Cleared once the
    /// user enters new dates.
    pub load_error: Option<ValidationError>,
}

impl ExperienceEntry {
    fn blank(id: EntityId) -> Self {
        Self {
            id,
            company_name: String::new(),
            job_title: String::new(),
            job_description: String::new(),
            dates: DateFields::default(),
            load_error: None,
        }
    }

    fn from_record(record: &ExperienceRecord) -> Self {
        let (dates, load_error) = match DateFields::decode(&record.job_dates) {
            Ok(dates) => (dates, None),
            Err(e) => {
                warn!("Experience {} has unreadable dates: {}", record.id, e);
                (
                    DateFields::default(),
                    Some(ValidationError::MalformedDates(e.to_string())),
                )
            }
        };
        Self {
            id: EntityId::Persisted(record.id),
            company_name: record.company_name.clone(),
            job_title: record.job_title.clone(),
            job_description: record.job_description.clone(),
            dates,
            load_error,
        }
    }

    fn validate(&self, current_year: i32, errors: &mut FormErrors, check_dates: bool) {
        let id = self.id;
        if let Err(e) = validate_text(&self.company_name, COMPANY_MAX_LEN) {
            errors.push(FieldId::Company(id), e);
        }
        if let Err(e) = validate_text(&self.job_title, TITLE_MAX_LEN) {
            errors.push(FieldId::Title(id), e);
        }
        if let Err(e) = validate_text(&self.job_description, DESCRIPTION_MAX_LEN) {
            errors.push(FieldId::Description(id), e);
        }
        if let Some(e) = &self.load_error {
            errors.push(FieldId::FromMonth(id), e.clone());
        } else if check_dates {
            if let Err(date_errors) = self.dates.validate(current_year) {
                for (part, e) in date_errors {
                    errors.push(FieldId::for_date_part(part, id), e);
                }
            }
        }
    }
}

/// What the experience form would change on the server.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ExperienceDelta {
    pub to_create: Vec<ExperienceEntry>,
    pub to_update: Vec<(i64, ExperienceChanges)>,
    pub to_remove: Vec<i64>,
}

impl ExperienceDelta {
    pub fn is_empty(&self) -> bool {
        self.to_create.is_empty() && self.to_update.is_empty() && self.to_remove.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct ExperienceForm {
    original: Vec<ExperienceRecord>,
    entries: Vec<ExperienceEntry>,
    ids: ProvisionalIds,
    current_year: i32,
}

impl ExperienceForm {
    /// Overrides the year used to reject future dates.
    pub fn with_current_year(mut self, year: i32) -> Self {
        self.current_year = year;
        self
    }

    pub fn entries(&self) -> &[ExperienceEntry] {
        &self.entries
    }

    pub fn entry(&self, id: EntityId) -> Option<&ExperienceEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// Appends a blank entry and returns its provisional id.
    pub fn add_entry(&mut self) -> EntityId {
        let id = self.ids.next_id();
        self.entries.push(ExperienceEntry::blank(id));
        id
    }

    pub fn remove_entry(&mut self, id: EntityId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.id != id);
        self.entries.len() != before
    }

    pub fn set_company(&mut self, id: EntityId, value: impl Into<String>) -> bool {
        self.update(id, |e| e.company_name = value.into())
    }

    pub fn set_title(&mut self, id: EntityId, value: impl Into<String>) -> bool {
        self.update(id, |e| e.job_title = value.into())
    }

    pub fn set_description(&mut self, id: EntityId, value: impl Into<String>) -> bool {
        self.update(id, |e| e.job_description = value.into())
    }

    pub fn set_dates(&mut self, id: EntityId, dates: DateFields) -> bool {
        self.update(id, |e| {
            e.dates = dates;
            e.load_error = None;
        })
    }

    fn update(&mut self, id: EntityId, apply: impl FnOnce(&mut ExperienceEntry)) -> bool {
        match self.entries.iter_mut().find(|e| e.id == id) {
            Some(entry) => {
                apply(entry);
                true
            }
            None => false,
        }
    }

    pub fn compute_delta(&self) -> ExperienceDelta {
        let mut delta = ExperienceDelta::default();
        for entry in &self.entries {
            match entry.id {
                EntityId::Provisional(_) => delta.to_create.push(entry.clone()),
                EntityId::Persisted(id) => {
                    let Some(record) = self.original.iter().find(|r| r.id == id) else {
                        continue;
                    };
                    let changes = changes_from(record, entry);
                    if !changes.is_empty() {
                        delta.to_update.push((id, changes));
                    }
                }
            }
        }
        delta.to_remove = self
            .original
            .iter()
            .filter(|r| self.entry(EntityId::Persisted(r.id)).is_none())
            .map(|r| r.id)
            .collect();
        delta
    }

    fn validate(&self, delta: &ExperienceDelta) -> FormErrors {
        let mut errors = FormErrors::default();
        for entry in &self.entries {
            let check_dates = match entry.id {
                EntityId::Provisional(_) => true,
                EntityId::Persisted(id) => delta
                    .to_update
                    .iter()
                    .any(|(updated, changes)| *updated == id && changes.job_dates.is_some()),
            };
            let touched = check_dates
                || entry.load_error.is_some()
                || delta.to_update.iter().any(|(id, _)| EntityId::Persisted(*id) == entry.id);
            if touched {
                entry.validate(self.current_year, &mut errors, check_dates);
            }
        }
        errors
    }
}

fn changes_from(record: &ExperienceRecord, entry: &ExperienceEntry) -> ExperienceChanges {
    let differs = |old: &str, new: &str| (old != new).then(|| new.to_string());
    let job_dates = if entry.load_error.is_some() {
        None
    } else {
        differs(&record.job_dates, &entry.dates.encode())
    };
    ExperienceChanges {
        company_name: differs(&record.company_name, &entry.company_name),
        job_title: differs(&record.job_title, &entry.job_title),
        job_description: differs(&record.job_description, &entry.job_description),
        job_dates,
    }
}

impl EditForm for ExperienceForm {
    fn begin(profile: &Profile) -> Self {
        Self {
            original: profile.experience.clone(),
            entries: profile
                .experience
                .iter()
                .map(ExperienceEntry::from_record)
                .collect(),
            ids: ProvisionalIds::default(),
            current_year: chrono::Utc::now().year(),
        }
    }

    fn first_field(&self) -> FieldId {
        match self.entries.first() {
            Some(entry) => FieldId::Company(entry.id),
            None => FieldId::AddExperience,
        }
    }

    fn build_submit_plan(&self, user_id: i64) -> Result<SubmitPlan, FormErrors> {
        let delta = self.compute_delta();
        self.validate(&delta).into_result()?;

        let mut plan = SubmitPlan::new(user_id);
        for entry in delta.to_create {
            plan.push(Intent::CreateExperience {
                entry: entry.id,
                company_name: entry.company_name.trim().to_string(),
                job_title: entry.job_title.trim().to_string(),
                job_description: entry.job_description.trim().to_string(),
                job_dates: entry.dates.encode(),
            });
        }
        for id in delta.to_remove {
            plan.push(Intent::DeleteExperience { id });
        }
        for (id, changes) in delta.to_update {
            plan.push(Intent::UpdateExperience { id, changes });
        }

        debug!("Experience plan for user {}: {} intents", user_id, plan.len());
        Ok(plan)
    }

    fn absorb(&mut self, intent: &Intent, response: &Value) {
        match intent {
            Intent::CreateExperience { entry, .. } => {
                match serde_json::from_value::<ExperienceRecord>(response.clone()) {
                    Ok(record) => {
                        let id = EntityId::Persisted(record.id);
                        self.update(*entry, |e| e.id = id);
                        self.original.push(record);
                    }
                    Err(e) => {
                        // Created, but under an id we cannot tell. Drop the
                        // entry rather than create it twice.
                        warn!("Unreadable created experience for {}: {}", entry, e);
                        self.remove_entry(*entry);
                    }
                }
            }
            Intent::DeleteExperience { id } => self.original.retain(|r| r.id != *id),
            Intent::UpdateExperience { id, changes } => {
                if let Some(record) = self.original.iter_mut().find(|r| r.id == *id) {
                    apply_changes(record, changes);
                }
            }
            _ => {}
        }
    }
}

fn apply_changes(record: &mut ExperienceRecord, changes: &ExperienceChanges) {
    let fields = [
        (&mut record.company_name, &changes.company_name),
        (&mut record.job_title, &changes.job_title),
        (&mut record.job_description, &changes.job_description),
        (&mut record.job_dates, &changes.job_dates),
    ];
    for (field, change) in fields {
        if let Some(value) = change {
            field.clone_from(value);
        }
    }
}
