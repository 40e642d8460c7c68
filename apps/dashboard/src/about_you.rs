//! "About you" form: summary, interested locations, top and additional skills.

use profile_board_common::validation::{validate_skill_name, validate_summary};
use profile_board_common::{
    NewLocation, Profile, ProfileChanges, SkillKind, SkillRef, ValidationError,
};
use serde_json::Value;
use tracing::debug;

use crate::delta::{compute_delta, Choice, Delta};
use crate::form::{EditForm, FieldId, FormErrors, InputStatus};
use crate::ids::{EntityId, ProvisionalIds};
use crate::plan::{Intent, SubmitPlan};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollectionField {
    Locations,
    TopSkills,
    AdditionalSkills,
}

impl CollectionField {
    fn for_skill_kind(kind: SkillKind) -> Self {
        match kind {
            SkillKind::Top => CollectionField::TopSkills,
            SkillKind::Additional => CollectionField::AdditionalSkills,
        }
    }

    pub fn field_id(self) -> FieldId {
        match self {
            CollectionField::Locations => FieldId::Locations,
            CollectionField::TopSkills => FieldId::TopSkills,
            CollectionField::AdditionalSkills => FieldId::AdditionalSkills,
        }
    }
}

#[derive(Debug, Clone, Default)]
struct Collection {
    original: Vec<Choice>,
    current: Vec<Choice>,
    changed: bool,
}

impl Collection {
    fn new(items: Vec<Choice>) -> Self {
        Self {
            original: items.clone(),
            current: items,
            changed: false,
        }
    }

    fn set(&mut self, items: Vec<Choice>) {
        self.current = items;
        self.changed = true;
    }

    /// Records `name` as saved, taking the item from the working copy.
    fn confirm(&mut self, name: &str) {
        if self.original.iter().any(|c| c.name == name) {
            return;
        }
        if let Some(choice) = self.current.iter().find(|c| c.name == name) {
            self.original.push(choice.clone());
        }
    }

    fn forget(&mut self, id: i64) {
        self.original.retain(|c| c.id != EntityId::Persisted(id));
    }
}

#[derive(Debug, Clone)]
pub struct AboutYouForm {
    original_summary: Option<String>,
    summary: String,
    summary_status: InputStatus,
    locations: Collection,
    top_skills: Collection,
    additional_skills: Collection,
    ids: ProvisionalIds,
}

impl AboutYouForm {
    pub fn summary(&self) -> &str {
        &self.summary
    }

    pub fn summary_status(&self) -> &InputStatus {
        &self.summary_status
    }

    pub fn set_summary(&mut self, summary: impl Into<String>) {
        self.summary = summary.into();
        self.summary_status = InputStatus::Untouched;
    }

    /// The summary to send, or `None` when it has not really changed: a
    /// blank input over a missing summary, or the original text.
    pub fn summary_change(&self) -> Option<String> {
        let original = self.original_summary.as_deref().unwrap_or("");
        if self.summary.trim().is_empty() {
            return (!original.trim().is_empty()).then(String::new);
        }
        (self.summary != original).then(|| self.summary.clone())
    }

    /// Validates a changed summary when the input loses focus.
    pub fn blur_summary(&mut self) -> &InputStatus {
        self.summary_status = match self.summary_change() {
            None => InputStatus::Untouched,
            Some(summary) => match validate_summary(&summary) {
                Ok(()) => InputStatus::Valid,
                Err(e) => InputStatus::Invalid(e),
            },
        };
        &self.summary_status
    }

    pub fn locations(&self) -> &[Choice] {
        &self.locations.current
    }

    pub fn top_skills(&self) -> &[Choice] {
        &self.top_skills.current
    }

    pub fn additional_skills(&self) -> &[Choice] {
        &self.additional_skills.current
    }

    pub fn set_locations(&mut self, locations: Vec<Choice>) {
        self.locations.set(locations);
    }

    pub fn set_top_skills(&mut self, skills: Vec<Choice>) {
        self.top_skills.set(skills);
    }

    pub fn set_additional_skills(&mut self, skills: Vec<Choice>) {
        self.additional_skills.set(skills);
    }

    pub fn is_changed(&self, field: CollectionField) -> bool {
        self.collection(field).changed
    }

    /// Hands out the next provisional id of this session.
    pub fn next_provisional_id(&mut self) -> EntityId {
        self.ids.next_id()
    }

    /// Names chosen in either skill set.
    pub fn chosen_skill_names(&self) -> Vec<String> {
        self.top_skills
            .current
            .iter()
            .chain(&self.additional_skills.current)
            .map(|c| c.name.clone())
            .collect()
    }

    pub fn chosen_location_names(&self) -> Vec<String> {
        self.locations.current.iter().map(|c| c.name.clone()).collect()
    }

    pub fn compute_delta(&self, field: CollectionField) -> Delta<Choice> {
        let collection = self.collection(field);
        compute_delta(&collection.original, &collection.current)
    }

    fn collection(&self, field: CollectionField) -> &Collection {
        match field {
            CollectionField::Locations => &self.locations,
            CollectionField::TopSkills => &self.top_skills,
            CollectionField::AdditionalSkills => &self.additional_skills,
        }
    }

    fn collection_mut(&mut self, field: CollectionField) -> &mut Collection {
        match field {
            CollectionField::Locations => &mut self.locations,
            CollectionField::TopSkills => &mut self.top_skills,
            CollectionField::AdditionalSkills => &mut self.additional_skills,
        }
    }

    fn validate(&self) -> FormErrors {
        let mut errors = FormErrors::default();
        if let Some(summary) = self.summary_change() {
            if let Err(e) = validate_summary(&summary) {
                errors.push(FieldId::Summary, e);
            }
        }
        // Locations can only be picked from the catalog.
        if let Some(choice) = self.compute_delta(CollectionField::Locations).to_review.first() {
            errors.push(
                FieldId::Locations,
                ValidationError::UnknownLocation(choice.name.clone()),
            );
        }
        for field in [CollectionField::TopSkills, CollectionField::AdditionalSkills] {
            for choice in self.compute_delta(field).to_review {
                if let Err(e) = validate_skill_name(&choice.name) {
                    errors.push(field.field_id(), e);
                    break;
                }
            }
        }
        errors
    }
}

impl EditForm for AboutYouForm {
    fn begin(profile: &Profile) -> Self {
        Self {
            original_summary: profile.summary.clone(),
            summary: profile.summary.clone().unwrap_or_default(),
            summary_status: InputStatus::Untouched,
            locations: Collection::new(profile.locations.iter().map(Choice::from).collect()),
            top_skills: Collection::new(profile.top_skills.iter().map(Choice::from).collect()),
            additional_skills: Collection::new(
                profile.additional_skills.iter().map(Choice::from).collect(),
            ),
            ids: ProvisionalIds::default(),
        }
    }

    fn first_field(&self) -> FieldId {
        FieldId::Summary
    }

    fn build_submit_plan(&self, user_id: i64) -> Result<SubmitPlan, FormErrors> {
        self.validate().into_result()?;

        let mut plan = SubmitPlan::new(user_id);
        if let Some(summary) = self.summary_change() {
            plan.push(Intent::UpdateProfile(ProfileChanges {
                summary: Some(summary),
                ..Default::default()
            }));
        }

        let locations = self.compute_delta(CollectionField::Locations);
        if !locations.to_add.is_empty() {
            plan.push(Intent::AddLocations(
                locations
                    .to_add
                    .iter()
                    .map(|c| NewLocation {
                        name: c.name.clone(),
                    })
                    .collect(),
            ));
        }
        for location_id in locations.to_remove.iter().filter_map(|c| c.id.persisted()) {
            plan.push(Intent::RemoveLocation { location_id });
        }

        for (field, kind) in [
            (CollectionField::TopSkills, SkillKind::Top),
            (CollectionField::AdditionalSkills, SkillKind::Additional),
        ] {
            push_skill_intents(&mut plan, kind, self.compute_delta(field));
        }

        debug!("About-you plan for user {}: {} intents", user_id, plan.len());
        Ok(plan)
    }

    fn absorb(&mut self, intent: &Intent, _response: &Value) {
        match intent {
            Intent::UpdateProfile(changes) => {
                if let Some(summary) = &changes.summary {
                    self.original_summary = Some(summary.clone());
                }
            }
            Intent::AddLocations(locations) => {
                for location in locations {
                    self.locations.confirm(&location.name);
                }
            }
            Intent::RemoveLocation { location_id } => self.locations.forget(*location_id),
            Intent::AddSkills { kind, skills } => {
                let collection = self.collection_mut(CollectionField::for_skill_kind(*kind));
                for skill in skills {
                    collection.confirm(&skill.name);
                }
            }
            Intent::RemoveSkill { kind, skill_id } => self
                .collection_mut(CollectionField::for_skill_kind(*kind))
                .forget(*skill_id),
            Intent::ReviewSkill { kind, name } => self
                .collection_mut(CollectionField::for_skill_kind(*kind))
                .confirm(name),
            _ => {}
        }
    }
}

fn push_skill_intents(plan: &mut SubmitPlan, kind: SkillKind, delta: Delta<Choice>) {
    let skills: Vec<SkillRef> = delta
        .to_add
        .iter()
        .filter_map(|c| {
            c.id.persisted().map(|id| SkillRef {
                id,
                name: c.name.clone(),
            })
        })
        .collect();
    if !skills.is_empty() {
        plan.push(Intent::AddSkills { kind, skills });
    }
    for skill_id in delta.to_remove.iter().filter_map(|c| c.id.persisted()) {
        plan.push(Intent::RemoveSkill { kind, skill_id });
    }
    for choice in delta.to_review {
        plan.push(Intent::ReviewSkill {
            kind,
            name: choice.name,
        });
    }
}
