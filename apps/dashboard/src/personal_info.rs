//! Personal info form: names, desired title and area of work. Submits as a
//! single `PUT /users/:id` carrying only the changed fields.

use profile_board_common::validation::{validate_name, validate_text, TITLE_MAX_LEN};
use profile_board_common::{Profile, ProfileChanges};
use serde_json::Value;

use crate::form::{EditForm, FieldId, FormErrors};
use crate::plan::{Intent, SubmitPlan};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
struct Fields {
    first_name: String,
    last_name: String,
    desired_title: String,
    area_of_work: String,
}

#[derive(Debug, Clone)]
pub struct PersonalInfoForm {
    original: Fields,
    current: Fields,
}

impl PersonalInfoForm {
    pub fn set_first_name(&mut self, value: impl Into<String>) {
        self.current.first_name = value.into();
    }

    pub fn set_last_name(&mut self, value: impl Into<String>) {
        self.current.last_name = value.into();
    }

    pub fn set_desired_title(&mut self, value: impl Into<String>) {
        self.current.desired_title = value.into();
    }

    pub fn set_area_of_work(&mut self, value: impl Into<String>) {
        self.current.area_of_work = value.into();
    }

    pub fn changes(&self) -> ProfileChanges {
        let differs = |old: &str, new: &str| {
            let new = new.trim();
            (old != new).then(|| new.to_string())
        };
        ProfileChanges {
            first_name: differs(&self.original.first_name, &self.current.first_name),
            last_name: differs(&self.original.last_name, &self.current.last_name),
            desired_title: differs(&self.original.desired_title, &self.current.desired_title),
            area_of_work: differs(&self.original.area_of_work, &self.current.area_of_work),
            summary: None,
        }
    }

    fn validate(&self, changes: &ProfileChanges) -> FormErrors {
        let mut errors = FormErrors::default();
        if let Some(name) = &changes.first_name {
            if let Err(e) = validate_name(name) {
                errors.push(FieldId::FirstName, e);
            }
        }
        if let Some(name) = &changes.last_name {
            if let Err(e) = validate_name(name) {
                errors.push(FieldId::LastName, e);
            }
        }
        if let Some(title) = &changes.desired_title {
            if let Err(e) = validate_text(title, TITLE_MAX_LEN) {
                errors.push(FieldId::DesiredTitle, e);
            }
        }
        if let Some(area) = &changes.area_of_work {
            if let Err(e) = validate_text(area, TITLE_MAX_LEN) {
                errors.push(FieldId::AreaOfWork, e);
            }
        }
        errors
    }
}

impl EditForm for PersonalInfoForm {
    fn begin(profile: &Profile) -> Self {
        let fields = Fields {
            first_name: profile.first_name.clone().unwrap_or_default(),
            last_name: profile.last_name.clone().unwrap_or_default(),
            desired_title: profile.desired_title.clone().unwrap_or_default(),
            area_of_work: profile.area_of_work.clone().unwrap_or_default(),
        };
        Self {
            original: fields.clone(),
            current: fields,
        }
    }

    fn first_field(&self) -> FieldId {
        FieldId::FirstName
    }

    fn build_submit_plan(&self, user_id: i64) -> Result<SubmitPlan, FormErrors> {
        let changes = self.changes();
        self.validate(&changes).into_result()?;

        let mut plan = SubmitPlan::new(user_id);
        if !changes.is_empty() {
            plan.push(Intent::UpdateProfile(changes));
        }
        Ok(plan)
    }

    fn absorb(&mut self, intent: &Intent, _response: &Value) {
        let Intent::UpdateProfile(changes) = intent else {
            return;
        };
        let fields = [
            (&mut self.original.first_name, &changes.first_name),
            (&mut self.original.last_name, &changes.last_name),
            (&mut self.original.desired_title, &changes.desired_title),
            (&mut self.original.area_of_work, &changes.area_of_work),
        ];
        for (field, change) in fields {
            if let Some(value) = change {
                field.clone_from(value);
            }
        }
    }
}
