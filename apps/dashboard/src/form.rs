//! Shared vocabulary of the edit forms.

use std::fmt;

use profile_board_common::date_range::DatePart;
use profile_board_common::{Profile, ValidationError};
use serde_json::Value;

use crate::ids::EntityId;
use crate::plan::{Intent, SubmitPlan};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormStatus {
    Idle,
    Active,
    Loading,
    Success,
    Error,
}

/// Per-input validation state shown next to a field.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum InputStatus {
    #[default]
    Untouched,
    Valid,
    Invalid(ValidationError),
}

/// Every input an edit form can put focus on or attach an error to.
/// Experience inputs carry the id of their entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldId {
    Summary,
    Locations,
    TopSkills,
    AdditionalSkills,
    FirstName,
    LastName,
    DesiredTitle,
    AreaOfWork,
    /// The "add experience" button, for a form with no entries yet.
    AddExperience,
    Company(EntityId),
    Title(EntityId),
    Description(EntityId),
    FromMonth(EntityId),
    FromYear(EntityId),
    ToMonth(EntityId),
    ToYear(EntityId),
}

impl FieldId {
    pub fn for_date_part(part: DatePart, entry: EntityId) -> Self {
        match part {
            DatePart::FromMonth => FieldId::FromMonth(entry),
            DatePart::FromYear => FieldId::FromYear(entry),
            DatePart::ToMonth => FieldId::ToMonth(entry),
            DatePart::ToYear => FieldId::ToYear(entry),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: FieldId,
    pub error: ValidationError,
}

/// Validation failures of a whole form, in display order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FormErrors(pub Vec<FieldError>);

impl FormErrors {
    pub fn push(&mut self, field: FieldId, error: ValidationError) {
        self.0.push(FieldError { field, error });
    }

    pub fn first_field(&self) -> Option<FieldId> {
        self.0.first().map(|e| e.field)
    }

    pub fn for_field(&self, field: FieldId) -> Option<&ValidationError> {
        self.0.iter().find(|e| e.field == field).map(|e| &e.error)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn into_result(self) -> Result<(), FormErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for FormErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} field(s) need attention", self.0.len())
    }
}

impl std::error::Error for FormErrors {}

/// Where keyboard focus should go after a state change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusTarget {
    EditButton,
    Field(FieldId),
    ErrorSummary,
}

/// An edit form: a working copy of part of a profile plus the rules for
/// turning it into a submit plan.
pub trait EditForm: Send {
    /// Snapshots the editable fields of `profile`.
    fn begin(profile: &Profile) -> Self
    where
        Self: Sized;

    /// Input that receives focus when edit mode opens.
    fn first_field(&self) -> FieldId;

    /// Validates the working copy and returns the requests that would bring
    /// the server in line with it. Validation failures produce no plan.
    fn build_submit_plan(&self, user_id: i64) -> Result<SubmitPlan, FormErrors>;

    /// Folds a request the gateway confirmed into the form's baseline, so
    /// the next plan no longer contains it. `response` is the `data` the
    /// gateway answered with.
    fn absorb(&mut self, intent: &Intent, response: &Value);
}
