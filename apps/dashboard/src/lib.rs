//! Client-side edit sessions for the profile board dashboard.
//!
//! A `FormController` owns one edit form (`AboutYouForm`, `ExperienceForm`
//! or `PersonalInfoForm`). Forms compute delta sets against the profile they
//! were opened on and turn them into a `SubmitPlan`, which the batch executor
//! sends through a `Gateway`.

pub mod about_you;
pub mod autocomplete;
pub mod batch;
pub mod controller;
pub mod delta;
pub mod experience;
pub mod feed;
pub mod form;
pub mod gateway;
pub mod ids;
pub mod personal_info;
pub mod plan;
pub mod timer;

#[cfg(test)]
mod testing;

pub use about_you::{AboutYouForm, CollectionField};
pub use batch::{execute_batch, BatchError};
pub use controller::{FormController, SubmitError, SubmitOutcome};
pub use delta::{compute_delta, Choice, Delta};
pub use experience::{ExperienceDelta, ExperienceEntry, ExperienceForm};
pub use feed::{CardAction, Feed, FeedStatus};
pub use form::{EditForm, FieldId, FocusTarget, FormErrors, FormStatus, InputStatus};
pub use gateway::{ApiRequest, Gateway, GatewayError, HttpGateway, Method};
pub use ids::{EntityId, ProvisionalIds};
pub use personal_info::PersonalInfoForm;
pub use plan::{Intent, SubmitPlan};
pub use timer::ScopedTimer;
