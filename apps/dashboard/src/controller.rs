//! Edit-session controller.
//!
//! `FormController` wraps one `EditForm` with the session lifecycle:
//! snapshot on `begin_edit`, client validation and batch submit on `submit`,
//! and reconciliation to the confirmed server state afterwards. Status and
//! screen-reader announcements are published on `watch` channels so a view
//! can follow them, including the delayed success → idle transition.

use std::sync::Arc;
use std::time::Duration;

use profile_board_common::Profile;
use thiserror::Error;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::batch::{execute_batch, BatchError};
use crate::form::{EditForm, FocusTarget, FormErrors, FormStatus};
use crate::gateway::{fetch, ApiRequest, Gateway};
use crate::timer::ScopedTimer;

pub const SUCCESS_RESET_DELAY: Duration = Duration::from_millis(750);
pub const ANNOUNCE_DELAY: Duration = Duration::from_millis(500);
pub const UPDATED_ANNOUNCEMENT: &str = "information updated";

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("no form is open for editing")]
    NotEditing,

    #[error("a submit is already in flight")]
    InFlight,

    #[error("invalid input: {0}")]
    Invalid(FormErrors),

    #[error(transparent)]
    Batch(#[from] BatchError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The form matched the server; nothing was sent.
    NoChanges,
    Saved,
}

pub struct FormController<F: EditForm> {
    profile: Profile,
    profile_stale: bool,
    form: Option<F>,
    status: Arc<watch::Sender<FormStatus>>,
    announcement: Arc<watch::Sender<Option<String>>>,
    errors: FormErrors,
    submit_failed: bool,
    focus: Option<FocusTarget>,
    success_timer: ScopedTimer,
    announce_timer: ScopedTimer,
}

impl<F: EditForm> FormController<F> {
    pub fn new(profile: Profile) -> Self {
        let (status, _) = watch::channel(FormStatus::Idle);
        let (announcement, _) = watch::channel(None);
        Self {
            profile,
            profile_stale: false,
            form: None,
            status: Arc::new(status),
            announcement: Arc::new(announcement),
            errors: FormErrors::default(),
            submit_failed: false,
            focus: None,
            success_timer: ScopedTimer::new(),
            announce_timer: ScopedTimer::new(),
        }
    }

    pub fn status(&self) -> FormStatus {
        *self.status.borrow()
    }

    pub fn subscribe_status(&self) -> watch::Receiver<FormStatus> {
        self.status.subscribe()
    }

    pub fn subscribe_announcements(&self) -> watch::Receiver<Option<String>> {
        self.announcement.subscribe()
    }

    /// Last profile confirmed by the gateway.
    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    /// True when a save succeeded but the profile could not be re-fetched.
    pub fn is_profile_stale(&self) -> bool {
        self.profile_stale
    }

    pub fn form(&self) -> Option<&F> {
        self.form.as_ref()
    }

    pub fn form_mut(&mut self) -> Option<&mut F> {
        self.form.as_mut()
    }

    pub fn errors(&self) -> &FormErrors {
        &self.errors
    }

    pub fn submit_failed(&self) -> bool {
        self.submit_failed
    }

    /// Pending focus request, consumed by the view.
    pub fn take_focus(&mut self) -> Option<FocusTarget> {
        self.focus.take()
    }

    /// Opens edit mode on a fresh snapshot of the confirmed profile.
    pub fn begin_edit(&mut self) {
        self.reset_session();
        let form = F::begin(&self.profile);
        self.focus = Some(FocusTarget::Field(form.first_field()));
        self.form = Some(form);
        self.status.send_replace(FormStatus::Active);
    }

    /// Leaves edit mode and discards local edits.
    pub fn cancel(&mut self) {
        self.reset_session();
        self.form = None;
        self.focus = Some(FocusTarget::EditButton);
        self.status.send_replace(FormStatus::Idle);
    }

    fn reset_session(&mut self) {
        self.success_timer.cancel();
        self.announce_timer.cancel();
        self.errors = FormErrors::default();
        self.submit_failed = false;
    }

    /// Validates the form and sends its plan.
    ///
    /// Invalid input sends nothing. A failed request leaves the form open with
    /// its edits so the user can resubmit. Requests of the batch that did go
    /// through are folded into the form first, so a resubmit only sends what
    /// is still outstanding.
    pub async fn submit(&mut self, gateway: &dyn Gateway) -> Result<SubmitOutcome, SubmitError> {
        if self.status() == FormStatus::Loading {
            return Err(SubmitError::InFlight);
        }
        let form = self.form.as_ref().ok_or(SubmitError::NotEditing)?;

        let plan = match form.build_submit_plan(self.profile.id) {
            Ok(plan) => plan,
            Err(errors) => {
                debug!("Submit blocked by {} invalid field(s)", errors.len());
                self.focus = errors.first_field().map(FocusTarget::Field);
                self.errors = errors.clone();
                self.status.send_replace(FormStatus::Error);
                return Err(SubmitError::Invalid(errors));
            }
        };
        self.errors = FormErrors::default();
        if plan.is_empty() {
            return Ok(SubmitOutcome::NoChanges);
        }

        self.status.send_replace(FormStatus::Loading);
        if let Err(e) = execute_batch(gateway, &plan).await {
            warn!("Submit for user {} failed: {}", self.profile.id, e);
            if let Some(form) = self.form.as_mut() {
                for (index, response) in &e.succeeded {
                    if let Some(intent) = plan.intents.get(*index) {
                        form.absorb(intent, response);
                    }
                }
            }
            self.submit_failed = true;
            self.focus = Some(FocusTarget::ErrorSummary);
            self.status.send_replace(FormStatus::Error);
            return Err(SubmitError::Batch(e));
        }

        self.refresh_profile(gateway).await;
        self.form = None;
        self.submit_failed = false;
        self.focus = Some(FocusTarget::EditButton);
        self.status.send_replace(FormStatus::Success);
        info!("Saved {} change(s) for user {}", plan.len(), self.profile.id);
        self.schedule_success_timers();
        Ok(SubmitOutcome::Saved)
    }

    async fn refresh_profile(&mut self, gateway: &dyn Gateway) {
        let request = ApiRequest::get(format!("/users/get-extras/{}", self.profile.id));
        match fetch::<Profile>(gateway, &request).await {
            Ok(profile) => {
                self.profile = profile;
                self.profile_stale = false;
            }
            Err(e) => {
                warn!("Could not reload profile {}: {}", self.profile.id, e);
                self.profile_stale = true;
            }
        }
    }

    fn schedule_success_timers(&mut self) {
        let status = Arc::clone(&self.status);
        self.success_timer.schedule(SUCCESS_RESET_DELAY, async move {
            status.send_if_modified(|s| {
                if *s == FormStatus::Success {
                    *s = FormStatus::Idle;
                    true
                } else {
                    false
                }
            });
        });

        let announcement = Arc::clone(&self.announcement);
        self.announce_timer.schedule(ANNOUNCE_DELAY, async move {
            announcement.send_replace(Some(UPDATED_ANNOUNCEMENT.to_string()));
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::about_you::AboutYouForm;
    use crate::delta::Choice;
    use crate::form::FieldId;
    use crate::gateway::Method;
    use crate::personal_info::PersonalInfoForm;
    use crate::testing::RecordingGateway;
    use profile_board_common::LocationRef;
    use serde_json::json;

    fn profile() -> Profile {
        Profile {
            id: 7,
            first_name: Some("Ada".into()),
            last_name: Some("Lovelace".into()),
            locations: vec![LocationRef {
                id: 5,
                name: "Remote".into(),
            }],
            ..Default::default()
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_invalid_summary_sends_nothing() {
        let gateway = RecordingGateway::new();
        let mut controller = FormController::<AboutYouForm>::new(profile());
        controller.begin_edit();
        assert_eq!(
            controller.take_focus(),
            Some(FocusTarget::Field(FieldId::Summary))
        );
        controller.form_mut().unwrap().set_summary("<script>");

        let err = controller.submit(&gateway).await.unwrap_err();
        assert!(matches!(err, SubmitError::Invalid(_)));
        assert!(gateway.calls().is_empty());
        assert_eq!(controller.status(), FormStatus::Error);
        assert_eq!(
            controller.take_focus(),
            Some(FocusTarget::Field(FieldId::Summary))
        );
        assert_eq!(controller.errors().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_request_keeps_edits() {
        let gateway = RecordingGateway::new();
        gateway.fail(Method::Post, "/locations/delete-user-location", 500, "boom");
        let mut controller = FormController::<AboutYouForm>::new(profile());
        controller.begin_edit();
        controller.form_mut().unwrap().set_summary("Rust developer");
        controller.form_mut().unwrap().set_locations(vec![]);

        let err = controller.submit(&gateway).await.unwrap_err();
        assert!(matches!(err, SubmitError::Batch(ref b) if b.failures.len() == 1));
        assert_eq!(controller.status(), FormStatus::Error);
        assert!(controller.submit_failed());
        assert_eq!(controller.take_focus(), Some(FocusTarget::ErrorSummary));
        let form = controller.form().unwrap();
        assert_eq!(form.summary(), "Rust developer");
        assert!(form.locations().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_resubmit_sends_only_what_failed() {
        let gateway = RecordingGateway::new();
        gateway.fail(Method::Put, "/users/7", 500, "boom");
        let mut controller = FormController::<AboutYouForm>::new(profile());
        controller.begin_edit();
        controller.form_mut().unwrap().set_summary("Rust developer");
        controller.form_mut().unwrap().set_locations(vec![]);

        let err = controller.submit(&gateway).await.unwrap_err();
        assert_eq!(err.to_string(), "1 of 2 requests failed");
        assert_eq!(
            gateway.paths(),
            vec!["/users/7", "/locations/delete-user-location"]
        );

        gateway.respond(Method::Put, "/users/7", json!({"id": 7}));
        gateway.respond(
            Method::Get,
            "/users/get-extras/7",
            json!({"id": 7, "summary": "Rust developer", "locations": []}),
        );
        let outcome = controller.submit(&gateway).await.unwrap();
        assert_eq!(outcome, SubmitOutcome::Saved);
        assert_eq!(gateway.paths()[2..], ["/users/7", "/users/get-extras/7"]);
        assert_eq!(controller.status(), FormStatus::Success);
        assert!(controller.profile().locations.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_success_reloads_profile_and_resets() {
        let gateway = RecordingGateway::new();
        gateway.respond(
            Method::Get,
            "/users/get-extras/7",
            json!({
                "id": 7,
                "first_name": "Ada",
                "last_name": "Byron",
                "summary": null,
                "desired_title": null,
                "area_of_work": null,
                "image": null
            }),
        );
        let mut controller = FormController::<PersonalInfoForm>::new(profile());
        let mut status = controller.subscribe_status();
        let announcements = controller.subscribe_announcements();
        controller.begin_edit();
        controller.form_mut().unwrap().set_last_name("Byron");

        let outcome = controller.submit(&gateway).await.unwrap();
        assert_eq!(outcome, SubmitOutcome::Saved);
        assert_eq!(gateway.paths(), vec!["/users/7", "/users/get-extras/7"]);
        assert_eq!(controller.status(), FormStatus::Success);
        assert!(controller.form().is_none());
        assert_eq!(controller.profile().last_name.as_deref(), Some("Byron"));
        assert!(!controller.is_profile_stale());

        tokio::time::sleep(Duration::from_millis(600)).await;
        assert_eq!(
            announcements.borrow().as_deref(),
            Some(UPDATED_ANNOUNCEMENT)
        );
        assert_eq!(*status.borrow_and_update(), FormStatus::Success);

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(controller.status(), FormStatus::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_reload_marks_profile_stale() {
        let gateway = RecordingGateway::new();
        gateway.fail(Method::Get, "/users/get-extras/7", 500, "down");
        let mut controller = FormController::<PersonalInfoForm>::new(profile());
        controller.begin_edit();
        controller.form_mut().unwrap().set_first_name("Augusta");

        controller.submit(&gateway).await.unwrap();
        assert_eq!(controller.status(), FormStatus::Success);
        assert!(controller.is_profile_stale());
        assert_eq!(controller.profile().first_name.as_deref(), Some("Ada"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_unchanged_form_is_a_no_op() {
        let gateway = RecordingGateway::new();
        let mut controller = FormController::<AboutYouForm>::new(profile());
        controller.begin_edit();
        controller
            .form_mut()
            .unwrap()
            .set_locations(vec![Choice::persisted(5, "Remote")]);

        let outcome = controller.submit(&gateway).await.unwrap();
        assert_eq!(outcome, SubmitOutcome::NoChanges);
        assert!(gateway.calls().is_empty());
        assert_eq!(controller.status(), FormStatus::Active);
    }

    #[tokio::test(start_paused = true)]
    async fn test_second_submit_refused_while_loading() {
        let gateway = RecordingGateway::new();
        gateway.hang(Method::Put, "/users/7");
        let mut controller = FormController::<PersonalInfoForm>::new(profile());
        controller.begin_edit();
        controller.form_mut().unwrap().set_first_name("Augusta");

        let timed_out =
            tokio::time::timeout(Duration::from_secs(5), controller.submit(&gateway)).await;
        assert!(timed_out.is_err());
        assert_eq!(controller.status(), FormStatus::Loading);

        let err = controller.submit(&gateway).await.unwrap_err();
        assert!(matches!(err, SubmitError::InFlight));
        assert_eq!(gateway.calls().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropping_controller_aborts_timers() {
        let gateway = RecordingGateway::new();
        let mut controller = FormController::<PersonalInfoForm>::new(profile());
        let status = controller.subscribe_status();
        controller.begin_edit();
        controller.form_mut().unwrap().set_first_name("Augusta");
        controller.submit(&gateway).await.unwrap();
        drop(controller);

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(*status.borrow(), FormStatus::Success);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_discards_edits() {
        let mut controller = FormController::<PersonalInfoForm>::new(profile());
        controller.begin_edit();
        controller.form_mut().unwrap().set_first_name("Augusta");
        controller.cancel();
        assert_eq!(controller.status(), FormStatus::Idle);
        assert!(controller.form().is_none());
        assert_eq!(controller.take_focus(), Some(FocusTarget::EditButton));
        assert!(matches!(
            controller.submit(&RecordingGateway::new()).await,
            Err(SubmitError::NotEditing)
        ));
    }

    #[tokio::test]
    async fn test_submit_without_edit_mode() {
        let mut controller = FormController::<AboutYouForm>::new(profile());
        let err = controller.submit(&RecordingGateway::new()).await.unwrap_err();
        assert!(matches!(err, SubmitError::NotEditing));
    }
}
