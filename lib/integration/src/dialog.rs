//! The connect-integration dialog state machine.
//!
//! ```text
//! Idle --edit--> Editing --confirm--> Submitting --success--> Succeeded (closed)
//!                   ^                     |
//!                   +--edit-- Failed <----+ failure
//! ```
//!
//! Confirming is inert while the form is incomplete or a submission is in
//! flight, so at most one connect call is outstanding per dialog. The
//! outcome of that call is fed back through
//! [`ConnectionDialogController::resolve`], which returns the side effects
//! the host must perform.

use crate::collector::ConfigCollector;
use crate::connector::ConnectRequest;
use crate::error::DialogError;
use crate::record::UserProfile;
use crate::service::Service;
use crate::submitter::{ConnectionSubmitter, PendingSubmission, SubmissionOutcome};
use crate::toast::Toast;
use tracing::{debug, info};

/// Fixed phrase every connection error message starts with.
pub const CONNECT_ERROR_PREFIX: &str = "Unable to connect integration. ";

/// Where the current connection attempt stands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionAttemptState {
    /// Opened, nothing entered yet.
    Idle,
    Editing,
    /// A connect call is in flight.
    Submitting,
    /// Connected. The dialog is closed.
    Succeeded,
    /// The last connect call failed. `message` is shown until the next edit.
    Failed { message: String },
}

/// A side effect the host performs after a state transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogEffect {
    Notify(Toast),
    /// Show a persistent error inside the dialog.
    ShowError(String),
    Close,
    /// Route to the integrations list so the new integration shows up.
    NavigateToIntegrations,
}

/// Owns one open connect-integration dialog.
#[derive(Debug)]
pub struct ConnectionDialogController {
    user: UserProfile,
    collector: ConfigCollector,
    state: ConnectionAttemptState,
    open: bool,
}

impl ConnectionDialogController {
    /// Opens the dialog for `service`.
    #[must_use]
    pub fn open(user: UserProfile, service: Service) -> Self {
        debug!(%service, "opening connection dialog");
        Self {
            user,
            collector: ConfigCollector::new(service),
            state: ConnectionAttemptState::Idle,
            open: true,
        }
    }

    #[must_use]
    pub fn service(&self) -> Service {
        self.collector.service()
    }

    #[must_use]
    pub fn collector(&self) -> &ConfigCollector {
        &self.collector
    }

    #[must_use]
    pub fn state(&self) -> &ConnectionAttemptState {
        &self.state
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// The error shown in the dialog, if the last attempt failed.
    #[must_use]
    pub fn error_message(&self) -> Option<&str> {
        match &self.state {
            ConnectionAttemptState::Failed { message } => Some(message),
            _ => None,
        }
    }

    /// Switches to another service, discarding everything entered so far.
    ///
    /// # Errors
    ///
    /// Fails if the dialog is closed or a submission is in flight.
    pub fn select_service(&mut self, service: Service) -> Result<(), DialogError> {
        self.ensure_editable()?;
        debug!(from = %self.service(), to = %service, "switching service");
        self.collector.reset(service);
        self.state = ConnectionAttemptState::Idle;
        Ok(())
    }

    /// Sets a configuration field.
    ///
    /// # Errors
    ///
    /// Fails if the dialog is closed, a submission is in flight, or the
    /// service has no such field.
    pub fn set_field(
        &mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<(), DialogError> {
        self.ensure_editable()?;
        self.collector.set_field(key, value)?;
        self.mark_edited();
        Ok(())
    }

    /// Sets the name suffix after the service prefix. Ignored for services
    /// without a name input.
    ///
    /// # Errors
    ///
    /// Fails if the dialog is closed or a submission is in flight.
    pub fn set_name(&mut self, raw_suffix: &str) -> Result<(), DialogError> {
        self.ensure_editable()?;
        if self.collector.set_name(raw_suffix) {
            self.mark_edited();
        }
        Ok(())
    }

    /// Applies the full text of the name input after a free-form edit.
    ///
    /// # Errors
    ///
    /// Fails if the dialog is closed or a submission is in flight.
    pub fn edit_name_field(&mut self, text: &str) -> Result<(), DialogError> {
        self.ensure_editable()?;
        if self.collector.edit_name_field(text) {
            self.mark_edited();
        }
        Ok(())
    }

    /// Whether the confirm control is enabled.
    #[must_use]
    pub fn can_confirm(&self) -> bool {
        self.open
            && !matches!(
                self.state,
                ConnectionAttemptState::Submitting | ConnectionAttemptState::Succeeded
            )
            && self.collector.is_complete()
    }

    /// Starts a submission if the form may be confirmed.
    ///
    /// Returns `None`, leaving the state untouched, when confirming is not
    /// currently allowed.
    pub fn confirm(&mut self) -> Option<PendingSubmission> {
        if !self.can_confirm() {
            return None;
        }
        self.state = ConnectionAttemptState::Submitting;
        info!(
            service = %self.service(),
            name = %self.collector.name(),
            "connecting integration"
        );
        Some(PendingSubmission {
            request: ConnectRequest::from_collector(self.user.clone(), &self.collector),
        })
    }

    /// Applies the outcome of the in-flight submission.
    ///
    /// Outcomes arriving when no submission is in flight are ignored.
    pub fn resolve(&mut self, outcome: SubmissionOutcome) -> Vec<DialogEffect> {
        if self.state != ConnectionAttemptState::Submitting {
            debug!(state = ?self.state, "ignoring outcome with no submission in flight");
            return Vec::new();
        }

        match outcome {
            SubmissionOutcome::Succeeded => {
                self.state = ConnectionAttemptState::Succeeded;
                self.open = false;
                vec![
                    DialogEffect::Notify(Toast::success(format!(
                        "Successfully connected to {}!",
                        self.service().label()
                    ))),
                    DialogEffect::Close,
                    DialogEffect::NavigateToIntegrations,
                ]
            }
            SubmissionOutcome::Failed { message } => {
                let message = format!("{CONNECT_ERROR_PREFIX}{message}");
                self.state = ConnectionAttemptState::Failed {
                    message: message.clone(),
                };
                vec![DialogEffect::ShowError(message)]
            }
        }
    }

    /// Confirms and awaits the submission inline.
    ///
    /// Returns no effects if confirming was not allowed.
    pub async fn confirm_and_submit(
        &mut self,
        submitter: &ConnectionSubmitter,
    ) -> Vec<DialogEffect> {
        let Some(pending) = self.confirm() else {
            return Vec::new();
        };
        let outcome = submitter.submit(&pending.request).await;
        self.resolve(outcome)
    }

    /// Closes the dialog without connecting, discarding all entered values.
    ///
    /// # Errors
    ///
    /// Fails while a submission is in flight or if already closed.
    pub fn cancel(&mut self) -> Result<(), DialogError> {
        self.ensure_editable()?;
        debug!(service = %self.service(), "connection dialog cancelled");
        self.collector.reset(self.service());
        self.state = ConnectionAttemptState::Idle;
        self.open = false;
        Ok(())
    }

    fn ensure_editable(&self) -> Result<(), DialogError> {
        if !self.open {
            return Err(DialogError::Closed);
        }
        if self.state == ConnectionAttemptState::Submitting {
            return Err(DialogError::SubmissionInFlight);
        }
        Ok(())
    }

    fn mark_edited(&mut self) {
        self.state = ConnectionAttemptState::Editing;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::submitter::testing::FakeConnector;
    use crate::toast::{SUCCESS_TOAST_DURATION, ToastKind};

    fn user() -> UserProfile {
        UserProfile::new("api-key", "ana")
    }

    fn fill_postgres(dialog: &mut ConnectionDialogController) {
        for (key, value) in [
            ("host", "db.internal"),
            ("port", "5432"),
            ("database", "analytics"),
            ("username", "etl"),
            ("password", "hunter2"),
        ] {
            dialog.set_field(key, value).expect("editable");
        }
    }

    #[test]
    fn first_edit_moves_idle_to_editing() {
        let mut dialog = ConnectionDialogController::open(user(), Service::Postgres);
        assert_eq!(dialog.state(), &ConnectionAttemptState::Idle);

        dialog.set_field("host", "db").expect("editable");
        assert_eq!(dialog.state(), &ConnectionAttemptState::Editing);
    }

    #[test]
    fn confirm_is_inert_while_incomplete() {
        let mut dialog = ConnectionDialogController::open(user(), Service::Postgres);
        fill_postgres(&mut dialog);
        dialog.set_field("host", "").expect("editable");
        dialog.set_name("prod").expect("editable");

        assert!(!dialog.can_confirm());
        assert!(dialog.confirm().is_none());
        assert_eq!(dialog.state(), &ConnectionAttemptState::Editing);
    }

    #[tokio::test]
    async fn postgres_success_closes_and_navigates() {
        let connector = FakeConnector::succeeding();
        let submitter = ConnectionSubmitter::new(connector.clone());
        let mut dialog = ConnectionDialogController::open(user(), Service::Postgres);

        assert!(!dialog.can_confirm());
        fill_postgres(&mut dialog);
        assert!(!dialog.can_confirm());
        dialog.set_name("prod").expect("editable");
        assert!(dialog.can_confirm());

        let effects = dialog.confirm_and_submit(&submitter).await;

        assert_eq!(dialog.state(), &ConnectionAttemptState::Succeeded);
        assert!(!dialog.is_open());
        assert_eq!(
            effects,
            vec![
                DialogEffect::Notify(Toast::success("Successfully connected to Postgres!")),
                DialogEffect::Close,
                DialogEffect::NavigateToIntegrations,
            ]
        );
        let notifications: Vec<_> = effects
            .iter()
            .filter_map(|effect| match effect {
                DialogEffect::Notify(toast) => Some(toast),
                _ => None,
            })
            .collect();
        assert_eq!(notifications.len(), 1);
        assert_eq!(notifications[0].kind, ToastKind::Success);
        assert_eq!(notifications[0].auto_dismiss, Some(SUCCESS_TOAST_DURATION));

        let requests = connector.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].name, "Postgres/prod");
        assert_eq!(requests[0].config.len(), 5);
    }

    #[tokio::test]
    async fn demo_confirms_immediately_with_empty_config() {
        let connector = FakeConnector::succeeding();
        let submitter = ConnectionSubmitter::new(connector.clone());
        let mut dialog = ConnectionDialogController::open(user(), Service::Demo);

        assert!(dialog.can_confirm());
        let effects = dialog.confirm_and_submit(&submitter).await;

        assert!(effects.contains(&DialogEffect::Close));
        let requests = connector.requests();
        assert_eq!(requests.len(), 1);
        assert!(requests[0].config.is_empty());
        assert_eq!(requests[0].service, Service::Demo);
    }

    #[tokio::test]
    async fn failure_keeps_dialog_open_with_values() {
        let submitter = ConnectionSubmitter::new(FakeConnector::failing("timeout"));
        let mut dialog = ConnectionDialogController::open(user(), Service::Postgres);
        fill_postgres(&mut dialog);
        dialog.set_name("prod").expect("editable");

        let effects = dialog.confirm_and_submit(&submitter).await;

        let expected = "Unable to connect integration. timeout".to_string();
        assert_eq!(effects, vec![DialogEffect::ShowError(expected.clone())]);
        assert_eq!(
            dialog.state(),
            &ConnectionAttemptState::Failed {
                message: expected.clone()
            }
        );
        assert_eq!(dialog.error_message(), Some(expected.as_str()));
        assert!(dialog.is_open());
        assert_eq!(dialog.collector().field("host"), Some("db.internal"));
        assert_eq!(dialog.collector().name(), "Postgres/prod");

        dialog.set_field("port", "5433").expect("editable");
        assert_eq!(dialog.state(), &ConnectionAttemptState::Editing);
        assert_eq!(dialog.error_message(), None);
    }

    #[tokio::test]
    async fn retry_after_failure_submits_again() {
        let connector = FakeConnector::failing("refused");
        let submitter = ConnectionSubmitter::new(connector.clone());
        let mut dialog = ConnectionDialogController::open(user(), Service::Demo);

        dialog.confirm_and_submit(&submitter).await;
        assert!(dialog.error_message().is_some());
        assert!(dialog.can_confirm());

        dialog.confirm_and_submit(&submitter).await;
        assert_eq!(connector.requests().len(), 2);
    }

    #[test]
    fn second_confirm_while_submitting_is_inert() {
        let mut dialog = ConnectionDialogController::open(user(), Service::Demo);

        assert!(dialog.confirm().is_some());
        assert_eq!(dialog.state(), &ConnectionAttemptState::Submitting);
        assert!(!dialog.can_confirm());
        assert!(dialog.confirm().is_none());
    }

    #[test]
    fn edits_and_cancel_are_rejected_while_submitting() {
        let mut dialog = ConnectionDialogController::open(user(), Service::Demo);
        dialog.confirm().expect("demo is complete");

        assert_eq!(dialog.cancel(), Err(DialogError::SubmissionInFlight));
        assert_eq!(
            dialog.select_service(Service::S3),
            Err(DialogError::SubmissionInFlight)
        );
        assert!(dialog.is_open());
    }

    #[test]
    fn switching_service_resets_everything() {
        let mut dialog = ConnectionDialogController::open(user(), Service::Postgres);
        fill_postgres(&mut dialog);
        dialog.set_name("prod").expect("editable");
        dialog.confirm().expect("complete");
        dialog.resolve(SubmissionOutcome::Failed {
            message: "bad password".to_string(),
        });

        dialog.select_service(Service::MySql).expect("editable");

        assert_eq!(dialog.service(), Service::MySql);
        assert_eq!(dialog.state(), &ConnectionAttemptState::Idle);
        assert_eq!(dialog.error_message(), None);
        assert!(dialog.collector().config().is_empty());
        assert_eq!(dialog.collector().name(), "MySQL/");
        assert!(!dialog.can_confirm());
    }

    #[test]
    fn cancel_discards_without_submitting() {
        let mut dialog = ConnectionDialogController::open(user(), Service::Postgres);
        fill_postgres(&mut dialog);

        dialog.cancel().expect("cancellable");

        assert!(!dialog.is_open());
        assert!(dialog.collector().config().is_empty());
        assert!(dialog.confirm().is_none());
        assert_eq!(dialog.set_field("host", "x"), Err(DialogError::Closed));
    }

    #[test]
    fn stale_outcome_is_ignored() {
        let mut dialog = ConnectionDialogController::open(user(), Service::Demo);

        let effects = dialog.resolve(SubmissionOutcome::Succeeded);

        assert!(effects.is_empty());
        assert_eq!(dialog.state(), &ConnectionAttemptState::Idle);
        assert!(dialog.is_open());
    }

    #[test]
    fn name_prefix_survives_edits() {
        let mut dialog = ConnectionDialogController::open(user(), Service::Redshift);
        for text in ["", "Red", "Redshift/", "Redshif/x", "Redshift/warehouse"] {
            dialog.edit_name_field(text).expect("editable");
            assert!(dialog.collector().name().starts_with("Redshift/"));
        }
        assert_eq!(dialog.collector().name(), "Redshift/warehouse");
    }

    #[test]
    fn demo_name_edits_do_not_start_editing() {
        let mut dialog = ConnectionDialogController::open(user(), Service::Demo);
        dialog.set_name("custom").expect("editable");

        assert_eq!(dialog.state(), &ConnectionAttemptState::Idle);
        assert_eq!(dialog.collector().name(), "Aqueduct Demo/");
    }
}
