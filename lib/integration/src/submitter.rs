//! Runs the asynchronous connect call and reduces it to an outcome.

use crate::connector::{ConnectRequest, IntegrationConnector};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Result of one connect call, as the dialog sees it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionOutcome {
    Succeeded,
    /// The connector's human-readable cause, unprefixed.
    Failed { message: String },
}

/// A submission the dialog controller has accepted and is waiting on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingSubmission {
    pub request: ConnectRequest,
}

/// Performs connect calls through an [`IntegrationConnector`].
#[derive(Clone)]
pub struct ConnectionSubmitter {
    connector: Arc<dyn IntegrationConnector>,
}

impl ConnectionSubmitter {
    #[must_use]
    pub fn new(connector: Arc<dyn IntegrationConnector>) -> Self {
        Self { connector }
    }

    /// Performs the connect call. Every error is turned into
    /// [`SubmissionOutcome::Failed`]; nothing is propagated.
    pub async fn submit(&self, request: &ConnectRequest) -> SubmissionOutcome {
        match self.connector.connect(request).await {
            Ok(()) => {
                debug!(service = %request.service, name = %request.name, "integration connected");
                SubmissionOutcome::Succeeded
            }
            Err(error) => {
                let message = error.cause().to_string();
                warn!(
                    service = %request.service,
                    name = %request.name,
                    error = %error,
                    "failed to connect integration"
                );
                SubmissionOutcome::Failed { message }
            }
        }
    }

    /// Runs the submission in the background and sends its outcome to
    /// `outcomes`. If the receiver is gone because the dialog was torn down,
    /// the outcome is dropped.
    pub fn spawn(
        &self,
        pending: PendingSubmission,
        outcomes: mpsc::UnboundedSender<SubmissionOutcome>,
    ) -> JoinHandle<()> {
        let submitter = self.clone();
        tokio::spawn(async move {
            let outcome = submitter.submit(&pending.request).await;
            if outcomes.send(outcome).is_err() {
                debug!(name = %pending.request.name, "dialog closed before connect finished");
            }
        })
    }
}
