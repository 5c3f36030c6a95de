//! Integration connection workflow for the sluice dashboard.
//!
//! This crate provides:
//!
//! - **Service catalog**: the closed set of connectable services and the
//!   configuration fields each one requires
//! - **Config collector**: the in-progress form values and connection name,
//!   with completeness validation
//! - **Connection submitter**: the asynchronous connect call, reduced to a
//!   success/failure outcome
//! - **Dialog controller**: the state machine tying the above together
//! - **HTTP client**: the backend connector used in production
//! - **Toasts**: transient notifications with auto-dismiss

pub mod collector;
pub mod connector;
pub mod dialog;
pub mod error;
pub mod http;
pub mod record;
pub mod service;
pub mod submitter;
pub mod toast;

pub use collector::{ConfigCollector, IntegrationConfig};
pub use connector::{ConnectRequest, IntegrationConnector};
pub use dialog::{ConnectionAttemptState, ConnectionDialogController, DialogEffect};
pub use error::{ConnectorError, DialogError, ParseServiceError};
pub use http::{HttpClientConfig, HttpIntegrationClient};
pub use record::{Integration, UserProfile, newest_first};
pub use service::{FieldKind, FieldSpec, Service, ServiceDescriptor, descriptor_for};
pub use submitter::{ConnectionSubmitter, PendingSubmission, SubmissionOutcome};
pub use toast::{Toast, ToastCenter, ToastKind};
