//! Headless front end for the integration connection workflow.
//!
//! Reads a connection request from configuration, drives the same dialog
//! state machine the dashboard uses, and prints the resulting
//! notifications and the refreshed integrations list.

pub mod config;
pub mod error;
pub mod run;

pub use config::{ConnectConfig, ConnectionSection};
pub use error::CliError;
pub use run::run;
