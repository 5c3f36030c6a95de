//! Core types shared by the sluice crates.
//!
//! This crate provides the strongly-typed ids and the `Result` alias used by
//! the integration workflow and the command-line front end.

pub mod error;
pub mod id;

pub use error::Result;
pub use id::{IntegrationId, ParseIdError};
