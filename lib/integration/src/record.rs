//! Read-only records supplied by the rest of the dashboard.

use crate::service::Service;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sluice_core::IntegrationId;

/// The signed-in user, as provided by the authentication layer.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Key authenticating API calls on the user's behalf.
    pub api_key: String,
    pub name: String,
    /// Avatar URL.
    #[serde(default)]
    pub picture: Option<String>,
}

impl UserProfile {
    #[must_use]
    pub fn new(api_key: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            name: name.into(),
            picture: None,
        }
    }
}

impl std::fmt::Debug for UserProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserProfile")
            .field("api_key", &"<redacted>")
            .field("name", &self.name)
            .field("picture", &self.picture)
            .finish()
    }
}

/// An integration already connected to the user's account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Integration {
    pub id: IntegrationId,
    pub service: Service,
    pub name: String,
    #[serde(with = "chrono::serde::ts_seconds")]
    pub created_at: DateTime<Utc>,
}

/// Returns the integrations ordered newest first, as the list displays them.
#[must_use]
pub fn newest_first(integrations: &[Integration]) -> Vec<&Integration> {
    let mut sorted: Vec<_> = integrations.iter().collect();
    sorted.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    sorted
}
