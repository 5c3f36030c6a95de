//! The backend seam: registering and listing integrations.
//!
//! The workflow only ever talks to the backend through
//! [`IntegrationConnector`], so it can be driven by an in-memory fake in
//! tests and by [`HttpIntegrationClient`](crate::http::HttpIntegrationClient)
//! in production.

use crate::collector::{ConfigCollector, IntegrationConfig};
use crate::error::ConnectorError;
use crate::record::{Integration, UserProfile};
use crate::service::Service;
use async_trait::async_trait;

/// Everything the backend needs to register one integration.
#[derive(Clone, PartialEq, Eq)]
pub struct ConnectRequest {
    pub user: UserProfile,
    pub service: Service,
    /// Full connection name, prefix included.
    pub name: String,
    pub config: IntegrationConfig,
}

impl ConnectRequest {
    /// Snapshots the collector's current values.
    #[must_use]
    pub fn from_collector(user: UserProfile, collector: &ConfigCollector) -> Self {
        Self {
            user,
            service: collector.service(),
            name: collector.name().to_string(),
            config: collector.config().clone(),
        }
    }
}

impl std::fmt::Debug for ConnectRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectRequest")
            .field("user", &self.user.name)
            .field("service", &self.service)
            .field("name", &self.name)
            .field("fields", &self.config.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Backend operations on a user's integrations.
///
/// Connecting is all-or-nothing: either the backend registers the
/// integration completely or it does not register it at all.
#[async_trait]
pub trait IntegrationConnector: Send + Sync {
    /// Registers a new integration.
    ///
    /// # Errors
    ///
    /// Returns an error carrying a human-readable cause if the backend
    /// could not be reached or refused the integration.
    async fn connect(&self, request: &ConnectRequest) -> Result<(), ConnectorError>;

    /// Lists the user's connected integrations, in backend order.
    async fn list_integrations(
        &self,
        user: &UserProfile,
    ) -> Result<Vec<Integration>, ConnectorError>;
}
