//! Drives one connection attempt from configuration to the integrations list.

use crate::config::{ConnectConfig, ConnectionSection};
use crate::error::CliError;
use chrono::Utc;
use sluice_integration::{
    ConnectionDialogController, ConnectionSubmitter, DialogEffect, FieldKind,
    ConnectorError, HttpIntegrationClient, IntegrationConnector, Service, Toast, ToastCenter,
    ToastKind, UserProfile, descriptor_for, newest_first,
};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Connects the configured integration against the configured backend.
///
/// # Errors
///
/// Returns an error if the configuration is unusable, the form is
/// incomplete, or the backend rejects the connection. Once the backend has
/// accepted the connection the run succeeds, even if refreshing the
/// integrations list fails.
pub async fn run(config: ConnectConfig) -> sluice_core::Result<(), CliError> {
    let service: Service =
        config
            .connection
            .service
            .parse()
            .map_err(|_| CliError::UnknownService {
                label: config.connection.service.clone(),
            })?;

    let client = HttpIntegrationClient::new(&config.api).map_err(|e| CliError::Backend {
        details: e.to_string(),
    })?;
    info!(api_address = %config.api.api_address, %service, "connecting integration");

    let toasts = connect(Arc::new(client), config.user, service, &config.connection).await?;
    for toast in toasts.visible() {
        println!("{}", render_toast(toast));
    }
    Ok(())
}

/// Fills the dialog from `connection`, submits it and applies the resulting
/// effects. Returns the notifications raised along the way.
///
/// A failed refresh after a successful connect is reported as an error
/// toast, not as an error.
pub(crate) async fn connect(
    connector: Arc<dyn IntegrationConnector>,
    user: UserProfile,
    service: Service,
    connection: &ConnectionSection,
) -> sluice_core::Result<ToastCenter, CliError> {
    let mut dialog = ConnectionDialogController::open(user.clone(), service);
    fill_dialog(&mut dialog, connection)?;

    let Some(pending) = dialog.confirm() else {
        let missing = dialog
            .collector()
            .missing_fields()
            .into_iter()
            .map(str::to_string)
            .collect();
        return Err(CliError::Incomplete { missing }.into());
    };

    let submitter = ConnectionSubmitter::new(Arc::clone(&connector));
    let (outcomes, mut received) = mpsc::unbounded_channel();
    submitter.spawn(pending, outcomes);
    let outcome = received.recv().await.ok_or_else(|| CliError::Backend {
        details: "connect task ended without reporting an outcome".to_string(),
    })?;

    let mut toasts = ToastCenter::new();
    for effect in dialog.resolve(outcome) {
        match effect {
            DialogEffect::Notify(toast) => {
                toasts.show(toast, Utc::now());
            }
            DialogEffect::ShowError(message) => {
                return Err(CliError::ConnectFailed { message }.into());
            }
            DialogEffect::Close => debug!("connection dialog closed"),
            DialogEffect::NavigateToIntegrations => {
                if let Err(error) = list_integrations(connector.as_ref(), &user, &mut toasts).await
                {
                    warn!(%error, "integration connected but the list could not be refreshed");
                    toasts.show(
                        Toast::error(format!(
                            "Could not refresh integrations: {}",
                            error.cause()
                        )),
                        Utc::now(),
                    );
                }
            }
        }
    }
    Ok(toasts)
}

/// Copies configured values into the dialog.
///
/// File-path fields are read from disk so their contents are sent rather
/// than the path. A name that already carries the service prefix is
/// accepted as is.
pub(crate) fn fill_dialog(
    dialog: &mut ConnectionDialogController,
    connection: &ConnectionSection,
) -> sluice_core::Result<(), CliError> {
    let service = dialog.service();
    for (key, value) in &connection.fields {
        let value = field_value(service, key, value)?;
        dialog
            .set_field(key.as_str(), value)
            .map_err(|e| CliError::InvalidField {
                details: e.to_string(),
            })?;
    }

    if !connection.name.is_empty() {
        let prefix = service.name_prefix();
        let suffix = connection
            .name
            .strip_prefix(prefix.as_str())
            .unwrap_or(&connection.name);
        dialog.set_name(suffix).map_err(|e| CliError::InvalidField {
            details: e.to_string(),
        })?;
    }
    Ok(())
}

fn field_value(service: Service, key: &str, value: &str) -> sluice_core::Result<String, CliError> {
    let is_file = descriptor_for(service)
        .field(key)
        .is_some_and(|spec| spec.kind == FieldKind::FilePath);
    if !is_file || value.is_empty() {
        return Ok(value.to_string());
    }

    let contents = std::fs::read_to_string(value).map_err(|e| CliError::ReadFile {
        path: value.to_string(),
        details: e.to_string(),
    })?;
    debug!(%service, key, "read field value from file");
    Ok(contents)
}

async fn list_integrations(
    connector: &dyn IntegrationConnector,
    user: &UserProfile,
    toasts: &mut ToastCenter,
) -> Result<(), ConnectorError> {
    let integrations = connector.list_integrations(user).await?;

    if integrations.is_empty() {
        toasts.show(Toast::info("No integrations connected yet."), Utc::now());
        return Ok(());
    }

    println!("Integrations:");
    for integration in newest_first(&integrations) {
        println!(
            "  {}  {:<14} {}  (connected {})",
            integration.id,
            integration.service,
            integration.name,
            integration.created_at.format("%Y-%m-%d %H:%M UTC"),
        );
    }
    Ok(())
}

fn render_toast(toast: &Toast) -> String {
    let tag = match toast.kind {
        ToastKind::Success => "ok",
        ToastKind::Info => "info",
        ToastKind::Error => "error",
    };
    format!("[{tag}] {}", toast.message)
}
