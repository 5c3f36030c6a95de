//! In-progress configuration of one connection attempt.

use crate::error::DialogError;
use crate::service::{Service, ServiceDescriptor, descriptor_for};
use std::collections::BTreeMap;
use std::fmt;

/// Field values keyed by field key.
pub type IntegrationConfig = BTreeMap<String, String>;

/// Collects field values and the connection name for the active service.
///
/// The stored name always starts with the service's name prefix
/// (`"Postgres/"`, ...). Completeness is recomputed on every call to
/// [`ConfigCollector::is_complete`].
#[derive(Clone, PartialEq, Eq)]
pub struct ConfigCollector {
    service: Service,
    prefix: String,
    config: IntegrationConfig,
    name: String,
}

impl ConfigCollector {
    /// Creates an empty collector for a service.
    #[must_use]
    pub fn new(service: Service) -> Self {
        let prefix = service.name_prefix();
        Self {
            service,
            name: prefix.clone(),
            prefix,
            config: IntegrationConfig::new(),
        }
    }

    /// Discards every value and starts over for `service`.
    pub fn reset(&mut self, service: Service) {
        *self = Self::new(service);
    }

    /// The service being configured.
    #[must_use]
    pub fn service(&self) -> Service {
        self.service
    }

    #[must_use]
    pub fn descriptor(&self) -> &'static ServiceDescriptor {
        descriptor_for(self.service)
    }

    /// Stores a field value. Any string is accepted.
    ///
    /// # Errors
    ///
    /// Returns [`DialogError::UnknownField`] if the active service has no
    /// field with this key.
    pub fn set_field(
        &mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<(), DialogError> {
        let key = key.into();
        if self.descriptor().field(&key).is_none() {
            return Err(DialogError::UnknownField {
                service: self.service.label().to_string(),
                key,
            });
        }
        self.config.insert(key, value.into());
        Ok(())
    }

    /// Returns a field value, if one was entered.
    #[must_use]
    pub fn field(&self, key: &str) -> Option<&str> {
        self.config.get(key).map(String::as_str)
    }

    #[must_use]
    pub fn config(&self) -> &IntegrationConfig {
        &self.config
    }

    /// Sets the name to the service prefix followed by `raw_suffix`.
    ///
    /// Returns `false` without changing anything when the service does not
    /// accept a name.
    pub fn set_name(&mut self, raw_suffix: &str) -> bool {
        if !self.service.accepts_name() {
            return false;
        }
        self.name = format!("{}{raw_suffix}", self.prefix);
        true
    }

    /// Applies the full contents of the name input after a free-form edit.
    ///
    /// If the edit damaged the prefix, the prefix is restored and the first
    /// `prefix` characters of the text are dropped as its remains, so the
    /// stored name keeps its prefix whatever the cursor did.
    pub fn edit_name_field(&mut self, text: &str) -> bool {
        let suffix = match text.strip_prefix(self.prefix.as_str()) {
            Some(suffix) => suffix.to_string(),
            None => text.chars().skip(self.prefix.chars().count()).collect(),
        };
        self.set_name(&suffix)
    }

    /// The full connection name, prefix included.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The part of the name after the prefix.
    #[must_use]
    pub fn name_suffix(&self) -> &str {
        &self.name[self.prefix.len()..]
    }

    /// Whether the form may be submitted.
    ///
    /// The demo service is always complete. Any other service needs every
    /// required field non-empty and a name suffix.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        if self.service == Service::Demo {
            return true;
        }
        let fields_filled = self
            .descriptor()
            .required_fields()
            .all(|field| self.field(field.key).is_some_and(|value| !value.is_empty()));

        fields_filled && !self.name_suffix().is_empty() && self.name != self.prefix
    }

    /// Keys of required fields that are still empty.
    #[must_use]
    pub fn missing_fields(&self) -> Vec<&'static str> {
        self.descriptor()
            .required_fields()
            .filter(|field| self.field(field.key).is_none_or(str::is_empty))
            .map(|field| field.key)
            .collect()
    }
}

impl fmt::Debug for ConfigCollector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let descriptor = self.descriptor();
        let config: BTreeMap<&str, &str> = self
            .config
            .iter()
            .map(|(key, value)| {
                let sensitive = descriptor
                    .field(key)
                    .is_some_and(|field| field.kind.is_sensitive());
                (key.as_str(), if sensitive { "<redacted>" } else { value.as_str() })
            })
            .collect();

        f.debug_struct("ConfigCollector")
            .field("service", &self.service)
            .field("name", &self.name)
            .field("config", &config)
            .finish()
    }
}
