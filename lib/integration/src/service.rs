//! The closed catalog of connectable services.
//!
//! Each [`Service`] resolves to exactly one static [`ServiceDescriptor`]
//! describing its label, logo and the ordered set of configuration fields
//! the connection form must collect.

use crate::error::ParseServiceError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A data service an integration can be connected to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Service {
    Postgres,
    Snowflake,
    #[serde(rename = "MySQL")]
    MySql,
    Redshift,
    #[serde(rename = "MariaDB")]
    MariaDb,
    BigQuery,
    S3,
    /// The built-in demo database. It needs no configuration.
    #[serde(rename = "Aqueduct Demo")]
    Demo,
}

impl Service {
    /// Every service, in the order the service picker lists them.
    pub const ALL: [Self; 8] = [
        Self::Postgres,
        Self::Snowflake,
        Self::MySql,
        Self::Redshift,
        Self::MariaDb,
        Self::BigQuery,
        Self::S3,
        Self::Demo,
    ];

    /// Display label, also used as the wire name.
    #[must_use]
    pub const fn label(self) -> &'static str {
        descriptor_for(self).label
    }

    /// The immutable prefix every connection name for this service carries.
    #[must_use]
    pub fn name_prefix(self) -> String {
        format!("{}/", self.label())
    }

    /// Whether the connection form collects a name for this service.
    #[must_use]
    pub const fn accepts_name(self) -> bool {
        !matches!(self, Self::Demo)
    }
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Service {
    type Err = ParseServiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|service| service.label() == s)
            .ok_or_else(|| ParseServiceError {
                label: s.to_string(),
            })
    }
}

/// How a configuration value is entered and displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Text,
    /// Masked on entry and redacted from debug output.
    Secret,
    Numeric,
    /// A path to a local file whose contents become the value. The
    /// contents are typically a credential, so they are redacted too.
    FilePath,
}

impl FieldKind {
    /// Whether values of this kind must never appear in logs.
    #[must_use]
    pub const fn is_sensitive(self) -> bool {
        matches!(self, Self::Secret | Self::FilePath)
    }
}

/// One configuration field of a service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    /// Key under which the value is sent to the backend.
    pub key: &'static str,
    /// Label shown next to the input.
    pub label: &'static str,
    pub kind: FieldKind,
    /// Whether the form is incomplete while this field is empty.
    pub required: bool,
}

impl FieldSpec {
    const fn required(key: &'static str, label: &'static str, kind: FieldKind) -> Self {
        Self {
            key,
            label,
            kind,
            required: true,
        }
    }

    const fn optional(key: &'static str, label: &'static str, kind: FieldKind) -> Self {
        Self {
            key,
            label,
            kind,
            required: false,
        }
    }
}

/// Static metadata of a service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceDescriptor {
    pub service: Service,
    pub label: &'static str,
    /// Logo asset reference.
    pub logo: &'static str,
    /// Configuration fields, in form order.
    pub fields: &'static [FieldSpec],
}

impl ServiceDescriptor {
    /// Looks up a field by key.
    #[must_use]
    pub fn field(&self, key: &str) -> Option<&'static FieldSpec> {
        self.fields.iter().find(|field| field.key == key)
    }

    /// Fields that must be non-empty for the form to be complete.
    pub fn required_fields(&self) -> impl Iterator<Item = &'static FieldSpec> {
        self.fields.iter().filter(|field| field.required)
    }
}

const HOST_DATABASE_FIELDS: &[FieldSpec] = &[
    FieldSpec::required("host", "Host", FieldKind::Text),
    FieldSpec::required("port", "Port", FieldKind::Numeric),
    FieldSpec::required("database", "Database", FieldKind::Text),
    FieldSpec::required("username", "Username", FieldKind::Text),
    FieldSpec::required("password", "Password", FieldKind::Secret),
];

const SNOWFLAKE_FIELDS: &[FieldSpec] = &[
    FieldSpec::required("account_identifier", "Account Identifier", FieldKind::Text),
    FieldSpec::required("warehouse", "Warehouse", FieldKind::Text),
    FieldSpec::required("database", "Database", FieldKind::Text),
    FieldSpec::optional("schema", "Schema", FieldKind::Text),
    FieldSpec::required("username", "Username", FieldKind::Text),
    FieldSpec::required("password", "Password", FieldKind::Secret),
];

const BIGQUERY_FIELDS: &[FieldSpec] = &[
    FieldSpec::required("project_id", "Project ID", FieldKind::Text),
    FieldSpec::required(
        "service_account_credentials",
        "Service Account Credentials",
        FieldKind::FilePath,
    ),
];

const S3_FIELDS: &[FieldSpec] = &[
    FieldSpec::required("bucket", "Bucket", FieldKind::Text),
    FieldSpec::required("access_key_id", "Access Key ID", FieldKind::Text),
    FieldSpec::required("secret_access_key", "Secret Access Key", FieldKind::Secret),
];

const fn descriptor(
    service: Service,
    label: &'static str,
    logo: &'static str,
    fields: &'static [FieldSpec],
) -> ServiceDescriptor {
    ServiceDescriptor {
        service,
        label,
        logo,
        fields,
    }
}

static POSTGRES: ServiceDescriptor = descriptor(
    Service::Postgres,
    "Postgres",
    "/assets/logos/postgres.png",
    HOST_DATABASE_FIELDS,
);
static SNOWFLAKE: ServiceDescriptor = descriptor(
    Service::Snowflake,
    "Snowflake",
    "/assets/logos/snowflake.png",
    SNOWFLAKE_FIELDS,
);
static MYSQL: ServiceDescriptor = descriptor(
    Service::MySql,
    "MySQL",
    "/assets/logos/mysql.png",
    HOST_DATABASE_FIELDS,
);
static REDSHIFT: ServiceDescriptor = descriptor(
    Service::Redshift,
    "Redshift",
    "/assets/logos/redshift.png",
    HOST_DATABASE_FIELDS,
);
static MARIADB: ServiceDescriptor = descriptor(
    Service::MariaDb,
    "MariaDB",
    "/assets/logos/mariadb.png",
    HOST_DATABASE_FIELDS,
);
static BIGQUERY: ServiceDescriptor = descriptor(
    Service::BigQuery,
    "BigQuery",
    "/assets/logos/bigquery.png",
    BIGQUERY_FIELDS,
);
static S3: ServiceDescriptor = descriptor(Service::S3, "S3", "/assets/logos/s3.png", S3_FIELDS);
static DEMO: ServiceDescriptor = descriptor(
    Service::Demo,
    "Aqueduct Demo",
    "/assets/logos/demo.png",
    &[],
);

/// Returns the descriptor of a service.
#[must_use]
pub const fn descriptor_for(service: Service) -> &'static ServiceDescriptor {
    match service {
        Service::Postgres => &POSTGRES,
        Service::Snowflake => &SNOWFLAKE,
        Service::MySql => &MYSQL,
        Service::Redshift => &REDSHIFT,
        Service::MariaDb => &MARIADB,
        Service::BigQuery => &BIGQUERY,
        Service::S3 => &S3,
        Service::Demo => &DEMO,
    }
}
