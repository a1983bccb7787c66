//! Backup target domain model
//!
//! A [`Target`] is one database instance registered with the control plane for
//! periodic backup. Targets arrive from the catalog as JSON and stay immutable
//! for the duration of a run.

use crate::config::{SecretString, SecretValue};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Engine kind of a target
///
/// The kind uniquely selects the engine adapter that backs the target up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetKind {
    /// Document store (MongoDB)
    Mongo,
    /// Wide-column store (Cassandra / ScyllaDB)
    Cassandra,
    /// Relational engine, registered but without a working adapter
    Mysql,
    /// Any kind the catalog reports that this build does not know
    #[serde(other)]
    Unknown,
}

impl TargetKind {
    /// Wire name of the kind
    pub fn as_str(&self) -> &'static str {
        match self {
            TargetKind::Mongo => "mongo",
            TargetKind::Cassandra => "cassandra",
            TargetKind::Mysql => "mysql",
            TargetKind::Unknown => "unknown",
        }
    }
}

impl fmt::Display for TargetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A database instance due for backup
///
/// The credential is held as a [`SecretString`]; its `Debug` output is
/// redacted and it is zeroized on drop. `Target` deliberately does not
/// implement `Serialize`: anything leaving the process uses [`RedactedTarget`].
#[derive(Debug, Clone, Deserialize)]
pub struct Target {
    /// Control plane identifier
    pub id: String,

    /// Engine kind
    #[serde(rename = "type")]
    pub kind: TargetKind,

    /// Comma-separated address list
    #[serde(rename = "ip")]
    pub address: String,

    /// Port for addresses that do not carry their own
    #[serde(default, deserialize_with = "null_as_default")]
    pub port: u16,

    /// Human readable, unique name; used as a path component
    pub name: String,

    /// Backup interval as configured in the control plane
    #[serde(default, deserialize_with = "null_as_default")]
    pub interval: i64,

    /// Username for authentication
    #[serde(default, deserialize_with = "null_as_default")]
    pub username: String,

    /// Password for authentication
    #[serde(default = "empty_secret", deserialize_with = "null_as_empty_secret")]
    pub password: SecretString,

    /// Database (document store) or keyspace (wide-column store)
    #[serde(default, deserialize_with = "null_as_default")]
    pub database: String,

    /// Auxiliary authentication database
    #[serde(
        default,
        rename = "authenticationDatabase",
        deserialize_with = "empty_as_none"
    )]
    pub authentication_database: Option<String>,
}

impl Target {
    /// Returns a builder for constructing a target
    pub fn builder() -> TargetBuilder {
        TargetBuilder::default()
    }

    /// Endpoints from the address list, in configured order
    ///
    /// An entry may carry its own port (`host:port`, `[v6]:port`); entries
    /// without one use the target's port, unless that is `0`.
    pub fn endpoints(&self) -> Vec<Endpoint> {
        let fallback = (self.port != 0).then_some(self.port);
        self.address
            .split(',')
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .map(|entry| Endpoint::parse(entry, fallback))
            .collect()
    }

    /// First endpoint of the address list
    pub fn primary_endpoint(&self) -> Option<Endpoint> {
        self.endpoints().into_iter().next()
    }

    /// Host names from the address list, ports stripped
    pub fn hosts(&self) -> Vec<String> {
        self.endpoints().into_iter().map(|e| e.host).collect()
    }

    /// Copy of this target that is safe to serialize and report
    pub fn redacted(&self) -> RedactedTarget {
        RedactedTarget {
            id: self.id.clone(),
            kind: self.kind,
            address: self.address.clone(),
            port: self.port,
            name: self.name.clone(),
            interval: self.interval,
            username: self.username.clone(),
            password: self.password.expose_secret().len().to_string(),
            database: self.database.clone(),
            authentication_database: self.authentication_database.clone(),
        }
    }
}

/// One entry of a target's address list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub host: String,
    pub port: Option<u16>,
}

impl Endpoint {
    fn parse(entry: &str, fallback: Option<u16>) -> Self {
        if let Some((host, port)) = entry.rsplit_once(':') {
            // Bare IPv6 literals contain colons but no port
            let plain = !host.contains(':') || (host.starts_with('[') && host.ends_with(']'));
            if let (true, Ok(port)) = (plain, port.parse::<u16>()) {
                return Self {
                    host: host.trim_start_matches('[').trim_end_matches(']').to_string(),
                    port: Some(port),
                };
            }
        }
        Self {
            host: entry.to_string(),
            port: fallback,
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.port {
            Some(port) if self.host.contains(':') => {
                write!(f, "[{}]:{}", self.host, port)
            }
            Some(port) => write!(f, "{}:{}", self.host, port),
            None => f.write_str(&self.host),
        }
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn empty_secret() -> SecretString {
    Secret::new(SecretValue::from(String::new()))
}

fn null_as_empty_secret<'de, D>(deserializer: D) -> Result<SecretString, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(Secret::new(SecretValue::from(value.unwrap_or_default())))
}

fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.is_empty()))
}

/// Target copy embedded in a backup record
///
/// Identical to [`Target`] except that `password` holds the decimal length of
/// the original credential instead of the credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedactedTarget {
    pub id: String,

    #[serde(rename = "type")]
    pub kind: TargetKind,

    #[serde(rename = "ip")]
    pub address: String,

    pub port: u16,

    pub name: String,

    pub interval: i64,

    pub username: String,

    /// Length of the credential, never the credential itself
    pub password: String,

    pub database: String,

    #[serde(
        rename = "authenticationDatabase",
        skip_serializing_if = "Option::is_none",
        default
    )]
    pub authentication_database: Option<String>,
}

/// Builder for constructing [`Target`] instances
#[derive(Debug, Default)]
pub struct TargetBuilder {
    id: Option<String>,
    kind: Option<TargetKind>,
    address: Option<String>,
    port: u16,
    name: Option<String>,
    interval: i64,
    username: String,
    password: Option<SecretString>,
    database: String,
    authentication_database: Option<String>,
}

impl TargetBuilder {
    /// Creates a new TargetBuilder
    pub fn new() -> Self {
        Self::default()
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn kind(mut self, kind: TargetKind) -> Self {
        self.kind = Some(kind);
        self
    }

    /// Sets the address list (comma-separated)
    pub fn address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn interval(mut self, interval: i64) -> Self {
        self.interval = interval;
        self
    }

    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.username = username.into();
        self
    }

    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(Secret::new(SecretValue::from(password.into())));
        self
    }

    pub fn database(mut self, database: impl Into<String>) -> Self {
        self.database = database.into();
        self
    }

    pub fn authentication_database(mut self, database: impl Into<String>) -> Self {
        self.authentication_database = Some(database.into());
        self
    }

    /// Builds the target
    ///
    /// # Errors
    ///
    /// Returns an error if `name`, `kind` or `address` is missing
    pub fn build(self) -> Result<Target, String> {
        let name = self.name.ok_or("name is required")?;
        Ok(Target {
            id: self.id.unwrap_or_else(|| name.clone()),
            kind: self.kind.ok_or("kind is required")?,
            address: self.address.ok_or("address is required")?,
            port: self.port,
            name,
            interval: self.interval,
            username: self.username,
            password: self.password.unwrap_or_else(empty_secret),
            database: self.database,
            authentication_database: self.authentication_database,
        })
    }
}
