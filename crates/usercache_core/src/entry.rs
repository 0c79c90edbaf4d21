//! The persisted entry shape.
//!
//! Every record in the cache is stored as:
//!
//! ```text
//! { user_id, metadata: { write_ts, read_ts?, type, key, plugin? }, data }
//! ```
//!
//! `data` is opaque to the cache and is never inspected.

use crate::error::CoreError;
use crate::query::TimeField;
use crate::record::MessageKind;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Opaque tenant (user) identifier.
///
/// All cache operations are scoped to exactly one tenant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TenantId(Uuid);

impl TenantId {
    /// Creates a new random tenant ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wraps an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for TenantId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TenantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for TenantId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// The class of a cache entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RecordType {
    /// Latest-value-wins, one per `(user_id, key)`.
    #[serde(rename = "document")]
    Document,
    /// Append-only client event.
    #[serde(rename = "message")]
    Message,
    /// Append-only sensor observation.
    #[serde(rename = "sensor-data")]
    SensorData,
    /// Append-only client-edited document.
    #[serde(rename = "rw-document")]
    RwDocument,
}

impl RecordType {
    /// The append-only classes returned by message reads.
    pub const MESSAGE_CLASSES: [RecordType; 3] = [
        RecordType::Message,
        RecordType::SensorData,
        RecordType::RwDocument,
    ];

    /// Returns the wire name of this type.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            RecordType::Document => "document",
            RecordType::Message => "message",
            RecordType::SensorData => "sensor-data",
            RecordType::RwDocument => "rw-document",
        }
    }

    /// Returns true for the append-only classes.
    #[must_use]
    pub const fn is_message_class(&self) -> bool {
        !matches!(self, RecordType::Document)
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecordType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "document" => Ok(RecordType::Document),
            "message" => Ok(RecordType::Message),
            "sensor-data" => Ok(RecordType::SensorData),
            "rw-document" => Ok(RecordType::RwDocument),
            other => Err(CoreError::UnknownRecordType(other.to_string())),
        }
    }
}

/// Entry metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    /// When the cache stored the entry (seconds since epoch).
    pub write_ts: f64,
    /// When the entry was last claimed by a reader.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub read_ts: Option<f64>,
    /// Record class.
    #[serde(rename = "type")]
    pub record_type: RecordType,
    /// Logical key, e.g. `background/location`.
    pub key: String,
    /// Producing plugin, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plugin: Option<String>,
}

impl Metadata {
    /// Returns the value of the given time field, if set.
    #[must_use]
    pub fn time(&self, field: TimeField) -> Option<f64> {
        match field {
            TimeField::WriteTs => Some(self.write_ts),
            TimeField::ReadTs => self.read_ts,
        }
    }
}

/// One stored record in a tenant's cache.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    /// Owning tenant.
    pub user_id: TenantId,
    /// Entry metadata.
    pub metadata: Metadata,
    /// Opaque payload.
    pub data: serde_json::Value,
}

impl Entry {
    /// Creates a document entry.
    pub fn document(
        user_id: TenantId,
        key: impl Into<String>,
        data: serde_json::Value,
        write_ts: f64,
    ) -> Self {
        Self {
            user_id,
            metadata: Metadata {
                write_ts,
                read_ts: None,
                record_type: RecordType::Document,
                key: key.into(),
                plugin: None,
            },
            data,
        }
    }

    /// Creates an unread message-class entry.
    pub fn message(
        user_id: TenantId,
        kind: MessageKind,
        key: impl Into<String>,
        data: serde_json::Value,
        write_ts: f64,
    ) -> Self {
        Self {
            user_id,
            metadata: Metadata {
                write_ts,
                read_ts: None,
                record_type: kind.into(),
                key: key.into(),
                plugin: None,
            },
            data,
        }
    }

    /// Sets the producing plugin.
    #[must_use]
    pub fn with_plugin(mut self, plugin: impl Into<String>) -> Self {
        self.metadata.plugin = Some(plugin.into());
        self
    }

    /// Returns the entry key.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.metadata.key
    }

    /// Returns the entry class.
    #[must_use]
    pub fn record_type(&self) -> RecordType {
        self.metadata.record_type
    }

    /// Returns true if this is a document entry.
    #[must_use]
    pub fn is_document(&self) -> bool {
        self.metadata.record_type == RecordType::Document
    }

    /// Returns true if a reader has claimed this entry.
    #[must_use]
    pub fn is_read(&self) -> bool {
        self.metadata.read_ts.is_some()
    }
}
