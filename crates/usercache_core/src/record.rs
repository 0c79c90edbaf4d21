//! Tagged view over entries.
//!
//! [`Entry`] mirrors the persisted layout, where `read_ts` is meaningless for
//! documents. [`CacheRecord`] separates the two classes so callers can match on
//! the single-slot vs. append-only distinction.

use crate::entry::{Entry, Metadata, RecordType, TenantId};
use crate::error::CoreError;
use serde_json::Value;
use std::str::FromStr;

/// The append-only record classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKind {
    /// Client event.
    Message,
    /// Sensor observation.
    SensorData,
    /// Client-edited document.
    RwDocument,
}

impl MessageKind {
    /// Returns the kind for a record type, or `None` for documents.
    #[must_use]
    pub const fn from_record_type(record_type: RecordType) -> Option<Self> {
        match record_type {
            RecordType::Document => None,
            RecordType::Message => Some(MessageKind::Message),
            RecordType::SensorData => Some(MessageKind::SensorData),
            RecordType::RwDocument => Some(MessageKind::RwDocument),
        }
    }
}

impl From<MessageKind> for RecordType {
    fn from(kind: MessageKind) -> Self {
        match kind {
            MessageKind::Message => RecordType::Message,
            MessageKind::SensorData => RecordType::SensorData,
            MessageKind::RwDocument => RecordType::RwDocument,
        }
    }
}

impl FromStr for MessageKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let record_type: RecordType = s.parse()?;
        Self::from_record_type(record_type).ok_or(CoreError::UnknownRecordType(s.to_string()))
    }
}

/// A cache entry split by class.
#[derive(Debug, Clone, PartialEq)]
pub enum CacheRecord {
    /// Current server-pushed state for a key.
    Document {
        /// Document key.
        key: String,
        /// Latest value.
        value: Value,
        /// Time of the last write.
        written_at: f64,
    },
    /// Client-pushed observation.
    Message {
        /// Message key.
        key: String,
        /// Message class.
        kind: MessageKind,
        /// Opaque payload.
        payload: Value,
        /// Producing plugin.
        plugin: Option<String>,
        /// Time the cache stored the message.
        written_at: f64,
        /// Time of the last claim, if any.
        read_at: Option<f64>,
    },
}

impl CacheRecord {
    /// Returns the record key.
    #[must_use]
    pub fn key(&self) -> &str {
        match self {
            CacheRecord::Document { key, .. } | CacheRecord::Message { key, .. } => key,
        }
    }

    /// Converts back into the persisted shape for `user_id`.
    #[must_use]
    pub fn into_entry(self, user_id: TenantId) -> Entry {
        match self {
            CacheRecord::Document {
                key,
                value,
                written_at,
            } => Entry::document(user_id, key, value, written_at),
            CacheRecord::Message {
                key,
                kind,
                payload,
                plugin,
                written_at,
                read_at,
            } => Entry {
                user_id,
                metadata: Metadata {
                    write_ts: written_at,
                    read_ts: read_at,
                    record_type: kind.into(),
                    key,
                    plugin,
                },
                data: payload,
            },
        }
    }
}

impl From<Entry> for CacheRecord {
    fn from(entry: Entry) -> Self {
        let Metadata {
            write_ts,
            read_ts,
            record_type,
            key,
            plugin,
        } = entry.metadata;

        match MessageKind::from_record_type(record_type) {
            None => CacheRecord::Document {
                key,
                value: entry.data,
                written_at: write_ts,
            },
            Some(kind) => CacheRecord::Message {
                key,
                kind,
                payload: entry.data,
                plugin,
                written_at: write_ts,
                read_at: read_ts,
            },
        }
    }
}

impl Entry {
    /// Returns the tagged view of this entry.
    #[must_use]
    pub fn record(&self) -> CacheRecord {
        CacheRecord::from(self.clone())
    }
}
