use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use strum::{Display, EnumIter, EnumString};
use uuid::Uuid;

/// Severity level of a log record.
///
/// Variant order is the severity order, so comparison operators on the
/// `level` field compare by severity rather than alphabetically.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    EnumString,
    EnumIter,
    Display,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
    Critical,
}

/// A single structured log record.
///
/// Records are created by the ingestion pipeline, never mutated, and removed
/// only by retention policy. This crate treats them as read-only views served
/// by the backing store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogRecord {
    /// Unique identifier
    pub id: Uuid,

    /// Ingestion timestamp; default sort key for search results
    pub timestamp: DateTime<Utc>,

    /// Severity level
    pub level: LogLevel,

    /// Emitting service
    pub service: String,

    /// Free-text message
    pub message: String,

    /// User associated with the request, if any
    pub user_id: Option<String>,

    /// Request correlation identifier, if any
    pub request_id: Option<String>,

    /// Flat string-keyed metadata
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

impl LogRecord {
    /// Create a new record stamped with the current time.
    pub fn new(level: LogLevel, service: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            level,
            service: service.into(),
            message: message.into(),
            user_id: None,
            request_id: None,
            metadata: HashMap::new(),
        }
    }

    /// Override the ingestion timestamp.
    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Attach a user id.
    pub fn with_user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    /// Attach a request id.
    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = Some(request_id.into());
        self
    }

    /// Attach a metadata entry.
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}
