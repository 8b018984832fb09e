// crates/content-trash-core/src/core/events.rs
// ============================================================================
// Module: Content Trash Events
// Description: Structured log events emitted by the trash engine.
// Purpose: Record every swallowed or surfaced failure and every completed action.
// Dependencies: crate::core::time, serde
// ============================================================================

//! ## Overview
//! Events are flat, serializable records written as one JSON line each by a
//! [`TrashEventSink`](crate::interfaces::TrashEventSink). Deployments route
//! them to whatever log pipeline they use.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Serialize;

use crate::core::time::Timestamp;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Event severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EventLevel {
    /// Normal operation.
    Info,
    /// Tolerated failure; processing continued.
    Warn,
    /// Operation failed.
    Error,
}

/// Trash engine event payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrashEvent {
    /// Event identifier, e.g. `capture_block_failed`.
    pub event: &'static str,
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: i64,
    /// Severity.
    pub level: EventLevel,
    /// Operation label (`capture`, `restore`, `purge`, `admin`).
    pub operation: &'static str,
    /// Archive item id when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub archive_id: Option<i64>,
    /// Live item id when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_id: Option<i64>,
    /// Locale when the event concerns one locale.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locale: Option<i64>,
    /// Revision when the event concerns one revision.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revision: Option<i64>,
    /// Human-readable detail.
    pub message: String,
}

impl TrashEvent {
    /// Creates an event with no identifiers attached.
    #[must_use]
    pub fn new(
        event: &'static str,
        level: EventLevel,
        operation: &'static str,
        at: Timestamp,
        message: impl Into<String>,
    ) -> Self {
        Self {
            event,
            timestamp_ms: at.unix_millis(),
            level,
            operation,
            archive_id: None,
            item_id: None,
            locale: None,
            revision: None,
            message: message.into(),
        }
    }

    /// Attaches an archive item id.
    #[must_use]
    pub const fn with_archive_id(mut self, archive_id: i64) -> Self {
        self.archive_id = Some(archive_id);
        self
    }

    /// Attaches a live item id.
    #[must_use]
    pub const fn with_item_id(mut self, item_id: i64) -> Self {
        self.item_id = Some(item_id);
        self
    }

    /// Attaches a locale and revision.
    #[must_use]
    pub const fn with_scope(mut self, locale: i64, revision: i64) -> Self {
        self.locale = Some(locale);
        self.revision = Some(revision);
        self
    }
}
