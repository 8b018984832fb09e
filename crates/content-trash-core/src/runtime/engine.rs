// crates/content-trash-core/src/runtime/engine.rs
// ============================================================================
// Module: Content Trash Engine
// Description: Engine wiring shared by capture, restore, purge, and admin actions.
// Purpose: Hold collaborators and configuration for every trash operation.
// Dependencies: crate::{core, interfaces}, thiserror
// ============================================================================

//! ## Overview
//! The engine is generic over its archive store, content repository, and
//! content cache so backends are resolved statically. The clock and event
//! sink are shared trait objects because the CLI picks them from config at
//! runtime.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use thiserror::Error;

use crate::core::events::EventLevel;
use crate::core::events::TrashEvent;
use crate::core::identifiers::LocaleId;
use crate::core::identifiers::Revision;
use crate::core::time::Timestamp;
use crate::interfaces::ArchiveStore;
use crate::interfaces::Clock;
use crate::interfaces::ContentCache;
use crate::interfaces::ContentRepository;
use crate::interfaces::TrashEventSink;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default login recorded on restored rows.
pub const DEFAULT_OPERATOR: &str = "content-trash";
/// Default age after which a restore claim may be taken over.
pub const DEFAULT_CLAIM_TTL_SECS: i64 = 600;
/// Default path of items restored under the root container.
pub const DEFAULT_ROOT_PATH: &str = "|";
/// Default template for restored items with no archived template.
pub const DEFAULT_TEMPLATE_ID: i64 = 1;

// ============================================================================
// SECTION: Config
// ============================================================================

/// Engine configuration.
///
/// # Invariants
/// - `claim_ttl_secs` is positive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrashEngineConfig {
    /// Login recorded as create/update user when none is archived.
    pub operator: String,
    /// Seconds after which an abandoned restore claim may be taken over.
    pub claim_ttl_secs: i64,
    /// Path assigned to items restored under the root container.
    pub root_path: String,
    /// Template assigned when the archive carries none.
    pub default_template_id: i64,
}

impl Default for TrashEngineConfig {
    fn default() -> Self {
        Self {
            operator: DEFAULT_OPERATOR.to_string(),
            claim_ttl_secs: DEFAULT_CLAIM_TTL_SECS,
            root_path: DEFAULT_ROOT_PATH.to_string(),
            default_template_id: DEFAULT_TEMPLATE_ID,
        }
    }
}

// ============================================================================
// SECTION: Per-Block Errors
// ============================================================================

/// Failure of one block during capture or restore.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("block #{position} (locale {locale}, revision {revision}): {message}")]
pub struct BlockError {
    /// Locale of the block group.
    pub locale: LocaleId,
    /// Revision of the block group.
    pub revision: Revision,
    /// One-based position of the block in its group.
    pub position: usize,
    /// Underlying failure.
    pub message: String,
}

impl BlockError {
    /// Creates a block error.
    #[must_use]
    pub fn new(
        locale: LocaleId,
        revision: Revision,
        position: usize,
        message: impl Into<String>,
    ) -> Self {
        Self {
            locale,
            revision,
            position,
            message: message.into(),
        }
    }
}

// ============================================================================
// SECTION: Engine
// ============================================================================

/// Trash engine over an archive store, a content repository, and a cache.
pub struct TrashEngine<A, R, C> {
    /// Engine configuration.
    pub(crate) config: TrashEngineConfig,
    /// Archive store.
    pub(crate) archive: A,
    /// Live content repository.
    pub(crate) repository: R,
    /// Render cache.
    pub(crate) cache: C,
    /// Event sink.
    pub(crate) events: Arc<dyn TrashEventSink>,
    /// Time source.
    pub(crate) clock: Arc<dyn Clock>,
}

impl<A, R, C> TrashEngine<A, R, C>
where
    A: ArchiveStore,
    R: ContentRepository,
    C: ContentCache,
{
    /// Creates a new trash engine.
    #[must_use]
    pub fn new(
        config: TrashEngineConfig,
        archive: A,
        repository: R,
        cache: C,
        events: Arc<dyn TrashEventSink>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            config,
            archive,
            repository,
            cache,
            events,
            clock,
        }
    }

    /// Returns the engine configuration.
    #[must_use]
    pub const fn config(&self) -> &TrashEngineConfig {
        &self.config
    }

    /// Returns the archive store.
    #[must_use]
    pub const fn archive(&self) -> &A {
        &self.archive
    }

    /// Returns the content repository.
    #[must_use]
    pub const fn repository(&self) -> &R {
        &self.repository
    }

    /// Returns the content cache.
    #[must_use]
    pub const fn cache(&self) -> &C {
        &self.cache
    }

    /// Returns the current time from the engine clock.
    #[must_use]
    pub fn now(&self) -> Timestamp {
        self.clock.now()
    }

    /// Records an event on the sink.
    pub(crate) fn emit(&self, event: &TrashEvent) {
        self.events.record(event);
    }

    /// Builds an event stamped with the engine clock.
    pub(crate) fn event(
        &self,
        event: &'static str,
        level: EventLevel,
        operation: &'static str,
        message: impl Into<String>,
    ) -> TrashEvent {
        TrashEvent::new(event, level, operation, self.clock.now(), message)
    }
}
