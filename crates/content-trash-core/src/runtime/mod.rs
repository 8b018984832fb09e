// crates/content-trash-core/src/runtime/mod.rs
// ============================================================================
// Module: Content Trash Runtime
// Description: Capture, restore, purge, and admin operations plus reference collaborators.
// Purpose: Run the trash lifecycle against the interfaces in crate::interfaces.
// Dependencies: crate::{core, interfaces}
// ============================================================================

//! ## Overview
//! [`TrashEngine`] owns one archive store, one content repository, and one
//! content cache. Capture, restore, purge, and the admin actions are
//! implemented in their own submodules as `impl` blocks on the engine.
//! In-memory collaborators, clocks, and event sinks for tests, demos, and
//! the CLI live alongside.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod admin;
pub mod capture;
pub mod clock;
pub mod engine;
pub mod memory;
pub mod ordering;
pub mod reaper;
pub mod restore;
pub mod sinks;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use admin::AdminContext;
pub use admin::AdminError;
pub use capture::CaptureReport;
pub use capture::CaptureStatus;
pub use capture::ItemSource;
pub use clock::FixedClock;
pub use clock::SystemClock;
pub use engine::BlockError;
pub use engine::TrashEngine;
pub use engine::TrashEngineConfig;
pub use memory::CacheRequest;
pub use memory::InMemoryArchiveStore;
pub use memory::InMemoryContentRepository;
pub use memory::NoopContentCache;
pub use memory::RecordingContentCache;
pub use reaper::DEFAULT_RETENTION_DAYS;
pub use reaper::PurgeOutcome;
pub use reaper::RETENTION_CHOICES;
pub use reaper::ReaperError;
pub use reaper::is_retention_choice;
pub use restore::RestoreError;
pub use restore::RestoreResult;
pub use restore::RestoreWarning;
pub use sinks::FileEventSink;
pub use sinks::MemoryEventSink;
pub use sinks::NoopEventSink;
pub use sinks::StderrEventSink;
