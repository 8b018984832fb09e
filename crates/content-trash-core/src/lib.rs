// crates/content-trash-core/src/lib.rs
// ============================================================================
// Module: Content Trash Core Library
// Description: Public API surface for the content trash engine.
// Purpose: Expose archive records, collaborator interfaces, and runtime engine.
// Dependencies: crate::{core, interfaces, runtime}
// ============================================================================

//! ## Overview
//! Content trash captures hierarchical, versioned, multi-locale content items
//! into a durable archive right before the host deletes them, restores them
//! back into live storage on request, and purges aged archive entries. The
//! core is backend-agnostic and talks to storage, caches, and logging only
//! through the traits in [`interfaces`].

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod core;
pub mod interfaces;
pub mod runtime;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use core::*;

pub use interfaces::ArchiveError;
pub use interfaces::ArchiveStore;
pub use interfaces::CacheError;
pub use interfaces::ClaimOutcome;
pub use interfaces::Clock;
pub use interfaces::ContentCache;
pub use interfaces::ContentRepository;
pub use interfaces::OrderingSpace;
pub use interfaces::RepositoryError;
pub use interfaces::TrashEventSink;
pub use runtime::AdminContext;
pub use runtime::AdminError;
pub use runtime::BlockError;
pub use runtime::CacheRequest;
pub use runtime::CaptureReport;
pub use runtime::CaptureStatus;
pub use runtime::DEFAULT_RETENTION_DAYS;
pub use runtime::FileEventSink;
pub use runtime::FixedClock;
pub use runtime::InMemoryArchiveStore;
pub use runtime::InMemoryContentRepository;
pub use runtime::ItemSource;
pub use runtime::MemoryEventSink;
pub use runtime::NoopContentCache;
pub use runtime::NoopEventSink;
pub use runtime::PurgeOutcome;
pub use runtime::RETENTION_CHOICES;
pub use runtime::ReaperError;
pub use runtime::RecordingContentCache;
pub use runtime::RestoreError;
pub use runtime::RestoreResult;
pub use runtime::RestoreWarning;
pub use runtime::StderrEventSink;
pub use runtime::SystemClock;
pub use runtime::TrashEngine;
pub use runtime::TrashEngineConfig;
pub use runtime::is_retention_choice;
