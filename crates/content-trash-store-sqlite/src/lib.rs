// crates/content-trash-store-sqlite/src/lib.rs
// ============================================================================
// Module: Content Trash SQLite Store
// Description: Durable archive store and host content repository on SQLite.
// Purpose: Provide production persistence for the content trash engine.
// Dependencies: content-trash-core, rusqlite
// ============================================================================

//! ## Overview
//! This crate provides a SQLite-backed [`ArchiveStore`] holding trashed
//! items, blocks, and block meta, and a [`ContentRepository`] over the host's
//! live content tables. Both share one [`SqliteDatabase`] connection so a
//! single file can hold the host and the archive. Stored archive payloads
//! are untrusted and decoded fail-closed.
//!
//! [`ArchiveStore`]: content_trash_core::ArchiveStore
//! [`ContentRepository`]: content_trash_core::ContentRepository

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod archive;
pub mod content;
pub mod store;
mod value;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use archive::SqliteArchiveStore;
pub use archive::drop_archive_schema;
pub use content::SqliteContentRepository;
pub use content::install_host_schema;
pub use store::SqliteDatabase;
pub use store::SqliteStoreConfig;
pub use store::SqliteStoreError;
pub use store::SqliteStoreMode;
pub use store::SqliteSyncMode;
