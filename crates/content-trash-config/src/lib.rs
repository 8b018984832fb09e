// crates/content-trash-config/src/lib.rs
// ============================================================================
// Module: Content Trash Config Library
// Description: Canonical config model, loading, and validation.
// Purpose: Single source of truth for content-trash.toml semantics.
// Dependencies: content-trash-core, content-trash-store-sqlite, serde, toml
// ============================================================================

//! ## Overview
//! `content-trash-config` defines the configuration model for the content
//! trash tooling. Loading is strict and fail-closed: unknown keys, oversized
//! files, and out-of-range values are rejected with the offending key named.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;
pub mod examples;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::*;
pub use examples::config_toml_example;
