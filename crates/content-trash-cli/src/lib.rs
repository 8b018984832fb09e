// crates/content-trash-cli/src/lib.rs
// ============================================================================
// Module: Content Trash CLI Library
// Description: Shared helpers for the content trash command-line interface.
// Purpose: Provide reusable components (i18n, rendering) for the binary and tests.
// Dependencies: content-trash-core, serde
// ============================================================================

//! ## Overview
//! This library houses the message catalog and the pure rendering helpers
//! used by the `content-trash` binary (`src/main.rs`), so every line of
//! output is produced in one place and can be tested without a database.

// ============================================================================
// SECTION: Modules
// ============================================================================

/// Internationalization helpers and message catalog.
pub mod i18n;
/// Rendering of listings and operation outcomes.
pub mod render;
