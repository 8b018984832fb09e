// crates/content-trash-core/src/core/mod.rs
// ============================================================================
// Module: Content Trash Core Types
// Description: Archive records, identifiers, attribute maps, and schema rules.
// Purpose: Provide stable, serializable types shared by every collaborator.
// Dependencies: serde, serde_json, time
// ============================================================================

//! ## Overview
//! Core types describe archived items and blocks, the open attribute maps that
//! carry schema-extension columns, the declarative block field families, and
//! the canonical time model. These types are the source of truth for the
//! archive backends and the CLI.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod attributes;
pub mod events;
pub mod fields;
pub mod identifiers;
pub mod records;
pub mod schema;
pub mod time;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use attributes::AttributeError;
pub use attributes::AttributeMap;
pub use attributes::Scalar;
pub use attributes::decode_attributes;
pub use attributes::encode_attributes;
pub use events::EventLevel;
pub use events::TrashEvent;
pub use fields::BlockFields;
pub use fields::FIELD_FAMILIES;
pub use fields::FieldFamily;
pub use fields::FieldKey;
pub use identifiers::ArchiveBlockId;
pub use identifiers::ArchiveItemId;
pub use identifiers::BlockId;
pub use identifiers::ItemId;
pub use identifiers::LocaleId;
pub use identifiers::Revision;
pub use records::BlockSnapshot;
pub use records::FixedAttributes;
pub use records::ItemSnapshot;
pub use records::PreDeleteNotice;
pub use records::PublishStatus;
pub use records::TrashedBlock;
pub use records::TrashedBlockMeta;
pub use records::TrashedItem;
pub use records::TrashedItemSummary;
pub use schema::SchemaContext;
pub use schema::SchemaError;
pub use schema::TableKind;
pub use schema::TableSchema;
pub use schema::extension_columns;
pub use time::Timestamp;
pub use time::normalize_datetime;
