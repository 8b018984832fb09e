// crates/content-trash-core/src/core/identifiers.rs
// ============================================================================
// Module: Content Trash Identifiers
// Description: Strongly typed integer identifiers for live and archived rows.
// Purpose: Keep live ids, archive ids, and locale ids from being mixed up.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Live content and the archive both key rows by integers. Wrapping them in
//! distinct newtypes stops an archive id from being passed where a live item
//! id is expected. Identifiers serialize as bare integers.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Identifier Types
// ============================================================================

/// Declares an integer identifier newtype with the shared accessor surface.
macro_rules! integer_identifier {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Creates a new identifier from its raw integer value.
            #[must_use]
            pub const fn new(value: i64) -> Self {
                Self(value)
            }

            /// Returns the raw integer value.
            #[must_use]
            pub const fn get(self) -> i64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }

        impl From<i64> for $name {
            fn from(value: i64) -> Self {
                Self::new(value)
            }
        }
    };
}

integer_identifier!(
    /// Live content item identifier. Shared by every locale row of one item.
    ItemId
);

integer_identifier!(
    /// Host locale (language variant) identifier.
    LocaleId
);

integer_identifier!(
    /// Live content block identifier.
    BlockId
);

integer_identifier!(
    /// Archive row identifier for a trashed item.
    ArchiveItemId
);

integer_identifier!(
    /// Archive row identifier for a trashed block.
    ArchiveBlockId
);

impl ItemId {
    /// The root container. Items restored without a surviving parent land here.
    pub const ROOT: Self = Self(0);

    /// Returns true when this id denotes the root container.
    #[must_use]
    pub const fn is_root(self) -> bool {
        self.0 <= 0
    }
}

/// Content revision of a block.
///
/// # Invariants
/// - `0` is the published revision and `1` the working copy. Other values are
///   carried through unchanged so archives taken by newer hosts still restore.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Revision(i64);

impl Revision {
    /// Published (live) revision.
    pub const LIVE: Self = Self(0);
    /// Working copy revision, present only when host versioning is active.
    pub const WORKING: Self = Self(1);

    /// Creates a revision from its raw value.
    #[must_use]
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    /// Returns the raw revision value.
    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }

    /// Returns the revisions captured for a host.
    #[must_use]
    pub fn captured(versioning_enabled: bool) -> Vec<Self> {
        if versioning_enabled { vec![Self::LIVE, Self::WORKING] } else { vec![Self::LIVE] }
    }
}

impl fmt::Display for Revision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
