// crates/content-trash-core/src/runtime/reaper.rs
// ============================================================================
// Module: Content Trash Retention Reaper
// Description: Purges archive entries older than a retention age.
// Purpose: Bound archive growth with an all-or-nothing scheduled purge.
// Dependencies: crate::{core, interfaces, runtime::engine}, thiserror
// ============================================================================

//! ## Overview
//! The reaper is invoked by an external scheduler with a maximum age in
//! days. A non-positive age disables it. Otherwise every entry with
//! `deleted_at` strictly before `now - days` is removed, with its blocks and
//! meta, inside one archive transaction.

// ============================================================================
// SECTION: Imports
// ============================================================================

use thiserror::Error;

use crate::core::events::EventLevel;
use crate::core::time::Timestamp;
use crate::interfaces::ArchiveError;
use crate::interfaces::ArchiveStore;
use crate::interfaces::ContentCache;
use crate::interfaces::ContentRepository;
use crate::runtime::engine::TrashEngine;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Operation label for purge events.
const OPERATION: &str = "purge";
/// Retention ages offered to schedulers, in days. Zero disables purging.
pub const RETENTION_CHOICES: [i64; 9] = [0, 1, 7, 14, 30, 60, 90, 180, 365];
/// Default retention age in days.
pub const DEFAULT_RETENTION_DAYS: i64 = 30;

/// Returns true when `days` is one of [`RETENTION_CHOICES`].
#[must_use]
pub fn is_retention_choice(days: i64) -> bool {
    RETENTION_CHOICES.contains(&days)
}

// ============================================================================
// SECTION: Types
// ============================================================================

/// Purge outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PurgeOutcome {
    /// Retention age was zero or negative; storage was not touched.
    Disabled,
    /// Entries older than `cutoff` were removed.
    Purged {
        /// Number of archive items removed.
        count: u64,
        /// Exclusive cutoff; entries deleted at or after it were kept.
        cutoff: Timestamp,
    },
}

impl PurgeOutcome {
    /// Returns the number of purged items.
    #[must_use]
    pub const fn count(self) -> u64 {
        match self {
            Self::Disabled => 0,
            Self::Purged {
                count, ..
            } => count,
        }
    }
}

/// Purge failures. The archive is unchanged when one is returned.
#[derive(Debug, Error)]
pub enum ReaperError {
    /// The retention age does not fit the clock range.
    #[error("retention age of {0} days is out of range")]
    AgeOutOfRange(i64),
    /// The purge transaction failed and was rolled back.
    #[error("purge transaction failed: {0}")]
    Transaction(#[from] ArchiveError),
}

// ============================================================================
// SECTION: Purge
// ============================================================================

impl<A, R, C> TrashEngine<A, R, C>
where
    A: ArchiveStore,
    R: ContentRepository,
    C: ContentCache,
{
    /// Purges entries older than `max_age_days`.
    ///
    /// # Errors
    ///
    /// Returns [`ReaperError`] when the age is out of range or the purge
    /// transaction fails.
    pub fn purge(&self, max_age_days: i64) -> Result<PurgeOutcome, ReaperError> {
        if max_age_days <= 0 {
            self.emit(&self.event("purge_disabled", EventLevel::Info, OPERATION, "retention disabled"));
            return Ok(PurgeOutcome::Disabled);
        }
        let cutoff = self
            .now()
            .checked_sub_days(max_age_days)
            .ok_or(ReaperError::AgeOutOfRange(max_age_days))?;
        match self.archive.purge_deleted_before(cutoff) {
            Ok(count) => {
                self.emit(&self.event(
                    "purge_completed",
                    EventLevel::Info,
                    OPERATION,
                    format!("{count} entries older than {cutoff} purged"),
                ));
                Ok(PurgeOutcome::Purged {
                    count,
                    cutoff,
                })
            }
            Err(err) => {
                self.emit(&self.event("purge_failed", EventLevel::Error, OPERATION, err.to_string()));
                Err(ReaperError::Transaction(err))
            }
        }
    }
}
