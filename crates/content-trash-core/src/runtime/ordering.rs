// crates/content-trash-core/src/runtime/ordering.rs
// ============================================================================
// Module: Content Trash Ordering
// Description: Priority probing and block priority compaction.
// Purpose: Resolve ordering collisions deterministically on restore.
// Dependencies: crate::core
// ============================================================================

//! ## Overview
//! Restored items take the first free ordering key at or above the archived
//! one. Restored blocks are regrouped by (locale, revision) and renumbered
//! `1..n` in archived priority order, so archived gaps and duplicates never
//! reach live storage.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::collections::BTreeSet;

use crate::core::identifiers::LocaleId;
use crate::core::identifiers::Revision;
use crate::core::records::TrashedBlock;

// ============================================================================
// SECTION: Item Ordering
// ============================================================================

/// Returns the desired ordering key, treating non-positive values as `1`.
#[must_use]
pub const fn desired_priority(archived: i64) -> i64 {
    if archived < 1 { 1 } else { archived }
}

/// Returns the first key `>= desired` not in `taken`, or `None` on overflow.
#[must_use]
pub fn probe_priority(desired: i64, taken: &BTreeSet<i64>) -> Option<i64> {
    let mut candidate = desired;
    for value in taken.range(desired..) {
        if *value != candidate {
            break;
        }
        candidate = candidate.checked_add(1)?;
    }
    Some(candidate)
}

// ============================================================================
// SECTION: Block Groups
// ============================================================================

/// Groups archived blocks by (locale, revision), each group sorted by
/// archived priority. Ties keep archive order.
#[must_use]
pub fn group_blocks(blocks: &[TrashedBlock]) -> BTreeMap<(LocaleId, Revision), Vec<&TrashedBlock>> {
    let mut groups: BTreeMap<(LocaleId, Revision), Vec<&TrashedBlock>> = BTreeMap::new();
    for block in blocks {
        groups.entry((block.block.locale, block.block.revision)).or_default().push(block);
    }
    for group in groups.values_mut() {
        group.sort_by_key(|block| block.block.priority);
    }
    groups
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn probe_skips_contiguous_taken_run() {
        let taken = BTreeSet::from([1, 2, 3, 5]);
        assert_eq!(probe_priority(2, &taken), Some(4));
        assert_eq!(probe_priority(4, &taken), Some(4));
        assert_eq!(probe_priority(5, &taken), Some(6));
        assert_eq!(probe_priority(1, &BTreeSet::new()), Some(1));
    }

    #[test]
    fn probe_reports_overflow() {
        let taken = BTreeSet::from([i64::MAX]);
        assert_eq!(probe_priority(i64::MAX, &taken), None);
    }

    #[test]
    fn desired_priority_defaults_to_one() {
        assert_eq!(desired_priority(0), 1);
        assert_eq!(desired_priority(-3), 1);
        assert_eq!(desired_priority(7), 7);
    }
}
