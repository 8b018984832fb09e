// crates/content-trash-core/src/runtime/clock.rs
// ============================================================================
// Module: Content Trash Clocks
// Description: System and fixed clock implementations.
// Purpose: Supply "now" to the engine without reading wall time in core logic.
// Dependencies: crate::{core, interfaces}, time
// ============================================================================

//! ## Overview
//! [`SystemClock`] reads UTC wall time. [`FixedClock`] returns a settable
//! instant so retention boundaries and canonical dates are reproducible in
//! tests.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::atomic::AtomicI64;
use std::sync::atomic::Ordering;

use ::time::OffsetDateTime;

use crate::core::time::Timestamp;
use crate::interfaces::Clock;

// ============================================================================
// SECTION: Clocks
// ============================================================================

/// UTC wall clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Timestamp::from_unix_seconds(OffsetDateTime::now_utc().unix_timestamp())
    }
}

/// Manually driven clock.
#[derive(Debug, Default)]
pub struct FixedClock {
    /// Current unix seconds.
    seconds: AtomicI64,
}

impl FixedClock {
    /// Creates a clock frozen at `now`.
    #[must_use]
    pub const fn new(now: Timestamp) -> Self {
        Self {
            seconds: AtomicI64::new(now.unix_seconds()),
        }
    }

    /// Moves the clock to `now`.
    pub fn set(&self, now: Timestamp) {
        self.seconds.store(now.unix_seconds(), Ordering::SeqCst);
    }

    /// Moves the clock forward by `seconds`.
    pub fn advance(&self, seconds: i64) {
        self.seconds.fetch_add(seconds, Ordering::SeqCst);
    }
}

impl Clock for FixedClock {
    fn now(&self) -> Timestamp {
        Timestamp::from_unix_seconds(self.seconds.load(Ordering::SeqCst))
    }
}
