//! Time intervals and free-slot extraction.
//!
//! This module provides:
//! - `Interval`, a validated half-open time range
//! - Free-interval extraction between busy calendar events

mod gap;
mod interval;

pub use gap::{find_free_slot, FreeIntervalExtractor, GapBoundary};
pub use interval::Interval;
