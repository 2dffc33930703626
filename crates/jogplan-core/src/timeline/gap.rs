//! Free-interval extraction between calendar events.
//!
//! Finds the gaps between busy intervals starting inside a window and
//! picks the earliest one that can hold a session.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::Interval;
use crate::error::ValidationError;

/// Where a gap between two busy intervals may end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GapBoundary {
    /// A gap runs up to the next busy interval even past the window end.
    /// Only the trailing gap stops at the window end.
    #[default]
    TrailingOnly,
    /// Every gap is cut at the window end; intervals starting after it are
    /// not walked.
    Window,
}

/// Extractor for free intervals of at least a minimum duration
#[derive(Debug, Clone, Copy)]
pub struct FreeIntervalExtractor {
    min_duration: Duration,
    boundary: GapBoundary,
}

impl FreeIntervalExtractor {
    /// Create an extractor for gaps of at least `min_duration`.
    pub fn new(min_duration: Duration) -> Result<Self, ValidationError> {
        if min_duration <= Duration::zero() {
            return Err(ValidationError::NonPositiveDuration {
                field: "min_duration".to_string(),
                minutes: min_duration.num_minutes(),
            });
        }
        Ok(Self {
            min_duration,
            boundary: GapBoundary::default(),
        })
    }

    pub fn with_boundary(mut self, boundary: GapBoundary) -> Self {
        self.boundary = boundary;
        self
    }

    pub fn min_duration(&self) -> Duration {
        self.min_duration
    }

    /// Find every free gap starting inside `window`.
    ///
    /// # Arguments
    /// * `busy` - Busy intervals, sorted ascending by start
    /// * `window` - Search window; gaps start at or after its start
    ///
    /// # Returns
    /// Gaps in ascending order, each at least `min_duration` long. With
    /// `GapBoundary::Window` every gap is contained in `window`.
    pub fn free_intervals(
        &self,
        busy: &[Interval],
        window: Interval,
    ) -> Result<Vec<Interval>, ValidationError> {
        if let Some(index) = first_unsorted(busy) {
            return Err(ValidationError::UnsortedIntervals { index });
        }

        let clamp = self.boundary == GapBoundary::Window;
        let mut gaps = Vec::new();
        let mut cursor = window.start();

        for event in busy {
            // Nested inside what is already covered
            if event.end() <= cursor {
                continue;
            }

            if clamp && event.start() >= window.end() {
                break;
            }

            let gap_end = if clamp {
                event.start().min(window.end())
            } else {
                event.start()
            };
            if gap_end - cursor >= self.min_duration {
                gaps.push(Interval::new(cursor, gap_end)?);
            }

            // event.end() > cursor here, so this is max(cursor, end)
            cursor = if clamp {
                event.end().min(window.end())
            } else {
                event.end()
            };
        }

        if window.end() - cursor >= self.min_duration {
            gaps.push(Interval::new(cursor, window.end())?);
        }

        Ok(gaps)
    }

    /// Earliest gap starting strictly after `not_before`, narrowed to
    /// exactly `min_duration`.
    pub fn first_slot(
        &self,
        busy: &[Interval],
        window: Interval,
        not_before: DateTime<Utc>,
    ) -> Result<Option<Interval>, ValidationError> {
        let gaps = self.free_intervals(busy, window)?;
        gaps.into_iter()
            .find(|gap| gap.start() > not_before)
            .map(|gap| Interval::starting_at(gap.start(), self.min_duration))
            .transpose()
    }
}

fn first_unsorted(busy: &[Interval]) -> Option<usize> {
    busy.windows(2)
        .position(|pair| pair[1].start() < pair[0].start())
        .map(|i| i + 1)
}

/// Convenience function: first free slot of `min_duration` in `window`.
pub fn find_free_slot(
    busy: &[Interval],
    window: Interval,
    min_duration: Duration,
    not_before: DateTime<Utc>,
) -> Result<Option<Interval>, ValidationError> {
    FreeIntervalExtractor::new(min_duration)?.first_slot(busy, window, not_before)
}
