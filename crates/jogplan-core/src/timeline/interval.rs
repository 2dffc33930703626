use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// A half-open time range `[start, end)`.
///
/// Used both for busy calendar events and for candidate free windows.
/// The constructor guarantees `end > start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawInterval")]
pub struct Interval {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

#[derive(Deserialize)]
struct RawInterval {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl TryFrom<RawInterval> for Interval {
    type Error = ValidationError;

    fn try_from(raw: RawInterval) -> Result<Self, Self::Error> {
        Interval::new(raw.start, raw.end)
    }
}

impl Interval {
    /// Create an interval, rejecting empty or inverted ranges.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, ValidationError> {
        if end <= start {
            return Err(ValidationError::InvalidTimeRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// Create an interval of `duration` starting at `start`.
    pub fn starting_at(start: DateTime<Utc>, duration: Duration) -> Result<Self, ValidationError> {
        Self::new(start, start + duration)
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// Get duration in minutes
    pub fn duration_minutes(&self) -> i64 {
        self.duration().num_minutes()
    }

    /// Whether `at` falls inside `[start, end)`.
    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        at >= self.start && at < self.end
    }

    /// Check if this interval overlaps with another
    pub fn overlaps(&self, other: &Interval) -> bool {
        self.start < other.end && self.end > other.start
    }

    /// Whether `other` lies entirely within this interval.
    pub fn covers(&self, other: &Interval) -> bool {
        other.start >= self.start && other.end <= self.end
    }

    /// Overlapping part of two intervals, if any.
    pub fn intersection(&self, other: &Interval) -> Option<Interval> {
        let start = self.start.max(other.start);
        let end = self.end.min(other.end);
        (end > start).then_some(Self { start, end })
    }

    /// Same length, moved by `offset`.
    pub fn shifted(&self, offset: Duration) -> Self {
        Self {
            start: self.start + offset,
            end: self.end + offset,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 4, 7, h, m, 0).unwrap()
    }

    #[test]
    fn rejects_inverted_and_empty_ranges() {
        assert!(Interval::new(at(10, 0), at(9, 0)).is_err());
        assert_eq!(
            Interval::new(at(9, 0), at(9, 0)),
            Err(ValidationError::InvalidTimeRange {
                start: at(9, 0),
                end: at(9, 0)
            })
        );
    }

    #[test]
    fn overlap_is_half_open() {
        let a = Interval::new(at(9, 0), at(10, 0)).unwrap();
        let b = Interval::new(at(10, 0), at(11, 0)).unwrap();
        let c = Interval::new(at(9, 30), at(10, 30)).unwrap();
        assert!(!a.overlaps(&b));
        assert!(a.overlaps(&c));
        assert!(c.overlaps(&b));
    }

    #[test]
    fn intersection_clips_to_common_part() {
        let day = Interval::new(at(6, 0), at(21, 0)).unwrap();
        let early = Interval::new(at(5, 0), at(7, 0)).unwrap();
        assert_eq!(day.intersection(&early), Some(Interval::new(at(6, 0), at(7, 0)).unwrap()));

        let night = Interval::new(at(21, 0), at(23, 0)).unwrap();
        assert_eq!(day.intersection(&night), None);
    }

    #[test]
    fn deserialization_validates_range() {
        let ok: Interval = serde_json::from_str(
            r#"{"start":"2025-04-07T09:00:00Z","end":"2025-04-07T10:00:00Z"}"#,
        )
        .unwrap();
        assert_eq!(ok.duration_minutes(), 60);

        let bad = serde_json::from_str::<Interval>(
            r#"{"start":"2025-04-07T10:00:00Z","end":"2025-04-07T09:00:00Z"}"#,
        );
        assert!(bad.is_err());
    }

    #[test]
    fn shifted_keeps_duration() {
        let a = Interval::starting_at(at(6, 0), Duration::minutes(45)).unwrap();
        let moved = a.shifted(Duration::days(1));
        assert_eq!(moved.duration_minutes(), 45);
        assert_eq!(moved.start(), at(6, 0) + Duration::days(1));
    }
}
