//! Property tests for free-interval extraction.

use chrono::{DateTime, Duration, TimeZone, Utc};
use jogplan_core::{FreeIntervalExtractor, GapBoundary, Interval};
use proptest::prelude::*;

fn base() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 4, 7, 0, 0, 0).unwrap()
}

fn minutes(m: i64) -> DateTime<Utc> {
    base() + Duration::minutes(m)
}

fn busy_strategy() -> impl Strategy<Value = Vec<Interval>> {
    prop::collection::vec((0i64..1440, 1i64..240), 0..12).prop_map(|raw| {
        let mut busy: Vec<Interval> = raw
            .into_iter()
            .map(|(start, len)| Interval::new(minutes(start), minutes(start + len)).unwrap())
            .collect();
        busy.sort_by_key(|interval| interval.start());
        busy
    })
}

proptest! {
    #[test]
    fn slot_is_exact_free_and_after_not_before(
        busy in busy_strategy(),
        min in 1i64..120,
        not_before in -120i64..1440,
    ) {
        let window = Interval::new(minutes(360), minutes(1260)).unwrap();
        let extractor = FreeIntervalExtractor::new(Duration::minutes(min)).unwrap();

        if let Some(slot) = extractor.first_slot(&busy, window, minutes(not_before)).unwrap() {
            prop_assert_eq!(slot.duration(), Duration::minutes(min));
            prop_assert!(slot.start() > minutes(not_before));
            prop_assert!(slot.start() >= window.start());
            for event in &busy {
                prop_assert!(!event.overlaps(&slot), "{:?} overlaps {:?}", event, slot);
            }
        }
    }

    #[test]
    fn gaps_are_ordered_and_disjoint_from_busy_time(
        busy in busy_strategy(),
        min in 1i64..120,
    ) {
        let window = Interval::new(minutes(360), minutes(1260)).unwrap();
        let extractor = FreeIntervalExtractor::new(Duration::minutes(min)).unwrap();
        let gaps = extractor.free_intervals(&busy, window).unwrap();

        for gap in &gaps {
            prop_assert!(gap.duration() >= Duration::minutes(min));
            prop_assert!(gap.start() >= window.start());
            for event in &busy {
                prop_assert!(!event.overlaps(gap));
            }
        }
        for pair in gaps.windows(2) {
            prop_assert!(pair[0].end() <= pair[1].start());
        }
    }

    #[test]
    fn window_boundary_keeps_gaps_inside_window(
        busy in busy_strategy(),
        min in 1i64..120,
        not_before in -120i64..1440,
    ) {
        let window = Interval::new(minutes(360), minutes(1260)).unwrap();
        let extractor = FreeIntervalExtractor::new(Duration::minutes(min))
            .unwrap()
            .with_boundary(GapBoundary::Window);

        for gap in extractor.free_intervals(&busy, window).unwrap() {
            prop_assert!(window.covers(&gap));
        }
        if let Some(slot) = extractor.first_slot(&busy, window, minutes(not_before)).unwrap() {
            prop_assert!(window.covers(&slot));
        }
    }

    #[test]
    fn trailing_only_finds_every_clamped_gap(
        busy in busy_strategy(),
        min in 1i64..120,
    ) {
        // Lifting the boundary can only lengthen gaps, never lose one
        let window = Interval::new(minutes(360), minutes(1260)).unwrap();
        let open = FreeIntervalExtractor::new(Duration::minutes(min)).unwrap();
        let clamped = open.with_boundary(GapBoundary::Window);
        let open_gaps = open.free_intervals(&busy, window).unwrap();

        for gap in clamped.free_intervals(&busy, window).unwrap() {
            prop_assert!(open_gaps.iter().any(|g| g.covers(&gap)), "{:?} lost", gap);
        }
    }

    #[test]
    fn extraction_is_deterministic(
        busy in busy_strategy(),
        min in 1i64..120,
        not_before in -120i64..1440,
    ) {
        let window = Interval::new(minutes(360), minutes(1260)).unwrap();
        let extractor = FreeIntervalExtractor::new(Duration::minutes(min)).unwrap();
        let first = extractor.first_slot(&busy, window, minutes(not_before)).unwrap();
        let second = extractor.first_slot(&busy, window, minutes(not_before)).unwrap();
        prop_assert_eq!(first, second);
    }
}
