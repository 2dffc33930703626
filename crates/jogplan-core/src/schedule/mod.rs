//! Schedule types: day parts, preferences, goal windows and session plans.

use chrono::{DateTime, Duration, NaiveTime, Utc, Weekday};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ValidationError;

/// A named time-of-day bracket.
///
/// Variants are declared in canonical priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayPart {
    Morning,
    Noon,
    Afternoon,
    Evening,
}

impl DayPart {
    pub const ALL: [DayPart; 4] = [
        DayPart::Morning,
        DayPart::Noon,
        DayPart::Afternoon,
        DayPart::Evening,
    ];

    /// Local start and end of this bracket.
    pub fn window(&self) -> (NaiveTime, NaiveTime) {
        let (start, end) = match self {
            Self::Morning => ((6, 0, 0), (11, 59, 59)),
            Self::Noon => ((12, 0, 0), (14, 59, 59)),
            Self::Afternoon => ((15, 0, 0), (18, 59, 59)),
            Self::Evening => ((19, 0, 0), (21, 0, 0)),
        };
        (hms(start), hms(end))
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Morning => "Morning",
            Self::Noon => "Noon",
            Self::Afternoon => "Afternoon",
            Self::Evening => "Evening",
        }
    }
}

fn hms((h, m, s): (u32, u32, u32)) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, s).unwrap_or_default()
}

/// Values with a fixed canonical ordering inside a preference list.
pub trait Ranked: Copy + PartialEq {
    fn rank(&self) -> u8;
}

impl Ranked for DayPart {
    fn rank(&self) -> u8 {
        *self as u8
    }
}

impl Ranked for Weekday {
    fn rank(&self) -> u8 {
        self.num_days_from_monday() as u8
    }
}

/// A soft preference: either no preference at all, or a de-duplicated
/// list in canonical order.
///
/// Serialized as a plain list; the empty list means `Any`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Preference<T> {
    Any,
    Prefer(Vec<T>),
}

impl<T> Default for Preference<T> {
    fn default() -> Self {
        Self::Any
    }
}

impl<T: Ranked> Preference<T> {
    /// Build from any list; empty input yields `Any`.
    pub fn from_list(items: impl IntoIterator<Item = T>) -> Self {
        let mut items: Vec<T> = items.into_iter().collect();
        items.sort_by_key(|item| item.rank());
        items.dedup();
        if items.is_empty() {
            Self::Any
        } else {
            Self::Prefer(items)
        }
    }

    pub fn is_any(&self) -> bool {
        matches!(self, Self::Any)
    }

    /// Whether `item` satisfies this preference.
    pub fn admits(&self, item: T) -> bool {
        match self {
            Self::Any => true,
            Self::Prefer(items) => items.contains(&item),
        }
    }

    /// Preferred values in canonical order (empty for `Any`).
    pub fn items(&self) -> &[T] {
        match self {
            Self::Any => &[],
            Self::Prefer(items) => items,
        }
    }

    /// Highest-priority preferred value.
    pub fn first(&self) -> Option<T> {
        self.items().first().copied()
    }
}

impl<T: Ranked + Serialize> Serialize for Preference<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.items().serialize(serializer)
    }
}

impl<'de, T: Ranked + Deserialize<'de>> Deserialize<'de> for Preference<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let items = Vec::<T>::deserialize(deserializer)?;
        Ok(Self::from_list(items))
    }
}

/// User scheduling preferences.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Preferences {
    #[serde(default)]
    pub time_of_day: Preference<DayPart>,
    #[serde(default)]
    pub days_of_week: Preference<Weekday>,
}

impl Preferences {
    pub fn new(
        time_of_day: impl IntoIterator<Item = DayPart>,
        days_of_week: impl IntoIterator<Item = Weekday>,
    ) -> Self {
        Self {
            time_of_day: Preference::from_list(time_of_day),
            days_of_week: Preference::from_list(days_of_week),
        }
    }
}

/// Date range bounding a goal; slots must start inside it (inclusive).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawGoalWindow")]
pub struct GoalWindow {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

#[derive(Deserialize)]
struct RawGoalWindow {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl TryFrom<RawGoalWindow> for GoalWindow {
    type Error = ValidationError;

    fn try_from(raw: RawGoalWindow) -> Result<Self, Self::Error> {
        GoalWindow::new(raw.start, raw.end)
    }
}

impl GoalWindow {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, ValidationError> {
        if end <= start {
            return Err(ValidationError::InvalidTimeRange { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        at >= self.start && at <= self.end
    }
}

/// One of the back-to-back parts of a jogging session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionKind {
    PreJog,
    Jog,
    PostJog,
}

impl SessionKind {
    /// Calendar event title for this part.
    pub fn title(&self) -> &'static str {
        match self {
            Self::PreJog => "Pre-jogging",
            Self::Jog => "Jogging",
            Self::PostJog => "Post-jogging",
        }
    }
}

/// Durations of the sub-sessions; zero means the part is skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionPlan {
    pre_jog: Duration,
    jog: Duration,
    post_jog: Duration,
}

impl SessionPlan {
    pub fn new(pre_jog: Duration, jog: Duration, post_jog: Duration) -> Result<Self, ValidationError> {
        for (field, value) in [("pre_jog", pre_jog), ("jog", jog), ("post_jog", post_jog)] {
            if value < Duration::zero() {
                return Err(ValidationError::NonPositiveDuration {
                    field: field.to_string(),
                    minutes: value.num_minutes(),
                });
            }
        }

        let plan = Self {
            pre_jog,
            jog,
            post_jog,
        };
        if plan.total() <= Duration::zero() {
            return Err(ValidationError::NonPositiveDuration {
                field: "session".to_string(),
                minutes: 0,
            });
        }
        Ok(plan)
    }

    pub fn from_minutes(pre_jog: i64, jog: i64, post_jog: i64) -> Result<Self, ValidationError> {
        Self::new(
            Duration::minutes(pre_jog),
            Duration::minutes(jog),
            Duration::minutes(post_jog),
        )
    }

    /// Combined length of all parts.
    pub fn total(&self) -> Duration {
        self.pre_jog + self.jog + self.post_jog
    }

    /// Non-empty parts in booking order.
    pub fn parts(&self) -> Vec<(SessionKind, Duration)> {
        [
            (SessionKind::PreJog, self.pre_jog),
            (SessionKind::Jog, self.jog),
            (SessionKind::PostJog, self.post_jog),
        ]
        .into_iter()
        .filter(|(_, duration)| *duration > Duration::zero())
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn day_part_windows_match_operating_table() {
        let (start, end) = DayPart::Morning.window();
        assert_eq!(start, NaiveTime::from_hms_opt(6, 0, 0).unwrap());
        assert_eq!(end, NaiveTime::from_hms_opt(11, 59, 59).unwrap());

        let (start, end) = DayPart::Evening.window();
        assert_eq!(start, NaiveTime::from_hms_opt(19, 0, 0).unwrap());
        assert_eq!(end, NaiveTime::from_hms_opt(21, 0, 0).unwrap());
    }

    #[test]
    fn preference_is_sorted_and_deduplicated() {
        let pref = Preference::from_list([DayPart::Evening, DayPart::Morning, DayPart::Evening]);
        assert_eq!(pref.items(), &[DayPart::Morning, DayPart::Evening]);
        assert_eq!(pref.first(), Some(DayPart::Morning));
        assert!(!pref.admits(DayPart::Noon));
    }

    #[test]
    fn empty_preference_is_any() {
        let pref: Preference<Weekday> = Preference::from_list([]);
        assert!(pref.is_any());
        assert!(pref.admits(Weekday::Sun));
        assert_eq!(pref.first(), None);
    }

    #[test]
    fn preferences_serialize_as_plain_lists() {
        let prefs = Preferences::new([DayPart::Afternoon], [Weekday::Fri, Weekday::Mon]);
        let json = serde_json::to_value(&prefs).unwrap();
        assert_eq!(json["time_of_day"], serde_json::json!(["afternoon"]));
        assert_eq!(json["days_of_week"], serde_json::json!(["Mon", "Fri"]));

        let parsed: Preferences = serde_json::from_str(r#"{"time_of_day": []}"#).unwrap();
        assert!(parsed.time_of_day.is_any());
        assert!(parsed.days_of_week.is_any());
    }

    #[test]
    fn session_plan_skips_zero_parts() {
        let plan = SessionPlan::from_minutes(10, 25, 0).unwrap();
        assert_eq!(plan.total(), Duration::minutes(35));
        let kinds: Vec<_> = plan.parts().into_iter().map(|(kind, _)| kind).collect();
        assert_eq!(kinds, vec![SessionKind::PreJog, SessionKind::Jog]);
    }

    #[test]
    fn session_plan_rejects_negative_and_empty() {
        assert!(SessionPlan::from_minutes(-5, 25, 0).is_err());
        assert!(SessionPlan::from_minutes(0, 0, 0).is_err());
    }

    #[test]
    fn goal_window_is_inclusive() {
        let start = DateTime::parse_from_rfc3339("2025-04-07T00:00:00Z").unwrap().with_timezone(&Utc);
        let end = start + Duration::days(7);
        let goal = GoalWindow::new(start, end).unwrap();
        assert!(goal.contains(start));
        assert!(goal.contains(end));
        assert!(!goal.contains(end + Duration::seconds(1)));
        assert!(GoalWindow::new(end, start).is_err());
    }

    #[test]
    fn goal_window_deserialize_rejects_inverted_range() {
        let ok: GoalWindow = serde_json::from_str(
            r#"{"start":"2025-04-07T00:00:00Z","end":"2025-04-13T23:59:00Z"}"#,
        )
        .unwrap();
        assert_eq!(ok.end() - ok.start(), Duration::days(6) + Duration::minutes(1439));

        let inverted = serde_json::from_str::<GoalWindow>(
            r#"{"start":"2025-04-13T00:00:00Z","end":"2025-04-07T00:00:00Z"}"#,
        );
        assert!(inverted.is_err());
    }
}
