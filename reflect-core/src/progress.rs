//! Streak, badge and milestone state derived from the server's aggregate
//! statistics. The snapshot is replaced wholesale after every fetch and
//! never partially mutated by the client.

use serde::Deserialize;
use strum_macros::AsRefStr;

/// Streak milestone thresholds, in days. Fixed; crossing the first
/// unreached one triggers a one-time celebration.
pub const MILESTONES: [u32; 6] = [7, 14, 30, 60, 100, 365];

/// Days of journaling the streak ring represents at full circle.
const RING_TARGET_DAYS: f64 = 7.0;

/// How urgently the user should be reminded to journal today.
///
/// The server also emits `safe` and `start` for the no-alert case; both
/// map onto [`StreakStatus::Ok`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, AsRefStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum StreakStatus {
    #[serde(alias = "safe", alias = "start")]
    Ok,
    Reminder,
    AtRisk,
}

impl Default for StreakStatus {
    fn default() -> Self {
        StreakStatus::Ok
    }
}

/// Visual alert level derived from [`StreakStatus`]; `AtRisk` takes
/// precedence over `Reminder`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertState {
    None,
    Reminder,
    AtRisk,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct WeeklyGoal {
    pub current: u32,
    pub target: u32,
    /// Percentage, clamped to 100 by the server.
    pub progress: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct NextMilestone {
    pub days: u32,
    pub remaining: u32,
    pub progress: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Badge {
    pub days: u32,
    pub label: String,
    pub achieved: bool,
}

impl Badge {
    /// Fixed icon table keyed by milestone days. Unrecognized day values
    /// fall back to a generic medal rather than failing.
    pub fn icon(&self) -> &'static str {
        match self.days {
            7 => "🌱",
            14 => "🌿",
            30 => "🌳",
            60 => "⭐",
            100 => "🏆",
            365 => "👑",
            _ => "🎖️",
        }
    }
}

/// Server-supplied aggregate statistics, read-only on the client.
#[derive(Debug, Clone, Default)]
pub struct ProgressSnapshot {
    pub current_streak: u32,
    pub this_week: u32,
    pub this_month: u32,
    pub total_entries: u32,
    pub journaled_today: bool,
    pub hours_remaining: f64,
    pub streak_status: StreakStatus,
    pub weekly_goal: Option<WeeklyGoal>,
    pub next_milestone: Option<NextMilestone>,
    pub badges: Vec<Badge>,
    pub encouragement: Option<String>,
}

/// Wire shape of the server's stats response; streak counters arrive in
/// a nested block.
#[derive(Debug, Deserialize)]
struct StatsWire {
    #[serde(default)]
    streak: StreakWire,
    #[serde(default)]
    journaled_today: bool,
    #[serde(default)]
    hours_remaining: f64,
    #[serde(default)]
    streak_status: StreakStatus,
    #[serde(default)]
    weekly_goal: Option<WeeklyGoal>,
    #[serde(default)]
    next_milestone: Option<NextMilestone>,
    #[serde(default)]
    badges: Vec<Badge>,
    #[serde(default)]
    encouragement: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct StreakWire {
    #[serde(default)]
    current_streak: u32,
    #[serde(default)]
    this_week: u32,
    #[serde(default)]
    this_month: u32,
    #[serde(default)]
    total_entries: u32,
}

impl ProgressSnapshot {
    /// Builds a snapshot from the server's stats JSON.
    pub fn from_wire(value: serde_json::Value) -> Result<Self, serde_json::Error> {
        let wire: StatsWire = serde_json::from_value(value)?;
        Ok(Self {
            current_streak: wire.streak.current_streak,
            this_week: wire.streak.this_week,
            this_month: wire.streak.this_month,
            total_entries: wire.streak.total_entries,
            journaled_today: wire.journaled_today,
            hours_remaining: wire.hours_remaining,
            streak_status: wire.streak_status,
            weekly_goal: wire.weekly_goal,
            next_milestone: wire.next_milestone,
            badges: wire.badges,
            encouragement: wire.encouragement,
        })
    }
}

/// Owns exactly one [`ProgressSnapshot`] at a time and derives display
/// state from it.
#[derive(Debug, Default)]
pub struct ProgressEngine {
    snapshot: ProgressSnapshot,
}

impl ProgressEngine {
    pub fn snapshot(&self) -> &ProgressSnapshot {
        &self.snapshot
    }

    /// Wholesale replace; there are no merge semantics.
    pub fn ingest(&mut self, snapshot: ProgressSnapshot) {
        self.snapshot = snapshot;
    }

    /// Fraction of the streak ring to fill: `min(streak / 7, 1)`.
    pub fn streak_ring_progress(&self) -> f64 {
        (f64::from(self.snapshot.current_streak) / RING_TARGET_DAYS).min(1.0)
    }

    pub fn alert_state(&self) -> AlertState {
        match self.snapshot.streak_status {
            StreakStatus::Ok => AlertState::None,
            StreakStatus::Reminder => AlertState::Reminder,
            StreakStatus::AtRisk => AlertState::AtRisk,
        }
    }

    pub fn weekly_goal_completed(&self) -> bool {
        self.snapshot
            .weekly_goal
            .as_ref()
            .map_or(false, |goal| goal.current == goal.target)
    }
}

/// Detects whether a save crossed a streak milestone.
///
/// Fires only when this save produced the first entry of the day
/// (`was_journaled_today` captured *before* the save is false), the
/// streak strictly grew, and a threshold lies in `(prev, new]`. When
/// several thresholds are spanned at once, only the smallest fires.
pub fn detect_milestone_crossing(
    prev_streak: u32,
    new_streak: u32,
    was_journaled_today: bool,
) -> Option<u32> {
    if was_journaled_today || new_streak <= prev_streak {
        return None;
    }
    MILESTONES
        .iter()
        .copied()
        .find(|&m| prev_streak < m && m <= new_streak)
}
