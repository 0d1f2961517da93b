//! Shared states, enums, events, and constants for Campus Week.
//!
//! This is the type contract. Every domain plugin imports from here; the
//! engine resources themselves live with the domain that owns their rules
//! (`metrics`, `calendar`, `streaks`, `activities`).

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::activities::{ActivityInstance, Applied, Rejection};

// ═══════════════════════════════════════════════════════════════════════
// GAME STATE — top-level state machine
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, States, Default)]
pub enum GameState {
    #[default]
    Loading,
    Playing,
    GameOver,
}

// ═══════════════════════════════════════════════════════════════════════
// CONSTANTS
// ═══════════════════════════════════════════════════════════════════════

/// Floor for every metric value. Metrics never reach zero.
pub const METRIC_MIN: f32 = 0.1;
pub const METRIC_MAX: f32 = 1.0;

/// Hours available in one in-game day.
pub const DAY_LENGTH: u32 = 16;
/// Days in one game session.
pub const DAYS: u32 = 7;

pub const CONFIG_PATH: &str = "assets/config/simulation.ron";

// ═══════════════════════════════════════════════════════════════════════
// METRICS
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MetricKind {
    Energy,
    Happiness,
    StudyLevel,
    Health,
}

impl MetricKind {
    pub const ALL: [MetricKind; 4] = [
        MetricKind::Energy,
        MetricKind::Happiness,
        MetricKind::StudyLevel,
        MetricKind::Health,
    ];

    pub fn index(self) -> usize {
        match self {
            MetricKind::Energy => 0,
            MetricKind::Happiness => 1,
            MetricKind::StudyLevel => 2,
            MetricKind::Health => 3,
        }
    }

    /// Value a metric starts at, and returns to on a Reset effect.
    pub fn default_value(self) -> f32 {
        match self {
            MetricKind::Energy => 1.0,
            MetricKind::Happiness => 1.0,
            MetricKind::StudyLevel => 0.1,
            MetricKind::Health => 0.6,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            MetricKind::Energy => "Energy",
            MetricKind::Happiness => "Happiness",
            MetricKind::StudyLevel => "Study Level",
            MetricKind::Health => "Health",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EffectDirection {
    Increase,
    Decrease,
    Reset,
}

// ═══════════════════════════════════════════════════════════════════════
// ACTIVITIES
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ActivityKind {
    Study,
    Sleep,
    Nap,
    Eat,
    Entertain,
    Exercise,
}

impl ActivityKind {
    pub const ALL: [ActivityKind; 6] = [
        ActivityKind::Study,
        ActivityKind::Sleep,
        ActivityKind::Nap,
        ActivityKind::Eat,
        ActivityKind::Entertain,
        ActivityKind::Exercise,
    ];

    /// Name used in level tile metadata.
    pub fn name(self) -> &'static str {
        match self {
            ActivityKind::Study => "study",
            ActivityKind::Sleep => "sleep",
            ActivityKind::Nap => "nap",
            ActivityKind::Eat => "eat",
            ActivityKind::Entertain => "entertain",
            ActivityKind::Exercise => "exercise",
        }
    }

    /// Case-insensitive inverse of [`ActivityKind::name`].
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(name))
    }
}

// ═══════════════════════════════════════════════════════════════════════
// EVENTS
// ═══════════════════════════════════════════════════════════════════════

/// Sent by whoever drives the player (UI, autoplay) to perform an activity.
#[derive(Event, Debug, Clone)]
pub struct ActivityAttemptEvent {
    pub instance: ActivityInstance,
}

#[derive(Event, Debug, Clone)]
pub struct ActivityPerformedEvent {
    pub kind: ActivityKind,
    /// Day on which the activity was performed (before any rollover).
    pub day: u32,
    pub applied: Applied,
}

#[derive(Event, Debug, Clone)]
pub struct ActivityRejectedEvent {
    pub kind: ActivityKind,
    pub rejection: Rejection,
}

/// A metric's current value changed. `old` and `new` are already clamped.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct MetricChangedEvent {
    pub metric: MetricKind,
    pub old: f32,
    pub new: f32,
}

/// Sent when the player sleeps. `day` is the day that just ended.
#[derive(Event, Debug, Clone)]
pub struct DayEndEvent {
    pub day: u32,
}

#[derive(Event, Debug, Clone)]
pub struct GameOverEvent {
    pub score: f32,
    pub classification: &'static str,
}

/// Resets every session resource to a fresh game.
#[derive(Event, Debug, Clone, Default)]
pub struct NewGameEvent;

// ═══════════════════════════════════════════════════════════════════════
// RESULTS
// ═══════════════════════════════════════════════════════════════════════

/// Final score, filled in on entering `GameState::GameOver`.
#[derive(Resource, Debug, Clone, Default, Serialize)]
pub struct FinalResult {
    pub score: f32,
    pub classification: &'static str,
    pub days_not_studied: u32,
    pub computed: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_activity_from_name_case_insensitive() {
        assert_eq!(ActivityKind::from_name("Study"), Some(ActivityKind::Study));
        assert_eq!(ActivityKind::from_name(" SLEEP "), Some(ActivityKind::Sleep));
        assert_eq!(ActivityKind::from_name("party"), None);
    }

    #[test]
    fn test_activity_name_round_trip() {
        for kind in ActivityKind::ALL {
            assert_eq!(ActivityKind::from_name(kind.name()), Some(kind));
        }
    }

    #[test]
    fn test_metric_index_unique() {
        let mut seen = [false; 4];
        for metric in MetricKind::ALL {
            assert!(!seen[metric.index()], "{:?} index collides", metric);
            seen[metric.index()] = true;
        }
    }

    #[test]
    fn test_metric_defaults() {
        assert_eq!(MetricKind::Energy.default_value(), 1.0);
        assert_eq!(MetricKind::Happiness.default_value(), 1.0);
        assert_eq!(MetricKind::StudyLevel.default_value(), 0.1);
        assert_eq!(MetricKind::Health.default_value(), 0.6);
    }
}
