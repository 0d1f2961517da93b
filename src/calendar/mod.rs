//! Calendar domain — the heartbeat of Campus Week.
//!
//! Time is discrete: activities spend whole hours, and only sleeping moves
//! the calendar to the next day. Responsible for:
//! - The `ClockState` resource (hour within the day, day within the game)
//! - Saturating hour/day transitions and the end-of-day / end-of-game predicates
//! - Logging day rollovers as `DayEndEvent`s arrive

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::SimulationConfig;
use crate::shared::*;

pub struct CalendarPlugin;

impl Plugin for CalendarPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(OnEnter(GameState::Playing), announce_day)
            .add_systems(
                Update,
                log_day_end
                    .run_if(in_state(GameState::Playing))
                    .after(crate::activities::handle_activity_attempts),
            );
    }
}

/// `(hour, day)` pair. Both saturate instead of wrapping.
///
/// `hour` is in `[0, day_length]`; reaching `day_length` means the day is
/// over and only sleep is allowed. `day` is in `[0, days - 1]`.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClockState {
    hour: u32,
    day: u32,
    day_length: u32,
    days: u32,
}

impl Default for ClockState {
    fn default() -> Self {
        Self::new(DAY_LENGTH, DAYS)
    }
}

impl ClockState {
    /// `days` is floored at 1 so `days - 1` is always a valid day.
    pub fn new(day_length: u32, days: u32) -> Self {
        Self {
            hour: 0,
            day: 0,
            day_length,
            days: days.max(1),
        }
    }

    pub fn from_config(config: &SimulationConfig) -> Self {
        Self::new(config.day_length, config.days)
    }

    pub fn hour(&self) -> u32 {
        self.hour
    }

    pub fn day(&self) -> u32 {
        self.day
    }

    pub fn day_length(&self) -> u32 {
        self.day_length
    }

    pub fn days(&self) -> u32 {
        self.days
    }

    pub fn last_day(&self) -> u32 {
        self.days - 1
    }

    pub fn hours_remaining(&self) -> u32 {
        self.day_length - self.hour
    }

    pub fn increment_hour(&mut self, amount: u32) {
        self.hour = self.hour.saturating_add(amount).min(self.day_length);
    }

    pub fn reset_hour(&mut self) {
        self.hour = 0;
    }

    pub fn increment_day(&mut self, amount: u32) {
        self.day = self.day.saturating_add(amount).min(self.last_day());
        self.reset_hour();
    }

    pub fn reset_day(&mut self) {
        self.day = 0;
        self.reset_hour();
    }

    pub fn is_end_of_day(&self) -> bool {
        self.hour == self.day_length
    }

    pub fn is_end_of_days(&self) -> bool {
        self.day == self.last_day()
    }

    /// 1-based day label for display, e.g. "Day 3, 08:00".
    pub fn formatted(&self) -> String {
        format!("Day {}, {:02}:00", self.day + 1, self.hour)
    }
}

fn announce_day(clock: Res<ClockState>) {
    info!(
        "[Calendar] {} — {} hour(s) left, {} day(s) in term",
        clock.formatted(),
        clock.hours_remaining(),
        clock.days()
    );
}

fn log_day_end(mut day_end_reader: EventReader<DayEndEvent>, clock: Res<ClockState>) {
    for event in day_end_reader.read() {
        info!(
            "[Calendar] Day {} ended. Now {}",
            event.day + 1,
            clock.formatted()
        );
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state() {
        let clock = ClockState::default();
        assert_eq!(clock.hour(), 0);
        assert_eq!(clock.day(), 0);
        assert!(!clock.is_end_of_day());
        assert!(!clock.is_end_of_days());
    }

    #[test]
    fn test_increment_hour_saturates() {
        for k in [0, 1, 5, 100] {
            let mut clock = ClockState::default();
            clock.increment_hour(DAY_LENGTH + k);
            assert_eq!(clock.hour(), DAY_LENGTH);
            assert!(clock.is_end_of_day());
        }
    }

    #[test]
    fn test_increment_hour_saturates_near_overflow() {
        let mut clock = ClockState::default();
        clock.increment_hour(3);
        clock.increment_hour(u32::MAX);
        assert_eq!(clock.hour(), DAY_LENGTH);
    }

    #[test]
    fn test_increment_day_resets_hour() {
        let mut clock = ClockState::default();
        clock.increment_hour(9);
        clock.increment_day(1);
        assert_eq!(clock.day(), 1);
        assert_eq!(clock.hour(), 0);
    }

    #[test]
    fn test_increment_day_saturates_at_last_day() {
        let mut clock = ClockState::default();
        clock.increment_day(DAYS + 3);
        assert_eq!(clock.day(), DAYS - 1);
        assert!(clock.is_end_of_days());

        clock.increment_hour(4);
        clock.increment_day(1);
        assert_eq!(clock.day(), DAYS - 1);
        assert_eq!(clock.hour(), 0, "hour resets even when the day saturates");
    }

    #[test]
    fn test_reset_day() {
        let mut clock = ClockState::default();
        clock.increment_day(4);
        clock.increment_hour(2);
        clock.reset_day();
        assert_eq!((clock.hour(), clock.day()), (0, 0));
    }

    #[test]
    fn test_hours_remaining() {
        let mut clock = ClockState::new(10, 3);
        clock.increment_hour(4);
        assert_eq!(clock.hours_remaining(), 6);
    }

    #[test]
    fn test_single_day_game_is_last_day_immediately() {
        let clock = ClockState::new(16, 1);
        assert!(clock.is_end_of_days());
    }

    #[test]
    fn test_formatted() {
        let mut clock = ClockState::default();
        clock.increment_day(2);
        clock.increment_hour(8);
        assert_eq!(clock.formatted(), "Day 3, 08:00");
    }
}
