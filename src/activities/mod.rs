//! Activities domain — catalog, tile instances, and the resolver that runs them.
//!
//! All player actions arrive as `ActivityAttemptEvent`s. `handle_activity_attempts`
//! resolves each one against the clock and metrics, then reports the outcome
//! through `ActivityPerformedEvent` / `ActivityRejectedEvent`, sends
//! `DayEndEvent` after a sleep, and moves to `GameState::GameOver` when the
//! final night is slept.

use bevy::prelude::*;

use crate::shared::*;

pub mod catalog;
pub mod instance;
pub mod resolver;

pub use instance::{ActivityInstance, InstanceError};
pub use resolver::{attempt, check, Applied, DailyLog, Rejection};

use crate::calendar::ClockState;
use crate::metrics::MetricStore;
use crate::streaks::StreakTracker;

pub struct ActivitiesPlugin;

impl Plugin for ActivitiesPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            handle_activity_attempts.run_if(in_state(GameState::Playing)),
        );
    }
}

/// Reads `ActivityAttemptEvent`s in order. Once the game ends, the rest of
/// the frame's attempts are dropped.
pub fn handle_activity_attempts(
    mut attempts: EventReader<ActivityAttemptEvent>,
    mut clock: ResMut<ClockState>,
    mut metrics: ResMut<MetricStore>,
    mut streaks: ResMut<StreakTracker>,
    mut daily_log: ResMut<DailyLog>,
    mut performed_writer: EventWriter<ActivityPerformedEvent>,
    mut rejected_writer: EventWriter<ActivityRejectedEvent>,
    mut day_end_writer: EventWriter<DayEndEvent>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    let mut game_over = false;

    for event in attempts.read() {
        if game_over {
            warn!(
                "[Activity] Ignoring '{}' — the term is already over",
                event.instance.display_text
            );
            continue;
        }

        let instance = &event.instance;
        let day = clock.day();

        match attempt(
            instance,
            &mut clock,
            &mut metrics,
            &mut streaks,
            &mut daily_log,
        ) {
            Ok(applied) => {
                info!(
                    "[Activity] '{}' ({:?}, {}h) done — now {}",
                    instance.display_text,
                    instance.kind,
                    instance.required_hours,
                    clock.formatted()
                );

                if instance.kind == ActivityKind::Sleep {
                    day_end_writer.send(DayEndEvent { day });
                }
                if applied == Applied::GameOver {
                    game_over = true;
                    next_state.set(GameState::GameOver);
                }

                performed_writer.send(ActivityPerformedEvent {
                    kind: instance.kind,
                    day,
                    applied,
                });
            }
            Err(rejection) => {
                info!(
                    "[Activity] '{}' refused: {}",
                    instance.display_text,
                    rejection.message()
                );
                rejected_writer.send(ActivityRejectedEvent {
                    kind: instance.kind,
                    rejection,
                });
            }
        }
    }
}
