//! Session lifecycle — builds the per-game resources from `SimulationConfig`
//! and rebuilds them on `NewGameEvent`.

use bevy::prelude::*;

use crate::activities::DailyLog;
use crate::calendar::ClockState;
use crate::config::SimulationConfig;
use crate::metrics::MetricStore;
use crate::shared::*;
use crate::streaks::StreakTracker;

/// Owns the per-game resources, `FinalResult` included.
///
/// `SimulationConfig` must already be in the world (see `ConfigPlugin`);
/// building without it panics rather than quietly running on defaults.
pub struct SessionPlugin;

impl Plugin for SessionPlugin {
    fn build(&self, app: &mut App) {
        let config = app.world().resource::<SimulationConfig>();
        let clock = ClockState::from_config(config);
        let metrics = MetricStore::new(config.days);

        app.insert_resource(clock)
            .insert_resource(metrics)
            .init_resource::<StreakTracker>()
            .init_resource::<DailyLog>()
            .init_resource::<FinalResult>()
            .add_event::<NewGameEvent>()
            .add_systems(Update, start_new_game);
    }
}

fn start_new_game(
    mut events: EventReader<NewGameEvent>,
    config: Res<SimulationConfig>,
    mut clock: ResMut<ClockState>,
    mut metrics: ResMut<MetricStore>,
    mut streaks: ResMut<StreakTracker>,
    mut daily_log: ResMut<DailyLog>,
    mut result: ResMut<FinalResult>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    // Several requests in one frame still mean one fresh game.
    if events.read().count() == 0 {
        return;
    }

    *clock = ClockState::from_config(&config);
    *metrics = MetricStore::new(config.days);
    *streaks = StreakTracker::new();
    *daily_log = DailyLog::default();
    *result = FinalResult::default();
    next_state.set(GameState::Playing);

    info!(
        "[Session] New game — {} day(s), {} hour(s) per day",
        config.days, config.day_length
    );
}
