use std::time::Duration;

use bevy::app::ScheduleRunnerPlugin;
use bevy::log::LogPlugin;
use bevy::prelude::*;
use bevy::state::app::StatesPlugin;

use campus_week::activities::ActivitiesPlugin;
use campus_week::autoplay::AutoplayPlugin;
use campus_week::calendar::CalendarPlugin;
use campus_week::config::ConfigPlugin;
use campus_week::level::LevelPlugin;
use campus_week::metrics::MetricsPlugin;
use campus_week::scoring::ScoringPlugin;
use campus_week::session::SessionPlugin;
use campus_week::shared::*;

fn main() {
    App::new()
        .add_plugins(
            MinimalPlugins.set(ScheduleRunnerPlugin::run_loop(Duration::from_secs_f64(
                1.0 / 60.0,
            ))),
        )
        .add_plugins(LogPlugin::default())
        .add_plugins(StatesPlugin)
        // Game state
        .init_state::<GameState>()
        // Events
        .add_event::<ActivityAttemptEvent>()
        .add_event::<ActivityPerformedEvent>()
        .add_event::<ActivityRejectedEvent>()
        .add_event::<MetricChangedEvent>()
        .add_event::<DayEndEvent>()
        .add_event::<GameOverEvent>()
        // Config must be in place before the session resources are built
        .add_plugins(ConfigPlugin::default())
        .add_plugins(SessionPlugin)
        // Domain plugins
        .add_plugins(LevelPlugin)
        .add_plugins(CalendarPlugin)
        .add_plugins(MetricsPlugin)
        .add_plugins(ActivitiesPlugin)
        .add_plugins(ScoringPlugin)
        // Stands in for the player until a UI drives the game
        .add_plugins(AutoplayPlugin)
        .run();
}
