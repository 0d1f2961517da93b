//! Autoplay — a scripted student that drives the game without a UI.
//!
//! Each frame in `Playing` it picks one tile and sends an
//! `ActivityAttemptEvent`, so the whole term runs headless. The policy is
//! deliberately simple:
//! - sleep once the day is over, or when nothing else can be done
//! - study at least once a day, so the term never earns the skipped-study penalty
//! - otherwise pick the allowed tile that best covers the player's needs,
//!   where study need counts double
//!
//! On `GameOverEvent` it logs the result and exits the app.

use bevy::prelude::*;

use crate::activities::{check, handle_activity_attempts, DailyLog};
use crate::calendar::ClockState;
use crate::level::{ActivityTile, ActivityTiles};
use crate::metrics::MetricStore;
use crate::shared::*;

const STUDY_NEED_WEIGHT: f32 = 2.0;

pub struct AutoplayPlugin;

impl Plugin for AutoplayPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            choose_next_activity
                .run_if(in_state(GameState::Playing))
                .before(handle_activity_attempts),
        )
        .add_systems(Update, exit_on_game_over);
    }
}

/// How much doing `tile` now would help. Only increases count.
fn need_score(tile: &ActivityTile, metrics: &MetricStore) -> f32 {
    tile.instance
        .effects()
        .filter(|(_, direction, _)| *direction == EffectDirection::Increase)
        .map(|(metric, _, magnitude)| {
            let need = METRIC_MAX - metrics.get(metric);
            let weight = if metric == MetricKind::StudyLevel {
                STUDY_NEED_WEIGHT
            } else {
                1.0
            };
            need.min(magnitude) * weight
        })
        .sum()
}

/// Picks the next tile, or `None` if the level has nothing usable.
pub fn pick_tile<'a>(
    tiles: &'a ActivityTiles,
    clock: &ClockState,
    metrics: &MetricStore,
    daily_log: &DailyLog,
) -> Option<&'a ActivityTile> {
    let sleep = tiles.of_kind(ActivityKind::Sleep).next();
    if clock.is_end_of_day() {
        return sleep;
    }

    let allowed = |tile: &&ActivityTile| check(&tile.instance, clock, metrics).is_ok();

    if daily_log.times_performed_today(ActivityKind::Study) == 0 {
        let study = tiles
            .of_kind(ActivityKind::Study)
            .filter(allowed)
            .max_by_key(|tile| tile.instance.required_hours);
        if study.is_some() {
            return study;
        }
    }

    let best = tiles
        .tiles
        .iter()
        .filter(|tile| tile.instance.kind != ActivityKind::Sleep)
        .filter(allowed)
        .map(|tile| (need_score(tile, metrics), tile))
        .filter(|(score, _)| *score > 0.0)
        .max_by(|a, b| a.0.total_cmp(&b.0));

    best.map(|(_, tile)| tile).or(sleep)
}

fn choose_next_activity(
    tiles: Res<ActivityTiles>,
    clock: Res<ClockState>,
    metrics: Res<MetricStore>,
    daily_log: Res<DailyLog>,
    mut attempt_writer: EventWriter<ActivityAttemptEvent>,
) {
    let Some(tile) = pick_tile(&tiles, &clock, &metrics, &daily_log) else {
        warn!("[Autoplay] Level '{}' has nothing to do", tiles.level_name);
        return;
    };
    debug!("[Autoplay] {} → {}", clock.formatted(), tile.name);
    attempt_writer.send(ActivityAttemptEvent {
        instance: tile.instance.clone(),
    });
}

fn exit_on_game_over(
    mut game_over_reader: EventReader<GameOverEvent>,
    mut exit_writer: EventWriter<AppExit>,
) {
    for event in game_over_reader.read() {
        info!(
            "[Autoplay] Term finished: {:.1} — {}",
            event.score, event.classification
        );
        exit_writer.send(AppExit::Success);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::{parse_level, DEFAULT_LEVEL};

    fn campus() -> ActivityTiles {
        ActivityTiles::from_level(parse_level(DEFAULT_LEVEL).unwrap())
    }

    #[test]
    fn test_sleeps_at_end_of_day() {
        let tiles = campus();
        let mut clock = ClockState::default();
        clock.increment_hour(DAY_LENGTH);
        let tile = pick_tile(&tiles, &clock, &MetricStore::default(), &DailyLog::default()).unwrap();
        assert_eq!(tile.instance.kind, ActivityKind::Sleep);
    }

    #[test]
    fn test_fresh_morning_studies() {
        let tiles = campus();
        let tile = pick_tile(&tiles, &ClockState::default(), &MetricStore::default(), &DailyLog::default()).unwrap();
        assert_eq!(tile.instance.kind, ActivityKind::Study);
    }

    #[test]
    fn test_exhausted_player_recovers_before_studying() {
        let tiles = campus();
        let mut metrics = MetricStore::default();
        metrics.set(MetricKind::Energy, METRIC_MIN);
        let tile = pick_tile(&tiles, &ClockState::default(), &metrics, &DailyLog::default()).unwrap();
        assert_ne!(tile.instance.kind, ActivityKind::Study);
        assert!(check(&tile.instance, &ClockState::default(), &metrics).is_ok());
    }

    #[test]
    fn test_falls_back_to_sleep_when_nothing_fits() {
        let tiles = campus();
        let mut clock = ClockState::default();
        // One hour left: only the 1h meal fits, and a full player gains nothing from it.
        clock.increment_hour(DAY_LENGTH - 1);
        let mut metrics = MetricStore::default();
        metrics.set(MetricKind::Health, METRIC_MAX);
        let tile = pick_tile(&tiles, &clock, &metrics, &DailyLog::default()).unwrap();
        assert_eq!(tile.instance.kind, ActivityKind::Sleep);
    }

    #[test]
    fn test_studies_even_when_study_level_is_full() {
        let tiles = campus();
        let mut metrics = MetricStore::default();
        metrics.set(MetricKind::StudyLevel, METRIC_MAX);
        let tile = pick_tile(&tiles, &ClockState::default(), &metrics, &DailyLog::default()).unwrap();
        assert_eq!(tile.instance.kind, ActivityKind::Study);
    }

    #[test]
    fn test_empty_level_picks_nothing() {
        let tiles = ActivityTiles::default();
        assert!(pick_tile(&tiles, &ClockState::default(), &MetricStore::default(), &DailyLog::default()).is_none());
    }
}
