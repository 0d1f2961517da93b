//! Activity resolver — decides whether an activity may run now, then runs it.
//!
//! Rules for anything other than sleep, first match wins:
//! 1. the day is over (hour == day length) → `TimeToSleep`
//! 2. the activity would run past the end of the day → `NotEnoughTime`
//! 3. any Decrease effect costs more than the metric currently holds →
//!    `NotEnoughResources`, listing every short metric
//!
//! Sleep always succeeds. It banks each metric's pre-sleep value into the
//! lifetime totals, applies its own effects, then either rolls the calendar
//! over or, on the last day, ends the game.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::instance::ActivityInstance;
use crate::calendar::ClockState;
use crate::metrics::MetricStore;
use crate::shared::*;
use crate::streaks::StreakTracker;

/// A rule-based refusal. Not an error: the caller picks feedback text from it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Rejection {
    TimeToSleep,
    NotEnoughTime,
    NotEnoughResources(Vec<MetricKind>),
}

impl Rejection {
    pub fn message(&self) -> String {
        match self {
            Rejection::TimeToSleep => "It's late. Time to sleep.".to_string(),
            Rejection::NotEnoughTime => "Not enough time left today.".to_string(),
            Rejection::NotEnoughResources(metrics) => {
                let names: Vec<String> = metrics.iter().map(|m| m.label().to_lowercase()).collect();
                format!("Not enough {}.", join_names(&names))
            }
        }
    }
}

fn join_names(names: &[String]) -> String {
    match names {
        [] => String::new(),
        [only] => only.clone(),
        [init @ .., last] => format!("{} and {}", init.join(", "), last),
    }
}

/// Where the session stands after an accepted activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Applied {
    SameDay,
    NewDay { day: u32 },
    GameOver,
}

/// Per-day bookkeeping the streak and score rules need.
///
/// Tallies are cleared at every sleep, so "first performance today" means
/// first since the player last slept.
#[derive(Resource, Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DailyLog {
    performed_today: HashMap<ActivityKind, u32>,
    /// Days that ended without any study session.
    pub days_not_studied: u32,
}

impl DailyLog {
    pub fn times_performed_today(&self, kind: ActivityKind) -> u32 {
        self.performed_today.get(&kind).copied().unwrap_or(0)
    }

    /// Returns the tally for `kind` after counting this performance.
    fn record(&mut self, kind: ActivityKind) -> u32 {
        let tally = self.performed_today.entry(kind).or_insert(0);
        *tally += 1;
        *tally
    }

    fn close_day(&mut self) {
        if self.times_performed_today(ActivityKind::Study) == 0 {
            self.days_not_studied += 1;
        }
        self.performed_today.clear();
    }
}

/// Checks the rules without touching any state.
pub fn check(
    instance: &ActivityInstance,
    clock: &ClockState,
    metrics: &MetricStore,
) -> Result<(), Rejection> {
    if instance.kind == ActivityKind::Sleep {
        return Ok(());
    }

    if clock.is_end_of_day() {
        return Err(Rejection::TimeToSleep);
    }

    if clock.hour().saturating_add(instance.required_hours) > clock.day_length() {
        return Err(Rejection::NotEnoughTime);
    }

    let short: Vec<MetricKind> = instance
        .effects()
        .filter(|(metric, direction, magnitude)| {
            *direction == EffectDirection::Decrease && metrics.get(*metric) < *magnitude
        })
        .map(|(metric, _, _)| metric)
        .collect();
    if !short.is_empty() {
        return Err(Rejection::NotEnoughResources(short));
    }

    Ok(())
}

/// Validates and, if allowed, performs `instance`.
pub fn attempt(
    instance: &ActivityInstance,
    clock: &mut ClockState,
    metrics: &mut MetricStore,
    streaks: &mut StreakTracker,
    log: &mut DailyLog,
) -> Result<Applied, Rejection> {
    if let Err(rejection) = check(instance, clock, metrics) {
        debug!(
            "[Activity] Rejected '{}' at {}: {:?}",
            instance.display_text,
            clock.formatted(),
            rejection
        );
        return Err(rejection);
    }

    let day = clock.day();
    let is_sleep = instance.kind == ActivityKind::Sleep;

    // Totals must see the values the player went to bed with.
    if is_sleep {
        metrics.accumulate_totals();
    }

    for (metric, direction, magnitude) in instance.effects() {
        metrics.apply(metric, direction, magnitude);
    }

    if log.record(instance.kind) == 1 {
        streaks.record_performed(instance.kind, day);
    }

    if !is_sleep {
        clock.increment_hour(instance.required_hours);
        return Ok(Applied::SameDay);
    }

    log.close_day();

    if clock.is_end_of_days() {
        info!(
            "[Activity] Slept on the final day ({}). Term over.",
            clock.formatted()
        );
        return Ok(Applied::GameOver);
    }

    clock.increment_day(1);
    info!("[Activity] Slept. New day: {}", clock.formatted());
    Ok(Applied::NewDay { day: clock.day() })
}
