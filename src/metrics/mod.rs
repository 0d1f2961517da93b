//! Metrics domain — the player's Energy, Happiness, Study Level and Health.
//!
//! Every value lives in `[METRIC_MIN, METRIC_MAX]`. Mutations clamp instead of
//! failing. Each change is queued on the store and relayed as a
//! `MetricChangedEvent` by `relay_metric_changes`, so presentation code can
//! react without the store knowing about it.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::shared::*;

pub struct MetricsPlugin;

impl Plugin for MetricsPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            relay_metric_changes.after(crate::activities::handle_activity_attempts),
        );
    }
}

/// One tracked player attribute.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Metric {
    pub kind: MetricKind,
    value: f32,
    /// Sum of this metric's value at each sleep.
    pub lifetime_total: f32,
    /// Normalisation denominator for scoring: one full point per game day.
    pub max_lifetime_total: f32,
}

impl Metric {
    fn new(kind: MetricKind, days: u32) -> Self {
        Self {
            kind,
            value: kind.default_value(),
            lifetime_total: 0.0,
            max_lifetime_total: days as f32,
        }
    }

    pub fn value(&self) -> f32 {
        self.value
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricChange {
    pub metric: MetricKind,
    pub old: f32,
    pub new: f32,
}

#[derive(Resource, Debug, Clone)]
pub struct MetricStore {
    metrics: [Metric; 4],
    pending: Vec<MetricChange>,
}

impl Default for MetricStore {
    fn default() -> Self {
        Self::new(DAYS)
    }
}

impl MetricStore {
    pub fn new(days: u32) -> Self {
        Self {
            metrics: MetricKind::ALL.map(|kind| Metric::new(kind, days)),
            pending: Vec::new(),
        }
    }

    pub fn metric(&self, kind: MetricKind) -> &Metric {
        &self.metrics[kind.index()]
    }

    pub fn get(&self, kind: MetricKind) -> f32 {
        self.metrics[kind.index()].value
    }

    pub fn set(&mut self, kind: MetricKind, value: f32) {
        let new = clamp_metric(value);
        let slot = &mut self.metrics[kind.index()];
        let old = slot.value;
        slot.value = new;
        if old != new {
            self.pending.push(MetricChange { metric: kind, old, new });
        }
    }

    pub fn increase(&mut self, kind: MetricKind, amount: f32) {
        self.set(kind, self.get(kind) + amount);
    }

    /// Never rejected: a decrease past the floor lands on `METRIC_MIN`.
    pub fn decrease(&mut self, kind: MetricKind, amount: f32) {
        self.set(kind, self.get(kind) - amount);
    }

    pub fn reset_to_default(&mut self, kind: MetricKind) {
        self.set(kind, kind.default_value());
    }

    /// Adds to the lifetime accumulator. Unclamped.
    pub fn increase_total(&mut self, kind: MetricKind, amount: f32) {
        self.metrics[kind.index()].lifetime_total += amount;
    }

    pub fn total(&self, kind: MetricKind) -> f32 {
        self.metrics[kind.index()].lifetime_total
    }

    pub fn max_total(&self, kind: MetricKind) -> f32 {
        self.metrics[kind.index()].max_lifetime_total
    }

    /// Adds every metric's current value to its lifetime total.
    pub fn accumulate_totals(&mut self) {
        for metric in self.metrics.iter_mut() {
            metric.lifetime_total += metric.value;
        }
    }

    pub fn apply(&mut self, kind: MetricKind, direction: EffectDirection, magnitude: f32) {
        match direction {
            EffectDirection::Increase => self.increase(kind, magnitude),
            EffectDirection::Decrease => self.decrease(kind, magnitude),
            EffectDirection::Reset => self.reset_to_default(kind),
        }
    }

    pub fn has_pending_changes(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Takes every change recorded since the last drain, oldest first.
    pub fn drain_changes(&mut self) -> Vec<MetricChange> {
        std::mem::take(&mut self.pending)
    }
}

fn clamp_metric(value: f32) -> f32 {
    if value.is_nan() {
        return METRIC_MIN;
    }
    value.clamp(METRIC_MIN, METRIC_MAX)
}

/// Forwards queued store changes to `MetricChangedEvent` readers.
pub fn relay_metric_changes(
    mut store: ResMut<MetricStore>,
    mut writer: EventWriter<MetricChangedEvent>,
) {
    if !store.bypass_change_detection().has_pending_changes() {
        return;
    }
    for change in store.drain_changes() {
        writer.send(MetricChangedEvent {
            metric: change.metric,
            old: change.old,
            new: change.new,
        });
    }
}
