use crate::shared::*;

// ──────────────────────────────────────────────────────────────────────────────
// EFFECT TABLE
// ──────────────────────────────────────────────────────────────────────────────

use EffectDirection::{Decrease, Increase, Reset};
use MetricKind::{Energy, Happiness, Health, StudyLevel};

const STUDY: &[(MetricKind, EffectDirection)] =
    &[(StudyLevel, Increase), (Energy, Decrease), (Happiness, Decrease)];
const SLEEP: &[(MetricKind, EffectDirection)] = &[(Energy, Reset), (Health, Increase)];
const NAP: &[(MetricKind, EffectDirection)] = &[(Energy, Increase)];
const EAT: &[(MetricKind, EffectDirection)] =
    &[(Energy, Increase), (Happiness, Increase), (Health, Increase)];
const ENTERTAIN: &[(MetricKind, EffectDirection)] = &[(Happiness, Increase), (Energy, Decrease)];
const EXERCISE: &[(MetricKind, EffectDirection)] =
    &[(Health, Increase), (Happiness, Increase), (Energy, Decrease)];

/// Ordered effects of an activity. Level tile magnitude lists follow this order.
pub fn effects_of(kind: ActivityKind) -> &'static [(MetricKind, EffectDirection)] {
    match kind {
        ActivityKind::Study => STUDY,
        ActivityKind::Sleep => SLEEP,
        ActivityKind::Nap => NAP,
        ActivityKind::Eat => EAT,
        ActivityKind::Entertain => ENTERTAIN,
        ActivityKind::Exercise => EXERCISE,
    }
}

/// Direction `kind` moves `metric` in, or `None` if it leaves it alone.
pub fn effect_of(kind: ActivityKind, metric: MetricKind) -> Option<EffectDirection> {
    effects_of(kind)
        .iter()
        .find(|(m, _)| *m == metric)
        .map(|(_, direction)| *direction)
}

/// Position of `metric` in `kind`'s effect list.
pub fn index_of(kind: ActivityKind, metric: MetricKind) -> Option<usize> {
    effects_of(kind).iter().position(|(m, _)| *m == metric)
}
