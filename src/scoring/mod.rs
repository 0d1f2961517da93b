//! End-of-term scoring — weighted lifetime totals and degree classification.
//!
//! Triggered on entering `GameState::GameOver`. Each scored metric contributes
//! `total / max * weight`; the weighted sum is normalised to 0–100. Finishing
//! the term with too many days spent not studying overrides the result with a
//! fixed failing score.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::activities::DailyLog;
use crate::config::SimulationConfig;
use crate::metrics::MetricStore;
use crate::shared::*;

pub struct ScoringPlugin;

impl Plugin for ScoringPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(OnEnter(GameState::GameOver), compute_final_result);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreWeights {
    pub energy: f32,
    pub study: f32,
    pub happiness: f32,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            energy: 1.2,
            study: 2.0,
            happiness: 1.0,
        }
    }
}

impl ScoreWeights {
    pub fn sum(&self) -> f32 {
        self.energy + self.study + self.happiness
    }
}

/// Forces `score` once `days_not_studied` exceeds `max_days_not_studied`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScorePenalty {
    pub max_days_not_studied: u32,
    pub score: f32,
}

impl Default for ScorePenalty {
    fn default() -> Self {
        Self {
            max_days_not_studied: 1,
            score: 39.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScoreInputs {
    pub energy_total: f32,
    pub energy_max: f32,
    pub study_total: f32,
    pub study_max: f32,
    pub happiness_total: f32,
    pub happiness_max: f32,
    pub days_not_studied: u32,
}

impl ScoreInputs {
    pub fn from_session(metrics: &MetricStore, log: &DailyLog) -> Self {
        Self {
            energy_total: metrics.total(MetricKind::Energy),
            energy_max: metrics.max_total(MetricKind::Energy),
            study_total: metrics.total(MetricKind::StudyLevel),
            study_max: metrics.max_total(MetricKind::StudyLevel),
            happiness_total: metrics.total(MetricKind::Happiness),
            happiness_max: metrics.max_total(MetricKind::Happiness),
            days_not_studied: log.days_not_studied,
        }
    }
}

fn ratio(total: f32, max: f32) -> f32 {
    if max > 0.0 {
        total / max
    } else {
        0.0
    }
}

/// Score in `[0, 100]`.
pub fn score(inputs: &ScoreInputs, weights: &ScoreWeights, penalty: &ScorePenalty) -> f32 {
    if inputs.days_not_studied > penalty.max_days_not_studied {
        return penalty.score;
    }

    let max_possible = weights.sum();
    if max_possible <= 0.0 {
        return 0.0;
    }

    let weighted_sum = ratio(inputs.energy_total, inputs.energy_max) * weights.energy
        + ratio(inputs.study_total, inputs.study_max) * weights.study
        + ratio(inputs.happiness_total, inputs.happiness_max) * weights.happiness;

    (weighted_sum / max_possible * 100.0).clamp(0.0, 100.0)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DegreeClass {
    First,
    UpperSecond,
    LowerSecond,
    Third,
    Fail,
}

impl DegreeClass {
    /// Bands include their lower bound.
    pub fn from_score(score: f32) -> Self {
        if score >= 70.0 {
            DegreeClass::First
        } else if score >= 60.0 {
            DegreeClass::UpperSecond
        } else if score >= 50.0 {
            DegreeClass::LowerSecond
        } else if score >= 40.0 {
            DegreeClass::Third
        } else {
            DegreeClass::Fail
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DegreeClass::First => "First-class Honours",
            DegreeClass::UpperSecond => "Upper second-class Honours",
            DegreeClass::LowerSecond => "Lower second-class Honours",
            DegreeClass::Third => "Third-class Honours",
            DegreeClass::Fail => "Fail",
        }
    }
}

pub fn classify(score: f32) -> &'static str {
    DegreeClass::from_score(score).label()
}

/// Scores the finished session into `FinalResult` and announces it.
pub fn compute_final_result(
    metrics: Res<MetricStore>,
    daily_log: Res<DailyLog>,
    config: Res<SimulationConfig>,
    mut result: ResMut<FinalResult>,
    mut game_over_writer: EventWriter<GameOverEvent>,
) {
    let inputs = ScoreInputs::from_session(&metrics, &daily_log);
    let final_score = score(&inputs, &config.score_weights, &config.penalty);
    let classification = classify(final_score);

    if inputs.days_not_studied > config.penalty.max_days_not_studied {
        warn!(
            "[Score] {} day(s) without study — score forced to {}",
            inputs.days_not_studied, config.penalty.score
        );
    }
    info!(
        "[Score] Final score {:.2} → {} (inputs: {:?})",
        final_score, classification, inputs
    );

    *result = FinalResult {
        score: final_score,
        classification,
        days_not_studied: inputs.days_not_studied,
        computed: true,
    };

    game_over_writer.send(GameOverEvent {
        score: final_score,
        classification,
    });
}
