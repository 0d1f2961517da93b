//! Activity instances — concrete, placed occurrences of an activity kind.
//!
//! Built from string-keyed tile properties:
//!
//! | key          | example                 |
//! |--------------|-------------------------|
//! | `label`      | `Revise in the library` |
//! | `activity`   | `study`                 |
//! | `hours`      | `4`                     |
//! | `magnitudes` | `0.2, 0.3, 0.1`         |
//!
//! `magnitudes` is positional: one entry per effect in the catalog, in the
//! catalog's order. It is aligned exactly once, here, and stored keyed by
//! metric so nothing downstream depends on ordering.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::collections::HashMap;
use thiserror::Error;

use super::catalog::effects_of;
use crate::shared::*;

pub const LABEL_KEY: &str = "label";
pub const ACTIVITY_KEY: &str = "activity";
pub const HOURS_KEY: &str = "hours";
pub const MAGNITUDES_KEY: &str = "magnitudes";

#[derive(Debug, Clone, PartialEq, Error)]
pub enum InstanceError {
    #[error("missing property `{0}`")]
    MissingProperty(&'static str),
    #[error("property `{0}` is empty")]
    EmptyProperty(&'static str),
    #[error("unknown activity `{0}`")]
    UnknownActivity(String),
    #[error("`hours` must be a non-negative integer, got `{0}`")]
    InvalidHours(String),
    #[error("magnitude #{index} is not a number: `{value}`")]
    InvalidMagnitude { index: usize, value: String },
    #[error("magnitude #{index} must be finite and non-negative, got {value}")]
    OutOfRangeMagnitude { index: usize, value: f32 },
    #[error("{kind:?} has {expected} effect(s) but {found} magnitude(s) were given")]
    MagnitudeCount {
        kind: ActivityKind,
        expected: usize,
        found: usize,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityInstance {
    pub display_text: String,
    pub kind: ActivityKind,
    pub required_hours: u32,
    magnitudes: BTreeMap<MetricKind, f32>,
}

impl ActivityInstance {
    /// Builds an instance from magnitudes listed in catalog effect order.
    pub fn new(
        display_text: impl Into<String>,
        kind: ActivityKind,
        required_hours: u32,
        magnitudes: &[f32],
    ) -> Result<Self, InstanceError> {
        let display_text = display_text.into();
        if display_text.trim().is_empty() {
            return Err(InstanceError::EmptyProperty(LABEL_KEY));
        }

        let effects = effects_of(kind);
        if magnitudes.len() != effects.len() {
            return Err(InstanceError::MagnitudeCount {
                kind,
                expected: effects.len(),
                found: magnitudes.len(),
            });
        }

        let mut by_metric = BTreeMap::new();
        for (index, ((metric, _), &value)) in effects.iter().zip(magnitudes).enumerate() {
            if !value.is_finite() || value < 0.0 {
                return Err(InstanceError::OutOfRangeMagnitude { index, value });
            }
            by_metric.insert(*metric, value);
        }

        Ok(Self {
            display_text,
            kind,
            required_hours,
            magnitudes: by_metric,
        })
    }

    pub fn from_properties(properties: &HashMap<String, String>) -> Result<Self, InstanceError> {
        let label = required(properties, LABEL_KEY)?;

        let kind_name = required(properties, ACTIVITY_KEY)?;
        let kind = ActivityKind::from_name(kind_name)
            .ok_or_else(|| InstanceError::UnknownActivity(kind_name.to_string()))?;

        let hours_text = required(properties, HOURS_KEY)?;
        let required_hours = hours_text
            .parse::<u32>()
            .map_err(|_| InstanceError::InvalidHours(hours_text.to_string()))?;

        let magnitudes = parse_magnitudes(required(properties, MAGNITUDES_KEY)?)?;

        Self::new(label, kind, required_hours, &magnitudes)
    }

    /// Magnitude for `metric`, or 0.0 if this activity does not touch it.
    pub fn magnitude(&self, metric: MetricKind) -> f32 {
        self.magnitudes.get(&metric).copied().unwrap_or(0.0)
    }

    /// `(metric, direction, magnitude)` in catalog order.
    pub fn effects(&self) -> impl Iterator<Item = (MetricKind, EffectDirection, f32)> + '_ {
        effects_of(self.kind)
            .iter()
            .map(|&(metric, direction)| (metric, direction, self.magnitude(metric)))
    }
}

fn required<'a>(
    properties: &'a HashMap<String, String>,
    key: &'static str,
) -> Result<&'a str, InstanceError> {
    let value = properties
        .get(key)
        .ok_or(InstanceError::MissingProperty(key))?
        .trim();
    if value.is_empty() {
        return Err(InstanceError::EmptyProperty(key));
    }
    Ok(value)
}

/// Parses `"0.2, 0.3,0.1"` into floats. Empty entries are an error.
pub fn parse_magnitudes(text: &str) -> Result<Vec<f32>, InstanceError> {
    text.split(',')
        .enumerate()
        .map(|(index, raw)| {
            let raw = raw.trim();
            raw.parse::<f32>()
                .map_err(|_| InstanceError::InvalidMagnitude {
                    index,
                    value: raw.to_string(),
                })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn props(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn study_props() -> HashMap<String, String> {
        props(&[
            ("label", "Revise in the library"),
            ("activity", "Study"),
            ("hours", "4"),
            ("magnitudes", "0.2, 0.3,0.1"),
        ])
    }

    #[test]
    fn test_parse_valid_study_tile() {
        let instance = ActivityInstance::from_properties(&study_props()).unwrap();
        assert_eq!(instance.display_text, "Revise in the library");
        assert_eq!(instance.kind, ActivityKind::Study);
        assert_eq!(instance.required_hours, 4);
        assert_eq!(instance.magnitude(MetricKind::StudyLevel), 0.2);
        assert_eq!(instance.magnitude(MetricKind::Energy), 0.3);
        assert_eq!(instance.magnitude(MetricKind::Happiness), 0.1);
        assert_eq!(instance.magnitude(MetricKind::Health), 0.0);
    }

    #[test]
    fn test_effects_follow_catalog_order() {
        let instance = ActivityInstance::from_properties(&study_props()).unwrap();
        let effects: Vec<_> = instance.effects().collect();
        assert_eq!(
            effects,
            vec![
                (MetricKind::StudyLevel, EffectDirection::Increase, 0.2),
                (MetricKind::Energy, EffectDirection::Decrease, 0.3),
                (MetricKind::Happiness, EffectDirection::Decrease, 0.1),
            ]
        );
    }

    #[test]
    fn test_missing_properties() {
        for key in ["label", "activity", "hours", "magnitudes"] {
            let mut p = study_props();
            p.remove(key);
            let err = ActivityInstance::from_properties(&p).unwrap_err();
            assert!(
                matches!(err, InstanceError::MissingProperty(k) if k == key),
                "expected missing {}, got {:?}",
                key,
                err
            );
        }
    }

    #[test]
    fn test_blank_label_rejected() {
        let mut p = study_props();
        p.insert("label".into(), "   ".into());
        assert_eq!(
            ActivityInstance::from_properties(&p),
            Err(InstanceError::EmptyProperty("label"))
        );
    }

    #[test]
    fn test_unknown_activity() {
        let mut p = study_props();
        p.insert("activity".into(), "party".into());
        assert_eq!(
            ActivityInstance::from_properties(&p),
            Err(InstanceError::UnknownActivity("party".into()))
        );
    }

    #[test]
    fn test_bad_hours() {
        for bad in ["four", "-2", "1.5"] {
            let mut p = study_props();
            p.insert("hours".into(), bad.into());
            assert_eq!(
                ActivityInstance::from_properties(&p),
                Err(InstanceError::InvalidHours(bad.into()))
            );
        }
    }

    #[test]
    fn test_non_numeric_magnitude() {
        let mut p = study_props();
        p.insert("magnitudes".into(), "0.2,abc,0.1".into());
        assert_eq!(
            ActivityInstance::from_properties(&p),
            Err(InstanceError::InvalidMagnitude {
                index: 1,
                value: "abc".into()
            })
        );
    }

    #[test]
    fn test_trailing_comma_is_an_error() {
        assert!(matches!(
            parse_magnitudes("0.1,0.2,"),
            Err(InstanceError::InvalidMagnitude { index: 2, .. })
        ));
    }

    #[test]
    fn test_magnitude_count_mismatch() {
        let mut p = study_props();
        p.insert("magnitudes".into(), "0.2,0.3".into());
        assert_eq!(
            ActivityInstance::from_properties(&p),
            Err(InstanceError::MagnitudeCount {
                kind: ActivityKind::Study,
                expected: 3,
                found: 2
            })
        );
    }

    #[test]
    fn test_negative_magnitude_rejected() {
        let err = ActivityInstance::new("Nap", ActivityKind::Nap, 1, &[-0.2]).unwrap_err();
        assert_eq!(err, InstanceError::OutOfRangeMagnitude { index: 0, value: -0.2 });
    }

    #[test]
    fn test_error_messages_are_descriptive() {
        let err = InstanceError::MagnitudeCount {
            kind: ActivityKind::Eat,
            expected: 3,
            found: 1,
        };
        assert_eq!(err.to_string(), "Eat has 3 effect(s) but 1 magnitude(s) were given");
        assert_eq!(
            InstanceError::MissingProperty("hours").to_string(),
            "missing property `hours`"
        );
    }
}
