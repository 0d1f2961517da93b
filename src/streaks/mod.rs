//! Streak tracker — consecutive-day counters per activity kind.
//!
//! Passive: the activity resolver calls `record_performed` the first time a
//! kind is performed on a given day. Nothing here reads events.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::shared::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StreakEntry {
    pub count: u32,
    /// `None` until the kind is first performed.
    pub last_performed_day: Option<u32>,
}

#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreakTracker {
    entries: HashMap<ActivityKind, StreakEntry>,
}

impl Default for StreakTracker {
    fn default() -> Self {
        Self {
            entries: ActivityKind::ALL
                .into_iter()
                .map(|kind| (kind, StreakEntry::default()))
                .collect(),
        }
    }
}

impl StreakTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Extends the streak if `kind` was last performed on `day - 1`,
    /// otherwise restarts it at 1. The last-performed day is always updated.
    pub fn record_performed(&mut self, kind: ActivityKind, day: u32) {
        let entry = self.entries.entry(kind).or_default();
        let consecutive = day
            .checked_sub(1)
            .is_some_and(|yesterday| entry.last_performed_day == Some(yesterday));
        if consecutive {
            entry.count += 1;
        } else {
            entry.count = 1;
        }
        entry.last_performed_day = Some(day);
    }

    pub fn reset(&mut self, kind: ActivityKind) {
        self.entries.insert(kind, StreakEntry::default());
    }

    pub fn streak_of(&self, kind: ActivityKind) -> u32 {
        self.entries.get(&kind).map_or(0, |entry| entry.count)
    }

    pub fn entry(&self, kind: ActivityKind) -> StreakEntry {
        self.entries.get(&kind).copied().unwrap_or_default()
    }
}
