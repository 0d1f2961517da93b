//! Level layer — turns a map's interactive objects into activity tiles.
//!
//! Levels are JSON object layers: each object has a name, a tile position and
//! a string-keyed property map that `ActivityInstance::from_properties`
//! validates. The plugin runs in `OnEnter(GameState::Loading)`, fills the
//! `ActivityTiles` resource, then moves the game to `GameState::Playing`.

use bevy::prelude::*;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::activities::{ActivityInstance, InstanceError};
use crate::config::SimulationConfig;
use crate::shared::*;

/// Level used when the configured file is missing or broken.
pub const DEFAULT_LEVEL: &str = include_str!("../../assets/levels/campus.json");

#[derive(Debug, Error)]
pub enum LevelError {
    #[error("could not read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed level file: {0}")]
    Json(#[from] serde_json::Error),
    #[error("object `{object}`: {source}")]
    Object {
        object: String,
        #[source]
        source: InstanceError,
    },
    #[error("level `{0}` has no sleep tile")]
    NoSleepTile(String),
}

#[derive(Debug, Clone, Deserialize)]
struct RawLevel {
    name: String,
    #[serde(default)]
    objects: Vec<RawObject>,
}

#[derive(Debug, Clone, Deserialize)]
struct RawObject {
    name: String,
    x: i32,
    y: i32,
    #[serde(default)]
    properties: HashMap<String, String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ActivityTile {
    pub name: String,
    pub x: i32,
    pub y: i32,
    pub instance: ActivityInstance,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LevelDef {
    pub name: String,
    pub tiles: Vec<ActivityTile>,
}

/// Parses a level. Fails on the first bad object; a level with no way to
/// sleep could never finish, so that is rejected too.
pub fn parse_level(text: &str) -> Result<LevelDef, LevelError> {
    let raw: RawLevel = serde_json::from_str(text)?;

    let tiles = raw
        .objects
        .into_iter()
        .map(|object| {
            let instance = ActivityInstance::from_properties(&object.properties).map_err(
                |source| LevelError::Object {
                    object: object.name.clone(),
                    source,
                },
            )?;
            Ok(ActivityTile {
                name: object.name,
                x: object.x,
                y: object.y,
                instance,
            })
        })
        .collect::<Result<Vec<_>, LevelError>>()?;

    if !tiles
        .iter()
        .any(|tile| tile.instance.kind == ActivityKind::Sleep)
    {
        return Err(LevelError::NoSleepTile(raw.name));
    }

    Ok(LevelDef {
        name: raw.name,
        tiles,
    })
}

pub fn load_level(path: impl AsRef<Path>) -> Result<LevelDef, LevelError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| LevelError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_level(&text)
}

/// Activity tiles of the loaded level.
#[derive(Resource, Debug, Clone, Default)]
pub struct ActivityTiles {
    pub level_name: String,
    pub tiles: Vec<ActivityTile>,
}

impl ActivityTiles {
    pub fn from_level(level: LevelDef) -> Self {
        Self {
            level_name: level.name,
            tiles: level.tiles,
        }
    }

    pub fn find(&self, name: &str) -> Option<&ActivityTile> {
        self.tiles.iter().find(|tile| tile.name == name)
    }

    pub fn of_kind(&self, kind: ActivityKind) -> impl Iterator<Item = &ActivityTile> {
        self.tiles
            .iter()
            .filter(move |tile| tile.instance.kind == kind)
    }
}

pub struct LevelPlugin;

impl Plugin for LevelPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ActivityTiles>()
            .add_systems(OnEnter(GameState::Loading), load_activity_tiles);
    }
}

fn load_activity_tiles(
    config: Res<SimulationConfig>,
    mut tiles: ResMut<ActivityTiles>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    let level = match load_level(&config.level_path) {
        Ok(level) => level,
        Err(err) => {
            warn!("[Level] {} — falling back to the built-in campus", err);
            match parse_level(DEFAULT_LEVEL) {
                Ok(level) => level,
                Err(err) => {
                    error!("[Level] Built-in campus is broken: {}", err);
                    return;
                }
            }
        }
    };

    info!(
        "[Level] Loaded '{}' with {} activity tile(s)",
        level.name,
        level.tiles.len()
    );
    *tiles = ActivityTiles::from_level(level);
    next_state.set(GameState::Playing);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_level_parses() {
        let level = parse_level(DEFAULT_LEVEL).unwrap();
        assert_eq!(level.name, "Campus");
        assert_eq!(level.tiles.len(), 7);
        for kind in ActivityKind::ALL {
            assert!(
                level.tiles.iter().any(|t| t.instance.kind == kind),
                "campus has no {:?} tile",
                kind
            );
        }
    }

    #[test]
    fn test_tile_fields() {
        let tiles = ActivityTiles::from_level(parse_level(DEFAULT_LEVEL).unwrap());
        let desk = tiles.find("library_desk").unwrap();
        assert_eq!((desk.x, desk.y), (4, 7));
        assert_eq!(desk.instance.kind, ActivityKind::Study);
        assert_eq!(desk.instance.required_hours, 4);
        assert_eq!(tiles.of_kind(ActivityKind::Study).count(), 2);
    }

    #[test]
    fn test_bad_object_names_the_object() {
        let text = r#"{
            "name": "Broken",
            "objects": [
                { "name": "bed", "x": 0, "y": 0, "properties": {
                    "label": "Bed", "activity": "sleep", "hours": "0", "magnitudes": "0,0" } },
                { "name": "desk", "x": 1, "y": 0, "properties": {
                    "label": "Desk", "activity": "study", "hours": "2" } }
            ]
        }"#;
        let err = parse_level(text).unwrap_err();
        assert_eq!(err.to_string(), "object `desk`: missing property `magnitudes`");
    }

    #[test]
    fn test_level_without_sleep_is_rejected() {
        let text = r#"{
            "name": "Insomnia",
            "objects": [
                { "name": "sofa", "x": 0, "y": 0, "properties": {
                    "label": "Nap", "activity": "nap", "hours": "1", "magnitudes": "0.2" } }
            ]
        }"#;
        assert!(matches!(parse_level(text), Err(LevelError::NoSleepTile(name)) if name == "Insomnia"));
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(parse_level("{ not json"), Err(LevelError::Json(_))));
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            load_level("no/such/level.json"),
            Err(LevelError::Io { .. })
        ));
    }
}
