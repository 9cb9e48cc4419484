//! External configuration loader.
//!
//! Reads `tombs.toml` (or the path given on the command line). Every field
//! has a default, so a missing file or a partial file still yields a
//! complete configuration.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{info, warn};

use crate::error::ConfigError;

// ── Public Config Struct ──

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct GameConfig {
    #[serde(default)]
    pub map: MapConfig,
    #[serde(default)]
    pub fov: FovConfig,
    #[serde(default)]
    pub log: LogConfig,
    #[serde(default)]
    pub progression: ProgressionConfig,
    #[serde(default)]
    pub items: ItemConfig,
    #[serde(default)]
    pub tables: SpawnTables,
    #[serde(default)]
    pub game: SessionConfig,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct MapConfig {
    #[serde(default = "default_map_width")]
    pub width: i32,
    #[serde(default = "default_map_height")]
    pub height: i32,
    #[serde(default = "default_room_min")]
    pub room_min_size: i32,
    #[serde(default = "default_room_max")]
    pub room_max_size: i32,
    #[serde(default = "default_max_rooms")]
    pub max_rooms: u32,
    #[serde(default = "default_room_monsters")]
    pub max_room_monsters: i32,
    #[serde(default = "default_room_items")]
    pub max_room_items: i32,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct FovConfig {
    #[serde(default = "default_torch_radius")]
    pub torch_radius: i32,
    #[serde(default = "default_light_walls")]
    pub light_walls: bool,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct LogConfig {
    /// Visible message rows; the panel height minus its title row.
    #[serde(default = "default_log_height")]
    pub height: usize,
    #[serde(default = "default_log_width")]
    pub width: usize,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct ProgressionConfig {
    #[serde(default = "default_level_up_base")]
    pub base: i32,
    #[serde(default = "default_level_up_factor")]
    pub factor: i32,
    #[serde(default = "default_constitution_bonus")]
    pub constitution_bonus: i32,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct ItemConfig {
    #[serde(default = "default_heal_amount")]
    pub heal_amount: i32,
    #[serde(default = "default_lightning_damage")]
    pub lightning_damage: i32,
    #[serde(default = "default_lightning_range")]
    pub lightning_range: f32,
    #[serde(default = "default_confuse_turns")]
    pub confuse_turns: i32,
    #[serde(default = "default_confuse_range")]
    pub confuse_range: f32,
    #[serde(default = "default_fireball_radius")]
    pub fireball_radius: f32,
    #[serde(default = "default_fireball_damage")]
    pub fireball_damage: i32,
}

/// Relative spawn weights. Each table is rolled as cumulative bands.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct SpawnTables {
    #[serde(default = "default_orc_weight")]
    pub orc: u32,
    #[serde(default = "default_troll_weight")]
    pub troll: u32,
    #[serde(default = "default_heal_weight")]
    pub healing_potion: u32,
    #[serde(default = "default_band_weight")]
    pub lightning_scroll: u32,
    #[serde(default = "default_band_weight")]
    pub fireball_scroll: u32,
    #[serde(default = "default_band_weight")]
    pub confusion_scroll: u32,
}

#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TargetingMode {
    /// The input source picks a tile or monster.
    #[default]
    Explicit,
    /// The nearest visible monster in range is chosen automatically.
    Auto,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct SessionConfig {
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default = "default_save_path")]
    pub save_path: PathBuf,
    #[serde(default)]
    pub targeting: TargetingMode,
}

// ── Defaults ──

fn default_map_width() -> i32 { 80 }
fn default_map_height() -> i32 { 18 }
fn default_room_min() -> i32 { 6 }
fn default_room_max() -> i32 { 10 }
fn default_max_rooms() -> u32 { 30 }
fn default_room_monsters() -> i32 { 3 }
fn default_room_items() -> i32 { 2 }
fn default_torch_radius() -> i32 { 10 }
fn default_light_walls() -> bool { true }
fn default_log_height() -> usize { 6 }
fn default_log_width() -> usize { 58 }
fn default_level_up_base() -> i32 { 200 }
fn default_level_up_factor() -> i32 { 150 }
fn default_constitution_bonus() -> i32 { 20 }
fn default_heal_amount() -> i32 { 4 }
fn default_lightning_damage() -> i32 { 20 }
fn default_lightning_range() -> f32 { 5.0 }
fn default_confuse_turns() -> i32 { 10 }
fn default_confuse_range() -> f32 { 8.0 }
fn default_fireball_radius() -> f32 { 3.0 }
fn default_fireball_damage() -> i32 { 12 }
fn default_orc_weight() -> u32 { 80 }
fn default_troll_weight() -> u32 { 20 }
fn default_heal_weight() -> u32 { 70 }
fn default_band_weight() -> u32 { 10 }
fn default_save_path() -> PathBuf { PathBuf::from("savegame.json") }

impl Default for MapConfig {
    fn default() -> Self {
        MapConfig {
            width: default_map_width(),
            height: default_map_height(),
            room_min_size: default_room_min(),
            room_max_size: default_room_max(),
            max_rooms: default_max_rooms(),
            max_room_monsters: default_room_monsters(),
            max_room_items: default_room_items(),
        }
    }
}

impl Default for FovConfig {
    fn default() -> Self {
        FovConfig {
            torch_radius: default_torch_radius(),
            light_walls: default_light_walls(),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        LogConfig {
            height: default_log_height(),
            width: default_log_width(),
        }
    }
}

impl Default for ProgressionConfig {
    fn default() -> Self {
        ProgressionConfig {
            base: default_level_up_base(),
            factor: default_level_up_factor(),
            constitution_bonus: default_constitution_bonus(),
        }
    }
}

impl Default for ItemConfig {
    fn default() -> Self {
        ItemConfig {
            heal_amount: default_heal_amount(),
            lightning_damage: default_lightning_damage(),
            lightning_range: default_lightning_range(),
            confuse_turns: default_confuse_turns(),
            confuse_range: default_confuse_range(),
            fireball_radius: default_fireball_radius(),
            fireball_damage: default_fireball_damage(),
        }
    }
}

impl Default for SpawnTables {
    fn default() -> Self {
        SpawnTables {
            orc: default_orc_weight(),
            troll: default_troll_weight(),
            healing_potion: default_heal_weight(),
            lightning_scroll: default_band_weight(),
            fireball_scroll: default_band_weight(),
            confusion_scroll: default_band_weight(),
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            seed: None,
            save_path: default_save_path(),
            targeting: TargetingMode::default(),
        }
    }
}

// ── Loading ──

impl GameConfig {
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml(&text)
    }

    /// Loads `path` if it exists, otherwise the built-in defaults. A file
    /// that exists but does not parse is reported and ignored.
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            info!(path = %path.display(), "no config file, using defaults");
            return Self::default();
        }
        match Self::load(path) {
            Ok(config) => {
                info!(path = %path.display(), "config loaded");
                config
            }
            Err(err) => {
                warn!(error = %err, "config rejected, using defaults");
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_yields_defaults() {
        let config = GameConfig::from_toml("").unwrap();
        assert_eq!(config, GameConfig::default());
        assert_eq!(config.map.width, 80);
        assert_eq!(config.log.height, 6);
        assert_eq!(config.progression.base, 200);
    }

    #[test]
    fn partial_section_keeps_other_defaults() {
        let config = GameConfig::from_toml(
            "[map]\nmax_rooms = 5\n[game]\nseed = 42\ntargeting = \"auto\"\n",
        )
        .unwrap();
        assert_eq!(config.map.max_rooms, 5);
        assert_eq!(config.map.room_max_size, 10);
        assert_eq!(config.game.seed, Some(42));
        assert_eq!(config.game.targeting, TargetingMode::Auto);
        assert_eq!(config.tables.orc, 80);
    }

    #[test]
    fn shipped_config_matches_defaults() {
        let config = GameConfig::from_toml(include_str!("../tombs.toml")).unwrap();
        assert_eq!(config, GameConfig::default());
    }

    #[test]
    fn malformed_toml_is_an_error() {
        assert!(GameConfig::from_toml("[map\nwidth = ").is_err());
    }
}
