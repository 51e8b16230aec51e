//! Data layer — farm configuration and built-in game data.
//!
//! `DataPlugin` runs in OnEnter(GameState::Loading): it reads the farm config
//! from a RON file (falling back to the built-in defaults when the file is
//! missing or invalid), installs a fresh `FarmSession` built from it, then
//! transitions the game into GameState::Playing.

mod crops;
mod seasons;

pub use crops::{default_crops, CropTable};
pub use seasons::default_season_cycle;

use std::path::{Path, PathBuf};

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::session::FarmSession;
use crate::shared::*;

pub const DEFAULT_CONFIG_PATH: &str = "assets/config/farm.ron";

// ═══════════════════════════════════════════════════════════════════════
// CONFIG
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read farm config {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse farm config: {0}")]
    Parse(#[from] ron::error::SpannedError),
    #[error("invalid farm config: {0}")]
    Invalid(String),
}

/// Everything fixed at session start: world geometry, buildings, crops,
/// the season cycle, starting stock and scheduler cadence.
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FarmConfig {
    pub world_size: i32,
    pub field_offset: i32,
    pub field_size: i32,
    pub spawn: TilePos,
    pub buildings: Vec<Building>,
    pub crops: CropTable,
    pub seasons: Vec<SeasonRule>,
    pub starting_gold: u32,
    /// Seeds of every crop in the starting inventory.
    pub starting_seeds: u32,
    pub walk_tick_secs: f32,
    pub run_tick_secs: f32,
}

impl Default for FarmConfig {
    fn default() -> Self {
        Self {
            world_size: WORLD_SIZE,
            field_offset: FIELD_OFFSET,
            field_size: FIELD_SIZE,
            spawn: TilePos::new(FIELD_OFFSET + 4, FIELD_OFFSET + 4),
            buildings: vec![
                Building {
                    kind: BuildingKind::Farmhouse,
                    origin: TilePos::new(FIELD_OFFSET - 3, FIELD_OFFSET),
                    width: 2,
                    height: 2,
                },
                Building {
                    kind: BuildingKind::Silo,
                    origin: TilePos::new(FIELD_OFFSET + FIELD_SIZE + 1, FIELD_OFFSET + 2),
                    width: 1,
                    height: 1,
                },
            ],
            crops: CropTable::default(),
            seasons: default_season_cycle(),
            starting_gold: 200,
            starting_seeds: 10,
            walk_tick_secs: WALK_TICK_SECS,
            run_tick_secs: RUN_TICK_SECS,
        }
    }
}

impl FarmConfig {
    pub fn from_ron_str(source: &str) -> Result<Self, ConfigError> {
        let config: FarmConfig = ron::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_ron_str(&source)
    }

    /// Reject geometry the grid and scheduler can't work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.world_size <= 0 {
            return Err(ConfigError::Invalid("world_size must be positive".into()));
        }
        if self.field_size <= 0
            || self.field_offset < 0
            || self.field_offset + self.field_size > self.world_size
        {
            return Err(ConfigError::Invalid(format!(
                "farmland {}+{} does not fit a {} world",
                self.field_offset, self.field_size, self.world_size
            )));
        }
        for building in &self.buildings {
            let fits = building.width > 0
                && building.height > 0
                && building.origin.x >= 0
                && building.origin.y >= 0
                && building.origin.x + building.width <= self.world_size
                && building.origin.y + building.height <= self.world_size;
            if !fits {
                return Err(ConfigError::Invalid(format!(
                    "{:?} at {} is outside the world",
                    building.kind, building.origin
                )));
            }
        }
        let spawn_in_bounds = (0..self.world_size).contains(&self.spawn.x)
            && (0..self.world_size).contains(&self.spawn.y);
        if !spawn_in_bounds || self.buildings.iter().any(|b| b.covers(self.spawn)) {
            return Err(ConfigError::Invalid(format!(
                "spawn {} is not walkable",
                self.spawn
            )));
        }
        if self.seasons.is_empty() {
            return Err(ConfigError::Invalid("season cycle is empty".into()));
        }
        if self.crops.is_empty() {
            return Err(ConfigError::Invalid("crop table is empty".into()));
        }
        let mut kinds: Vec<CropKind> = self.crops.kinds().collect();
        kinds.sort();
        kinds.dedup();
        if kinds.len() != self.crops.len() {
            return Err(ConfigError::Invalid("crop table lists a crop twice".into()));
        }
        if self.walk_tick_secs <= 0.0 || self.run_tick_secs <= 0.0 {
            return Err(ConfigError::Invalid("tick intervals must be positive".into()));
        }
        Ok(())
    }
}

// ═══════════════════════════════════════════════════════════════════════
// PLUGIN
// ═══════════════════════════════════════════════════════════════════════

/// Where `DataPlugin` looks for the farm config. `None` skips the file and
/// uses the built-in defaults.
#[derive(Resource, Debug, Clone)]
pub struct FarmConfigSource(pub Option<PathBuf>);

pub struct DataPlugin {
    pub config_path: Option<PathBuf>,
}

impl Default for DataPlugin {
    fn default() -> Self {
        Self {
            config_path: Some(PathBuf::from(DEFAULT_CONFIG_PATH)),
        }
    }
}

impl Plugin for DataPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(FarmConfigSource(self.config_path.clone()))
            .add_systems(OnEnter(GameState::Loading), load_farm_config);
    }
}

/// Loads the config, installs a session built from it and moves on to Playing.
fn load_farm_config(
    mut commands: Commands,
    source: Res<FarmConfigSource>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    let config = match &source.0 {
        Some(path) => match FarmConfig::load(path) {
            Ok(config) => {
                info!("[Data] Loaded farm config from {}", path.display());
                config
            }
            Err(err) => {
                warn!("[Data] {err}; using built-in farm config");
                FarmConfig::default()
            }
        },
        None => FarmConfig::default(),
    };

    info!(
        "[Data] World {}x{}, farmland {} at offset {}, {} buildings, {} crops, {} seasons",
        config.world_size,
        config.world_size,
        config.field_size,
        config.field_offset,
        config.buildings.len(),
        config.crops.len(),
        config.seasons.len(),
    );

    commands.insert_resource(FarmSession::new(config.clone()));
    commands.insert_resource(config);
    next_state.set(GameState::Playing);
}
