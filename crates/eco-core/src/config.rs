//! Configuration types for the simulation.

use crate::error::{Error, Result};
use crate::types::EntityKind;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Pathfinding algorithm used by the move turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PathfindingKind {
    Bfs,
    #[default]
    Astar,
}

/// Top-level configuration bundle
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Random seed for reproducibility
    pub seed: u64,
    /// Delay between rendered ticks (milliseconds)
    pub pacing_ms: u64,
    /// Strategy for the move turn
    pub pathfinding: PathfindingKind,
    pub world: WorldConfig,
    pub entity: EntityConfig,
    pub spawn: SpawnConfig,
    pub starve: StarveConfig,
    pub icon: IconConfig,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            pacing_ms: 1000,
            pathfinding: PathfindingKind::default(),
            world: WorldConfig::default(),
            entity: EntityConfig::default(),
            spawn: SpawnConfig::default(),
            starve: StarveConfig::default(),
            icon: IconConfig::default(),
        }
    }
}

impl SimulationConfig {
    /// Parse a TOML document and validate it
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: SimulationConfig = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let source = std::fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }

    pub fn validate(&self) -> Result<()> {
        if self.world.width <= 0 || self.world.height <= 0 {
            return Err(Error::Validation(format!(
                "World dimensions must be positive, got {}x{}",
                self.world.width, self.world.height
            )));
        }

        let herbivore = &self.entity.herbivore;
        let predator = &self.entity.predator;
        for (name, hp, speed) in [
            ("herbivore", herbivore.hp, herbivore.speed),
            ("predator", predator.hp, predator.speed),
        ] {
            if hp <= 0 {
                return Err(Error::Validation(format!("{} hp must be positive", name)));
            }
            if speed <= 0 {
                return Err(Error::Validation(format!("{} speed must be positive", name)));
            }
        }

        for (name, interval) in [
            ("grass", &self.spawn.interval.grass),
            ("herbivore", &self.spawn.interval.herbivore),
            ("predator", &self.spawn.interval.predator),
        ] {
            if interval.interval == 0 {
                return Err(Error::Validation(format!(
                    "Spawn interval for {} must be non-zero",
                    name
                )));
            }
        }

        let cells = self.world.width as u64 * self.world.height as u64;
        let initial = self.spawn.init.total() as u64;
        if initial > cells {
            return Err(Error::Validation(format!(
                "Initial spawn of {} entities exceeds {} cells",
                initial, cells
            )));
        }

        let icons = &self.icon;
        if [
            &icons.predator,
            &icons.herbivore,
            &icons.tree,
            &icons.grass,
            &icons.rock,
            &icons.default,
        ]
        .iter()
        .any(|icon| icon.is_empty())
        {
            return Err(Error::Validation("Icons must not be empty".to_string()));
        }

        Ok(())
    }
}

/// World configuration parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Width of the world grid
    pub width: i32,
    /// Height of the world grid
    #[serde(alias = "hight")]
    pub height: i32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: 40,
            height: 20,
        }
    }
}

/// Per-species stat presets
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EntityConfig {
    pub herbivore: HerbivoreConfig,
    pub predator: PredatorConfig,
    pub grass: GrassConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HerbivoreConfig {
    pub hp: i32,
    /// Cells moved per tick
    pub speed: i32,
    /// How far a target can be noticed (Manhattan, exclusive)
    pub visual_radius: i32,
    /// Hp restored to whoever eats the corpse
    pub nutritional_quality: i32,
}

impl Default for HerbivoreConfig {
    fn default() -> Self {
        Self {
            hp: 100,
            speed: 2,
            visual_radius: 10,
            nutritional_quality: 40,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PredatorConfig {
    pub hp: i32,
    pub speed: i32,
    pub visual_radius: i32,
    /// Damage dealt per attack
    pub power: i32,
}

impl Default for PredatorConfig {
    fn default() -> Self {
        Self {
            hp: 120,
            speed: 3,
            visual_radius: 15,
            power: 30,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GrassConfig {
    pub nutritional_quality: i32,
}

impl Default for GrassConfig {
    fn default() -> Self {
        Self {
            nutritional_quality: 25,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnConfig {
    /// Populated once before the first tick
    pub init: SpawnInitConfig,
    /// Repeated on a tick cadence
    pub interval: SpawnIntervalConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnInitConfig {
    pub predator: usize,
    pub herbivore: usize,
    pub tree: usize,
    pub grass: usize,
    pub rock: usize,
}

impl SpawnInitConfig {
    pub fn total(&self) -> usize {
        self.predator + self.herbivore + self.tree + self.grass + self.rock
    }

    pub fn count(&self, kind: EntityKind) -> usize {
        match kind {
            EntityKind::Predator => self.predator,
            EntityKind::Herbivore => self.herbivore,
            EntityKind::Tree => self.tree,
            EntityKind::Grass => self.grass,
            EntityKind::Rock => self.rock,
        }
    }
}

impl Default for SpawnInitConfig {
    fn default() -> Self {
        Self {
            predator: 3,
            herbivore: 12,
            tree: 25,
            grass: 40,
            rock: 20,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnIntervalConfig {
    pub herbivore: SpawnInterval,
    pub grass: SpawnInterval,
    pub predator: SpawnInterval,
}

impl SpawnIntervalConfig {
    /// Cadence for `kind`; static entities never respawn
    pub fn get(&self, kind: EntityKind) -> Option<SpawnInterval> {
        match kind {
            EntityKind::Herbivore => Some(self.herbivore),
            EntityKind::Grass => Some(self.grass),
            EntityKind::Predator => Some(self.predator),
            EntityKind::Rock | EntityKind::Tree => None,
        }
    }
}

impl Default for SpawnIntervalConfig {
    fn default() -> Self {
        Self {
            herbivore: SpawnInterval {
                interval: 10,
                count: 2,
            },
            grass: SpawnInterval {
                interval: 3,
                count: 4,
            },
            predator: SpawnInterval {
                interval: 25,
                count: 1,
            },
        }
    }
}

/// Spawn `count` entities every `interval` ticks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpawnInterval {
    pub interval: u32,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StarveConfig {
    /// Hp lost by every creature each tick
    pub power: i32,
}

impl Default for StarveConfig {
    fn default() -> Self {
        Self { power: 5 }
    }
}

/// Icons used by the console renderer
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IconConfig {
    pub predator: String,
    pub herbivore: String,
    pub tree: String,
    pub grass: String,
    pub rock: String,
    /// Empty cell
    pub default: String,
}

impl IconConfig {
    pub fn icon(&self, kind: EntityKind) -> &str {
        match kind {
            EntityKind::Predator => &self.predator,
            EntityKind::Herbivore => &self.herbivore,
            EntityKind::Tree => &self.tree,
            EntityKind::Grass => &self.grass,
            EntityKind::Rock => &self.rock,
        }
    }
}

impl Default for IconConfig {
    fn default() -> Self {
        Self {
            predator: "🐺".to_string(),
            herbivore: "🐇".to_string(),
            tree: "🌳".to_string(),
            grass: "🌱".to_string(),
            rock: "🪨".to_string(),
            default: "⬛".to_string(),
        }
    }
}
