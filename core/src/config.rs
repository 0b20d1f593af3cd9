//! Game configuration and its validation.

use std::time::Duration;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    catalog::{Catalog, WaveDefinition},
    hex::{AxialCoord, HexLayout},
};

/// Largest tile count a map may hold.
pub const MAX_MAP_TILES: u64 = 1 << 20;

/// Footprint of the playable map.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MapShape {
    /// Every hexagon within `radius` steps of the origin.
    Hexagon {
        /// Largest hex distance from the origin.
        radius: u32,
    },
    /// Odd-row offset rectangle whose top-left cell sits at the origin.
    Rectangle {
        /// Cells per row.
        columns: u32,
        /// Number of rows.
        rows: u32,
    },
}

impl MapShape {
    /// Reports whether `coord` lies inside the shape.
    #[must_use]
    pub fn contains(&self, coord: AxialCoord) -> bool {
        match *self {
            Self::Hexagon { radius } => coord.distance(AxialCoord::ORIGIN) <= radius,
            Self::Rectangle { columns, rows } => {
                let (column, row) = to_offset(coord);
                in_span(column, columns) && in_span(row, rows)
            }
        }
    }

    /// Reports whether `coord` lies on the outer ring of the shape.
    #[must_use]
    pub fn is_border(&self, coord: AxialCoord) -> bool {
        if !self.contains(coord) {
            return false;
        }

        match *self {
            Self::Hexagon { radius } => coord.distance(AxialCoord::ORIGIN) == radius,
            Self::Rectangle { columns, rows } => {
                let (column, row) = to_offset(coord);
                column == 0
                    || row == 0
                    || i64::from(column) == i64::from(columns) - 1
                    || i64::from(row) == i64::from(rows) - 1
            }
        }
    }

    /// Every coordinate of the shape, sorted.
    #[must_use]
    pub fn coordinates(&self) -> Vec<AxialCoord> {
        let mut coords = Vec::new();
        match *self {
            Self::Hexagon { radius } => {
                let radius = i32::try_from(radius).unwrap_or(i32::MAX / 4);
                for q in -radius..=radius {
                    let low = (-radius).max(-q - radius);
                    let high = radius.min(-q + radius);
                    for r in low..=high {
                        coords.push(AxialCoord::new(q, r));
                    }
                }
            }
            Self::Rectangle { columns, rows } => {
                let columns = i32::try_from(columns).unwrap_or(i32::MAX / 4);
                let rows = i32::try_from(rows).unwrap_or(i32::MAX / 4);
                for row in 0..rows {
                    for column in 0..columns {
                        coords.push(from_offset(column, row));
                    }
                }
            }
        }
        coords.sort();
        coords
    }

    /// Number of tiles in the shape, computed without enumerating them.
    #[must_use]
    pub fn tile_count(&self) -> u64 {
        match *self {
            Self::Hexagon { radius } => {
                let radius = u64::from(radius);
                radius
                    .saturating_mul(radius + 1)
                    .saturating_mul(3)
                    .saturating_add(1)
            }
            Self::Rectangle { columns, rows } => u64::from(columns) * u64::from(rows),
        }
    }

    /// Reports whether a border tile other than `base` exists.
    ///
    /// The outer ring of a hexagon holds `6 * radius` tiles. A rectangle with
    /// two or more cells has at least two border cells.
    #[must_use]
    pub fn has_route_around(&self, base: AxialCoord) -> bool {
        match *self {
            Self::Hexagon { radius } => radius > 0,
            Self::Rectangle { .. } => {
                let count = self.tile_count();
                count > 1 || (count == 1 && !self.contains(base))
            }
        }
    }

    const fn is_degenerate(&self) -> bool {
        match *self {
            Self::Hexagon { radius } => radius == 0,
            Self::Rectangle { columns, rows } => columns == 0 || rows == 0,
        }
    }
}

fn to_offset(coord: AxialCoord) -> (i32, i32) {
    let row = coord.r();
    (coord.q() + (row - (row & 1)) / 2, row)
}

fn from_offset(column: i32, row: i32) -> AxialCoord {
    AxialCoord::new(column - (row - (row & 1)) / 2, row)
}

fn in_span(value: i32, span: u32) -> bool {
    value >= 0 && i64::from(value) < i64::from(span)
}

/// Shape and pixel placement of the map.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MapConfig {
    /// Footprint of the map.
    pub shape: MapShape,
    /// Centre-to-corner size of each hexagon in pixels.
    pub hex_size: f32,
    /// Pixel position of the origin hexagon's centre.
    pub origin: [f32; 2],
    /// Tile enemies walk towards.
    pub base: AxialCoord,
}

impl MapConfig {
    /// Pixel layout derived from the size and origin.
    #[must_use]
    pub fn layout(&self) -> HexLayout {
        HexLayout::new(self.hex_size, Vec2::from(self.origin))
    }
}

/// Pacing parameters of the wave scheduler.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct WaveTuning {
    /// Pause between a cleared wave and the next one becoming startable.
    #[serde(with = "crate::seconds")]
    pub cooldown: Duration,
    /// Live enemy cap before any growth is applied.
    pub base_mob_cap: u32,
    /// Cap increase per wave number.
    pub mob_cap_growth: u32,
    /// Spawn rate multiplier before any growth is applied.
    pub base_spawn_rate: f32,
    /// Spawn rate multiplier increase per wave number.
    pub spawn_rate_growth: f32,
}

impl Default for WaveTuning {
    fn default() -> Self {
        Self {
            cooldown: Duration::from_secs(4),
            base_mob_cap: 20,
            mob_cap_growth: 2,
            base_spawn_rate: 2.0,
            spawn_rate_growth: 0.05,
        }
    }
}

/// Everything needed to construct a game session.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Map footprint and layout.
    pub map: MapConfig,
    /// Money available before the first build.
    pub starting_money: u32,
    /// Lives available before the first escape.
    pub starting_lives: u32,
    /// Tower and enemy templates.
    pub catalog: Catalog,
    /// Waves in play order.
    pub waves: Vec<WaveDefinition>,
    /// Scheduler pacing.
    #[serde(default)]
    pub wave_tuning: WaveTuning,
    /// Seed for route selection.
    #[serde(default)]
    pub seed: u64,
}

impl GameConfig {
    /// Checks the configuration for values that would leave the game unplayable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let map = &self.map;
        if map.shape.is_degenerate() {
            return Err(ConfigError::DegenerateMap);
        }
        let tiles = map.shape.tile_count();
        if tiles > MAX_MAP_TILES {
            return Err(ConfigError::OversizedMap {
                tiles,
                limit: MAX_MAP_TILES,
            });
        }
        if !(map.hex_size.is_finite() && map.hex_size > 0.0) {
            return Err(ConfigError::InvalidHexSize);
        }
        if !map.shape.contains(map.base) {
            return Err(ConfigError::BaseOutsideMap);
        }
        if !map.shape.has_route_around(map.base) {
            return Err(ConfigError::NoRoute);
        }
        if self.starting_lives == 0 {
            return Err(ConfigError::NoLives);
        }

        let catalog = &self.catalog;
        if catalog.towers.is_empty() {
            return Err(ConfigError::NoTowerTypes);
        }
        if catalog.enemies.is_empty() {
            return Err(ConfigError::NoEnemyTypes);
        }
        for tower in &catalog.towers {
            let shoots = tower.projectile_speed > 0.0 && tower.range > 0.0;
            if !(tower.max_hp > 0.0) || (!tower.is_wall() && !shoots) {
                return Err(ConfigError::InvalidTowerType {
                    key: tower.key.clone(),
                });
            }
        }
        for enemy in &catalog.enemies {
            if !(enemy.speed > 0.0 && enemy.hp > 0.0) {
                return Err(ConfigError::InvalidEnemyType {
                    key: enemy.key.clone(),
                });
            }
        }
        let cheapest = catalog.towers.iter().map(|tower| tower.cost).min();
        if let Some(cheapest) = cheapest {
            if cheapest > self.starting_money {
                return Err(ConfigError::UnaffordableCatalog {
                    cheapest,
                    money: self.starting_money,
                });
            }
        }

        if self.waves.is_empty() {
            return Err(ConfigError::NoWaves);
        }
        for (wave, definition) in self.waves.iter().enumerate() {
            if definition.entries.is_empty() {
                return Err(ConfigError::EmptyWave { wave: wave + 1 });
            }
            for (entry, spec) in definition.entries.iter().enumerate() {
                if spec.count == 0 {
                    return Err(ConfigError::EmptyWaveEntry {
                        wave: wave + 1,
                        entry,
                    });
                }
                if catalog.enemy(spec.enemy).is_none() {
                    return Err(ConfigError::UnknownEnemyType {
                        wave: wave + 1,
                        entry,
                    });
                }
            }
        }

        let tuning = &self.wave_tuning;
        if tuning.base_mob_cap == 0 {
            return Err(ConfigError::ZeroMobCap);
        }
        if !(tuning.base_spawn_rate > 0.0 && tuning.spawn_rate_growth >= 0.0) {
            return Err(ConfigError::InvalidSpawnRate);
        }

        Ok(())
    }
}

/// Reasons a [`GameConfig`] is rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The map shape has no room for tiles.
    #[error("map has a zero radius or an empty dimension")]
    DegenerateMap,
    /// The map holds more tiles than the world will generate.
    #[error("map has {tiles} tiles, more than the limit of {limit}")]
    OversizedMap {
        /// Tiles the shape would hold.
        tiles: u64,
        /// Largest accepted tile count.
        limit: u64,
    },
    /// The hex size is zero, negative or not finite.
    #[error("hex size must be a positive number")]
    InvalidHexSize,
    /// The base coordinate is not a tile of the map.
    #[error("base tile lies outside the map")]
    BaseOutsideMap,
    /// No border tile other than the base exists to start a route from.
    #[error("map has no border tile to route enemies from")]
    NoRoute,
    /// The player would start with zero lives.
    #[error("starting lives must be at least one")]
    NoLives,
    /// The catalog defines no tower types.
    #[error("no tower types configured")]
    NoTowerTypes,
    /// The catalog defines no enemy types.
    #[error("no enemy types configured")]
    NoEnemyTypes,
    /// A tower type can never be useful.
    #[error("tower type `{key}` needs positive hp and, unless it is a wall, positive range and projectile speed")]
    InvalidTowerType {
        /// Key of the offending template.
        key: String,
    },
    /// An enemy type can never reach the base or never be killed.
    #[error("enemy type `{key}` needs positive speed and hp")]
    InvalidEnemyType {
        /// Key of the offending template.
        key: String,
    },
    /// Every tower costs more than the starting money.
    #[error("cheapest tower costs {cheapest} but only {money} is available")]
    UnaffordableCatalog {
        /// Cost of the cheapest tower.
        cheapest: u32,
        /// Starting money.
        money: u32,
    },
    /// The wave list is empty.
    #[error("no waves configured")]
    NoWaves,
    /// A wave has no entries.
    #[error("wave {wave} has no entries")]
    EmptyWave {
        /// One-based wave number.
        wave: usize,
    },
    /// A wave entry spawns nothing.
    #[error("wave {wave} entry {entry} has a zero count")]
    EmptyWaveEntry {
        /// One-based wave number.
        wave: usize,
        /// Zero-based entry index.
        entry: usize,
    },
    /// A wave entry references a missing enemy type.
    #[error("wave {wave} entry {entry} references an unknown enemy type")]
    UnknownEnemyType {
        /// One-based wave number.
        wave: usize,
        /// Zero-based entry index.
        entry: usize,
    },
    /// The base mob cap is zero, so nothing could ever spawn.
    #[error("base mob cap must be at least one")]
    ZeroMobCap,
    /// Spawn rate parameters would stall or reverse the scheduler.
    #[error("base spawn rate must be positive and its growth non-negative")]
    InvalidSpawnRate,
}
