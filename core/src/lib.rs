#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Hex Defence engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Callers submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values describing what
//! changed. Systems read immutable views and respond exclusively with new
//! command batches.

pub mod catalog;
pub mod config;
pub mod hex;
pub mod seconds;

use std::time::Duration;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use catalog::{
    AttackProfile, Catalog, EnemyScaling, EnemyType, EnemyTypeId, Rgb, SlowAura, TowerType,
    TowerTypeId, WaveDefinition, WaveEntry,
};
pub use config::{ConfigError, GameConfig, MapConfig, MapShape, WaveTuning, MAX_MAP_TILES};
pub use hex::{cube_round, AxialCoord, CubeCoord, HexDirection, HexLayout};

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Hex Defence. Hold the line.";

/// Highest level a tower can be upgraded to.
pub const MAX_TOWER_LEVEL: u8 = 5;

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Spawns an enemy on a freshly drawn route from the border to the base.
    SpawnEnemy {
        /// Template of the enemy.
        kind: EnemyTypeId,
        /// Multipliers applied to the template's stats.
        scaling: EnemyScaling,
    },
    /// Moves every enemy and resolves their attacks on towers.
    AdvanceEnemies {
        /// Simulated time since the previous advance.
        dt: Duration,
    },
    /// Advances the fire timers of offensive towers.
    AdvanceTowers {
        /// Simulated time since the previous advance.
        dt: Duration,
    },
    /// Launches a projectile from a tower towards an enemy.
    FireProjectile {
        /// Tower that fires.
        tower: TowerId,
        /// Enemy the projectile homes in on.
        target: EnemyId,
    },
    /// Moves projectiles and resolves their hits.
    AdvanceProjectiles {
        /// Simulated time since the previous advance.
        dt: Duration,
    },
    /// Builds a tower on an empty, buildable tile.
    BuildTower {
        /// Tile receiving the tower.
        tile: AxialCoord,
        /// Template of the tower.
        kind: TowerTypeId,
    },
    /// Raises the level of the tower on a tile.
    UpgradeTower {
        /// Tile holding the tower.
        tile: AxialCoord,
    },
    /// Restores the tower on a tile to full health.
    ///
    /// The world does not know about waves and heals whenever the tower is
    /// damaged and affordable. Callers must only send this while the heal
    /// window is open, as `Session::heal` does.
    HealTower {
        /// Tile holding the tower.
        tile: AxialCoord,
    },
    /// Removes the tower on a tile without a refund.
    RemoveTower {
        /// Tile holding the tower.
        tile: AxialCoord,
    },
    /// Clears every entity and restores the starting economy and seed.
    ResetWorld,
}

/// Events broadcast by the world and the session after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// An enemy entered the map.
    EnemySpawned {
        /// Identifier assigned to the enemy.
        enemy: EnemyId,
        /// Template of the enemy.
        kind: EnemyTypeId,
        /// Border tile the route starts from.
        entry: AxialCoord,
    },
    /// An enemy ran out of hit points.
    EnemyKilled {
        /// Identifier of the killed enemy.
        enemy: EnemyId,
        /// Money credited for the kill.
        reward: u32,
    },
    /// An enemy walked past its final waypoint and cost a life.
    EnemyEscaped {
        /// Identifier of the enemy.
        enemy: EnemyId,
    },
    /// An enemy hit a tower.
    TowerDamaged {
        /// Tower that was hit.
        tower: TowerId,
        /// Enemy that attacked.
        attacker: EnemyId,
        /// Hit points removed.
        damage: f32,
    },
    /// A tower was built.
    TowerBuilt {
        /// Identifier assigned to the tower.
        tower: TowerId,
        /// Template of the tower.
        kind: TowerTypeId,
        /// Tile the tower occupies.
        tile: AxialCoord,
        /// Money spent.
        cost: u32,
    },
    /// A tower gained a level.
    TowerUpgraded {
        /// Identifier of the tower.
        tower: TowerId,
        /// Level reached.
        level: u8,
        /// Money spent.
        cost: u32,
    },
    /// A tower was restored to full health.
    TowerHealed {
        /// Identifier of the tower.
        tower: TowerId,
        /// Money spent.
        cost: u32,
    },
    /// A tower ran out of hit points.
    TowerDestroyed {
        /// Identifier of the tower.
        tower: TowerId,
        /// Tile that became free.
        tile: AxialCoord,
    },
    /// A tower was removed on request.
    TowerRemoved {
        /// Identifier of the tower.
        tower: TowerId,
        /// Tile that became free.
        tile: AxialCoord,
    },
    /// A tower launched a projectile.
    ProjectileFired {
        /// Identifier of the projectile.
        projectile: ProjectileId,
        /// Tower that fired.
        tower: TowerId,
        /// Enemy being tracked.
        target: EnemyId,
    },
    /// A projectile reached its target.
    ProjectileHit {
        /// Identifier of the projectile.
        projectile: ProjectileId,
        /// Enemy that was hit.
        target: EnemyId,
    },
    /// A projectile lost its target and was discarded.
    ProjectileFizzled {
        /// Identifier of the projectile.
        projectile: ProjectileId,
    },
    /// A wave began releasing enemies.
    WaveStarted {
        /// One-based wave number.
        wave: u32,
    },
    /// Every enemy of a wave was spawned and none remain alive.
    WaveCleared {
        /// One-based wave number.
        wave: u32,
    },
    /// A player action was refused and nothing changed.
    ActionRejected {
        /// Kind of action that was attempted.
        action: PlayerAction,
        /// Tile the action targeted.
        tile: AxialCoord,
        /// Reason for the refusal.
        reason: ActionError,
    },
}

/// Player actions that spend money or alter towers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayerAction {
    /// Build a new tower.
    Build,
    /// Upgrade an existing tower.
    Upgrade,
    /// Heal an existing tower.
    Heal,
    /// Remove an existing tower.
    Remove,
}

/// Reasons a player action may be rejected.
#[derive(Error, Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionError {
    /// The coordinate is not a tile of the map.
    #[error("no tile at that coordinate")]
    UnknownTile,
    /// The tile cannot hold towers.
    #[error("tile is not buildable")]
    NotBuildable,
    /// The tile already holds a tower.
    #[error("tile is already occupied")]
    Occupied,
    /// The tile holds no tower.
    #[error("tile holds no tower")]
    NoTower,
    /// The requested tower type is not in the catalog.
    #[error("unknown tower type")]
    UnknownTowerType,
    /// The tower is already at the highest level.
    #[error("tower is already at max level")]
    MaxLevel,
    /// The tower has no missing hit points.
    #[error("tower is already at full health")]
    FullHealth,
    /// Healing is only allowed during the cooldown between waves.
    #[error("towers can only be healed between waves")]
    HealWindowClosed,
    /// The action costs more than the available money.
    #[error("not enough money: need {needed}, have {available}")]
    InsufficientFunds {
        /// Money the action costs.
        needed: u32,
        /// Money currently available.
        available: u32,
    },
    /// The game is not accepting gameplay input.
    #[error("game is not in progress")]
    NotPlaying,
}

/// Unique identifier assigned to each enemy, increasing in spawn order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EnemyId(u32);

impl EnemyId {
    /// Creates a new identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to each tower, increasing in build order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TowerId(u32);

impl TowerId {
    /// Creates a new identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to each projectile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProjectileId(u32);

impl ProjectileId {
    /// Creates a new identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Immutable representation of a single enemy's state used for queries.
#[derive(Clone, Debug, PartialEq)]
pub struct EnemySnapshot {
    /// Unique identifier assigned to the enemy.
    pub id: EnemyId,
    /// Template of the enemy.
    pub kind: EnemyTypeId,
    /// Pixel position.
    pub position: Vec2,
    /// Remaining hit points.
    pub hp: f32,
    /// Hit points at spawn.
    pub max_hp: f32,
    /// Speed before slow auras, in pixels per second.
    pub speed: f32,
    /// Money credited on kill.
    pub reward: u32,
    /// Index of the waypoint the enemy is walking towards.
    pub waypoint: usize,
}

/// Read-only snapshot describing all live enemies.
#[derive(Clone, Debug, Default)]
pub struct EnemyView {
    snapshots: Vec<EnemySnapshot>,
}

impl EnemyView {
    /// Creates a new enemy view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<EnemySnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured enemy snapshots in identifier order.
    pub fn iter(&self) -> impl Iterator<Item = &EnemySnapshot> {
        self.snapshots.iter()
    }

    /// Number of enemies in the view.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether the view holds no enemies.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<EnemySnapshot> {
        self.snapshots
    }
}

/// Immutable representation of a single tower's state used for queries.
#[derive(Clone, Debug, PartialEq)]
pub struct TowerSnapshot {
    /// Identifier allocated to the tower by the world.
    pub id: TowerId,
    /// Template the tower was built from.
    pub kind: TowerTypeId,
    /// Tile the tower occupies.
    pub tile: AxialCoord,
    /// Pixel centre of the tile.
    pub position: Vec2,
    /// Remaining hit points.
    pub hp: f32,
    /// Hit points when fully healed.
    pub max_hp: f32,
    /// Current level, starting at one.
    pub level: u8,
    /// Current targeting range in pixels.
    pub range: f32,
    /// Current damage per projectile.
    pub damage: f32,
    /// Current time between shots.
    pub fire_interval: Duration,
    /// Current slow aura; walls only.
    pub slow_aura: Option<SlowAura>,
}

impl TowerSnapshot {
    /// Reports whether the tower is a wall.
    #[must_use]
    pub const fn is_wall(&self) -> bool {
        self.slow_aura.is_some()
    }
}

/// Read-only snapshot describing all towers on the map.
#[derive(Clone, Debug, Default)]
pub struct TowerView {
    snapshots: Vec<TowerSnapshot>,
}

impl TowerView {
    /// Creates a new tower view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<TowerSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured tower snapshots in identifier order.
    pub fn iter(&self) -> impl Iterator<Item = &TowerSnapshot> {
        self.snapshots.iter()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<TowerSnapshot> {
        self.snapshots
    }
}

/// Fire readiness of a single offensive tower.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TowerCooldownSnapshot {
    /// Tower the readiness belongs to.
    pub tower: TowerId,
    /// Remaining time until the tower may fire; zero means ready.
    pub ready_in: Duration,
}

/// Read-only fire readiness of all offensive towers, sorted by tower.
#[derive(Clone, Debug, Default)]
pub struct TowerCooldownView {
    snapshots: Vec<TowerCooldownSnapshot>,
}

impl TowerCooldownView {
    /// Creates a new cooldown view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<TowerCooldownSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.tower);
        Self { snapshots }
    }

    /// Iterator over the captured snapshots in tower order.
    pub fn iter(&self) -> impl Iterator<Item = &TowerCooldownSnapshot> {
        self.snapshots.iter()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<TowerCooldownSnapshot> {
        self.snapshots
    }
}

/// Immutable representation of a projectile in flight.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProjectileSnapshot {
    /// Identifier of the projectile.
    pub id: ProjectileId,
    /// Enemy being tracked.
    pub target: EnemyId,
    /// Pixel position.
    pub position: Vec2,
    /// Damage dealt on hit.
    pub damage: f32,
}

/// Target chosen for a tower during the current tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TowerTarget {
    /// Tower that holds the target.
    pub tower: TowerId,
    /// Enemy selected as the target.
    pub enemy: EnemyId,
    /// Euclidean pixel distance between the two.
    pub distance: f32,
}
