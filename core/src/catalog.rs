//! Immutable tower, enemy and wave templates.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Index of a tower template inside a [`Catalog`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TowerTypeId(u16);

impl TowerTypeId {
    /// Creates a new tower type identifier.
    #[must_use]
    pub const fn new(value: u16) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u16 {
        self.0
    }
}

/// Index of an enemy template inside a [`Catalog`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EnemyTypeId(u16);

impl EnemyTypeId {
    /// Creates a new enemy type identifier.
    #[must_use]
    pub const fn new(value: u16) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u16 {
        self.0
    }
}

/// Display color expressed as 8-bit RGB channels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    red: u8,
    green: u8,
    blue: u8,
}

impl Rgb {
    /// Creates a color from its channels.
    #[must_use]
    pub const fn from_rgb(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Red channel.
    #[must_use]
    pub const fn red(&self) -> u8 {
        self.red
    }

    /// Green channel.
    #[must_use]
    pub const fn green(&self) -> u8 {
        self.green
    }

    /// Blue channel.
    #[must_use]
    pub const fn blue(&self) -> u8 {
        self.blue
    }
}

/// Damage an enemy deals to a tower within range once its cooldown elapses.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct AttackProfile {
    /// Hit points removed from the struck tower.
    pub damage: f32,
    /// Maximum Euclidean distance to the tower, in pixels.
    pub range: f32,
    /// Minimum time between two attacks of this kind.
    #[serde(with = "crate::seconds")]
    pub cooldown: Duration,
}

/// Speed reduction applied to enemies inside a wall's radius.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SlowAura {
    /// Multiplier applied to the speed of affected enemies.
    pub factor: f32,
    /// Radius of the aura in pixels.
    pub radius: f32,
}

/// Template from which towers are built.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TowerType {
    /// Stable lookup key, such as `"basic"`.
    pub key: String,
    /// Human readable name.
    pub name: String,
    /// Money required to build the tower.
    pub cost: u32,
    /// Targeting range in pixels.
    pub range: f32,
    /// Time between two shots.
    #[serde(with = "crate::seconds")]
    pub fire_interval: Duration,
    /// Damage carried by each projectile.
    pub damage: f32,
    /// Projectile travel speed in pixels per second.
    pub projectile_speed: f32,
    /// Display color.
    pub color: Rgb,
    /// Hit points of a freshly built tower.
    pub max_hp: f32,
    /// Slow aura; towers carrying one are walls and never shoot.
    #[serde(default)]
    pub slow_aura: Option<SlowAura>,
}

impl TowerType {
    /// Reports whether the template describes a wall.
    #[must_use]
    pub const fn is_wall(&self) -> bool {
        self.slow_aura.is_some()
    }
}

/// Template from which enemies are spawned.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EnemyType {
    /// Stable lookup key, such as `"grunt"`.
    pub key: String,
    /// Human readable name.
    pub name: String,
    /// Movement speed in pixels per second.
    pub speed: f32,
    /// Base hit points.
    pub hp: f32,
    /// Base money credited when the enemy is killed.
    pub reward: u32,
    /// Display color.
    pub color: Rgb,
    /// Body radius in pixels.
    pub radius: f32,
    /// Close-range attack against towers.
    #[serde(default)]
    pub melee: Option<AttackProfile>,
    /// Long-range attack against towers, used when melee is unavailable.
    #[serde(default)]
    pub ranged: Option<AttackProfile>,
}

/// Multipliers a wave entry applies on top of an enemy template.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct EnemyScaling {
    /// Hit point multiplier; the result is rounded up.
    pub hp: f32,
    /// Speed multiplier.
    pub speed: f32,
    /// Reward multiplier; the result is rounded up.
    pub reward: f32,
}

impl EnemyScaling {
    /// Scaling that leaves the template untouched.
    pub const IDENTITY: Self = Self {
        hp: 1.0,
        speed: 1.0,
        reward: 1.0,
    };
}

impl Default for EnemyScaling {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// A batch of identical enemies released at a fixed interval.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct WaveEntry {
    /// Template of the spawned enemies.
    pub enemy: EnemyTypeId,
    /// Number of enemies in the batch.
    pub count: u32,
    /// Base time between two spawns, before the wave's rate multiplier.
    #[serde(with = "crate::seconds")]
    pub interval: Duration,
    /// Multipliers applied to each spawned enemy.
    #[serde(default)]
    pub scaling: EnemyScaling,
}

/// Ordered list of entries making up one wave.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct WaveDefinition {
    /// Entries processed in order.
    pub entries: Vec<WaveEntry>,
}

impl WaveDefinition {
    /// Total number of enemies the wave releases.
    #[must_use]
    pub fn total_enemies(&self) -> u32 {
        self.entries.iter().map(|entry| entry.count).sum()
    }
}

/// All tower and enemy templates available to a game.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    /// Tower templates indexed by [`TowerTypeId`].
    pub towers: Vec<TowerType>,
    /// Enemy templates indexed by [`EnemyTypeId`].
    pub enemies: Vec<EnemyType>,
}

impl Catalog {
    /// Looks up a tower template.
    #[must_use]
    pub fn tower(&self, id: TowerTypeId) -> Option<&TowerType> {
        self.towers.get(usize::from(id.get()))
    }

    /// Looks up an enemy template.
    #[must_use]
    pub fn enemy(&self, id: EnemyTypeId) -> Option<&EnemyType> {
        self.enemies.get(usize::from(id.get()))
    }

    /// Finds a tower template by key.
    #[must_use]
    pub fn tower_by_key(&self, key: &str) -> Option<TowerTypeId> {
        self.towers
            .iter()
            .position(|tower| tower.key == key)
            .and_then(|index| u16::try_from(index).ok())
            .map(TowerTypeId::new)
    }

    /// Finds an enemy template by key.
    #[must_use]
    pub fn enemy_by_key(&self, key: &str) -> Option<EnemyTypeId> {
        self.enemies
            .iter()
            .position(|enemy| enemy.key == key)
            .and_then(|index| u16::try_from(index).ok())
            .map(EnemyTypeId::new)
    }

    /// Identifiers of every tower template in catalog order.
    pub fn tower_ids(&self) -> impl Iterator<Item = TowerTypeId> + '_ {
        (0..self.towers.len())
            .filter_map(|index| u16::try_from(index).ok())
            .map(TowerTypeId::new)
    }
}
