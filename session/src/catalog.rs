//! Stock towers, enemies and map used when no settings override them.

use std::time::Duration;

use hex_defence_core::{
    AttackProfile, AxialCoord, Catalog, EnemyType, EnemyTypeId, GameConfig, MapConfig, MapShape,
    Rgb, SlowAura, TowerType, WaveTuning,
};
use hex_defence_system_wave_generation::{generate_wave_definitions, WaveRoster};

/// Number of waves in a standard game.
pub const DEFAULT_TOTAL_WAVES: u32 = 600;

/// Towers and enemies of a standard game.
///
/// Enemy identifiers follow [`default_roster`]: grunt, swift, tank.
#[must_use]
pub fn default_catalog() -> Catalog {
    Catalog {
        towers: vec![
            offensive(
                "basic",
                "Basic",
                50,
                170.0,
                900,
                20.0,
                320.0,
                Rgb::from_rgb(100, 160, 220),
                160.0,
            ),
            offensive(
                "sniper",
                "Sniper",
                85,
                280.0,
                1_800,
                40.0,
                420.0,
                Rgb::from_rgb(220, 200, 120),
                140.0,
            ),
            offensive(
                "rapid",
                "Rapid",
                70,
                140.0,
                450,
                12.0,
                360.0,
                Rgb::from_rgb(150, 220, 140),
                150.0,
            ),
            TowerType {
                key: "wall".into(),
                name: "Wall".into(),
                cost: 40,
                range: 0.0,
                fire_interval: Duration::ZERO,
                damage: 0.0,
                projectile_speed: 0.0,
                color: Rgb::from_rgb(90, 90, 110),
                max_hp: 200.0,
                slow_aura: Some(SlowAura {
                    factor: 0.35,
                    radius: 65.0,
                }),
            },
        ],
        enemies: vec![
            EnemyType {
                key: "grunt".into(),
                name: "Grunt".into(),
                speed: 60.0,
                hp: 60.0,
                reward: 18,
                color: Rgb::from_rgb(220, 80, 80),
                radius: 14.0,
                melee: Some(attack(8.0, 26.0, 1_100)),
                ranged: Some(attack(5.0, 140.0, 2_400)),
            },
            EnemyType {
                key: "swift".into(),
                name: "Swift".into(),
                speed: 95.0,
                hp: 45.0,
                reward: 15,
                color: Rgb::from_rgb(120, 200, 140),
                radius: 13.0,
                melee: Some(attack(6.0, 26.0, 800)),
                ranged: Some(attack(4.0, 120.0, 1_800)),
            },
            EnemyType {
                key: "tank".into(),
                name: "Tank".into(),
                speed: 40.0,
                hp: 130.0,
                reward: 35,
                color: Rgb::from_rgb(170, 140, 220),
                radius: 16.0,
                melee: Some(attack(14.0, 32.0, 1_300)),
                ranged: Some(attack(9.0, 170.0, 2_800)),
            },
        ],
    }
}

/// Enemy slots of [`default_catalog`] used by the wave generator.
#[must_use]
pub const fn default_roster() -> WaveRoster {
    WaveRoster {
        grunt: EnemyTypeId::new(0),
        swift: EnemyTypeId::new(1),
        tank: EnemyTypeId::new(2),
    }
}

/// Radius 7 hexagon of 44 px tiles centred at (640, 470), base in the middle.
#[must_use]
pub fn default_map() -> MapConfig {
    MapConfig {
        shape: MapShape::Hexagon { radius: 7 },
        hex_size: 44.0,
        origin: [640.0, 470.0],
        base: AxialCoord::ORIGIN,
    }
}

/// Standard game with `total_waves` generated waves.
#[must_use]
pub fn default_config(total_waves: u32, seed: u64) -> GameConfig {
    GameConfig {
        map: default_map(),
        starting_money: 200,
        starting_lives: 20,
        catalog: default_catalog(),
        waves: generate_wave_definitions(total_waves, default_roster()),
        wave_tuning: WaveTuning::default(),
        seed,
    }
}

#[allow(clippy::too_many_arguments)]
fn offensive(
    key: &str,
    name: &str,
    cost: u32,
    range: f32,
    fire_interval_ms: u64,
    damage: f32,
    projectile_speed: f32,
    color: Rgb,
    max_hp: f32,
) -> TowerType {
    TowerType {
        key: key.into(),
        name: name.into(),
        cost,
        range,
        fire_interval: Duration::from_millis(fire_interval_ms),
        damage,
        projectile_speed,
        color,
        max_hp,
        slow_aura: None,
    }
}

const fn attack(damage: f32, range: f32, cooldown_ms: u64) -> AttackProfile {
    AttackProfile {
        damage,
        range,
        cooldown: Duration::from_millis(cooldown_ms),
    }
}
