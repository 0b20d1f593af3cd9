#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Hex Defence.
//!
//! The world owns the map, every enemy, tower and projectile, and the
//! player's money and lives. It is mutated exclusively through [`apply`] and
//! observed through the [`query`] module.

mod enemies;
mod map;
mod projectiles;
mod towers;

use std::time::Duration;

use glam::Vec2;
use hex_defence_core::{
    ActionError, AxialCoord, Catalog, Command, ConfigError, EnemyId, EnemyScaling, EnemyTypeId,
    Event, GameConfig, MapConfig, PlayerAction, TowerId, TowerTypeId, MAX_TOWER_LEVEL,
    WELCOME_BANNER,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, trace};

use enemies::{Enemy, EnemyRegistry, WAYPOINT_EPSILON};
use projectiles::{Flight, Projectile, ProjectileRegistry};
use towers::{TowerRegistry, TowerState};

pub use map::{HexMap, Tile};
pub use towers::{heal_cost, upgrade_cost};

/// Lowest speed multiplier slow auras can impose.
pub const MIN_SPEED_MODIFIER: f32 = 0.1;

/// Represents the authoritative Hex Defence world state.
#[derive(Debug)]
pub struct World {
    banner: &'static str,
    map_config: MapConfig,
    starting_money: u32,
    starting_lives: u32,
    seed: u64,
    map: HexMap,
    catalog: Catalog,
    money: u32,
    lives: u32,
    enemies: EnemyRegistry,
    towers: TowerRegistry,
    projectiles: ProjectileRegistry,
    rng: ChaCha8Rng,
}

impl World {
    /// Creates a world from a configuration, rejecting unplayable ones.
    pub fn new(config: &GameConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            banner: WELCOME_BANNER,
            map_config: config.map,
            starting_money: config.starting_money,
            starting_lives: config.starting_lives,
            seed: config.seed,
            map: HexMap::generate(&config.map),
            catalog: config.catalog.clone(),
            money: config.starting_money,
            lives: config.starting_lives,
            enemies: EnemyRegistry::new(),
            towers: TowerRegistry::new(),
            projectiles: ProjectileRegistry::new(),
            rng: ChaCha8Rng::seed_from_u64(config.seed),
        })
    }

    fn reset(&mut self) {
        self.map = HexMap::generate(&self.map_config);
        self.money = self.starting_money;
        self.lives = self.starting_lives;
        self.enemies = EnemyRegistry::new();
        self.towers = TowerRegistry::new();
        self.projectiles = ProjectileRegistry::new();
        self.rng = ChaCha8Rng::seed_from_u64(self.seed);
        debug!(money = self.money, lives = self.lives, "world reset");
    }

    fn spawn_enemy(&mut self, kind: EnemyTypeId, scaling: EnemyScaling, out_events: &mut Vec<Event>) {
        let Some(template) = self.catalog.enemy(kind) else {
            trace!(kind = kind.get(), "spawn ignored for unknown enemy type");
            return;
        };
        let Some((entry, path)) = self.map.path_from_border_to_base(&mut self.rng) else {
            trace!("spawn ignored because no border route exists");
            return;
        };

        let id = self.enemies.allocate_id();
        let enemy = Enemy::spawn(id, kind, template, scaling, path);
        debug!(enemy = id.get(), kind = kind.get(), hp = enemy.max_hp, "enemy spawned");
        self.enemies.insert(enemy);
        out_events.push(Event::EnemySpawned {
            enemy: id,
            kind,
            entry,
        });
    }

    fn advance_enemies(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        let Self {
            map,
            lives,
            enemies,
            towers,
            ..
        } = self;
        let seconds = dt.as_secs_f32();
        let mut escaped: Vec<EnemyId> = Vec::new();

        for enemy in enemies.iter_mut() {
            if enemy.finished_path() {
                escaped.push(enemy.id);
                continue;
            }

            enemy.melee_timer = enemy.melee_timer.saturating_add(dt);
            enemy.ranged_timer = enemy.ranged_timer.saturating_add(dt);

            let waypoint = enemy.path[enemy.path_index];
            let offset = waypoint - enemy.position;
            let distance = offset.length();
            if distance < WAYPOINT_EPSILON {
                enemy.path_index += 1;
                if enemy.finished_path() {
                    escaped.push(enemy.id);
                }
                continue;
            }

            let modifier = speed_modifier(towers, enemy.position);
            let step = (enemy.speed * modifier * seconds).min(distance);
            enemy.position += offset / distance * step;

            let Some((tower_id, tower_distance)) = nearest_tower(towers, enemy.position) else {
                continue;
            };
            let Some(damage) = enemy.strike(tower_distance) else {
                continue;
            };
            let Some(tower) = towers.get_mut(tower_id) else {
                continue;
            };

            tower.hp -= damage;
            out_events.push(Event::TowerDamaged {
                tower: tower_id,
                attacker: enemy.id,
                damage,
            });
            if tower.hp <= 0.0 {
                let tile = tower.tile;
                let _ = towers.remove(tower_id);
                map.set_tower(tile, None);
                debug!(tower = tower_id.get(), q = tile.q(), r = tile.r(), "tower destroyed");
                out_events.push(Event::TowerDestroyed {
                    tower: tower_id,
                    tile,
                });
            }
        }

        for id in escaped {
            if enemies.remove(id).is_some() {
                *lives = lives.saturating_sub(1);
                debug!(enemy = id.get(), lives = *lives, "enemy reached the base");
                out_events.push(Event::EnemyEscaped { enemy: id });
            }
        }
    }

    fn advance_towers(&mut self, dt: Duration) {
        for tower in self.towers.iter_mut().filter(|tower| !tower.is_wall()) {
            tower.since_last_shot = tower.since_last_shot.saturating_add(dt);
        }
    }

    fn fire_projectile(&mut self, tower: TowerId, target: EnemyId, out_events: &mut Vec<Event>) {
        if self.enemies.get(target).is_none() {
            trace!(tower = tower.get(), enemy = target.get(), "fire ignored for missing target");
            return;
        }
        let Some(state) = self.towers.get_mut(tower) else {
            trace!(tower = tower.get(), "fire ignored for missing tower");
            return;
        };
        if state.is_wall() || !state.ready_in().is_zero() {
            trace!(tower = tower.get(), "fire ignored for tower that is not ready");
            return;
        }

        state.since_last_shot = Duration::ZERO;
        let projectile = Projectile {
            id: self.projectiles.allocate_id(),
            target,
            position: state.position,
            damage: state.damage,
            speed: state.projectile_speed,
        };
        out_events.push(Event::ProjectileFired {
            projectile: projectile.id,
            tower,
            target,
        });
        self.projectiles.insert(projectile);
    }

    fn advance_projectiles(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        let Self {
            money,
            enemies,
            projectiles,
            ..
        } = self;
        let seconds = dt.as_secs_f32();
        let mut finished = Vec::new();

        for projectile in projectiles.iter_mut() {
            let target_position = enemies.get(projectile.target).map(|enemy| enemy.position);
            match projectile.advance(target_position, seconds) {
                Flight::InFlight => {}
                Flight::Fizzled => {
                    finished.push(projectile.id);
                    out_events.push(Event::ProjectileFizzled {
                        projectile: projectile.id,
                    });
                }
                Flight::Hit => {
                    finished.push(projectile.id);
                    out_events.push(Event::ProjectileHit {
                        projectile: projectile.id,
                        target: projectile.target,
                    });

                    let Some(enemy) = enemies.get_mut(projectile.target) else {
                        continue;
                    };
                    enemy.hp -= projectile.damage;
                    if enemy.hp <= 0.0 {
                        let reward = enemy.reward;
                        let _ = enemies.remove(projectile.target);
                        *money = money.saturating_add(reward);
                        debug!(enemy = projectile.target.get(), reward, "enemy killed");
                        out_events.push(Event::EnemyKilled {
                            enemy: projectile.target,
                            reward,
                        });
                    }
                }
            }
        }

        for id in finished {
            projectiles.remove(id);
        }
    }

    fn build_tower(&mut self, coord: AxialCoord, kind: TowerTypeId) -> Result<Event, ActionError> {
        let tile = self.map.tile(coord).ok_or(ActionError::UnknownTile)?;
        if !tile.buildable() {
            return Err(ActionError::NotBuildable);
        }
        if tile.tower().is_some() {
            return Err(ActionError::Occupied);
        }
        let center = tile.center();
        let template = self
            .catalog
            .tower(kind)
            .ok_or(ActionError::UnknownTowerType)?;
        let cost = template.cost;
        charge(&mut self.money, cost)?;

        let id = self.towers.allocate_id();
        let state = TowerState::build(id, kind, template, coord, center);
        self.towers.insert(state);
        self.map.set_tower(coord, Some(id));
        debug!(tower = id.get(), kind = kind.get(), q = coord.q(), r = coord.r(), cost, "tower built");
        Ok(Event::TowerBuilt {
            tower: id,
            kind,
            tile: coord,
            cost,
        })
    }

    fn upgrade_tower(&mut self, coord: AxialCoord) -> Result<Event, ActionError> {
        let id = self.tower_on(coord)?;
        let state = self.towers.get(id).ok_or(ActionError::NoTower)?;
        if state.level >= MAX_TOWER_LEVEL {
            return Err(ActionError::MaxLevel);
        }
        let cost = state.upgrade_cost();
        charge(&mut self.money, cost)?;

        let state = self.towers.get_mut(id).ok_or(ActionError::NoTower)?;
        state.upgrade();
        debug!(tower = id.get(), level = state.level, cost, "tower upgraded");
        Ok(Event::TowerUpgraded {
            tower: id,
            level: state.level,
            cost,
        })
    }

    /// Heals without checking the heal window; the session gates that.
    fn heal_tower(&mut self, coord: AxialCoord) -> Result<Event, ActionError> {
        let id = self.tower_on(coord)?;
        let state = self.towers.get(id).ok_or(ActionError::NoTower)?;
        if state.hp >= state.max_hp {
            return Err(ActionError::FullHealth);
        }
        let cost = state.heal_cost();
        charge(&mut self.money, cost)?;

        let state = self.towers.get_mut(id).ok_or(ActionError::NoTower)?;
        state.hp = state.max_hp;
        debug!(tower = id.get(), cost, "tower healed");
        Ok(Event::TowerHealed { tower: id, cost })
    }

    fn remove_tower(&mut self, coord: AxialCoord) -> Result<Event, ActionError> {
        let id = self.tower_on(coord)?;
        let _ = self.towers.remove(id);
        self.map.set_tower(coord, None);
        debug!(tower = id.get(), q = coord.q(), r = coord.r(), "tower removed");
        Ok(Event::TowerRemoved {
            tower: id,
            tile: coord,
        })
    }

    fn tower_on(&self, coord: AxialCoord) -> Result<TowerId, ActionError> {
        self.map
            .tile(coord)
            .ok_or(ActionError::UnknownTile)?
            .tower()
            .ok_or(ActionError::NoTower)
    }
}

/// Deducts `cost`, refusing to go below zero.
fn charge(money: &mut u32, cost: u32) -> Result<(), ActionError> {
    let available = *money;
    *money = available
        .checked_sub(cost)
        .ok_or(ActionError::InsufficientFunds {
            needed: cost,
            available,
        })?;
    Ok(())
}

/// Minimum slow factor of all walls whose aura covers `position`.
fn speed_modifier(towers: &TowerRegistry, position: Vec2) -> f32 {
    towers
        .iter()
        .filter_map(|tower| tower.slow_aura.map(|aura| (tower.position, aura)))
        .filter(|(center, aura)| center.distance(position) <= aura.radius)
        .map(|(_, aura)| aura.factor)
        .fold(1.0_f32, f32::min)
        .max(MIN_SPEED_MODIFIER)
}

/// Closest tower to `position`; the lowest identifier wins ties.
fn nearest_tower(towers: &TowerRegistry, position: Vec2) -> Option<(TowerId, f32)> {
    let mut best: Option<(TowerId, f32)> = None;
    for tower in towers.iter() {
        let distance = tower.position.distance(position);
        match best {
            Some((_, closest)) if distance >= closest => {}
            _ => best = Some((tower.id, distance)),
        }
    }
    best
}

fn reject(action: PlayerAction, tile: AxialCoord, reason: ActionError, out_events: &mut Vec<Event>) {
    trace!(?action, q = tile.q(), r = tile.r(), %reason, "action rejected");
    out_events.push(Event::ActionRejected {
        action,
        tile,
        reason,
    });
}

/// Applies the provided command to the world, mutating state deterministically.
///
/// Player commands that cannot be honoured leave the world untouched and
/// emit [`Event::ActionRejected`] instead.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::SpawnEnemy { kind, scaling } => world.spawn_enemy(kind, scaling, out_events),
        Command::AdvanceEnemies { dt } => world.advance_enemies(dt, out_events),
        Command::AdvanceTowers { dt } => world.advance_towers(dt),
        Command::FireProjectile { tower, target } => {
            world.fire_projectile(tower, target, out_events);
        }
        Command::AdvanceProjectiles { dt } => world.advance_projectiles(dt, out_events),
        Command::BuildTower { tile, kind } => match world.build_tower(tile, kind) {
            Ok(event) => out_events.push(event),
            Err(reason) => reject(PlayerAction::Build, tile, reason, out_events),
        },
        Command::UpgradeTower { tile } => match world.upgrade_tower(tile) {
            Ok(event) => out_events.push(event),
            Err(reason) => reject(PlayerAction::Upgrade, tile, reason, out_events),
        },
        Command::HealTower { tile } => match world.heal_tower(tile) {
            Ok(event) => out_events.push(event),
            Err(reason) => reject(PlayerAction::Heal, tile, reason, out_events),
        },
        Command::RemoveTower { tile } => match world.remove_tower(tile) {
            Ok(event) => out_events.push(event),
            Err(reason) => reject(PlayerAction::Remove, tile, reason, out_events),
        },
        Command::ResetWorld => world.reset(),
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use glam::Vec2;
    use hex_defence_core::{
        AxialCoord, Catalog, EnemyView, ProjectileSnapshot, TowerCooldownView, TowerSnapshot,
        TowerView, MAX_TOWER_LEVEL,
    };

    use super::{HexMap, Tile, World};

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Provides read-only access to the map.
    #[must_use]
    pub fn map(world: &World) -> &HexMap {
        &world.map
    }

    /// Tile at `coord`, if it is part of the map.
    #[must_use]
    pub fn tile(world: &World, coord: AxialCoord) -> Option<&Tile> {
        world.map.tile(coord)
    }

    /// Tile containing the pixel `point`, if any.
    #[must_use]
    pub fn tile_at_pixel(world: &World, point: Vec2) -> Option<&Tile> {
        world.map.tile_at_pixel(point)
    }

    /// Templates the world was configured with.
    #[must_use]
    pub fn catalog(world: &World) -> &Catalog {
        &world.catalog
    }

    /// Money currently available.
    #[must_use]
    pub fn money(world: &World) -> u32 {
        world.money
    }

    /// Lives remaining.
    #[must_use]
    pub fn lives(world: &World) -> u32 {
        world.lives
    }

    /// Number of live enemies.
    #[must_use]
    pub fn enemy_count(world: &World) -> usize {
        world.enemies.len()
    }

    /// Captures a read-only view of the live enemies.
    #[must_use]
    pub fn enemy_view(world: &World) -> EnemyView {
        EnemyView::from_snapshots(world.enemies.iter().map(|enemy| enemy.snapshot()).collect())
    }

    /// Captures a read-only view of the towers.
    #[must_use]
    pub fn tower_view(world: &World) -> TowerView {
        TowerView::from_snapshots(world.towers.iter().map(|tower| tower.snapshot()).collect())
    }

    /// Snapshot of the tower standing on `coord`.
    #[must_use]
    pub fn tower_at(world: &World, coord: AxialCoord) -> Option<TowerSnapshot> {
        let id = world.map.tile(coord)?.tower()?;
        world.towers.get(id).map(|tower| tower.snapshot())
    }

    /// Fire readiness of every offensive tower.
    #[must_use]
    pub fn tower_cooldowns(world: &World) -> TowerCooldownView {
        TowerCooldownView::from_snapshots(
            world
                .towers
                .iter()
                .filter(|tower| !tower.is_wall())
                .map(|tower| tower.cooldown_snapshot())
                .collect(),
        )
    }

    /// Projectiles in flight, in identifier order.
    #[must_use]
    pub fn projectiles(world: &World) -> Vec<ProjectileSnapshot> {
        world
            .projectiles
            .iter()
            .map(|projectile| projectile.snapshot())
            .collect()
    }

    /// Price of upgrading the tower on `coord`, or `None` when there is no
    /// tower or it is already at max level.
    #[must_use]
    pub fn upgrade_quote(world: &World, coord: AxialCoord) -> Option<u32> {
        let id = world.map.tile(coord)?.tower()?;
        let tower = world.towers.get(id)?;
        (tower.level < MAX_TOWER_LEVEL).then(|| tower.upgrade_cost())
    }

    /// Price of healing the tower on `coord`, or `None` when there is no
    /// tower or it is at full health.
    #[must_use]
    pub fn heal_quote(world: &World, coord: AxialCoord) -> Option<u32> {
        let id = world.map.tile(coord)?.tower()?;
        let tower = world.towers.get(id)?;
        (tower.hp < tower.max_hp).then(|| tower.heal_cost())
    }

    /// Speed multiplier slow auras impose on an enemy at `position`.
    #[must_use]
    pub fn speed_modifier(world: &World, position: Vec2) -> f32 {
        super::speed_modifier(&world.towers, position)
    }
}
