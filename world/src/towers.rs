//! Authoritative tower state management utilities.

use std::{collections::BTreeMap, time::Duration};

use glam::Vec2;
use hex_defence_core::{
    AxialCoord, SlowAura, TowerCooldownSnapshot, TowerId, TowerSnapshot, TowerType, TowerTypeId,
    MAX_TOWER_LEVEL,
};

const WALL_BONUS_HP: f32 = 60.0;
const RANGE_GROWTH: f32 = 1.12;
const DAMAGE_GROWTH: f32 = 1.18;
const FIRE_INTERVAL_DECAY: f32 = 0.92;
const MIN_FIRE_INTERVAL: Duration = Duration::from_millis(200);
const WALL_RADIUS_GROWTH: f32 = 8.0;

/// Runtime state of a tower stored inside the world.
#[derive(Clone, Debug)]
pub(crate) struct TowerState {
    pub(crate) id: TowerId,
    pub(crate) kind: TowerTypeId,
    pub(crate) tile: AxialCoord,
    pub(crate) position: Vec2,
    pub(crate) base_cost: u32,
    pub(crate) hp: f32,
    pub(crate) max_hp: f32,
    pub(crate) level: u8,
    pub(crate) range: f32,
    pub(crate) damage: f32,
    pub(crate) fire_interval: Duration,
    pub(crate) projectile_speed: f32,
    pub(crate) slow_aura: Option<SlowAura>,
    pub(crate) since_last_shot: Duration,
}

impl TowerState {
    /// Builds a level one tower from its template. Walls gain bonus hit points.
    pub(crate) fn build(
        id: TowerId,
        kind: TowerTypeId,
        template: &TowerType,
        tile: AxialCoord,
        position: Vec2,
    ) -> Self {
        let max_hp = if template.is_wall() {
            template.max_hp + WALL_BONUS_HP
        } else {
            template.max_hp
        };
        Self {
            id,
            kind,
            tile,
            position,
            base_cost: template.cost,
            hp: max_hp,
            max_hp,
            level: 1,
            range: template.range,
            damage: template.damage,
            fire_interval: template.fire_interval,
            projectile_speed: template.projectile_speed,
            slow_aura: template.slow_aura,
            since_last_shot: Duration::ZERO,
        }
    }

    pub(crate) const fn is_wall(&self) -> bool {
        self.slow_aura.is_some()
    }

    /// Price of the next level, `floor(cost * (0.7 + 0.4 * level))`.
    pub(crate) fn upgrade_cost(&self) -> u32 {
        upgrade_cost(self.base_cost, self.level)
    }

    /// Price of restoring full health, one money per ten missing hit points.
    pub(crate) fn heal_cost(&self) -> u32 {
        heal_cost(self.max_hp - self.hp)
    }

    pub(crate) fn upgrade(&mut self) {
        if self.level >= MAX_TOWER_LEVEL {
            return;
        }
        self.level += 1;
        match self.slow_aura.as_mut() {
            Some(aura) => aura.radius += WALL_RADIUS_GROWTH,
            None => {
                self.range *= RANGE_GROWTH;
                self.damage *= DAMAGE_GROWTH;
                self.fire_interval = self
                    .fire_interval
                    .mul_f32(FIRE_INTERVAL_DECAY)
                    .max(MIN_FIRE_INTERVAL);
            }
        }
    }

    pub(crate) fn ready_in(&self) -> Duration {
        self.fire_interval.saturating_sub(self.since_last_shot)
    }

    pub(crate) fn snapshot(&self) -> TowerSnapshot {
        TowerSnapshot {
            id: self.id,
            kind: self.kind,
            tile: self.tile,
            position: self.position,
            hp: self.hp,
            max_hp: self.max_hp,
            level: self.level,
            range: self.range,
            damage: self.damage,
            fire_interval: self.fire_interval,
            slow_aura: self.slow_aura,
        }
    }

    pub(crate) fn cooldown_snapshot(&self) -> TowerCooldownSnapshot {
        TowerCooldownSnapshot {
            tower: self.id,
            ready_in: self.ready_in(),
        }
    }
}

/// Upgrade price for a tower of `base_cost` currently at `level`.
#[must_use]
pub fn upgrade_cost(base_cost: u32, level: u8) -> u32 {
    (f64::from(base_cost) * (0.7 + 0.4 * f64::from(level))).floor() as u32
}

/// Heal price for a tower missing `missing_hp` hit points; zero when healthy.
#[must_use]
pub fn heal_cost(missing_hp: f32) -> u32 {
    if missing_hp <= 0.0 {
        return 0;
    }
    ((missing_hp / 10.0).ceil() as u32).max(1)
}

/// Registry that stores towers and manages identifier allocation.
#[derive(Debug)]
pub(crate) struct TowerRegistry {
    entries: BTreeMap<TowerId, TowerState>,
    next_tower_id: TowerId,
}

impl TowerRegistry {
    /// Creates an empty tower registry with a reset identifier counter.
    pub(crate) fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
            next_tower_id: TowerId::new(0),
        }
    }

    pub(crate) fn allocate_id(&mut self) -> TowerId {
        let id = self.next_tower_id;
        self.next_tower_id = TowerId::new(id.get().saturating_add(1));
        id
    }

    pub(crate) fn insert(&mut self, state: TowerState) {
        let _ = self.entries.insert(state.id, state);
    }

    pub(crate) fn remove(&mut self, id: TowerId) -> Option<TowerState> {
        self.entries.remove(&id)
    }

    pub(crate) fn get(&self, id: TowerId) -> Option<&TowerState> {
        self.entries.get(&id)
    }

    pub(crate) fn get_mut(&mut self, id: TowerId) -> Option<&mut TowerState> {
        self.entries.get_mut(&id)
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &TowerState> {
        self.entries.values()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut TowerState> {
        self.entries.values_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_defence_core::Rgb;

    fn template(slow_aura: Option<SlowAura>) -> TowerType {
        TowerType {
            key: "basic".into(),
            name: "Basic".into(),
            cost: 50,
            range: 170.0,
            fire_interval: Duration::from_millis(900),
            damage: 20.0,
            projectile_speed: 320.0,
            color: Rgb::from_rgb(70, 160, 255),
            max_hp: 160.0,
            slow_aura,
        }
    }

    fn tower(slow_aura: Option<SlowAura>) -> TowerState {
        TowerState::build(
            TowerId::new(0),
            TowerTypeId::new(0),
            &template(slow_aura),
            AxialCoord::new(1, 0),
            Vec2::ZERO,
        )
    }

    #[test]
    fn registry_starts_empty_with_zero_identifier() {
        let mut registry = TowerRegistry::new();
        assert!(registry.iter().next().is_none());
        assert_eq!(registry.allocate_id(), TowerId::new(0));
        assert_eq!(registry.allocate_id(), TowerId::new(1));
    }

    #[test]
    fn upgrade_cost_grows_with_level() {
        assert_eq!(upgrade_cost(50, 1), 55);
        assert_eq!(upgrade_cost(50, 2), 75);
        assert_eq!(upgrade_cost(85, 4), 195);
    }

    #[test]
    fn heal_cost_charges_at_least_one() {
        assert_eq!(heal_cost(0.0), 0);
        assert_eq!(heal_cost(0.5), 1);
        assert_eq!(heal_cost(10.0), 1);
        assert_eq!(heal_cost(31.0), 4);
    }

    #[test]
    fn offensive_upgrade_scales_stats() {
        let mut tower = tower(None);
        tower.upgrade();
        assert_eq!(tower.level, 2);
        assert!((tower.range - 170.0 * 1.12).abs() < 1e-3);
        assert!((tower.damage - 20.0 * 1.18).abs() < 1e-3);
        assert!(tower.fire_interval < Duration::from_millis(900));
    }

    #[test]
    fn fire_interval_never_drops_below_floor() {
        let mut tower = tower(None);
        tower.fire_interval = Duration::from_millis(210);
        tower.upgrade();
        assert_eq!(tower.fire_interval, MIN_FIRE_INTERVAL);
    }

    #[test]
    fn upgrades_stop_at_max_level() {
        let mut tower = tower(None);
        for _ in 0..10 {
            tower.upgrade();
        }
        assert_eq!(tower.level, MAX_TOWER_LEVEL);
    }

    #[test]
    fn walls_gain_hp_and_radius() {
        let mut wall = tower(Some(SlowAura {
            factor: 0.35,
            radius: 65.0,
        }));
        assert!(wall.is_wall());
        assert_eq!(wall.max_hp, 220.0);
        wall.upgrade();
        assert_eq!(wall.slow_aura.map(|aura| aura.radius), Some(73.0));
        assert_eq!(wall.range, 170.0);
    }
}
