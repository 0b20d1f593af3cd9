//! Enemy state and registry.

use std::{collections::BTreeMap, time::Duration};

use glam::Vec2;
use hex_defence_core::{
    AttackProfile, EnemyId, EnemyScaling, EnemySnapshot, EnemyType, EnemyTypeId,
};

/// Distance below which an enemy counts as standing on its waypoint.
pub(crate) const WAYPOINT_EPSILON: f32 = 1.0;

/// Runtime state of a single enemy.
#[derive(Clone, Debug)]
pub(crate) struct Enemy {
    pub(crate) id: EnemyId,
    pub(crate) kind: EnemyTypeId,
    pub(crate) path: Vec<Vec2>,
    pub(crate) path_index: usize,
    pub(crate) position: Vec2,
    pub(crate) hp: f32,
    pub(crate) max_hp: f32,
    pub(crate) speed: f32,
    pub(crate) reward: u32,
    pub(crate) melee: Option<AttackProfile>,
    pub(crate) ranged: Option<AttackProfile>,
    pub(crate) melee_timer: Duration,
    pub(crate) ranged_timer: Duration,
}

impl Enemy {
    /// Instantiates the template on the provided route.
    ///
    /// Hit points and reward are rounded up after scaling.
    pub(crate) fn spawn(
        id: EnemyId,
        kind: EnemyTypeId,
        template: &EnemyType,
        scaling: EnemyScaling,
        path: Vec<Vec2>,
    ) -> Self {
        let max_hp = (template.hp * scaling.hp).ceil();
        let reward = (template.reward as f32 * scaling.reward).ceil().max(0.0) as u32;
        let position = path.first().copied().unwrap_or(Vec2::ZERO);
        Self {
            id,
            kind,
            path,
            path_index: 0,
            position,
            hp: max_hp,
            max_hp,
            speed: template.speed * scaling.speed,
            reward,
            melee: template.melee,
            ranged: template.ranged,
            melee_timer: Duration::ZERO,
            ranged_timer: Duration::ZERO,
        }
    }

    pub(crate) fn finished_path(&self) -> bool {
        self.path_index >= self.path.len()
    }

    /// Picks the attack to perform against a tower `distance` pixels away.
    ///
    /// Melee takes precedence over ranged; the chosen timer is reset.
    pub(crate) fn strike(&mut self, distance: f32) -> Option<f32> {
        if let Some(melee) = self.melee {
            if distance <= melee.range && self.melee_timer >= melee.cooldown {
                self.melee_timer = Duration::ZERO;
                return Some(melee.damage);
            }
        }
        if let Some(ranged) = self.ranged {
            if distance <= ranged.range && self.ranged_timer >= ranged.cooldown {
                self.ranged_timer = Duration::ZERO;
                return Some(ranged.damage);
            }
        }
        None
    }

    pub(crate) fn snapshot(&self) -> EnemySnapshot {
        EnemySnapshot {
            id: self.id,
            kind: self.kind,
            position: self.position,
            hp: self.hp,
            max_hp: self.max_hp,
            speed: self.speed,
            reward: self.reward,
            waypoint: self.path_index,
        }
    }
}

/// Registry that stores enemies and manages identifier allocation.
#[derive(Debug)]
pub(crate) struct EnemyRegistry {
    entries: BTreeMap<EnemyId, Enemy>,
    next_enemy_id: EnemyId,
}

impl EnemyRegistry {
    pub(crate) fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
            next_enemy_id: EnemyId::new(0),
        }
    }

    pub(crate) fn allocate_id(&mut self) -> EnemyId {
        let id = self.next_enemy_id;
        self.next_enemy_id = EnemyId::new(id.get().saturating_add(1));
        id
    }

    pub(crate) fn insert(&mut self, enemy: Enemy) {
        let _ = self.entries.insert(enemy.id, enemy);
    }

    pub(crate) fn remove(&mut self, id: EnemyId) -> Option<Enemy> {
        self.entries.remove(&id)
    }

    pub(crate) fn get(&self, id: EnemyId) -> Option<&Enemy> {
        self.entries.get(&id)
    }

    pub(crate) fn get_mut(&mut self, id: EnemyId) -> Option<&mut Enemy> {
        self.entries.get_mut(&id)
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &Enemy> {
        self.entries.values()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut Enemy> {
        self.entries.values_mut()
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}
