//! Homing projectiles.

use std::collections::BTreeMap;

use glam::Vec2;
use hex_defence_core::{EnemyId, ProjectileId, ProjectileSnapshot};

/// Outcome of moving a projectile for one tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum Flight {
    /// The target no longer exists.
    Fizzled,
    /// The target was reached this tick.
    Hit,
    /// Still travelling.
    InFlight,
}

#[derive(Clone, Debug)]
pub(crate) struct Projectile {
    pub(crate) id: ProjectileId,
    pub(crate) target: EnemyId,
    pub(crate) position: Vec2,
    pub(crate) damage: f32,
    pub(crate) speed: f32,
}

impl Projectile {
    /// Moves towards `target_position`, resolving a hit once the remaining
    /// distance fits in this tick's travel.
    pub(crate) fn advance(&mut self, target_position: Option<Vec2>, dt: f32) -> Flight {
        let Some(target_position) = target_position else {
            return Flight::Fizzled;
        };

        let offset = target_position - self.position;
        let distance = offset.length();
        let travel = self.speed * dt;
        if distance <= travel || distance == 0.0 {
            return Flight::Hit;
        }

        self.position += offset / distance * travel;
        Flight::InFlight
    }

    pub(crate) fn snapshot(&self) -> ProjectileSnapshot {
        ProjectileSnapshot {
            id: self.id,
            target: self.target,
            position: self.position,
            damage: self.damage,
        }
    }
}

#[derive(Debug)]
pub(crate) struct ProjectileRegistry {
    entries: BTreeMap<ProjectileId, Projectile>,
    next_projectile_id: ProjectileId,
}

impl ProjectileRegistry {
    pub(crate) fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
            next_projectile_id: ProjectileId::new(0),
        }
    }

    pub(crate) fn allocate_id(&mut self) -> ProjectileId {
        let id = self.next_projectile_id;
        self.next_projectile_id = ProjectileId::new(id.get().saturating_add(1));
        id
    }

    pub(crate) fn insert(&mut self, projectile: Projectile) {
        let _ = self.entries.insert(projectile.id, projectile);
    }

    pub(crate) fn remove(&mut self, id: ProjectileId) {
        let _ = self.entries.remove(&id);
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &Projectile> {
        self.entries.values()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut Projectile> {
        self.entries.values_mut()
    }
}
