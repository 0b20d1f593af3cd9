#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Turns the targeting pass into shots.
//!
//! A tower shoots when its fire timer has run out and targeting picked an
//! enemy for it this tick. Walls never appear in the cooldown view, so they
//! never shoot. Each tower shoots at most once per tick even if it is
//! listed twice.

use hex_defence_core::{Command, TowerCooldownView, TowerId, TowerTarget};

/// Fires loaded towers at their chosen enemies.
#[derive(Debug, Default)]
pub struct TowerCombat {
    loaded: Vec<TowerId>,
}

impl TowerCombat {
    /// Creates the system with no loaded towers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Pushes one `Command::FireProjectile` per loaded tower that holds a
    /// target, in the order the targets were given.
    pub fn handle(
        &mut self,
        tower_cooldowns: TowerCooldownView,
        tower_targets: &[TowerTarget],
        out: &mut Vec<Command>,
    ) {
        self.loaded.clear();
        self.loaded.extend(
            tower_cooldowns
                .iter()
                .filter(|snapshot| snapshot.ready_in.is_zero())
                .map(|snapshot| snapshot.tower),
        );

        for target in tower_targets {
            // The view is sorted by tower, so `loaded` is too.
            if let Ok(slot) = self.loaded.binary_search(&target.tower) {
                let _ = self.loaded.remove(slot);
                out.push(Command::FireProjectile {
                    tower: target.tower,
                    target: target.enemy,
                });
            }
        }
    }
}
