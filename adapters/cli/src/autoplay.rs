//! Scripted player used when the game runs headless.

use hex_defence_core::{AxialCoord, TowerTypeId};
use hex_defence_session::Session;
use hex_defence_system_builder::BuildTypeSelector;
use hex_defence_system_waves::WavePhase;
use hex_defence_world::{query, Tile};
use tracing::debug;

/// Hex distance from the base within which towers are placed.
const SITE_RADIUS: u32 = 2;

/// Builds a ring of offensive towers around the base, cycling through the
/// catalog, then pours spare money into upgrades.
#[derive(Debug)]
pub(crate) struct Autoplay {
    sites: Vec<AxialCoord>,
    rotation: Vec<TowerTypeId>,
    next: usize,
}

impl Autoplay {
    pub(crate) fn new(session: &Session) -> Self {
        let world = session.world();
        let map = query::map(world);
        let base = map.base();
        let mut sites: Vec<AxialCoord> = map
            .tiles()
            .filter(|tile| tile.buildable())
            .map(Tile::coord)
            .filter(|coord| coord.distance(base) <= SITE_RADIUS)
            .collect();
        sites.sort_by_key(|coord| (coord.distance(base), *coord));

        let catalog = query::catalog(world);
        let rotation = catalog
            .tower_ids()
            .filter(|id| catalog.tower(*id).map_or(false, |tower| !tower.is_wall()))
            .collect();

        Self {
            sites,
            rotation,
            next: 0,
        }
    }

    /// Takes this tick's decisions.
    pub(crate) fn act(&mut self, session: &mut Session) {
        if session.wave_status().phase == WavePhase::Idle {
            let _ = session.advance_wave();
        }
        if session.heal_window_open() {
            self.heal_damaged(session);
        }
        if !self.build_next(session) {
            self.upgrade_cheapest(session);
        }
    }

    fn heal_damaged(&self, session: &mut Session) {
        for &tile in &self.sites {
            let affordable = session
                .heal_quote(tile)
                .map_or(false, |cost| cost <= session.money());
            if affordable && session.heal(tile).is_ok() {
                debug!(q = tile.q(), r = tile.r(), "autoplay healed");
            }
        }
    }

    /// Returns whether an empty site was available.
    fn build_next(&mut self, session: &mut Session) -> bool {
        let Some(tile) = self
            .sites
            .iter()
            .copied()
            .find(|tile| query::tower_at(session.world(), *tile).is_none())
        else {
            return false;
        };
        let Some(&kind) = self.rotation.get(self.next % self.rotation.len().max(1)) else {
            return false;
        };

        let cost = query::catalog(session.world())
            .tower(kind)
            .map_or(u32::MAX, |tower| tower.cost);
        if cost > session.money() {
            return true;
        }
        if session
            .select_build_type(BuildTypeSelector::Id(kind))
            .is_err()
            || !session.select_tile(tile)
        {
            return true;
        }
        if session.confirm_selection().is_ok() {
            debug!(q = tile.q(), r = tile.r(), kind = kind.get(), "autoplay built");
            self.next += 1;
        }
        true
    }

    fn upgrade_cheapest(&self, session: &mut Session) {
        let cheapest = self
            .sites
            .iter()
            .filter_map(|&tile| session.upgrade_quote(tile).map(|cost| (cost, tile)))
            .min();
        if let Some((cost, tile)) = cheapest {
            if cost <= session.money() && session.upgrade(tile).is_ok() {
                debug!(q = tile.q(), r = tile.r(), cost, "autoplay upgraded");
            }
        }
    }
}
