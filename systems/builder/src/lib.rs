#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure player-input system that tracks the tile selector and the chosen
//! tower type, and translates intents into tower commands.

use glam::Vec2;
use hex_defence_core::{
    ActionError, AxialCoord, Catalog, Command, HexDirection, HexLayout, MapConfig, MapShape,
    TowerId, TowerTypeId,
};

/// Identifies a tower type either by identifier or by catalog key.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BuildTypeSelector<'a> {
    /// Catalog index of the tower type.
    Id(TowerTypeId),
    /// Stable key such as `"sniper"`.
    Key(&'a str),
}

/// Intents distilled from adapter-provided input for the current frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BuilderInput {
    /// Build on an empty selected tile, upgrade an occupied one.
    pub confirm_action: bool,
    /// Heal the tower on the selected tile.
    pub heal_action: bool,
    /// Remove the tower on the selected tile.
    pub remove_action: bool,
}

/// Selection state plus the translation of intents into commands.
#[derive(Clone, Debug)]
pub struct Builder {
    shape: MapShape,
    layout: HexLayout,
    base: AxialCoord,
    selected_tile: AxialCoord,
    build_type: TowerTypeId,
}

impl Builder {
    /// Creates a builder whose selector rests on the base and whose build
    /// type is the first tower type of the catalog.
    #[must_use]
    pub fn new(map: &MapConfig) -> Self {
        Self {
            shape: map.shape,
            layout: map.layout(),
            base: map.base,
            selected_tile: map.base,
            build_type: TowerTypeId::new(0),
        }
    }

    /// Restores the initial selection.
    pub fn reset(&mut self) {
        self.selected_tile = self.base;
        self.build_type = TowerTypeId::new(0);
    }

    /// Currently selected tile.
    #[must_use]
    pub const fn selected_tile(&self) -> AxialCoord {
        self.selected_tile
    }

    /// Tower type placed on confirm.
    #[must_use]
    pub const fn build_type(&self) -> TowerTypeId {
        self.build_type
    }

    /// Moves the selector to `tile`. Returns `false` and keeps the previous
    /// selection when the tile is off the map.
    pub fn select_tile(&mut self, tile: AxialCoord) -> bool {
        if !self.shape.contains(tile) {
            return false;
        }
        self.selected_tile = tile;
        true
    }

    /// Moves the selector to the tile under the pixel `point`.
    pub fn select_at_pixel(&mut self, point: Vec2) -> Option<AxialCoord> {
        let tile = self.layout.pixel_to_axial(point);
        self.select_tile(tile).then_some(tile)
    }

    /// Steps the selector one tile in `direction`; ignored at the map edge.
    pub fn move_selection(&mut self, direction: HexDirection) -> AxialCoord {
        let _ = self.select_tile(self.selected_tile.neighbor(direction));
        self.selected_tile
    }

    /// Chooses the tower type placed on confirm.
    pub fn select_build_type(
        &mut self,
        catalog: &Catalog,
        selector: BuildTypeSelector<'_>,
    ) -> Result<TowerTypeId, ActionError> {
        let id = match selector {
            BuildTypeSelector::Id(id) => catalog.tower(id).map(|_| id),
            BuildTypeSelector::Key(key) => catalog.tower_by_key(key),
        }
        .ok_or(ActionError::UnknownTowerType)?;
        self.build_type = id;
        Ok(id)
    }

    /// Emits tower commands for the selected tile.
    ///
    /// The `tower_at` closure should mirror the semantics of the world's
    /// `query::tower_at` helper so the system can tell empty tiles from
    /// occupied ones.
    pub fn handle<F>(&self, input: BuilderInput, mut tower_at: F, out: &mut Vec<Command>)
    where
        F: FnMut(AxialCoord) -> Option<TowerId>,
    {
        let tile = self.selected_tile;

        if input.confirm_action {
            if tower_at(tile).is_some() {
                out.push(Command::UpgradeTower { tile });
            } else {
                out.push(Command::BuildTower {
                    tile,
                    kind: self.build_type,
                });
            }
        }

        if input.heal_action {
            out.push(Command::HealTower { tile });
        }

        if input.remove_action {
            out.push(Command::RemoveTower { tile });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map() -> MapConfig {
        MapConfig {
            shape: MapShape::Hexagon { radius: 1 },
            hex_size: 40.0,
            origin: [100.0, 100.0],
            base: AxialCoord::ORIGIN,
        }
    }

    #[test]
    fn selection_starts_on_the_base() {
        let builder = Builder::new(&map());
        assert_eq!(builder.selected_tile(), AxialCoord::ORIGIN);
        assert_eq!(builder.build_type(), TowerTypeId::new(0));
    }

    #[test]
    fn selector_stops_at_the_edge() {
        let mut builder = Builder::new(&map());
        assert_eq!(
            builder.move_selection(HexDirection::East),
            AxialCoord::new(1, 0)
        );
        assert_eq!(
            builder.move_selection(HexDirection::East),
            AxialCoord::new(1, 0)
        );
        assert!(!builder.select_tile(AxialCoord::new(4, 4)));
        assert_eq!(builder.selected_tile(), AxialCoord::new(1, 0));
    }

    #[test]
    fn pixels_resolve_to_tiles() {
        let mut builder = Builder::new(&map());
        let layout = map().layout();
        let target = AxialCoord::new(0, 1);

        assert_eq!(
            builder.select_at_pixel(layout.axial_to_pixel(target)),
            Some(target)
        );
        assert_eq!(builder.select_at_pixel(Vec2::new(-500.0, -500.0)), None);
        assert_eq!(builder.selected_tile(), target);
    }
}
