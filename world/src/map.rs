//! Hex map tiles, border ring and route derivation.

use std::collections::BTreeMap;

use glam::Vec2;
use hex_defence_core::{AxialCoord, HexLayout, MapConfig, MapShape, TowerId};
use rand::Rng;

/// A single hexagon of the map.
#[derive(Clone, Debug, PartialEq)]
pub struct Tile {
    coord: AxialCoord,
    center: Vec2,
    is_path: bool,
    buildable: bool,
    tower: Option<TowerId>,
}

impl Tile {
    /// Axial coordinate of the tile.
    #[must_use]
    pub const fn coord(&self) -> AxialCoord {
        self.coord
    }

    /// Pixel centre of the tile.
    #[must_use]
    pub const fn center(&self) -> Vec2 {
        self.center
    }

    /// Presentation flag; routes never set it since towers do not block them.
    #[must_use]
    pub const fn is_path(&self) -> bool {
        self.is_path
    }

    /// Reports whether towers may ever be built here.
    #[must_use]
    pub const fn buildable(&self) -> bool {
        self.buildable
    }

    /// Tower currently standing on the tile.
    #[must_use]
    pub const fn tower(&self) -> Option<TowerId> {
        self.tower
    }
}

/// Every tile of the map keyed by coordinate.
#[derive(Clone, Debug)]
pub struct HexMap {
    shape: MapShape,
    layout: HexLayout,
    tiles: BTreeMap<AxialCoord, Tile>,
    border: Vec<AxialCoord>,
    base: AxialCoord,
}

impl HexMap {
    /// Generates the tiles described by the configuration.
    ///
    /// The base tile is flagged as not buildable. The configuration is
    /// expected to have been validated, so the base lies on the map.
    #[must_use]
    pub fn generate(config: &MapConfig) -> Self {
        let layout = config.layout();
        let tiles: BTreeMap<_, _> = config
            .shape
            .coordinates()
            .into_iter()
            .map(|coord| {
                let tile = Tile {
                    coord,
                    center: layout.axial_to_pixel(coord),
                    is_path: false,
                    buildable: coord != config.base,
                    tower: None,
                };
                (coord, tile)
            })
            .collect();
        let border = tiles
            .keys()
            .copied()
            .filter(|coord| config.shape.is_border(*coord))
            .collect();

        Self {
            shape: config.shape,
            layout,
            tiles,
            border,
            base: config.base,
        }
    }

    /// Footprint of the map.
    #[must_use]
    pub const fn shape(&self) -> MapShape {
        self.shape
    }

    /// Pixel layout of the map.
    #[must_use]
    pub const fn layout(&self) -> HexLayout {
        self.layout
    }

    /// Tile enemies walk towards.
    #[must_use]
    pub const fn base(&self) -> AxialCoord {
        self.base
    }

    /// Outer ring of the map, sorted.
    #[must_use]
    pub fn border(&self) -> &[AxialCoord] {
        &self.border
    }

    /// Tile at `coord`, if it is part of the map.
    #[must_use]
    pub fn tile(&self, coord: AxialCoord) -> Option<&Tile> {
        self.tiles.get(&coord)
    }

    /// Tile containing the pixel `point`, or `None` outside the grid.
    #[must_use]
    pub fn tile_at_pixel(&self, point: Vec2) -> Option<&Tile> {
        self.tile(self.layout.pixel_to_axial(point))
    }

    /// All tiles in coordinate order.
    pub fn tiles(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.values()
    }

    /// Number of tiles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    /// Reports whether the map has no tiles.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Draws a uniformly random border tile other than the base and returns
    /// the straight hex line from it to the base as pixel waypoints.
    ///
    /// Returns the chosen entry tile alongside the waypoints, or `None` when
    /// the map offers no such border tile.
    pub fn path_from_border_to_base<R: Rng>(&self, rng: &mut R) -> Option<(AxialCoord, Vec<Vec2>)> {
        let candidates: Vec<AxialCoord> = self
            .border
            .iter()
            .copied()
            .filter(|coord| *coord != self.base)
            .collect();
        if candidates.is_empty() {
            return None;
        }

        let entry = candidates[rng.gen_range(0..candidates.len())];
        let waypoints = entry
            .line_to(self.base)
            .into_iter()
            .map(|coord| self.layout.axial_to_pixel(coord))
            .collect();
        Some((entry, waypoints))
    }

    pub(crate) fn set_tower(&mut self, coord: AxialCoord, tower: Option<TowerId>) {
        if let Some(tile) = self.tiles.get_mut(&coord) {
            tile.tower = tower;
        }
    }
}
