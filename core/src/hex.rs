//! Axial hex-grid coordinates, cube rounding and pixel layout.
//!
//! Hexagons are pointy-top. Axial `(q, r)` maps onto the cube form
//! `(x, y, z) = (q, -q - r, r)` whose components always sum to zero.

use glam::Vec2;
use serde::{Deserialize, Serialize};

const SQRT_3: f32 = 1.732_050_8;

// Applied to line endpoints so samples never land exactly on a hex edge.
const LINE_NUDGE: (f32, f32, f32) = (1e-6, 2e-6, -3e-6);

/// Axial coordinate addressing a single hexagon.
///
/// Ordering compares `q` first and `r` second, which is the canonical
/// "lowest coordinate" order used for deterministic iteration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AxialCoord {
    q: i32,
    r: i32,
}

impl AxialCoord {
    /// Coordinate of the hexagon at the grid origin.
    pub const ORIGIN: Self = Self::new(0, 0);

    /// Creates a new axial coordinate.
    #[must_use]
    pub const fn new(q: i32, r: i32) -> Self {
        Self { q, r }
    }

    /// Column-like axial component.
    #[must_use]
    pub const fn q(&self) -> i32 {
        self.q
    }

    /// Row-like axial component.
    #[must_use]
    pub const fn r(&self) -> i32 {
        self.r
    }

    /// Implied third component, `-q - r`.
    #[must_use]
    pub const fn s(&self) -> i32 {
        -self.q - self.r
    }

    /// Converts the coordinate into its cube representation.
    #[must_use]
    pub const fn to_cube(self) -> CubeCoord {
        CubeCoord {
            x: self.q,
            y: self.s(),
            z: self.r,
        }
    }

    /// Number of single-hex steps separating two coordinates.
    #[must_use]
    pub fn distance(self, other: AxialCoord) -> u32 {
        let a = self.to_cube();
        let b = other.to_cube();
        a.x.abs_diff(b.x).max(a.y.abs_diff(b.y)).max(a.z.abs_diff(b.z))
    }

    /// Adjacent coordinate in the provided direction.
    #[must_use]
    pub const fn neighbor(self, direction: HexDirection) -> Self {
        let (dq, dr) = direction.offset();
        Self::new(self.q + dq, self.r + dr)
    }

    /// Contiguous run of hexagons from `self` to `end`, both included.
    ///
    /// The line samples `distance + 1` evenly spaced points in cube space and
    /// cube-rounds each, so consecutive entries are always neighbours.
    #[must_use]
    pub fn line_to(self, end: AxialCoord) -> Vec<AxialCoord> {
        let steps = self.distance(end);
        if steps == 0 {
            return vec![self];
        }

        let start = self.to_cube();
        let finish = end.to_cube();
        let (nx, ny, nz) = LINE_NUDGE;
        let (sx, sy, sz) = (start.x as f32 + nx, start.y as f32 + ny, start.z as f32 + nz);
        let (ex, ey, ez) = (finish.x as f32 + nx, finish.y as f32 + ny, finish.z as f32 + nz);

        (0..=steps)
            .map(|step| {
                let t = step as f32 / steps as f32;
                cube_round(
                    sx + (ex - sx) * t,
                    sy + (ey - sy) * t,
                    sz + (ez - sz) * t,
                )
            })
            .collect()
    }
}

/// Integer cube coordinate; `x + y + z == 0` for every value produced here.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CubeCoord {
    /// Cube x component, equal to axial `q`.
    pub x: i32,
    /// Cube y component, equal to `-q - r`.
    pub y: i32,
    /// Cube z component, equal to axial `r`.
    pub z: i32,
}

impl CubeCoord {
    /// Drops the redundant component.
    #[must_use]
    pub const fn to_axial(self) -> AxialCoord {
        AxialCoord::new(self.x, self.z)
    }
}

/// Rounds a fractional cube coordinate to the hexagon containing it.
///
/// Every component is rounded on its own, then the component with the
/// largest rounding error is rebuilt from the other two. When errors tie,
/// `x` is rebuilt only if its error is strictly the largest, then `y` if its
/// error strictly exceeds `z`'s, otherwise `z`.
#[must_use]
pub fn cube_round(x: f32, y: f32, z: f32) -> AxialCoord {
    let rx = x.round();
    let ry = y.round();
    let rz = z.round();

    let dx = (rx - x).abs();
    let dy = (ry - y).abs();
    let dz = (rz - z).abs();

    let (q, r) = if dx > dy && dx > dz {
        (-ry - rz, rz)
    } else if dy > dz {
        (rx, rz)
    } else {
        (rx, -rx - ry)
    };

    AxialCoord::new(q as i32, r as i32)
}

/// The six neighbour directions of a pointy-top hexagon.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HexDirection {
    /// Axial offset `(+1, 0)`.
    East,
    /// Axial offset `(+1, -1)`.
    NorthEast,
    /// Axial offset `(0, -1)`.
    NorthWest,
    /// Axial offset `(-1, 0)`.
    West,
    /// Axial offset `(-1, +1)`.
    SouthWest,
    /// Axial offset `(0, +1)`.
    SouthEast,
}

impl HexDirection {
    /// All directions in counter-clockwise order starting east.
    pub const ALL: [HexDirection; 6] = [
        HexDirection::East,
        HexDirection::NorthEast,
        HexDirection::NorthWest,
        HexDirection::West,
        HexDirection::SouthWest,
        HexDirection::SouthEast,
    ];

    /// Axial `(dq, dr)` delta for the direction.
    #[must_use]
    pub const fn offset(self) -> (i32, i32) {
        match self {
            Self::East => (1, 0),
            Self::NorthEast => (1, -1),
            Self::NorthWest => (0, -1),
            Self::West => (-1, 0),
            Self::SouthWest => (-1, 1),
            Self::SouthEast => (0, 1),
        }
    }
}

/// Maps axial coordinates onto pixel space and back.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HexLayout {
    size: f32,
    origin: Vec2,
}

impl HexLayout {
    /// Creates a layout with the given centre-to-corner size and origin offset.
    #[must_use]
    pub const fn new(size: f32, origin: Vec2) -> Self {
        Self { size, origin }
    }

    /// Distance from a hexagon centre to any of its corners, in pixels.
    #[must_use]
    pub const fn size(&self) -> f32 {
        self.size
    }

    /// Pixel position of the origin hexagon's centre.
    #[must_use]
    pub const fn origin(&self) -> Vec2 {
        self.origin
    }

    /// Pixel centre of the hexagon at `coord`.
    #[must_use]
    pub fn axial_to_pixel(&self, coord: AxialCoord) -> Vec2 {
        let q = coord.q() as f32;
        let r = coord.r() as f32;
        Vec2::new(
            self.size * SQRT_3 * (q + r / 2.0) + self.origin.x,
            self.size * 1.5 * r + self.origin.y,
        )
    }

    /// Hexagon containing the pixel `point`.
    #[must_use]
    pub fn pixel_to_axial(&self, point: Vec2) -> AxialCoord {
        let local = point - self.origin;
        let q = (SQRT_3 / 3.0 * local.x - local.y / 3.0) / self.size;
        let r = (2.0 / 3.0 * local.y) / self.size;
        cube_round(q, -q - r, r)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hexagon(radius: i32) -> Vec<AxialCoord> {
        let mut coords = Vec::new();
        for q in -radius..=radius {
            for r in -radius..=radius {
                let coord = AxialCoord::new(q, r);
                if coord.distance(AxialCoord::ORIGIN) <= radius as u32 {
                    coords.push(coord);
                }
            }
        }
        coords
    }

    fn layout() -> HexLayout {
        HexLayout::new(44.0, Vec2::new(640.0, 470.0))
    }

    #[test]
    fn pixel_round_trip_recovers_every_coordinate() {
        let layout = layout();
        for coord in hexagon(7) {
            let center = layout.axial_to_pixel(coord);
            assert_eq!(layout.pixel_to_axial(center), coord);
        }
    }

    #[test]
    fn points_near_the_centre_resolve_to_the_same_tile() {
        let layout = layout();
        let inner = layout.size() * SQRT_3 / 2.0;
        for coord in hexagon(4) {
            let center = layout.axial_to_pixel(coord);
            for angle_step in 0..12 {
                let angle = angle_step as f32 * std::f32::consts::TAU / 12.0;
                let offset = Vec2::new(angle.cos(), angle.sin()) * inner * 0.9;
                assert_eq!(layout.pixel_to_axial(center + offset), coord);
            }
        }
    }

    #[test]
    fn cube_components_sum_to_zero() {
        for coord in hexagon(7) {
            let cube = coord.to_cube();
            assert_eq!(cube.x + cube.y + cube.z, 0);
            assert_eq!(coord.q() + coord.s() + coord.r(), 0);
            assert_eq!(cube.to_axial(), coord);
        }
    }

    #[test]
    fn distance_counts_hex_steps() {
        let origin = AxialCoord::ORIGIN;
        assert_eq!(origin.distance(AxialCoord::new(2, -1)), 2);
        assert_eq!(origin.distance(AxialCoord::new(-3, 3)), 3);
        assert_eq!(AxialCoord::new(1, 1).distance(AxialCoord::new(-1, -1)), 4);
        for direction in HexDirection::ALL {
            assert_eq!(origin.distance(origin.neighbor(direction)), 1);
        }
    }

    #[test]
    fn lines_from_the_border_are_contiguous() {
        for radius in 1..=7 {
            let border: Vec<_> = hexagon(radius)
                .into_iter()
                .filter(|coord| coord.distance(AxialCoord::ORIGIN) == radius as u32)
                .collect();
            for start in border {
                let line = start.line_to(AxialCoord::ORIGIN);
                assert_eq!(line.len(), radius as usize + 1);
                assert_eq!(line.first(), Some(&start));
                assert_eq!(line.last(), Some(&AxialCoord::ORIGIN));
                for pair in line.windows(2) {
                    assert_eq!(pair[0].distance(pair[1]), 1, "gap in {line:?}");
                }
            }
        }
    }

    #[test]
    fn line_to_self_is_a_single_hex() {
        let coord = AxialCoord::new(3, -1);
        assert_eq!(coord.line_to(coord), vec![coord]);
    }

    #[test]
    fn cube_round_rebuilds_the_component_with_largest_error() {
        assert_eq!(cube_round(0.4, -0.3, -0.1), AxialCoord::new(0, 0));
        assert_eq!(cube_round(1.6, -0.7, -0.9), AxialCoord::new(2, -1));
        assert_eq!(cube_round(0.5, -0.5, 0.0), cube_round(0.5, -0.5, 0.0));
    }

    #[test]
    fn directions_match_pixel_orientation() {
        let layout = layout();
        let center = layout.axial_to_pixel(AxialCoord::ORIGIN);
        let north_west = layout.axial_to_pixel(AxialCoord::ORIGIN.neighbor(HexDirection::NorthWest));
        let south_east = layout.axial_to_pixel(AxialCoord::ORIGIN.neighbor(HexDirection::SouthEast));
        assert!(north_west.x < center.x && north_west.y < center.y);
        assert!(south_east.x > center.x && south_east.y > center.y);
    }
}
