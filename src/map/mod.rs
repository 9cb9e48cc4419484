pub mod generator;

use bracket_geometry::prelude::{Point, Rect};
use bracket_pathfinding::prelude::{Algorithm2D, BaseMap, DistanceAlg};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Rooms are axis-aligned rectangles; `intersect` treats both edges as
/// inclusive, so rooms never share a wall.
pub type Room = Rect;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    pub blocked: bool,
    pub block_sight: bool,
    /// Set the first time the tile is seen and never cleared.
    explored: bool,
}

impl Default for Tile {
    fn default() -> Self {
        Tile::wall()
    }
}

impl Tile {
    pub const fn wall() -> Self {
        Self {
            blocked: true,
            block_sight: true,
            explored: false,
        }
    }

    pub const fn floor() -> Self {
        Self {
            blocked: false,
            block_sight: false,
            explored: false,
        }
    }

    pub fn explored(&self) -> bool {
        self.explored
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Map {
    width: i32,
    height: i32,
    tiles: Vec<Tile>,
}

impl Map {
    /// A grid of solid rock.
    pub fn new(width: i32, height: i32) -> Self {
        let size = (width.max(0) * height.max(0)) as usize;
        Self {
            width,
            height,
            tiles: vec![Tile::wall(); size],
        }
    }

    pub fn from_tiles(width: i32, height: i32, tiles: Vec<Tile>) -> Option<Self> {
        if width <= 0 || height <= 0 || tiles.len() != (width * height) as usize {
            return None;
        }
        Some(Self {
            width,
            height,
            tiles,
        })
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    /// Checks the tile count against the dimensions; a deserialized map
    /// may not hold.
    pub fn is_consistent(&self) -> bool {
        self.width > 0 && self.height > 0 && self.tiles.len() == (self.width * self.height) as usize
    }

    fn idx(&self, point: Point) -> Option<usize> {
        if self.in_bounds(point) {
            Some((point.y * self.width + point.x) as usize)
        } else {
            None
        }
    }

    pub fn in_bounds(&self, point: Point) -> bool {
        point.x >= 0 && point.x < self.width && point.y >= 0 && point.y < self.height
    }

    pub fn tile_at(&self, point: Point) -> Option<&Tile> {
        self.idx(point).and_then(|idx| self.tiles.get(idx))
    }

    /// Cells outside the grid count as blocked.
    pub fn is_blocked(&self, point: Point) -> bool {
        self.tile_at(point).is_none_or(|tile| tile.blocked)
    }

    pub fn blocks_sight(&self, point: Point) -> bool {
        self.tile_at(point).is_none_or(|tile| tile.block_sight)
    }

    pub fn is_explored(&self, point: Point) -> bool {
        self.tile_at(point).is_some_and(Tile::explored)
    }

    pub fn mark_explored(&mut self, point: Point) {
        if let Some(idx) = self.idx(point) {
            self.tiles[idx].explored = true;
        }
    }

    pub fn carve(&mut self, point: Point) {
        if let Some(idx) = self.idx(point) {
            let explored = self.tiles[idx].explored;
            self.tiles[idx] = Tile { explored, ..Tile::floor() };
        }
    }

    /// Opens the interior of a room, leaving its one-cell border as wall.
    pub fn carve_room(&mut self, room: &Room) {
        for x in (room.x1 + 1)..room.x2 {
            for y in (room.y1 + 1)..room.y2 {
                self.carve(Point::new(x, y));
            }
        }
    }

    pub fn carve_h_tunnel(&mut self, x1: i32, x2: i32, y: i32) {
        for x in x1.min(x2)..=x1.max(x2) {
            self.carve(Point::new(x, y));
        }
    }

    pub fn carve_v_tunnel(&mut self, y1: i32, y2: i32, x: i32) {
        for y in y1.min(y2)..=y1.max(y2) {
            self.carve(Point::new(x, y));
        }
    }
}

impl BaseMap for Map {
    fn is_opaque(&self, idx: usize) -> bool {
        self.tiles.get(idx).is_none_or(|tile| tile.block_sight)
    }

    fn get_available_exits(&self, idx: usize) -> SmallVec<[(usize, f32); 10]> {
        let mut exits = SmallVec::new();
        let point = self.index_to_point2d(idx);
        for dy in -1..=1 {
            for dx in -1..=1 {
                if dx == 0 && dy == 0 {
                    continue;
                }
                let dest = Point::new(point.x + dx, point.y + dy);
                if !self.is_blocked(dest) {
                    let cost = if dx != 0 && dy != 0 { 1.45 } else { 1.0 };
                    exits.push((self.point2d_to_index(dest), cost));
                }
            }
        }
        exits
    }

    fn get_pathing_distance(&self, idx1: usize, idx2: usize) -> f32 {
        let p1 = self.index_to_point2d(idx1);
        let p2 = self.index_to_point2d(idx2);
        DistanceAlg::Pythagoras.distance2d(p1, p2)
    }
}

impl Algorithm2D for Map {
    fn dimensions(&self) -> Point {
        Point::new(self.width, self.height)
    }

    fn in_bounds(&self, point: Point) -> bool {
        Map::in_bounds(self, point)
    }
}
