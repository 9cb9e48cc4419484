use std::collections::HashSet;

use bracket_geometry::prelude::Point;
use bracket_pathfinding::prelude::field_of_view;

use super::Entity;
use crate::map::Map;

/// Cells visible from `origin` within `radius`. Opaque cells that stop the
/// sight line are included only when `light_walls` is set.
pub fn compute_visible(map: &Map, origin: Point, radius: i32, light_walls: bool) -> HashSet<Point> {
    field_of_view(origin, radius, map)
        .into_iter()
        .filter(|point| map.in_bounds(*point))
        .filter(|point| light_walls || *point == origin || !map.blocks_sight(*point))
        .collect()
}

/// The player's current field of view, recomputed lazily.
#[derive(Clone, Debug)]
pub struct Visibility {
    radius: i32,
    light_walls: bool,
    dirty: bool,
    visible: HashSet<Point>,
}

impl Visibility {
    pub fn new(radius: i32, light_walls: bool) -> Self {
        Self {
            radius,
            light_walls,
            dirty: true,
            visible: HashSet::new(),
        }
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Recomputes from `origin` if the view is dirty, marking every visible
    /// cell explored. Returns whether anything was recomputed.
    pub fn refresh(&mut self, map: &mut Map, origin: Point) -> bool {
        if !self.dirty {
            return false;
        }
        self.visible = compute_visible(map, origin, self.radius, self.light_walls);
        for point in &self.visible {
            map.mark_explored(*point);
        }
        self.dirty = false;
        true
    }

    pub fn is_visible(&self, point: Point) -> bool {
        self.visible.contains(&point)
    }

    /// Entities show while in view; remembered ones also once their cell
    /// has been explored.
    pub fn shows(&self, map: &Map, entity: &Entity) -> bool {
        self.is_visible(entity.point())
            || (entity.always_visible && map.is_explored(entity.point()))
    }
}
