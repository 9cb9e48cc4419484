//! Entities and the ordered sequence they live in.
//!
//! The sequence order doubles as update order and back-to-front draw
//! order: index 0 is drawn first, behind everything else.

pub mod components;
pub mod resources;
pub mod systems;

use bracket_geometry::prelude::Point;
use bracket_pathfinding::prelude::DistanceAlg;
use bracket_terminal::prelude::RGB;
use serde::{Deserialize, Serialize};

use crate::data::rgb_serde;
use crate::map::Map;

use self::components::{Ai, Fighter, Item};

/// Stable handle to an entity. Survives reordering and moves between the
/// world and the inventory; never keeps the entity alive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u32);

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    pub x: i32,
    pub y: i32,
    pub glyph: char,
    #[serde(with = "rgb_serde")]
    pub color: RGB,
    pub name: String,
    pub blocks: bool,
    pub always_visible: bool,
    pub fighter: Option<Fighter>,
    pub ai: Option<Ai>,
    pub item: Option<Item>,
}

impl Entity {
    /// A bare, non-blocking entity. The id is assigned when it joins a world.
    pub fn new<S: Into<String>>(x: i32, y: i32, glyph: char, name: S, color: RGB) -> Self {
        Self {
            id: EntityId(0),
            x,
            y,
            glyph,
            color,
            name: name.into(),
            blocks: false,
            always_visible: false,
            fighter: None,
            ai: None,
            item: None,
        }
    }

    pub fn point(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn distance_to(&self, other: &Entity) -> f32 {
        self.distance(other.point())
    }

    pub fn distance(&self, point: Point) -> f32 {
        DistanceAlg::Pythagoras.distance2d(self.point(), point)
    }

    pub fn is_at(&self, point: Point) -> bool {
        self.x == point.x && self.y == point.y
    }
}

/// Unit step towards a target: the direction vector normalised to length
/// one, each axis rounded on its own.
pub fn step_towards(from: Point, to: Point) -> (i32, i32) {
    let dx = (to.x - from.x) as f32;
    let dy = (to.y - from.y) as f32;
    let distance = (dx * dx + dy * dy).sqrt();
    if distance == 0.0 {
        return (0, 0);
    }
    ((dx / distance).round() as i32, (dy / distance).round() as i32)
}

#[derive(Clone, Debug, PartialEq)]
pub struct World {
    entities: Vec<Entity>,
    player: EntityId,
    stairs: Option<EntityId>,
    next_id: u32,
}

impl World {
    pub fn new(mut player: Entity) -> Self {
        player.id = EntityId(0);
        Self {
            player: player.id,
            entities: vec![player],
            stairs: None,
            next_id: 1,
        }
    }

    /// Rebuilds a world from saved parts. Fails when the handles do not
    /// resolve or ids repeat.
    pub fn from_parts(
        entities: Vec<Entity>,
        player: EntityId,
        stairs: Option<EntityId>,
        reserved_ids: impl IntoIterator<Item = EntityId>,
    ) -> Option<Self> {
        let mut seen = std::collections::HashSet::new();
        if !entities.iter().all(|e| seen.insert(e.id)) {
            return None;
        }
        let mut next_id = entities.iter().map(|e| e.id.0 + 1).max().unwrap_or(0);
        for id in reserved_ids {
            if !seen.insert(id) {
                return None;
            }
            next_id = next_id.max(id.0 + 1);
        }
        let world = Self {
            entities,
            player,
            stairs,
            next_id,
        };
        if world.get(player).and_then(|p| p.fighter.as_ref()).is_none() {
            return None;
        }
        if stairs.is_some_and(|id| world.get(id).is_none()) {
            return None;
        }
        Some(world)
    }

    /// Drops everything but the player, keeping the id counter so handles
    /// held elsewhere (the inventory) stay unique.
    pub fn retain_player(&mut self) {
        let player = self.player;
        self.entities.retain(|e| e.id == player);
        self.stairs = None;
    }

    /// Appends a new entity at the front of the draw order.
    pub fn spawn(&mut self, mut entity: Entity) -> EntityId {
        entity.id = EntityId(self.next_id);
        self.next_id += 1;
        let id = entity.id;
        self.entities.push(entity);
        id
    }

    /// Puts back an entity that already has an id (a dropped item).
    pub fn insert(&mut self, entity: Entity) {
        self.next_id = self.next_id.max(entity.id.0 + 1);
        self.entities.push(entity);
    }

    pub fn remove(&mut self, id: EntityId) -> Option<Entity> {
        if id == self.player {
            return None;
        }
        let index = self.index_of(id)?;
        if self.stairs == Some(id) {
            self.stairs = None;
        }
        Some(self.entities.remove(index))
    }

    pub fn index_of(&self, id: EntityId) -> Option<usize> {
        self.entities.iter().position(|e| e.id == id)
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.iter().find(|e| e.id == id)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.iter_mut().find(|e| e.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter()
    }

    /// Ids in sequence order, detached from the borrow of the world.
    pub fn ids(&self) -> Vec<EntityId> {
        self.entities.iter().map(|e| e.id).collect()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn player_id(&self) -> EntityId {
        self.player
    }

    pub fn player(&self) -> Option<&Entity> {
        self.get(self.player)
    }

    pub fn player_mut(&mut self) -> Option<&mut Entity> {
        let id = self.player;
        self.get_mut(id)
    }

    pub fn stairs_id(&self) -> Option<EntityId> {
        self.stairs
    }

    pub fn set_stairs(&mut self, id: EntityId) {
        self.stairs = Some(id);
    }

    /// Moves the entity to index 0, behind every other entity.
    pub fn send_to_back(&mut self, id: EntityId) {
        if let Some(index) = self.index_of(id) {
            let entity = self.entities.remove(index);
            self.entities.insert(0, entity);
        }
    }

    /// Moves the entity to the end of the sequence, drawn over everything.
    pub fn bring_to_front(&mut self, id: EntityId) {
        if let Some(index) = self.index_of(id) {
            let entity = self.entities.remove(index);
            self.entities.push(entity);
        }
    }

    pub fn blocking_at(&self, point: Point) -> Option<EntityId> {
        self.entities
            .iter()
            .find(|e| e.blocks && e.is_at(point))
            .map(|e| e.id)
    }

    /// A cell is blocked by its tile (or lying outside the map) or by a
    /// blocking entity standing on it.
    pub fn is_blocked(&self, map: &Map, point: Point) -> bool {
        map.is_blocked(point) || self.blocking_at(point).is_some()
    }

    /// Moves by one step if the destination is free; otherwise nothing
    /// happens. Returns whether the entity moved.
    pub fn move_by(&mut self, map: &Map, id: EntityId, dx: i32, dy: i32) -> bool {
        let Some(entity) = self.get(id) else {
            return false;
        };
        let target = Point::new(entity.x + dx, entity.y + dy);
        if (dx == 0 && dy == 0) || self.is_blocked(map, target) {
            return false;
        }
        if let Some(entity) = self.get_mut(id) {
            entity.x = target.x;
            entity.y = target.y;
        }
        true
    }

    pub fn move_towards(&mut self, map: &Map, id: EntityId, target: Point) -> bool {
        let Some(entity) = self.get(id) else {
            return false;
        };
        let (dx, dy) = step_towards(entity.point(), target);
        self.move_by(map, id, dx, dy)
    }
}
