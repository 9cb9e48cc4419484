//! The single owner of all simulation state for one game.

use bracket_geometry::prelude::Point;
use bracket_random::prelude::RandomNumberGenerator;
use bracket_terminal::prelude::RGB;
use tracing::info;

use crate::config::GameConfig;
use crate::data::{monsters, palette};
use crate::ecs::{
    Entity, EntityId, World,
    components::Fighter,
    resources::{GameState, MessageLog},
    systems::Visibility,
};
use crate::map::{Map, Room, generator};

pub const INVENTORY_CAPACITY: usize = 26;

pub struct Session {
    pub config: GameConfig,
    pub map: Map,
    pub rooms: Vec<Room>,
    pub world: World,
    pub inventory: Vec<Entity>,
    pub log: MessageLog,
    pub state: GameState,
    pub dungeon_level: i32,
    pub player_level: i32,
    pub visibility: Visibility,
    pub rng: RandomNumberGenerator,
    pub(crate) pending_level_up: bool,
}

impl Session {
    /// Starts a new game on dungeon level 1, seeded from the configuration
    /// or the clock.
    pub fn new_game(config: GameConfig) -> Self {
        let seed = config.game.seed.unwrap_or_else(clock_seed);
        Self::with_seed(config, seed)
    }

    pub fn with_seed(config: GameConfig, seed: u64) -> Self {
        let mut rng = RandomNumberGenerator::seeded(seed);
        let mut world = World::new(monsters::player(0, 0));
        let layout = generator::generate(1, &config, &mut rng, &mut world);
        let mut session = Self::from_parts(config, layout.map, world, rng);
        session.rooms = layout.rooms;
        session.message(
            "Welcome stranger! Prepare to perish in the Tombs of the Ancient Kings.",
            palette::RED,
        );
        info!(seed, "new game");
        session
    }

    /// Assembles a session around an existing map and world, on level 1
    /// with an empty inventory and log.
    pub fn from_parts(
        config: GameConfig,
        map: Map,
        world: World,
        rng: RandomNumberGenerator,
    ) -> Self {
        let log = MessageLog::new(config.log.height, config.log.width);
        let visibility = Visibility::new(config.fov.torch_radius, config.fov.light_walls);
        Self {
            config,
            map,
            rooms: Vec::new(),
            world,
            inventory: Vec::new(),
            log,
            state: GameState::Playing,
            dungeon_level: 1,
            player_level: 1,
            visibility,
            rng,
            pending_level_up: false,
        }
    }

    pub fn message<S: AsRef<str>>(&mut self, text: S, color: palette::Rgb8) {
        self.log.push(text, RGB::named(color));
    }

    pub fn player_id(&self) -> EntityId {
        self.world.player_id()
    }

    pub fn player(&self) -> Option<&Entity> {
        self.world.player()
    }

    pub fn player_point(&self) -> Point {
        self.world.player().map_or(Point::new(0, 0), Entity::point)
    }

    pub fn player_fighter(&self) -> Option<&Fighter> {
        self.world.player().and_then(|p| p.fighter.as_ref())
    }

    pub fn player_fighter_mut(&mut self) -> Option<&mut Fighter> {
        self.world.player_mut().and_then(|p| p.fighter.as_mut())
    }

    pub fn is_playing(&self) -> bool {
        self.state == GameState::Playing
    }

    pub fn is_blocked(&self, point: Point) -> bool {
        self.world.is_blocked(&self.map, point)
    }

    pub fn move_entity(&mut self, id: EntityId, dx: i32, dy: i32) -> bool {
        let moved = self.world.move_by(&self.map, id, dx, dy);
        if moved && id == self.player_id() {
            self.visibility.mark_dirty();
        }
        moved
    }

    pub fn move_towards(&mut self, id: EntityId, target: Point) -> bool {
        self.world.move_towards(&self.map, id, target)
    }

    /// Recomputes the player's view if a move made it stale.
    pub fn refresh_visibility(&mut self) {
        let origin = self.player_point();
        self.visibility.refresh(&mut self.map, origin);
    }

    pub fn is_visible(&self, point: Point) -> bool {
        self.visibility.is_visible(point)
    }

    /// A living non-player fighter standing on `point`.
    pub fn monster_at(&self, point: Point) -> Option<EntityId> {
        let player = self.player_id();
        self.world
            .iter()
            .find(|e| e.id != player && e.fighter.is_some() && e.is_at(point))
            .map(|e| e.id)
    }

    /// Nearest visible monster strictly closer than `max_range + 1`.
    pub fn closest_monster(&self, max_range: f32) -> Option<EntityId> {
        let player = self.player()?;
        let mut closest = None;
        let mut closest_dist = max_range + 1.0;
        for entity in self.world.iter() {
            if entity.id == player.id
                || entity.fighter.is_none()
                || !self.is_visible(entity.point())
            {
                continue;
            }
            let dist = player.distance_to(entity);
            if dist < closest_dist {
                closest = Some(entity.id);
                closest_dist = dist;
            }
        }
        closest
    }

    /// Whether `point` is in view and, when a range is given, no farther
    /// than it from the player.
    pub fn is_targetable(&self, point: Point, max_range: Option<f32>) -> bool {
        if !self.is_visible(point) {
            return false;
        }
        match (max_range, self.player()) {
            (Some(range), Some(player)) => player.distance(point) <= range,
            _ => true,
        }
    }

    /// Names of the entities the player can currently see on `point`.
    pub fn names_at(&self, point: Point) -> String {
        let names: Vec<&str> = self
            .world
            .iter()
            .filter(|e| e.is_at(point) && self.is_visible(e.point()))
            .map(|e| e.name.as_str())
            .collect();
        crate::ecs::resources::capitalize(&names.join(", "))
    }

    pub fn stairs(&self) -> Option<&Entity> {
        self.world.stairs_id().and_then(|id| self.world.get(id))
    }

    pub fn player_on_stairs(&self) -> bool {
        self.stairs().is_some_and(|stairs| stairs.is_at(self.player_point()))
    }

    pub fn inventory_names(&self) -> Vec<String> {
        self.inventory.iter().map(|e| e.name.clone()).collect()
    }
}

/// A seed for games started without one.
pub fn clock_seed() -> u64 {
    chrono::Utc::now().timestamp_millis().unsigned_abs()
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;

    #[test]
    fn new_game_places_player_and_welcomes() {
        let session = Session::with_seed(GameConfig::default(), 3);
        assert!(session.is_playing());
        assert_eq!(session.dungeon_level, 1);
        assert_eq!(session.player_point(), session.rooms[0].center());
        assert!(session.log.contains("Welcome stranger"));
        assert!(session.visibility.is_dirty());
    }

    #[test]
    fn closest_monster_respects_range_and_sight() {
        let mut session = arena();
        let near = spawn_orc(&mut session, 8, 5);
        spawn_orc(&mut session, 12, 5);
        assert_eq!(session.closest_monster(5.0), Some(near));
        assert_eq!(session.closest_monster(2.0), None);
    }

    #[test]
    fn player_move_dirties_view() {
        let mut session = arena();
        assert!(!session.visibility.is_dirty());
        let player = session.player_id();
        assert!(session.move_entity(player, 1, 0));
        assert!(session.visibility.is_dirty());
    }

    #[test]
    fn names_at_lists_visible_entities() {
        let mut session = arena();
        spawn_orc(&mut session, 6, 6);
        assert_eq!(session.names_at(Point::new(6, 6)), "Orc");
        assert_eq!(session.names_at(Point::new(7, 7)), "");
    }
}
