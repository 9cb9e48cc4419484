use bracket_geometry::prelude::Point;
use bracket_random::prelude::RandomNumberGenerator;
use tracing::debug;

use super::{Map, Room};
use crate::config::GameConfig;
use crate::data::{
    SpawnTable,
    items::{self, ItemTemplate},
    monsters::MonsterTemplate,
};
use crate::ecs::World;

/// Everything a freshly generated level consists of besides its entities,
/// which are written into the world passed to [`generate`].
#[derive(Clone, Debug, PartialEq)]
pub struct LevelLayout {
    pub depth: i32,
    pub map: Map,
    pub rooms: Vec<Room>,
    pub player_spawn: Point,
    pub stairs: Point,
}

struct Population {
    monsters: SpawnTable<MonsterTemplate>,
    items: SpawnTable<ItemTemplate>,
}

/// Builds a level of rooms joined by L-shaped tunnels.
///
/// `world` is reduced to the player, who is moved to the first room's
/// centre; monsters, items and the stairs are then spawned into it. The
/// result depends only on the configuration and the RNG stream.
pub fn generate(
    depth: i32,
    config: &GameConfig,
    rng: &mut RandomNumberGenerator,
    world: &mut World,
) -> LevelLayout {
    let settings = &config.map;
    let population = Population {
        monsters: MonsterTemplate::table(&config.tables),
        items: ItemTemplate::table(&config.tables),
    };

    world.retain_player();
    let mut map = Map::new(settings.width, settings.height);
    let mut rooms: Vec<Room> = Vec::new();
    let mut player_spawn = world.player().map_or(Point::new(0, 0), |p| p.point());

    for _ in 0..settings.max_rooms {
        let w = rng.range(settings.room_min_size, settings.room_max_size + 1);
        let h = rng.range(settings.room_min_size, settings.room_max_size + 1);
        let x_max = settings.width - w - 1;
        let y_max = settings.height - h - 1;
        if x_max < 0 || y_max < 0 {
            continue;
        }
        let x = rng.range(0, x_max + 1);
        let y = rng.range(0, y_max + 1);
        let candidate = Room::with_size(x, y, w, h);

        if rooms.iter().any(|room| room.intersect(&candidate)) {
            continue;
        }

        map.carve_room(&candidate);
        let center = candidate.center();
        match rooms.last().map(Room::center) {
            None => {
                player_spawn = center;
                if let Some(player) = world.player_mut() {
                    player.x = center.x;
                    player.y = center.y;
                }
            }
            Some(prev) => {
                if rng.range(0, 2) == 1 {
                    map.carve_h_tunnel(prev.x, center.x, prev.y);
                    map.carve_v_tunnel(prev.y, center.y, center.x);
                } else {
                    map.carve_v_tunnel(prev.y, center.y, prev.x);
                    map.carve_h_tunnel(prev.x, center.x, center.y);
                }
            }
        }

        populate(&candidate, &map, config, &population, rng, world);
        rooms.push(candidate);
    }

    let stairs = rooms.last().map_or(player_spawn, Room::center);
    let stairs_id = world.spawn(items::stairs(stairs.x, stairs.y));
    world.send_to_back(stairs_id);
    world.set_stairs(stairs_id);

    debug!(
        depth,
        rooms = rooms.len(),
        entities = world.len(),
        "level generated"
    );

    LevelLayout {
        depth,
        map,
        rooms,
        player_spawn,
        stairs,
    }
}

/// Scatters monsters and items over a room's interior. A roll that lands
/// on a blocked cell places nothing.
fn populate(
    room: &Room,
    map: &Map,
    config: &GameConfig,
    population: &Population,
    rng: &mut RandomNumberGenerator,
    world: &mut World,
) {
    let monster_count = rng.range(0, config.map.max_room_monsters.max(0) + 1);
    for _ in 0..monster_count {
        let point = random_interior_point(room, rng);
        if world.is_blocked(map, point) {
            continue;
        }
        if let Some(template) = population.monsters.roll(rng) {
            world.spawn(template.spawn(point.x, point.y));
        }
    }

    let item_count = rng.range(0, config.map.max_room_items.max(0) + 1);
    for _ in 0..item_count {
        let point = random_interior_point(room, rng);
        if world.is_blocked(map, point) {
            continue;
        }
        if let Some(template) = population.items.roll(rng) {
            let id = world.spawn(template.spawn(point.x, point.y));
            world.send_to_back(id);
        }
    }
}

fn random_interior_point(room: &Room, rng: &mut RandomNumberGenerator) -> Point {
    Point::new(
        rng.range(room.x1 + 1, room.x2),
        rng.range(room.y1 + 1, room.y2),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::monsters;

    fn level(seed: u64) -> (LevelLayout, World) {
        let mut rng = RandomNumberGenerator::seeded(seed);
        let mut world = World::new(monsters::player(0, 0));
        let layout = generate(1, &GameConfig::default(), &mut rng, &mut world);
        (layout, world)
    }

    #[test]
    fn player_starts_in_first_room_and_stairs_in_last() {
        let (layout, world) = level(11);
        assert!(!layout.rooms.is_empty());
        assert_eq!(layout.player_spawn, layout.rooms[0].center());
        assert_eq!(world.player().map(|p| p.point()), Some(layout.player_spawn));
        let stairs = world.stairs_id().and_then(|id| world.get(id)).unwrap();
        assert_eq!(stairs.point(), layout.rooms.last().unwrap().center());
        assert!(stairs.always_visible);
        assert!(!stairs.blocks);
    }

    #[test]
    fn spawn_and_stairs_are_floor() {
        let (layout, _) = level(5);
        assert!(!layout.map.is_blocked(layout.player_spawn));
        assert!(!layout.map.is_blocked(layout.stairs));
    }

    #[test]
    fn monsters_never_share_a_cell_or_stand_in_rock() {
        for seed in 0..20 {
            let (layout, world) = level(seed);
            let blockers: Vec<_> = world.iter().filter(|e| e.blocks).collect();
            for (i, a) in blockers.iter().enumerate() {
                assert!(!layout.map.is_blocked(a.point()));
                for b in &blockers[i + 1..] {
                    assert_ne!(a.point(), b.point(), "seed {seed}");
                }
            }
        }
    }

    #[test]
    fn population_respects_per_room_caps() {
        let (layout, world) = level(3);
        let monsters = world.iter().filter(|e| e.ai.is_some()).count();
        let items = world.iter().filter(|e| e.item.is_some()).count();
        assert!(monsters <= layout.rooms.len() * 3);
        assert!(items <= layout.rooms.len() * 2);
    }

    #[test]
    fn items_and_stairs_sit_behind_the_player() {
        let (_, world) = level(9);
        let player_index = world.index_of(world.player_id()).unwrap();
        for (index, entity) in world.iter().enumerate() {
            if entity.item.is_some() || Some(entity.id) == world.stairs_id() {
                assert!(index < player_index);
            }
        }
    }

    #[test]
    fn regeneration_keeps_the_player() {
        let mut rng = RandomNumberGenerator::seeded(1);
        let mut world = World::new(monsters::player(0, 0));
        let config = GameConfig::default();
        generate(1, &config, &mut rng, &mut world);
        let player = world.player_id();
        let layout = generate(2, &config, &mut rng, &mut world);
        assert_eq!(world.player_id(), player);
        assert_eq!(layout.depth, 2);
        assert_eq!(world.player().map(|p| p.point()), Some(layout.player_spawn));
    }
}
