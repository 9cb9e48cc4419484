//! Property tests for level generation and the visibility bookkeeping.

#![allow(clippy::unwrap_used)]

use std::collections::HashSet;

use bracket_random::prelude::RandomNumberGenerator;
use proptest::prelude::*;

use tombs::GameConfig;
use tombs::data::monsters;
use tombs::ecs::World;
use tombs::ecs::components::{DeathBehavior, Fighter};
use tombs::items::targeting::AutoTarget;
use tombs::map::generator;
use tombs::{Intent, Session};

fn generate(seed: u64) -> (generator::LevelLayout, World) {
    let config = GameConfig::default();
    let mut rng = RandomNumberGenerator::seeded(seed);
    let mut world = World::new(monsters::player(0, 0));
    let layout = generator::generate(1, &config, &mut rng, &mut world);
    (layout, world)
}

fn step() -> impl Strategy<Value = Intent> {
    prop_oneof![
        (-1i32..=1, -1i32..=1).prop_map(|(dx, dy)| Intent::Move { dx, dy }),
        Just(Intent::Wait),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// The same seed builds the same grid, rooms and population.
    #[test]
    fn generation_is_deterministic(seed in any::<u64>()) {
        let (first, first_world) = generate(seed);
        let (second, second_world) = generate(seed);
        prop_assert_eq!(&first, &second);
        prop_assert_eq!(first_world.entities(), second_world.entities());
    }

    #[test]
    fn accepted_rooms_never_intersect(seed in any::<u64>()) {
        let (layout, _) = generate(seed);
        prop_assert!(!layout.rooms.is_empty());
        for (i, a) in layout.rooms.iter().enumerate() {
            for b in &layout.rooms[i + 1..] {
                prop_assert!(!a.intersect(b), "{:?} overlaps {:?}", a, b);
            }
        }
    }

    /// Every spawned entity stands on floor, and no two blockers share a cell.
    #[test]
    fn population_respects_blocking(seed in any::<u64>()) {
        let (layout, world) = generate(seed);
        let mut blockers = HashSet::new();
        for entity in world.iter() {
            prop_assert!(!layout.map.is_blocked(entity.point()));
            if entity.blocks {
                let at = entity.point();
                prop_assert!(blockers.insert(at), "two blockers at {:?}", at);
            }
        }
        let stairs = world.stairs_id().and_then(|id| world.get(id)).unwrap();
        prop_assert_eq!(stairs.point(), layout.rooms.last().unwrap().center());
    }

    /// Once explored, a tile stays explored for the rest of the level.
    #[test]
    fn explored_tiles_stay_explored(
        seed in any::<u64>(),
        steps in prop::collection::vec(step(), 1..40)
    ) {
        let mut session = Session::with_seed(GameConfig::default(), seed);
        session.refresh_visibility();
        for intent in steps {
            let before: Vec<bool> = session.map.tiles().iter().map(|t| t.explored()).collect();
            session.play_turn(intent, &mut AutoTarget);
            session.refresh_visibility();
            for (was, tile) in before.iter().zip(session.map.tiles()) {
                prop_assert!(!*was || tile.explored());
            }
        }
    }

    #[test]
    fn healing_never_overflows(max_hp in 1i32..200, damage in 0i32..200, amount in 0i32..500) {
        let mut fighter = Fighter::new(max_hp, 0, 1, 0, DeathBehavior::Monster);
        fighter.apply_damage(damage);
        fighter.heal(amount);
        prop_assert!(fighter.hp <= fighter.max_hp);
    }
}
