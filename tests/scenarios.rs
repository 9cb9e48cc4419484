//! End-to-end play through the public session API.

#![allow(clippy::unwrap_used)]

use bracket_geometry::prelude::Point;
use bracket_random::prelude::RandomNumberGenerator;

use tombs::data::items::ItemTemplate;
use tombs::data::monsters::{self, MonsterTemplate};
use tombs::ecs::components::ItemKind;
use tombs::ecs::resources::GameState;
use tombs::ecs::{EntityId, World};
use tombs::items::targeting::{AutoTarget, ExplicitTarget};
use tombs::map::{Map, Room};
use tombs::scripted_input::ScriptedInput;
use tombs::session::INVENTORY_CAPACITY;
use tombs::turn::{self, Frame, Renderer};
use tombs::{GameConfig, Intent, RunEnd, Session, TurnOutcome};

/// One open room, player at (5, 5), nothing else.
fn hall() -> Session {
    let mut map = Map::new(30, 14);
    map.carve_room(&Room::with_size(0, 0, 29, 13));
    let world = World::new(monsters::player(5, 5));
    let mut session = Session::from_parts(
        GameConfig::default(),
        map,
        world,
        RandomNumberGenerator::seeded(7),
    );
    session.refresh_visibility();
    session
}

fn place_item(session: &mut Session, kind: ItemKind, x: i32, y: i32) -> EntityId {
    session.world.spawn(ItemTemplate::for_kind(kind).spawn(x, y))
}

#[derive(Default)]
struct Count(usize);

impl Renderer for Count {
    fn render(&mut self, _frame: &Frame) {
        self.0 += 1;
    }
}

#[test]
fn pickup_at_capacity_keeps_the_item_on_the_floor() {
    let mut session = hall();
    for _ in 0..INVENTORY_CAPACITY {
        place_item(&mut session, ItemKind::Heal, 5, 5);
        assert_eq!(session.play_turn(Intent::PickUp, &mut AutoTarget), TurnOutcome::Consumed);
    }
    let extra = place_item(&mut session, ItemKind::Lightning, 5, 5);
    assert_eq!(session.play_turn(Intent::PickUp, &mut AutoTarget), TurnOutcome::NotConsumed);
    assert_eq!(session.inventory.len(), INVENTORY_CAPACITY);
    assert!(session.world.get(extra).is_some());
}

#[test]
fn using_an_item_removes_exactly_that_item() {
    let mut session = hall();
    place_item(&mut session, ItemKind::Confusion, 5, 5);
    session.play_turn(Intent::PickUp, &mut AutoTarget);
    place_item(&mut session, ItemKind::Fireball, 5, 5);
    session.play_turn(Intent::PickUp, &mut AutoTarget);
    let orc = session.world.spawn(MonsterTemplate::orc().spawn(12, 5));

    // Cancelled: nothing changes, the orc does not get a turn.
    let before = session.inventory.clone();
    let outcome = session.play_turn(Intent::UseItem(1), &mut ExplicitTarget::cancelled());
    assert_eq!(outcome, TurnOutcome::NotConsumed);
    assert_eq!(session.inventory, before);
    assert_eq!(session.world.get(orc).unwrap().point(), Point::new(12, 5));

    // Resolved: the fireball goes, the confusion scroll stays.
    let outcome = session.play_turn(Intent::UseItem(1), &mut ExplicitTarget::at(Point::new(12, 5)));
    assert_eq!(outcome, TurnOutcome::Consumed);
    assert_eq!(session.inventory_names(), vec!["scroll of confusion".to_string()]);
    assert!(session.world.get(orc).unwrap().fighter.is_none());
}

#[test]
fn bump_attacks_kill_and_pay_out_once() {
    let mut session = hall();
    let mut victim = MonsterTemplate::orc().spawn(6, 5);
    if let Some(f) = victim.fighter.as_mut() {
        f.defense = 2;
        f.hp = 10;
        f.max_hp = 10;
    }
    let orc = session.world.spawn(victim);

    for _ in 0..4 {
        session.play_turn(Intent::Move { dx: 1, dy: 0 }, &mut AutoTarget);
    }
    let remains = session.world.get(orc).unwrap();
    assert!(remains.fighter.is_none() && remains.ai.is_none() && !remains.blocks);
    assert!(remains.name.starts_with("remains of"));
    assert_eq!(session.player_fighter().unwrap().xp, 35);

    // The fifth step walks onto the remains instead of attacking.
    session.play_turn(Intent::Move { dx: 1, dy: 0 }, &mut AutoTarget);
    assert_eq!(session.player_point(), Point::new(6, 5));
    assert_eq!(session.player_fighter().unwrap().xp, 35);
}

#[test]
fn a_troll_pack_ends_the_game() {
    let mut session = hall();
    for (x, y) in [(4, 4), (5, 4), (6, 4), (4, 6), (5, 6), (6, 6)] {
        session.world.spawn(MonsterTemplate::troll().spawn(x, y));
    }
    let mut turns = 0;
    while session.state == GameState::Playing && turns < 100 {
        session.play_turn(Intent::Wait, &mut AutoTarget);
        turns += 1;
    }
    assert_eq!(session.state, GameState::Dead);
    assert!(session.log.contains("You died!"));
    assert_eq!(session.play_turn(Intent::Wait, &mut AutoTarget), TurnOutcome::NotConsumed);
}

#[test]
fn scripted_run_walks_picks_up_and_quits() {
    let mut session = hall();
    place_item(&mut session, ItemKind::Heal, 7, 5);
    let script = "e\ne\npickup\nwait\nquit\nn\n";
    let mut input = ScriptedInput::parse(script).unwrap();
    let mut renderer = Count::default();
    assert_eq!(turn::run(&mut session, &mut input, &mut renderer), RunEnd::Quit);
    assert_eq!(session.player_point(), Point::new(7, 5));
    assert_eq!(session.inventory_names(), vec!["healing potion".to_string()]);
    assert_eq!(input.remaining(), 1);
    assert_eq!(renderer.0, 5);
}

#[test]
fn saved_game_keeps_playing_after_load() {
    let mut session = Session::with_seed(GameConfig::default(), 21);
    session.play_turn(Intent::Wait, &mut AutoTarget);
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("savegame.json");
    tombs::save::save_to_path(&session, &path).unwrap();

    let mut loaded = tombs::save::load_from_path(&path, GameConfig::default(), 3).unwrap();
    assert_eq!(loaded.player_point(), session.player_point());
    assert_eq!(loaded.dungeon_level, 1);
    assert_eq!(loaded.play_turn(Intent::Wait, &mut AutoTarget), TurnOutcome::Consumed);
    let frame = loaded.frame();
    assert!(frame.tiles.iter().any(|t| t.visible));
}
