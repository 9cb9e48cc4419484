use crate::data::palette;
use crate::ecs::{EntityId, components::Ai};
use crate::session::Session;

impl Session {
    /// Gives every thinking entity one turn, in sequence order. Stops as
    /// soon as the player is dead.
    pub fn run_ai_phase(&mut self) {
        for id in self.world.ids() {
            if !self.is_playing() {
                break;
            }
            let Some(ai) = self.world.get_mut(id).and_then(|e| e.ai.take()) else {
                continue;
            };
            let next = self.take_turn(id, ai);
            if let Some(entity) = self.world.get_mut(id) {
                if entity.fighter.is_some() {
                    entity.ai = Some(next);
                }
            }
        }
    }

    /// Runs one behaviour step and returns the behaviour the entity keeps.
    fn take_turn(&mut self, id: EntityId, ai: Ai) -> Ai {
        match ai {
            Ai::Basic => {
                self.basic_turn(id);
                Ai::Basic
            }
            Ai::Confused {
                previous,
                turns_left,
            } if turns_left > 0 => {
                let dx = self.rng.range(-1, 2);
                let dy = self.rng.range(-1, 2);
                self.move_entity(id, dx, dy);
                Ai::Confused {
                    previous,
                    turns_left: turns_left - 1,
                }
            }
            Ai::Confused { previous, .. } => {
                let name = self.world.get(id).map(|e| e.name.clone()).unwrap_or_default();
                self.message(format!("The {name} is no longer confused!"), palette::RED);
                *previous
            }
        }
    }

    /// Chase the player while in view, attack when adjacent.
    fn basic_turn(&mut self, id: EntityId) {
        let Some(monster) = self.world.get(id) else {
            return;
        };
        if !self.is_visible(monster.point()) {
            return;
        }
        let Some(player) = self.player() else {
            return;
        };
        let target = player.point();
        let player_alive = player.fighter.as_ref().is_some_and(|f| f.hp > 0);
        if monster.distance_to(player) >= 2.0 {
            self.move_towards(id, target);
        } else if player_alive {
            let player_id = self.player_id();
            self.attack(id, player_id);
        }
    }
}

#[cfg(test)]
mod tests {
    use bracket_geometry::prelude::Point;

    use crate::ecs::{components::Ai, resources::GameState};
    use crate::map::{Map, Room};
    use crate::session::test_support::*;

    fn position(session: &crate::session::Session, id: crate::ecs::EntityId) -> Point {
        session.world.get(id).unwrap().point()
    }

    #[test]
    fn basic_monster_chases_then_attacks() {
        let mut session = arena();
        let orc = spawn_orc(&mut session, 9, 5);
        session.run_ai_phase();
        assert_eq!(position(&session, orc), Point::new(8, 5));
        session.run_ai_phase();
        session.run_ai_phase();
        assert_eq!(position(&session, orc), Point::new(6, 5));
        let hp_before = session.player_fighter().unwrap().hp;
        session.run_ai_phase();
        assert_eq!(position(&session, orc), Point::new(6, 5));
        // orc power 3 against player defense 2
        assert_eq!(session.player_fighter().unwrap().hp, hp_before - 1);
    }

    #[test]
    fn unseen_monsters_stay_put() {
        let mut map = Map::new(30, 12);
        map.carve_room(&Room::with_size(0, 0, 10, 10));
        map.carve_room(&Room::with_size(15, 0, 10, 10));
        let mut session = arena();
        session.map = map;
        session.visibility.mark_dirty();
        session.refresh_visibility();
        let orc = spawn_orc(&mut session, 20, 5);
        session.run_ai_phase();
        assert_eq!(position(&session, orc), Point::new(20, 5));
    }

    #[test]
    fn confusion_runs_exactly_its_turns_then_reverts() {
        let mut session = arena();
        let orc = spawn_orc(&mut session, 10, 6);
        session.world.get_mut(orc).unwrap().ai = Some(Ai::Basic.confused(3));

        for remaining in [2, 1, 0] {
            let before = position(&session, orc);
            session.run_ai_phase();
            let after = position(&session, orc);
            assert!((after.x - before.x).abs() <= 1 && (after.y - before.y).abs() <= 1);
            assert_eq!(
                session.world.get(orc).unwrap().ai,
                Some(Ai::Confused {
                    previous: Box::new(Ai::Basic),
                    turns_left: remaining
                })
            );
        }

        let before = position(&session, orc);
        session.run_ai_phase();
        assert_eq!(position(&session, orc), before, "reverting is not a move");
        assert_eq!(session.world.get(orc).unwrap().ai, Some(Ai::Basic));
        assert!(session.log.contains("no longer confused"));
    }

    #[test]
    fn nothing_acts_after_the_player_dies() {
        let mut session = arena();
        let first = spawn_orc(&mut session, 6, 5);
        let second = spawn_orc(&mut session, 12, 5);
        if let Some(f) = session.player_fighter_mut() {
            f.hp = 1;
        }
        session.run_ai_phase();
        assert_eq!(session.state, GameState::Dead);
        assert_eq!(position(&session, second), Point::new(12, 5));
        assert_eq!(session.world.get(first).unwrap().ai, Some(Ai::Basic));
    }
}
