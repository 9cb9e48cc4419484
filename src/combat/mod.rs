//! Attack, damage and death rules over `Fighter` capabilities.

use tracing::{debug, info};

use crate::data::palette;
use crate::ecs::{
    EntityId,
    components::DeathBehavior,
    resources::{GameState, capitalize},
};
use crate::session::Session;

/// The outcome of damage that killed its target.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Death {
    Player,
    Monster { xp: i32 },
}

impl Session {
    /// Melee attack. Damage is power minus defense; anything at or below
    /// zero is shrugged off. Returns the damage dealt.
    pub fn attack(&mut self, attacker: EntityId, defender: EntityId) -> i32 {
        let (Some(a), Some(d)) = (self.world.get(attacker), self.world.get(defender)) else {
            return 0;
        };
        let (Some(af), Some(df)) = (a.fighter.as_ref(), d.fighter.as_ref()) else {
            return 0;
        };
        let damage = af.power - df.defense;
        let attacker_name = capitalize(&a.name);
        let defender_name = d.name.clone();

        if damage > 0 {
            self.message(
                format!("{attacker_name} attacks {defender_name} for {damage} hit points."),
                palette::WHITE,
            );
            self.take_damage(defender, damage);
            damage
        } else {
            self.message(
                format!("{attacker_name} attacks {defender_name} but it has no effect!"),
                palette::WHITE,
            );
            0
        }
    }

    /// Applies positive damage. The death behaviour runs once, on the blow
    /// that brings hit points to zero or below; a monster's death also
    /// pays its xp to the player.
    pub fn take_damage(&mut self, target: EntityId, amount: i32) -> Option<Death> {
        let fighter = self.world.get_mut(target)?.fighter.as_mut()?;
        if !fighter.apply_damage(amount) {
            return None;
        }
        let death = fighter.death;
        let xp = fighter.xp;
        match death {
            DeathBehavior::Player => {
                self.player_death();
                Some(Death::Player)
            }
            DeathBehavior::Monster => {
                self.monster_death(target);
                if target != self.player_id() {
                    if let Some(player) = self.player_fighter_mut() {
                        player.xp += xp;
                    }
                }
                Some(Death::Monster { xp })
            }
        }
    }

    fn player_death(&mut self) {
        self.message("You died!", palette::RED);
        self.state = GameState::Dead;
        if let Some(player) = self.world.player_mut() {
            player.glyph = '%';
            player.color = bracket_terminal::prelude::RGB::named(palette::DARK_RED);
        }
        info!(level = self.dungeon_level, "player died");
    }

    /// Leaves inert remains: no longer blocking, fighting or thinking, and
    /// drawn behind everything still alive.
    fn monster_death(&mut self, id: EntityId) {
        let Some(monster) = self.world.get_mut(id) else {
            return;
        };
        let name = monster.name.clone();
        monster.glyph = '%';
        monster.color = bracket_terminal::prelude::RGB::named(palette::DARK_RED);
        monster.blocks = false;
        monster.fighter = None;
        monster.ai = None;
        monster.name = format!("remains of {name}");
        self.world.send_to_back(id);
        self.message(format!("{} is dead!", capitalize(&name)), palette::ORANGE);
        debug!(monster = %name, "monster died");
    }

    pub fn heal(&mut self, target: EntityId, amount: i32) {
        if let Some(fighter) = self.world.get_mut(target).and_then(|e| e.fighter.as_mut()) {
            fighter.heal(amount);
        }
    }
}
