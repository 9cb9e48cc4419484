use bracket_terminal::prelude::RGB;

use super::{SpawnTable, palette};
use crate::config::SpawnTables;
use crate::ecs::{
    Entity,
    components::{Ai, DeathBehavior, Fighter},
};

#[derive(Clone, Debug)]
pub struct MonsterTemplate {
    pub name: &'static str,
    pub glyph: char,
    pub color: RGB,
    pub hp: i32,
    pub defense: i32,
    pub power: i32,
    pub xp: i32,
}

impl MonsterTemplate {
    pub fn orc() -> Self {
        Self::new("orc", 'o', RGB::named(palette::DESATURATED_GREEN), 10, 0, 3, 35)
    }

    pub fn troll() -> Self {
        Self::new("troll", 'T', RGB::named(palette::DARKER_GREEN), 16, 1, 4, 100)
    }

    /// The weak/strong split used when populating rooms.
    pub fn table(weights: &SpawnTables) -> SpawnTable<Self> {
        SpawnTable::new()
            .add(weights.orc, Self::orc())
            .add(weights.troll, Self::troll())
    }

    pub fn spawn(&self, x: i32, y: i32) -> Entity {
        let mut monster = Entity::new(x, y, self.glyph, self.name, self.color);
        monster.blocks = true;
        monster.fighter = Some(Fighter::new(
            self.hp,
            self.defense,
            self.power,
            self.xp,
            DeathBehavior::Monster,
        ));
        monster.ai = Some(Ai::Basic);
        monster
    }

    fn new(
        name: &'static str,
        glyph: char,
        color: RGB,
        hp: i32,
        defense: i32,
        power: i32,
        xp: i32,
    ) -> Self {
        Self {
            name,
            glyph,
            color,
            hp,
            defense,
            power,
            xp,
        }
    }
}

pub fn player(x: i32, y: i32) -> Entity {
    let mut player = Entity::new(x, y, '@', "player", RGB::named(palette::WHITE));
    player.blocks = true;
    player.fighter = Some(Fighter::new(30, 2, 5, 0, DeathBehavior::Player));
    player
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spawned_monster_carries_fighter_and_basic_ai() {
        let troll = MonsterTemplate::troll().spawn(3, 4);
        assert_eq!((troll.x, troll.y), (3, 4));
        assert!(troll.blocks);
        assert_eq!(troll.ai, Some(Ai::Basic));
        let fighter = troll.fighter.unwrap();
        assert_eq!((fighter.hp, fighter.defense, fighter.power, fighter.xp), (16, 1, 4, 100));
    }

    #[test]
    fn default_weights_favour_orcs() {
        let table = MonsterTemplate::table(&SpawnTables::default());
        assert_eq!(table.total(), 100);
        assert_eq!(table.pick(79).map(|m| m.name), Some("orc"));
        assert_eq!(table.pick(80).map(|m| m.name), Some("troll"));
    }
}
