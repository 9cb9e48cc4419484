use bracket_terminal::prelude::RGB;

use super::{SpawnTable, palette};
use crate::config::SpawnTables;
use crate::ecs::{
    Entity,
    components::{Item, ItemKind},
};

#[derive(Clone, Debug)]
pub struct ItemTemplate {
    pub name: &'static str,
    pub glyph: char,
    pub color: RGB,
    pub kind: ItemKind,
}

impl ItemTemplate {
    pub fn for_kind(kind: ItemKind) -> Self {
        match kind {
            ItemKind::Heal => Self::new(
                "healing potion",
                '!',
                RGB::named(palette::VIOLET),
                ItemKind::Heal,
            ),
            ItemKind::Lightning => Self::new(
                "scroll of lightning bolt",
                '#',
                RGB::named(palette::LIGHT_YELLOW),
                ItemKind::Lightning,
            ),
            ItemKind::Fireball => Self::new(
                "scroll of fireball",
                '#',
                RGB::named(palette::LIGHT_YELLOW),
                ItemKind::Fireball,
            ),
            ItemKind::Confusion => Self::new(
                "scroll of confusion",
                '#',
                RGB::named(palette::LIGHT_YELLOW),
                ItemKind::Confusion,
            ),
        }
    }

    /// Cumulative-probability bands over the effect table.
    pub fn table(weights: &SpawnTables) -> SpawnTable<Self> {
        SpawnTable::new()
            .add(weights.healing_potion, Self::for_kind(ItemKind::Heal))
            .add(weights.lightning_scroll, Self::for_kind(ItemKind::Lightning))
            .add(weights.fireball_scroll, Self::for_kind(ItemKind::Fireball))
            .add(weights.confusion_scroll, Self::for_kind(ItemKind::Confusion))
    }

    pub fn spawn(&self, x: i32, y: i32) -> Entity {
        let mut item = Entity::new(x, y, self.glyph, self.name, self.color);
        item.always_visible = true;
        item.item = Some(Item { kind: self.kind });
        item
    }

    pub const fn new(name: &'static str, glyph: char, color: RGB, kind: ItemKind) -> Self {
        Self {
            name,
            glyph,
            color,
            kind,
        }
    }
}

pub fn stairs(x: i32, y: i32) -> Entity {
    let mut stairs = Entity::new(x, y, '<', "stairs", RGB::named(palette::WHITE));
    stairs.always_visible = true;
    stairs
}
