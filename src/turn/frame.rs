use bracket_geometry::prelude::Point;
use bracket_terminal::prelude::RGB;

use crate::ecs::resources::{GameState, LogLine};
use crate::session::Session;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TileView {
    pub blocked: bool,
    pub block_sight: bool,
    pub explored: bool,
    pub visible: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct EntityView {
    pub x: i32,
    pub y: i32,
    pub glyph: char,
    pub color: RGB,
    pub name: String,
    /// Index in the world sequence; lower is drawn first.
    pub sequence: usize,
}

/// A read-only picture of the session for one render. Entities are listed
/// in draw order, with the player last so nothing covers it.
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    pub width: i32,
    pub height: i32,
    pub tiles: Vec<TileView>,
    pub entities: Vec<EntityView>,
    pub log: Vec<LogLine>,
    pub hp: i32,
    pub max_hp: i32,
    pub xp: i32,
    pub xp_to_next: i32,
    pub dungeon_level: i32,
    pub player_level: i32,
    pub state: GameState,
    pub inventory: Vec<String>,
    pub level_up_options: Vec<String>,
}

impl Frame {
    pub fn capture(session: &Session) -> Self {
        let map = &session.map;
        let width = map.width();
        let height = map.height();
        let mut tiles = Vec::with_capacity(map.tiles().len());
        for y in 0..height {
            for x in 0..width {
                let point = Point::new(x, y);
                tiles.push(TileView {
                    blocked: map.is_blocked(point),
                    block_sight: map.blocks_sight(point),
                    explored: map.is_explored(point),
                    visible: session.is_visible(point),
                });
            }
        }

        let player = session.player_id();
        let mut entities: Vec<EntityView> = session
            .world
            .iter()
            .enumerate()
            .filter(|(_, e)| e.id != player && session.visibility.shows(map, e))
            .map(|(sequence, e)| EntityView {
                x: e.x,
                y: e.y,
                glyph: e.glyph,
                color: e.color,
                name: e.name.clone(),
                sequence,
            })
            .collect();
        if let (Some(p), Some(sequence)) = (session.player(), session.world.index_of(player)) {
            entities.push(EntityView {
                x: p.x,
                y: p.y,
                glyph: p.glyph,
                color: p.color,
                name: p.name.clone(),
                sequence,
            });
        }

        let fighter = session.player_fighter();
        let level_up_options = if session.pending_level_up() {
            crate::progression::LevelUpChoice::ALL
                .iter()
                .map(|choice| choice.label(session))
                .collect()
        } else {
            Vec::new()
        };

        Self {
            width,
            height,
            tiles,
            entities,
            log: session.log.lines().cloned().collect(),
            hp: fighter.map_or(0, |f| f.hp),
            max_hp: fighter.map_or(0, |f| f.max_hp),
            xp: fighter.map_or(0, |f| f.xp),
            xp_to_next: session.xp_to_next_level(),
            dungeon_level: session.dungeon_level,
            player_level: session.player_level,
            state: session.state,
            inventory: session.inventory_names(),
            level_up_options,
        }
    }

    pub fn tile(&self, x: i32, y: i32) -> Option<&TileView> {
        if x < 0 || y < 0 || x >= self.width || y >= self.height {
            return None;
        }
        self.tiles.get((y * self.width + x) as usize)
    }
}
