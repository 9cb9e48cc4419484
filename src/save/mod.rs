//! Game snapshots and their JSON file format.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use bracket_random::prelude::RandomNumberGenerator;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::GameConfig;
use crate::ecs::{
    Entity, EntityId, World,
    resources::{GameState, MessageLog},
};
use crate::error::SaveError;
use crate::map::Map;
use crate::session::{INVENTORY_CAPACITY, Session};

/// Current save file format version
pub const SAVE_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveHeader {
    pub magic: String,
    pub version: u32,
    pub dungeon_level: i32,
    /// RFC 3339 time of the save.
    pub saved_at: String,
}

impl SaveHeader {
    const MAGIC: &'static str = "TOMB";

    fn new(dungeon_level: i32) -> Self {
        Self {
            magic: Self::MAGIC.to_string(),
            version: SAVE_VERSION,
            dungeon_level,
            saved_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn validate(&self) -> Result<(), SaveError> {
        if self.magic != Self::MAGIC {
            return Err(SaveError::Corrupted(format!("bad magic '{}'", self.magic)));
        }
        if self.version != SAVE_VERSION {
            return Err(SaveError::IncompatibleVersion {
                expected: SAVE_VERSION,
                found: self.version,
            });
        }
        Ok(())
    }
}

/// Everything needed to resume a game. Entity handles are stored as
/// positions in the sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub header: SaveHeader,
    pub map: Map,
    pub entities: Vec<Entity>,
    pub player_index: usize,
    pub stairs_index: Option<usize>,
    pub inventory: Vec<Entity>,
    pub log: MessageLog,
    pub state: GameState,
    pub dungeon_level: i32,
    pub player_level: i32,
    #[serde(default)]
    pub pending_level_up: bool,
}

impl Snapshot {
    pub fn capture(session: &Session) -> Self {
        let world = &session.world;
        Self {
            header: SaveHeader::new(session.dungeon_level),
            map: session.map.clone(),
            entities: world.entities().to_vec(),
            player_index: world.index_of(world.player_id()).unwrap_or(usize::MAX),
            stairs_index: world.stairs_id().and_then(|id| world.index_of(id)),
            inventory: session.inventory.clone(),
            log: session.log.clone(),
            state: session.state,
            dungeon_level: session.dungeon_level,
            player_level: session.player_level,
            pending_level_up: session.pending_level_up(),
        }
    }

    /// Rebuilds a session. Nothing is restored unless every structural
    /// check passes; the view is recomputed before the next render.
    pub fn restore(self, config: GameConfig, seed: u64) -> Result<Session, SaveError> {
        self.header.validate()?;
        if !self.map.is_consistent() {
            return Err(SaveError::Corrupted("tile grid does not match its size".into()));
        }
        let player_index = self.player_index;
        let player = self
            .entities
            .get(player_index)
            .map(|e| e.id)
            .ok_or_else(|| corrupted(format!("no entity at player index {player_index}")))?;
        let stairs: Option<EntityId> = match self.stairs_index {
            Some(index) => Some(
                self.entities
                    .get(index)
                    .map(|e| e.id)
                    .ok_or_else(|| corrupted(format!("no entity at stairs index {index}")))?,
            ),
            None => None,
        };
        if self.inventory.len() > INVENTORY_CAPACITY {
            return Err(SaveError::Corrupted(format!(
                "{} items exceed the inventory",
                self.inventory.len()
            )));
        }
        if self.dungeon_level < 1 || self.player_level < 1 {
            return Err(SaveError::Corrupted("levels start at 1".into()));
        }

        let reserved = self.inventory.iter().map(|e| e.id).collect::<Vec<_>>();
        let world = World::from_parts(self.entities, player, stairs, reserved)
            .ok_or_else(|| SaveError::Corrupted("entity handles do not resolve".into()))?;

        let rng = RandomNumberGenerator::seeded(seed);
        let mut session = Session::from_parts(config, self.map, world, rng);
        session.inventory = self.inventory;
        session.log = self.log;
        session.state = self.state;
        session.dungeon_level = self.dungeon_level;
        session.player_level = self.player_level;
        session.pending_level_up = self.pending_level_up;
        session.visibility.mark_dirty();
        Ok(session)
    }
}

fn corrupted(reason: String) -> SaveError {
    SaveError::Corrupted(reason)
}

pub fn save_to_path(session: &Session, path: impl AsRef<Path>) -> Result<(), SaveError> {
    let path = path.as_ref();
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    serde_json::to_writer_pretty(writer, &Snapshot::capture(session))?;
    info!(path = %path.display(), depth = session.dungeon_level, "game saved");
    Ok(())
}

pub fn load_from_path(
    path: impl AsRef<Path>,
    config: GameConfig,
    seed: u64,
) -> Result<Session, SaveError> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let snapshot: Snapshot = serde_json::from_reader(BufReader::new(file))?;
    let session = snapshot.restore(config, seed)?;
    info!(path = %path.display(), depth = session.dungeon_level, "game loaded");
    Ok(session)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::items::ItemTemplate;
    use crate::ecs::components::ItemKind;
    use crate::session::test_support::*;

    fn played_session() -> Session {
        let mut session = Session::with_seed(GameConfig::default(), 5);
        let item = ItemTemplate::for_kind(ItemKind::Lightning).spawn(0, 0);
        let id = session.world.spawn(item);
        let item = session.world.remove(id).unwrap();
        session.inventory.push(item);
        session.refresh_visibility();
        session
    }

    #[test]
    fn save_and_load_resume_the_same_game() {
        let session = played_session();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("save.json");
        save_to_path(&session, &path).unwrap();

        let loaded = load_from_path(&path, GameConfig::default(), 9).unwrap();
        assert_eq!(loaded.map, session.map);
        assert_eq!(loaded.world.entities(), session.world.entities());
        assert_eq!(loaded.player_id(), session.player_id());
        assert_eq!(loaded.stairs().map(Entity::point), session.stairs().map(Entity::point));
        assert_eq!(loaded.inventory, session.inventory);
        assert_eq!(loaded.log, session.log);
        assert!(loaded.visibility.is_dirty());
    }

    #[test]
    fn ids_stay_unique_after_a_load() {
        let session = played_session();
        let snapshot = Snapshot::capture(&session);
        let mut loaded = snapshot.restore(GameConfig::default(), 1).unwrap();
        let held = loaded.inventory[0].id;
        let fresh = loaded.world.spawn(ItemTemplate::for_kind(ItemKind::Heal).spawn(1, 1));
        assert_ne!(fresh, held);
    }

    #[test]
    fn bad_player_index_is_fatal() {
        let mut snapshot = Snapshot::capture(&arena());
        snapshot.player_index = 40;
        assert!(matches!(
            snapshot.restore(GameConfig::default(), 1),
            Err(SaveError::Corrupted(_))
        ));
    }

    #[test]
    fn player_index_must_point_at_a_fighter() {
        let mut session = arena();
        session.world.spawn(ItemTemplate::for_kind(ItemKind::Heal).spawn(2, 2));
        let mut snapshot = Snapshot::capture(&session);
        snapshot.player_index = 1;
        assert!(snapshot.restore(GameConfig::default(), 1).is_err());
    }

    #[test]
    fn version_mismatch_is_reported() {
        let mut snapshot = Snapshot::capture(&arena());
        snapshot.header.version = 7;
        assert!(matches!(
            snapshot.restore(GameConfig::default(), 1),
            Err(SaveError::IncompatibleVersion { expected: 1, found: 7 })
        ));
    }

    #[test]
    fn garbage_file_does_not_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("save.json");
        std::fs::write(&path, "{\"header\": 3}").unwrap();
        assert!(matches!(
            load_from_path(&path, GameConfig::default(), 1),
            Err(SaveError::Serialization(_))
        ));
        assert!(matches!(
            load_from_path(dir.path().join("missing.json"), GameConfig::default(), 1),
            Err(SaveError::Io(_))
        ));
    }
}
