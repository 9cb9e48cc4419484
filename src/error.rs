//! Error types for the simulation core and its collaborators.

use thiserror::Error;

/// Non-fatal failures of a player action. Each one becomes a log line and
/// none of them consume an item or a turn.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActionError {
    #[error("Your inventory is full, cannot pick up {0}.")]
    InventoryFull(String),

    #[error("There is nothing here to pick up.")]
    NoItemHere,

    #[error("You are already at full health.")]
    FullHealth,

    #[error("There is no valid target in range.")]
    NoValidTarget,

    #[error("Cancelled.")]
    Cancelled,

    #[error("That is not a valid choice.")]
    InvalidMenuChoice,

    #[error("There are no stairs here.")]
    NotOnStairs,

    #[error("Inventory slot {0} is empty.")]
    EmptySlot(usize),
}

impl ActionError {
    /// True when the user backed out rather than the action failing.
    pub fn is_cancellation(&self) -> bool {
        matches!(self, ActionError::Cancelled | ActionError::InvalidMenuChoice)
    }
}

pub type ActionResult<T> = Result<T, ActionError>;

/// Snapshot persistence errors. All of them abort a load.
#[derive(Debug, Error)]
pub enum SaveError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Save file corrupted: {0}")]
    Corrupted(String),

    #[error("Incompatible save version: expected {expected}, found {found}")]
    IncompatibleVersion { expected: u32, found: u32 },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Could not read config '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MenuError {
    #[error("Cannot have a menu with more than {max} options (got {count}).")]
    TooManyOptions { count: usize, max: usize },
}

#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },
}
