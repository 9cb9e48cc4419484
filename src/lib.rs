//! Simulation core of Tombs of the Ancient Kings.
//!
//! All state lives in one [`Session`]. A front-end drives it through
//! [`turn::run`] (or [`Session::play_turn`] one intent at a time) and draws
//! the [`turn::Frame`] it hands back.

pub mod ai;
pub mod combat;
pub mod config;
pub mod data;
pub mod ecs;
pub mod error;
pub mod items;
pub mod map;
pub mod menu;
pub mod progression;
pub mod save;
pub mod scripted_input;
pub mod session;
pub mod turn;

pub use config::GameConfig;
pub use error::{ActionError, ActionResult, ConfigError, MenuError, SaveError, ScriptError};
pub use session::Session;
pub use turn::{Frame, InputSource, Intent, Renderer, RunEnd, TurnOutcome};
