//! The turn scheduler: one player intent, then one pass of monster AI.

pub mod frame;

use bracket_geometry::prelude::Point;
use tracing::{debug, info, warn};

pub use self::frame::{EntityView, Frame, TileView};
use crate::data::palette;
use crate::error::{ActionError, ActionResult};
use crate::items::targeting::Targeting;
use crate::map::generator;
use crate::progression::LevelUpChoice;
use crate::session::Session;

/// Everything the player can ask for in one step of the loop.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Intent {
    Move { dx: i32, dy: i32 },
    Wait,
    PickUp,
    UseItem(usize),
    DropItem(usize),
    DescendStairs,
    Quit,
    /// Opening or browsing a menu. Never advances the world.
    MenuNavigation,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TurnOutcome {
    Consumed,
    NotConsumed,
    Quit,
}

/// Why [`run`] returned.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunEnd {
    Quit,
    InputClosed,
}

/// Consumer of per-iteration snapshots. Has no access to the session.
pub trait Renderer {
    fn render(&mut self, frame: &Frame);
}

/// Producer of intents. Every call may block until the user answers.
pub trait InputSource {
    /// The next intent, or `None` once the source has nothing more to say.
    fn next_intent(&mut self, frame: &Frame) -> Option<Intent>;

    /// Index into [`LevelUpChoice::ALL`], or `None` once the source is
    /// exhausted.
    fn choose_level_up(&mut self, frame: &Frame) -> Option<usize>;

    /// The collaborator that answers target requests of item effects.
    fn targeting(&mut self) -> &mut dyn Targeting;
}

impl Session {
    /// Resolves one intent. The AI pass runs only when the player's action
    /// took time; progression is evaluated afterwards either way.
    pub fn play_turn(&mut self, intent: Intent, targeting: &mut dyn Targeting) -> TurnOutcome {
        if !self.is_playing() {
            return match intent {
                Intent::Quit => TurnOutcome::Quit,
                _ => TurnOutcome::NotConsumed,
            };
        }

        let consumed = match intent {
            Intent::Quit => return TurnOutcome::Quit,
            Intent::MenuNavigation => false,
            Intent::Wait => true,
            Intent::Move { dx, dy } => self.player_move_or_attack(dx, dy),
            Intent::PickUp => {
                let result = self.pick_up_here();
                self.report(result)
            }
            Intent::UseItem(slot) => {
                let result = self.use_item(slot, targeting);
                self.report(result)
            }
            Intent::DropItem(slot) => {
                let result = self.drop_item(slot);
                self.report(result)
            }
            Intent::DescendStairs => {
                let result = self.descend();
                self.report(result)
            }
        };

        let outcome = if consumed {
            self.refresh_visibility();
            self.run_ai_phase();
            TurnOutcome::Consumed
        } else {
            TurnOutcome::NotConsumed
        };
        self.check_level_up();
        outcome
    }

    /// Logs failures the action itself left silent and reports whether the
    /// action went through.
    fn report(&mut self, result: ActionResult<()>) -> bool {
        match result {
            Ok(()) => true,
            Err(
                err @ (ActionError::NoItemHere
                | ActionError::NotOnStairs
                | ActionError::EmptySlot(_)),
            ) => {
                self.message(err.to_string(), palette::WHITE);
                false
            }
            Err(err) => {
                debug!(%err, "action not taken");
                false
            }
        }
    }

    /// Attacks a fighter in the way, otherwise steps. Returns whether
    /// anything happened.
    pub fn player_move_or_attack(&mut self, dx: i32, dy: i32) -> bool {
        let player = self.player_id();
        let here = self.player_point();
        let target = Point::new(here.x + dx, here.y + dy);
        let defender = self
            .world
            .iter()
            .find(|e| e.id != player && e.fighter.is_some() && e.is_at(target))
            .map(|e| e.id);
        match defender {
            Some(defender) => {
                self.attack(player, defender);
                true
            }
            None => self.move_entity(player, dx, dy),
        }
    }

    /// Goes down the stairs under the player: half a rest, then a freshly
    /// generated level one deeper. The inventory comes along.
    pub fn descend(&mut self) -> ActionResult<()> {
        if !self.player_on_stairs() {
            return Err(ActionError::NotOnStairs);
        }
        self.message(
            "You take a moment to rest, and recover your strength.",
            palette::LIGHT_VIOLET,
        );
        if let Some(fighter) = self.player_fighter_mut() {
            let amount = fighter.max_hp / 2;
            fighter.heal(amount);
        }
        self.message(
            "After a rare moment of peace, you descend deeper into the heart of the dungeon...",
            palette::RED,
        );
        self.dungeon_level += 1;
        let layout =
            generator::generate(self.dungeon_level, &self.config, &mut self.rng, &mut self.world);
        self.map = layout.map;
        self.rooms = layout.rooms;
        self.visibility.mark_dirty();
        info!(depth = self.dungeon_level, "descended");
        Ok(())
    }

    /// Recomputes the view if needed and captures it for the renderer.
    pub fn frame(&mut self) -> Frame {
        self.refresh_visibility();
        Frame::capture(self)
    }
}

/// Drives the session until the player quits or the input runs dry.
///
/// An owed level-up is settled before the next intent is read; an invalid
/// choice is ignored and asked again.
pub fn run(
    session: &mut Session,
    input: &mut dyn InputSource,
    renderer: &mut dyn Renderer,
) -> RunEnd {
    loop {
        // Leftover xp may already cover the next level.
        let owed = session.check_level_up();
        let frame = session.frame();
        renderer.render(&frame);

        if owed {
            let Some(index) = input.choose_level_up(&frame) else {
                return RunEnd::InputClosed;
            };
            let applied = LevelUpChoice::from_index(index).and_then(|c| session.apply_level_up(c));
            if let Err(err) = applied {
                warn!(%err, index, "level-up choice ignored");
            }
            continue;
        }

        let Some(intent) = input.next_intent(&frame) else {
            return RunEnd::InputClosed;
        };
        if session.play_turn(intent, input.targeting()) == TurnOutcome::Quit {
            return RunEnd::Quit;
        }
    }
}
