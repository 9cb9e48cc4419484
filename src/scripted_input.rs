//! A headless input source that replays a command script.
//!
//! One command per line; blank lines and `#` comments are skipped:
//!
//! ```text
//! n | s | e | w | ne | nw | se | sw   move (or attack) one step
//! wait                                stand still for a turn
//! pickup                              pick up what lies here
//! use N | drop N                      inventory slot N, from 0
//! descend                             take the stairs
//! target X Y | target cancel          answer the next target request
//! choose N                            answer the next level-up
//! quit
//! ```

use std::collections::VecDeque;
use std::fs;
use std::path::Path;

use bracket_geometry::prelude::Point;
use tracing::{debug, warn};

use crate::error::{ActionResult, ScriptError};
use crate::items::targeting::{Targeting, validate_pick};
use crate::session::Session;
use crate::turn::{Frame, InputSource, Intent};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Command {
    Act(Intent),
    Target(Option<Point>),
    Choose(usize),
}

#[derive(Debug, Default)]
pub struct ScriptedInput {
    intents: VecDeque<Intent>,
    targets: VecDeque<Option<Point>>,
    choices: VecDeque<usize>,
}

impl ScriptedInput {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ScriptError> {
        let text = fs::read_to_string(path)?;
        Self::parse(&text)
    }

    pub fn parse(text: &str) -> Result<Self, ScriptError> {
        let mut input = Self::default();
        for (number, line) in text.lines().enumerate() {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            match parse_command(trimmed).map_err(|message| ScriptError::Parse {
                line: number + 1,
                message,
            })? {
                Command::Act(intent) => input.intents.push_back(intent),
                Command::Target(pick) => input.targets.push_back(pick),
                Command::Choose(index) => input.choices.push_back(index),
            }
        }
        debug!(
            intents = input.intents.len(),
            targets = input.targets.len(),
            "script loaded"
        );
        Ok(input)
    }

    pub fn remaining(&self) -> usize {
        self.intents.len()
    }
}

fn parse_command(line: &str) -> Result<Command, String> {
    let mut words = line.split_whitespace();
    let head = words.next().unwrap_or_default().to_ascii_lowercase();
    let args: Vec<&str> = words.collect();
    let step =
        |dx: i32, dy: i32| -> Result<Command, String> { Ok(Command::Act(Intent::Move { dx, dy })) };
    match (head.as_str(), args.as_slice()) {
        ("n", []) => step(0, -1),
        ("s", []) => step(0, 1),
        ("e", []) => step(1, 0),
        ("w", []) => step(-1, 0),
        ("ne", []) => step(1, -1),
        ("nw", []) => step(-1, -1),
        ("se", []) => step(1, 1),
        ("sw", []) => step(-1, 1),
        ("wait", []) => Ok(Command::Act(Intent::Wait)),
        ("pickup", []) => Ok(Command::Act(Intent::PickUp)),
        ("descend", []) => Ok(Command::Act(Intent::DescendStairs)),
        ("quit", []) => Ok(Command::Act(Intent::Quit)),
        ("use", [slot]) => Ok(Command::Act(Intent::UseItem(number(slot)?))),
        ("drop", [slot]) => Ok(Command::Act(Intent::DropItem(number(slot)?))),
        ("choose", [index]) => Ok(Command::Choose(number(index)?)),
        ("target", ["cancel"]) => Ok(Command::Target(None)),
        ("target", [x, y]) => Ok(Command::Target(Some(Point::new(coordinate(x)?, coordinate(y)?)))),
        _ => Err(format!("unknown command '{line}'")),
    }
}

fn number(word: &str) -> Result<usize, String> {
    word.parse().map_err(|_| format!("expected a number, found '{word}'"))
}

fn coordinate(word: &str) -> Result<i32, String> {
    word.parse().map_err(|_| format!("expected a coordinate, found '{word}'"))
}

impl Targeting for ScriptedInput {
    /// An exhausted target queue counts as a cancel.
    fn pick_tile(&mut self, session: &Session, max_range: Option<f32>) -> ActionResult<Point> {
        let pick = self.targets.pop_front().flatten();
        validate_pick(session, pick, max_range)
    }
}

impl InputSource for ScriptedInput {
    fn next_intent(&mut self, _frame: &Frame) -> Option<Intent> {
        self.intents.pop_front()
    }

    fn choose_level_up(&mut self, _frame: &Frame) -> Option<usize> {
        let choice = self.choices.pop_front();
        if choice.is_none() {
            warn!("script has no answer for a level-up");
        }
        choice
    }

    fn targeting(&mut self) -> &mut dyn Targeting {
        self
    }
}
