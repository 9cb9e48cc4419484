//! Lettered option menus. The option limit is checked when a menu is
//! built, before anything is drawn.

use crate::error::{ActionError, ActionResult, MenuError};
use crate::progression::LevelUpChoice;
use crate::session::Session;

/// One letter per option, `a` through `z`.
pub const MAX_OPTIONS: usize = 26;

pub const INVENTORY_WIDTH: i32 = 50;
pub const LEVEL_UP_WIDTH: i32 = 40;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Menu {
    pub header: String,
    pub options: Vec<String>,
    pub width: i32,
}

impl Menu {
    pub fn new<S: Into<String>>(
        header: S,
        options: Vec<String>,
        width: i32,
    ) -> Result<Self, MenuError> {
        if options.len() > MAX_OPTIONS {
            return Err(MenuError::TooManyOptions {
                count: options.len(),
                max: MAX_OPTIONS,
            });
        }
        Ok(Self {
            header: header.into(),
            options,
            width,
        })
    }

    /// A menu with only a header, dismissed by any key.
    pub fn message_box<S: Into<String>>(text: S, width: i32) -> Self {
        Self {
            header: text.into(),
            options: Vec::new(),
            width,
        }
    }

    /// Lines as drawn: `(a) first`, `(b) second`, ...
    pub fn lines(&self) -> Vec<String> {
        self.options
            .iter()
            .zip('a'..='z')
            .map(|(text, letter)| format!("({letter}) {text}"))
            .collect()
    }

    /// Maps a zero-based index (as a terminal reports a letter key) onto an
    /// option.
    pub fn select_index(&self, index: i32) -> ActionResult<usize> {
        usize::try_from(index)
            .ok()
            .filter(|&i| i < self.options.len())
            .ok_or(ActionError::InvalidMenuChoice)
    }

    pub fn select(&self, key: char) -> ActionResult<usize> {
        if !key.is_ascii_lowercase() {
            return Err(ActionError::InvalidMenuChoice);
        }
        self.select_index(key as i32 - 'a' as i32)
    }
}

/// The inventory listing. An empty inventory shows a single placeholder
/// option.
pub fn inventory_menu(session: &Session, header: &str) -> Result<Menu, MenuError> {
    let mut options = session.inventory_names();
    if options.is_empty() {
        options.push("Inventory is empty".to_string());
    }
    Menu::new(header, options, INVENTORY_WIDTH)
}

/// The inventory slot a menu index picks. The empty-inventory placeholder
/// picks nothing.
pub fn inventory_slot(session: &Session, menu: &Menu, index: i32) -> ActionResult<usize> {
    if session.inventory.is_empty() {
        return Err(ActionError::InvalidMenuChoice);
    }
    menu.select_index(index)
}

pub fn level_up_menu(session: &Session) -> Result<Menu, MenuError> {
    let options = LevelUpChoice::ALL.iter().map(|c| c.label(session)).collect();
    Menu::new("Level up! Choose a stat to raise:", options, LEVEL_UP_WIDTH)
}

pub fn main_menu() -> Menu {
    Menu {
        header: String::new(),
        options: vec![
            "Play a new game".to_string(),
            "Continue last game".to_string(),
            "Quit".to_string(),
        ],
        width: 24,
    }
}
