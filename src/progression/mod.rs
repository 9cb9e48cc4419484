//! Experience thresholds and the level-up choice.

use tracing::info;

use crate::config::ProgressionConfig;
use crate::data::palette;
use crate::error::{ActionError, ActionResult};
use crate::session::Session;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LevelUpChoice {
    Constitution,
    Strength,
    Agility,
}

impl LevelUpChoice {
    pub const ALL: [LevelUpChoice; 3] = [
        LevelUpChoice::Constitution,
        LevelUpChoice::Strength,
        LevelUpChoice::Agility,
    ];

    pub fn from_index(index: usize) -> ActionResult<Self> {
        Self::ALL
            .get(index)
            .copied()
            .ok_or(ActionError::InvalidMenuChoice)
    }

    /// Menu text showing the stat the choice improves.
    pub fn label(&self, session: &Session) -> String {
        let fighter = session.player_fighter();
        match self {
            LevelUpChoice::Constitution => format!(
                "Constitution (+{} HP, from {})",
                session.config.progression.constitution_bonus,
                fighter.map_or(0, |f| f.max_hp)
            ),
            LevelUpChoice::Strength => {
                format!("Strength (+1 attack, from {})", fighter.map_or(0, |f| f.power))
            }
            LevelUpChoice::Agility => {
                format!("Agility (+1 defense, from {})", fighter.map_or(0, |f| f.defense))
            }
        }
    }
}

/// Experience needed to leave `level`.
pub fn threshold(config: &ProgressionConfig, level: i32) -> i32 {
    config.base + level * config.factor
}

impl Session {
    pub fn xp_to_next_level(&self) -> i32 {
        threshold(&self.config.progression, self.player_level)
    }

    /// Promotes the player when enough experience has piled up. The
    /// remainder carries over. Returns whether a choice is now owed.
    pub fn check_level_up(&mut self) -> bool {
        if self.pending_level_up {
            return true;
        }
        let needed = self.xp_to_next_level();
        let Some(fighter) = self.player_fighter_mut() else {
            return false;
        };
        if fighter.xp < needed {
            return false;
        }
        fighter.xp -= needed;
        self.player_level += 1;
        self.pending_level_up = true;
        let level = self.player_level;
        self.message(
            format!("Your battle skills grow stronger! You reached level {level}!"),
            palette::YELLOW,
        );
        info!(level, "player levelled up");
        true
    }

    pub fn pending_level_up(&self) -> bool {
        self.pending_level_up
    }

    /// Settles the owed level-up. Does not take a world turn.
    pub fn apply_level_up(&mut self, choice: LevelUpChoice) -> ActionResult<()> {
        if !self.pending_level_up {
            return Err(ActionError::InvalidMenuChoice);
        }
        let bonus = self.config.progression.constitution_bonus;
        let fighter = self.player_fighter_mut().ok_or(ActionError::InvalidMenuChoice)?;
        match choice {
            LevelUpChoice::Constitution => {
                fighter.max_hp += bonus;
                fighter.hp += bonus;
            }
            LevelUpChoice::Strength => fighter.power += 1,
            LevelUpChoice::Agility => fighter.defense += 1,
        }
        self.pending_level_up = false;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::test_support::*;

    fn grant_xp(session: &mut Session, xp: i32) {
        if let Some(f) = session.player_fighter_mut() {
            f.xp = xp;
        }
    }

    #[test]
    fn threshold_grows_with_level() {
        let config = ProgressionConfig::default();
        assert_eq!(threshold(&config, 1), 350);
        assert_eq!(threshold(&config, 2), 500);
    }

    #[test]
    fn exact_threshold_levels_up_and_zeroes_xp() {
        let mut session = arena();
        grant_xp(&mut session, 350);
        assert!(session.check_level_up());
        assert_eq!(session.player_level, 2);
        assert_eq!(session.player_fighter().unwrap().xp, 0);
        assert!(session.log.contains("You reached level 2!"));
    }

    #[test]
    fn one_short_of_threshold_does_nothing() {
        let mut session = arena();
        grant_xp(&mut session, 349);
        assert!(!session.check_level_up());
        assert_eq!(session.player_level, 1);
        assert_eq!(session.player_fighter().unwrap().xp, 349);
    }

    #[test]
    fn remainder_carries_forward() {
        let mut session = arena();
        grant_xp(&mut session, 400);
        session.check_level_up();
        assert_eq!(session.player_fighter().unwrap().xp, 50);
    }

    #[test]
    fn choice_is_owed_until_applied() {
        let mut session = arena();
        grant_xp(&mut session, 1000);
        assert!(session.check_level_up());
        // A second check waits for the choice instead of stacking levels.
        assert!(session.check_level_up());
        assert_eq!(session.player_level, 2);

        session.apply_level_up(LevelUpChoice::Constitution).unwrap();
        let fighter = session.player_fighter().unwrap();
        assert_eq!((fighter.max_hp, fighter.hp), (50, 50));
        assert!(!session.pending_level_up());
        assert_eq!(
            session.apply_level_up(LevelUpChoice::Strength),
            Err(ActionError::InvalidMenuChoice)
        );

        // 650 xp left is enough for level 3.
        assert!(session.check_level_up());
        session.apply_level_up(LevelUpChoice::Agility).unwrap();
        assert_eq!(session.player_fighter().unwrap().defense, 3);
    }

    #[test]
    fn choices_map_from_menu_indices() {
        assert_eq!(LevelUpChoice::from_index(1), Ok(LevelUpChoice::Strength));
        assert_eq!(LevelUpChoice::from_index(3), Err(ActionError::InvalidMenuChoice));
    }
}
