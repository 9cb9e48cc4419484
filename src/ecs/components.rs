use serde::{Deserialize, Serialize};

/// What happens when a fighter's hit points reach zero.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeathBehavior {
    /// Ends the game; the corpse stays in place.
    Player,
    /// Turns the entity into inert remains.
    Monster,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fighter {
    pub max_hp: i32,
    pub hp: i32,
    pub defense: i32,
    pub power: i32,
    /// Awarded to the player on death for monsters; accumulated for the player.
    pub xp: i32,
    pub death: DeathBehavior,
}

impl Fighter {
    pub fn new(hp: i32, defense: i32, power: i32, xp: i32, death: DeathBehavior) -> Self {
        Self {
            max_hp: hp,
            hp,
            defense,
            power,
            xp,
            death,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }

    pub fn is_hurt(&self) -> bool {
        self.hp < self.max_hp
    }

    /// Subtracts a positive amount. Returns true only on the transition from
    /// alive to dead, so a corpse never dies twice.
    pub fn apply_damage(&mut self, amount: i32) -> bool {
        let was_alive = self.is_alive();
        if amount > 0 {
            self.hp -= amount;
        }
        was_alive && !self.is_alive()
    }

    pub fn heal(&mut self, amount: i32) {
        self.hp = (self.hp + amount).min(self.max_hp);
    }
}

/// Monster behaviour. `Confused` owns the behaviour it replaced and hands it
/// back when the confusion wears off.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Ai {
    Basic,
    Confused { previous: Box<Ai>, turns_left: i32 },
}

impl Ai {
    /// Wraps this behaviour in confusion. Confusing an already confused
    /// monster restarts the count around the pre-confusion behaviour instead of
    /// nesting wrappers.
    pub fn confused(self, turns: i32) -> Ai {
        match self {
            Ai::Confused { previous, .. } => Ai::Confused {
                previous,
                turns_left: turns,
            },
            other => Ai::Confused {
                previous: Box::new(other),
                turns_left: turns,
            },
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemKind {
    Heal,
    Lightning,
    Confusion,
    Fireball,
}

/// Marks an entity as something that can be carried and used.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub kind: ItemKind,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn death_fires_only_on_the_killing_blow() {
        let mut fighter = Fighter::new(5, 0, 1, 10, DeathBehavior::Monster);
        assert!(!fighter.apply_damage(4));
        assert!(fighter.apply_damage(3));
        assert_eq!(fighter.hp, -2);
        assert!(!fighter.apply_damage(3));
    }

    #[test]
    fn non_positive_damage_changes_nothing() {
        let mut fighter = Fighter::new(5, 0, 1, 10, DeathBehavior::Monster);
        assert!(!fighter.apply_damage(0));
        assert!(!fighter.apply_damage(-4));
        assert_eq!(fighter.hp, 5);
    }

    #[test]
    fn heal_clamps_to_max() {
        let mut fighter = Fighter::new(30, 2, 5, 0, DeathBehavior::Player);
        fighter.hp = 28;
        fighter.heal(4);
        assert_eq!(fighter.hp, 30);
    }

    #[test]
    fn reconfusing_does_not_nest() {
        let once = Ai::Basic.confused(10);
        let twice = once.confused(3);
        assert_eq!(
            twice,
            Ai::Confused {
                previous: Box::new(Ai::Basic),
                turns_left: 3
            }
        );
    }
}
