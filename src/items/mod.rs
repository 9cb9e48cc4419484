//! Pickup, drop and use of items, and the effects they cast.

pub mod targeting;

use tracing::debug;

use crate::data::palette;
use crate::ecs::{EntityId, components::ItemKind};
use crate::error::{ActionError, ActionResult};
use crate::session::{INVENTORY_CAPACITY, Session};

use self::targeting::{TargetKind, TargetRequest, Targeting};

impl ItemKind {
    /// The target an effect asks for, if any. Lightning aims itself.
    pub fn target_request(&self, config: &crate::config::ItemConfig) -> Option<TargetRequest> {
        match self {
            ItemKind::Confusion => Some(TargetRequest {
                kind: TargetKind::Entity,
                max_range: Some(config.confuse_range),
            }),
            ItemKind::Fireball => Some(TargetRequest {
                kind: TargetKind::Tile,
                max_range: None,
            }),
            ItemKind::Heal | ItemKind::Lightning => None,
        }
    }
}

impl Session {
    /// Moves an item from the world into the inventory.
    pub fn pick_up(&mut self, id: EntityId) -> ActionResult<()> {
        let name = match self.world.get(id) {
            Some(entity) if entity.item.is_some() => entity.name.clone(),
            _ => return Err(ActionError::NoItemHere),
        };
        if self.inventory.len() >= INVENTORY_CAPACITY {
            let err = ActionError::InventoryFull(name);
            self.message(err.to_string(), palette::RED);
            return Err(err);
        }
        let item = self.world.remove(id).ok_or(ActionError::NoItemHere)?;
        self.inventory.push(item);
        self.message(format!("You picked up a {name}!"), palette::GREEN);
        Ok(())
    }

    /// Picks up the first item, in sequence order, under the player.
    pub fn pick_up_here(&mut self) -> ActionResult<()> {
        let here = self.player_point();
        let id = self
            .world
            .iter()
            .find(|e| e.item.is_some() && e.is_at(here))
            .map(|e| e.id)
            .ok_or(ActionError::NoItemHere)?;
        self.pick_up(id)
    }

    /// Puts an inventory item down under the player, behind the live
    /// entities.
    pub fn drop_item(&mut self, slot: usize) -> ActionResult<()> {
        if slot >= self.inventory.len() {
            return Err(ActionError::EmptySlot(slot));
        }
        let mut item = self.inventory.remove(slot);
        let here = self.player_point();
        item.x = here.x;
        item.y = here.y;
        let id = item.id;
        let name = item.name.clone();
        self.world.insert(item);
        self.world.send_to_back(id);
        self.message(format!("You dropped a {name}."), palette::YELLOW);
        Ok(())
    }

    /// Casts the item in `slot`. A cancelled or failed cast leaves the item
    /// in the inventory; a resolved one uses it up.
    pub fn use_item(&mut self, slot: usize, targeting: &mut dyn Targeting) -> ActionResult<()> {
        let Some(entity) = self.inventory.get(slot) else {
            return Err(ActionError::EmptySlot(slot));
        };
        let Some(item) = entity.item else {
            let name = entity.name.clone();
            self.message(format!("The {name} cannot be used."), palette::WHITE);
            return Err(ActionError::Cancelled);
        };

        match self.cast(item.kind, targeting) {
            Ok(()) => {
                let used = self.inventory.remove(slot);
                debug!(item = %used.name, "item used");
                Ok(())
            }
            Err(err) => {
                if !err.is_cancellation() {
                    self.message(err.to_string(), palette::RED);
                }
                Err(err)
            }
        }
    }

    fn cast(&mut self, kind: ItemKind, targeting: &mut dyn Targeting) -> ActionResult<()> {
        match kind {
            ItemKind::Heal => self.cast_heal(),
            ItemKind::Lightning => self.cast_lightning(),
            ItemKind::Confusion => self.cast_confuse(targeting),
            ItemKind::Fireball => self.cast_fireball(targeting),
        }
    }

    fn cast_heal(&mut self) -> ActionResult<()> {
        let fighter = self.player_fighter().ok_or(ActionError::NoValidTarget)?;
        if !fighter.is_hurt() {
            return Err(ActionError::FullHealth);
        }
        self.message("Your wounds start to feel better!", palette::LIGHT_VIOLET);
        let player = self.player_id();
        let amount = self.config.items.heal_amount;
        self.heal(player, amount);
        Ok(())
    }

    /// Strikes the nearest visible monster in range, ignoring its defense.
    fn cast_lightning(&mut self) -> ActionResult<()> {
        let range = self.config.items.lightning_range;
        let target = self.closest_monster(range).ok_or(ActionError::NoValidTarget)?;
        let damage = self.config.items.lightning_damage;
        let name = self.world.get(target).map(|e| e.name.clone()).unwrap_or_default();
        self.message(
            format!(
                "A lightning bolt strikes the {name} with a loud thunder! \
                 The damage is {damage} hit points."
            ),
            palette::LIGHT_BLUE,
        );
        self.take_damage(target, damage);
        Ok(())
    }

    fn cast_confuse(&mut self, targeting: &mut dyn Targeting) -> ActionResult<()> {
        let range = self.config.items.confuse_range;
        self.message(
            "Pick an enemy to confuse it, or cancel.",
            palette::LIGHT_CYAN,
        );
        let target = targeting.pick_entity(self, Some(range))?;
        let turns = self.config.items.confuse_turns;
        let monster = self.world.get_mut(target).ok_or(ActionError::NoValidTarget)?;
        let Some(ai) = monster.ai.take() else {
            return Err(ActionError::NoValidTarget);
        };
        monster.ai = Some(ai.confused(turns));
        let name = monster.name.clone();
        self.message(
            format!("The eyes of the {name} look vacant, as it starts to stumble around!"),
            palette::LIGHT_GREEN,
        );
        Ok(())
    }

    /// Burns every fighter within the radius of the picked tile, the caster
    /// included.
    fn cast_fireball(&mut self, targeting: &mut dyn Targeting) -> ActionResult<()> {
        self.message(
            "Pick a target tile for the fireball, or cancel.",
            palette::LIGHT_CYAN,
        );
        let impact = targeting.pick_tile(self, None)?;
        let radius = self.config.items.fireball_radius;
        let damage = self.config.items.fireball_damage;
        self.message(
            format!("The fireball explodes, burning everything within {radius} tiles!"),
            palette::ORANGE,
        );
        let victims: Vec<(EntityId, String)> = self
            .world
            .iter()
            .filter(|e| e.fighter.is_some() && e.distance(impact) <= radius)
            .map(|e| (e.id, e.name.clone()))
            .collect();
        for (id, name) in victims {
            self.message(
                format!("The {name} gets burned for {damage} hit points."),
                palette::ORANGE,
            );
            self.take_damage(id, damage);
        }
        Ok(())
    }
}
