use bracket_geometry::prelude::Point;

use crate::config::TargetingMode;
use crate::ecs::EntityId;
use crate::error::{ActionError, ActionResult};
use crate::session::Session;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TargetKind {
    Tile,
    Entity,
}

/// What an effect needs from the targeting collaborator before it can
/// resolve.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TargetRequest {
    pub kind: TargetKind,
    pub max_range: Option<f32>,
}

/// Resolves the target of an item effect. Effects do not know whether the
/// answer was chosen by a person or picked automatically.
pub trait Targeting {
    /// A visible tile within `max_range`, or `Cancelled` if the user backed
    /// out.
    fn pick_tile(&mut self, session: &Session, max_range: Option<f32>) -> ActionResult<Point>;

    /// A monster within `max_range`. By default, the monster standing on
    /// the picked tile.
    fn pick_entity(&mut self, session: &Session, max_range: Option<f32>) -> ActionResult<EntityId> {
        let tile = self.pick_tile(session, max_range)?;
        session.monster_at(tile).ok_or(ActionError::NoValidTarget)
    }
}

/// Checks an explicit pick: `None` is a cancel, a tile out of view or range
/// is no target at all.
pub fn validate_pick(
    session: &Session,
    pick: Option<Point>,
    max_range: Option<f32>,
) -> ActionResult<Point> {
    let tile = pick.ok_or(ActionError::Cancelled)?;
    if session.is_targetable(tile, max_range) {
        Ok(tile)
    } else {
        Err(ActionError::NoValidTarget)
    }
}

/// Chooses the nearest visible monster in range. Without a range, any
/// distance will do.
#[derive(Clone, Copy, Debug, Default)]
pub struct AutoTarget;

impl Targeting for AutoTarget {
    fn pick_tile(&mut self, session: &Session, max_range: Option<f32>) -> ActionResult<Point> {
        let id = self.pick_entity(session, max_range)?;
        session
            .world
            .get(id)
            .map(|e| e.point())
            .ok_or(ActionError::NoValidTarget)
    }

    fn pick_entity(&mut self, session: &Session, max_range: Option<f32>) -> ActionResult<EntityId> {
        session
            .closest_monster(max_range.unwrap_or(f32::MAX / 2.0))
            .ok_or(ActionError::NoValidTarget)
    }
}

/// A single tile chosen by the input source ahead of time, e.g. by a mouse
/// click. `None` means the user cancelled.
#[derive(Clone, Copy, Debug, Default)]
pub struct ExplicitTarget {
    pick: Option<Point>,
}

impl ExplicitTarget {
    pub fn at(point: Point) -> Self {
        Self { pick: Some(point) }
    }

    pub fn cancelled() -> Self {
        Self { pick: None }
    }
}

impl Targeting for ExplicitTarget {
    fn pick_tile(&mut self, session: &Session, max_range: Option<f32>) -> ActionResult<Point> {
        validate_pick(session, self.pick.take(), max_range)
    }
}

/// Picks the strategy configured for the session when the input source has
/// nothing explicit to offer.
pub fn for_mode(mode: TargetingMode) -> Box<dyn Targeting> {
    match mode {
        TargetingMode::Auto => Box::new(AutoTarget),
        TargetingMode::Explicit => Box::new(ExplicitTarget::cancelled()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::test_support::*;

    #[test]
    fn auto_target_picks_nearest() {
        let mut session = arena();
        spawn_orc(&mut session, 10, 5);
        let near = spawn_orc(&mut session, 7, 6);
        assert_eq!(AutoTarget.pick_entity(&session, Some(8.0)), Ok(near));
        assert_eq!(AutoTarget.pick_tile(&session, Some(8.0)), Ok(Point::new(7, 6)));
        assert_eq!(AutoTarget.pick_entity(&session, Some(1.0)), Err(ActionError::NoValidTarget));
    }

    #[test]
    fn explicit_target_validates_range_and_occupant() {
        let mut session = arena();
        let orc = spawn_orc(&mut session, 8, 5);
        assert_eq!(ExplicitTarget::at(Point::new(8, 5)).pick_entity(&session, Some(8.0)), Ok(orc));
        assert_eq!(
            ExplicitTarget::at(Point::new(8, 5)).pick_entity(&session, Some(2.0)),
            Err(ActionError::NoValidTarget)
        );
        assert_eq!(
            ExplicitTarget::at(Point::new(9, 9)).pick_entity(&session, None),
            Err(ActionError::NoValidTarget)
        );
        assert_eq!(
            ExplicitTarget::cancelled().pick_tile(&session, None),
            Err(ActionError::Cancelled)
        );
    }

    #[test]
    fn explicit_pick_is_used_once() {
        let session = arena();
        let mut target = ExplicitTarget::at(Point::new(6, 6));
        assert!(target.pick_tile(&session, None).is_ok());
        assert_eq!(target.pick_tile(&session, None), Err(ActionError::Cancelled));
    }
}
