//! Collaborator seams of the tick loop.
//!
//! The battle never looks at geometry or devices itself. Hosts plug in an
//! [`OverlapProvider`] (what touched what since the last tick) and
//! optionally an [`InputPolicy`] (what the player does this tick).
use combat_core::{Battle, Overlap};

/// Spatial collaborator: reports overlaps for the coming tick.
pub trait OverlapProvider: Send {
    /// Appends every overlap in the battle's current layout to `out`.
    fn collect(&mut self, battle: &Battle, out: &mut Vec<Overlap>);
}

/// Input collaborator: issues player commands before each tick.
pub trait InputPolicy: Send {
    fn drive(&mut self, battle: &mut Battle);
}

/// Policy that never acts. The party still auto-fires.
pub struct NoInput;

impl InputPolicy for NoInput {
    fn drive(&mut self, _battle: &mut Battle) {}
}
