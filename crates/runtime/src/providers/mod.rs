//! Reference implementations of the runtime seams.

mod autopilot;
mod overlap;

pub use autopilot::Autopilot;
pub use overlap::{BodyRadii, RadiusOverlapProvider};
