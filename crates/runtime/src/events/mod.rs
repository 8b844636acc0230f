//! Topic-based event bus for combat events.
//!
//! Events are published to specific topics, and consumers subscribe only to
//! the topics they need (a HUD to party and boss, a logger to everything).

mod bus;

pub use bus::{Event, EventBus, Topic};
