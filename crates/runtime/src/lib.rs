//! Headless driver for a [`combat_core::Battle`].
//!
//! The core simulation owns no clock, performs no spatial queries and reads
//! no input. This crate supplies those collaborators and fans the resulting
//! combat events out to subscribers.
//!
//! Modules are organized by responsibility:
//! - [`runtime`] hosts the tick loop and its builder
//! - [`api`] exposes the seams hosts plug into (overlaps, input) and errors
//! - [`providers`] holds the reference implementations of those seams
//! - [`events`] provides the topic-based event bus
pub mod api;
pub mod events;
pub mod providers;
pub mod runtime;

pub use api::{InputPolicy, NoInput, OverlapProvider, Result, RuntimeError};
pub use events::{Event, EventBus, Topic};
pub use providers::{Autopilot, BodyRadii, RadiusOverlapProvider};
pub use runtime::{BattleRuntime, BattleRuntimeBuilder, RuntimeConfig};
