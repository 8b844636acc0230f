//! Public surface hosts implement or handle.

mod errors;
mod providers;

pub use errors::{Result, RuntimeError};
pub use providers::{InputPolicy, NoInput, OverlapProvider};
