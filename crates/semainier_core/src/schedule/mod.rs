//! Pure scheduling engine: week bounds, daily time grid, WIP accounting.
//!
//! # Responsibility
//! - Provide side-effect-free calendar and capacity computations over
//!   caller-supplied inputs.
//!
//! # Invariants
//! - No module here reads the clock, touches storage or holds mutable state;
//!   everything is safe to call concurrently.

pub mod grid;
pub mod week;
pub mod wip;
