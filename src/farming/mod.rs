//! Farming domain — per-tile action rules and the selection sweep.
//!
//! Pure functions over the grid and inventory; the session decides when they
//! run and the scheduler decides where.

mod actions;
mod sweep;

pub use actions::{apply_farming_action, harvest_yield, ActionContext, BASE_YIELD, FED_YIELD};
pub use sweep::sweep;
