//! isofarm library crate: the farm action scheduler core.
//!
//! The binary crate (`main.rs`) runs a scripted headless season on top of
//! these modules. `tests/` integration tests import the same types and
//! plugins without needing a window or GPU.

pub mod shared;
pub mod data;
pub mod world;
pub mod navigation;
pub mod farming;
pub mod economy;
pub mod calendar;
pub mod scheduler;
pub mod session;
