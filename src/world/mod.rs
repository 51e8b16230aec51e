//! World domain — the tile grid the farm lives on.

mod grid;

pub use grid::{FieldRect, GridWorld};
