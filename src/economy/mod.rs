//! Economy domain — seed stock, produce and gold.
//!
//! The shop screen itself is a presentation concern; this module only owns
//! the arithmetic: buying seeds at the crop table's price and selling
//! harvested produce one unit at a time.

mod gold;
mod inventory;

pub use gold::format_gold;
pub use inventory::{EconomyError, Inventory};
