//! Selection sweep: turns a dragged rectangle into a serpentine visiting order.

use crate::shared::*;
use crate::world::GridWorld;

/// Farmland tiles of the rectangle spanned by `start` (where the drag began)
/// and `end` (where it was released), in boustrophedon order.
///
/// Rows run top-to-bottom when `end` is at or below `start`, bottom-to-top
/// otherwise. The first row runs left-to-right when `end` is at or right of
/// `start`, and each following row flips. Row parity comes from the row's
/// index inside the rectangle, so rows with no farmland still flip it.
pub fn sweep(grid: &GridWorld, start: TilePos, end: TilePos) -> Vec<TilePos> {
    let (min_x, max_x) = (start.x.min(end.x), start.x.max(end.x));
    let (min_y, max_y) = (start.y.min(end.y), start.y.max(end.y));
    let from_left = start.x <= end.x;
    let from_top = start.y <= end.y;

    let rows: Box<dyn Iterator<Item = i32>> = if from_top {
        Box::new(min_y..=max_y)
    } else {
        Box::new((min_y..=max_y).rev())
    };

    let mut order = Vec::new();
    for (row_index, y) in rows.enumerate() {
        let going_right = (row_index % 2 == 0) == from_left;
        let columns: Box<dyn Iterator<Item = i32>> = if going_right {
            Box::new(min_x..=max_x)
        } else {
            Box::new((min_x..=max_x).rev())
        };
        order.extend(
            columns
                .map(|x| TilePos::new(x, y))
                .filter(|tile| grid.is_farmland(*tile)),
        );
    }
    order
}
