//! A* routing across the tile grid.
//!
//! Movement is 4-connected with a uniform step cost of 1 and a Manhattan
//! heuristic. Neighbours are always expanded in the same order (up, down,
//! left, right), so an unchanged grid always yields the same path.

use pathfinding::prelude::astar;

use crate::shared::*;
use crate::world::GridWorld;

/// The route from the avatar to a target, with "already there" and
/// "unreachable" told apart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    AlreadyThere,
    Steps(Vec<TilePos>),
    Unreachable,
}

/// Find a path from `start` to `goal`.
///
/// The returned tiles exclude `start` and end with `goal`. An empty path means
/// either "no steps needed" (`start == goal`) or "no path" (goal off the grid,
/// goal blocked, or no connection); use [`plan_route`] to tell them apart.
pub fn find_path(grid: &GridWorld, start: TilePos, goal: TilePos) -> Vec<TilePos> {
    if start == goal || !grid.is_walkable(goal) {
        return Vec::new();
    }

    let result = astar(
        &start,
        |tile| {
            tile.neighbors()
                .into_iter()
                .filter(move |n| grid.is_walkable(*n))
                .map(|n| (n, 1u32))
        },
        |tile| tile.manhattan(goal),
        |tile| *tile == goal,
    );

    match result {
        Some((path, _cost)) => path.into_iter().skip(1).collect(),
        None => Vec::new(),
    }
}

/// [`find_path`] with the walkability pre-check folded in.
pub fn plan_route(grid: &GridWorld, start: TilePos, goal: TilePos) -> Route {
    if !grid.is_walkable(goal) {
        return Route::Unreachable;
    }
    if start == goal {
        return Route::AlreadyThere;
    }
    let path = find_path(grid, start, goal);
    if path.is_empty() {
        Route::Unreachable
    } else {
        Route::Steps(path)
    }
}
