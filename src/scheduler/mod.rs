//! Action scheduler — walks the avatar along a path and then sweeps an action
//! over a queue of tiles, one tile per tick.
//!
//! The state is a single enum, so walking and running can never be active at
//! the same time. `tick` is called by the driver on its own cadence; each call
//! commits at most one tile and returns what happened.

use std::collections::VecDeque;

use bevy::prelude::*;

use crate::data::CropTable;
use crate::economy::Inventory;
use crate::farming::{apply_farming_action, ActionContext};
use crate::shared::*;
use crate::world::GridWorld;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SchedulerError {
    #[error("scheduler is busy; cancel before starting new work")]
    Busy,
    #[error("nothing to schedule")]
    Empty,
}

/// An auto-action in progress: the remaining tiles plus running totals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingRun {
    pub action: FarmAction,
    pub tiles: VecDeque<TilePos>,
    pub applied: u32,
    pub skipped: u32,
}

impl PendingRun {
    pub fn new(action: FarmAction, tiles: impl IntoIterator<Item = TilePos>) -> Self {
        Self {
            action,
            tiles: tiles.into_iter().collect(),
            applied: 0,
            skipped: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SchedulerState {
    #[default]
    Idle,
    Walking {
        path: VecDeque<TilePos>,
        /// Run to start once the path is exhausted.
        pending_run: Option<PendingRun>,
    },
    Running(PendingRun),
}

/// Which interval the driver should wait before the next tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickCadence {
    Walk,
    Run,
}

/// Borrowed session state a tick works on.
pub struct SchedulerEnv<'a> {
    pub grid: &'a mut GridWorld,
    pub avatar: &'a mut Avatar,
    pub inventory: &'a mut Inventory,
    pub season: &'a SeasonRule,
    pub crops: &'a CropTable,
    pub selected_crop: CropKind,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActionScheduler {
    state: SchedulerState,
}

impl ActionScheduler {
    pub fn state(&self) -> &SchedulerState {
        &self.state
    }

    pub fn is_idle(&self) -> bool {
        matches!(self.state, SchedulerState::Idle)
    }

    pub fn is_walking(&self) -> bool {
        matches!(self.state, SchedulerState::Walking { .. })
    }

    pub fn is_running(&self) -> bool {
        matches!(self.state, SchedulerState::Running(_))
    }

    pub fn cadence(&self) -> Option<TickCadence> {
        match self.state {
            SchedulerState::Idle => None,
            SchedulerState::Walking { .. } => Some(TickCadence::Walk),
            SchedulerState::Running(_) => Some(TickCadence::Run),
        }
    }

    pub fn begin_walk(
        &mut self,
        path: Vec<TilePos>,
        pending_run: Option<PendingRun>,
    ) -> Result<(), SchedulerError> {
        if !self.is_idle() {
            return Err(SchedulerError::Busy);
        }
        if path.is_empty() || pending_run.as_ref().is_some_and(|run| run.tiles.is_empty()) {
            return Err(SchedulerError::Empty);
        }
        self.state = SchedulerState::Walking {
            path: path.into(),
            pending_run,
        };
        Ok(())
    }

    pub fn begin_run(&mut self, run: PendingRun) -> Result<(), SchedulerError> {
        if !self.is_idle() {
            return Err(SchedulerError::Busy);
        }
        if run.tiles.is_empty() {
            return Err(SchedulerError::Empty);
        }
        self.state = SchedulerState::Running(run);
        Ok(())
    }

    /// Drop any walk or run. Returns whether there was anything to drop.
    pub fn cancel(&mut self) -> bool {
        let was_active = !self.is_idle();
        self.state = SchedulerState::Idle;
        was_active
    }

    pub fn tick(&mut self, env: SchedulerEnv<'_>) -> Vec<FarmOutcome> {
        match std::mem::take(&mut self.state) {
            SchedulerState::Idle => Vec::new(),
            SchedulerState::Walking { path, pending_run } => self.walk_step(path, pending_run, env),
            SchedulerState::Running(run) => self.run_step(run, env),
        }
    }

    fn walk_step(
        &mut self,
        mut path: VecDeque<TilePos>,
        pending_run: Option<PendingRun>,
        env: SchedulerEnv<'_>,
    ) -> Vec<FarmOutcome> {
        let mut outcomes = Vec::new();
        let target = path.back().copied();
        let Some(next) = path.pop_front() else {
            return outcomes;
        };

        if !env.grid.is_walkable(next) {
            warn!("[Scheduler] Path blocked at {next}; stopping");
            outcomes.push(FarmOutcome::PathUnreachable {
                target: target.unwrap_or(next),
            });
            return outcomes;
        }

        let from = env.avatar.position;
        if let Some(facing) = Facing::from_delta(next.x - from.x, next.y - from.y) {
            env.avatar.facing = facing;
        }
        env.avatar.position = next;
        env.avatar.moving = true;
        outcomes.push(FarmOutcome::Moved {
            tile: next,
            facing: env.avatar.facing,
        });

        if !path.is_empty() {
            self.state = SchedulerState::Walking { path, pending_run };
            return outcomes;
        }

        match pending_run {
            Some(run) => {
                info!(
                    "[Scheduler] Arrived at {next}; {} {} tiles",
                    run.action.progressive(),
                    run.tiles.len()
                );
                self.state = SchedulerState::Running(run);
            }
            None => outcomes.push(FarmOutcome::Arrived { tile: next }),
        }
        outcomes
    }

    fn run_step(&mut self, mut run: PendingRun, env: SchedulerEnv<'_>) -> Vec<FarmOutcome> {
        let mut outcomes = Vec::new();

        if run.action == FarmAction::Plant && env.inventory.seeds(env.selected_crop) == 0 {
            let fallback = env.inventory.best_stocked_seed(env.crops);
            info!(
                "[Scheduler] Out of {:?} seeds after {} tiles; run stopped",
                env.selected_crop, run.applied
            );
            outcomes.push(FarmOutcome::ResourceExhausted {
                action: run.action,
                crop: env.selected_crop,
                fallback,
            });
            return outcomes;
        }

        let Some(tile) = run.tiles.pop_front() else {
            return outcomes;
        };

        if env.avatar.position != tile {
            env.avatar.position = tile;
            env.avatar.moving = true;
            outcomes.push(FarmOutcome::Moved {
                tile,
                facing: env.avatar.facing,
            });
        }

        let mut ctx = ActionContext {
            season: env.season,
            crops: env.crops,
            selected_crop: env.selected_crop,
            inventory: env.inventory,
        };
        match apply_farming_action(env.grid, run.action, tile, &mut ctx) {
            Ok(effect) => {
                run.applied += 1;
                outcomes.push(FarmOutcome::ActionApplied {
                    action: run.action,
                    tile,
                    result: Ok(effect),
                });
            }
            Err(reason) => {
                debug!("[Scheduler] Skipped {tile}: {reason}");
                run.skipped += 1;
            }
        }

        if run.tiles.is_empty() {
            info!(
                "[Scheduler] {} done: {} applied, {} skipped",
                run.action.progressive(),
                run.applied,
                run.skipped
            );
            outcomes.push(FarmOutcome::RunCompleted {
                action: run.action,
                applied: run.applied,
                skipped: run.skipped,
            });
        } else {
            self.state = SchedulerState::Running(run);
        }
        outcomes
    }
}
