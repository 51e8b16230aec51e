//! `FarmSession`: the one owned context every command and tick goes through.

use bevy::prelude::*;

use crate::calendar::SeasonClock;
use crate::data::FarmConfig;
use crate::economy::{EconomyError, Inventory};
use crate::farming::{apply_farming_action, sweep, ActionContext};
use crate::navigation::{plan_route, Route};
use crate::scheduler::{ActionScheduler, PendingRun, SchedulerEnv, TickCadence};
use crate::shared::*;
use crate::world::GridWorld;

#[derive(Resource, Debug, Clone)]
pub struct FarmSession {
    config: FarmConfig,
    grid: GridWorld,
    avatar: Avatar,
    inventory: Inventory,
    clock: SeasonClock,
    scheduler: ActionScheduler,
    selected_crop: CropKind,
}

impl Default for FarmSession {
    fn default() -> Self {
        Self::new(FarmConfig::default())
    }
}

impl FarmSession {
    pub fn new(config: FarmConfig) -> Self {
        let selected_crop = config.crops.kinds().next().unwrap_or(CropKind::Wheat);
        Self {
            grid: GridWorld::from_config(&config),
            avatar: Avatar::spawn_at(config.spawn),
            inventory: Inventory::starting(&config),
            clock: SeasonClock::new(config.seasons.clone()),
            scheduler: ActionScheduler::default(),
            selected_crop,
            config,
        }
    }

    // ── queries ─────────────────────────────────────────────────────────

    pub fn config(&self) -> &FarmConfig {
        &self.config
    }

    pub fn grid(&self) -> &GridWorld {
        &self.grid
    }

    pub fn avatar(&self) -> &Avatar {
        &self.avatar
    }

    pub fn cell_at(&self, tile: TilePos) -> Option<&CellState> {
        self.grid.cell_at(tile)
    }

    pub fn current_season(&self) -> Season {
        self.clock.season()
    }

    pub fn day(&self) -> u32 {
        self.clock.day()
    }

    pub fn is_walk_active(&self) -> bool {
        self.scheduler.is_walking()
    }

    pub fn is_run_active(&self) -> bool {
        self.scheduler.is_running()
    }

    pub fn cadence(&self) -> Option<TickCadence> {
        self.scheduler.cadence()
    }

    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    pub fn selected_crop(&self) -> CropKind {
        self.selected_crop
    }

    // ── movement ────────────────────────────────────────────────────────

    /// Walk to `tile`. Replaces any pending walk or run. An unreachable target
    /// changes nothing.
    pub fn request_move_to(&mut self, tile: TilePos) -> Vec<FarmOutcome> {
        match plan_route(&self.grid, self.avatar.position, tile) {
            Route::Unreachable => vec![FarmOutcome::PathUnreachable { target: tile }],
            Route::AlreadyThere => {
                self.scheduler.cancel();
                Vec::new()
            }
            Route::Steps(path) => {
                self.scheduler.cancel();
                if let Err(err) = self.scheduler.begin_walk(path, None) {
                    warn!("[Scheduler] Could not start walk to {tile}: {err}");
                }
                Vec::new()
            }
        }
    }

    /// One direct step. Any walk or run is dropped first; the avatar always
    /// turns, and moves only onto a walkable tile.
    pub fn request_step(&mut self, facing: Facing) -> Vec<FarmOutcome> {
        self.scheduler.cancel();
        self.avatar.facing = facing;
        let target = self.avatar.position.step(facing);
        if self.grid.is_walkable(target) {
            self.avatar.position = target;
            self.avatar.moving = true;
            vec![FarmOutcome::Moved { tile: target, facing }]
        } else {
            vec![FarmOutcome::Turned { facing }]
        }
    }

    /// Presentation hook: the step animation has finished.
    pub fn settle_avatar(&mut self) {
        self.avatar.moving = false;
    }

    // ── actions ─────────────────────────────────────────────────────────

    /// Sweep `action` over the farmland between two drag corners, walking to
    /// the first tile if needed.
    pub fn request_action_over_selection(
        &mut self,
        action: FarmAction,
        corner_a: TilePos,
        corner_b: TilePos,
    ) -> Vec<FarmOutcome> {
        if !action.is_tile_action() {
            return vec![FarmOutcome::SelectionRejected {
                action,
                reason: ActionRejected::NotTileAction,
            }];
        }
        if !self.clock.current().allows(action) {
            info!(
                "[Farming] {:?} isn't allowed in {}",
                action,
                self.current_season().name()
            );
            return vec![FarmOutcome::SelectionRejected {
                action,
                reason: ActionRejected::WrongSeason,
            }];
        }

        let tiles = sweep(&self.grid, corner_a, corner_b);
        let Some(&first) = tiles.first() else {
            return Vec::new();
        };

        if action == FarmAction::Plant && self.inventory.seeds(self.selected_crop) == 0 {
            return vec![self.seed_exhausted(action)];
        }

        let run = PendingRun::new(action, tiles);
        match plan_route(&self.grid, self.avatar.position, first) {
            Route::Unreachable => vec![FarmOutcome::PathUnreachable { target: first }],
            Route::AlreadyThere => {
                self.scheduler.cancel();
                info!("[Scheduler] {} {} tiles", action.progressive(), run.tiles.len());
                if let Err(err) = self.scheduler.begin_run(run) {
                    warn!("[Scheduler] Could not start {action:?} run: {err}");
                }
                Vec::new()
            }
            Route::Steps(path) => {
                self.scheduler.cancel();
                info!(
                    "[Scheduler] Walking {} tiles to {first} before {} {} tiles",
                    path.len(),
                    action.progressive().to_lowercase(),
                    run.tiles.len()
                );
                if let Err(err) = self.scheduler.begin_walk(path, Some(run)) {
                    warn!("[Scheduler] Could not start {action:?} run: {err}");
                }
                Vec::new()
            }
        }
    }

    /// Apply `action` once on the avatar's tile. Doesn't touch the scheduler.
    pub fn request_action_at_current_tile(&mut self, action: FarmAction) -> Vec<FarmOutcome> {
        let tile = self.avatar.position;
        let mut ctx = ActionContext {
            season: self.clock.current(),
            crops: &self.config.crops,
            selected_crop: self.selected_crop,
            inventory: &mut self.inventory,
        };
        let result = apply_farming_action(&mut self.grid, action, tile, &mut ctx);
        match &result {
            Ok(effect) => info!("[Farming] {action:?} at {tile}: {effect:?}"),
            Err(reason) => info!("[Farming] {action:?} at {tile} refused: {reason}"),
        }

        let mut outcomes = vec![FarmOutcome::ActionApplied {
            action,
            tile,
            result,
        }];
        if result == Err(ActionRejected::OutOfSeed) {
            outcomes.push(self.seed_exhausted(action));
        }
        outcomes
    }

    /// Report that the selected seed ran out and switch to the best-stocked
    /// crop, if any.
    fn seed_exhausted(&mut self, action: FarmAction) -> FarmOutcome {
        let crop = self.selected_crop;
        let fallback = self.inventory.best_stocked_seed(&self.config.crops);
        if let Some(next) = fallback {
            info!("[Farming] Out of {crop:?} seeds; switching to {next:?}");
            self.selected_crop = next;
        } else {
            info!("[Farming] Out of seeds entirely");
        }
        FarmOutcome::ResourceExhausted {
            action,
            crop,
            fallback,
        }
    }

    // ── scheduler ───────────────────────────────────────────────────────

    /// Advance the active walk or run by one tile.
    pub fn tick(&mut self) -> Vec<FarmOutcome> {
        let outcomes = self.scheduler.tick(SchedulerEnv {
            grid: &mut self.grid,
            avatar: &mut self.avatar,
            inventory: &mut self.inventory,
            season: self.clock.current(),
            crops: &self.config.crops,
            selected_crop: self.selected_crop,
        });
        for outcome in &outcomes {
            if let FarmOutcome::ResourceExhausted {
                fallback: Some(next),
                ..
            } = outcome
            {
                self.selected_crop = *next;
            }
        }
        outcomes
    }

    pub fn cancel_pending(&mut self) -> Vec<FarmOutcome> {
        if self.scheduler.cancel() {
            info!("[Scheduler] Cancelled");
            vec![FarmOutcome::Cancelled]
        } else {
            Vec::new()
        }
    }

    // ── calendar ────────────────────────────────────────────────────────

    pub fn advance_day(&mut self) -> Vec<FarmOutcome> {
        let advance = self.clock.advance(&mut self.grid, &self.config.crops);
        info!(
            "[Calendar] Day {} ({})",
            advance.day,
            advance.season.name()
        );
        let mut outcomes = vec![FarmOutcome::DayAdvanced {
            day: advance.day,
            season: advance.season,
        }];
        if advance.season_changed {
            outcomes.push(FarmOutcome::SeasonChanged {
                season: advance.season,
                day: advance.day,
                summary: advance.summary,
            });
        }
        outcomes
    }

    // ── economy ─────────────────────────────────────────────────────────

    /// Returns false when the crop isn't in the crop table.
    pub fn select_crop(&mut self, crop: CropKind) -> bool {
        if self.config.crops.get(crop).is_none() {
            return false;
        }
        self.selected_crop = crop;
        true
    }

    pub fn buy_seeds(&mut self, crop: CropKind, amount: u32) -> Result<u32, EconomyError> {
        self.inventory.buy_seeds(crop, amount, &self.config.crops)
    }

    pub fn sell_produce(&mut self, crop: CropKind) -> Result<u32, EconomyError> {
        self.inventory.sell_produce(crop, &self.config.crops)
    }

    /// Back to day 1 with the starting inventory and an empty grid.
    pub fn reset(&mut self) {
        *self = Self::new(self.config.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(x: i32, y: i32) -> TilePos {
        TilePos::new(x, y)
    }

    fn drain(session: &mut FarmSession) -> Vec<FarmOutcome> {
        let mut all = Vec::new();
        for _ in 0..200 {
            if session.cadence().is_none() {
                break;
            }
            all.extend(session.tick());
        }
        all
    }

    #[test]
    fn new_session_starts_at_spawn_on_day_one() {
        let session = FarmSession::default();
        assert_eq!(session.avatar().position, t(17, 17));
        assert_eq!(session.day(), 1);
        assert_eq!(session.current_season(), Season::Spring);
        assert_eq!(session.selected_crop(), CropKind::Wheat);
        assert!(!session.is_walk_active() && !session.is_run_active());
    }

    #[test]
    fn unreachable_move_changes_nothing() {
        let mut session = FarmSession::default();
        session.request_move_to(t(20, 20));
        assert!(session.is_walk_active());
        let outcomes = session.request_move_to(t(10, 13));
        assert_eq!(outcomes, vec![FarmOutcome::PathUnreachable { target: t(10, 13) }]);
        assert!(session.is_walk_active(), "existing walk survives");
    }

    #[test]
    fn move_to_current_tile_cancels_pending_walk() {
        let mut session = FarmSession::default();
        session.request_move_to(t(20, 20));
        assert!(session.request_move_to(t(17, 17)).is_empty());
        assert!(!session.is_walk_active());
    }

    #[test]
    fn move_to_walks_the_shortest_path() {
        let mut session = FarmSession::default();
        session.request_move_to(t(19, 18));
        let outcomes = drain(&mut session);
        assert_eq!(outcomes.len(), 4, "three steps then arrival: {outcomes:?}");
        assert_eq!(outcomes.last(), Some(&FarmOutcome::Arrived { tile: t(19, 18) }));
        assert_eq!(session.avatar().position, t(19, 18));
    }

    #[test]
    fn selection_in_wrong_season_is_rejected() {
        let mut session = FarmSession::default();
        let outcomes =
            session.request_action_over_selection(FarmAction::Harvest, t(13, 13), t(15, 13));
        assert_eq!(
            outcomes,
            vec![FarmOutcome::SelectionRejected {
                action: FarmAction::Harvest,
                reason: ActionRejected::WrongSeason,
            }]
        );
        assert!(!session.is_walk_active() && !session.is_run_active());
    }

    #[test]
    fn sell_selection_is_rejected() {
        let mut session = FarmSession::default();
        let outcomes = session.request_action_over_selection(FarmAction::Sell, t(13, 13), t(14, 14));
        assert_eq!(
            outcomes,
            vec![FarmOutcome::SelectionRejected {
                action: FarmAction::Sell,
                reason: ActionRejected::NotTileAction,
            }]
        );
    }

    #[test]
    fn selection_without_farmland_does_nothing() {
        let mut session = FarmSession::default();
        assert!(session
            .request_action_over_selection(FarmAction::Plant, t(0, 0), t(3, 3))
            .is_empty());
        assert!(!session.is_walk_active() && !session.is_run_active());
    }

    #[test]
    fn selection_starting_underfoot_runs_immediately() {
        let mut session = FarmSession::default();
        session.request_action_over_selection(FarmAction::Plant, t(17, 17), t(18, 17));
        assert!(session.is_run_active());
        let outcomes = drain(&mut session);
        assert_eq!(
            outcomes.last(),
            Some(&FarmOutcome::RunCompleted { action: FarmAction::Plant, applied: 2, skipped: 0 })
        );
    }

    #[test]
    fn plant_selection_without_seed_switches_crop_and_stays_put() {
        let mut session = FarmSession::default();
        session.inventory = Inventory::default();
        session.inventory.add_seeds(CropKind::Pumpkin, 3);
        let outcomes = session.request_action_over_selection(FarmAction::Plant, t(13, 13), t(15, 13));
        assert_eq!(
            outcomes,
            vec![FarmOutcome::ResourceExhausted {
                action: FarmAction::Plant,
                crop: CropKind::Wheat,
                fallback: Some(CropKind::Pumpkin),
            }]
        );
        assert_eq!(session.selected_crop(), CropKind::Pumpkin);
        assert!(!session.is_walk_active() && !session.is_run_active());
        assert_eq!(session.avatar().position, t(17, 17));
    }

    #[test]
    fn act_here_reports_refusals_and_keeps_the_run() {
        let mut session = FarmSession::default();
        session.request_action_over_selection(FarmAction::Plant, t(13, 13), t(15, 13));
        let outcomes = session.request_action_at_current_tile(FarmAction::Water);
        assert_eq!(
            outcomes,
            vec![FarmOutcome::ActionApplied {
                action: FarmAction::Water,
                tile: t(17, 17),
                result: Err(ActionRejected::WrongSeason),
            }]
        );
        assert!(session.is_walk_active());
    }

    #[test]
    fn act_here_out_of_seed_falls_back() {
        let mut session = FarmSession::default();
        session.inventory = Inventory::default();
        session.inventory.add_seeds(CropKind::Carrot, 1);
        let outcomes = session.request_action_at_current_tile(FarmAction::Plant);
        assert_eq!(outcomes.len(), 2);
        assert_eq!(
            outcomes[1],
            FarmOutcome::ResourceExhausted {
                action: FarmAction::Plant,
                crop: CropKind::Wheat,
                fallback: Some(CropKind::Carrot),
            }
        );
        let outcomes = session.request_action_at_current_tile(FarmAction::Plant);
        assert_eq!(
            outcomes,
            vec![FarmOutcome::ActionApplied {
                action: FarmAction::Plant,
                tile: t(17, 17),
                result: Ok(ActionEffect::Planted { crop: CropKind::Carrot }),
            }]
        );
    }

    #[test]
    fn step_turns_against_buildings() {
        let mut session = FarmSession::default();
        session.avatar.position = t(12, 13);
        assert_eq!(
            session.request_step(Facing::Left),
            vec![FarmOutcome::Turned { facing: Facing::Left }]
        );
        assert_eq!(session.avatar().position, t(12, 13));
        assert_eq!(session.avatar().facing, Facing::Left);

        assert_eq!(
            session.request_step(Facing::Right),
            vec![FarmOutcome::Moved { tile: t(13, 13), facing: Facing::Right }]
        );
        assert!(session.avatar().moving);
        session.settle_avatar();
        assert!(!session.avatar().moving);
    }

    #[test]
    fn step_cancels_the_scheduler() {
        let mut session = FarmSession::default();
        session.request_move_to(t(20, 20));
        session.request_step(Facing::Up);
        assert!(!session.is_walk_active());
        assert!(session.tick().is_empty());
    }

    #[test]
    fn cancel_reports_only_when_something_was_pending() {
        let mut session = FarmSession::default();
        assert!(session.cancel_pending().is_empty());
        session.request_move_to(t(20, 20));
        assert_eq!(session.cancel_pending(), vec![FarmOutcome::Cancelled]);
    }

    #[test]
    fn advance_day_reports_season_changes() {
        let mut session = FarmSession::default();
        let outcomes = session.advance_day();
        assert_eq!(
            outcomes,
            vec![
                FarmOutcome::DayAdvanced { day: 2, season: Season::Summer },
                FarmOutcome::SeasonChanged {
                    season: Season::Summer,
                    day: 2,
                    summary: BulkEffectSummary::default(),
                },
            ]
        );
    }

    #[test]
    fn select_buy_sell_and_reset() {
        let mut session = FarmSession::default();
        assert!(session.select_crop(CropKind::Corn));
        assert_eq!(session.buy_seeds(CropKind::Corn, 2), Ok(50));
        assert_eq!(session.inventory().seeds(CropKind::Corn), 12);
        assert!(session.sell_produce(CropKind::Corn).is_err());

        session.advance_day();
        session.request_step(Facing::Up);
        session.reset();
        assert_eq!(session.day(), 1);
        assert_eq!(session.inventory().gold, 200);
        assert_eq!(session.selected_crop(), CropKind::Wheat);
        assert_eq!(session.avatar().position, t(17, 17));
    }
}
