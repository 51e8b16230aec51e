//! Per-tile farming rules: plant, water, feed, harvest, and selling produce.
//!
//! `apply_farming_action` validates first and mutates only on success, so a
//! rejected action never leaves a half-applied change behind. Sounds and
//! notifications are the caller's business, driven by the returned result.

use crate::data::CropTable;
use crate::economy::Inventory;
use crate::shared::*;
use crate::world::GridWorld;

pub const BASE_YIELD: u32 = 1;
pub const FED_YIELD: u32 = 2;

/// Everything an action needs besides the grid itself.
pub struct ActionContext<'a> {
    pub season: &'a SeasonRule,
    pub crops: &'a CropTable,
    pub selected_crop: CropKind,
    pub inventory: &'a mut Inventory,
}

/// Yield of harvesting `cell`. A harvest penalty overrides the feeding bonus.
pub fn harvest_yield(cell: &CellState) -> u32 {
    if cell.harvest_penalty {
        BASE_YIELD
    } else if cell.fed {
        FED_YIELD
    } else {
        BASE_YIELD
    }
}

pub fn apply_farming_action(
    grid: &mut GridWorld,
    action: FarmAction,
    tile: TilePos,
    ctx: &mut ActionContext<'_>,
) -> ActionResult {
    if action == FarmAction::Sell {
        return sell(ctx);
    }

    if !grid.is_farmland(tile) {
        return Err(ActionRejected::NotFarmland);
    }
    if !ctx.season.allows(action) {
        return Err(ActionRejected::WrongSeason);
    }
    let Some(cell) = grid.cell_at_mut(tile) else {
        return Err(ActionRejected::NotFarmland);
    };

    match action {
        FarmAction::Plant => {
            if !cell.is_empty() {
                return Err(ActionRejected::AlreadyDone);
            }
            let crop = ctx.selected_crop;
            if ctx.crops.get(crop).is_none() || !ctx.inventory.take_seed(crop) {
                return Err(ActionRejected::OutOfSeed);
            }
            *cell = CellState::planted(crop);
            Ok(ActionEffect::Planted { crop })
        }
        FarmAction::Water => {
            if cell.is_empty() {
                return Err(ActionRejected::NoCrop);
            }
            if cell.watered {
                return Err(ActionRejected::AlreadyDone);
            }
            cell.watered = true;
            Ok(ActionEffect::Watered)
        }
        FarmAction::Feed => {
            if cell.is_empty() {
                return Err(ActionRejected::NoCrop);
            }
            if cell.fed {
                return Err(ActionRejected::AlreadyDone);
            }
            cell.fed = true;
            Ok(ActionEffect::Fed)
        }
        FarmAction::Harvest => {
            let Some(crop) = cell.crop else {
                return Err(ActionRejected::NoCrop);
            };
            let mature = ctx
                .crops
                .get(crop)
                .is_some_and(|def| cell.growth >= def.grow_time);
            if !mature {
                return Err(ActionRejected::NotReady);
            }
            let amount = harvest_yield(cell);
            let effect = ActionEffect::Harvested {
                crop,
                amount,
                bonus: cell.fed && !cell.harvest_penalty,
                withered: cell.harvest_penalty,
            };
            ctx.inventory.add_produce(crop, amount);
            cell.clear();
            Ok(effect)
        }
        FarmAction::Sell => sell(ctx),
    }
}

fn sell(ctx: &mut ActionContext<'_>) -> ActionResult {
    if !ctx.season.allows(FarmAction::Sell) {
        return Err(ActionRejected::WrongSeason);
    }
    let crop = ctx.selected_crop;
    match ctx.inventory.sell_produce(crop, ctx.crops) {
        Ok(gold) => Ok(ActionEffect::Sold { crop, gold }),
        Err(_) => Err(ActionRejected::NothingToSell),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{default_season_cycle, FarmConfig};

    const TILE: TilePos = TilePos::new(15, 15);

    struct Fixture {
        grid: GridWorld,
        inventory: Inventory,
        crops: CropTable,
        seasons: Vec<SeasonRule>,
    }

    impl Fixture {
        fn new() -> Self {
            let config = FarmConfig::default();
            Self {
                grid: GridWorld::from_config(&config),
                inventory: Inventory::starting(&config),
                crops: config.crops.clone(),
                seasons: default_season_cycle(),
            }
        }

        fn apply(&mut self, season: usize, action: FarmAction, tile: TilePos) -> ActionResult {
            let mut ctx = ActionContext {
                season: &self.seasons[season],
                crops: &self.crops,
                selected_crop: CropKind::Wheat,
                inventory: &mut self.inventory,
            };
            apply_farming_action(&mut self.grid, action, tile, &mut ctx)
        }

        fn cell(&self, tile: TilePos) -> CellState {
            *self.grid.cell_at(tile).unwrap()
        }
    }

    const SPRING: usize = 0;
    const SUMMER: usize = 1;
    const FALL: usize = 2;
    const WINTER: usize = 3;

    #[test]
    fn plant_consumes_a_seed() {
        let mut fx = Fixture::new();
        assert_eq!(
            fx.apply(SPRING, FarmAction::Plant, TILE),
            Ok(ActionEffect::Planted { crop: CropKind::Wheat })
        );
        assert_eq!(fx.cell(TILE), CellState::planted(CropKind::Wheat));
        assert_eq!(fx.inventory.seeds(CropKind::Wheat), 9);
    }

    #[test]
    fn plant_outside_spring_is_wrong_season() {
        let mut fx = Fixture::new();
        assert_eq!(
            fx.apply(SUMMER, FarmAction::Plant, TILE),
            Err(ActionRejected::WrongSeason)
        );
        assert!(fx.cell(TILE).is_empty());
        assert_eq!(fx.inventory.seeds(CropKind::Wheat), 10);
    }

    #[test]
    fn plant_outside_the_field_is_not_farmland() {
        let mut fx = Fixture::new();
        assert_eq!(
            fx.apply(SPRING, FarmAction::Plant, TilePos::new(2, 2)),
            Err(ActionRejected::NotFarmland)
        );
    }

    #[test]
    fn plant_on_occupied_tile_is_already_done() {
        let mut fx = Fixture::new();
        fx.apply(SPRING, FarmAction::Plant, TILE).unwrap();
        assert_eq!(
            fx.apply(SPRING, FarmAction::Plant, TILE),
            Err(ActionRejected::AlreadyDone)
        );
        assert_eq!(fx.inventory.seeds(CropKind::Wheat), 9, "no seed spent on refusal");
    }

    #[test]
    fn plant_without_seed_is_out_of_seed() {
        let mut fx = Fixture::new();
        for _ in 0..10 {
            fx.inventory.take_seed(CropKind::Wheat);
        }
        assert_eq!(
            fx.apply(SPRING, FarmAction::Plant, TILE),
            Err(ActionRejected::OutOfSeed)
        );
        assert!(fx.cell(TILE).is_empty());
    }

    #[test]
    fn water_and_feed_need_a_crop_and_only_apply_once() {
        let mut fx = Fixture::new();
        assert_eq!(fx.apply(SUMMER, FarmAction::Water, TILE), Err(ActionRejected::NoCrop));
        assert_eq!(fx.apply(SUMMER, FarmAction::Feed, TILE), Err(ActionRejected::NoCrop));

        fx.apply(SPRING, FarmAction::Plant, TILE).unwrap();
        assert_eq!(fx.apply(SUMMER, FarmAction::Water, TILE), Ok(ActionEffect::Watered));
        assert_eq!(
            fx.apply(SUMMER, FarmAction::Water, TILE),
            Err(ActionRejected::AlreadyDone)
        );
        assert_eq!(fx.apply(SUMMER, FarmAction::Feed, TILE), Ok(ActionEffect::Fed));
        assert_eq!(fx.apply(SUMMER, FarmAction::Feed, TILE), Err(ActionRejected::AlreadyDone));

        let cell = fx.cell(TILE);
        assert!(cell.watered && cell.fed);
    }

    #[test]
    fn harvest_before_maturity_is_not_ready() {
        let mut fx = Fixture::new();
        fx.apply(SPRING, FarmAction::Plant, TILE).unwrap();
        assert_eq!(fx.apply(FALL, FarmAction::Harvest, TILE), Err(ActionRejected::NotReady));
        assert_eq!(fx.cell(TILE).crop, Some(CropKind::Wheat));
    }

    #[test]
    fn harvest_clears_cell_and_stocks_produce() {
        let mut fx = Fixture::new();
        fx.apply(SPRING, FarmAction::Plant, TILE).unwrap();
        fx.grid.cell_at_mut(TILE).unwrap().growth = 1;
        assert_eq!(
            fx.apply(FALL, FarmAction::Harvest, TILE),
            Ok(ActionEffect::Harvested {
                crop: CropKind::Wheat,
                amount: 1,
                bonus: false,
                withered: false,
            })
        );
        assert!(fx.cell(TILE).is_empty());
        assert_eq!(fx.cell(TILE), CellState::default());
        assert_eq!(fx.inventory.produce(CropKind::Wheat), 1);
    }

    #[test]
    fn harvest_yield_penalty_overrides_bonus() {
        let plain = CellState {
            crop: Some(CropKind::Corn),
            growth: 1,
            ..CellState::default()
        };
        let fed = CellState { fed: true, watered: true, ..plain };
        let fed_but_withered = CellState { fed: true, harvest_penalty: true, ..plain };

        assert_eq!(harvest_yield(&plain), 1);
        assert_eq!(harvest_yield(&fed), 2);
        assert_eq!(harvest_yield(&fed_but_withered), 1);
    }

    #[test]
    fn sell_moves_produce_to_gold_in_winter_only() {
        let mut fx = Fixture::new();
        assert_eq!(
            fx.apply(WINTER, FarmAction::Sell, TILE),
            Err(ActionRejected::NothingToSell)
        );
        fx.inventory.add_produce(CropKind::Wheat, 1);
        assert_eq!(
            fx.apply(FALL, FarmAction::Sell, TILE),
            Err(ActionRejected::WrongSeason)
        );
        assert_eq!(
            fx.apply(WINTER, FarmAction::Sell, TilePos::new(0, 0)),
            Ok(ActionEffect::Sold { crop: CropKind::Wheat, gold: 25 })
        );
        assert_eq!(fx.inventory.gold, 225);
    }
}
