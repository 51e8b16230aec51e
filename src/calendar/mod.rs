//! Calendar domain: days, seasons and the bulk rule each season starts with.
//!
//! Responsible for:
//! - Counting days (day 1 is the first day of the first season)
//! - Mapping the day onto the configured season cycle
//! - Applying each season's bulk cell rule when that season begins

use bevy::prelude::*;

use crate::data::CropTable;
use crate::shared::*;
use crate::world::GridWorld;

/// Result of one `SeasonClock::advance`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeasonAdvance {
    pub day: u32,
    pub season: Season,
    pub season_changed: bool,
    pub summary: BulkEffectSummary,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeasonClock {
    day: u32,
    cycle: Vec<SeasonRule>,
}

impl SeasonClock {
    /// Starts on day 1. `cycle` must not be empty (config validation
    /// guarantees it); an empty cycle falls back to the built-in one.
    pub fn new(cycle: Vec<SeasonRule>) -> Self {
        let cycle = if cycle.is_empty() {
            crate::data::default_season_cycle()
        } else {
            cycle
        };
        Self { day: 1, cycle }
    }

    pub fn day(&self) -> u32 {
        self.day
    }

    pub fn cycle(&self) -> &[SeasonRule] {
        &self.cycle
    }

    fn index_for(&self, day: u32) -> usize {
        (day.saturating_sub(1) as usize) % self.cycle.len()
    }

    pub fn season_index(&self) -> usize {
        self.index_for(self.day)
    }

    pub fn current(&self) -> &SeasonRule {
        &self.cycle[self.season_index()]
    }

    pub fn season(&self) -> Season {
        self.current().season
    }

    /// Move to the next day. When that changes the season, the new season's
    /// bulk rule is applied to every cell before this returns.
    pub fn advance(&mut self, grid: &mut GridWorld, crops: &CropTable) -> SeasonAdvance {
        let previous = self.season_index();
        self.day += 1;
        let index = self.season_index();
        let season_changed = index != previous;

        let summary = if season_changed {
            let rule = self.cycle[index].on_enter;
            let summary = apply_season_rule(rule, grid, crops);
            info!(
                "[Calendar] Season changed: {:?} -> {:?} on day {} ({:?}: {} matured, {} penalized, {} cleared)",
                self.cycle[previous].season,
                self.cycle[index].season,
                self.day,
                rule,
                summary.matured,
                summary.penalized,
                summary.cleared,
            );
            summary
        } else {
            BulkEffectSummary::default()
        };

        SeasonAdvance {
            day: self.day,
            season: self.season(),
            season_changed,
            summary,
        }
    }
}

/// Apply one bulk rule to every cell of the grid.
pub fn apply_season_rule(
    rule: SeasonTransition,
    grid: &mut GridWorld,
    crops: &CropTable,
) -> BulkEffectSummary {
    let mut summary = BulkEffectSummary::default();
    match rule {
        SeasonTransition::None => {}
        SeasonTransition::ForceGrowth => {
            for cell in grid.cells_mut() {
                let Some(crop) = cell.crop else {
                    continue;
                };
                let maturity = crops.get(crop).map(|def| def.grow_time).unwrap_or(0);
                cell.growth = cell.growth.max(maturity);
                summary.matured += 1;
                if !cell.watered && !cell.harvest_penalty {
                    cell.harvest_penalty = true;
                    summary.penalized += 1;
                }
            }
        }
        SeasonTransition::ResetGrid => {
            for cell in grid.cells_mut() {
                if !cell.is_empty() {
                    summary.cleared += 1;
                }
                cell.clear();
            }
        }
    }
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::FarmConfig;

    fn setup() -> (SeasonClock, GridWorld, CropTable) {
        let config = FarmConfig::default();
        (
            SeasonClock::new(config.seasons.clone()),
            GridWorld::from_config(&config),
            config.crops.clone(),
        )
    }

    fn plant(grid: &mut GridWorld, tile: TilePos, watered: bool, fed: bool) {
        *grid.cell_at_mut(tile).unwrap() = CellState {
            watered,
            fed,
            ..CellState::planted(CropKind::Tomato)
        };
    }

    #[test]
    fn day_maps_onto_the_cycle() {
        let (mut clock, mut grid, crops) = setup();
        let mut seen = vec![clock.season()];
        for _ in 0..4 {
            seen.push(clock.advance(&mut grid, &crops).season);
        }
        assert_eq!(
            seen,
            vec![
                Season::Spring,
                Season::Summer,
                Season::Fall,
                Season::Winter,
                Season::Spring
            ]
        );
        assert_eq!(clock.day(), 5);
    }

    #[test]
    fn entering_fall_forces_growth_and_penalizes_dry_crops() {
        let (mut clock, mut grid, crops) = setup();
        let wet = TilePos::new(14, 14);
        let dry = TilePos::new(15, 14);
        plant(&mut grid, wet, true, true);
        plant(&mut grid, dry, false, true);

        clock.advance(&mut grid, &crops); // summer
        let advance = clock.advance(&mut grid, &crops); // fall

        assert!(advance.season_changed);
        assert_eq!(advance.season, Season::Fall);
        assert_eq!(
            advance.summary,
            BulkEffectSummary {
                matured: 2,
                penalized: 1,
                cleared: 0
            }
        );
        let wet_cell = grid.cell_at(wet).unwrap();
        let dry_cell = grid.cell_at(dry).unwrap();
        assert_eq!(wet_cell.growth, 1);
        assert!(!wet_cell.harvest_penalty);
        assert_eq!(dry_cell.growth, 1);
        assert!(dry_cell.harvest_penalty);
    }

    #[test]
    fn forced_growth_never_decreases() {
        let (_, mut grid, crops) = setup();
        let tile = TilePos::new(16, 16);
        plant(&mut grid, tile, true, false);
        grid.cell_at_mut(tile).unwrap().growth = 5;
        apply_season_rule(SeasonTransition::ForceGrowth, &mut grid, &crops);
        assert_eq!(grid.cell_at(tile).unwrap().growth, 5);
    }

    #[test]
    fn wrapping_to_spring_clears_the_whole_grid() {
        let (mut clock, mut grid, crops) = setup();
        plant(&mut grid, TilePos::new(14, 14), true, false);
        // Outside the farmland too: the reset covers every cell.
        plant(&mut grid, TilePos::new(1, 1), false, false);

        let mut last = None;
        for _ in 0..4 {
            last = Some(clock.advance(&mut grid, &crops));
        }
        let last = last.unwrap();
        assert_eq!(last.season, Season::Spring);
        assert_eq!(last.summary.cleared, 2);
        assert_eq!(grid.occupied_cells(), 0);
    }

    #[test]
    fn reset_rule_is_idempotent() {
        let (_, mut grid, crops) = setup();
        plant(&mut grid, TilePos::new(14, 14), true, true);
        apply_season_rule(SeasonTransition::ResetGrid, &mut grid, &crops);
        let once = grid.clone();
        let summary = apply_season_rule(SeasonTransition::ResetGrid, &mut grid, &crops);
        assert_eq!(grid, once);
        assert_eq!(summary.cleared, 0);
        assert!(grid.cells().all(|(_, c)| *c == CellState::default()));
    }

    #[test]
    fn single_season_cycle_never_changes_season() {
        let (_, mut grid, crops) = setup();
        let mut clock = SeasonClock::new(vec![SeasonRule {
            season: Season::Summer,
            actions: vec![FarmAction::Water],
            on_enter: SeasonTransition::ResetGrid,
        }]);
        plant(&mut grid, TilePos::new(14, 14), false, false);
        let advance = clock.advance(&mut grid, &crops);
        assert!(!advance.season_changed);
        assert_eq!(grid.occupied_cells(), 1, "no bulk rule without a season change");
    }
}
