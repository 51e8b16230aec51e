use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::data::{CropTable, FarmConfig};
use crate::shared::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum EconomyError {
    #[error("{crop:?} isn't sold here")]
    UnknownCrop { crop: CropKind },
    #[error("need {cost}g but only have {gold}g")]
    InsufficientGold { cost: u32, gold: u32 },
    #[error("no {crop:?} to sell")]
    NothingToSell { crop: CropKind },
}

/// Seed stock, harvested produce and gold.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Inventory {
    pub gold: u32,
    seeds: BTreeMap<CropKind, u32>,
    produce: BTreeMap<CropKind, u32>,
}

impl Inventory {
    /// Starting inventory: the configured gold and the same seed count for
    /// every crop in the table.
    pub fn starting(config: &FarmConfig) -> Self {
        Self {
            gold: config.starting_gold,
            seeds: config
                .crops
                .kinds()
                .map(|kind| (kind, config.starting_seeds))
                .collect(),
            produce: BTreeMap::new(),
        }
    }

    pub fn seeds(&self, crop: CropKind) -> u32 {
        self.seeds.get(&crop).copied().unwrap_or(0)
    }

    pub fn produce(&self, crop: CropKind) -> u32 {
        self.produce.get(&crop).copied().unwrap_or(0)
    }

    pub fn add_seeds(&mut self, crop: CropKind, amount: u32) {
        let entry = self.seeds.entry(crop).or_insert(0);
        *entry = entry.saturating_add(amount);
    }

    /// Take one seed. Returns false (and changes nothing) when out of stock.
    pub fn take_seed(&mut self, crop: CropKind) -> bool {
        match self.seeds.get_mut(&crop) {
            Some(count) if *count > 0 => {
                *count -= 1;
                true
            }
            _ => false,
        }
    }

    pub fn add_produce(&mut self, crop: CropKind, amount: u32) {
        let entry = self.produce.entry(crop).or_insert(0);
        *entry = entry.saturating_add(amount);
    }

    /// The crop with the most seeds left. Ties go to whichever crop the table
    /// lists first. `None` when every stock is empty.
    pub fn best_stocked_seed(&self, crops: &CropTable) -> Option<CropKind> {
        let mut best: Option<(CropKind, u32)> = None;
        for kind in crops.kinds() {
            let count = self.seeds(kind);
            if count == 0 {
                continue;
            }
            match best {
                Some((_, best_count)) if best_count >= count => {}
                _ => best = Some((kind, count)),
            }
        }
        best.map(|(kind, _)| kind)
    }

    /// Buy `amount` seeds at the table's seed price. Returns the gold spent.
    pub fn buy_seeds(
        &mut self,
        crop: CropKind,
        amount: u32,
        crops: &CropTable,
    ) -> Result<u32, EconomyError> {
        let def = crops.get(crop).ok_or(EconomyError::UnknownCrop { crop })?;
        let cost = def.seed_price.saturating_mul(amount);
        if self.gold < cost {
            return Err(EconomyError::InsufficientGold {
                cost,
                gold: self.gold,
            });
        }
        self.gold -= cost;
        self.add_seeds(crop, amount);
        Ok(cost)
    }

    /// Sell one unit of harvested produce. Returns the gold earned.
    pub fn sell_produce(&mut self, crop: CropKind, crops: &CropTable) -> Result<u32, EconomyError> {
        let def = crops.get(crop).ok_or(EconomyError::UnknownCrop { crop })?;
        match self.produce.get_mut(&crop) {
            Some(count) if *count > 0 => {
                *count -= 1;
                self.gold = self.gold.saturating_add(def.sell_price);
                Ok(def.sell_price)
            }
            _ => Err(EconomyError::NothingToSell { crop }),
        }
    }
}
