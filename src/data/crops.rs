use serde::{Deserialize, Serialize};

use crate::shared::*;

/// The crop definitions a session plays with, in display order.
///
/// Order matters: when two seed stocks tie for "most seeds left", the crop
/// listed first wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CropTable(Vec<CropDef>);

impl CropTable {
    pub fn new(crops: Vec<CropDef>) -> Self {
        Self(crops)
    }

    pub fn get(&self, kind: CropKind) -> Option<&CropDef> {
        self.0.iter().find(|def| def.kind == kind)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CropDef> {
        self.0.iter()
    }

    pub fn kinds(&self) -> impl Iterator<Item = CropKind> + '_ {
        self.0.iter().map(|def| def.kind)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for CropTable {
    fn default() -> Self {
        Self(default_crops())
    }
}

/// Built-in crop definitions.
///
/// Every crop matures in a single growth step: growth is forced at the start
/// of fall, so `grow_time` only has to be reachable by that bulk rule.
pub fn default_crops() -> Vec<CropDef> {
    vec![
        CropDef {
            kind: CropKind::Wheat,
            name: "Wheat".into(),
            grow_time: 1,
            seed_price: 10,
            sell_price: 25,
        },
        CropDef {
            kind: CropKind::Carrot,
            name: "Carrot".into(),
            grow_time: 1,
            seed_price: 15,
            sell_price: 40,
        },
        CropDef {
            kind: CropKind::Tomato,
            name: "Tomato".into(),
            grow_time: 1,
            seed_price: 20,
            sell_price: 55,
        },
        CropDef {
            kind: CropKind::Corn,
            name: "Corn".into(),
            grow_time: 1,
            seed_price: 25,
            sell_price: 75,
        },
        CropDef {
            kind: CropKind::Pumpkin,
            name: "Pumpkin".into(),
            grow_time: 1,
            seed_price: 40,
            sell_price: 120,
        },
    ]
}
