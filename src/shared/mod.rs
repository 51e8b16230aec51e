//! Vocabulary shared by every isofarm module: tiles, crops, seasons, farm
//! actions, the outcomes the core reports, and the Bevy events and states
//! that carry them.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

// ═══════════════════════════════════════════════════════════════════════
// GAME STATE — top-level state machine
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, States, Default)]
pub enum GameState {
    #[default]
    Loading,
    Playing,
    Paused,
}

// ═══════════════════════════════════════════════════════════════════════
// WORLD GEOMETRY DEFAULTS
// ═══════════════════════════════════════════════════════════════════════

pub const WORLD_SIZE: i32 = 36;
pub const FIELD_SIZE: i32 = 10;
pub const FIELD_OFFSET: i32 = 13;

/// Seconds between walking steps.
pub const WALK_TICK_SECS: f32 = 0.12;
/// Seconds between auto-action steps. Slightly longer than a walk step so the
/// action's own feedback has time to register.
pub const RUN_TICK_SECS: f32 = 0.15;

// ═══════════════════════════════════════════════════════════════════════
// TILES & FACING
// ═══════════════════════════════════════════════════════════════════════

/// A grid tile. `y` grows downward: "up" is `y - 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TilePos {
    pub x: i32,
    pub y: i32,
}

impl TilePos {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn manhattan(self, other: TilePos) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }

    /// 4-connected neighbours in a fixed order: up, down, left, right.
    pub fn neighbors(self) -> [TilePos; 4] {
        [
            TilePos::new(self.x, self.y - 1),
            TilePos::new(self.x, self.y + 1),
            TilePos::new(self.x - 1, self.y),
            TilePos::new(self.x + 1, self.y),
        ]
    }

    pub fn step(self, facing: Facing) -> TilePos {
        let (dx, dy) = facing.delta();
        TilePos::new(self.x + dx, self.y + dy)
    }
}

impl std::fmt::Display for TilePos {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Facing {
    Up,
    #[default]
    Down,
    Left,
    Right,
}

impl Facing {
    /// Facing for a step by the signed delta `(dx, dy)`. Vertical movement wins
    /// over horizontal. `None` when the delta is zero.
    pub fn from_delta(dx: i32, dy: i32) -> Option<Self> {
        if dy < 0 {
            Some(Facing::Up)
        } else if dy > 0 {
            Some(Facing::Down)
        } else if dx < 0 {
            Some(Facing::Left)
        } else if dx > 0 {
            Some(Facing::Right)
        } else {
            None
        }
    }

    pub fn delta(self) -> (i32, i32) {
        match self {
            Facing::Up => (0, -1),
            Facing::Down => (0, 1),
            Facing::Left => (-1, 0),
            Facing::Right => (1, 0),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// AVATAR
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Avatar {
    pub position: TilePos,
    pub facing: Facing,
    /// Presentation-only: set by every committed step, cleared by the driver.
    pub moving: bool,
}

impl Avatar {
    pub fn spawn_at(position: TilePos) -> Self {
        Self {
            position,
            facing: Facing::Down,
            moving: false,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// CALENDAR
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Season {
    Spring,
    Summer,
    Fall,
    Winter,
}

impl Season {
    pub fn name(self) -> &'static str {
        match self {
            Season::Spring => "Spring",
            Season::Summer => "Summer",
            Season::Fall => "Fall",
            Season::Winter => "Winter",
        }
    }
}

/// Bulk cell rule applied when a season begins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum SeasonTransition {
    #[default]
    None,
    /// Every crop jumps to maturity; unwatered crops carry a harvest penalty.
    ForceGrowth,
    /// Every cell of the whole grid is cleared.
    ResetGrid,
}

/// One entry of the season cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeasonRule {
    pub season: Season,
    pub actions: Vec<FarmAction>,
    #[serde(default)]
    pub on_enter: SeasonTransition,
}

impl SeasonRule {
    pub fn allows(&self, action: FarmAction) -> bool {
        self.actions.contains(&action)
    }
}

// ═══════════════════════════════════════════════════════════════════════
// CROPS & CELLS
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CropKind {
    Wheat,
    Carrot,
    Tomato,
    Corn,
    Pumpkin,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CropDef {
    pub kind: CropKind,
    pub name: String,
    /// Growth value at which the crop becomes harvestable.
    pub grow_time: u32,
    pub seed_price: u32,
    pub sell_price: u32,
}

/// Farming state of one tile. Only meaningful inside the farmland.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CellState {
    pub crop: Option<CropKind>,
    pub growth: u32,
    pub watered: bool,
    pub fed: bool,
    pub harvest_penalty: bool,
}

impl CellState {
    pub fn planted(crop: CropKind) -> Self {
        Self {
            crop: Some(crop),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.crop.is_none()
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

// ═══════════════════════════════════════════════════════════════════════
// BUILDINGS
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BuildingKind {
    Farmhouse,
    Silo,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Building {
    pub kind: BuildingKind,
    pub origin: TilePos,
    pub width: i32,
    pub height: i32,
}

impl Building {
    pub fn covers(&self, tile: TilePos) -> bool {
        tile.x >= self.origin.x
            && tile.x < self.origin.x + self.width
            && tile.y >= self.origin.y
            && tile.y < self.origin.y + self.height
    }
}

// ═══════════════════════════════════════════════════════════════════════
// FARMING ACTIONS & RESULTS
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FarmAction {
    Plant,
    Water,
    Feed,
    Harvest,
    Sell,
}

impl FarmAction {
    /// Whether the action targets a farmland tile. Selling happens at the
    /// market, not on a tile, so it can't be swept over a selection.
    pub fn is_tile_action(self) -> bool {
        !matches!(self, FarmAction::Sell)
    }

    pub fn progressive(self) -> &'static str {
        match self {
            FarmAction::Plant => "Planting",
            FarmAction::Water => "Watering",
            FarmAction::Feed => "Feeding",
            FarmAction::Harvest => "Harvesting",
            FarmAction::Sell => "Selling",
        }
    }
}

/// What a successful farming action changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionEffect {
    Planted { crop: CropKind },
    Watered,
    Fed,
    Harvested {
        crop: CropKind,
        amount: u32,
        /// The cell was fed and the bonus was paid out.
        bonus: bool,
        /// The cell was unwatered when growth was forced.
        withered: bool,
    },
    Sold { crop: CropKind, gold: u32 },
}

/// Why a farming action was refused. A refused action changes nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, thiserror::Error)]
pub enum ActionRejected {
    #[error("that can't be done this season")]
    WrongSeason,
    #[error("can't farm here - go to the field")]
    NotFarmland,
    #[error("nothing is growing here")]
    NoCrop,
    #[error("already done")]
    AlreadyDone,
    #[error("not ready yet")]
    NotReady,
    #[error("out of seeds")]
    OutOfSeed,
    #[error("nothing to sell")]
    NothingToSell,
    #[error("this action doesn't target a tile")]
    NotTileAction,
}

pub type ActionResult = Result<ActionEffect, ActionRejected>;

/// Counts of cells touched by a season's bulk rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BulkEffectSummary {
    pub matured: u32,
    pub penalized: u32,
    pub cleared: u32,
}

// ═══════════════════════════════════════════════════════════════════════
// OUTCOMES — what the core reports back to the presentation layer
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FarmOutcome {
    Moved {
        tile: TilePos,
        facing: Facing,
    },
    /// A direct step was blocked; only the facing changed.
    Turned {
        facing: Facing,
    },
    /// A movement-only walk reached its goal.
    Arrived {
        tile: TilePos,
    },
    ActionApplied {
        action: FarmAction,
        tile: TilePos,
        result: ActionResult,
    },
    RunCompleted {
        action: FarmAction,
        applied: u32,
        skipped: u32,
    },
    /// The run (or a direct plant) ran out of seed stock. `fallback` is the crop
    /// the selection switched to, if any seeds remain at all.
    ResourceExhausted {
        action: FarmAction,
        crop: CropKind,
        fallback: Option<CropKind>,
    },
    PathUnreachable {
        target: TilePos,
    },
    SelectionRejected {
        action: FarmAction,
        reason: ActionRejected,
    },
    Cancelled,
    DayAdvanced {
        day: u32,
        season: Season,
    },
    SeasonChanged {
        season: Season,
        day: u32,
        summary: BulkEffectSummary,
    },
}

// ═══════════════════════════════════════════════════════════════════════
// EVENTS — the Bevy surface of the farm session
// ═══════════════════════════════════════════════════════════════════════

/// Intents sent by the presentation/input layer.
#[derive(Event, Debug, Clone, PartialEq, Eq)]
pub enum FarmCommand {
    MoveTo(TilePos),
    ActOverSelection {
        action: FarmAction,
        corner_a: TilePos,
        corner_b: TilePos,
    },
    ActHere(FarmAction),
    Step(Facing),
    AdvanceDay,
    Cancel,
    SelectCrop(CropKind),
    BuySeeds { crop: CropKind, amount: u32 },
    SellProduce(CropKind),
    Reset,
}

/// Every outcome the session produced, in order.
#[derive(Event, Debug, Clone, PartialEq, Eq)]
pub struct FarmOutcomeEvent(pub FarmOutcome);

/// Sent alongside `FarmOutcome::SeasonChanged` for domains that only care
/// about the calendar.
#[derive(Event, Debug, Clone)]
pub struct SeasonChangeEvent {
    pub new_season: Season,
    pub day: u32,
}
