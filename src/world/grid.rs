//! The tile grid: bounds, building footprints, farmland, and per-cell state.

use crate::data::FarmConfig;
use crate::shared::*;

/// Axis-aligned square of farmable tiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldRect {
    pub offset: i32,
    pub size: i32,
}

impl FieldRect {
    pub fn contains(&self, tile: TilePos) -> bool {
        tile.x >= self.offset
            && tile.x < self.offset + self.size
            && tile.y >= self.offset
            && tile.y < self.offset + self.size
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GridWorld {
    size: i32,
    field: FieldRect,
    buildings: Vec<Building>,
    /// Row-major, `size * size` cells.
    cells: Vec<CellState>,
}

impl GridWorld {
    pub fn new(size: i32, field: FieldRect, buildings: Vec<Building>) -> Self {
        let side = size.max(0) as usize;
        Self {
            size,
            field,
            buildings,
            cells: vec![CellState::default(); side * side],
        }
    }

    pub fn from_config(config: &FarmConfig) -> Self {
        Self::new(
            config.world_size,
            FieldRect {
                offset: config.field_offset,
                size: config.field_size,
            },
            config.buildings.clone(),
        )
    }

    pub fn size(&self) -> i32 {
        self.size
    }

    pub fn field(&self) -> FieldRect {
        self.field
    }

    pub fn buildings(&self) -> &[Building] {
        &self.buildings
    }

    pub fn in_bounds(&self, tile: TilePos) -> bool {
        tile.x >= 0 && tile.y >= 0 && tile.x < self.size && tile.y < self.size
    }

    pub fn building_at(&self, tile: TilePos) -> Option<&Building> {
        self.buildings.iter().find(|b| b.covers(tile))
    }

    pub fn is_walkable(&self, tile: TilePos) -> bool {
        self.in_bounds(tile) && self.building_at(tile).is_none()
    }

    pub fn is_farmland(&self, tile: TilePos) -> bool {
        self.in_bounds(tile) && self.field.contains(tile) && self.building_at(tile).is_none()
    }

    fn index_of(&self, tile: TilePos) -> Option<usize> {
        if !self.in_bounds(tile) {
            return None;
        }
        Some(tile.y as usize * self.size as usize + tile.x as usize)
    }

    pub fn cell_at(&self, tile: TilePos) -> Option<&CellState> {
        self.index_of(tile).and_then(|i| self.cells.get(i))
    }

    /// Write access to a cell. Callers only mutate farmland cells; the bulk
    /// season rules are the one exception and go through `cells_mut`.
    pub fn cell_at_mut(&mut self, tile: TilePos) -> Option<&mut CellState> {
        let index = self.index_of(tile)?;
        self.cells.get_mut(index)
    }

    pub fn cells(&self) -> impl Iterator<Item = (TilePos, &CellState)> {
        let size = self.size;
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, cell)| (TilePos::new(i as i32 % size, i as i32 / size), cell))
    }

    pub(crate) fn cells_mut(&mut self) -> impl Iterator<Item = &mut CellState> {
        self.cells.iter_mut()
    }

    /// Every farmland tile in row-major order.
    pub fn farmland_tiles(&self) -> impl Iterator<Item = TilePos> + '_ {
        let field = self.field;
        (field.offset..field.offset + field.size)
            .flat_map(move |y| (field.offset..field.offset + field.size).map(move |x| TilePos::new(x, y)))
            .filter(|tile| self.is_farmland(*tile))
    }

    pub fn occupied_cells(&self) -> usize {
        self.cells.iter().filter(|c| !c.is_empty()).count()
    }
}
