use crate::topology::Direction;
use serde::{Deserialize, Serialize};

/// Per-kind cell state. Every kind starts at 0; the meaning of each value is
/// owned by the rule module of that kind.
pub type CellType = u8;

/// One grid site. `pending` is the state the cell will hold after the next
/// commit; it equals `state` until a rule overwrites it.
#[derive(Clone, Debug)]
pub struct Cell {
    position: usize,
    row: usize,
    col: usize,
    state: CellType,
    pending: CellType,
    neighbors: Vec<usize>,
    data: CellData,
}

impl Cell {
    pub(crate) fn new(position: usize, width: usize, state: CellType, data: CellData) -> Self {
        Self {
            position,
            row: position / width,
            col: position % width,
            state,
            pending: state,
            neighbors: Vec::new(),
            data,
        }
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn row(&self) -> usize {
        self.row
    }

    pub fn col(&self) -> usize {
        self.col
    }

    pub fn state(&self) -> CellType {
        self.state
    }

    pub fn pending(&self) -> CellType {
        self.pending
    }

    /// Cached neighbor positions, in the order the kind's topology defines.
    pub fn neighbors(&self) -> &[usize] {
        &self.neighbors
    }

    pub fn data(&self) -> &CellData {
        &self.data
    }

    pub(crate) fn set_pending(&mut self, state: CellType) {
        self.pending = state;
    }

    pub(crate) fn set_neighbors(&mut self, neighbors: Vec<usize>) {
        self.neighbors = neighbors;
    }

    pub(crate) fn data_mut(&mut self) -> &mut CellData {
        &mut self.data
    }

    /// Promote the pending state. Returns whether the visible state changed.
    pub(crate) fn commit(&mut self) -> bool {
        let changed = self.state != self.pending;
        self.state = self.pending;
        changed
    }

    pub fn snapshot(&self) -> CellSnapshot {
        CellSnapshot {
            row: self.row,
            col: self.col,
            state: self.state,
        }
    }
}

/// Read-only view handed to renderers and loaders.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellSnapshot {
    pub row: usize,
    pub col: usize,
    pub state: CellType,
}

/// Mutable per-cell payload of the kinds that carry more than a state.
#[derive(Clone, Debug, Default)]
pub enum CellData {
    #[default]
    None,
    Predation(Creature),
    Sugar(SugarPatch),
    Ant(AntCell),
    Langton(LangtonCell),
}

/// Fish or shark bookkeeping. Fish ignore `energy`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Creature {
    pub energy: i32,
    pub cycle: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SugarAgent {
    pub reserve: i32,
    pub metabolism: i32,
    pub vision: usize,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SugarPatch {
    pub sugar: u32,
    pub limit: u32,
    pub growback_cycle: u32,
    /// The agent standing on, or moving into, this patch.
    pub agent: Option<SugarAgent>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Ant {
    pub heading: Direction,
    pub carrying_food: bool,
    pub remaining_life: u32,
    /// Tick of the last move; an ant moves at most once per tick.
    pub last_moved_tick: Option<u64>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AntCell {
    pub ants: Vec<Ant>,
    pub home_pheromone: u32,
    pub food_pheromone: u32,
    pub slots: [Option<usize>; 8],
}

impl AntCell {
    pub fn pheromone(&self, carrying_food: bool) -> u32 {
        if carrying_food {
            self.home_pheromone
        } else {
            self.food_pheromone
        }
    }
}

/// Which corner of its loop a junction sits in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoopCorner {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LangtonCell {
    pub junction_checked: bool,
    pub program: Option<Box<LoopProgram>>,
}

/// Replication state owned by a junction cell.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoopProgram {
    pub corner: LoopCorner,
    /// Loop cells walked counter-clockwise from the junction.
    pub perimeter: Vec<usize>,
    pub genes: Vec<CellType>,
    /// Linear offset from one branch cell to the next.
    pub branch_step: isize,
    pub branch_end: usize,
    pub replicant_positions: Vec<usize>,
    pub replicant_genes: Vec<CellType>,
    /// Program tick, starting at 1.
    pub cursor: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_cell_derives_row_and_col_and_mirrors_pending() {
        let cell = Cell::new(7, 3, 1, CellData::None);
        assert_eq!((cell.row(), cell.col()), (2, 1));
        assert_eq!(cell.pending(), 1);
    }

    #[test]
    fn commit_reports_change_only_when_pending_differs() {
        let mut cell = Cell::new(0, 4, 0, CellData::None);
        assert!(!cell.commit());
        cell.set_pending(2);
        assert!(cell.commit());
        assert_eq!(cell.state(), 2);
        assert!(!cell.commit());
    }

    #[test]
    fn ant_cell_reads_channel_by_carry_flag() {
        let cell = AntCell {
            ants: Vec::new(),
            home_pheromone: 3,
            food_pheromone: 8,
            slots: [None; 8],
        };
        assert_eq!(cell.pheromone(true), 3);
        assert_eq!(cell.pheromone(false), 8);
    }
}
