use super::super::Grid;
use crate::cell::CellType;
use rand::Rng;

pub const EMPTY: CellType = 0;
pub const TREE: CellType = 1;
pub const BURNING: CellType = 2;

impl Grid {
    /// Burning cells burn out; trees next to fire catch with the configured
    /// percent probability.
    pub(in crate::grid) fn decide_fire(&mut self, pos: usize) {
        // Every cell draws once per tick.
        let roll: f64 = self.rng.random_range(0.0..100.0);
        match self.state_of(pos) {
            BURNING => self.write_pending(pos, EMPTY),
            TREE => {
                let exposed = self.cells[pos]
                    .neighbors()
                    .iter()
                    .any(|&n| self.state_of(n) == BURNING);
                if exposed && roll < self.config.parameter {
                    self.write_pending(pos, BURNING);
                }
            }
            _ => {}
        }
    }
}
