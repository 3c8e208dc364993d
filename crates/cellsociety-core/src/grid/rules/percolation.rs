use super::super::Grid;
use crate::cell::CellType;

pub const BLOCKED: CellType = 0;
pub const OPEN: CellType = 1;
pub const FLOWING: CellType = 2;

impl Grid {
    /// Open cells on the top row start flowing; other open cells flow once a
    /// north, west or east neighbor does. Flow never recedes.
    pub(in crate::grid) fn decide_percolation(&mut self, pos: usize) {
        if self.state_of(pos) != OPEN {
            return;
        }
        let fed = self.cells[pos].row() == 0
            || self.cells[pos]
                .neighbors()
                .iter()
                .any(|&n| self.state_of(n) == FLOWING);
        if fed {
            self.write_pending(pos, FLOWING);
        }
    }
}
