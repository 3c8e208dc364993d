use super::super::Grid;
use crate::cell::CellType;

pub const DEAD: CellType = 0;
pub const ALIVE: CellType = 1;

impl Grid {
    /// Birth on exactly three live neighbors, survival on two or three.
    pub(in crate::grid) fn decide_conway(&mut self, pos: usize) {
        let alive = self.cells[pos]
            .neighbors()
            .iter()
            .filter(|&&n| self.state_of(n) == ALIVE)
            .count();
        match alive {
            2 => {}
            3 => self.write_pending(pos, ALIVE),
            _ => self.write_pending(pos, DEAD),
        }
    }
}
