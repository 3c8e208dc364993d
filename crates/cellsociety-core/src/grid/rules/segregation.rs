use super::super::Grid;
use crate::cell::CellType;
use rand::Rng;

pub const EMPTY: CellType = 0;

impl Grid {
    /// A resident whose share of like neighbors falls strictly below the
    /// threshold moves to a random cell that is still free after this tick.
    pub(in crate::grid) fn decide_segregation(&mut self, pos: usize) {
        let group = self.state_of(pos);
        if group == EMPTY {
            return;
        }
        let (same, occupied) = self.cells[pos]
            .neighbors()
            .iter()
            .map(|&n| self.state_of(n))
            .filter(|&s| s != EMPTY)
            .fold((0usize, 0usize), |(same, occupied), s| {
                (same + usize::from(s == group), occupied + 1)
            });
        if occupied == 0 {
            return;
        }
        let share = same as f64 / occupied as f64 * 100.0;
        if share >= self.config.parameter {
            return;
        }

        let vacancies: Vec<usize> = self
            .cells
            .iter()
            .filter(|c| c.pending() == EMPTY)
            .map(|c| c.position())
            .collect();
        if vacancies.is_empty() {
            return;
        }
        let target = vacancies[self.rng.random_range(0..vacancies.len())];
        self.write_pending(target, group);
        self.write_pending(pos, EMPTY);
    }
}
