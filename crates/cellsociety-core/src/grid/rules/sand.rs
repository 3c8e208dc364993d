use super::super::Grid;
use crate::cell::CellType;
use crate::topology::{self, Fall};
use rand::Rng;

pub const EMPTY: CellType = 0;
pub const METAL: CellType = 1;
pub const SAND: CellType = 2;
pub const WATER: CellType = 3;

fn fall_of(material: CellType) -> Fall {
    match material {
        SAND => Fall::Straight,
        WATER => Fall::Spreading,
        _ => Fall::Rest,
    }
}

/// Neighbors a cell holding `material` may move into.
pub(in crate::grid) fn falling_neighbors(
    width: usize,
    height: usize,
    pos: usize,
    material: CellType,
) -> Vec<usize> {
    topology::falling(width, height, pos, fall_of(material))
}

impl Grid {
    fn is_unclaimed(&self, pos: usize, material: CellType) -> bool {
        self.state_of(pos) == material && self.pending_of(pos) == material
    }

    fn refresh_falling(&mut self, pos: usize) {
        let neighbors = falling_neighbors(self.width, self.height, pos, self.pending_of(pos));
        self.cells[pos].set_neighbors(neighbors);
    }

    /// Move `material` from `from` into `to`, leaving `left_behind` at the origin.
    fn shift_material(&mut self, from: usize, to: usize, material: CellType, left_behind: CellType) {
        self.write_pending(to, material);
        self.write_pending(from, left_behind);
        self.journal.mark_acted(to);
        self.refresh_falling(to);
        self.refresh_falling(from);
    }

    /// Sand drops straight down, sinking through water. Water drops when it
    /// can and otherwise spreads sideways. Metal never moves.
    pub(in crate::grid) fn decide_sand(&mut self, pos: usize) {
        if self.journal.has_acted(pos) {
            return;
        }
        self.refresh_falling(pos);
        let row = pos / self.width;
        let (below, lateral): (Vec<usize>, Vec<usize>) = self.cells[pos]
            .neighbors()
            .iter()
            .partition(|&&n| n / self.width > row);
        let below = below.first().copied();

        match self.pending_of(pos) {
            SAND => match below {
                Some(b) if self.is_unclaimed(b, EMPTY) => self.shift_material(pos, b, SAND, EMPTY),
                Some(b) if self.is_unclaimed(b, WATER) => self.shift_material(pos, b, SAND, WATER),
                _ => {}
            },
            WATER => {
                if let Some(b) = below.filter(|&b| self.is_unclaimed(b, EMPTY)) {
                    self.shift_material(pos, b, WATER, EMPTY);
                    return;
                }
                let sideways: Vec<usize> = lateral
                    .into_iter()
                    .filter(|&n| self.is_unclaimed(n, EMPTY))
                    .collect();
                if !sideways.is_empty() {
                    let target = sideways[self.rng.random_range(0..sideways.len())];
                    self.shift_material(pos, target, WATER, EMPTY);
                }
            }
            _ => {}
        }
    }
}
