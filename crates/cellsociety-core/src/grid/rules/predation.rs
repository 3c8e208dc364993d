use super::super::Grid;
use crate::cell::{CellData, CellType, Creature};
use rand::Rng;

pub const EMPTY: CellType = 0;
pub const FISH: CellType = 1;
pub const SHARK: CellType = 2;

impl Grid {
    fn creature(&self, pos: usize) -> Creature {
        match self.cells[pos].data() {
            CellData::Predation(c) => *c,
            _ => Creature::default(),
        }
    }

    fn set_creature(&mut self, pos: usize, creature: Creature) {
        if let CellData::Predation(c) = self.cells[pos].data_mut() {
            *c = creature;
        }
    }

    /// Neighbors that are empty now and that nobody has claimed this tick.
    fn free_water(&self, pos: usize) -> Vec<usize> {
        self.cells[pos]
            .neighbors()
            .iter()
            .copied()
            .filter(|&n| self.state_of(n) == EMPTY && self.pending_of(n) == EMPTY)
            .collect()
    }

    fn pick(&mut self, options: &[usize]) -> usize {
        options[self.rng.random_range(0..options.len())]
    }

    /// Move the organism at `from` into `to`. When the breed cycle has come
    /// round, an offspring stays behind at `from` and both start a new cycle.
    fn migrate(&mut self, from: usize, to: usize, species: CellType, mover: Creature, breed: u32) {
        let offspring = match species {
            SHARK => Creature {
                energy: self.config.shark_initial_energy,
                cycle: 0,
            },
            _ => Creature::default(),
        };
        if mover.cycle >= breed {
            self.set_creature(to, Creature { cycle: 0, ..mover });
            self.set_creature(from, offspring);
        } else {
            self.set_creature(to, mover);
            self.set_creature(from, Creature::default());
            self.write_pending(from, EMPTY);
        }
        self.write_pending(to, species);
        self.journal.mark_acted(to);
    }

    /// Wa-Tor step for one fish or shark. Cells that received an organism
    /// earlier in this tick have already acted and are skipped.
    pub(in crate::grid) fn decide_predation(&mut self, pos: usize) {
        if self.journal.has_acted(pos) {
            return;
        }
        match self.state_of(pos) {
            FISH => self.decide_fish(pos),
            SHARK => self.decide_shark(pos),
            _ => {}
        }
    }

    fn decide_fish(&mut self, pos: usize) {
        let mut fish = self.creature(pos);
        fish.cycle = fish.cycle.saturating_add(1);
        let free = self.free_water(pos);
        if free.is_empty() {
            self.set_creature(pos, fish);
            return;
        }
        let target = self.pick(&free);
        let breed = self.config.fish_breed_cycle;
        self.migrate(pos, target, FISH, fish, breed);
    }

    /// A meal restores the shark's energy and restarts its breed timer,
    /// unless the timer has come round this very tick.
    fn decide_shark(&mut self, pos: usize) {
        let mut shark = self.creature(pos);
        shark.cycle = shark.cycle.saturating_add(1);
        let breed = self.config.shark_breed_cycle;

        let prey: Vec<usize> = self.cells[pos]
            .neighbors()
            .iter()
            .copied()
            .filter(|&n| self.state_of(n) == FISH && self.pending_of(n) == FISH)
            .collect();
        let target = if !prey.is_empty() {
            shark.energy = self.config.shark_energy_per_fish;
            if shark.cycle < breed {
                shark.cycle = 0;
            }
            Some(self.pick(&prey))
        } else {
            shark.energy = shark.energy.saturating_sub(1);
            let free = self.free_water(pos);
            (!free.is_empty()).then(|| self.pick(&free))
        };

        if shark.energy <= 0 {
            self.set_creature(pos, Creature::default());
            self.write_pending(pos, EMPTY);
            return;
        }
        match target {
            Some(target) => self.migrate(pos, target, SHARK, shark, breed),
            None => self.set_creature(pos, shark),
        }
    }
}
