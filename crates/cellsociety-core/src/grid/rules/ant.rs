use super::super::Grid;
use crate::cell::{Ant, AntCell, CellData, CellType};
use crate::topology::Direction;
use rand::Rng;

pub const EMPTY: CellType = 0;
pub const FOOD: CellType = 1;
pub const NEST: CellType = 2;
pub const BARRIER: CellType = 3;

/// Roulette-wheel pick over integer weights; uniform when every weight is zero.
fn roulette(rng: &mut impl Rng, weights: &[u32]) -> usize {
    let total: u64 = weights.iter().map(|&w| u64::from(w)).sum();
    if total == 0 {
        return rng.random_range(0..weights.len());
    }
    let mut roll = rng.random_range(0..total);
    for (i, &w) in weights.iter().enumerate() {
        let w = u64::from(w);
        if roll < w {
            return i;
        }
        roll -= w;
    }
    weights.len() - 1
}

impl Grid {
    fn ant_cell(&self, pos: usize) -> Option<&AntCell> {
        match self.cells[pos].data() {
            CellData::Ant(c) => Some(c),
            _ => None,
        }
    }

    fn ant_cell_mut(&mut self, pos: usize) -> Option<&mut AntCell> {
        match self.cells[pos].data_mut() {
            CellData::Ant(c) => Some(c),
            _ => None,
        }
    }

    /// Moves open to an ant heading `heading` from `pos`. Away from food and
    /// nest it looks ahead first; otherwise, or when nothing ahead is open,
    /// it considers the whole Moore neighborhood.
    fn ant_moves(&self, pos: usize, heading: Direction) -> Vec<(Direction, usize)> {
        let Some(slots) = self.ant_cell(pos).map(|c| c.slots) else {
            return Vec::new();
        };
        let capacity = self.config.max_ants_per_cell;
        let open = |d: Direction| {
            slots[d.slot()]
                .filter(|&n| {
                    self.state_of(n) != BARRIER
                        && self.ant_cell(n).is_some_and(|c| c.ants.len() < capacity)
                })
                .map(|n| (d, n))
        };
        let origin = self.state_of(pos);
        let mut moves = Vec::new();
        if origin != FOOD && origin != NEST {
            moves = heading.forward_fan().into_iter().filter_map(&open).collect();
        }
        if moves.is_empty() {
            moves = Direction::SLOT_ORDER.into_iter().filter_map(&open).collect();
        }
        moves
    }

    /// Mark the origin so that ants searching for the other end can follow.
    fn deposit_pheromone(&mut self, pos: usize, carrying_food: bool, strongest_nearby: u32) {
        let max = self.config.pheromone_max;
        let origin = self.state_of(pos);
        let Some(cell) = self.ant_cell_mut(pos) else {
            return;
        };
        let goal = strongest_nearby.saturating_sub(2).min(max);
        match origin {
            FOOD => cell.food_pheromone = max,
            NEST => cell.home_pheromone = max,
            _ if carrying_food => cell.home_pheromone = cell.home_pheromone.max(goal),
            _ => cell.food_pheromone = cell.food_pheromone.max(goal),
        }
    }

    /// Move every resident ant that has not moved yet this tick, let a nest
    /// spawn, then evaporate both pheromone channels.
    pub(in crate::grid) fn decide_ant(&mut self, pos: usize) {
        let tick = self.tick;
        let Some(cell) = self.ant_cell_mut(pos) else {
            return;
        };
        let residents = std::mem::take(&mut cell.ants);
        let mut staying = Vec::with_capacity(residents.len());

        for mut ant in residents {
            if ant.last_moved_tick == Some(tick) {
                staying.push(ant);
                continue;
            }
            let moves = self.ant_moves(pos, ant.heading);
            if moves.is_empty() {
                staying.push(ant);
                continue;
            }
            let levels: Vec<u32> = moves
                .iter()
                .map(|&(_, n)| {
                    self.ant_cell(n)
                        .map_or(0, |c| c.pheromone(ant.carrying_food))
                })
                .collect();
            let weights: Vec<u32> = levels
                .iter()
                .map(|&l| l.saturating_add(self.config.pheromone_significance))
                .collect();
            let (heading, target) = moves[roulette(&mut self.rng, &weights)];
            let strongest = levels.iter().copied().max().unwrap_or(0);
            self.deposit_pheromone(pos, ant.carrying_food, strongest);

            ant.heading = heading;
            match self.state_of(target) {
                FOOD => ant.carrying_food = true,
                NEST => ant.carrying_food = false,
                _ => {}
            }
            ant.remaining_life = ant.remaining_life.saturating_sub(1);
            ant.last_moved_tick = Some(tick);
            if ant.remaining_life > 0 {
                if let Some(dest) = self.ant_cell_mut(target) {
                    dest.ants.push(ant);
                }
            }
        }

        if self.state_of(pos) == NEST && staying.len() < self.config.max_ants_per_cell {
            let roll: f64 = self.rng.random();
            if roll < self.config.ant_spawn_probability {
                let heading = Direction::CLOCKWISE[self.rng.random_range(0..8)];
                staying.push(Ant {
                    heading,
                    carrying_food: false,
                    remaining_life: self.config.ant_lifespan,
                    last_moved_tick: None,
                });
            }
        }

        let home_decay = self.config.home_pheromone_evaporation;
        let food_decay = self.config.food_pheromone_evaporation;
        if let Some(cell) = self.ant_cell_mut(pos) {
            cell.ants = staying;
            cell.home_pheromone = cell.home_pheromone.saturating_sub(home_decay);
            cell.food_pheromone = cell.food_pheromone.saturating_sub(food_decay);
        }
    }
}
