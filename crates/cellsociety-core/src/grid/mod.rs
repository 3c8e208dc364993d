use crate::cell::{AntCell, Cell, CellData, CellSnapshot, CellType, Creature, LangtonCell};
use crate::cell::{SugarAgent, SugarPatch};
use crate::config::{CellShape, SimConfig, SimulationKind};
use crate::constants::{MAX_EXPERIMENT_SAMPLES, MAX_EXPERIMENT_STEPS, MAX_GRID_DIMENSION};
use crate::error::{EngineError, ExperimentError};
use crate::layout::Layout;
use crate::metrics::{RunSummary, StepMetrics};
use crate::rng::create_rng;
use crate::topology::{self, Neighborhood};
use rand_chacha::ChaCha12Rng;
use std::collections::BTreeMap;
use std::time::Instant;
use tracing::{info, trace, warn};

mod journal;
pub mod rules;

use journal::Journal;
use rules::{predation, sand, sugar};

#[derive(Clone, Debug)]
pub struct StepTimings {
    pub decide_us: u64,
    pub commit_us: u64,
    pub total_us: u64,
    pub changed_cells: usize,
}

/// A bounded, row-major lattice of cells stepped by one rule family.
pub struct Grid {
    cells: Vec<Cell>,
    width: usize,
    height: usize,
    config: SimConfig,
    rng: ChaCha12Rng,
    tick: u64,
    journal: Journal,
}

impl Grid {
    pub fn new(layout: &Layout, config: SimConfig) -> Result<Self, EngineError> {
        config.validate()?;
        let (width, height) = (layout.width, layout.height);
        if width == 0 || height == 0 {
            return Err(EngineError::ZeroDimension { width, height });
        }
        let largest = width.max(height);
        if largest > MAX_GRID_DIMENSION {
            return Err(EngineError::DimensionTooLarge {
                max: MAX_GRID_DIMENSION,
                actual: largest,
            });
        }
        let expected = width * height;
        if layout.cells.len() != expected {
            return Err(EngineError::LayoutLength {
                expected,
                actual: layout.cells.len(),
            });
        }
        if config.shape == CellShape::Hexagonal && config.kind != SimulationKind::Conway {
            warn!(
                kind = ?config.kind,
                "hexagonal shape only changes Conway adjacency; using rectangular neighbors"
            );
        }

        let mut grid = Self {
            cells: Vec::with_capacity(expected),
            width,
            height,
            rng: create_rng(config.seed),
            config,
            tick: 0,
            journal: Journal::default(),
        };
        for (position, &value) in layout.cells.iter().enumerate() {
            let kind = grid.config.kind;
            let state = kind.accepts(value).ok_or(EngineError::UnknownCellType {
                position,
                value,
                kind,
            })?;
            let data = grid.initial_data(position, state);
            grid.place(Cell::new(position, width, state, data));
        }
        grid.resolve_neighbors();

        info!(
            kind = ?grid.config.kind,
            width,
            height,
            seed = grid.config.seed,
            "grid constructed"
        );
        Ok(grid)
    }

    /// Append a cell in row-major order.
    fn place(&mut self, cell: Cell) {
        debug_assert_eq!(cell.position(), self.cells.len());
        self.cells.push(cell);
    }

    fn initial_data(&self, position: usize, state: CellType) -> CellData {
        let config = &self.config;
        match config.kind {
            SimulationKind::Predation => CellData::Predation(match state {
                predation::SHARK => Creature {
                    energy: config.shark_initial_energy,
                    cycle: 0,
                },
                _ => Creature::default(),
            }),
            SimulationKind::SugarScape => CellData::Sugar(SugarPatch {
                sugar: u32::from(state).min(config.sugar_limit),
                limit: config.sugar_limit,
                growback_cycle: 0,
                agent: (state == sugar::AGENT).then_some(SugarAgent {
                    reserve: config.agent_initial_sugar,
                    metabolism: config.agent_metabolism,
                    vision: config.agent_vision,
                }),
            }),
            SimulationKind::Ant => CellData::Ant(AntCell {
                ants: Vec::new(),
                home_pheromone: 0,
                food_pheromone: 0,
                slots: topology::full_slots(self.width, self.height, position),
            }),
            SimulationKind::Langton => CellData::Langton(LangtonCell::default()),
            _ => CellData::None,
        }
    }

    /// Populate every neighbor cache once, from the construction-time states.
    fn resolve_neighbors(&mut self) {
        let (width, height) = (self.width, self.height);
        let scheme = match (self.config.kind, self.config.shape) {
            (SimulationKind::Conway, CellShape::Hexagonal) => Some(Neighborhood::HexMoore),
            (SimulationKind::Conway, _) | (SimulationKind::Segregation, _) => {
                Some(Neighborhood::Moore)
            }
            (SimulationKind::Fire, _)
            | (SimulationKind::Predation, _)
            | (SimulationKind::Langton, _) => Some(Neighborhood::VonNeumann),
            (SimulationKind::Percolation, _) => Some(Neighborhood::Percolation),
            (SimulationKind::Ant, _) => Some(Neighborhood::Moore),
            (SimulationKind::Sand, _) | (SimulationKind::SugarScape, _) => None,
        };
        for pos in 0..self.cells.len() {
            let neighbors = match scheme {
                Some(scheme) => scheme.resolve(width, height, pos),
                None if self.config.kind == SimulationKind::Sand => {
                    sand::falling_neighbors(width, height, pos, self.cells[pos].pending())
                }
                None => self.vision_of(pos),
            };
            self.cells[pos].set_neighbors(neighbors);
        }
    }

    /// Vision rays of the sugar agent at or moving into `pos`; empty for bare patches.
    fn vision_of(&self, pos: usize) -> Vec<usize> {
        match self.cells[pos].data() {
            CellData::Sugar(SugarPatch {
                agent: Some(agent), ..
            }) if self.cells[pos].pending() == sugar::AGENT => {
                topology::vision(self.width, self.height, pos, agent.vision)
            }
            _ => Vec::new(),
        }
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn kind(&self) -> SimulationKind {
        self.config.kind
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of committed ticks.
    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn total_cells(&self) -> usize {
        self.cells.len()
    }

    pub fn index_of(&self, cell: &Cell) -> usize {
        cell.position()
    }

    pub fn cell(&self, pos: usize) -> Option<&Cell> {
        self.cells.get(pos)
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn states(&self) -> Vec<CellType> {
        self.cells.iter().map(Cell::state).collect()
    }

    pub fn snapshot(&self) -> Vec<CellSnapshot> {
        self.cells.iter().map(Cell::snapshot).collect()
    }

    pub fn counts_by_state(&self) -> BTreeMap<CellType, usize> {
        let mut counts = BTreeMap::new();
        for cell in &self.cells {
            *counts.entry(cell.state()).or_insert(0) += 1;
        }
        counts
    }

    /// Run one decision pass over every cell in row-major order, then commit.
    ///
    /// An error leaves some pending states written; the grid should be
    /// discarded rather than stepped again.
    pub fn advance(&mut self) -> Result<StepTimings, EngineError> {
        let total_start = Instant::now();
        self.tick = self.tick.saturating_add(1);

        let t0 = Instant::now();
        for pos in 0..self.cells.len() {
            self.decide(pos)?;
        }
        let decide_us = t0.elapsed().as_micros() as u64;
        let foreign_writes = self.journal.foreign_writes();

        let t1 = Instant::now();
        let changed_cells = self.commit();
        let commit_us = t1.elapsed().as_micros() as u64;

        trace!(
            tick = self.tick,
            changed_cells,
            foreign_writes,
            "tick committed"
        );
        Ok(StepTimings {
            decide_us,
            commit_us,
            total_us: total_start.elapsed().as_micros() as u64,
            changed_cells,
        })
    }

    fn decide(&mut self, pos: usize) -> Result<(), EngineError> {
        match self.config.kind {
            SimulationKind::Conway => self.decide_conway(pos),
            SimulationKind::Fire => self.decide_fire(pos),
            SimulationKind::Segregation => self.decide_segregation(pos),
            SimulationKind::Predation => self.decide_predation(pos),
            SimulationKind::Percolation => self.decide_percolation(pos),
            SimulationKind::Sand => self.decide_sand(pos),
            SimulationKind::SugarScape => self.decide_sugar(pos),
            SimulationKind::Ant => self.decide_ant(pos),
            SimulationKind::Langton => self.decide_langton(pos)?,
        }
        Ok(())
    }

    /// Promote every pending state and forget the tick's journal.
    /// Returns how many cells changed their visible state.
    pub fn commit(&mut self) -> usize {
        let changed = self
            .cells
            .iter_mut()
            .map(Cell::commit)
            .filter(|&changed| changed)
            .count();
        self.journal.clear();
        changed
    }

    pub fn run_experiment(&mut self, steps: usize, sample_every: usize) -> RunSummary {
        self.try_run_experiment(steps, sample_every)
            .unwrap_or_else(|e| panic!("{e}"))
    }

    pub fn try_run_experiment(
        &mut self,
        steps: usize,
        sample_every: usize,
    ) -> Result<RunSummary, ExperimentError> {
        if sample_every == 0 {
            return Err(ExperimentError::InvalidSampleEvery);
        }
        if steps > MAX_EXPERIMENT_STEPS {
            return Err(ExperimentError::TooManySteps {
                max: MAX_EXPERIMENT_STEPS,
                actual: steps,
            });
        }
        // Every full interval plus a trailing partial one.
        let sample_count = steps.div_ceil(sample_every);
        if sample_count > MAX_EXPERIMENT_SAMPLES {
            return Err(ExperimentError::TooManySamples {
                max: MAX_EXPERIMENT_SAMPLES,
                actual: sample_count,
            });
        }

        let mut samples = Vec::with_capacity(sample_count);
        for step in 1..=steps {
            let timings = self.advance().map_err(|source| ExperimentError::Engine {
                tick: self.tick,
                source,
            })?;
            if step % sample_every == 0 || step == steps {
                samples.push(StepMetrics {
                    tick: self.tick,
                    counts: self.counts_by_state(),
                    changed_cells: timings.changed_cells,
                });
            }
        }
        Ok(RunSummary {
            schema_version: 1,
            kind: self.config.kind,
            steps,
            sample_every,
            samples,
            final_counts: self.counts_by_state(),
        })
    }

    fn state_of(&self, pos: usize) -> CellType {
        self.cells[pos].state()
    }

    fn pending_of(&self, pos: usize) -> CellType {
        self.cells[pos].pending()
    }

    fn write_pending(&mut self, pos: usize, state: CellType) {
        self.cells[pos].set_pending(state);
    }
}
