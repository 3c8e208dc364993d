use crate::cell::CellType;
use crate::constants::{MAX_SHARK_ENERGY, MAX_SUGAR};
use crate::error::EngineError;
use serde::{Deserialize, Serialize};

/// Which rule family builds and steps the cells of a grid.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SimulationKind {
    #[default]
    Conway,
    Fire,
    Segregation,
    Predation,
    Percolation,
    Sand,
    SugarScape,
    Ant,
    Langton,
}

impl SimulationKind {
    pub const ALL: [SimulationKind; 9] = [
        SimulationKind::Conway,
        SimulationKind::Fire,
        SimulationKind::Segregation,
        SimulationKind::Predation,
        SimulationKind::Percolation,
        SimulationKind::Sand,
        SimulationKind::SugarScape,
        SimulationKind::Ant,
        SimulationKind::Langton,
    ];

    /// Map the numeric id used by layout files (1-based) to a kind.
    pub fn from_id(id: i32) -> Result<Self, EngineError> {
        usize::try_from(id)
            .ok()
            .and_then(|i| i.checked_sub(1))
            .and_then(|i| Self::ALL.get(i).copied())
            .ok_or(EngineError::UnknownSimulationKind(id))
    }

    pub fn id(self) -> i32 {
        Self::ALL
            .iter()
            .position(|k| *k == self)
            .map_or(0, |i| i as i32 + 1)
    }

    /// Largest cell type a layout may contain for this kind. Every kind starts at 0.
    pub fn max_state(self) -> CellType {
        match self {
            SimulationKind::Conway => 1,
            SimulationKind::Fire
            | SimulationKind::Predation
            | SimulationKind::Percolation
            | SimulationKind::SugarScape => 2,
            SimulationKind::Sand | SimulationKind::Ant => 3,
            SimulationKind::Langton => 7,
            SimulationKind::Segregation => crate::constants::MAX_SEGREGATION_GROUPS,
        }
    }

    /// Convert a raw layout value into a cell type, if the kind knows it.
    pub fn accepts(self, value: i32) -> Option<CellType> {
        CellType::try_from(value)
            .ok()
            .filter(|state| *state <= self.max_state())
    }
}

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CellShape {
    #[default]
    Rectangular,
    /// Offset-column hexagons. Only Conway reads a different adjacency from this.
    Hexagonal,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Deterministic seed for every probabilistic choice in a run.
    pub seed: u64,
    /// Rule family used to build cells from the layout.
    pub kind: SimulationKind,
    /// Cell geometry reported by the loader.
    pub shape: CellShape,
    /// Percent-scale rule parameter: catch probability for fire,
    /// similarity threshold for segregation. Ignored by the other kinds.
    pub parameter: f64,
    /// Ticks a fish must survive before leaving an offspring behind.
    pub fish_breed_cycle: u32,
    /// Ticks a shark must survive before leaving an offspring behind.
    pub shark_breed_cycle: u32,
    /// Energy of a shark placed by the layout or born as offspring.
    pub shark_initial_energy: i32,
    /// Energy a shark is left with right after eating one fish.
    pub shark_energy_per_fish: i32,
    /// Sugar added to a patch at every growback.
    pub sugar_growback_rate: u32,
    /// Ticks between two growbacks of the same patch.
    pub sugar_growback_interval: u32,
    /// Upper bound of sugar held by one patch.
    pub sugar_limit: u32,
    /// Sugar reserve of an agent placed by the layout.
    pub agent_initial_sugar: i32,
    /// Sugar burned by an agent on every move.
    pub agent_metabolism: i32,
    /// How many cells an agent sees along each cardinal direction.
    pub agent_vision: usize,
    /// Saturation level of both pheromone channels.
    pub pheromone_max: u32,
    /// Per-tick decay of the home pheromone channel.
    pub home_pheromone_evaporation: u32,
    /// Per-tick decay of the food pheromone channel.
    pub food_pheromone_evaporation: u32,
    /// Baseline weight added to every candidate's pheromone level.
    pub pheromone_significance: u32,
    /// Ants a single cell can hold.
    pub max_ants_per_cell: usize,
    /// Chance per tick that a nest cell spawns one ant.
    pub ant_spawn_probability: f64,
    /// Moves an ant makes before it dies.
    pub ant_lifespan: u32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            kind: SimulationKind::Conway,
            shape: CellShape::Rectangular,
            parameter: 50.0,
            fish_breed_cycle: 5,
            shark_breed_cycle: 5,
            shark_initial_energy: 3,
            shark_energy_per_fish: 2,
            sugar_growback_rate: 2,
            sugar_growback_interval: 3,
            sugar_limit: 8,
            agent_initial_sugar: 10,
            agent_metabolism: 2,
            agent_vision: 3,
            pheromone_max: 10,
            home_pheromone_evaporation: 2,
            food_pheromone_evaporation: 2,
            pheromone_significance: 1,
            max_ants_per_cell: 4,
            ant_spawn_probability: 0.3,
            ant_lifespan: 100,
        }
    }
}

macro_rules! define_sim_config_error {
    (
        $(
            $variant:ident $( { $($field:ident : $type:ty),* } )? => $fmt:literal $(, $arg:expr)*
        );* $(;)?
    ) => {
        #[derive(Debug, Clone, PartialEq)]
        pub enum SimConfigError {
            $(
                $variant $( { $($field : $type),* } )?,
            )*
        }

        impl std::fmt::Display for SimConfigError {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                match self {
                    $(
                        Self::$variant $( { $($field),* } )? => write!(f, $fmt $(, $arg)*),
                    )*
                }
            }
        }
    };
}

define_sim_config_error! {
    InvalidParameter { actual: f64 } => "parameter ({}) must be finite and within [0,100]", actual;
    InvalidFishBreedCycle => "fish_breed_cycle must be positive";
    InvalidSharkBreedCycle => "shark_breed_cycle must be positive";
    InvalidSharkInitialEnergy { max: i32, actual: i32 } => "shark_initial_energy ({}) must be within [1,{}]", actual, max;
    InvalidSharkEnergyPerFish { max: i32, actual: i32 } => "shark_energy_per_fish ({}) must be within [1,{}]", actual, max;
    InvalidSugarGrowbackInterval => "sugar_growback_interval must be positive";
    InvalidSugarGrowbackRate { max: u32, actual: u32 } => "sugar_growback_rate ({}) must not exceed {}", actual, max;
    InvalidSugarLimit { max: u32, actual: u32 } => "sugar_limit ({}) must be within [1,{}]", actual, max;
    InvalidAgentInitialSugar { max: i32, actual: i32 } => "agent_initial_sugar ({}) must be within [1,{}]", actual, max;
    InvalidAgentMetabolism { max: i32, actual: i32 } => "agent_metabolism ({}) must be within [0,{}]", actual, max;
    InvalidAgentVision { max: usize, actual: usize } => "agent_vision ({}) must be within [1,{}]", actual, max;
    InvalidPheromoneMax => "pheromone_max must be positive";
    InvalidPheromoneEvaporation => "pheromone evaporation rates must not exceed pheromone_max";
    InvalidMaxAntsPerCell => "max_ants_per_cell must be positive";
    InvalidAntSpawnProbability => "ant_spawn_probability must be finite and within [0,1]";
    InvalidAntLifespan => "ant_lifespan must be positive";
}

impl std::error::Error for SimConfigError {}

impl SimConfig {
    pub const MAX_AGENT_VISION: usize = 64;

    pub fn validate(&self) -> Result<(), SimConfigError> {
        self.validate_parameter()?;
        self.validate_predation()?;
        self.validate_sugar()?;
        self.validate_ants()?;
        Ok(())
    }

    fn validate_parameter(&self) -> Result<(), SimConfigError> {
        if !(self.parameter.is_finite() && (0.0..=100.0).contains(&self.parameter)) {
            return Err(SimConfigError::InvalidParameter {
                actual: self.parameter,
            });
        }
        Ok(())
    }

    fn validate_predation(&self) -> Result<(), SimConfigError> {
        if self.fish_breed_cycle == 0 {
            return Err(SimConfigError::InvalidFishBreedCycle);
        }
        if self.shark_breed_cycle == 0 {
            return Err(SimConfigError::InvalidSharkBreedCycle);
        }
        if !(1..=MAX_SHARK_ENERGY).contains(&self.shark_initial_energy) {
            return Err(SimConfigError::InvalidSharkInitialEnergy {
                max: MAX_SHARK_ENERGY,
                actual: self.shark_initial_energy,
            });
        }
        if !(1..=MAX_SHARK_ENERGY).contains(&self.shark_energy_per_fish) {
            return Err(SimConfigError::InvalidSharkEnergyPerFish {
                max: MAX_SHARK_ENERGY,
                actual: self.shark_energy_per_fish,
            });
        }
        Ok(())
    }

    fn validate_sugar(&self) -> Result<(), SimConfigError> {
        if self.sugar_growback_interval == 0 {
            return Err(SimConfigError::InvalidSugarGrowbackInterval);
        }
        if self.sugar_growback_rate > MAX_SUGAR {
            return Err(SimConfigError::InvalidSugarGrowbackRate {
                max: MAX_SUGAR,
                actual: self.sugar_growback_rate,
            });
        }
        if !(1..=MAX_SUGAR).contains(&self.sugar_limit) {
            return Err(SimConfigError::InvalidSugarLimit {
                max: MAX_SUGAR,
                actual: self.sugar_limit,
            });
        }
        let max_reserve = MAX_SUGAR as i32;
        if !(1..=max_reserve).contains(&self.agent_initial_sugar) {
            return Err(SimConfigError::InvalidAgentInitialSugar {
                max: max_reserve,
                actual: self.agent_initial_sugar,
            });
        }
        if !(0..=max_reserve).contains(&self.agent_metabolism) {
            return Err(SimConfigError::InvalidAgentMetabolism {
                max: max_reserve,
                actual: self.agent_metabolism,
            });
        }
        if self.agent_vision == 0 || self.agent_vision > Self::MAX_AGENT_VISION {
            return Err(SimConfigError::InvalidAgentVision {
                max: Self::MAX_AGENT_VISION,
                actual: self.agent_vision,
            });
        }
        Ok(())
    }

    fn validate_ants(&self) -> Result<(), SimConfigError> {
        if self.pheromone_max == 0 {
            return Err(SimConfigError::InvalidPheromoneMax);
        }
        if self.home_pheromone_evaporation > self.pheromone_max
            || self.food_pheromone_evaporation > self.pheromone_max
        {
            return Err(SimConfigError::InvalidPheromoneEvaporation);
        }
        if self.max_ants_per_cell == 0 {
            return Err(SimConfigError::InvalidMaxAntsPerCell);
        }
        if !(self.ant_spawn_probability.is_finite()
            && (0.0..=1.0).contains(&self.ant_spawn_probability))
        {
            return Err(SimConfigError::InvalidAntSpawnProbability);
        }
        if self.ant_lifespan == 0 {
            return Err(SimConfigError::InvalidAntLifespan);
        }
        Ok(())
    }
}
