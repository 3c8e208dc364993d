pub mod cell;
pub mod config;
pub mod constants;
pub mod error;
pub mod grid;
pub mod layout;
pub mod metrics;
pub mod rng;
pub mod topology;

pub use cell::{CellSnapshot, CellType};
pub use config::{CellShape, SimConfig, SimulationKind};
pub use error::{EngineError, ExperimentError, InternalError, LayoutError};
pub use grid::{Grid, StepTimings};
pub use layout::Layout;
pub use metrics::{RunSummary, StepMetrics};
