use crate::cell::LoopCorner;
use crate::config::{SimConfigError, SimulationKind};
use thiserror::Error;

/// Everything that can stop a grid from being built or stepped.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    #[error(transparent)]
    Config(#[from] SimConfigError),
    #[error("grid dimensions must be positive (got {width}x{height})")]
    ZeroDimension { width: usize, height: usize },
    #[error("grid dimension {actual} exceeds supported maximum ({max})")]
    DimensionTooLarge { max: usize, actual: usize },
    #[error("layout holds {actual} cells but width * height is {expected}")]
    LayoutLength { expected: usize, actual: usize },
    #[error("cell type {value} at position {position} is not valid for {kind:?}")]
    UnknownCellType {
        position: usize,
        value: i32,
        kind: SimulationKind,
    },
    #[error("simulation kind id {0} is outside the supported range 1..=9")]
    UnknownSimulationKind(i32),
    #[error("internal invariant violated: {0}")]
    Internal(#[from] InternalError),
}

/// Rule-internal invariant violations. These point at a layout the rule
/// cannot interpret, never at a recoverable condition.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InternalError {
    #[error("junction at {junction} matches no loop corner")]
    UnclassifiedCorner { junction: usize },
    #[error("junction at {junction} ({corner:?}) has no branch direction")]
    UnresolvedBranchDirection { junction: usize, corner: LoopCorner },
    #[error("loop program of junction {junction} stepped outside the grid")]
    OutsideGrid { junction: usize },
    #[error("branch of junction {junction} has {actual} cells, {required} are needed to sever it")]
    ShortBranch {
        junction: usize,
        actual: usize,
        required: usize,
    },
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExperimentError {
    #[error("sample_every must be positive")]
    InvalidSampleEvery,
    #[error("steps ({actual}) exceed supported maximum ({max})")]
    TooManySteps { max: usize, actual: usize },
    #[error("sample count ({actual}) exceeds supported maximum ({max})")]
    TooManySamples { max: usize, actual: usize },
    #[error("simulation failed at tick {tick}: {source}")]
    Engine { tick: u64, source: EngineError },
}

/// Problems reading the whitespace-separated layout text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    #[error("layout contains no cells")]
    Empty,
    #[error("row {row} has {actual} cells, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        actual: usize,
    },
    #[error("row {row} holds {token:?}, which is not an integer")]
    InvalidToken { row: usize, token: String },
    #[error("a random layout needs at least one cell type")]
    NoCellTypes,
}
