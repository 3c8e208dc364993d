/// Largest supported grid edge, in cells. Keeps `width * height` far from `usize` overflow
/// and bounds the per-tick cost of the quadratic segregation search.
pub const MAX_GRID_DIMENSION: usize = 4096;

/// Highest group id a segregation layout may use (0 is the empty state).
pub const MAX_SEGREGATION_GROUPS: u8 = 9;

/// Interior edge length of a Langton loop, sheath excluded.
pub const LOOP_SIDE_LENGTH: usize = 5;

/// Empty cells left between a parent loop and the bridge of its child.
pub const LOOP_SPACING: usize = 1;

/// Ticks a junction program runs before it goes dormant.
pub const LOOP_PROGRAM_TICKS: u32 = 19;

/// Tick on which the branch is severed from the parent loop.
pub const LOOP_SEVER_TICK: u32 = 16;

/// The branch turns left on every tick divisible by this.
pub const LOOP_TURN_EVERY: u32 = 4;

/// Upper bound of every shark energy tunable.
pub const MAX_SHARK_ENERGY: i32 = 1_000_000;

/// Upper bound of patch sugar, growback and agent reserve tunables.
pub const MAX_SUGAR: u32 = 1_000_000;

/// Longest experiment `Grid::try_run_experiment` accepts, in ticks.
pub const MAX_EXPERIMENT_STEPS: usize = 1_000_000;

/// Most samples one experiment may record.
pub const MAX_EXPERIMENT_SAMPLES: usize = 50_000;
