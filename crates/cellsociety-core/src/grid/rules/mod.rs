//! One `impl Grid` block per rule family. Each module also names the cell
//! states its kind understands.

pub mod ant;
pub mod conway;
pub mod fire;
pub mod langton;
pub mod percolation;
pub mod predation;
pub mod sand;
pub mod segregation;
pub mod sugar;
