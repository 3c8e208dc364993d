//! Neighbor resolution on a bounded, row-major grid.
//!
//! Every function here is pure: it maps `(width, height, position)` to an
//! ordered list of neighbor positions. Boundaries never wrap, so edge cells
//! always get fewer neighbors than interior ones. The order of each list is
//! part of the contract because several rules pick "the first" or "a random
//! index" from it.

use serde::{Deserialize, Serialize};

/// One of the eight compass directions, listed clockwise from north.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    N,
    NE,
    E,
    SE,
    S,
    SW,
    W,
    NW,
}

impl Direction {
    pub const CLOCKWISE: [Direction; 8] = [
        Direction::N,
        Direction::NE,
        Direction::E,
        Direction::SE,
        Direction::S,
        Direction::SW,
        Direction::W,
        Direction::NW,
    ];

    /// Fixed slot order used by [`full_slots`]: N, E, S, W, NE, SE, SW, NW.
    pub const SLOT_ORDER: [Direction; 8] = [
        Direction::N,
        Direction::E,
        Direction::S,
        Direction::W,
        Direction::NE,
        Direction::SE,
        Direction::SW,
        Direction::NW,
    ];

    /// `(row, col)` step of this direction.
    pub fn delta(self) -> (isize, isize) {
        match self {
            Direction::N => (-1, 0),
            Direction::NE => (-1, 1),
            Direction::E => (0, 1),
            Direction::SE => (1, 1),
            Direction::S => (1, 0),
            Direction::SW => (1, -1),
            Direction::W => (0, -1),
            Direction::NW => (-1, -1),
        }
    }

    /// Index of this direction inside a [`full_slots`] table.
    pub fn slot(self) -> usize {
        match self {
            Direction::N => 0,
            Direction::E => 1,
            Direction::S => 2,
            Direction::W => 3,
            Direction::NE => 4,
            Direction::SE => 5,
            Direction::SW => 6,
            Direction::NW => 7,
        }
    }

    pub fn from_slot(slot: usize) -> Option<Direction> {
        Self::SLOT_ORDER.get(slot).copied()
    }

    fn clockwise_index(self) -> usize {
        self as usize
    }

    /// Rotate 45 degrees counter-clockwise.
    pub fn left(self) -> Direction {
        Self::CLOCKWISE[(self.clockwise_index() + 7) % 8]
    }

    /// Rotate 45 degrees clockwise.
    pub fn right(self) -> Direction {
        Self::CLOCKWISE[(self.clockwise_index() + 1) % 8]
    }

    /// Forward-left, forward, forward-right.
    pub fn forward_fan(self) -> [Direction; 3] {
        [self.left(), self, self.right()]
    }
}

/// Step from `pos` in `(dr, dc)`; `None` when the step leaves the grid.
pub fn offset(width: usize, height: usize, pos: usize, dr: isize, dc: isize) -> Option<usize> {
    let row = (pos / width).checked_add_signed(dr)?;
    let col = (pos % width).checked_add_signed(dc)?;
    (row < height && col < width).then_some(row * width + col)
}

pub fn step(width: usize, height: usize, pos: usize, dir: Direction) -> Option<usize> {
    let (dr, dc) = dir.delta();
    offset(width, height, pos, dr, dc)
}

fn collect(width: usize, height: usize, pos: usize, dirs: &[Direction]) -> Vec<usize> {
    dirs.iter()
        .filter_map(|&d| step(width, height, pos, d))
        .collect()
}

/// Static adjacency schemes resolved once at construction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Neighborhood {
    /// N, E, S, W.
    VonNeumann,
    /// N, E, S, W, NE, SE, SW, NW.
    Moore,
    /// NW, NE, S, W, E: the hexagonal adjacency laid over the rectangular array.
    HexMoore,
    /// N, W, E. Flow never reads from below.
    Percolation,
}

impl Neighborhood {
    pub fn directions(self) -> &'static [Direction] {
        match self {
            Neighborhood::VonNeumann => &[Direction::N, Direction::E, Direction::S, Direction::W],
            Neighborhood::Moore => &Direction::SLOT_ORDER,
            Neighborhood::HexMoore => &[
                Direction::NW,
                Direction::NE,
                Direction::S,
                Direction::W,
                Direction::E,
            ],
            Neighborhood::Percolation => &[Direction::N, Direction::W, Direction::E],
        }
    }

    pub fn resolve(self, width: usize, height: usize, pos: usize) -> Vec<usize> {
        collect(width, height, pos, self.directions())
    }
}

/// Moore geometry with explicit holes at the boundary, in [`Direction::SLOT_ORDER`].
pub fn full_slots(width: usize, height: usize, pos: usize) -> [Option<usize>; 8] {
    Direction::SLOT_ORDER.map(|d| step(width, height, pos, d))
}

/// What a falling-material cell is about to hold.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Fall {
    /// Only the cell directly below.
    Straight,
    /// Below, then west, then east.
    Spreading,
    /// Static or empty cells look nowhere.
    Rest,
}

pub fn falling(width: usize, height: usize, pos: usize, fall: Fall) -> Vec<usize> {
    match fall {
        Fall::Straight => collect(width, height, pos, &[Direction::S]),
        Fall::Spreading => collect(width, height, pos, &[Direction::S, Direction::W, Direction::E]),
        Fall::Rest => Vec::new(),
    }
}

/// Cardinal rays out to `radius`, nearest ring first; each ring is N, W, S, E.
pub fn vision(width: usize, height: usize, pos: usize, radius: usize) -> Vec<usize> {
    let mut out = Vec::with_capacity(radius * 4);
    for reach in 1..=radius as isize {
        for (dr, dc) in [(-reach, 0), (0, -reach), (reach, 0), (0, reach)] {
            if let Some(n) = offset(width, height, pos, dr, dc) {
                out.push(n);
            }
        }
    }
    out
}
