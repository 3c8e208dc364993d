//! Plain-text layouts: whitespace-separated integers, one grid row per line.

use crate::cell::CellType;
use crate::error::LayoutError;
use crate::grid::Grid;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

/// Flat, row-major cell types together with the grid dimensions.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Layout {
    pub width: usize,
    pub height: usize,
    pub cells: Vec<i32>,
}

impl Layout {
    pub fn new(width: usize, height: usize, cells: Vec<i32>) -> Self {
        Self {
            width,
            height,
            cells,
        }
    }

    /// Parse one row per non-blank line. Every row must be as wide as the first.
    pub fn parse(text: &str) -> Result<Self, LayoutError> {
        let mut cells = Vec::new();
        let mut width = 0;
        let mut height = 0;
        for line in text.lines().filter(|l| !l.trim().is_empty()) {
            let mut row_len = 0;
            for token in line.split_whitespace() {
                let value = token.parse::<i32>().map_err(|_| LayoutError::InvalidToken {
                    row: height,
                    token: token.to_string(),
                })?;
                cells.push(value);
                row_len += 1;
            }
            if height == 0 {
                width = row_len;
            } else if row_len != width {
                return Err(LayoutError::RaggedRow {
                    row: height,
                    expected: width,
                    actual: row_len,
                });
            }
            height += 1;
        }
        if cells.is_empty() {
            return Err(LayoutError::Empty);
        }
        Ok(Self::new(width, height, cells))
    }

    /// Every cell drawn uniformly from `types`.
    pub fn random(
        width: usize,
        height: usize,
        types: &[CellType],
        rng: &mut impl Rng,
    ) -> Result<Self, LayoutError> {
        if types.is_empty() {
            return Err(LayoutError::NoCellTypes);
        }
        let cells = (0..width * height)
            .map(|_| i32::from(types[rng.random_range(0..types.len())]))
            .collect();
        Ok(Self::new(width, height, cells))
    }

    /// Capture the committed states of a grid.
    pub fn from_grid(grid: &Grid) -> Self {
        let cells = grid.cells().iter().map(|c| i32::from(c.state())).collect();
        Self::new(grid.width(), grid.height(), cells)
    }

    /// Inverse of [`Layout::parse`]: a line break after every `width` values.
    pub fn render(&self) -> String {
        let mut out = String::with_capacity(self.cells.len() * 2);
        for row in self.cells.chunks(self.width.max(1)) {
            for (i, value) in row.iter().enumerate() {
                if i > 0 {
                    out.push(' ');
                }
                let _ = write!(out, "{value}");
            }
            out.push('\n');
        }
        out
    }
}
