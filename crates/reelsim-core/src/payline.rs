//! Payline geometry

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};

/// One path through the grid: a (reel, row) coordinate per reel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payline {
    /// Payline index (0-based)
    pub index: usize,
    /// (reel, row) coordinates in scoring order
    pub cells: Vec<(usize, usize)>,
}

impl Payline {
    /// Row positions per reel, reel index implied by position
    pub fn from_rows(index: usize, rows: &[usize]) -> Self {
        Self {
            index,
            cells: rows.iter().copied().enumerate().collect(),
        }
    }

    /// Same row across all reels
    pub fn straight(index: usize, row: usize, reel_count: usize) -> Self {
        Self::from_rows(index, &vec![row; reel_count])
    }

    /// Descend from the top row towards the middle reel, then climb back.
    /// With zero rows every cell sits on row 0, which [`Self::validate`]
    /// rejects for that shape.
    pub fn v_shape(index: usize, rows: usize, reel_count: usize) -> Self {
        let positions: Vec<usize> = (0..reel_count)
            .map(|reel| v_depth(reel, rows, reel_count))
            .collect();
        Self::from_rows(index, &positions)
    }

    /// Mirror of [`Self::v_shape`] starting from the bottom row
    pub fn inverted_v(index: usize, rows: usize, reel_count: usize) -> Self {
        let bottom = rows.saturating_sub(1);
        let positions: Vec<usize> = (0..reel_count)
            .map(|reel| bottom - v_depth(reel, rows, reel_count))
            .collect();
        Self::from_rows(index, &positions)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Check length and bounds against a grid shape
    pub fn validate(&self, reels: usize, rows: usize) -> ConfigResult<()> {
        if self.cells.len() != reels {
            return Err(ConfigError::InvalidPayline {
                index: self.index,
                reason: format!("{} cells for {} reels", self.cells.len(), reels),
            });
        }
        if let Some(&(reel, row)) = self.cells.iter().find(|&&(reel, row)| reel >= reels || row >= rows) {
            return Err(ConfigError::InvalidPayline {
                index: self.index,
                reason: format!("cell ({reel}, {row}) outside a {reels}x{rows} grid"),
            });
        }
        Ok(())
    }
}

/// Distance from the top edge of a V at `reel`, clamped to the bottom row
fn v_depth(reel: usize, rows: usize, reel_count: usize) -> usize {
    let from_edge = reel.min(reel_count.saturating_sub(1).saturating_sub(reel));
    from_edge.min(rows.saturating_sub(1))
}

/// The ten lines of the 6×5 layout
pub fn six_by_five_paylines() -> Vec<Payline> {
    let rows: [[usize; 6]; 10] = [
        [0, 0, 0, 0, 0, 0],
        [1, 1, 1, 1, 1, 1],
        [2, 2, 2, 2, 2, 2],
        [3, 3, 3, 3, 3, 3],
        [4, 4, 4, 4, 4, 4],
        [0, 1, 2, 2, 1, 0],
        [4, 3, 2, 2, 3, 4],
        [0, 0, 1, 1, 0, 0],
        [4, 4, 3, 3, 4, 4],
        [2, 2, 1, 1, 2, 2],
    ];
    rows.iter()
        .enumerate()
        .map(|(i, r)| Payline::from_rows(i, r))
        .collect()
}

/// Default lines for a grid: the 6×5 set when it fits, otherwise one
/// straight line per row plus a V and an inverted V.
pub fn default_paylines(reels: usize, rows: usize) -> Vec<Payline> {
    if reels == 6 && rows == 5 {
        return six_by_five_paylines();
    }
    let mut lines: Vec<Payline> = (0..rows).map(|row| Payline::straight(row, row, reels)).collect();
    if rows >= 2 && reels >= 3 {
        lines.push(Payline::v_shape(lines.len(), rows, reels));
        lines.push(Payline::inverted_v(lines.len(), rows, reels));
    }
    lines
}

/// Validate a set of lines, rejecting an empty set
pub fn validate_paylines(lines: &[Payline], reels: usize, rows: usize) -> ConfigResult<()> {
    if lines.is_empty() {
        return Err(ConfigError::InvalidGeometry("no paylines configured".into()));
    }
    lines.iter().try_for_each(|l| l.validate(reels, rows))
}
