//! Reel grid generation

use serde::{Deserialize, Serialize};

use crate::entropy::{EntropyResult, EntropySource};
use crate::error::ConfigError;
use crate::sampler::WeightedSampler;
use crate::symbols::{SymbolId, SymbolSet};

/// Reels × rows symbol grid, stored column-major (reel by reel).
///
/// Always holds exactly `reels * rows` cells, deserialized grids included.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawGrid")]
pub struct Grid {
    reels: usize,
    rows: usize,
    cells: Vec<SymbolId>,
}

#[derive(Deserialize)]
struct RawGrid {
    reels: usize,
    rows: usize,
    cells: Vec<SymbolId>,
}

impl TryFrom<RawGrid> for Grid {
    type Error = ConfigError;

    fn try_from(raw: RawGrid) -> Result<Self, Self::Error> {
        let (reels, rows, len) = (raw.reels, raw.rows, raw.cells.len());
        Grid::from_cells(reels, rows, raw.cells).ok_or_else(|| {
            ConfigError::InvalidGeometry(format!("{len} cells for a {reels}x{rows} grid"))
        })
    }
}

impl Grid {
    /// Wrap column-major cells. Returns `None` if the shape does not match.
    pub fn from_cells(reels: usize, rows: usize, cells: Vec<SymbolId>) -> Option<Self> {
        let expected = reels.checked_mul(rows)?;
        (cells.len() == expected).then_some(Self { reels, rows, cells })
    }

    /// Build from `columns[reel][row]`
    pub fn from_columns(columns: &[Vec<SymbolId>]) -> Option<Self> {
        let rows = columns.first().map(Vec::len)?;
        if columns.iter().any(|c| c.len() != rows) {
            return None;
        }
        let cells = columns.iter().flatten().copied().collect();
        Some(Self {
            reels: columns.len(),
            rows,
            cells,
        })
    }

    pub fn reels(&self) -> usize {
        self.reels
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Symbol at (reel, row)
    pub fn get(&self, reel: usize, row: usize) -> Option<SymbolId> {
        if reel < self.reels && row < self.rows {
            self.cells.get(reel * self.rows + row).copied()
        } else {
            None
        }
    }

    /// Symbols of one reel, top to bottom
    pub fn reel(&self, reel: usize) -> Option<&[SymbolId]> {
        if reel < self.reels {
            self.cells.get(reel * self.rows..(reel + 1) * self.rows)
        } else {
            None
        }
    }

    /// All cells in fill order
    pub fn cells(&self) -> &[SymbolId] {
        &self.cells
    }

    /// Occurrences of a symbol anywhere on the grid
    pub fn count(&self, symbol: SymbolId) -> usize {
        self.cells.iter().filter(|&&s| s == symbol).count()
    }

    /// One text line per row, reels separated by spaces
    pub fn render(&self, symbols: &SymbolSet) -> String {
        let mut out = String::new();
        for row in 0..self.rows {
            let line = (0..self.reels)
                .map(|reel| symbols.name(self.cells[reel * self.rows + row]))
                .collect::<Vec<_>>()
                .join(" ");
            out.push_str(&line);
            out.push('\n');
        }
        out
    }
}

/// Spin a fresh grid.
///
/// Cells are filled column-major (reel 0 top to bottom, then reel 1, ...).
/// Each cell consumes its own 4-byte word from a single keystream draw, so no
/// two cells share entropy.
pub fn spin_grid(
    source: &mut EntropySource,
    sampler: &WeightedSampler,
    reels: usize,
    rows: usize,
) -> EntropyResult<Grid> {
    let mut words = vec![0u32; reels * rows];
    source.fill_u32(&mut words)?;
    Ok(Grid {
        reels,
        rows,
        cells: sampler.sample_batch(&words),
    })
}
