//! Splitting a run into per-worker partitions

use serde::{Deserialize, Serialize};

/// A contiguous range of spin indices owned by one worker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Partition {
    pub index: usize,
    /// Global index of the first spin
    pub start: u64,
    pub spins: u64,
}

impl Partition {
    pub fn end(&self) -> u64 {
        self.start + self.spins
    }
}

/// Split `total` spins over `workers` partitions as evenly as possible; the
/// first `total % workers` partitions take one extra spin.
pub fn plan(total: u64, workers: usize) -> Vec<Partition> {
    if workers == 0 {
        return Vec::new();
    }
    let base = total / workers as u64;
    let extra = total % workers as u64;
    let mut start = 0;
    (0..workers)
        .map(|index| {
            let spins = base + u64::from((index as u64) < extra);
            let part = Partition { index, start, spins };
            start += spins;
            part
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_even_split_remainder_first() {
        let parts = plan(10, 4);
        let sizes: Vec<u64> = parts.iter().map(|p| p.spins).collect();
        assert_eq!(sizes, vec![3, 3, 2, 2]);
        assert_eq!(parts[2].start, 6);
        assert_eq!(parts[3].end(), 10);
    }

    #[test]
    fn test_partitions_are_contiguous() {
        for (total, workers) in [(0, 3), (1, 8), (1_000_003, 7)] {
            let parts = plan(total, workers);
            assert_eq!(parts.len(), workers);
            assert_eq!(parts.iter().map(|p| p.spins).sum::<u64>(), total);
            for pair in parts.windows(2) {
                assert_eq!(pair[0].end(), pair[1].start);
            }
        }
    }

    #[test]
    fn test_no_workers() {
        assert!(plan(5, 0).is_empty());
    }
}
