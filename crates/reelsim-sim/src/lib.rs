//! # reelsim-sim: Parallel RTP Simulator
//!
//! Monte-Carlo return-to-player estimation for any [`SpinModel`]
//! (`FlatGame` and `PaylineGame` out of the box).
//!
//! ## Architecture
//!
//! ```text
//! Simulator::estimate_rtp(spins, bet)
//!     │
//!     ├── plan() → Partition × workers (remainder to the first)
//!     │
//!     ├── rayon pool (one thread per worker)
//!     │     run_partition: own EntropySource, HitTally, PayoutSum
//!     │     CancelToken checked between spins, panics caught
//!     │
//!     └── single reduce pass in partition order
//!           │
//!           v
//!     SimulationResult (rtp, running RTP, hits, histogram)
//! ```
//!
//! With [`SeedStrategy::Fixed`] each spin's entropy depends only on the seed
//! and the spin's global index, and payouts are summed in integer
//! micro-stakes, so totals match exactly for any worker count and bet size.

pub mod config;
pub mod error;
pub mod model;
pub mod partition;
pub mod report;
pub mod simulator;
pub mod tally;
pub mod worker;

pub use config::*;
pub use error::*;
pub use model::*;
pub use partition::*;
pub use report::*;
pub use simulator::*;
pub use tally::*;
pub use worker::*;
