//! # reelsim-core: Reel Slot Core
//!
//! Deterministic building blocks for reel slot games: a seekable ChaCha20
//! keystream, weighted symbol sampling, grid generation and win evaluation
//! for two game modes.
//!
//! ## Modes
//!
//! - **Flat**: 3 reels, one row, exact ordered-combination paytable
//! - **Payline**: reels × rows grid, straight and shaped paylines, wild
//!   substitution and a grid-wide bonus trigger
//!
//! ## Architecture
//!
//! ```text
//! EntropySource (ChaCha20: key, nonce, block counter)
//!     │  u32 words, little endian
//!     v
//! WeightedSampler (cumulative, lower bound)
//!     │
//!     ├── FlatGame ──── ComboPaytable ──────────→ FlatSpin
//!     │
//!     └── spin_grid → Grid
//!                      │
//!                      v
//!              PaylineEvaluator (lines, wild, bonus)
//!                      │
//!                      v
//!              PaylineGame ── BonusResolver ────→ PaylineSpin
//! ```
//!
//! Games are immutable and hold no entropy; every spin borrows the caller's
//! source. [`Session`] tracks a balance across spins as a plain value.

pub mod bonus;
pub mod config;
pub mod entropy;
pub mod error;
pub mod evaluate;
pub mod game;
pub mod grid;
pub mod payline;
pub mod paytable;
pub mod sampler;
pub mod session;
pub mod symbols;

pub use bonus::*;
pub use config::*;
pub use entropy::*;
pub use error::*;
pub use evaluate::*;
pub use game::*;
pub use grid::*;
pub use payline::*;
pub use paytable::*;
pub use sampler::*;
pub use session::*;
pub use symbols::*;
