//! Evolutionary search over flat parameter vectors.
//!
//! Currently one strategy is implemented: the Cross-Entropy Method behind an
//! ask/tell interface, so other distribution-based optimizers can be dropped
//! in later.

pub mod cem;

pub use cem::{Cem, CemConfig};
