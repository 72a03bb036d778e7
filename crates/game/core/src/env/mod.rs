//! Injected capabilities the rules engine consumes but does not own.
//!
//! Today that is the randomness source: a deterministic, seed-addressed
//! oracle with a scripted variant for reproducible tests.

mod rng;

pub use rng::{PcgRng, RngOracle, SequenceRng, compute_seed};
