//! Metagame evolution - the population engine
//!
//! This crate drives the generational loop over strategies from
//! `metagame-core`:
//! - Fitness evaluation against the whole live population
//! - Per-archetype elite preservation
//! - Fitness-weighted reproduction through probabilistic matches
//! - Append-only per-archetype statistics (playrate, winrate, podium, top-1)

mod error;
mod generation;
mod stats;

pub use error::EngineError;
pub use generation::{
    EvolutionParams, Generation, DEFAULT_PODIUM_SIZE, DEFAULT_SURVIVAL_FRACTION,
};
pub use stats::{Bounds, MetaStats};
