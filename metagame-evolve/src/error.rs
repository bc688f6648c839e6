//! Engine construction errors

use thiserror::Error;

/// Fatal problems detected when building a population engine.
#[derive(Debug, Error, PartialEq)]
pub enum EngineError {
    /// The population cannot absorb worst-case elite quotas: with every
    /// archetype alive, per-archetype ceiling quotas could exceed the
    /// population size and the next generation would overflow.
    #[error(
        "population of {pop_size} is too small for {n_arch} archetypes \
         at survival fraction {survival_fraction}"
    )]
    PopulationTooSmall {
        pop_size: usize,
        n_arch: usize,
        survival_fraction: f64,
    },
}
