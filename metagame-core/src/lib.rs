//! Metagame core - strategies, scoring, and genetic operators
//!
//! This crate provides the building blocks of the simulation:
//! - Validated pairwise scoring matrix
//! - Strategy representation (archetype identity + point distribution)
//! - Genetic operators (redistribution, crossover)
//! - Probabilistic match resolution

pub mod error;
pub mod matchup;
pub mod matrix;
pub mod strategy;

pub use error::MatrixError;
pub use matchup::{play_match, resolve_winner};
pub use matrix::{ScoringMatrix, MAX_BASE_POINTS};
pub use strategy::{Strategy, DEFAULT_CROSSOVER_ODDS, DEFAULT_MUTATION_ODDS};
