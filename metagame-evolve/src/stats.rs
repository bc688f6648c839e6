//! Per-archetype statistics accumulators
//!
//! Append-only bookkeeping recorded once per generation from the
//! fitness-ranked, pre-refill population. Everything here is read-only for
//! callers; downstream reporting and plotting layers consume these series
//! after the run ends.

use metagame_core::{ScoringMatrix, Strategy};
use serde::Serialize;

/// Running (min, max) of a per-archetype series.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Bounds {
    pub min: f64,
    pub max: f64,
}

impl Bounds {
    fn observe(slot: &mut Option<Bounds>, value: f64) {
        match slot {
            Some(bounds) => {
                bounds.min = bounds.min.min(value);
                bounds.max = bounds.max.max(value);
            }
            None => *slot = Some(Bounds { min: value, max: value }),
        }
    }
}

/// Statistics gathered over a whole run, keyed by archetype id.
///
/// Playrates are percentages of the population; winrates are mean fitness
/// fractions. Podium and top-1 credit accumulate raw counts and are
/// normalized by the number of recorded generations on read.
#[derive(Clone, Debug, Serialize)]
pub struct MetaStats {
    n_arch: usize,
    generations: usize,
    base_points: Vec<u32>,
    playrate: Vec<Vec<f64>>,
    winrate: Vec<Vec<f64>>,
    playrate_bounds: Vec<Option<Bounds>>,
    winrate_bounds: Vec<Option<Bounds>>,
    podium_credit: Vec<f64>,
    top1_credit: Vec<f64>,
}

impl MetaStats {
    pub(crate) fn new(matrix: &ScoringMatrix) -> Self {
        let n_arch = matrix.n_archetypes();
        Self {
            n_arch,
            generations: 0,
            base_points: (0..n_arch).map(|i| matrix.base_points(i)).collect(),
            playrate: vec![Vec::new(); n_arch],
            winrate: vec![Vec::new(); n_arch],
            playrate_bounds: vec![None; n_arch],
            winrate_bounds: vec![None; n_arch],
            podium_credit: vec![0.0; n_arch],
            top1_credit: vec![0.0; n_arch],
        }
    }

    /// Record one generation from the fitness-ranked population.
    ///
    /// An archetype with no live individuals gets a 0.0 winrate sample but
    /// no winrate bounds update, since there is nothing to measure.
    pub(crate) fn record(&mut self, ranked: &[Strategy], histogram: &[usize], podium_size: usize) {
        let pop_size = ranked.len();

        let mut fitness_sum = vec![0.0f64; self.n_arch];
        for strategy in ranked {
            fitness_sum[strategy.archetype_id()] += strategy.fitness();
        }

        for archetype in 0..self.n_arch {
            let playrate = histogram[archetype] as f64 / pop_size as f64 * 100.0;
            self.playrate[archetype].push(playrate);
            Bounds::observe(&mut self.playrate_bounds[archetype], playrate);

            if histogram[archetype] > 0 {
                let winrate = fitness_sum[archetype] / histogram[archetype] as f64;
                self.winrate[archetype].push(winrate);
                Bounds::observe(&mut self.winrate_bounds[archetype], winrate);
            } else {
                self.winrate[archetype].push(0.0);
            }
        }

        let share = 1.0 / podium_size as f64;
        for strategy in ranked.iter().take(podium_size) {
            self.podium_credit[strategy.archetype_id()] += share;
        }
        if let Some(top) = ranked.first() {
            self.top1_credit[top.archetype_id()] += 1.0;
        }

        self.generations += 1;
    }

    /// Number of generations recorded so far.
    pub fn generations(&self) -> usize {
        self.generations
    }

    /// Number of archetypes tracked.
    pub fn n_archetypes(&self) -> usize {
        self.n_arch
    }

    /// Immutable base point total of one archetype.
    pub fn base_points(&self, archetype: usize) -> u32 {
        self.base_points[archetype]
    }

    /// Playrate time series (percent of population per generation).
    pub fn playrate_series(&self, archetype: usize) -> &[f64] {
        &self.playrate[archetype]
    }

    /// Winrate time series (mean fitness per generation).
    pub fn winrate_series(&self, archetype: usize) -> &[f64] {
        &self.winrate[archetype]
    }

    /// Running (min, max) playrate, if any generation was recorded.
    pub fn playrate_bounds(&self, archetype: usize) -> Option<Bounds> {
        self.playrate_bounds[archetype]
    }

    /// Running (min, max) winrate over generations where the archetype was
    /// alive.
    pub fn winrate_bounds(&self, archetype: usize) -> Option<Bounds> {
        self.winrate_bounds[archetype]
    }

    /// Fraction of podium credit earned across the run so far.
    pub fn podium_fraction(&self, archetype: usize) -> f64 {
        normalize(self.podium_credit[archetype], self.generations)
    }

    /// Fraction of generations whose single most-fit individual played this
    /// archetype.
    pub fn top1_fraction(&self, archetype: usize) -> f64 {
        normalize(self.top1_credit[archetype], self.generations)
    }

    /// Mean playrate over the whole run.
    pub fn average_playrate(&self, archetype: usize) -> f64 {
        mean(&self.playrate[archetype])
    }

    /// Mean winrate over the whole run.
    pub fn average_winrate(&self, archetype: usize) -> f64 {
        mean(&self.winrate[archetype])
    }
}

fn normalize(credit: f64, generations: usize) -> f64 {
    if generations == 0 {
        0.0
    } else {
        credit / generations as f64
    }
}

fn mean(series: &[f64]) -> f64 {
    if series.is_empty() {
        0.0
    } else {
        series.iter().sum::<f64>() / series.len() as f64
    }
}
