//! Population engine: the generational evolution loop
//!
//! Owns the live population and drives each generation in strict sequence:
//! evaluate fitness, record statistics, preserve a per-archetype elite
//! fraction, and refill the remainder through fitness-weighted matches.

use std::cmp::Ordering;

use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;

use metagame_core::{
    play_match, ScoringMatrix, Strategy, DEFAULT_CROSSOVER_ODDS, DEFAULT_MUTATION_ODDS,
};

use crate::error::EngineError;
use crate::stats::MetaStats;

/// Default fraction of each archetype preserved unchanged per generation.
pub const DEFAULT_SURVIVAL_FRACTION: f64 = 0.2;

/// Default number of podium seats tracked per generation.
pub const DEFAULT_PODIUM_SIZE: usize = 10;

/// Knobs of the generational loop.
#[derive(Clone, Copy, Debug)]
pub struct EvolutionParams {
    /// Fraction of each archetype's population kept as elite survivors.
    pub survival_fraction: f64,
    /// Probability that a crossover pass blends a given index pair.
    pub crossover_odds: f64,
    /// Probability that a crossover pass mutates a given index pair.
    pub mutation_odds: f64,
}

impl Default for EvolutionParams {
    fn default() -> Self {
        Self {
            survival_fraction: DEFAULT_SURVIVAL_FRACTION,
            crossover_odds: DEFAULT_CROSSOVER_ODDS,
            mutation_odds: DEFAULT_MUTATION_ODDS,
        }
    }
}

/// The evolving population and its statistics.
///
/// Constructed from a validated scoring matrix; the initial population is a
/// fitness-weighted resample of the one canonical strategy per archetype, so
/// stronger archetypes start more prevalent. After construction the only
/// mutation entry point is [`Generation::evolve`].
#[derive(Debug)]
pub struct Generation {
    pop_size: usize,
    podium_size: usize,
    n_arch: usize,
    params: EvolutionParams,
    individuals: Vec<Strategy>,
    histogram: Vec<usize>,
    stats: MetaStats,
}

impl Generation {
    /// Build an engine with default evolution parameters.
    pub fn new<R: Rng>(
        pop_size: usize,
        matrix: ScoringMatrix,
        podium_size: usize,
        rng: &mut R,
    ) -> Result<Self, EngineError> {
        Self::with_params(pop_size, matrix, podium_size, EvolutionParams::default(), rng)
    }

    /// Build an engine with explicit evolution parameters.
    ///
    /// # Errors
    /// [`EngineError::PopulationTooSmall`] when worst-case per-archetype
    /// elite quotas (one ceiling round-up per live archetype) could exceed
    /// `pop_size`.
    pub fn with_params<R: Rng>(
        pop_size: usize,
        matrix: ScoringMatrix,
        podium_size: usize,
        params: EvolutionParams,
        rng: &mut R,
    ) -> Result<Self, EngineError> {
        let n_arch = matrix.n_archetypes();

        // Sum of ceil(count_i * f) is bounded by pop_size * f + live
        // archetypes, so the refill can never overflow once this holds.
        let capacity = pop_size as f64 * (1.0 - params.survival_fraction);
        if pop_size == 0 || n_arch as f64 > capacity {
            return Err(EngineError::PopulationTooSmall {
                pop_size,
                n_arch,
                survival_fraction: params.survival_fraction,
            });
        }

        let stats = MetaStats::new(&matrix);
        let individuals = seed_population(&matrix, pop_size, rng);

        tracing::info!(
            "Engine ready: {} archetypes, population {}, podium {}",
            n_arch,
            pop_size,
            podium_size
        );

        let mut engine = Self {
            pop_size,
            podium_size,
            n_arch,
            params,
            individuals,
            histogram: vec![0; n_arch],
            stats,
        };
        engine.rebuild_histogram();
        Ok(engine)
    }

    /// Run `n_generations` sequential generation steps.
    ///
    /// Each step depends on the previous population and statistics, so the
    /// loop is strictly ordered.
    pub fn evolve<R: Rng>(&mut self, n_generations: usize, rng: &mut R) {
        tracing::info!(
            "Evolving {} generations: pop={}, archetypes={}",
            n_generations,
            self.pop_size,
            self.n_arch
        );
        for _ in 0..n_generations {
            self.step(rng);
        }
    }

    /// Statistics accumulated so far.
    pub fn stats(&self) -> &MetaStats {
        &self.stats
    }

    /// Current archetype counts; sums to the population size.
    pub fn histogram(&self) -> &[usize] {
        &self.histogram
    }

    /// Population size, constant over the run.
    pub fn pop_size(&self) -> usize {
        self.pop_size
    }

    /// Number of archetypes, constant over the run.
    pub fn n_archetypes(&self) -> usize {
        self.n_arch
    }

    /// One full generation: evaluate, rank, record, preserve, refill.
    fn step<R: Rng>(&mut self, rng: &mut R) {
        assign_fitness(&mut self.individuals);
        self.rank_by_fitness();
        self.rebuild_histogram();
        self.stats
            .record(&self.individuals, &self.histogram, self.podium_size);
        tracing::debug!(
            "Generation {}: top archetype {}",
            self.stats.generations(),
            self.individuals[0].archetype_id()
        );

        let keep = self.elite_mask();
        let survivor_count = keep.iter().filter(|&&kept| kept).count();

        let weights: Vec<f64> = self.individuals.iter().map(Strategy::fitness).collect();
        let sampler =
            WeightedIndex::new(&weights).expect("evaluated fitness weights are positive");

        let mut children = Vec::with_capacity(self.pop_size - survivor_count);
        while survivor_count + children.len() < self.pop_size {
            let first = &self.individuals[sampler.sample(rng)];
            let second = &self.individuals[sampler.sample(rng)];
            children.push(play_match(
                first,
                second,
                self.params.crossover_odds,
                self.params.mutation_odds,
                rng,
            ));
        }

        // Survivors move into the next generation by identity; everything
        // else is discarded and replaced by children.
        let previous = std::mem::take(&mut self.individuals);
        let mut next: Vec<Strategy> = previous
            .into_iter()
            .zip(keep)
            .filter_map(|(strategy, kept)| kept.then_some(strategy))
            .collect();
        next.append(&mut children);
        self.individuals = next;
    }

    /// Sort descending by fitness, ties broken by archetype id for
    /// determinism under a fixed seed.
    fn rank_by_fitness(&mut self) {
        self.individuals.sort_by(|a, b| {
            b.fitness()
                .partial_cmp(&a.fitness())
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.archetype_id().cmp(&b.archetype_id()))
        });
    }

    fn rebuild_histogram(&mut self) {
        self.histogram.fill(0);
        for strategy in &self.individuals {
            self.histogram[strategy.archetype_id()] += 1;
        }
    }

    /// Elite survival mask over the fitness-ranked population: each
    /// archetype keeps up to `ceil(count * survival_fraction)` of its best.
    fn elite_mask(&self) -> Vec<bool> {
        let mut quota: Vec<usize> = self
            .histogram
            .iter()
            .map(|&count| (count as f64 * self.params.survival_fraction).ceil() as usize)
            .collect();

        self.individuals
            .iter()
            .map(|strategy| {
                let remaining = &mut quota[strategy.archetype_id()];
                if *remaining > 0 {
                    *remaining -= 1;
                    true
                } else {
                    false
                }
            })
            .collect()
    }
}

/// Seed the initial population: one canonical strategy per matrix row,
/// evaluated against each other, then resampled with replacement weighted by
/// canonical fitness.
fn seed_population<R: Rng>(
    matrix: &ScoringMatrix,
    pop_size: usize,
    rng: &mut R,
) -> Vec<Strategy> {
    let mut canonical: Vec<Strategy> = (0..matrix.n_archetypes())
        .map(|archetype| Strategy::from_row(archetype, matrix.row(archetype)))
        .collect();
    assign_fitness(&mut canonical);

    let weights: Vec<f64> = canonical.iter().map(Strategy::fitness).collect();
    let sampler = WeightedIndex::new(&weights).expect("canonical fitness weights are positive");

    (0..pop_size)
        .map(|_| canonical[sampler.sample(rng)].clone())
        .collect()
}

/// Recompute every individual's fitness against the whole population,
/// including same-archetype and self encounters (both contribute 0.5).
fn assign_fitness(individuals: &mut [Strategy]) {
    let fitness: Vec<f64> = individuals
        .iter()
        .map(|strategy| {
            let total: f64 = individuals
                .iter()
                .map(|opponent| win_probability(strategy, opponent))
                .sum();
            total / individuals.len() as f64
        })
        .collect();

    for (strategy, value) in individuals.iter_mut().zip(fitness) {
        strategy.set_fitness(value);
    }
}

/// Probability that `strategy` beats `opponent` in one encounter; 0.5 when
/// neither side holds points on the matchup.
fn win_probability(strategy: &Strategy, opponent: &Strategy) -> f64 {
    let own = f64::from(strategy.points_against(opponent.archetype_id()));
    let other = f64::from(opponent.points_against(strategy.archetype_id()));
    if own + other == 0.0 {
        0.5
    } else {
        own / (own + other)
    }
}
