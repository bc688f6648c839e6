//! Strategy representation and genetic operators
//!
//! A [`Strategy`] is one member of the evolving population: a fixed archetype
//! identity plus a mutable point-allocation vector over all opponent
//! archetypes. Offspring are produced by [`Strategy::generate_child`], which
//! blends the winning parent's distribution with the loser's pair by pair.
//!
//! Every operator moves points strictly between a pair of indices, so the
//! vector total never drifts from the ancestor's base points.

use rand::Rng;

/// Default probability that a crossover pass blends a given index pair.
pub const DEFAULT_CROSSOVER_ODDS: f64 = 0.10;

/// Default probability that a crossover pass mutates a given index pair.
pub const DEFAULT_MUTATION_ODDS: f64 = 0.05;

/// One individual in the population.
///
/// Identity (`archetype_id`, `base_points`) is fixed at creation; the
/// distribution drifts through crossover and mutation. `fitness` is transient
/// and overwritten by the engine every generation.
#[derive(Clone, Debug, PartialEq)]
pub struct Strategy {
    archetype_id: usize,
    base_points: u32,
    distribution: Vec<u32>,
    fitness: f64,
}

impl Strategy {
    /// Create a strategy from one scoring-matrix row.
    ///
    /// # Panics
    /// Panics if the row scores points against the strategy's own archetype;
    /// the diagonal of a validated scoring matrix is always zero.
    pub fn from_row(archetype_id: usize, row: &[u32]) -> Self {
        assert_eq!(
            row[archetype_id], 0,
            "a strategy cannot hold points against its own archetype"
        );
        Self {
            archetype_id,
            base_points: row.iter().sum(),
            distribution: row.to_vec(),
            fitness: 0.0,
        }
    }

    /// The archetype this individual plays. Fixed for life; crossover
    /// offspring inherit the winning parent's id.
    pub fn archetype_id(&self) -> usize {
        self.archetype_id
    }

    /// Point total of the originating matrix row. Informational, never
    /// recomputed.
    pub fn base_points(&self) -> u32 {
        self.base_points
    }

    /// Current point allocation per opponent archetype.
    pub fn distribution(&self) -> &[u32] {
        &self.distribution
    }

    /// Points allocated against one opponent archetype.
    pub fn points_against(&self, opponent: usize) -> u32 {
        self.distribution[opponent]
    }

    /// Fitness from the most recent evaluation. Meaningless before the first
    /// evaluation of the generation this individual lives in.
    pub fn fitness(&self) -> f64 {
        self.fitness
    }

    /// Overwrite the transient fitness value.
    pub fn set_fitness(&mut self, fitness: f64) {
        self.fitness = fitness;
    }

    /// Redistribute the combined points of two opponent slots at random.
    ///
    /// Draws `distribution[a]` uniformly from `[0, distribution[a] +
    /// distribution[b]]` and gives the remainder to `b`, preserving the
    /// pair's total. This is the pairwise mutation primitive used both by
    /// crossover and by standalone mutation.
    pub fn redistribute<R: Rng>(&mut self, a: usize, b: usize, rng: &mut R) {
        debug_assert!(a != self.archetype_id && b != self.archetype_id);
        debug_assert_ne!(a, b);

        let total = self.distribution[a] + self.distribution[b];
        let first = rng.gen_range(0..=total);
        self.distribution[a] = first;
        self.distribution[b] = total - first;
    }

    /// Mutate the distribution in place: each opponent slot, visited in
    /// random order, has probability `odds` of redistributing its points
    /// with another not-yet-consumed slot.
    pub fn mutate<R: Rng>(&mut self, odds: f64, rng: &mut R) {
        let mut pending = self.opponent_indices();
        let mut open = pending.clone();

        while !pending.is_empty() {
            let slot = rng.gen_range(0..pending.len());
            let a = pending.swap_remove(slot);

            if rng.gen::<f64>() <= odds {
                remove_value(&mut open, a);
                let Some(b) = pick(&open, rng) else {
                    continue;
                };
                self.redistribute(a, b, rng);
                remove_value(&mut open, b);
                remove_value(&mut pending, b);
            }
        }
    }

    /// Produce a child by crossover, with `self` as the winning parent.
    ///
    /// The child starts as a copy of the father's distribution and inherits
    /// his archetype id and base points. Opponent indices are then visited in
    /// random order; each visit either blends a pair of slots between the two
    /// parents (probability `odds`), redistributes a pair at random
    /// (probability `mutation_odds`), or leaves the slot untouched for this
    /// pass. An index consumed by a blend or mutation is never revisited.
    ///
    /// Blending picks a partner slot `b` for the visited slot `a`, computes
    /// each parent's share of its own `(a, b)` point pair, and draws the
    /// child's share uniformly between the two. The child keeps the father's
    /// pair total, so no points are created or destroyed. The mother's own
    /// archetype slot is only eligible as a partner when no alternative
    /// remains, in which case the whole call ends early rather than touching
    /// her slot.
    pub fn generate_child<R: Rng>(
        &self,
        mother: &Strategy,
        odds: f64,
        mutation_odds: f64,
        rng: &mut R,
    ) -> Strategy {
        let mut child = Strategy {
            archetype_id: self.archetype_id,
            base_points: self.base_points,
            distribution: self.distribution.clone(),
            fitness: 0.0,
        };

        // `pending` holds indices not yet visited as the primary slot;
        // `open` holds indices not yet consumed by a blend or mutation.
        // An untouched visit removes from `pending` only, so the index stays
        // eligible as a partner later.
        let mut pending = self.opponent_indices();
        let mut open = pending.clone();

        while pending.len() > 1 {
            let slot = rng.gen_range(0..pending.len());
            let a = pending.swap_remove(slot);

            let roll = rng.gen::<f64>();
            if roll <= odds {
                if a == mother.archetype_id {
                    continue;
                }
                remove_value(&mut open, a);

                let mother_slot_open = open.contains(&mother.archetype_id);
                let b = if mother_slot_open && open.len() > 1 {
                    remove_value(&mut open, mother.archetype_id);
                    let Some(b) = pick(&open, rng) else {
                        break;
                    };
                    open.push(mother.archetype_id);
                    b
                } else if mother_slot_open {
                    // Mother's own slot is the only candidate left: end the
                    // pass rather than corrupt it.
                    break;
                } else {
                    let Some(b) = pick(&open, rng) else {
                        break;
                    };
                    b
                };

                let father_sum = self.distribution[a] + self.distribution[b];
                if father_sum != 0 {
                    let father_share = f64::from(self.distribution[a]) / f64::from(father_sum);
                    let mother_sum = mother.distribution[a] + mother.distribution[b];
                    let mother_share = if mother_sum != 0 {
                        f64::from(mother.distribution[a]) / f64::from(mother_sum)
                    } else {
                        0.5
                    };

                    // Uniform draw between the two shares; works for either
                    // ordering of the bounds.
                    let child_share =
                        rng.gen::<f64>() * (father_share - mother_share) + mother_share;

                    let first = (f64::from(father_sum) * child_share) as u32;
                    child.distribution[a] = first;
                    child.distribution[b] = father_sum - first;
                }

                remove_value(&mut open, b);
                remove_value(&mut pending, b);
            } else if roll <= odds + mutation_odds {
                remove_value(&mut open, a);
                let Some(b) = pick(&open, rng) else {
                    continue;
                };
                child.redistribute(a, b, rng);
                remove_value(&mut open, b);
                remove_value(&mut pending, b);
            }
        }

        child
    }

    /// All indices except this strategy's own archetype.
    fn opponent_indices(&self) -> Vec<usize> {
        (0..self.distribution.len())
            .filter(|&i| i != self.archetype_id)
            .collect()
    }
}

/// Remove the first occurrence of `value`, if present.
fn remove_value(indices: &mut Vec<usize>, value: usize) {
    if let Some(pos) = indices.iter().position(|&x| x == value) {
        indices.remove(pos);
    }
}

/// Uniformly pick an element, or `None` when empty.
fn pick<R: Rng>(indices: &[usize], rng: &mut R) -> Option<usize> {
    if indices.is_empty() {
        None
    } else {
        Some(indices[rng.gen_range(0..indices.len())])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn sum(strategy: &Strategy) -> u32 {
        strategy.distribution().iter().sum()
    }

    #[test]
    fn test_from_row_sums_base_points() {
        let s = Strategy::from_row(1, &[7, 0, 3, 5]);
        assert_eq!(s.archetype_id(), 1);
        assert_eq!(s.base_points(), 15);
        assert_eq!(s.distribution(), &[7, 0, 3, 5]);
    }

    #[test]
    #[should_panic]
    fn test_from_row_rejects_self_points() {
        Strategy::from_row(0, &[3, 10, 5]);
    }

    #[test]
    fn test_redistribute_preserves_pair_total() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let mut s = Strategy::from_row(0, &[0, 12, 8, 5]);

        for _ in 0..200 {
            s.redistribute(1, 3, &mut rng);
            assert_eq!(s.points_against(1) + s.points_against(3), 17);
            assert_eq!(s.points_against(2), 8);
            assert_eq!(sum(&s), s.base_points());
        }
    }

    #[test]
    fn test_mutate_preserves_total_and_own_slot() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let mut s = Strategy::from_row(2, &[9, 4, 0, 6, 1]);

        for _ in 0..100 {
            s.mutate(0.5, &mut rng);
            assert_eq!(sum(&s), s.base_points());
            assert_eq!(s.points_against(2), 0);
        }
    }

    #[test]
    fn test_child_inherits_father_identity() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let father = Strategy::from_row(0, &[0, 10, 5, 3]);
        let mother = Strategy::from_row(2, &[4, 4, 0, 4]);

        let child = father.generate_child(&mother, 1.0, 0.0, &mut rng);
        assert_eq!(child.archetype_id(), father.archetype_id());
        assert_eq!(child.base_points(), father.base_points());
    }

    #[test]
    fn test_inert_crossover_copies_father() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let father = Strategy::from_row(1, &[6, 0, 2, 9, 1]);
        let mother = Strategy::from_row(3, &[5, 5, 5, 0, 3]);

        for _ in 0..50 {
            let child = father.generate_child(&mother, 0.0, 0.0, &mut rng);
            assert_eq!(child.distribution(), father.distribution());
        }
    }

    #[test]
    fn test_crossover_preserves_total_and_own_slot() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let father = Strategy::from_row(0, &[0, 14, 3, 8, 5, 2]);
        let mother = Strategy::from_row(4, &[1, 9, 2, 7, 0, 11]);

        let mut current = father.clone();
        for _ in 0..300 {
            current = current.generate_child(&mother, 0.3, 0.2, &mut rng);
            assert_eq!(sum(&current), father.base_points());
            assert_eq!(current.points_against(0), 0);
        }
    }

    #[test]
    fn test_blended_share_stays_between_parents() {
        // Three archetypes leave exactly one blendable pair (1, 2), so with
        // certain crossover the child's slot 1 must land between the parents'
        // shares of the 40-point pair: 30/40 vs 10/40.
        let father = Strategy::from_row(0, &[0, 30, 10]);
        let mother = Strategy::from_row(0, &[0, 10, 30]);
        let mut rng = ChaCha8Rng::seed_from_u64(99);

        for _ in 0..500 {
            let child = father.generate_child(&mother, 1.0, 0.0, &mut rng);
            let first = child.points_against(1);
            assert!(
                (10..=30).contains(&first),
                "blended slot {} outside the parents' share interval",
                first
            );
            assert_eq!(child.points_against(1) + child.points_against(2), 40);
        }
    }

    #[test]
    fn test_zero_father_pair_is_left_alone() {
        // Father holds no points on the only pair, so a forced blend has no
        // information to work with and must leave the child untouched.
        let father = Strategy::from_row(0, &[0, 0, 0]);
        let mother = Strategy::from_row(0, &[0, 10, 30]);
        let mut rng = ChaCha8Rng::seed_from_u64(5);

        for _ in 0..50 {
            let child = father.generate_child(&mother, 1.0, 0.0, &mut rng);
            assert_eq!(child.distribution(), &[0, 0, 0]);
        }
    }

    #[test]
    fn test_two_archetypes_child_is_father_copy() {
        // With a single opponent index there is no pair to operate on; the
        // crossover loop ends immediately.
        let father = Strategy::from_row(0, &[0, 20]);
        let mother = Strategy::from_row(1, &[20, 0]);
        let mut rng = ChaCha8Rng::seed_from_u64(8);

        let child = father.generate_child(&mother, 1.0, 1.0, &mut rng);
        assert_eq!(child.distribution(), father.distribution());
    }
}
