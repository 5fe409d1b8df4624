//! Lazy enumeration of boundary-tight course subsets for one leaf requirement.
//!
//! The walk is the usual subset-without-repetition recursion (take position
//! `i`, then recurse over positions `> i`), unrolled into an explicit stack so
//! the least-branching scheduler can step several generators one item at a
//! time. A branch is only extended while its registered sum is below `max`.
//!
//! A subset is emitted when, for registered or for acquired credits,
//! `sum >= min` and `min_credit > sum - max`: dropping its smallest course
//! would already fall back under `max`, so strict supersets of a sufficient
//! subset are never produced.

use crate::models::{CreditRange, RegisteredCreditCounts};

/// A course the generator may pick. `index` is opaque to the generator and
/// comes back unchanged in every emitted combination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Candidate {
    pub index: usize,
    pub credit_count: i32,
}

impl Candidate {
    pub fn new(index: usize, credit_count: i32) -> Self {
        Self { index, credit_count }
    }
}

/// Candidate indices, in pool order.
pub type Combination = Vec<usize>;

#[derive(Debug, Clone, Copy)]
struct PoolEntry {
    candidate: Candidate,
    acquired: bool,
}

#[derive(Debug, Clone, Copy)]
struct Level {
    position: usize,
    sums: RegisteredCreditCounts,
    min_credit: i32,
}

#[derive(Debug)]
pub struct TightCombinations {
    pool: Vec<PoolEntry>,
    range: CreditRange,
    baseline: RegisteredCreditCounts,
    levels: Vec<Level>,
    // next pool position to try at depth `levels.len()`
    cursor: usize,
    started: bool,
    done: bool,
}

impl TightCombinations {
    /// `acquired` and `registered` must be disjoint and already exclude
    /// courses assigned elsewhere. Acquired courses come first in the pool.
    /// `baseline` is credit the leaf already has (manual override and
    /// pre-assigned courses).
    pub fn new(
        acquired: Vec<Candidate>,
        registered: Vec<Candidate>,
        range: CreditRange,
        baseline: RegisteredCreditCounts,
    ) -> Self {
        let pool = acquired
            .into_iter()
            .map(|candidate| PoolEntry { candidate, acquired: true })
            .chain(registered.into_iter().map(|candidate| PoolEntry { candidate, acquired: false }))
            .collect();
        Self {
            pool,
            range,
            baseline,
            levels: Vec::new(),
            cursor: 0,
            started: false,
            done: false,
        }
    }

    pub fn pool_len(&self) -> usize {
        self.pool.len()
    }

    fn is_tight(&self, sums: RegisteredCreditCounts, min_credit: Option<i32>) -> bool {
        let CreditRange { min, max } = self.range;
        let within = |total: i32| min_credit.is_none_or(|m| m > total.saturating_sub(max));
        (sums.registered >= min && within(sums.registered)) || (sums.acquired >= min && within(sums.acquired))
    }

    fn current(&self) -> Combination {
        self.levels
            .iter()
            .map(|level| self.pool[level.position].candidate.index)
            .collect()
    }
}

impl Iterator for TightCombinations {
    type Item = Combination;

    fn next(&mut self) -> Option<Combination> {
        if self.done {
            return None;
        }

        if !self.started {
            self.started = true;
            if self.baseline.registered >= self.range.max {
                // nothing can be added; only the empty subset is a candidate
                self.cursor = self.pool.len();
            }
            if self.is_tight(self.baseline, None) {
                return Some(Vec::new());
            }
        }

        loop {
            if self.cursor >= self.pool.len() {
                match self.levels.pop() {
                    Some(level) => {
                        self.cursor = level.position + 1;
                        continue;
                    }
                    None => {
                        self.done = true;
                        return None;
                    }
                }
            }

            let position = self.cursor;
            let entry = self.pool[position];
            let (parent_sums, parent_min) = match self.levels.last() {
                Some(level) => (level.sums, level.min_credit),
                None => (self.baseline, i32::MAX),
            };
            let credits = entry.candidate.credit_count;
            let sums = parent_sums
                + RegisteredCreditCounts::new(if entry.acquired { credits } else { 0 }, credits);
            let min_credit = parent_min.min(credits);

            let emit = self.is_tight(sums, Some(min_credit));
            let extend = sums.registered < self.range.max;

            self.levels.push(Level { position, sums, min_credit });
            let combination = if emit { Some(self.current()) } else { None };
            if !extend {
                self.levels.pop();
            }
            self.cursor = position + 1;

            if combination.is_some() {
                return combination;
            }
        }
    }
}

impl std::iter::FusedIterator for TightCombinations {}

#[cfg(test)]
mod tests {
    use super::*;

    fn all(generator: TightCombinations) -> Vec<Combination> {
        generator.collect()
    }

    #[test]
    fn two_credit_leaf_yields_single_and_pair() {
        // A(2, acquired), B(1, registered), C(1, registered), range 2..2
        let generator = TightCombinations::new(
            vec![Candidate::new(0, 2)],
            vec![Candidate::new(1, 1), Candidate::new(2, 1)],
            CreditRange::exactly(2),
            RegisteredCreditCounts::default(),
        );
        assert_eq!(all(generator), vec![vec![0], vec![1, 2]]);
    }

    #[test]
    fn overshooting_subsets_are_skipped() {
        // range 2..2 with credits 1 and 3: {1,3} overshoots by more than its smallest course
        let generator = TightCombinations::new(
            vec![],
            vec![Candidate::new(0, 1), Candidate::new(1, 3)],
            CreditRange::exactly(2),
            RegisteredCreditCounts::default(),
        );
        assert_eq!(all(generator), vec![vec![1]]);
    }

    #[test]
    fn wide_range_keeps_growing_until_max() {
        let generator = TightCombinations::new(
            vec![],
            vec![Candidate::new(0, 1), Candidate::new(1, 1), Candidate::new(2, 1)],
            CreditRange::new(2, 3),
            RegisteredCreditCounts::default(),
        );
        assert_eq!(
            all(generator),
            vec![vec![0, 1], vec![0, 1, 2], vec![0, 2], vec![1, 2]]
        );
    }

    #[test]
    fn satisfied_baseline_yields_empty_combination_first() {
        let generator = TightCombinations::new(
            vec![],
            vec![Candidate::new(7, 2)],
            CreditRange::new(1, 4),
            RegisteredCreditCounts::new(0, 1),
        );
        assert_eq!(all(generator), vec![vec![], vec![7]]);
    }

    #[test]
    fn baseline_at_max_stops_extension() {
        let generator = TightCombinations::new(
            vec![Candidate::new(0, 2)],
            vec![],
            CreditRange::new(2, 2),
            RegisteredCreditCounts::new(2, 2),
        );
        assert_eq!(all(generator), vec![Vec::<usize>::new()]);
    }

    #[test]
    fn mixed_subset_within_smallest_course_of_max() {
        let generator = TightCombinations::new(
            vec![Candidate::new(0, 2)],
            vec![Candidate::new(1, 3)],
            CreditRange::new(2, 4),
            RegisteredCreditCounts::default(),
        );
        // {A}: 2/2 emitted, extended to {A,B}: registered 5 (2 > 1), emitted
        assert_eq!(all(generator), vec![vec![0], vec![0, 1], vec![1]]);
    }

    #[test]
    fn acquired_threshold_alone_can_emit() {
        // {A,B} overshoots on registered credits (6 vs max 3) but its
        // acquired sum is still tight, so it is emitted
        let generator = TightCombinations::new(
            vec![Candidate::new(0, 1)],
            vec![Candidate::new(1, 5)],
            CreditRange::new(1, 3),
            RegisteredCreditCounts::default(),
        );
        assert_eq!(all(generator), vec![vec![0], vec![0, 1], vec![1]]);
    }

    #[test]
    fn unreachable_minimum_yields_nothing() {
        let mut generator = TightCombinations::new(
            vec![Candidate::new(0, 1)],
            vec![],
            CreditRange::exactly(5),
            RegisteredCreditCounts::default(),
        );
        assert_eq!(generator.next(), None);
        assert_eq!(generator.next(), None);
    }

    #[test]
    fn generator_is_lazy() {
        let mut generator = TightCombinations::new(
            vec![],
            (0..30).map(|i| Candidate::new(i, 1)).collect(),
            CreditRange::exactly(3),
            RegisteredCreditCounts::default(),
        );
        // 30 choose 3 combinations exist; taking one must not walk them all
        assert_eq!(generator.next(), Some(vec![0, 1, 2]));
        assert_eq!(generator.next(), Some(vec![0, 1, 3]));
    }
}
