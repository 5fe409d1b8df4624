//! Backtracking composer: fixes one leaf requirement at a time, least
//! branching first, and yields every complete assignment as a [`Plan`].
//!
//! The recursion is kept as an explicit frame stack. Each frame holds the
//! full combination list of the leaf it fixed and a cursor into it; the
//! course -> leaf ownership of the current branch lives in `owner` and is
//! undone when a frame moves to its next combination.

use super::combinations::{Candidate, Combination, TightCombinations};
use super::scheduler::pick_least_branching;
use super::search::{CancelToken, SearchOptions};
use crate::models::{Course, Plan, RegisteredCreditCounts, RequirementWithCourses};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::trace;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LeafState {
    Open,
    Fixed,
    /// No combination fits in this branch; filled with leftovers at the end.
    Deferred,
}

#[derive(Debug)]
struct Frame {
    leaf: usize,
    combinations: Vec<Combination>,
    // combinations[next - 1] is currently applied
    next: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Descend,
    Advance,
    Done,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ComposerStats {
    pub plans: u64,
    pub expansions: u64,
    pub dead_ends: u64,
}

pub struct AssignmentComposer<'a> {
    leaves: Vec<&'a RequirementWithCourses>,
    base: Plan,
    courses: Vec<Arc<Course>>,
    acquired: Vec<bool>,
    // per leaf, course indices that may go to it; acquired ones first
    pools: Vec<Vec<usize>>,
    baselines: Vec<RegisteredCreditCounts>,
    owner: Vec<Option<usize>>,
    leaf_state: Vec<LeafState>,
    frames: Vec<Frame>,
    step: Step,
    options: SearchOptions,
    cancel: CancelToken,
    stats: ComposerStats,
}

impl<'a> AssignmentComposer<'a> {
    /// `leaves` are the leaves to fill, in tree order. Courses that `base`
    /// already assigns somewhere stay where they are and are left out of
    /// every pool; `base` itself is never modified.
    pub fn new(
        leaves: Vec<&'a RequirementWithCourses>,
        base: Plan,
        options: SearchOptions,
        cancel: CancelToken,
    ) -> Self {
        let mut index_of: HashMap<&str, usize> = HashMap::new();
        let mut courses: Vec<Arc<Course>> = Vec::new();
        let mut acquired: Vec<bool> = Vec::new();
        let mut pools = Vec::with_capacity(leaves.len());
        let mut baselines = Vec::with_capacity(leaves.len());

        for leaf in &leaves {
            let mut acquired_pool = Vec::new();
            let mut registered_pool = Vec::new();
            for course in &leaf.courses {
                let status = base.status_of(&course.code);
                if !status.is_registered() || base.is_assigned(&course.code) {
                    continue;
                }
                let index = *index_of.entry(course.code.as_str()).or_insert_with(|| {
                    courses.push(course.clone());
                    acquired.push(status.is_acquired());
                    courses.len() - 1
                });
                if status.is_acquired() {
                    acquired_pool.push(index);
                } else {
                    registered_pool.push(index);
                }
            }
            acquired_pool.extend(registered_pool);
            pools.push(acquired_pool);
            baselines.push(leaf.registered_credit_counts(&base, true));
        }

        let course_count = courses.len();
        let leaf_count = leaves.len();
        Self {
            leaves,
            base,
            courses,
            acquired,
            pools,
            baselines,
            owner: vec![None; course_count],
            leaf_state: vec![LeafState::Open; leaf_count],
            frames: Vec::new(),
            step: Step::Descend,
            options,
            cancel,
            stats: ComposerStats::default(),
        }
    }

    pub fn stats(&self) -> ComposerStats {
        self.stats
    }

    fn generator_for(&self, leaf: usize) -> TightCombinations {
        let mut acquired = Vec::new();
        let mut registered = Vec::new();
        for &index in &self.pools[leaf] {
            if self.owner[index].is_some() {
                continue;
            }
            let candidate = Candidate::new(index, self.courses[index].credit_count);
            if self.acquired[index] {
                acquired.push(candidate);
            } else {
                registered.push(candidate);
            }
        }
        TightCombinations::new(acquired, registered, self.leaves[leaf].credit_range, self.baselines[leaf])
    }

    /// Picks the next leaf to fix. Returns a plan when every leaf is settled.
    fn descend(&mut self) -> Option<Plan> {
        let generators: Vec<(usize, TightCombinations)> = (0..self.leaves.len())
            .filter(|&leaf| self.leaf_state[leaf] == LeafState::Open)
            .map(|leaf| (leaf, self.generator_for(leaf)))
            .collect();

        self.step = Step::Advance;
        let Some((leaf, combinations)) = pick_least_branching(generators) else {
            return Some(self.complete_plan());
        };
        self.stats.expansions += 1;
        trace!(
            requirement = %self.leaves[leaf].id,
            combinations = combinations.len(),
            depth = self.frames.len(),
            "fixing requirement"
        );

        if !combinations.is_empty() {
            self.leaf_state[leaf] = LeafState::Fixed;
            self.frames.push(Frame { leaf, combinations, next: 0 });
        } else if self.options.fill_unsatisfiable_leaves {
            self.leaf_state[leaf] = LeafState::Deferred;
            self.frames.push(Frame { leaf, combinations: vec![Vec::new()], next: 0 });
        } else {
            self.stats.dead_ends += 1;
        }
        None
    }

    /// Moves the top frame to its next combination, popping exhausted frames.
    fn advance(&mut self) {
        let Some(top) = self.frames.len().checked_sub(1) else {
            self.step = Step::Done;
            return;
        };
        let leaf = self.frames[top].leaf;
        let next = self.frames[top].next;

        if next > 0 {
            set_owner(&mut self.owner, &self.frames[top].combinations[next - 1], None);
        }
        if next < self.frames[top].combinations.len() {
            set_owner(&mut self.owner, &self.frames[top].combinations[next], Some(leaf));
            self.frames[top].next += 1;
            self.step = Step::Descend;
        } else {
            self.leaf_state[leaf] = LeafState::Open;
            self.frames.pop();
            self.step = Step::Advance;
        }
    }

    fn complete_plan(&mut self) -> Plan {
        let mut assignments: Vec<(String, String)> = self
            .owner
            .iter()
            .enumerate()
            .filter_map(|(index, owner)| {
                owner.map(|leaf| (self.courses[index].code.clone(), self.leaves[leaf].id.clone()))
            })
            .collect();
        assignments.extend(self.fill_deferred());
        self.stats.plans += 1;
        self.base.with_assignments(assignments)
    }

    /// Hands leftover courses to deferred leaves, in leaf order, while each
    /// leaf's registered sum is under its maximum.
    fn fill_deferred(&self) -> Vec<(String, String)> {
        let mut taken: Vec<bool> = self.owner.iter().map(Option::is_some).collect();
        let mut extra = Vec::new();
        for (leaf, state) in self.leaf_state.iter().enumerate() {
            if *state != LeafState::Deferred {
                continue;
            }
            let max = self.leaves[leaf].credit_range.max;
            let mut running = self.baselines[leaf];
            for &index in &self.pools[leaf] {
                if running.registered >= max {
                    break;
                }
                if taken[index] {
                    continue;
                }
                taken[index] = true;
                let credits = self.courses[index].credit_count;
                running = running
                    + RegisteredCreditCounts::new(if self.acquired[index] { credits } else { 0 }, credits);
                extra.push((self.courses[index].code.clone(), self.leaves[leaf].id.clone()));
            }
        }
        extra
    }
}

fn set_owner(owner: &mut [Option<usize>], combination: &[usize], leaf: Option<usize>) {
    for &index in combination {
        owner[index] = leaf;
    }
}

impl Iterator for AssignmentComposer<'_> {
    type Item = Plan;

    fn next(&mut self) -> Option<Plan> {
        loop {
            if self.cancel.is_cancelled() {
                self.step = Step::Done;
            }
            match self.step {
                Step::Done => return None,
                Step::Advance => self.advance(),
                Step::Descend => {
                    if let Some(plan) = self.descend() {
                        return Some(plan);
                    }
                }
            }
        }
    }
}
