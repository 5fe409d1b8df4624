//! Search driver: one composer + frontier per elective configuration, with
//! results accumulated across configurations.
//!
//! The driver is a pull-based iterator: nothing runs until the caller asks
//! for the next batch, and every batch is handed out right after a frontier
//! improvement, so a host loop regains control between improvements.

use super::composer::AssignmentComposer;
use super::frontier::{FrontierEntry, Improvements};
use super::selections::{Selections, enumerate_selections};
use crate::models::{Plan, RequirementTree};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchOptions {
    /// Defer leaves that cannot reach their minimum instead of discarding
    /// the branch, and give them leftover courses at the end. Off unless a
    /// caller asks for it.
    pub fill_unsatisfiable_leaves: bool,
}

/// Cooperative cancellation flag shared between a host and a running search.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchStats {
    pub configurations: u64,
    pub plans_examined: u64,
    pub batches: u64,
}

/// Iterator over result batches. Each batch is every finished
/// configuration's final frontier followed by the current configuration's
/// frontier.
pub struct AssignmentSearch<'a> {
    tree: &'a RequirementTree,
    base: Plan,
    configurations: std::vec::IntoIter<Selections>,
    current: Option<Improvements<'a, AssignmentComposer<'a>>>,
    accumulated: Vec<FrontierEntry>,
    options: SearchOptions,
    cancel: CancelToken,
    stats: SearchStats,
}

/// Searches every elective configuration not pinned by `fixed`.
///
/// `plan` is used as given: courses it already assigns stay assigned, and
/// its manual overrides are each leaf's baseline. Its selection map is
/// replaced by each configuration in turn.
pub fn find_assignments<'a>(
    tree: &'a RequirementTree,
    plan: Plan,
    fixed: &Selections,
    options: SearchOptions,
    cancel: CancelToken,
) -> AssignmentSearch<'a> {
    let configurations = enumerate_selections(tree.root(), fixed);
    info!(
        configurations = configurations.len(),
        fixed = fixed.len(),
        "🧠 [search] starting assignment search"
    );
    AssignmentSearch {
        tree,
        base: plan,
        configurations: configurations.into_iter(),
        current: None,
        accumulated: Vec::new(),
        options,
        cancel,
        stats: SearchStats::default(),
    }
}

impl AssignmentSearch<'_> {
    pub fn stats(&self) -> SearchStats {
        let mut stats = self.stats;
        if let Some(current) = &self.current {
            stats.plans_examined += current.examined();
        }
        stats
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    fn start_next_configuration(&mut self) -> bool {
        let Some(selections) = self.configurations.next() else {
            return false;
        };
        let tree = self.tree;
        let leaves = tree.visible_leaves(&selections);
        self.stats.configurations += 1;
        info!(
            configuration = self.stats.configurations,
            leaves = leaves.len(),
            selections = ?selections,
            "[search] exploring elective configuration"
        );
        let base = self.base.with_selections(selections);
        let composer = AssignmentComposer::new(leaves, base, self.options, self.cancel.clone());
        self.current = Some(Improvements::new(tree.root(), composer));
        true
    }

    fn finish_configuration(&mut self) {
        if let Some(done) = self.current.take() {
            self.stats.plans_examined += done.examined();
            let entries = done.into_tracker().into_entries();
            debug!(frontier = entries.len(), "[search] configuration exhausted");
            self.accumulated.extend(entries);
        }
    }
}

impl Iterator for AssignmentSearch<'_> {
    type Item = Vec<FrontierEntry>;

    fn next(&mut self) -> Option<Vec<FrontierEntry>> {
        loop {
            if self.cancel.is_cancelled() {
                self.current = None;
                return None;
            }
            let improved = match self.current.as_mut() {
                Some(improvements) => improvements.next(),
                None => {
                    if !self.start_next_configuration() {
                        return None;
                    }
                    continue;
                }
            };
            match improved {
                Some(frontier) => {
                    self.stats.batches += 1;
                    let mut batch = self.accumulated.clone();
                    batch.extend(frontier);
                    return Some(batch);
                }
                None => self.finish_configuration(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::requirement::tests::{course, leaf, node, selection};
    use crate::models::{CourseStatus, RegisteredCreditCounts};

    #[test]
    fn both_elective_branches_are_reported() {
        let a = course("A", 3);
        let b = course("B", 3);
        let root = selection(
            "s",
            "track",
            vec![("first", leaf("l1", vec![a], 3, 3)), ("second", leaf("l2", vec![b], 3, 3))],
        );
        let tree = RequirementTree::new(root).unwrap();
        let plan = Plan::new()
            .with_status("A", CourseStatus::Acquired)
            .with_status("B", CourseStatus::Registered);

        let mut search = find_assignments(&tree, plan, &Selections::new(), SearchOptions::default(), CancelToken::new());
        let batches: Vec<Vec<FrontierEntry>> = search.by_ref().collect();
        let last = batches.last().unwrap();
        assert_eq!(last.len(), 2);
        assert_eq!(last[0].plan.selections().get("track").map(String::as_str), Some("first"));
        assert_eq!(last[0].counts, RegisteredCreditCounts::new(3, 3));
        assert_eq!(last[1].plan.selections().get("track").map(String::as_str), Some("second"));
        assert_eq!(last[1].plan.requirement_of("B"), Some("l2"));
        assert_eq!(search.stats().configurations, 2);
        assert_eq!(search.stats().batches, batches.len() as u64);
    }

    #[test]
    fn batches_grow_monotonically() {
        let a = course("A", 1);
        let b = course("B", 1);
        let c = course("C", 2);
        let root = node(
            "root",
            vec![leaf("l1", vec![a.clone(), c.clone()], 1, 2), leaf("l2", vec![a, b, c], 1, 2)],
            None,
        );
        let tree = RequirementTree::new(root).unwrap();
        let plan = Plan::new()
            .with_status("A", CourseStatus::Acquired)
            .with_status("B", CourseStatus::Registered)
            .with_status("C", CourseStatus::Acquired);

        let batches: Vec<Vec<FrontierEntry>> =
            find_assignments(&tree, plan, &Selections::new(), SearchOptions::default(), CancelToken::new()).collect();
        assert!(!batches.is_empty());
        for pair in batches.windows(2) {
            for earlier in &pair[0] {
                assert!(pair[1].iter().all(|later| !earlier.counts.dominates(&later.counts)));
            }
        }
        let best = batches.last().unwrap();
        assert!(best.iter().any(|e| e.counts == RegisteredCreditCounts::new(3, 4)));
    }

    #[test]
    fn cancelled_search_yields_nothing() {
        let tree = RequirementTree::new(leaf("l", vec![course("A", 1)], 1, 1)).unwrap();
        let plan = Plan::new().with_status("A", CourseStatus::Acquired);
        let cancel = CancelToken::new();
        cancel.cancel();
        let mut search = find_assignments(&tree, plan, &Selections::new(), SearchOptions::default(), cancel);
        assert!(search.next().is_none());
        assert!(search.is_cancelled());
    }

    #[test]
    fn default_search_does_not_defer_unsatisfiable_leaves() {
        let tree = RequirementTree::new(leaf("l", vec![course("A", 1)], 5, 5)).unwrap();
        let plan = Plan::new().with_status("A", CourseStatus::Acquired);
        assert!(!SearchOptions::default().fill_unsatisfiable_leaves);
        let batches: Vec<_> =
            find_assignments(&tree, plan.clone(), &Selections::new(), SearchOptions::default(), CancelToken::new())
                .collect();
        assert!(batches.is_empty());

        let deferring = SearchOptions { fill_unsatisfiable_leaves: true };
        let batches: Vec<_> = find_assignments(&tree, plan, &Selections::new(), deferring, CancelToken::new()).collect();
        assert_eq!(batches.len(), 1);
        assert_eq!(batches[0][0].plan.requirement_of("A"), Some("l"));
    }
}
