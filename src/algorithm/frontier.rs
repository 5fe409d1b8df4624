//! Non-dominated set of plans under (acquired, registered) credits.

use crate::models::{Plan, RegisteredCreditCounts, Requirement};
use tracing::debug;

#[derive(Debug, Clone, PartialEq)]
pub struct FrontierEntry {
    pub counts: RegisteredCreditCounts,
    pub plan: Plan,
}

/// Keeps every seen plan that no other seen plan dominates. One plan stands
/// for each frontier point: a candidate with the same counts as a member is
/// not added.
#[derive(Debug, Clone, Default)]
pub struct FrontierTracker {
    entries: Vec<FrontierEntry>,
}

impl FrontierTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` when the frontier changed. Plans scoring the same
    /// point as a member are kept alongside it; only an identical plan is
    /// turned away.
    pub fn offer(&mut self, plan: Plan, counts: RegisteredCreditCounts) -> bool {
        if self
            .entries
            .iter()
            .any(|e| e.counts.dominates(&counts) || (e.counts == counts && e.plan == plan))
        {
            return false;
        }
        self.entries.retain(|e| !counts.dominates(&e.counts));
        self.entries.push(FrontierEntry { counts, plan });
        true
    }

    pub fn entries(&self) -> &[FrontierEntry] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<FrontierEntry> {
        self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Turns a stream of complete plans into a stream of frontier snapshots, one
/// per improvement. Counts are taken at `root`, without excess.
pub struct Improvements<'a, I> {
    root: &'a Requirement,
    plans: I,
    tracker: FrontierTracker,
    examined: u64,
}

impl<'a, I> Improvements<'a, I>
where
    I: Iterator<Item = Plan>,
{
    pub fn new(root: &'a Requirement, plans: I) -> Self {
        Self {
            root,
            plans,
            tracker: FrontierTracker::new(),
            examined: 0,
        }
    }

    pub fn examined(&self) -> u64 {
        self.examined
    }

    pub fn tracker(&self) -> &FrontierTracker {
        &self.tracker
    }

    pub fn into_tracker(self) -> FrontierTracker {
        self.tracker
    }
}

impl<I> Iterator for Improvements<'_, I>
where
    I: Iterator<Item = Plan>,
{
    type Item = Vec<FrontierEntry>;

    fn next(&mut self) -> Option<Vec<FrontierEntry>> {
        for plan in self.plans.by_ref() {
            self.examined += 1;
            let counts = self.root.registered_credit_counts(&plan, false);
            if self.tracker.offer(plan, counts) {
                debug!(
                    acquired = counts.acquired,
                    registered = counts.registered,
                    frontier = self.tracker.entries().len(),
                    examined = self.examined,
                    "frontier improved"
                );
                return Some(self.tracker.entries().to_vec());
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CourseStatus;
    use crate::models::requirement::tests::{course, leaf};

    fn counts(acquired: i32, registered: i32) -> RegisteredCreditCounts {
        RegisteredCreditCounts::new(acquired, registered)
    }

    #[test]
    fn first_candidate_seeds_frontier() {
        let mut tracker = FrontierTracker::new();
        assert!(tracker.offer(Plan::new(), counts(0, 0)));
        assert_eq!(tracker.entries().len(), 1);
    }

    #[test]
    fn dominated_candidates_are_rejected() {
        let mut tracker = FrontierTracker::new();
        assert!(tracker.offer(Plan::new(), counts(3, 5)));
        assert!(!tracker.offer(Plan::new(), counts(3, 4)));
        assert!(!tracker.offer(Plan::new(), counts(3, 5)));
        assert_eq!(tracker.entries().len(), 1);
    }

    #[test]
    fn distinct_plans_on_the_same_point_are_kept() {
        let mut tracker = FrontierTracker::new();
        let first = Plan::new().with_assignments([("A", "l1"), ("C", "l2")]);
        let second = Plan::new().with_assignments([("B", "l1"), ("A", "l2")]);
        assert!(tracker.offer(first.clone(), counts(3, 6)));
        assert!(tracker.offer(second.clone(), counts(3, 6)));
        assert!(!tracker.offer(second.clone(), counts(3, 6)));
        let plans: Vec<&Plan> = tracker.entries().iter().map(|e| &e.plan).collect();
        assert_eq!(plans, vec![&first, &second]);

        assert!(tracker.offer(Plan::new(), counts(4, 6)));
        assert_eq!(tracker.entries().len(), 1);
    }

    #[test]
    fn dominating_candidate_replaces_members() {
        let mut tracker = FrontierTracker::new();
        tracker.offer(Plan::new(), counts(5, 5));
        tracker.offer(Plan::new(), counts(2, 8));
        assert_eq!(tracker.entries().len(), 2);

        assert!(tracker.offer(Plan::new(), counts(6, 9)));
        let points: Vec<RegisteredCreditCounts> = tracker.entries().iter().map(|e| e.counts).collect();
        assert_eq!(points, vec![counts(6, 9)]);
    }

    #[test]
    fn incomparable_points_coexist() {
        let mut tracker = FrontierTracker::new();
        tracker.offer(Plan::new(), counts(5, 5));
        assert!(tracker.offer(Plan::new(), counts(4, 7)));
        assert!(tracker.offer(Plan::new(), counts(6, 5)));
        let points: Vec<RegisteredCreditCounts> = tracker.entries().iter().map(|e| e.counts).collect();
        assert_eq!(points, vec![counts(4, 7), counts(6, 5)]);
    }

    #[test]
    fn improvements_stream_only_on_change() {
        let a = course("A", 2);
        let b = course("B", 2);
        let root = leaf("l", vec![a, b], 0, 4);
        let base = Plan::new()
            .with_status("A", CourseStatus::Acquired)
            .with_status("B", CourseStatus::Registered);
        let plans = vec![
            base.with_assignment("B", "l"),
            base.with_assignment("B", "l"),
            base.with_assignment("A", "l"),
            base.with_assignments([("A", "l"), ("B", "l")]),
        ];

        let mut improvements = Improvements::new(&root, plans.into_iter());
        let batches: Vec<Vec<FrontierEntry>> = improvements.by_ref().collect();
        assert_eq!(batches.len(), 3);
        assert_eq!(batches[0][0].counts, counts(0, 2));
        assert_eq!(batches[1][0].counts, counts(2, 2));
        assert_eq!(batches[2].len(), 1);
        assert_eq!(batches[2][0].counts, counts(2, 4));
        assert_eq!(improvements.examined(), 4);
    }
}
