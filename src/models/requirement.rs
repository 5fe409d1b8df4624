//! Requirement tree: leaves that take courses, internal nodes that group
//! children, and elective selections where one option is active at a time.
//!
//! Every operation here is a pure function of the tree and a [`Plan`].

use super::{Course, CourseStatus, CreditRange, Plan, RegisteredCreditCounts, StatusReport, status_report};
use crate::error::ConfigError;
use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

#[derive(Debug, Clone)]
pub enum Requirement {
    WithCourses(RequirementWithCourses),
    WithChildren(RequirementWithChildren),
    Selection(RequirementSelection),
}

/// Leaf requirement: a credit range to fill from a list of courses.
#[derive(Debug, Clone)]
pub struct RequirementWithCourses {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub courses: Vec<Arc<Course>>,
    pub credit_range: CreditRange,
    /// Allows manually entered credits on top of tracked courses.
    pub allows_others: bool,
}

#[derive(Debug, Clone)]
pub struct RequirementWithChildren {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub children: Vec<Requirement>,
    /// When absent the effective range is the sum of the children's ranges.
    pub credit_range: Option<CreditRange>,
}

#[derive(Debug, Clone)]
pub struct RequirementSelection {
    pub id: String,
    pub name: String,
    pub options: Vec<SelectionOption>,
}

#[derive(Debug, Clone)]
pub struct SelectionOption {
    pub name: String,
    pub requirement: Requirement,
}

impl RequirementWithCourses {
    pub fn registered_credit_counts(&self, plan: &Plan, includes_excess: bool) -> RegisteredCreditCounts {
        let mut counts = RegisteredCreditCounts::default();
        for course in &self.courses {
            if plan.requirement_of(&course.code) != Some(self.id.as_str()) {
                continue;
            }
            counts = counts + RegisteredCreditCounts::of_course(course.credit_count, plan.status_of(&course.code));
        }
        if self.allows_others {
            counts = counts + plan.others_count(&self.id);
        }
        if includes_excess {
            counts
        } else {
            counts.clamped_to(self.credit_range.max)
        }
    }

    pub fn contains_course(&self, code: &str) -> bool {
        self.courses.iter().any(|c| c.code == code)
    }
}

impl RequirementSelection {
    /// Option chosen by `selections[name]`, or the first option when the
    /// selection is not mentioned. `None` when the chosen name does not exist
    /// or there are no options.
    pub fn active_option(&self, selections: &BTreeMap<String, String>) -> Option<&SelectionOption> {
        match selections.get(&self.name) {
            Some(option_name) => self.options.iter().find(|o| &o.name == option_name),
            None => self.options.first(),
        }
    }
}

impl Requirement {
    pub fn id(&self) -> &str {
        match self {
            Requirement::WithCourses(r) => &r.id,
            Requirement::WithChildren(r) => &r.id,
            Requirement::Selection(r) => &r.id,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Requirement::WithCourses(r) => &r.name,
            Requirement::WithChildren(r) => &r.name,
            Requirement::Selection(r) => &r.name,
        }
    }

    pub fn as_leaf(&self) -> Option<&RequirementWithCourses> {
        match self {
            Requirement::WithCourses(r) => Some(r),
            _ => None,
        }
    }

    /// Credits counted for this requirement. Without `includes_excess` every
    /// level clamps to its own maximum.
    pub fn registered_credit_counts(&self, plan: &Plan, includes_excess: bool) -> RegisteredCreditCounts {
        match self {
            Requirement::WithCourses(leaf) => leaf.registered_credit_counts(plan, includes_excess),
            Requirement::WithChildren(node) => {
                let counts = node
                    .children
                    .iter()
                    .map(|child| child.registered_credit_counts(plan, includes_excess))
                    .fold(RegisteredCreditCounts::default(), |acc, c| acc + c);
                match node.credit_range {
                    Some(range) if !includes_excess => counts.clamped_to(range.max),
                    _ => counts,
                }
            }
            Requirement::Selection(selection) => selection
                .active_option(plan.selections())
                .map(|o| o.requirement.registered_credit_counts(plan, includes_excess))
                .unwrap_or_default(),
        }
    }

    pub fn required_credit_count(&self, selections: &BTreeMap<String, String>) -> CreditRange {
        match self {
            Requirement::WithCourses(leaf) => leaf.credit_range,
            Requirement::WithChildren(node) => node.credit_range.unwrap_or_else(|| {
                node.children
                    .iter()
                    .map(|child| child.required_credit_count(selections))
                    .fold(CreditRange::default(), |acc, r| acc + r)
            }),
            Requirement::Selection(selection) => selection
                .active_option(selections)
                .map(|o| o.requirement.required_credit_count(selections))
                .unwrap_or_default(),
        }
    }

    pub fn status(&self, plan: &Plan) -> CourseStatus {
        match self {
            Requirement::WithCourses(_) => self.own_status(plan),
            Requirement::WithChildren(node) => node
                .children
                .iter()
                .map(|child| child.status(plan))
                .fold(self.own_status(plan), CourseStatus::min),
            Requirement::Selection(selection) => selection
                .active_option(plan.selections())
                .map(|o| o.requirement.status(plan))
                .unwrap_or(CourseStatus::Unregistered),
        }
    }

    fn own_status(&self, plan: &Plan) -> CourseStatus {
        let counts = self.registered_credit_counts(plan, false);
        let required = self.required_credit_count(plan.selections());
        if counts.acquired >= required.min {
            CourseStatus::Acquired
        } else if counts.registered >= required.min {
            CourseStatus::Registered
        } else {
            CourseStatus::Unregistered
        }
    }

    /// Leaves reachable under the given elective choices, in tree order.
    pub fn visible_leaves<'a>(&'a self, selections: &BTreeMap<String, String>) -> Vec<&'a RequirementWithCourses> {
        let mut leaves = Vec::new();
        self.collect_visible_leaves(selections, &mut leaves);
        leaves
    }

    fn collect_visible_leaves<'a>(
        &'a self,
        selections: &BTreeMap<String, String>,
        out: &mut Vec<&'a RequirementWithCourses>,
    ) {
        match self {
            Requirement::WithCourses(leaf) => out.push(leaf),
            Requirement::WithChildren(node) => {
                for child in &node.children {
                    child.collect_visible_leaves(selections, out);
                }
            }
            Requirement::Selection(selection) => {
                if let Some(option) = selection.active_option(selections) {
                    option.requirement.collect_visible_leaves(selections, out);
                }
            }
        }
    }

    /// Depth-first walk over every node, including inactive options.
    pub fn walk<'a>(&'a self, visit: &mut dyn FnMut(&'a Requirement)) {
        visit(self);
        match self {
            Requirement::WithCourses(_) => {}
            Requirement::WithChildren(node) => {
                for child in &node.children {
                    child.walk(visit);
                }
            }
            Requirement::Selection(selection) => {
                for option in &selection.options {
                    option.requirement.walk(visit);
                }
            }
        }
    }
}

/// Root of a validated requirement tree (ids are unique).
#[derive(Debug, Clone)]
pub struct RequirementTree {
    root: Requirement,
    leaf_ids: HashSet<String>,
}

impl RequirementTree {
    pub fn new(root: Requirement) -> Result<Self, ConfigError> {
        let mut seen: HashSet<&str> = HashSet::new();
        let mut duplicate: Option<String> = None;
        let mut leaf_ids = HashSet::new();
        root.walk(&mut |node| {
            if !seen.insert(node.id()) && duplicate.is_none() {
                duplicate = Some(node.id().to_string());
            }
            if let Requirement::WithCourses(leaf) = node {
                leaf_ids.insert(leaf.id.clone());
            }
        });
        if let Some(id) = duplicate {
            return Err(ConfigError::DuplicateRequirementId { id });
        }
        Ok(Self { root, leaf_ids })
    }

    pub fn root(&self) -> &Requirement {
        &self.root
    }

    pub fn find(&self, id: &str) -> Option<&Requirement> {
        let mut found = None;
        self.root.walk(&mut |node| {
            if found.is_none() && node.id() == id {
                found = Some(node);
            }
        });
        found
    }

    /// Every leaf of the tree, under every option of every selection.
    pub fn all_leaves(&self) -> Vec<&RequirementWithCourses> {
        let mut leaves = Vec::new();
        self.root.walk(&mut |node| {
            if let Requirement::WithCourses(leaf) = node {
                leaves.push(leaf);
            }
        });
        leaves
    }

    pub fn is_leaf_id(&self, id: &str) -> bool {
        self.leaf_ids.contains(id)
    }

    pub fn visible_leaves(&self, selections: &BTreeMap<String, String>) -> Vec<&RequirementWithCourses> {
        self.root.visible_leaves(selections)
    }

    pub fn status_report(&self, plan: &Plan) -> StatusReport {
        status_report(&self.root, plan)
    }
}
