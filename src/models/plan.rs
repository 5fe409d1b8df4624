use super::{CourseStatus, RegisteredCreditCounts, RequirementTree};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Search state: what the student has, where each course counts, and which
/// electives are chosen.
///
/// Every field sits behind an `Arc`, so cloning a plan is cheap and the
/// `with_*` helpers copy only the map they touch. A plan is never mutated
/// in place once handed out.
///
/// Courses are keyed by code and requirements by id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Plan {
    #[serde(default)]
    course_to_status: Arc<BTreeMap<String, CourseStatus>>,
    #[serde(default)]
    course_to_requirement: Arc<BTreeMap<String, String>>,
    #[serde(default)]
    requirement_to_others_count: Arc<BTreeMap<String, RegisteredCreditCounts>>,
    #[serde(default)]
    selection_name_to_option_name: Arc<BTreeMap<String, String>>,
}

impl Plan {
    pub fn new() -> Self {
        Self::default()
    }

    /// Status of a course; unknown courses are `Unregistered`.
    pub fn status_of(&self, code: &str) -> CourseStatus {
        self.course_to_status.get(code).copied().unwrap_or_default()
    }

    /// Id of the leaf requirement a course counts toward, if any.
    pub fn requirement_of(&self, code: &str) -> Option<&str> {
        self.course_to_requirement.get(code).map(String::as_str)
    }

    pub fn is_assigned(&self, code: &str) -> bool {
        self.course_to_requirement.contains_key(code)
    }

    pub fn others_count(&self, requirement_id: &str) -> RegisteredCreditCounts {
        self.requirement_to_others_count
            .get(requirement_id)
            .copied()
            .unwrap_or_default()
    }

    pub fn selections(&self) -> &BTreeMap<String, String> {
        &self.selection_name_to_option_name
    }

    pub fn course_statuses(&self) -> &BTreeMap<String, CourseStatus> {
        &self.course_to_status
    }

    pub fn course_assignments(&self) -> &BTreeMap<String, String> {
        &self.course_to_requirement
    }

    pub fn others_counts(&self) -> &BTreeMap<String, RegisteredCreditCounts> {
        &self.requirement_to_others_count
    }

    pub fn with_status(&self, code: impl Into<String>, status: CourseStatus) -> Plan {
        let mut plan = self.clone();
        Arc::make_mut(&mut plan.course_to_status).insert(code.into(), status);
        plan
    }

    pub fn with_assignment(&self, code: impl Into<String>, requirement_id: impl Into<String>) -> Plan {
        let mut plan = self.clone();
        Arc::make_mut(&mut plan.course_to_requirement).insert(code.into(), requirement_id.into());
        plan
    }

    /// Adds several course -> requirement entries in one copy.
    pub fn with_assignments<I, C, R>(&self, assignments: I) -> Plan
    where
        I: IntoIterator<Item = (C, R)>,
        C: Into<String>,
        R: Into<String>,
    {
        let mut plan = self.clone();
        let map = Arc::make_mut(&mut plan.course_to_requirement);
        for (code, requirement_id) in assignments {
            map.insert(code.into(), requirement_id.into());
        }
        plan
    }

    pub fn without_assignment(&self, code: &str) -> Plan {
        if !self.course_to_requirement.contains_key(code) {
            return self.clone();
        }
        let mut plan = self.clone();
        Arc::make_mut(&mut plan.course_to_requirement).remove(code);
        plan
    }

    /// Drops every assignment whose target requirement satisfies `predicate`.
    pub fn without_assignments_where<F>(&self, predicate: F) -> Plan
    where
        F: Fn(&str) -> bool,
    {
        if !self.course_to_requirement.values().any(|id| predicate(id)) {
            return self.clone();
        }
        let mut plan = self.clone();
        Arc::make_mut(&mut plan.course_to_requirement).retain(|_, id| !predicate(id));
        plan
    }

    /// Drops every assignment pointing at a leaf of `tree`. Statuses,
    /// overrides and selections are kept.
    pub fn without_assignments_into(&self, tree: &RequirementTree) -> Plan {
        self.without_assignments_where(|id| tree.is_leaf_id(id))
    }

    pub fn with_others_count(&self, requirement_id: impl Into<String>, counts: RegisteredCreditCounts) -> Plan {
        let mut plan = self.clone();
        Arc::make_mut(&mut plan.requirement_to_others_count).insert(requirement_id.into(), counts);
        plan
    }

    pub fn with_selection(&self, selection_name: impl Into<String>, option_name: impl Into<String>) -> Plan {
        let mut plan = self.clone();
        Arc::make_mut(&mut plan.selection_name_to_option_name)
            .insert(selection_name.into(), option_name.into());
        plan
    }

    /// Replaces the whole selection map.
    pub fn with_selections(&self, selections: BTreeMap<String, String>) -> Plan {
        let mut plan = self.clone();
        plan.selection_name_to_option_name = Arc::new(selections);
        plan
    }

    /// `true` when both plans share the same assignment map allocation.
    pub fn shares_assignments_with(&self, other: &Plan) -> bool {
        Arc::ptr_eq(&self.course_to_requirement, &other.course_to_requirement)
    }
}
