use super::{CourseStatus, CreditRange, Plan, RegisteredCreditCounts, Requirement};
use serde::Serialize;

/// Status of one requirement node, mirroring the tree. Selections report
/// only their active option.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusReport {
    pub id: String,
    pub name: String,
    pub status: CourseStatus,
    pub credits: RegisteredCreditCounts,
    pub required: RequiredCredits,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<StatusReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active_option: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RequiredCredits {
    pub min: i32,
    pub max: i32,
}

impl From<CreditRange> for RequiredCredits {
    fn from(range: CreditRange) -> Self {
        Self { min: range.min, max: range.max }
    }
}

pub fn status_report(requirement: &Requirement, plan: &Plan) -> StatusReport {
    let children = match requirement {
        Requirement::WithCourses(_) => Vec::new(),
        Requirement::WithChildren(node) => node.children.iter().map(|c| status_report(c, plan)).collect(),
        Requirement::Selection(selection) => selection
            .active_option(plan.selections())
            .map(|o| vec![status_report(&o.requirement, plan)])
            .unwrap_or_default(),
    };
    let active_option = match requirement {
        Requirement::Selection(selection) => selection.active_option(plan.selections()).map(|o| o.name.clone()),
        _ => None,
    };
    StatusReport {
        id: requirement.id().to_string(),
        name: requirement.name().to_string(),
        status: requirement.status(plan),
        credits: requirement.registered_credit_counts(plan, false),
        required: requirement.required_credit_count(plan.selections()).into(),
        children,
        active_option,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::requirement::tests::{course, leaf, node, selection};

    #[test]
    fn report_mirrors_active_tree() {
        let a = course("A", 3);
        let root = node(
            "root",
            vec![
                leaf("core", vec![a], 3, 3),
                selection("s", "track", vec![("x", leaf("x1", vec![], 2, 2)), ("y", leaf("y1", vec![], 0, 0))]),
            ],
            None,
        );
        let plan = Plan::new()
            .with_status("A", CourseStatus::Acquired)
            .with_assignment("A", "core")
            .with_selection("track", "y");

        let report = status_report(&root, &plan);
        assert_eq!(report.status, CourseStatus::Acquired);
        assert_eq!(report.credits, RegisteredCreditCounts::new(3, 3));
        assert_eq!(report.required, RequiredCredits { min: 3, max: 3 });
        assert_eq!(report.children.len(), 2);
        let track = &report.children[1];
        assert_eq!(track.active_option.as_deref(), Some("y"));
        assert_eq!(track.children[0].id, "y1");
    }
}
