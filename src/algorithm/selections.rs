//! Elective configurations: the cartesian product of every selection choice
//! that is not held constant by the caller.

use crate::models::Requirement;
use std::collections::BTreeMap;

pub type Selections = BTreeMap<String, String>;

/// Every concrete selection map reachable from `root`, starting from `fixed`.
///
/// A selection already named in the map (fixed by the caller, or chosen
/// further up the same walk) is followed, not forked. Only active options
/// are walked, so nested selections fork only under their own option.
/// The result always has at least one entry.
pub fn enumerate_selections(root: &Requirement, fixed: &Selections) -> Vec<Selections> {
    forks(root, fixed.clone())
}

fn forks(requirement: &Requirement, current: Selections) -> Vec<Selections> {
    match requirement {
        Requirement::WithCourses(_) => vec![current],
        Requirement::WithChildren(node) => {
            node.children.iter().fold(vec![current], |configurations, child| {
                configurations
                    .into_iter()
                    .flat_map(|configuration| forks(child, configuration))
                    .collect()
            })
        }
        Requirement::Selection(selection) => {
            if current.contains_key(&selection.name) || selection.options.is_empty() {
                return match selection.active_option(&current) {
                    Some(option) => forks(&option.requirement, current),
                    None => vec![current],
                };
            }
            selection
                .options
                .iter()
                .flat_map(|option| {
                    let mut chosen = current.clone();
                    chosen.insert(selection.name.clone(), option.name.clone());
                    forks(&option.requirement, chosen)
                })
                .collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::requirement::tests::{leaf, node, selection};

    fn names(configurations: &[Selections], key: &str) -> Vec<Option<String>> {
        configurations.iter().map(|c| c.get(key).cloned()).collect()
    }

    #[test]
    fn leaf_only_tree_has_one_configuration() {
        let root = leaf("l", vec![], 1, 1);
        assert_eq!(enumerate_selections(&root, &Selections::new()), vec![Selections::new()]);
    }

    #[test]
    fn sibling_selections_multiply() {
        let root = node(
            "root",
            vec![
                selection("s1", "major", vec![("a", leaf("a", vec![], 1, 1)), ("b", leaf("b", vec![], 1, 1))]),
                selection(
                    "s2",
                    "minor",
                    vec![
                        ("x", leaf("x", vec![], 1, 1)),
                        ("y", leaf("y", vec![], 1, 1)),
                        ("z", leaf("z", vec![], 1, 1)),
                    ],
                ),
            ],
            None,
        );
        let configurations = enumerate_selections(&root, &Selections::new());
        assert_eq!(configurations.len(), 6);
        assert_eq!(names(&configurations, "major")[0].as_deref(), Some("a"));
        assert_eq!(names(&configurations, "minor")[2].as_deref(), Some("z"));
        assert_eq!(names(&configurations, "major")[3].as_deref(), Some("b"));
    }

    #[test]
    fn nested_selection_forks_only_under_its_option() {
        let root = selection(
            "s",
            "track",
            vec![
                (
                    "deep",
                    selection("inner", "focus", vec![("p", leaf("p", vec![], 1, 1)), ("q", leaf("q", vec![], 1, 1))]),
                ),
                ("flat", leaf("f", vec![], 1, 1)),
            ],
        );
        let configurations = enumerate_selections(&root, &Selections::new());
        assert_eq!(configurations.len(), 3);
        assert_eq!(configurations[2].get("track").map(String::as_str), Some("flat"));
        assert!(!configurations[2].contains_key("focus"));
    }

    #[test]
    fn fixed_choices_are_held_constant() {
        let root = node(
            "root",
            vec![
                selection("s1", "major", vec![("a", leaf("a", vec![], 1, 1)), ("b", leaf("b", vec![], 1, 1))]),
                selection("s2", "minor", vec![("x", leaf("x", vec![], 1, 1)), ("y", leaf("y", vec![], 1, 1))]),
            ],
            None,
        );
        let mut fixed = Selections::new();
        fixed.insert("major".into(), "b".into());
        let configurations = enumerate_selections(&root, &fixed);
        assert_eq!(configurations.len(), 2);
        assert!(configurations.iter().all(|c| c.get("major").map(String::as_str) == Some("b")));
    }
}
