//! Tagged-by-shape JSON for requirement trees.
//!
//! A node with `courses` is a course leaf, one with `children` groups other
//! nodes, one with `options` is an elective selection. Options are either
//! `{name, requirement}` or a bare requirement whose own name is reused.

use crate::error::ConfigError;
use crate::models::{
    CourseCatalogue, CreditRange, Requirement, RequirementSelection, RequirementTree,
    RequirementWithChildren, RequirementWithCourses, SelectionOption,
};
use serde_json::{Map, Value, json};
use std::collections::HashSet;

pub fn decode_requirement_tree(value: &Value, catalogue: &CourseCatalogue) -> Result<RequirementTree, ConfigError> {
    let root = decode_requirement(value, catalogue, "$")?;
    RequirementTree::new(root)
}

fn decode_requirement(value: &Value, catalogue: &CourseCatalogue, path: &str) -> Result<Requirement, ConfigError> {
    let Some(object) = value.as_object() else {
        return Err(ConfigError::UnrecognizedRequirement { path: path.to_string() });
    };
    let id = id_field(object, path)?;
    let name = string_field(object, "name", path)?;
    let description = optional_string_field(object, "description", path)?;

    if let Some(courses) = object.get("courses") {
        let courses_path = format!("{}.courses", path);
        let Some(codes) = courses.as_array() else {
            return Err(invalid(&courses_path, "courses", "expected an array of course codes"));
        };
        let mut seen = HashSet::new();
        let mut resolved = Vec::with_capacity(codes.len());
        for (i, code) in codes.iter().enumerate() {
            let code_path = format!("{}[{}]", courses_path, i);
            let Some(code) = code.as_str() else {
                return Err(invalid(&code_path, "courses", "course codes must be strings"));
            };
            let course = catalogue.get(code).ok_or_else(|| ConfigError::UnknownCourse {
                code: code.to_string(),
                path: code_path.clone(),
            })?;
            if seen.insert(code) {
                resolved.push(course.clone());
            }
        }
        let credit_range = match object.get("creditCount") {
            Some(v) => decode_range(v, path)?,
            None => {
                return Err(ConfigError::MissingField {
                    path: path.to_string(),
                    field: "creditCount",
                });
            }
        };
        let allows_others = match object.get("allowsOthers") {
            None | Some(Value::Null) => false,
            Some(Value::Bool(b)) => *b,
            Some(_) => return Err(invalid(path, "allowsOthers", "expected a boolean")),
        };
        return Ok(Requirement::WithCourses(RequirementWithCourses {
            id,
            name,
            description,
            courses: resolved,
            credit_range,
            allows_others,
        }));
    }

    if let Some(children) = object.get("children") {
        let Some(children) = children.as_array() else {
            return Err(invalid(path, "children", "expected an array"));
        };
        let children = children
            .iter()
            .enumerate()
            .map(|(i, child)| decode_requirement(child, catalogue, &format!("{}.children[{}]", path, i)))
            .collect::<Result<Vec<_>, _>>()?;
        let credit_range = match object.get("creditCount") {
            None | Some(Value::Null) => None,
            Some(v) => Some(decode_range(v, path)?),
        };
        return Ok(Requirement::WithChildren(RequirementWithChildren {
            id,
            name,
            description,
            children,
            credit_range,
        }));
    }

    if let Some(options) = object.get("options") {
        let Some(options) = options.as_array() else {
            return Err(invalid(path, "options", "expected an array"));
        };
        let mut decoded = Vec::with_capacity(options.len());
        for (i, option) in options.iter().enumerate() {
            let option_path = format!("{}.options[{}]", path, i);
            let wrapped = option.as_object().and_then(|o| o.get("requirement").map(|r| (o, r)));
            let decoded_option = match wrapped {
                Some((wrapper, requirement)) => SelectionOption {
                    name: string_field(wrapper, "name", &option_path)?,
                    requirement: decode_requirement(requirement, catalogue, &format!("{}.requirement", option_path))?,
                },
                None => {
                    let requirement = decode_requirement(option, catalogue, &option_path)?;
                    SelectionOption {
                        name: requirement.name().to_string(),
                        requirement,
                    }
                }
            };
            decoded.push(decoded_option);
        }
        return Ok(Requirement::Selection(RequirementSelection {
            id,
            name,
            options: decoded,
        }));
    }

    Err(ConfigError::UnrecognizedRequirement { path: path.to_string() })
}

fn decode_range(value: &Value, path: &str) -> Result<CreditRange, ConfigError> {
    let range = match value {
        Value::Number(_) => CreditRange::exactly(integer(value, path, "creditCount")?),
        Value::Object(bounds) => {
            let min = bounds
                .get("min")
                .ok_or_else(|| invalid(path, "creditCount", "missing `min`"))?;
            let max = bounds
                .get("max")
                .ok_or_else(|| invalid(path, "creditCount", "missing `max`"))?;
            CreditRange::new(integer(min, path, "creditCount")?, integer(max, path, "creditCount")?)
        }
        _ => return Err(invalid(path, "creditCount", "expected a number or {min, max}")),
    };
    if range.min < 0 || range.min > range.max {
        return Err(ConfigError::InvalidRange {
            path: path.to_string(),
            min: range.min,
            max: range.max,
        });
    }
    Ok(range)
}

fn integer(value: &Value, path: &str, field: &'static str) -> Result<i32, ConfigError> {
    value
        .as_i64()
        .and_then(|n| i32::try_from(n).ok())
        .ok_or_else(|| invalid(path, field, "expected an integer"))
}

fn id_field(object: &Map<String, Value>, path: &str) -> Result<String, ConfigError> {
    match object.get("id") {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(Value::Number(n)) => Ok(n.to_string()),
        Some(_) => Err(invalid(path, "id", "expected a string or number")),
        None => Err(ConfigError::MissingField {
            path: path.to_string(),
            field: "id",
        }),
    }
}

fn string_field(object: &Map<String, Value>, field: &'static str, path: &str) -> Result<String, ConfigError> {
    match object.get(field) {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(_) => Err(invalid(path, field, "expected a string")),
        None => Err(ConfigError::MissingField {
            path: path.to_string(),
            field,
        }),
    }
}

fn optional_string_field(
    object: &Map<String, Value>,
    field: &'static str,
    path: &str,
) -> Result<Option<String>, ConfigError> {
    match object.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(invalid(path, field, "expected a string")),
    }
}

fn invalid(path: &str, field: &'static str, reason: &str) -> ConfigError {
    ConfigError::InvalidField {
        path: path.to_string(),
        field,
        reason: reason.to_string(),
    }
}

/// Inverse of [`decode_requirement_tree`].
pub fn encode_requirement_tree(tree: &RequirementTree) -> Value {
    encode_requirement(tree.root())
}

fn encode_range(range: CreditRange) -> Value {
    if range.min == range.max {
        json!(range.min)
    } else {
        json!({"min": range.min, "max": range.max})
    }
}

fn encode_requirement(requirement: &Requirement) -> Value {
    let mut object = Map::new();
    object.insert("id".into(), json!(requirement.id()));
    object.insert("name".into(), json!(requirement.name()));
    match requirement {
        Requirement::WithCourses(leaf) => {
            if let Some(d) = &leaf.description {
                object.insert("description".into(), json!(d));
            }
            let codes: Vec<&str> = leaf.courses.iter().map(|c| c.code.as_str()).collect();
            object.insert("courses".into(), json!(codes));
            object.insert("creditCount".into(), encode_range(leaf.credit_range));
            if leaf.allows_others {
                object.insert("allowsOthers".into(), json!(true));
            }
        }
        Requirement::WithChildren(node) => {
            if let Some(d) = &node.description {
                object.insert("description".into(), json!(d));
            }
            let children: Vec<Value> = node.children.iter().map(encode_requirement).collect();
            object.insert("children".into(), Value::Array(children));
            if let Some(range) = node.credit_range {
                object.insert("creditCount".into(), encode_range(range));
            }
        }
        Requirement::Selection(selection) => {
            let options: Vec<Value> = selection
                .options
                .iter()
                .map(|o| json!({"name": o.name, "requirement": encode_requirement(&o.requirement)}))
                .collect();
            object.insert("options".into(), Value::Array(options));
        }
    }
    Value::Object(object)
}
