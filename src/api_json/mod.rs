// Formatos JSON de entrada/salida: árbol de requisitos, catálogo de cursos,
// Plan, petición de búsqueda y líneas NDJSON de respuesta.
pub mod requirement_tree;

pub use requirement_tree::{decode_requirement_tree, encode_requirement_tree};

use crate::algorithm::{SearchOptions, Selections};
use crate::error::{ConfigError, EngineResult, PlanDecodeError};
use crate::models::{Course, CourseCatalogue, Plan, RequirementTree};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Search job as received on the wire.
///
/// # Estructura del JSON esperado:
/// ```json
/// {
///   "requirementTree": {"id": "root", "name": "Degree", "children": [
///     {"id": "math", "name": "Math", "courses": ["MAT101", "MAT102"], "creditCount": {"min": 6, "max": 12}}
///   ]},
///   "plan": {"courseToStatus": {"MAT101": "acquired", "MAT102": "registered"}},
///   "courseCatalogue": [
///     {"code": "MAT101", "title": "Calculus I", "creditCount": 6},
///     {"code": "MAT102", "title": "Calculus II", "creditCount": 6}
///   ],
///   "fixedSelections": null,
///   "options": {"fillUnsatisfiableLeaves": false}
/// }
/// ```
///
/// - `courseCatalogue` may also be an object `code -> {title?, creditCount}`.
/// - `plan` may be omitted (empty plan).
/// - `fixedSelections` absent: the plan's own selections are held constant.
/// - `options` may be omitted; leaf deferral is then off.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchJobRequest {
    pub requirement_tree: Value,
    #[serde(default)]
    pub plan: Value,
    pub course_catalogue: Value,
    #[serde(default)]
    pub fixed_selections: Option<Selections>,
    #[serde(default)]
    pub options: SearchOptions,
}

/// A validated job, ready for the worker.
#[derive(Debug, Clone)]
pub struct SearchJob {
    pub tree: RequirementTree,
    pub plan: Plan,
    pub catalogue: CourseCatalogue,
    pub fixed_selections: Option<Selections>,
    pub options: SearchOptions,
}

/// Body of `/requirements/status`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusRequest {
    pub requirement_tree: Value,
    #[serde(default)]
    pub plan: Value,
    pub course_catalogue: Value,
}

/// One NDJSON line of a search response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum JobMessage {
    Batch { plans: Vec<Plan> },
    Done,
}

impl JobMessage {
    /// Serialized message followed by `\n`.
    pub fn to_line(&self) -> Result<String, serde_json::Error> {
        let mut line = serde_json::to_string(self)?;
        line.push('\n');
        Ok(line)
    }
}

pub fn parse_search_job(json_str: &str) -> EngineResult<SearchJob> {
    let request = serde_json::from_str::<SearchJobRequest>(json_str)?;
    decode_search_job(request)
}

pub fn decode_search_job(request: SearchJobRequest) -> EngineResult<SearchJob> {
    let catalogue = decode_catalogue(&request.course_catalogue)?;
    let tree = decode_requirement_tree(&request.requirement_tree, &catalogue)?;
    let plan = decode_plan(&request.plan, &tree, &catalogue)?;
    Ok(SearchJob {
        tree,
        plan,
        catalogue,
        fixed_selections: request.fixed_selections,
        options: request.options,
    })
}

pub fn decode_status_request(request: StatusRequest) -> EngineResult<(RequirementTree, Plan)> {
    let catalogue = decode_catalogue(&request.course_catalogue)?;
    let tree = decode_requirement_tree(&request.requirement_tree, &catalogue)?;
    let plan = decode_plan(&request.plan, &tree, &catalogue)?;
    Ok((tree, plan))
}

pub fn decode_catalogue(value: &Value) -> Result<CourseCatalogue, ConfigError> {
    let mut catalogue = CourseCatalogue::new();
    match value {
        Value::Array(entries) => {
            for (i, entry) in entries.iter().enumerate() {
                let code = entry
                    .get("code")
                    .and_then(Value::as_str)
                    .ok_or_else(|| ConfigError::MalformedCatalogueEntry {
                        code: format!("#{}", i),
                        reason: "missing string `code`".to_string(),
                    })?;
                catalogue.insert(decode_course(code, entry)?);
            }
        }
        Value::Object(entries) => {
            for (code, entry) in entries {
                catalogue.insert(decode_course(code, entry)?);
            }
        }
        _ => {
            return Err(ConfigError::MalformedCatalogueEntry {
                code: "$".to_string(),
                reason: "expected an array or an object".to_string(),
            });
        }
    }
    Ok(catalogue)
}

fn decode_course(code: &str, entry: &Value) -> Result<Course, ConfigError> {
    let malformed = |reason: &str| ConfigError::MalformedCatalogueEntry {
        code: code.to_string(),
        reason: reason.to_string(),
    };
    if !entry.is_object() {
        return Err(malformed("expected an object"));
    }
    let credit_count = entry
        .get("creditCount")
        .and_then(Value::as_i64)
        .and_then(|n| i32::try_from(n).ok())
        .ok_or_else(|| malformed("missing integer `creditCount`"))?;
    if credit_count < 0 {
        return Err(malformed("negative `creditCount`"));
    }
    let title = match entry.get("title") {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(t)) => t.clone(),
        Some(_) => return Err(malformed("`title` must be a string")),
    };
    Ok(Course::new(code, title, credit_count))
}

/// Decodes a Plan and checks every code and id it mentions. `null` is the
/// empty plan.
pub fn decode_plan(value: &Value, tree: &RequirementTree, catalogue: &CourseCatalogue) -> EngineResult<Plan> {
    if value.is_null() {
        return Ok(Plan::new());
    }
    let plan = Plan::deserialize(value)?;
    validate_plan(&plan, tree, catalogue)?;
    Ok(plan)
}

pub fn validate_plan(plan: &Plan, tree: &RequirementTree, catalogue: &CourseCatalogue) -> Result<(), PlanDecodeError> {
    for code in plan.course_statuses().keys() {
        if !catalogue.contains(code) {
            return Err(PlanDecodeError::UnknownCourse { code: code.clone() });
        }
    }
    for (code, id) in plan.course_assignments() {
        if !catalogue.contains(code) {
            return Err(PlanDecodeError::UnknownCourse { code: code.clone() });
        }
        if tree.find(id).is_none() {
            return Err(PlanDecodeError::UnknownRequirement { id: id.clone() });
        }
        if !tree.is_leaf_id(id) {
            return Err(PlanDecodeError::NotACourseRequirement {
                code: code.clone(),
                id: id.clone(),
            });
        }
    }
    for id in plan.others_counts().keys() {
        if tree.find(id).is_none() {
            return Err(PlanDecodeError::UnknownRequirement { id: id.clone() });
        }
    }
    Ok(())
}
