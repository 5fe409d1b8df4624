// Errores del motor: configuración (árbol/catálogo) y decodificación de planes.
// Ambos son fatales y se detectan antes de empezar cualquier búsqueda.

/// Malformed requirement tree or course catalogue.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("requirement at {path} matches no known shape (expected `courses`, `children` or `options`)")]
    UnrecognizedRequirement { path: String },

    #[error("requirement at {path} is missing field `{field}`")]
    MissingField { path: String, field: &'static str },

    #[error("requirement at {path} has an invalid `{field}`: {reason}")]
    InvalidField {
        path: String,
        field: &'static str,
        reason: String,
    },

    #[error("requirement id `{id}` appears more than once")]
    DuplicateRequirementId { id: String },

    #[error("course `{code}` referenced at {path} is not in the catalogue")]
    UnknownCourse { code: String, path: String },

    #[error("invalid credit range at {path}: min {min} / max {max}")]
    InvalidRange { path: String, min: i32, max: i32 },

    #[error("catalogue entry `{code}` is malformed: {reason}")]
    MalformedCatalogueEntry { code: String, reason: String },
}

/// A plan that references things the tree or catalogue does not contain.
#[derive(Debug, thiserror::Error)]
pub enum PlanDecodeError {
    #[error("plan references unknown course `{code}`")]
    UnknownCourse { code: String },

    #[error("plan references unknown requirement `{id}`")]
    UnknownRequirement { id: String },

    #[error("plan assigns course `{code}` to `{id}`, which is not a course requirement")]
    NotACourseRequirement { code: String, id: String },
}

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    PlanDecode(#[from] PlanDecodeError),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

pub type EngineResult<T> = Result<T, EngineError>;
