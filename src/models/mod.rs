// Estructuras de datos principales
pub mod plan;
pub mod report;
pub mod requirement;

pub use plan::Plan;
pub use report::{RequiredCredits, StatusReport, status_report};
pub use requirement::{
    Requirement, RequirementSelection, RequirementTree, RequirementWithChildren,
    RequirementWithCourses, SelectionOption,
};

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::ops::Add;
use std::sync::Arc;

/// A catalogue course. Courses are compared by `code` only.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub code: String,
    pub title: String,
    pub credit_count: i32,
}

impl Course {
    pub fn new(code: impl Into<String>, title: impl Into<String>, credit_count: i32) -> Self {
        Self {
            code: code.into(),
            title: title.into(),
            credit_count,
        }
    }
}

impl PartialEq for Course {
    fn eq(&self, other: &Self) -> bool {
        self.code == other.code
    }
}

impl Eq for Course {}

/// Registration state of a course, ordered from weakest to strongest.
/// Also used as the satisfaction status of a requirement.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CourseStatus {
    #[default]
    Unregistered,
    Registered,
    Acquired,
}

impl CourseStatus {
    /// Counts toward "registered" credits (acquired courses do too).
    pub fn is_registered(self) -> bool {
        self >= CourseStatus::Registered
    }

    pub fn is_acquired(self) -> bool {
        self == CourseStatus::Acquired
    }
}

/// Inclusive credit range. A bare integer in JSON means `min == max`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct CreditRange {
    pub min: i32,
    pub max: i32,
}

impl CreditRange {
    pub fn new(min: i32, max: i32) -> Self {
        Self { min, max }
    }

    pub fn exactly(count: i32) -> Self {
        Self { min: count, max: count }
    }
}

/// Saturates at the `i32` bounds.
impl Add for CreditRange {
    type Output = CreditRange;

    fn add(self, rhs: CreditRange) -> CreditRange {
        CreditRange {
            min: self.min.saturating_add(rhs.min),
            max: self.max.saturating_add(rhs.max),
        }
    }
}

/// Credits counted toward a requirement, split by how far along the courses are.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RegisteredCreditCounts {
    pub acquired: i32,
    pub registered: i32,
}

impl RegisteredCreditCounts {
    pub fn new(acquired: i32, registered: i32) -> Self {
        Self { acquired, registered }
    }

    /// Contribution of a single course with the given status.
    pub fn of_course(credit_count: i32, status: CourseStatus) -> Self {
        Self {
            acquired: if status.is_acquired() { credit_count } else { 0 },
            registered: if status.is_registered() { credit_count } else { 0 },
        }
    }

    pub fn clamped_to(self, max: i32) -> Self {
        Self {
            acquired: self.acquired.min(max),
            registered: self.registered.min(max),
        }
    }

    /// `true` when `self` is at least as good on both objectives and better on one.
    pub fn dominates(&self, other: &Self) -> bool {
        self.acquired >= other.acquired
            && self.registered >= other.registered
            && (self.acquired > other.acquired || self.registered > other.registered)
    }
}

/// Saturates at the `i32` bounds, so catalogues with huge credit counts
/// still compare sensibly.
impl Add for RegisteredCreditCounts {
    type Output = RegisteredCreditCounts;

    fn add(self, rhs: RegisteredCreditCounts) -> RegisteredCreditCounts {
        RegisteredCreditCounts {
            acquired: self.acquired.saturating_add(rhs.acquired),
            registered: self.registered.saturating_add(rhs.registered),
        }
    }
}

/// Lookup table code -> course used to resolve codes while decoding.
#[derive(Debug, Clone, Default)]
pub struct CourseCatalogue {
    courses: BTreeMap<String, Arc<Course>>,
}

impl CourseCatalogue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a course, replacing any previous entry with the same code.
    pub fn insert(&mut self, course: Course) {
        self.courses.insert(course.code.clone(), Arc::new(course));
    }

    pub fn get(&self, code: &str) -> Option<&Arc<Course>> {
        self.courses.get(code)
    }

    pub fn contains(&self, code: &str) -> bool {
        self.courses.contains_key(code)
    }

    pub fn len(&self) -> usize {
        self.courses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.courses.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<Course>> {
        self.courses.values()
    }
}

impl FromIterator<Course> for CourseCatalogue {
    fn from_iter<I: IntoIterator<Item = Course>>(iter: I) -> Self {
        let mut catalogue = CourseCatalogue::new();
        for course in iter {
            catalogue.insert(course);
        }
        catalogue
    }
}
