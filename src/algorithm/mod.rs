// Motor de asignación automática: generadores de combinaciones, planificador
// de menor ramificación, composición con backtracking y frontera de Pareto.
pub mod combinations;
pub mod composer;
pub mod frontier;
pub mod scheduler;
pub mod search;
pub mod selections;

pub use combinations::{Candidate, Combination, TightCombinations};
pub use composer::{AssignmentComposer, ComposerStats};
pub use frontier::{FrontierEntry, FrontierTracker, Improvements};
pub use scheduler::pick_least_branching;
pub use search::{AssignmentSearch, CancelToken, SearchOptions, SearchStats, find_assignments};
pub use selections::{Selections, enumerate_selections};
