pub mod docs;
pub mod search;
pub mod status;

pub use docs::*;
pub use search::*;
pub use status::*;
