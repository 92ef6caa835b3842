pub mod column;
pub mod engine;

pub use column::{LookupColumn, MatchRule};
pub use engine::{LookupEngine, NO_SPEAKERS, SessionMatch};
