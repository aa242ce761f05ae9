//! Value objects - immutable domain values

mod ids;

pub use ids::{IdParseError, StreamingSessionId, UserId};
