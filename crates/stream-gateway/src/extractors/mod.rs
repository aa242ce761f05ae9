//! Axum extractors for request handling

mod caller;
mod path;
mod validated;

pub use caller::{CallerId, USER_ID_HEADER};
pub use path::SessionIdPath;
pub use validated::ValidatedJson;
