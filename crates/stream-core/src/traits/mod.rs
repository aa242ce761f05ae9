//! Traits (ports) - capabilities the domain depends on

mod listening_user;
mod repositories;

pub use listening_user::{ListenerKey, ListeningUser};
pub use repositories::{RepoResult, StreamingSessionRepository};
