//! # stream-core
//!
//! Domain layer for streaming sessions: identifiers, messages, the session
//! aggregate, the listener capability, and the repository port.
//! This crate has zero dependencies on infrastructure (web framework, runtime, etc.).

pub mod entities;
pub mod error;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{FanOutReport, Message, SessionHandle, StreamingSession, User};
pub use error::{DeliveryError, DomainError};
pub use traits::{ListenerKey, ListeningUser, RepoResult, StreamingSessionRepository};
pub use value_objects::{IdParseError, StreamingSessionId, UserId};
