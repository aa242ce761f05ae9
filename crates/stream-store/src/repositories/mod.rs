//! Repository implementations

mod streaming_session;

pub use streaming_session::InMemoryStreamingSessionRepository;
