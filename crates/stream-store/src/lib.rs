//! # stream-store
//!
//! Storage layer implementing the repository port from `stream-core`.
//!
//! Sessions live in process memory as shared [`SessionHandle`]s, so a handle
//! returned by `find_by_id` sees every later write made through any other
//! handle to the same session.
//!
//! ```rust,ignore
//! use stream_core::{SessionHandle, StreamingSession, StreamingSessionRepository, UserId};
//! use stream_store::InMemoryStreamingSessionRepository;
//!
//! let repo = InMemoryStreamingSessionRepository::new();
//! let handle = SessionHandle::new(StreamingSession::create(UserId::generate()));
//! repo.save(handle.clone()).await?;
//! let found = repo.find_by_id(handle.id()).await?;
//! ```
//!
//! [`SessionHandle`]: stream_core::SessionHandle

pub mod repositories;

pub use repositories::InMemoryStreamingSessionRepository;
