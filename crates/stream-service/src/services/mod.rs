//! Business logic services
//!
//! Each service borrows the shared [`ServiceContext`] and orchestrates
//! repository lookups and aggregate operations.

pub mod context;
pub mod error;
pub mod invite;
pub mod session;

pub use context::{ServiceContext, ServiceContextBuilder};
pub use error::{ServiceError, ServiceResult};
pub use invite::InviteService;
pub use session::{ConnectOutcome, SessionService};
