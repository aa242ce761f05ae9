//! Domain entities - core business objects

mod fan_out;
mod message;
mod session_handle;
mod streaming_session;
mod user;

pub use fan_out::FanOutReport;
pub use message::Message;
pub use session_handle::SessionHandle;
pub use streaming_session::StreamingSession;
pub use user::User;

#[cfg(test)]
pub(crate) mod test_listener;
