//! Gateway protocol definitions
//!
//! Op codes, frame format, payloads, and close codes.

mod close_codes;
mod messages;
mod opcodes;
mod payloads;

pub use close_codes::CloseCode;
pub use messages::{DecodeError, GatewayMessage};
pub use opcodes::OpCode;
pub use payloads::{HelloPayload, ListenPayload, UnlistenPayload};
