//! # stream-service
//!
//! Application layer: use cases over streaming sessions, request/response
//! DTOs, and the service error type.

pub mod dto;
pub mod services;

pub use dto::{
    InviteRequest, InviteResponse, MessageResponse, SessionResponse, WriteMessageRequest,
    WriteMessageResponse,
};
pub use services::{
    ConnectOutcome, InviteService, ServiceContext, ServiceContextBuilder, ServiceError,
    ServiceResult, SessionService,
};
