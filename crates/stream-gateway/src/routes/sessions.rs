//! Streaming session handlers

use axum::{extract::State, Json};
use stream_service::{
    InviteRequest, InviteResponse, InviteService, MessageResponse, SessionResponse,
    SessionService, WriteMessageRequest, WriteMessageResponse,
};

use crate::extractors::{CallerId, SessionIdPath, ValidatedJson};
use crate::response::{ApiResult, Created};
use crate::server::GatewayState;

/// Create a session owned by the caller
///
/// POST /sessions
pub async fn create_session(
    State(state): State<GatewayState>,
    CallerId(caller): CallerId,
) -> ApiResult<Created<Json<SessionResponse>>> {
    let session = SessionService::new(state.service_context())
        .create_session(caller)
        .await?;
    Ok(Created(Json(session)))
}

/// Sessions the caller owns
///
/// GET /sessions
pub async fn list_owned_sessions(
    State(state): State<GatewayState>,
    CallerId(caller): CallerId,
) -> ApiResult<Json<Vec<SessionResponse>>> {
    let sessions = SessionService::new(state.service_context())
        .list_owned_sessions(caller)
        .await?;
    Ok(Json(sessions))
}

/// GET /sessions/{session_id}
pub async fn get_session(
    State(state): State<GatewayState>,
    CallerId(caller): CallerId,
    SessionIdPath(session_id): SessionIdPath,
) -> ApiResult<Json<SessionResponse>> {
    let session = SessionService::new(state.service_context())
        .get_session(caller, session_id)
        .await?;
    Ok(Json(session))
}

/// Invite accounts; only the owner may invite
///
/// POST /sessions/{session_id}/invites
pub async fn invite_accounts(
    State(state): State<GatewayState>,
    CallerId(caller): CallerId,
    SessionIdPath(session_id): SessionIdPath,
    ValidatedJson(request): ValidatedJson<InviteRequest>,
) -> ApiResult<Json<InviteResponse>> {
    let response = InviteService::new(state.service_context())
        .invite_accounts(caller, session_id, request)
        .await?;
    Ok(Json(response))
}

/// Write a message as the caller and fan it out to listeners
///
/// POST /sessions/{session_id}/messages
pub async fn write_message(
    State(state): State<GatewayState>,
    CallerId(caller): CallerId,
    SessionIdPath(session_id): SessionIdPath,
    ValidatedJson(request): ValidatedJson<WriteMessageRequest>,
) -> ApiResult<Created<Json<WriteMessageResponse>>> {
    let response = SessionService::new(state.service_context())
        .write_message(caller, session_id, request)
        .await?;
    Ok(Created(Json(response)))
}

/// GET /sessions/{session_id}/messages
pub async fn list_messages(
    State(state): State<GatewayState>,
    CallerId(caller): CallerId,
    SessionIdPath(session_id): SessionIdPath,
) -> ApiResult<Json<Vec<MessageResponse>>> {
    let messages = SessionService::new(state.service_context())
        .list_messages(caller, session_id)
        .await?;
    Ok(Json(messages))
}
