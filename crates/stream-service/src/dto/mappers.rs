//! Entity to DTO mappers

use stream_core::{FanOutReport, Message, SessionHandle, StreamingSession};

use super::responses::{MessageResponse, SessionResponse, WriteMessageResponse};

impl From<&Message> for MessageResponse {
    fn from(message: &Message) -> Self {
        Self {
            text: message.text().to_string(),
            author_id: message.author_id().map(|id| id.to_string()),
        }
    }
}

impl From<Message> for MessageResponse {
    fn from(message: Message) -> Self {
        Self::from(&message)
    }
}

impl From<&StreamingSession> for SessionResponse {
    fn from(session: &StreamingSession) -> Self {
        let mut invited_user_ids: Vec<String> = session
            .invited_user_ids()
            .iter()
            .map(ToString::to_string)
            .collect();
        invited_user_ids.sort();

        Self {
            id: session.id().to_string(),
            owner_id: session.owner_id().to_string(),
            created_at: session.created_at(),
            invited_user_ids,
            message_count: session.messages().len(),
            listener_count: session.listener_count(),
        }
    }
}

impl From<&SessionHandle> for SessionResponse {
    fn from(handle: &SessionHandle) -> Self {
        handle.with_session(|session| Self::from(session))
    }
}

impl From<&FanOutReport> for WriteMessageResponse {
    fn from(report: &FanOutReport) -> Self {
        Self {
            message: MessageResponse::from(&report.message),
            delivered: report.delivered,
            failed: report.failures.len(),
        }
    }
}
