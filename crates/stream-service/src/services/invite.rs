//! Invite service
//!
//! Lets a session owner grant other accounts the right to listen.

use stream_core::{DomainError, SessionHandle, StreamingSessionId, UserId};
use tracing::{info, instrument};
use validator::Validate;

use crate::dto::{InviteRequest, InviteResponse};

use super::context::ServiceContext;
use super::error::ServiceResult;

/// Invite service
pub struct InviteService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> InviteService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Invite one account to a streaming session
    ///
    /// Only the session owner may invite. An unknown session id surfaces as
    /// `DomainError::StreamingSessionNotFound`; inviting an already invited
    /// account is a no-op.
    #[instrument(skip(self))]
    pub async fn invite_account(
        &self,
        owner: UserId,
        streaming_session_id: StreamingSessionId,
        user_to_invite: UserId,
    ) -> ServiceResult<()> {
        let session = self.owned_session(owner, streaming_session_id).await?;

        if session.invite(user_to_invite) {
            info!(session_id = %streaming_session_id, user_id = %user_to_invite, "Account invited");
        }

        Ok(())
    }

    /// Invite several accounts at once, with the same checks as `invite_account`
    #[instrument(skip(self, request), fields(count = request.user_ids.len()))]
    pub async fn invite_accounts(
        &self,
        owner: UserId,
        streaming_session_id: StreamingSessionId,
        request: InviteRequest,
    ) -> ServiceResult<InviteResponse> {
        request.validate()?;

        let session = self.owned_session(owner, streaming_session_id).await?;
        let invited = session.invite_all(request.user_ids);

        info!(session_id = %streaming_session_id, invited, "Accounts invited");

        Ok(InviteResponse {
            session_id: streaming_session_id.to_string(),
            invited,
        })
    }

    async fn owned_session(
        &self,
        owner: UserId,
        streaming_session_id: StreamingSessionId,
    ) -> ServiceResult<SessionHandle> {
        let session = self.ctx.session_repo().find_by_id(streaming_session_id).await?;

        if session.owner_id() != owner {
            return Err(DomainError::NotSessionOwner.into());
        }

        Ok(session)
    }
}
