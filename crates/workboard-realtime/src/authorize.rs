//! Channel-join authorization.
//!
//! One decision procedure for every channel kind: resolve the target's
//! owning workspace, then gate on workspace membership. Denial is a
//! value, not an error, and is identical for a missing target and a
//! non-member; a failed join never reveals whether the target exists.

use tracing::debug;
use uuid::Uuid;
use workboard_core::error::{WorkboardError, WorkboardResult};
use workboard_core::repository::{BoardRepository, MembershipResolver, UserRepository};
use workboard_core::scope::TenantScope;

use crate::channel::Channel;
use crate::presence::PresencePayload;

/// Outcome of a channel-join request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelGrant {
    /// Opaque rejection, identical across causes.
    Denied,
    /// Subscription allowed.
    Granted,
    /// Subscription allowed; the payload is broadcast to the channel's
    /// existing subscribers.
    GrantedWithIdentity(PresencePayload),
}

impl ChannelGrant {
    pub fn is_granted(&self) -> bool {
        !matches!(self, Self::Denied)
    }
}

/// Authorizes channel joins against board ownership and workspace
/// membership.
///
/// Generic over repository implementations so the decision logic has
/// no dependency on the database crate.
pub struct ChannelAuthorizer<B, U, M>
where
    B: BoardRepository,
    U: UserRepository,
    M: MembershipResolver,
{
    boards: B,
    users: U,
    memberships: M,
}

impl<B, U, M> ChannelAuthorizer<B, U, M>
where
    B: BoardRepository,
    U: UserRepository,
    M: MembershipResolver,
{
    pub fn new(boards: B, users: U, memberships: M) -> Self {
        Self {
            boards,
            users,
            memberships,
        }
    }

    /// Decide one join request.
    ///
    /// Storage failures propagate as errors; they fail the caller's
    /// operation and never turn into a grant. Everything else resolves
    /// to a grant or an opaque denial.
    pub async fn authorize(&self, caller: Uuid, channel: Channel) -> WorkboardResult<ChannelGrant> {
        // Board channels are addressed by raw board id on the wire, so
        // the lookup runs across tenants; the membership check below is
        // the gate.
        let workspace_id = match channel {
            Channel::Workspace(workspace_id) => workspace_id,
            Channel::Board(board_id) | Channel::BoardPresence(board_id) => {
                match self
                    .boards
                    .get_by_id(TenantScope::all_tenants(), board_id)
                    .await
                {
                    Ok(board) => board.workspace_id,
                    Err(WorkboardError::NotFound { .. }) => {
                        return Ok(self.deny(caller, channel));
                    }
                    Err(e) => return Err(e),
                }
            }
        };

        if !self.memberships.is_member(caller, workspace_id).await? {
            return Ok(self.deny(caller, channel));
        }

        match channel {
            Channel::Workspace(_) | Channel::Board(_) => Ok(ChannelGrant::Granted),
            Channel::BoardPresence(_) => {
                let user = match self.users.get_by_id(caller).await {
                    Ok(user) => user,
                    Err(WorkboardError::NotFound { .. }) => {
                        return Ok(self.deny(caller, channel));
                    }
                    Err(e) => return Err(e),
                };
                Ok(ChannelGrant::GrantedWithIdentity(PresencePayload::for_user(
                    &user,
                )))
            }
        }
    }

    /// Join entry point for workspace channels.
    pub async fn join_workspace(
        &self,
        caller: Uuid,
        workspace_id: Uuid,
    ) -> WorkboardResult<ChannelGrant> {
        self.authorize(caller, Channel::Workspace(workspace_id)).await
    }

    /// Join entry point for board channels.
    pub async fn join_board(&self, caller: Uuid, board_id: Uuid) -> WorkboardResult<ChannelGrant> {
        self.authorize(caller, Channel::Board(board_id)).await
    }

    /// Join entry point for board presence channels.
    pub async fn join_board_presence(
        &self,
        caller: Uuid,
        board_id: Uuid,
    ) -> WorkboardResult<ChannelGrant> {
        self.authorize(caller, Channel::BoardPresence(board_id)).await
    }

    fn deny(&self, caller: Uuid, channel: Channel) -> ChannelGrant {
        debug!(%caller, %channel, "channel join denied");
        ChannelGrant::Denied
    }
}
