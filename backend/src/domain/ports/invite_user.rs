//! Driving port for inviting a user into an organization.

use async_trait::async_trait;

use crate::domain::{Email, InvitationError, InviteUserCommand, OrganizationId, UserId};

use super::define_port_error;

define_port_error! {
    /// Failures surfaced by [`InviteUser`].
    pub enum InviteUserError {
        /// A repository failed or returned inconsistent data.
        Repository { message: String } => "invitation failed in a repository: {message}",
        /// The inviter may not manage the organization.
        Authorization { inviter: UserId, organization: OrganizationId } =>
            "user {inviter} is not allowed to invite users to organization {organization}",
        /// The invitee is already a member or already invited.
        Duplication { invitee: Email, organization: OrganizationId } =>
            "{invitee} is already a member of, or invited to, organization {organization}",
        /// The inviter or organization is missing, or a collaborator broke its contract.
        Unknown { message: String } => "invitation failed unexpectedly: {message}",
    }
}

impl From<InvitationError> for InviteUserError {
    fn from(error: InvitationError) -> Self {
        match error {
            InvitationError::Authorization {
                inviter,
                organization,
            } => Self::authorization(inviter, organization),
            InvitationError::Duplication {
                invitee,
                organization,
            } => Self::duplication(invitee, organization),
        }
    }
}

/// Domain use-case port for organization invitations.
#[async_trait]
pub trait InviteUser<C = ()>: Send + Sync
where
    C: Sync,
{
    /// Invite the command's email and return the organization id.
    async fn invite_user(
        &self,
        command: InviteUserCommand,
        ctx: &C,
    ) -> Result<OrganizationId, InviteUserError>;
}
