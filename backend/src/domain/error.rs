//! Business-rule failures raised by entity operations.
//!
//! These errors carry no storage or transport detail. Use cases return them
//! unchanged so callers can tell a refused action apart from an outage.

use thiserror::Error;

use super::values::{Email, OrganizationId, UserId};

/// Refusal raised when inviting a user to an organization.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvitationError {
    /// The inviter may not manage the target organization.
    #[error("user {inviter} is not allowed to invite users to organization {organization}")]
    Authorization {
        /// Who attempted the invitation.
        inviter: UserId,
        /// Organization the invitation targeted.
        organization: OrganizationId,
    },
    /// The invitee is already a member or already has a pending invitation.
    #[error("{invitee} is already a member of, or invited to, organization {organization}")]
    Duplication {
        /// Email of the invitee.
        invitee: Email,
        /// Organization the invitation targeted.
        organization: OrganizationId,
    },
}

impl InvitationError {
    pub(crate) fn authorization(inviter: &UserId, organization: &OrganizationId) -> Self {
        Self::Authorization {
            inviter: *inviter,
            organization: *organization,
        }
    }

    pub(crate) fn duplication(invitee: &Email, organization: &OrganizationId) -> Self {
        Self::Duplication {
            invitee: invitee.clone(),
            organization: *organization,
        }
    }
}
