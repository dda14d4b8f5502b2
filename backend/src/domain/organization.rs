//! Organization entity and invitation rules.

use super::error::InvitationError;
use super::events::{EntityWithEvent, Identified, OrganizationWithInvitation, UserInvitationEvent};
use super::user::{User, can_invite_to_organization};
use super::values::{DisplayName, Email, OrganizationId, Role, UserId};

/// Current member of an organization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrganizationMember {
    /// Member's user identifier.
    pub id: UserId,
    /// Member's current email.
    pub email: Email,
    /// Member's display name, if set.
    pub display_name: Option<DisplayName>,
    /// Member's current role.
    pub role: Role,
}

/// Pending invitation addressed to an email with no registered user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvitingUnknownUser {
    /// Invited address.
    pub email: Email,
    /// Role offered by the invitation.
    pub role: Role,
}

/// An organization with its members and pending invitations.
///
/// ## Invariants
/// - `users` holds at most one entry per user id.
/// - `inviting_unknown_users` holds at most one entry per email.
/// - No email appears both as a member and as a pending invitation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Organization {
    id: OrganizationId,
    display_name: DisplayName,
    users: Vec<OrganizationMember>,
    inviting_unknown_users: Vec<InvitingUnknownUser>,
}

impl Organization {
    /// Assemble an organization.
    ///
    /// Repeated members or invitations keep their first occurrence, and an
    /// invitation whose email already belongs to a member is dropped.
    pub fn new(
        id: OrganizationId,
        display_name: DisplayName,
        users: Vec<OrganizationMember>,
        inviting_unknown_users: Vec<InvitingUnknownUser>,
    ) -> Self {
        let mut members: Vec<OrganizationMember> = Vec::with_capacity(users.len());
        for member in users {
            if !members.iter().any(|existing| existing.id == member.id) {
                members.push(member);
            }
        }

        let mut invitations: Vec<InvitingUnknownUser> =
            Vec::with_capacity(inviting_unknown_users.len());
        for invitation in inviting_unknown_users {
            let taken = members.iter().any(|member| member.email == invitation.email)
                || invitations
                    .iter()
                    .any(|existing| existing.email == invitation.email);
            if !taken {
                invitations.push(invitation);
            }
        }

        Self {
            id,
            display_name,
            users: members,
            inviting_unknown_users: invitations,
        }
    }

    /// Stable identifier.
    pub fn id(&self) -> &OrganizationId {
        &self.id
    }

    /// Current display name.
    pub fn display_name(&self) -> &DisplayName {
        &self.display_name
    }

    /// Current members, oldest membership first.
    pub fn users(&self) -> &[OrganizationMember] {
        &self.users
    }

    /// Pending invitations to unregistered emails.
    pub fn inviting_unknown_users(&self) -> &[InvitingUnknownUser] {
        &self.inviting_unknown_users
    }

    /// Find a member by email.
    pub fn member_by_email(&self, email: &Email) -> Option<&OrganizationMember> {
        self.users.iter().find(|member| &member.email == email)
    }

    fn has_member(&self, id: &UserId) -> bool {
        self.users.iter().any(|member| &member.id == id)
    }

    fn has_pending_invitation(&self, email: &Email) -> bool {
        self.inviting_unknown_users
            .iter()
            .any(|invitation| &invitation.email == email)
    }
}

impl Identified for Organization {
    type Id = OrganizationId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

fn ensure_can_invite(organization: &Organization, inviter: &User) -> Result<(), InvitationError> {
    if can_invite_to_organization(inviter, organization.id()) {
        Ok(())
    } else {
        Err(InvitationError::authorization(inviter.id(), organization.id()))
    }
}

/// Invite an email with no registered account.
///
/// The organization itself is returned unchanged; the pending invitation is
/// recorded only through the attached event.
///
/// # Errors
/// - [`InvitationError::Authorization`] when `inviter` cannot manage the
///   organization. Checked first.
/// - [`InvitationError::Duplication`] when the email already belongs to a
///   member or to a pending invitation.
pub fn invite_unknown_user(
    organization: Organization,
    role: Role,
    invitee_email: Email,
    inviter: &User,
) -> Result<OrganizationWithInvitation, InvitationError> {
    ensure_can_invite(&organization, inviter)?;

    if organization.member_by_email(&invitee_email).is_some()
        || organization.has_pending_invitation(&invitee_email)
    {
        return Err(InvitationError::duplication(&invitee_email, organization.id()));
    }

    let event = UserInvitationEvent {
        invitee_role: role,
        invitee_email,
        inviter_user_id: *inviter.id(),
    };
    Ok(EntityWithEvent::new(organization, event))
}

/// Invite a registered user, adding them to the organization's members.
///
/// # Errors
/// - [`InvitationError::Authorization`] when `inviter` cannot manage the
///   organization. Checked first.
/// - [`InvitationError::Duplication`] when the invitee is already a member or
///   their email has a pending invitation.
pub fn invite_known_user(
    organization: Organization,
    role: Role,
    invitee: &User,
    inviter: &User,
) -> Result<OrganizationWithInvitation, InvitationError> {
    ensure_can_invite(&organization, inviter)?;

    if organization.has_member(invitee.id()) || organization.has_pending_invitation(invitee.email())
    {
        return Err(InvitationError::duplication(invitee.email(), organization.id()));
    }

    let mut organization = organization;
    organization.users.push(OrganizationMember {
        id: *invitee.id(),
        email: invitee.email().clone(),
        display_name: invitee.display_name().cloned(),
        role: role.clone(),
    });

    let event = UserInvitationEvent {
        invitee_role: role,
        invitee_email: invitee.email().clone(),
        inviter_user_id: *inviter.id(),
    };
    Ok(EntityWithEvent::new(organization, event))
}
