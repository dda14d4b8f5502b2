//! User entity and the pure rules that create users.
//!
//! Every function here is deterministic apart from identifier generation and
//! performs no I/O.

use super::events::{
    EntityWithEvent, Identified, UserCreationWithDefaultOrganizationEvent,
    UserCreationWithInvitedOrganizationEvent, UserWithDefaultOrganization,
    UserWithInvitedOrganizations,
};
use super::values::{DisplayName, Email, OrganizationId, Role, UserId};

/// Name given to the organization created at signup.
pub const DEFAULT_ORGANIZATION_NAME: &str = "My first organization";

/// Membership of a user in one organization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BelongingOrganization {
    /// Organization the user belongs to.
    pub id: OrganizationId,
    /// Current role in that organization.
    pub role: Role,
    /// Whether the role grants the `manage organization` capability.
    ///
    /// `None` when the role is not known to the role lookup.
    pub authority_manage_organization: Option<bool>,
}

impl BelongingOrganization {
    /// Build a membership whose authority comes from the built-in role lookup.
    pub fn with_role(id: OrganizationId, role: Role) -> Self {
        let authority_manage_organization = role.manages_organization();
        Self {
            id,
            role,
            authority_manage_organization,
        }
    }
}

/// A registered user.
///
/// ## Invariants
/// - `belonging_organizations` holds at most one entry per organization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    id: UserId,
    email: Email,
    display_name: Option<DisplayName>,
    belonging_organizations: Vec<BelongingOrganization>,
}

impl User {
    /// Assemble a user. Repeated memberships keep their first occurrence.
    pub fn new(
        id: UserId,
        email: Email,
        display_name: Option<DisplayName>,
        belonging_organizations: Vec<BelongingOrganization>,
    ) -> Self {
        let mut unique: Vec<BelongingOrganization> =
            Vec::with_capacity(belonging_organizations.len());
        for membership in belonging_organizations {
            if !unique.iter().any(|existing| existing.id == membership.id) {
                unique.push(membership);
            }
        }
        Self {
            id,
            email,
            display_name,
            belonging_organizations: unique,
        }
    }

    /// Stable identifier.
    pub fn id(&self) -> &UserId {
        &self.id
    }

    /// Current email address.
    pub fn email(&self) -> &Email {
        &self.email
    }

    /// Current display name, if the user set one.
    pub fn display_name(&self) -> Option<&DisplayName> {
        self.display_name.as_ref()
    }

    /// Organizations the user currently belongs to, oldest membership first.
    pub fn belonging_organizations(&self) -> &[BelongingOrganization] {
        &self.belonging_organizations
    }

    /// Find the membership for an organization.
    pub fn membership(&self, organization_id: &OrganizationId) -> Option<&BelongingOrganization> {
        self.belonging_organizations
            .iter()
            .find(|membership| &membership.id == organization_id)
    }

    /// Return a copy carrying `display_name`.
    pub fn with_display_name(self, display_name: Option<DisplayName>) -> Self {
        Self {
            display_name,
            ..self
        }
    }
}

impl Identified for User {
    type Id = UserId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Email address with pending invitations and no registered user yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownUser {
    email: Email,
    invited_organizations: Vec<InvitedOrganization>,
}

/// Pending invitation held by an [`UnknownUser`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvitedOrganization {
    /// Organization that issued the invitation.
    pub id: OrganizationId,
    /// Role the invitee will receive.
    pub role: Role,
}

impl UnknownUser {
    /// Assemble an unknown user from its pending invitations.
    pub fn new(email: Email, invited_organizations: Vec<InvitedOrganization>) -> Self {
        Self {
            email,
            invited_organizations,
        }
    }

    /// Invited email address.
    pub fn email(&self) -> &Email {
        &self.email
    }

    /// Pending invitations, one per organization.
    pub fn invited_organizations(&self) -> &[InvitedOrganization] {
        &self.invited_organizations
    }

    /// Consume the value, yielding its invitations.
    pub fn into_invited_organizations(self) -> Vec<InvitedOrganization> {
        self.invited_organizations
    }
}

/// Create a user who owns a brand new organization.
///
/// The creator becomes the organization's `admin`.
///
/// # Examples
/// ```
/// use accounts::domain::{create_user_with_default_organization, Email, Role};
///
/// let email = Email::new("ada@example.com").expect("valid email");
/// let created = create_user_with_default_organization(email);
/// let membership = &created.entity.belonging_organizations()[0];
/// assert_eq!(membership.id, created.event.created_organization_id);
/// assert_eq!(membership.role, Role::admin());
/// ```
pub fn create_user_with_default_organization(email: Email) -> UserWithDefaultOrganization {
    let organization_id = OrganizationId::generate();
    let user = User::new(
        UserId::generate(),
        email,
        None,
        vec![BelongingOrganization::with_role(organization_id, Role::admin())],
    );
    EntityWithEvent::new(
        user,
        UserCreationWithDefaultOrganizationEvent {
            created_organization_id: organization_id,
            created_organization_name: DisplayName::from_static(DEFAULT_ORGANIZATION_NAME),
        },
    )
}

/// Create a user who joins every organization that invited their email.
pub fn create_user_with_invited_organization(
    email: Email,
    invited_organizations: Vec<InvitedOrganization>,
) -> UserWithInvitedOrganizations {
    let invited_organization_ids = invited_organizations
        .iter()
        .map(|invitation| invitation.id)
        .collect();
    let memberships = invited_organizations
        .into_iter()
        .map(|invitation| BelongingOrganization::with_role(invitation.id, invitation.role))
        .collect();
    let user = User::new(UserId::generate(), email, None, memberships);
    EntityWithEvent::new(
        user,
        UserCreationWithInvitedOrganizationEvent {
            invited_organization_ids,
        },
    )
}

/// Whether `user` may invite others into `organization_id`.
///
/// Requires a membership whose role explicitly grants the
/// `manage organization` capability.
pub fn can_invite_to_organization(user: &User, organization_id: &OrganizationId) -> bool {
    user.membership(organization_id)
        .is_some_and(|membership| membership.authority_manage_organization == Some(true))
}
