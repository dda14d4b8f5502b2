//! Domain events emitted alongside newly created or mutated entities.
//!
//! An entity is never mutated in place; operations return a fresh value
//! wrapped in [`EntityWithEvent`] so the persistence adapter knows which facts
//! to append.

use super::organization::Organization;
use super::user::User;
use super::values::{DisplayName, Email, OrganizationId, Role, UserId};

/// Entity that exposes a stable identifier to repositories.
pub trait Identified {
    /// Identifier type returned by a successful persist.
    type Id: Clone + Send + Sync;

    /// Borrow the identifier.
    fn id(&self) -> &Self::Id;
}

/// Entity paired with the event describing how it came to be.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityWithEvent<T, E> {
    /// Resulting entity state.
    pub entity: T,
    /// Event recording the transition.
    pub event: E,
}

impl<T, E> EntityWithEvent<T, E> {
    /// Pair an entity with its event.
    pub fn new(entity: T, event: E) -> Self {
        Self { entity, event }
    }
}

impl<T, E> Identified for EntityWithEvent<T, E>
where
    T: Identified,
    E: Send + Sync,
{
    type Id = T::Id;

    fn id(&self) -> &Self::Id {
        self.entity.id()
    }
}

/// A user signed up and received a freshly created organization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserCreationWithDefaultOrganizationEvent {
    /// Identifier of the organization created for the user.
    pub created_organization_id: OrganizationId,
    /// Name given to that organization.
    pub created_organization_name: DisplayName,
}

/// A user signed up and joined the organizations that had invited them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserCreationWithInvitedOrganizationEvent {
    /// Organizations attached to the new user.
    pub invited_organization_ids: Vec<OrganizationId>,
}

/// A member of an organization invited someone by email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserInvitationEvent {
    /// Role granted to the invitee.
    pub invitee_role: Role,
    /// Email the invitation was addressed to.
    pub invitee_email: Email,
    /// Member who issued the invitation.
    pub inviter_user_id: UserId,
}

/// User created together with a default organization.
pub type UserWithDefaultOrganization =
    EntityWithEvent<User, UserCreationWithDefaultOrganizationEvent>;

/// User created from pending invitations.
pub type UserWithInvitedOrganizations =
    EntityWithEvent<User, UserCreationWithInvitedOrganizationEvent>;

/// Organization after an invitation was issued.
pub type OrganizationWithInvitation = EntityWithEvent<Organization, UserInvitationEvent>;
