//! Domain values, entities, ports and use cases.
//!
//! Purpose: model multi-tenant accounts (users, organizations, memberships
//! and invitations) as immutable values with pure business rules, and expose
//! the use cases that orchestrate them over repository ports.
//!
//! Public surface:
//! - Values: `Email`, `DisplayName`, `UserId`, `OrganizationId`, `Role`.
//! - Entities: `User`, `Organization`, `UnknownUser` and their rules.
//! - Events: `EntityWithEvent` and the creation/invitation events.
//! - Use cases: `LoginOrSignupService`, `InviteUserService`.
//! - Read models: `Home` and the organization switch rules.

pub mod commands;
pub mod error;
pub mod events;
pub mod home;
pub mod invite_user_service;
pub mod login_or_signup_service;
pub mod organization;
pub mod ports;
pub mod user;
pub mod values;

#[cfg(test)]
mod service_test_doubles;

pub use self::commands::{CommandParseError, InviteUserCommand, LoginOrSignupCommand};
pub use self::error::InvitationError;
pub use self::events::{
    EntityWithEvent, Identified, OrganizationWithInvitation,
    UserCreationWithDefaultOrganizationEvent, UserCreationWithInvitedOrganizationEvent,
    UserInvitationEvent, UserWithDefaultOrganization, UserWithInvitedOrganizations,
};
pub use self::home::{
    Home, HomeUser, OrganizationSummary, OrganizationSwitch, SelectedOrganization,
    resolve_latest_logged_in_organization, switch_organization,
};
pub use self::invite_user_service::InviteUserService;
pub use self::login_or_signup_service::LoginOrSignupService;
pub use self::organization::{
    InvitingUnknownUser, Organization, OrganizationMember, invite_known_user, invite_unknown_user,
};
pub use self::user::{
    BelongingOrganization, DEFAULT_ORGANIZATION_NAME, InvitedOrganization, UnknownUser, User,
    can_invite_to_organization, create_user_with_default_organization,
    create_user_with_invited_organization,
};
pub use self::values::{
    DisplayName, Email, OrganizationId, Role, UserId, ValueError, ValueErrorReason,
};
