//! Reconstruction of domain entities from rows.
//!
//! Stored values go back through the domain constructors; a value that no
//! longer parses means the store holds data the domain cannot represent, and
//! is reported as `DataConsistency`.

use tracing::warn;
use uuid::Uuid;

use crate::domain::ports::PersistenceError;
use crate::domain::{
    BelongingOrganization, DisplayName, Email, Home, HomeUser, InvitedOrganization,
    InvitingUnknownUser, Organization, OrganizationId, OrganizationMember, OrganizationSummary,
    Role, UnknownUser, User, UserId, ValueError,
};

use super::models::{
    BelongingOrganizationRow, InvitationRow, MemberRow, MembershipRow, UserProfileRow,
};

fn inconsistent(context: &str, error: ValueError) -> PersistenceError {
    warn!(%context, %error, "stored row failed validation");
    PersistenceError::data_consistency(format!("{context}: {error}"))
}

fn optional_name(
    context: &str,
    name: Option<String>,
) -> Result<Option<DisplayName>, PersistenceError> {
    name.map(DisplayName::new)
        .transpose()
        .map_err(|error| inconsistent(context, error))
}

/// Build a user from their profile row and active memberships.
pub(crate) fn user_from_rows(
    profile: UserProfileRow,
    memberships: Vec<MembershipRow>,
) -> Result<User, PersistenceError> {
    let context = format!("user {}", profile.user_id);
    let email = Email::new(profile.email).map_err(|error| inconsistent(&context, error))?;
    let display_name = optional_name(&context, profile.name)?;
    let belonging_organizations = memberships
        .into_iter()
        .map(|row| BelongingOrganization {
            id: OrganizationId::from_uuid(row.organization_id),
            role: Role::new(row.role_name),
            authority_manage_organization: Some(row.manage_organization),
        })
        .collect();

    Ok(User::new(
        UserId::from_uuid(profile.user_id),
        email,
        display_name,
        belonging_organizations,
    ))
}

/// Build an organization from its profile name, members and pending invitations.
pub(crate) fn organization_from_rows(
    id: Uuid,
    name: Option<String>,
    members: Vec<MemberRow>,
    invitations: Vec<InvitationRow>,
) -> Result<Organization, PersistenceError> {
    let context = format!("organization {id}");
    let Some(name) = name else {
        warn!(%context, "organization has no profile");
        return Err(PersistenceError::data_consistency(format!(
            "{context}: profile missing"
        )));
    };
    if members.is_empty() {
        warn!(%context, "organization has no members");
        return Err(PersistenceError::data_consistency(format!(
            "{context}: no members"
        )));
    }

    let display_name = DisplayName::new(name).map_err(|error| inconsistent(&context, error))?;
    let users = members
        .into_iter()
        .map(|row| member_from_row(&context, row))
        .collect::<Result<Vec<_>, _>>()?;
    let inviting_unknown_users = invitations
        .into_iter()
        .map(|row| {
            Ok(InvitingUnknownUser {
                email: Email::new(row.invitee_user_email)
                    .map_err(|error| inconsistent(&context, error))?,
                role: Role::new(row.role_name),
            })
        })
        .collect::<Result<Vec<_>, PersistenceError>>()?;

    Ok(Organization::new(
        OrganizationId::from_uuid(id),
        display_name,
        users,
        inviting_unknown_users,
    ))
}

fn member_from_row(context: &str, row: MemberRow) -> Result<OrganizationMember, PersistenceError> {
    let Some(email) = row.email else {
        warn!(%context, user_id = %row.user_id, "member has no email registration");
        return Err(PersistenceError::data_consistency(format!(
            "{context}: member {} has no email",
            row.user_id
        )));
    };
    Ok(OrganizationMember {
        id: UserId::from_uuid(row.user_id),
        email: Email::new(email).map_err(|error| inconsistent(context, error))?,
        display_name: optional_name(context, row.name)?,
        role: Role::new(row.role_name),
    })
}

/// Build the home view of `profile` with `selected` opened.
///
/// Returns `None` when `selected` is not among the user's organizations.
pub(crate) fn home_from_rows(
    profile: UserProfileRow,
    organizations: Vec<BelongingOrganizationRow>,
    selected: &OrganizationId,
    members: Vec<MemberRow>,
) -> Result<Option<Home>, PersistenceError> {
    let context = format!("user {}", profile.user_id);
    let user = HomeUser {
        id: UserId::from_uuid(profile.user_id),
        email: Email::new(profile.email).map_err(|error| inconsistent(&context, error))?,
        display_name: optional_name(&context, profile.name)?,
    };
    let belonging_organizations = organizations
        .into_iter()
        .map(summary_from_row)
        .collect::<Result<Vec<_>, _>>()?;
    let selected_context = format!("organization {selected}");
    let members = members
        .into_iter()
        .map(|row| member_from_row(&selected_context, row))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Home::select(user, belonging_organizations, selected, members))
}

fn summary_from_row(
    row: BelongingOrganizationRow,
) -> Result<OrganizationSummary, PersistenceError> {
    let context = format!("organization {}", row.organization_id);
    let Some(name) = row.organization_name else {
        warn!(%context, "organization has no profile");
        return Err(PersistenceError::data_consistency(format!(
            "{context}: profile missing"
        )));
    };
    Ok(OrganizationSummary {
        id: OrganizationId::from_uuid(row.organization_id),
        display_name: DisplayName::new(name).map_err(|error| inconsistent(&context, error))?,
        role: Role::new(row.role_name),
        authority_manage_organization: row.manage_organization,
    })
}

/// Build an unknown user from the invitations addressed to `email`.
///
/// Returns `None` when there are no pending invitations.
pub(crate) fn unknown_user_from_rows(
    email: &Email,
    rows: Vec<InvitationRow>,
) -> Option<UnknownUser> {
    if rows.is_empty() {
        return None;
    }
    let invited_organizations = rows
        .into_iter()
        .map(|row| InvitedOrganization {
            id: OrganizationId::from_uuid(row.organization_id),
            role: Role::new(row.role_name),
        })
        .collect();
    Some(UnknownUser::new(email.clone(), invited_organizations))
}
