//! Read models for the signed-in home view and the organization switcher.
//!
//! The home view is a projection: it is loaded fresh for one user and one
//! opened organization and never persisted. [`OrganizationSwitch`] is the
//! only fact here; it records which organization a member opened last.

use super::events::Identified;
use super::organization::OrganizationMember;
use super::user::User;
use super::values::{DisplayName, Email, OrganizationId, Role, UserId};

/// Identity of the user the home view belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HomeUser {
    pub id: UserId,
    pub email: Email,
    pub display_name: Option<DisplayName>,
}

/// One organization the user belongs to, with their current role in it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrganizationSummary {
    pub id: OrganizationId,
    pub display_name: DisplayName,
    pub role: Role,
    /// Capability stored for `role` in the role table.
    pub authority_manage_organization: bool,
}

/// The organization opened in the home view and its current members.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedOrganization {
    pub summary: OrganizationSummary,
    /// Active members, oldest membership first.
    pub members: Vec<OrganizationMember>,
}

/// Home view of one user with one of their organizations opened.
///
/// ## Invariants
/// - `selected_organization.summary` is one of `belonging_organizations`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Home {
    pub user: HomeUser,
    /// Every active membership, oldest first.
    pub belonging_organizations: Vec<OrganizationSummary>,
    pub selected_organization: SelectedOrganization,
}

impl Home {
    /// Assemble the view with `selected` opened.
    ///
    /// Returns `None` when the user does not belong to `selected`.
    ///
    /// # Examples
    /// ```
    /// use accounts::domain::{Email, Home, HomeUser, OrganizationId, UserId};
    ///
    /// # fn main() -> Result<(), accounts::domain::ValueError> {
    /// let user = HomeUser {
    ///     id: UserId::generate(),
    ///     email: Email::new("ada@example.com")?,
    ///     display_name: None,
    /// };
    /// assert!(Home::select(user, Vec::new(), &OrganizationId::generate(), Vec::new()).is_none());
    /// # Ok(())
    /// # }
    /// ```
    pub fn select(
        user: HomeUser,
        belonging_organizations: Vec<OrganizationSummary>,
        selected: &OrganizationId,
        members: Vec<OrganizationMember>,
    ) -> Option<Self> {
        let summary = belonging_organizations
            .iter()
            .find(|organization| &organization.id == selected)?
            .clone();
        Some(Self {
            user,
            belonging_organizations,
            selected_organization: SelectedOrganization { summary, members },
        })
    }
}

/// Pick the organization to open after login.
///
/// The last switched-to organization wins while the user still belongs to
/// it; otherwise the oldest active membership. `None` when the user belongs
/// to no organization.
pub fn resolve_latest_logged_in_organization(
    last_switched: Option<OrganizationId>,
    first_belonged: Option<OrganizationId>,
) -> Option<OrganizationId> {
    last_switched.or(first_belonged)
}

/// A member opened one of their organizations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrganizationSwitch {
    pub user_id: UserId,
    pub organization_id: OrganizationId,
}

impl Identified for OrganizationSwitch {
    type Id = OrganizationId;

    fn id(&self) -> &Self::Id {
        &self.organization_id
    }
}

/// Record that `user` opened `organization_id`.
///
/// Returns `None` when the user does not belong to the organization.
pub fn switch_organization(
    user: &User,
    organization_id: &OrganizationId,
) -> Option<OrganizationSwitch> {
    user.membership(organization_id)
        .map(|membership| OrganizationSwitch {
            user_id: *user.id(),
            organization_id: membership.id,
        })
}
