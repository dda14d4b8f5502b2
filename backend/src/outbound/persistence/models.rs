//! Internal Diesel row structs for the account tables.
//!
//! Insert rows borrow from domain values. Read rows are `QueryableByName`
//! because the current-state reads are raw SQL (see `queries.rs`).

use diesel::prelude::*;
use diesel::sql_types::{Bool, Nullable, Text, Uuid as SqlUuid};
use uuid::Uuid;

use super::schema::{
    assign, belong, organizations, organizations_invitation, organizations_profile,
    organizations_switch, users, users_email_registration, users_profile,
};

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow {
    pub id: Uuid,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users_email_registration)]
pub(crate) struct NewEmailRegistrationRow<'a> {
    pub id: Uuid,
    pub user_id: Uuid,
    pub email: &'a str,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users_profile)]
pub(crate) struct NewUserProfileRow<'a> {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: Option<&'a str>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = organizations)]
pub(crate) struct NewOrganizationRow {
    pub id: Uuid,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = organizations_profile)]
pub(crate) struct NewOrganizationProfileRow<'a> {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub name: &'a str,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = belong)]
pub(crate) struct NewBelongRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub organization_id: Uuid,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = assign)]
pub(crate) struct NewAssignRow<'a> {
    pub id: Uuid,
    pub belong_id: Uuid,
    pub role_name: &'a str,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = organizations_invitation)]
pub(crate) struct NewInvitationRow<'a> {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub role_name: &'a str,
    pub invitee_user_email: &'a str,
    pub inviter_user_id: Uuid,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = organizations_switch)]
pub(crate) struct NewOrganizationSwitchRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub organization_id: Uuid,
}

/// Current identity of a user: id, current email and current profile name.
#[derive(Debug, Clone, QueryableByName)]
pub(crate) struct UserProfileRow {
    #[diesel(sql_type = SqlUuid)]
    pub user_id: Uuid,
    #[diesel(sql_type = Text)]
    pub email: String,
    #[diesel(sql_type = Nullable<Text>)]
    pub name: Option<String>,
}

/// One active membership of a user.
#[derive(Debug, Clone, QueryableByName)]
pub(crate) struct MembershipRow {
    #[diesel(sql_type = SqlUuid)]
    pub organization_id: Uuid,
    #[diesel(sql_type = Text)]
    pub role_name: String,
    #[diesel(sql_type = Bool)]
    pub manage_organization: bool,
}

/// One active membership with the organization's current name.
#[derive(Debug, Clone, QueryableByName)]
pub(crate) struct BelongingOrganizationRow {
    #[diesel(sql_type = SqlUuid)]
    pub organization_id: Uuid,
    #[diesel(sql_type = Nullable<Text>)]
    pub organization_name: Option<String>,
    #[diesel(sql_type = Text)]
    pub role_name: String,
    #[diesel(sql_type = Bool)]
    pub manage_organization: bool,
}

/// Candidates for the organization to open after login.
#[derive(Debug, Clone, QueryableByName)]
pub(crate) struct SwitchedOrganizationRow {
    #[diesel(sql_type = Nullable<SqlUuid>)]
    pub last_switched_organization_id: Option<Uuid>,
    #[diesel(sql_type = Nullable<SqlUuid>)]
    pub first_belonged_organization_id: Option<Uuid>,
}

/// One active member of an organization.
#[derive(Debug, Clone, QueryableByName)]
pub(crate) struct MemberRow {
    #[diesel(sql_type = SqlUuid)]
    pub user_id: Uuid,
    #[diesel(sql_type = Text)]
    pub role_name: String,
    #[diesel(sql_type = Nullable<Text>)]
    pub email: Option<String>,
    #[diesel(sql_type = Nullable<Text>)]
    pub name: Option<String>,
}

/// One pending invitation.
#[derive(Debug, Clone, QueryableByName)]
pub(crate) struct InvitationRow {
    #[diesel(sql_type = SqlUuid)]
    pub organization_id: Uuid,
    #[diesel(sql_type = Text)]
    pub invitee_user_email: String,
    #[diesel(sql_type = Text)]
    pub role_name: String,
}
