//! PostgreSQL-backed organization repository.
//!
//! Loads the current state of an organization (latest profile, active
//! members, pending invitations) in one read transaction, and appends the
//! facts produced by an invitation.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::sql_query;
use diesel::sql_types::Uuid as SqlUuid;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};
use tracing::info;
use uuid::Uuid;

use crate::domain::ports::{Find, Persist, PersistenceError};
use crate::domain::{Organization, OrganizationId, OrganizationWithInvitation};

use super::diesel_user_repository::{NewMembershipRows, insert_memberships};
use super::error_mapping::{map_diesel_error, map_pool_error};
use super::mapping::organization_from_rows;
use super::models::{InvitationRow, MemberRow, NewInvitationRow};
use super::pool::DbPool;
use super::queries::{MEMBERS_BY_ORGANIZATION, PENDING_INVITATIONS_BY_ORGANIZATION};
use super::schema::{
    organizations, organizations_delete, organizations_invitation, organizations_profile,
};

/// Diesel-backed implementation of the organization `Find` and `Persist`
/// ports.
#[derive(Clone)]
pub struct DieselOrganizationRepository {
    pool: DbPool,
}

impl DieselOrganizationRepository {
    /// Create a repository over the given pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

type OrganizationRows = (Option<String>, Vec<MemberRow>, Vec<InvitationRow>);

#[async_trait]
impl<C> Find<OrganizationId, Organization, C> for DieselOrganizationRepository
where
    C: Sync,
{
    async fn find(
        &self,
        id: &OrganizationId,
        _ctx: &C,
    ) -> Result<Option<Organization>, PersistenceError> {
        let organization_id = *id.as_uuid();
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Option<OrganizationRows> = conn
            .transaction(|conn| {
                async move {
                    let live = organizations::table
                        .left_join(organizations_delete::table)
                        .filter(organizations::id.eq(organization_id))
                        .filter(organizations_delete::id.is_null())
                        .select(organizations::id)
                        .first::<Uuid>(conn)
                        .await
                        .optional()?;
                    if live.is_none() {
                        return Ok(None);
                    }

                    let name = organizations_profile::table
                        .filter(organizations_profile::organization_id.eq(organization_id))
                        .order((
                            organizations_profile::created_at.desc(),
                            organizations_profile::id.desc(),
                        ))
                        .select(organizations_profile::name)
                        .first::<String>(conn)
                        .await
                        .optional()?;
                    let members = sql_query(MEMBERS_BY_ORGANIZATION)
                        .bind::<SqlUuid, _>(organization_id)
                        .load::<MemberRow>(conn)
                        .await?;
                    let invitations = sql_query(PENDING_INVITATIONS_BY_ORGANIZATION)
                        .bind::<SqlUuid, _>(organization_id)
                        .load::<InvitationRow>(conn)
                        .await?;
                    Ok(Some((name, members, invitations)))
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)?;

        rows.map(|(name, members, invitations)| {
            organization_from_rows(organization_id, name, members, invitations)
        })
        .transpose()
    }
}

#[async_trait]
impl<C> Persist<OrganizationWithInvitation, C> for DieselOrganizationRepository
where
    C: Sync,
{
    async fn persist(
        &self,
        invited: &OrganizationWithInvitation,
        _ctx: &C,
    ) -> Result<OrganizationId, PersistenceError> {
        let organization = &invited.entity;
        let event = &invited.event;
        let memberships: Vec<NewMembershipRows<'_>> = organization
            .member_by_email(&event.invitee_email)
            .map(|member| NewMembershipRows::new(&member.id, organization.id(), &member.role))
            .into_iter()
            .collect();
        let invitation = NewInvitationRow {
            id: Uuid::now_v7(),
            organization_id: *organization.id().as_uuid(),
            role_name: event.invitee_role.as_str(),
            invitee_user_email: event.invitee_email.as_str(),
            inviter_user_id: *event.inviter_user_id.as_uuid(),
        };
        let joined = !memberships.is_empty();

        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        conn.transaction(|conn| {
            async move {
                insert_memberships(conn, &memberships).await?;
                diesel::insert_into(organizations_invitation::table)
                    .values(&invitation)
                    .execute(conn)
                    .await?;
                Ok(())
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error)?;

        info!(
            organization_id = %organization.id(),
            inviter_user_id = %event.inviter_user_id,
            joined,
            "recorded organization invitation"
        );
        Ok(*organization.id())
    }
}
