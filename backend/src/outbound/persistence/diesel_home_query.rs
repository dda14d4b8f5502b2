//! PostgreSQL-backed read side: the home view and the organization to open
//! after login.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::sql_query;
use diesel::sql_types::Uuid as SqlUuid;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};
use uuid::Uuid;

use crate::domain::ports::{
    HomeQuery, HomeQueryError, HomeQueryRequest, LatestLoggedInOrganizationQuery,
    LatestLoggedInOrganizationQueryError, PersistenceError,
};
use crate::domain::{Home, OrganizationId, UserId, resolve_latest_logged_in_organization};

use super::error_mapping::{map_diesel_error, map_pool_error};
use super::mapping::home_from_rows;
use super::models::{BelongingOrganizationRow, MemberRow, SwitchedOrganizationRow, UserProfileRow};
use super::pool::DbPool;
use super::queries::{
    BELONGING_ORGANIZATIONS_BY_USER, LATEST_LOGGED_IN_ORGANIZATION, MEMBERS_BY_ORGANIZATION,
    USER_BY_ID,
};

/// Diesel-backed `HomeQuery` and `LatestLoggedInOrganizationQuery`.
///
/// # Examples
///
/// ```rust,no_run
/// use accounts::domain::ports::{HomeQuery, HomeQueryRequest, LatestLoggedInOrganizationQuery};
/// use accounts::domain::UserId;
/// use accounts::outbound::persistence::{DbPool, DieselHomeQuery, PoolConfig};
///
/// # async fn run(user_id: UserId) -> Result<(), Box<dyn std::error::Error>> {
/// let pool = DbPool::new(PoolConfig::new("postgres://localhost/accounts")).await?;
/// let queries = DieselHomeQuery::new(pool);
/// let organization_id = queries.latest_logged_in_organization(&user_id, &()).await?;
/// let request = HomeQueryRequest { user_id, organization_id };
/// let home = queries.home(&request, &()).await?;
/// # let _ = home;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct DieselHomeQuery {
    pool: DbPool,
}

impl DieselHomeQuery {
    /// Create a query adapter over the given pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Load the user, their memberships and, when the user belongs to it,
    /// the members of `organization_id`, all from one snapshot.
    async fn load_home_rows(
        &self,
        user_id: Uuid,
        organization_id: Uuid,
    ) -> Result<Option<HomeRows>, PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        conn.transaction(|conn| {
            async move {
                let Some(profile) = sql_query(USER_BY_ID)
                    .bind::<SqlUuid, _>(user_id)
                    .get_result::<UserProfileRow>(conn)
                    .await
                    .optional()?
                else {
                    return Ok(None);
                };
                let organizations = sql_query(BELONGING_ORGANIZATIONS_BY_USER)
                    .bind::<SqlUuid, _>(user_id)
                    .load::<BelongingOrganizationRow>(conn)
                    .await?;
                let belongs = organizations
                    .iter()
                    .any(|row| row.organization_id == organization_id);
                let members = if belongs {
                    sql_query(MEMBERS_BY_ORGANIZATION)
                        .bind::<SqlUuid, _>(organization_id)
                        .load::<MemberRow>(conn)
                        .await?
                } else {
                    Vec::new()
                };
                Ok(Some(HomeRows {
                    profile,
                    organizations,
                    members,
                }))
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error)
    }
}

struct HomeRows {
    profile: UserProfileRow,
    organizations: Vec<BelongingOrganizationRow>,
    members: Vec<MemberRow>,
}

fn map_home_error(error: PersistenceError) -> HomeQueryError {
    HomeQueryError::repository(error.to_string())
}

fn map_latest_error(error: PersistenceError) -> LatestLoggedInOrganizationQueryError {
    LatestLoggedInOrganizationQueryError::repository(error.to_string())
}

#[async_trait]
impl<C> HomeQuery<C> for DieselHomeQuery
where
    C: Sync,
{
    async fn home(&self, request: &HomeQueryRequest, _ctx: &C) -> Result<Home, HomeQueryError> {
        let rows = self
            .load_home_rows(
                *request.user_id.as_uuid(),
                *request.organization_id.as_uuid(),
            )
            .await
            .map_err(map_home_error)?;
        let Some(rows) = rows else {
            return Err(HomeQueryError::user_not_found(request.user_id.to_string()));
        };
        home_from_rows(
            rows.profile,
            rows.organizations,
            &request.organization_id,
            rows.members,
        )
        .map_err(map_home_error)?
        .ok_or_else(|| HomeQueryError::organization_not_found(request.organization_id.to_string()))
    }
}

#[async_trait]
impl<C> LatestLoggedInOrganizationQuery<C> for DieselHomeQuery
where
    C: Sync,
{
    async fn latest_logged_in_organization(
        &self,
        user_id: &UserId,
        _ctx: &C,
    ) -> Result<OrganizationId, LatestLoggedInOrganizationQueryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(map_pool_error)
            .map_err(map_latest_error)?;
        let row = sql_query(LATEST_LOGGED_IN_ORGANIZATION)
            .bind::<SqlUuid, _>(*user_id.as_uuid())
            .get_result::<SwitchedOrganizationRow>(&mut conn)
            .await
            .map_err(map_diesel_error)
            .map_err(map_latest_error)?;

        resolve_latest_logged_in_organization(
            row.last_switched_organization_id.map(OrganizationId::from_uuid),
            row.first_belonged_organization_id.map(OrganizationId::from_uuid),
        )
        .ok_or_else(|| {
            LatestLoggedInOrganizationQueryError::no_belonging_organization(user_id.to_string())
        })
    }
}
