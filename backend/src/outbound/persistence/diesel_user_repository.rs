//! PostgreSQL-backed user repository.
//!
//! Implements lookup by email and by id, the two signup persists and the
//! organization switch record. Reads
//! run inside one transaction so the profile and the memberships come from
//! the same snapshot; each persist appends all of its rows atomically.

use async_trait::async_trait;
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel::sql_query;
use diesel::sql_types::{Text, Uuid as SqlUuid};
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};
use tracing::warn;
use uuid::Uuid;

use crate::domain::ports::{Find, Persist, PersistenceError};
use crate::domain::{
    Email, OrganizationId, OrganizationSwitch, Role, User, UserId, UserWithDefaultOrganization,
    UserWithInvitedOrganizations,
};

use super::error_mapping::{map_diesel_error, map_pool_error};
use super::mapping::user_from_rows;
use super::models::{
    MembershipRow, NewAssignRow, NewBelongRow, NewEmailRegistrationRow, NewOrganizationProfileRow,
    NewOrganizationRow, NewOrganizationSwitchRow, NewUserProfileRow, NewUserRow, UserProfileRow,
};
use super::pool::DbPool;
use super::queries::{MEMBERSHIPS_BY_USER, USER_BY_EMAIL, USER_BY_ID};
use super::schema::{
    assign, belong, organizations, organizations_profile, organizations_switch, users,
    users_email_registration, users_profile,
};

/// Diesel-backed implementation of the user `Find` and `Persist` ports.
///
/// # Examples
///
/// ```rust,no_run
/// use accounts::domain::{Email, User};
/// use accounts::domain::ports::Find;
/// use accounts::outbound::persistence::{DbPool, DieselUserRepository, PoolConfig};
///
/// # async fn run() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = DbPool::new(PoolConfig::new("postgres://localhost/accounts")).await?;
/// let users = DieselUserRepository::new(pool);
/// let email = Email::new("ada@example.com")?;
/// let found = Find::<Email, User, ()>::find(&users, &email, &()).await?;
/// # let _ = found;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    /// Create a repository over the given pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Rows establishing a new user identity.
struct NewIdentityRows<'a> {
    user: NewUserRow,
    email: NewEmailRegistrationRow<'a>,
    profile: NewUserProfileRow<'a>,
}

impl<'a> NewIdentityRows<'a> {
    fn for_user(user: &'a User) -> Self {
        let user_id = *user.id().as_uuid();
        Self {
            user: NewUserRow { id: user_id },
            email: NewEmailRegistrationRow {
                id: Uuid::now_v7(),
                user_id,
                email: user.email().as_str(),
            },
            profile: NewUserProfileRow {
                id: Uuid::now_v7(),
                user_id,
                name: user.display_name().map(|name| name.as_str()),
            },
        }
    }
}

/// Rows attaching a user to an organization with a role.
pub(crate) struct NewMembershipRows<'a> {
    pub(crate) belong: NewBelongRow,
    pub(crate) assign: NewAssignRow<'a>,
}

impl<'a> NewMembershipRows<'a> {
    pub(crate) fn new(user_id: &UserId, organization_id: &OrganizationId, role: &'a Role) -> Self {
        let belong_id = Uuid::now_v7();
        Self {
            belong: NewBelongRow {
                id: belong_id,
                user_id: *user_id.as_uuid(),
                organization_id: *organization_id.as_uuid(),
            },
            assign: NewAssignRow {
                id: Uuid::now_v7(),
                belong_id,
                role_name: role.as_str(),
            },
        }
    }
}

async fn insert_identity<C>(conn: &mut C, rows: &NewIdentityRows<'_>) -> QueryResult<()>
where
    C: AsyncConnection<Backend = Pg> + Send,
{
    diesel::insert_into(users::table)
        .values(&rows.user)
        .execute(conn)
        .await?;
    diesel::insert_into(users_email_registration::table)
        .values(&rows.email)
        .execute(conn)
        .await?;
    diesel::insert_into(users_profile::table)
        .values(&rows.profile)
        .execute(conn)
        .await?;
    Ok(())
}

pub(crate) async fn insert_memberships<C>(
    conn: &mut C,
    rows: &[NewMembershipRows<'_>],
) -> QueryResult<()>
where
    C: AsyncConnection<Backend = Pg> + Send,
{
    if rows.is_empty() {
        return Ok(());
    }
    let belongs: Vec<&NewBelongRow> = rows.iter().map(|row| &row.belong).collect();
    let assigns: Vec<&NewAssignRow<'_>> = rows.iter().map(|row| &row.assign).collect();
    diesel::insert_into(belong::table)
        .values(belongs)
        .execute(conn)
        .await?;
    diesel::insert_into(assign::table)
        .values(assigns)
        .execute(conn)
        .await?;
    Ok(())
}

async fn with_memberships<C>(
    conn: &mut C,
    profile: Option<UserProfileRow>,
) -> QueryResult<Option<(UserProfileRow, Vec<MembershipRow>)>>
where
    C: AsyncConnection<Backend = Pg> + Send,
{
    let Some(profile) = profile else {
        return Ok(None);
    };
    let memberships = sql_query(MEMBERSHIPS_BY_USER)
        .bind::<SqlUuid, _>(profile.user_id)
        .load::<MembershipRow>(conn)
        .await?;
    Ok(Some((profile, memberships)))
}

fn into_user(
    rows: Option<(UserProfileRow, Vec<MembershipRow>)>,
) -> Result<Option<User>, PersistenceError> {
    rows.map(|(profile, memberships)| user_from_rows(profile, memberships))
        .transpose()
}

#[async_trait]
impl<C> Find<Email, User, C> for DieselUserRepository
where
    C: Sync,
{
    async fn find(&self, email: &Email, _ctx: &C) -> Result<Option<User>, PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows = conn
            .transaction(|conn| {
                async move {
                    let profile = sql_query(USER_BY_EMAIL)
                        .bind::<Text, _>(email.as_str())
                        .get_result::<UserProfileRow>(conn)
                        .await
                        .optional()?;
                    with_memberships(conn, profile).await
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)?;
        into_user(rows)
    }
}

#[async_trait]
impl<C> Find<UserId, User, C> for DieselUserRepository
where
    C: Sync,
{
    async fn find(&self, id: &UserId, _ctx: &C) -> Result<Option<User>, PersistenceError> {
        let user_id = *id.as_uuid();
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows = conn
            .transaction(|conn| {
                async move {
                    let profile = sql_query(USER_BY_ID)
                        .bind::<SqlUuid, _>(user_id)
                        .get_result::<UserProfileRow>(conn)
                        .await
                        .optional()?;
                    with_memberships(conn, profile).await
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)?;
        into_user(rows)
    }
}

#[async_trait]
impl<C> Persist<UserWithDefaultOrganization, C> for DieselUserRepository
where
    C: Sync,
{
    async fn persist(
        &self,
        created: &UserWithDefaultOrganization,
        _ctx: &C,
    ) -> Result<UserId, PersistenceError> {
        let user = &created.entity;
        let organization_id = created.event.created_organization_id;
        let Some(membership) = user.membership(&organization_id) else {
            warn!(
                user_id = %user.id(),
                %organization_id,
                "created organization is missing from the user's memberships"
            );
            return Err(PersistenceError::data_consistency(format!(
                "user {} has no membership for created organization {organization_id}",
                user.id()
            )));
        };

        let identity = NewIdentityRows::for_user(user);
        let organization = NewOrganizationRow {
            id: *organization_id.as_uuid(),
        };
        let organization_profile = NewOrganizationProfileRow {
            id: Uuid::now_v7(),
            organization_id: *organization_id.as_uuid(),
            name: created.event.created_organization_name.as_str(),
        };
        let memberships = [NewMembershipRows::new(
            user.id(),
            &organization_id,
            &membership.role,
        )];

        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        conn.transaction(|conn| {
            async move {
                insert_identity(conn, &identity).await?;
                diesel::insert_into(organizations::table)
                    .values(&organization)
                    .execute(conn)
                    .await?;
                diesel::insert_into(organizations_profile::table)
                    .values(&organization_profile)
                    .execute(conn)
                    .await?;
                insert_memberships(conn, &memberships).await
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error)?;

        Ok(*user.id())
    }
}

#[async_trait]
impl<C> Persist<UserWithInvitedOrganizations, C> for DieselUserRepository
where
    C: Sync,
{
    async fn persist(
        &self,
        created: &UserWithInvitedOrganizations,
        _ctx: &C,
    ) -> Result<UserId, PersistenceError> {
        let user = &created.entity;
        let identity = NewIdentityRows::for_user(user);
        let memberships: Vec<NewMembershipRows<'_>> = user
            .belonging_organizations()
            .iter()
            .map(|membership| NewMembershipRows::new(user.id(), &membership.id, &membership.role))
            .collect();

        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        conn.transaction(|conn| {
            async move {
                insert_identity(conn, &identity).await?;
                insert_memberships(conn, &memberships).await
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error)?;

        Ok(*user.id())
    }
}

#[async_trait]
impl<C> Persist<OrganizationSwitch, C> for DieselUserRepository
where
    C: Sync,
{
    async fn persist(
        &self,
        switch: &OrganizationSwitch,
        _ctx: &C,
    ) -> Result<OrganizationId, PersistenceError> {
        let row = NewOrganizationSwitchRow {
            id: Uuid::now_v7(),
            user_id: *switch.user_id.as_uuid(),
            organization_id: *switch.organization_id.as_uuid(),
        };

        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(organizations_switch::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(switch.organization_id)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::{
        DisplayName, UserCreationWithDefaultOrganizationEvent,
        create_user_with_default_organization,
    };
    use crate::outbound::persistence::PoolConfig;
    use rstest::rstest;

    #[rstest]
    fn identity_rows_carry_current_values() {
        let created = create_user_with_default_organization(
            Email::new("ada@example.com").expect("valid email"),
        );
        let user = created
            .entity
            .with_display_name(Some(DisplayName::new("Ada").expect("valid name")));

        let rows = NewIdentityRows::for_user(&user);

        assert_eq!(&rows.user.id, user.id().as_uuid());
        assert_eq!(rows.email.user_id, rows.user.id);
        assert_eq!(rows.email.email, "ada@example.com");
        assert_eq!(rows.profile.name, Some("Ada"));
        assert_ne!(rows.email.id, rows.profile.id);
    }

    #[rstest]
    fn membership_rows_link_assign_to_belong() {
        let user_id = UserId::generate();
        let organization_id = OrganizationId::generate();
        let role = Role::guest();

        let rows = NewMembershipRows::new(&user_id, &organization_id, &role);

        assert_eq!(rows.assign.belong_id, rows.belong.id);
        assert_eq!(&rows.belong.organization_id, organization_id.as_uuid());
        assert_eq!(rows.assign.role_name, "guest");
    }

    #[rstest]
    #[tokio::test]
    async fn default_organization_must_be_among_memberships() {
        let pool = DbPool::lazy(PoolConfig::new("postgres://unused@127.0.0.1:1/none"));
        let repository = DieselUserRepository::new(pool);
        let created = create_user_with_default_organization(
            Email::new("ada@example.com").expect("valid email"),
        );
        let mismatched = UserWithDefaultOrganization::new(
            created.entity,
            UserCreationWithDefaultOrganizationEvent {
                created_organization_id: OrganizationId::generate(),
                created_organization_name: created.event.created_organization_name,
            },
        );

        let err = Persist::<UserWithDefaultOrganization, ()>::persist(&repository, &mismatched, &())
            .await
            .expect_err("no membership for created organization");

        assert!(err.is_data_consistency());
    }
}
