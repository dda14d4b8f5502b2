//! PostgreSQL-backed lookup of invitees who have not signed up yet.

use async_trait::async_trait;
use diesel::sql_query;
use diesel::sql_types::Text;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{Find, PersistenceError};
use crate::domain::{Email, UnknownUser};

use super::error_mapping::{map_diesel_error, map_pool_error};
use super::mapping::unknown_user_from_rows;
use super::models::InvitationRow;
use super::pool::DbPool;
use super::queries::INVITATIONS_BY_EMAIL;

/// Diesel-backed `Find<Email, UnknownUser>`.
///
/// Resolves the pending invitations addressed to an email that no current
/// user has registered. One invitation per organization, latest wins.
#[derive(Clone)]
pub struct DieselUnknownUserRepository {
    pool: DbPool,
}

impl DieselUnknownUserRepository {
    /// Create a repository over the given pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl<C> Find<Email, UnknownUser, C> for DieselUnknownUserRepository
where
    C: Sync,
{
    async fn find(&self, email: &Email, _ctx: &C) -> Result<Option<UnknownUser>, PersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows = sql_query(INVITATIONS_BY_EMAIL)
            .bind::<Text, _>(email.as_str())
            .load::<InvitationRow>(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(unknown_user_from_rows(email, rows))
    }
}
