//! Driving port that picks the organization to open after login.

use async_trait::async_trait;

use crate::domain::{OrganizationId, UserId};

use super::define_port_error;

define_port_error! {
    /// Failures surfaced by [`LatestLoggedInOrganizationQuery`].
    pub enum LatestLoggedInOrganizationQueryError {
        /// The user has no active membership.
        NoBelongingOrganization { user_id: String }
            => "belonging organization not found for user id: {user_id}",
        /// A repository failed.
        Repository { message: String }
            => "latest organization query failed in a repository: {message}",
    }
}

/// Domain query port for the organization to open after login.
///
/// Implementations return the organization the user last switched to while
/// they still belong to it, and otherwise their oldest active membership.
#[async_trait]
pub trait LatestLoggedInOrganizationQuery<C = ()>: Send + Sync
where
    C: Sync,
{
    /// Resolve the organization to open for `user_id`.
    async fn latest_logged_in_organization(
        &self,
        user_id: &UserId,
        ctx: &C,
    ) -> Result<OrganizationId, LatestLoggedInOrganizationQueryError>;
}
