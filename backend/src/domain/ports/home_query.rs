//! Driving port for the signed-in home view.
//!
//! Inbound adapters call this once a session is established to render the
//! user's organizations and the members of the one they opened.

use async_trait::async_trait;

use crate::domain::{Home, OrganizationId, UserId};

use super::define_port_error;

/// Whose home to load and which organization is opened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HomeQueryRequest {
    pub user_id: UserId,
    pub organization_id: OrganizationId,
}

define_port_error! {
    /// Failures surfaced by [`HomeQuery`].
    pub enum HomeQueryError {
        /// No live user has this id.
        UserNotFound { user_id: String } => "user id: {user_id} not found",
        /// The user has no active membership in the requested organization.
        OrganizationNotFound { organization_id: String }
            => "organization id: {organization_id} not found",
        /// A repository failed or returned inconsistent data.
        Repository { message: String } => "home query failed in a repository: {message}",
    }
}

/// Domain query port for the home view.
#[async_trait]
pub trait HomeQuery<C = ()>: Send + Sync
where
    C: Sync,
{
    /// Load the home of `request.user_id` with `request.organization_id` opened.
    async fn home(&self, request: &HomeQueryRequest, ctx: &C) -> Result<Home, HomeQueryError>;
}
