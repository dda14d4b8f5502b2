//! Driving port for the login-or-signup use case.
//!
//! Callers hand over a parsed command and receive the id of the user that is
//! now signed in, whether the account existed already or was just created.

use async_trait::async_trait;

use crate::domain::{LoginOrSignupCommand, UserId};

use super::define_port_error;

define_port_error! {
    /// Failures surfaced by [`LoginOrSignup`].
    pub enum LoginOrSignupError {
        /// A repository failed or returned inconsistent data.
        Repository { message: String } => "login or signup failed in a repository: {message}",
        /// A collaborator broke its contract.
        Unknown { message: String } => "login or signup failed unexpectedly: {message}",
    }
}

/// Domain use-case port for login-or-signup by email.
#[async_trait]
pub trait LoginOrSignup<C = ()>: Send + Sync
where
    C: Sync,
{
    /// Resolve the account for the command's email, creating it when needed.
    async fn login_or_signup(
        &self,
        command: LoginOrSignupCommand,
        ctx: &C,
    ) -> Result<UserId, LoginOrSignupError>;
}
