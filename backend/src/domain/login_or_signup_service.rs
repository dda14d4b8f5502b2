//! Login-or-signup use case.
//!
//! Resolves the account for an email. A registered user simply signs in; an
//! email with pending invitations becomes a user in those organizations;
//! anything else becomes a user with a fresh default organization.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::domain::ports::{Find, LoginOrSignup, LoginOrSignupError, Persist, PersistenceError};
use crate::domain::{
    Email, EntityWithEvent, LoginOrSignupCommand, UnknownUser, User, UserId,
    UserWithDefaultOrganization, UserWithInvitedOrganizations,
    create_user_with_default_organization, create_user_with_invited_organization,
};

/// Service implementing [`LoginOrSignup`] over repository ports.
pub struct LoginOrSignupService<C = ()>
where
    C: Send + Sync + 'static,
{
    find_user_by_email: Arc<dyn Find<Email, User, C>>,
    find_unknown_user_by_email: Arc<dyn Find<Email, UnknownUser, C>>,
    persist_user_with_default_organization: Arc<dyn Persist<UserWithDefaultOrganization, C>>,
    persist_user_with_invited_organizations: Arc<dyn Persist<UserWithInvitedOrganizations, C>>,
}

impl<C> Clone for LoginOrSignupService<C>
where
    C: Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            find_user_by_email: Arc::clone(&self.find_user_by_email),
            find_unknown_user_by_email: Arc::clone(&self.find_unknown_user_by_email),
            persist_user_with_default_organization: Arc::clone(
                &self.persist_user_with_default_organization,
            ),
            persist_user_with_invited_organizations: Arc::clone(
                &self.persist_user_with_invited_organizations,
            ),
        }
    }
}

impl<C> LoginOrSignupService<C>
where
    C: Send + Sync + 'static,
{
    /// Create a service over the given repositories.
    pub fn new(
        find_user_by_email: Arc<dyn Find<Email, User, C>>,
        find_unknown_user_by_email: Arc<dyn Find<Email, UnknownUser, C>>,
        persist_user_with_default_organization: Arc<dyn Persist<UserWithDefaultOrganization, C>>,
        persist_user_with_invited_organizations: Arc<dyn Persist<UserWithInvitedOrganizations, C>>,
    ) -> Self {
        Self {
            find_user_by_email,
            find_unknown_user_by_email,
            persist_user_with_default_organization,
            persist_user_with_invited_organizations,
        }
    }

    fn map_persistence_error(error: PersistenceError) -> LoginOrSignupError {
        match error {
            PersistenceError::Io { .. } | PersistenceError::DataConsistency { .. } => {
                LoginOrSignupError::repository(error.to_string())
            }
            PersistenceError::Unexpected { message } => {
                warn!(%message, "repository broke its contract during login or signup");
                LoginOrSignupError::unknown(message)
            }
        }
    }

    async fn signup_with_default_organization(
        &self,
        email: Email,
        command: &LoginOrSignupCommand,
        ctx: &C,
    ) -> Result<UserId, LoginOrSignupError> {
        let EntityWithEvent { entity, event } = create_user_with_default_organization(email);
        let created = EntityWithEvent::new(
            entity.with_display_name(command.display_name.clone()),
            event,
        );
        let user_id = self
            .persist_user_with_default_organization
            .persist(&created, ctx)
            .await
            .map_err(Self::map_persistence_error)?;
        info!(
            %user_id,
            organization_id = %created.event.created_organization_id,
            "user signed up with a default organization"
        );
        Ok(user_id)
    }

    async fn signup_with_invitations(
        &self,
        unknown_user: UnknownUser,
        command: &LoginOrSignupCommand,
        ctx: &C,
    ) -> Result<UserId, LoginOrSignupError> {
        let email = unknown_user.email().clone();
        let EntityWithEvent { entity, event } =
            create_user_with_invited_organization(email, unknown_user.into_invited_organizations());
        let created = EntityWithEvent::new(
            entity.with_display_name(command.display_name.clone()),
            event,
        );
        let user_id = self
            .persist_user_with_invited_organizations
            .persist(&created, ctx)
            .await
            .map_err(Self::map_persistence_error)?;
        info!(
            %user_id,
            organizations = created.event.invited_organization_ids.len(),
            "user signed up through pending invitations"
        );
        Ok(user_id)
    }
}

#[async_trait]
impl<C> LoginOrSignup<C> for LoginOrSignupService<C>
where
    C: Send + Sync + 'static,
{
    async fn login_or_signup(
        &self,
        command: LoginOrSignupCommand,
        ctx: &C,
    ) -> Result<UserId, LoginOrSignupError> {
        if let Some(user) = self
            .find_user_by_email
            .find(&command.email, ctx)
            .await
            .map_err(Self::map_persistence_error)?
        {
            info!(user_id = %user.id(), "existing user signed in");
            return Ok(*user.id());
        }

        let unknown_user = self
            .find_unknown_user_by_email
            .find(&command.email, ctx)
            .await
            .map_err(Self::map_persistence_error)?;

        match unknown_user {
            Some(unknown_user) => {
                self.signup_with_invitations(unknown_user, &command, ctx)
                    .await
            }
            None => {
                self.signup_with_default_organization(command.email.clone(), &command, ctx)
                    .await
            }
        }
    }
}

#[cfg(test)]
#[path = "login_or_signup_service_tests.rs"]
mod tests;
