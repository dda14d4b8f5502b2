//! Organization invitation use case.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::domain::ports::{Find, InviteUser, InviteUserError, Persist, PersistenceError};
use crate::domain::{
    Email, InviteUserCommand, Organization, OrganizationId, OrganizationWithInvitation, User,
    UserId, invite_known_user, invite_unknown_user,
};

/// Service implementing [`InviteUser`] over repository ports.
///
/// The inviter, the invitee and the organization are fetched concurrently.
/// A registered invitee joins the organization immediately; an unregistered
/// email receives a pending invitation.
pub struct InviteUserService<C = ()>
where
    C: Send + Sync + 'static,
{
    find_user_by_id: Arc<dyn Find<UserId, User, C>>,
    find_user_by_email: Arc<dyn Find<Email, User, C>>,
    find_organization_by_id: Arc<dyn Find<OrganizationId, Organization, C>>,
    persist_organization_with_invitation: Arc<dyn Persist<OrganizationWithInvitation, C>>,
}

impl<C> Clone for InviteUserService<C>
where
    C: Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            find_user_by_id: Arc::clone(&self.find_user_by_id),
            find_user_by_email: Arc::clone(&self.find_user_by_email),
            find_organization_by_id: Arc::clone(&self.find_organization_by_id),
            persist_organization_with_invitation: Arc::clone(
                &self.persist_organization_with_invitation,
            ),
        }
    }
}

impl<C> InviteUserService<C>
where
    C: Send + Sync + 'static,
{
    /// Create a service over the given repositories.
    pub fn new(
        find_user_by_id: Arc<dyn Find<UserId, User, C>>,
        find_user_by_email: Arc<dyn Find<Email, User, C>>,
        find_organization_by_id: Arc<dyn Find<OrganizationId, Organization, C>>,
        persist_organization_with_invitation: Arc<dyn Persist<OrganizationWithInvitation, C>>,
    ) -> Self {
        Self {
            find_user_by_id,
            find_user_by_email,
            find_organization_by_id,
            persist_organization_with_invitation,
        }
    }

    fn map_fetch_error(error: PersistenceError) -> InviteUserError {
        InviteUserError::repository(error.to_string())
    }

    fn map_persist_error(error: PersistenceError) -> InviteUserError {
        if error.is_io() {
            return InviteUserError::repository(error.to_string());
        }
        warn!(%error, "invitation persist failed outside the i/o contract");
        InviteUserError::unknown(error.to_string())
    }
}

#[async_trait]
impl<C> InviteUser<C> for InviteUserService<C>
where
    C: Send + Sync + 'static,
{
    async fn invite_user(
        &self,
        command: InviteUserCommand,
        ctx: &C,
    ) -> Result<OrganizationId, InviteUserError> {
        let InviteUserCommand {
            organization_id,
            role,
            invitee_email,
            inviter_user_id,
        } = command;

        let (inviter, invitee, organization) = tokio::join!(
            self.find_user_by_id.find(&inviter_user_id, ctx),
            self.find_user_by_email.find(&invitee_email, ctx),
            self.find_organization_by_id.find(&organization_id, ctx),
        );
        let inviter = inviter.map_err(Self::map_fetch_error)?;
        let invitee = invitee.map_err(Self::map_fetch_error)?;
        let organization = organization.map_err(Self::map_fetch_error)?;

        let Some(inviter) = inviter else {
            warn!(%inviter_user_id, "inviter not found");
            return Err(InviteUserError::unknown(format!(
                "inviter {inviter_user_id} not found"
            )));
        };
        let Some(organization) = organization else {
            warn!(%organization_id, "organization not found");
            return Err(InviteUserError::unknown(format!(
                "organization {organization_id} not found"
            )));
        };

        let invited = match invitee {
            Some(invitee) => invite_known_user(organization, role, &invitee, &inviter)?,
            None => invite_unknown_user(organization, role, invitee_email, &inviter)?,
        };

        let organization_id = self
            .persist_organization_with_invitation
            .persist(&invited, ctx)
            .await
            .map_err(Self::map_persist_error)?;
        info!(
            %organization_id,
            inviter_user_id = %invited.event.inviter_user_id,
            role = %invited.event.invitee_role,
            "user invited to organization"
        );
        Ok(organization_id)
    }
}

#[cfg(test)]
#[path = "invite_user_service_tests.rs"]
mod tests;
