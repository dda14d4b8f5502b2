//! Use-case commands parsed from raw caller input.
//!
//! Parsing validates every field and reports all failures at once.

use std::fmt;

use thiserror::Error;

use super::values::{DisplayName, Email, OrganizationId, Role, UserId, ValueError};

/// Every field that failed validation while parsing a command.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid command: {}", FieldList(.errors))]
pub struct CommandParseError {
    /// Individual failures in field order.
    pub errors: Vec<ValueError>,
}

struct FieldList<'a>(&'a [ValueError]);

impl fmt::Display for FieldList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, error) in self.0.iter().enumerate() {
            if index > 0 {
                f.write_str("; ")?;
            }
            fmt::Display::fmt(error, f)?;
        }
        Ok(())
    }
}

#[derive(Default)]
struct Collector {
    errors: Vec<ValueError>,
}

impl Collector {
    fn take<T>(&mut self, result: Result<T, ValueError>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(error) => {
                self.errors.push(error);
                None
            }
        }
    }
}

/// Request to sign in, creating the account on first use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginOrSignupCommand {
    /// Email identifying the account.
    pub email: Email,
    /// Display name recorded when a new account is created.
    pub display_name: Option<DisplayName>,
}

impl LoginOrSignupCommand {
    /// Parse raw input into a command.
    ///
    /// # Examples
    /// ```
    /// use accounts::domain::LoginOrSignupCommand;
    ///
    /// let command = LoginOrSignupCommand::parse("ada@example.com", Some("Ada")).expect("valid");
    /// assert_eq!(command.email.as_str(), "ada@example.com");
    ///
    /// let err = LoginOrSignupCommand::parse("nope", Some("")).expect_err("invalid");
    /// assert_eq!(err.errors.len(), 2);
    /// ```
    pub fn parse(email: &str, display_name: Option<&str>) -> Result<Self, CommandParseError> {
        let mut collector = Collector::default();
        let email = collector.take(Email::new(email));
        let display_name = display_name.and_then(|name| collector.take(DisplayName::new(name)));

        match email {
            Some(email) if collector.errors.is_empty() => Ok(Self {
                email,
                display_name,
            }),
            _ => Err(CommandParseError {
                errors: collector.errors,
            }),
        }
    }
}

/// Request to invite an email into an organization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InviteUserCommand {
    /// Target organization.
    pub organization_id: OrganizationId,
    /// Role offered to the invitee.
    pub role: Role,
    /// Email of the invitee.
    pub invitee_email: Email,
    /// Member issuing the invitation.
    pub inviter_user_id: UserId,
}

impl InviteUserCommand {
    /// Parse raw input into a command.
    pub fn parse(
        organization_id: &str,
        role: &str,
        invitee_email: &str,
        inviter_user_id: &str,
    ) -> Result<Self, CommandParseError> {
        let mut collector = Collector::default();
        let organization_id = collector.take(OrganizationId::new(organization_id));
        let invitee_email = collector.take(Email::new(invitee_email));
        let inviter_user_id = collector.take(UserId::new(inviter_user_id));

        match (organization_id, invitee_email, inviter_user_id) {
            (Some(organization_id), Some(invitee_email), Some(inviter_user_id)) => Ok(Self {
                organization_id,
                role: Role::new(role),
                invitee_email,
                inviter_user_id,
            }),
            _ => Err(CommandParseError {
                errors: collector.errors,
            }),
        }
    }
}
