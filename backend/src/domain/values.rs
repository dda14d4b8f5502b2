//! Refined primitive values shared by entities, commands and adapters.
//!
//! Every value is constructed through a validating constructor so an
//! unchecked instance can never exist. Storage adapters reuse the same
//! constructors when reconstructing entities from rows.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Reason a raw value was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueErrorReason {
    /// The value does not follow the email address grammar.
    InvalidEmail,
    /// The value is shorter than the minimum length.
    TooShort { min: usize },
    /// The value is not a hyphenated UUID.
    InvalidUuid,
}

impl fmt::Display for ValueErrorReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidEmail => f.write_str("must be a valid email address"),
            Self::TooShort { min } => write!(f, "must be at least {min} characters"),
            Self::InvalidUuid => f.write_str("must be a valid UUID"),
        }
    }
}

/// Validation failure carrying the field name and the offending value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("failed to parse {field} `{value}`: {reason}")]
pub struct ValueError {
    /// Logical field the value was parsed for.
    pub field: &'static str,
    /// Raw value as supplied.
    pub value: String,
    /// Why the value was rejected.
    pub reason: ValueErrorReason,
}

impl ValueError {
    fn new(field: &'static str, value: impl Into<String>, reason: ValueErrorReason) -> Self {
        Self {
            field,
            value: value.into(),
            reason,
        }
    }
}

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        let pattern = r"(?i-u)^[\w+-]+(?:\.[\w+-]+)*@[\da-z]+(?:[.-][\da-z]+)*\.[a-z]{2,}$";
        Regex::new(pattern).unwrap_or_else(|error| panic!("email regex failed to compile: {error}"))
    })
}

/// Email address used as the natural key of a user and of an invitation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Email(String);

impl Email {
    /// Validate and construct an [`Email`].
    ///
    /// # Examples
    /// ```
    /// use accounts::domain::Email;
    ///
    /// assert!(Email::new("ada@example.com").is_ok());
    /// assert!(Email::new("not an email").is_err());
    /// ```
    pub fn new(email: impl Into<String>) -> Result<Self, ValueError> {
        let email = email.into();
        if !email_regex().is_match(&email) {
            return Err(ValueError::new("email", email, ValueErrorReason::InvalidEmail));
        }
        Ok(Self(email))
    }

    /// Borrow the address.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// Display name of a user or an organization.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DisplayName(String);

/// Minimum allowed length for a display name.
pub const DISPLAY_NAME_MIN: usize = 1;

impl DisplayName {
    /// Validate and construct a [`DisplayName`].
    pub fn new(display_name: impl Into<String>) -> Result<Self, ValueError> {
        let display_name = display_name.into();
        if display_name.chars().count() < DISPLAY_NAME_MIN {
            return Err(ValueError::new(
                "display name",
                display_name,
                ValueErrorReason::TooShort {
                    min: DISPLAY_NAME_MIN,
                },
            ));
        }
        Ok(Self(display_name))
    }

    /// Wrap a compile-time constant known to satisfy the length rule.
    pub(crate) fn from_static(display_name: &'static str) -> Self {
        debug_assert!(display_name.chars().count() >= DISPLAY_NAME_MIN);
        Self(display_name.to_owned())
    }

    /// Borrow the name.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

fn parse_hyphenated_uuid(field: &'static str, raw: &str) -> Result<Uuid, ValueError> {
    let invalid = || ValueError::new(field, raw, ValueErrorReason::InvalidUuid);
    let parsed = Uuid::try_parse(raw).map_err(|_| invalid())?;
    // `try_parse` also accepts simple, braced and URN forms.
    if !parsed.hyphenated().to_string().eq_ignore_ascii_case(raw) {
        return Err(invalid());
    }
    Ok(parsed)
}

macro_rules! define_uuid_id {
    ($(#[$meta:meta])* $name:ident, $field:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(Uuid);

        impl $name {
            /// Validate and construct the identifier from its hyphenated form.
            pub fn new(id: impl AsRef<str>) -> Result<Self, ValueError> {
                parse_hyphenated_uuid($field, id.as_ref()).map(Self)
            }

            /// Generate a fresh time-ordered identifier.
            pub fn generate() -> Self {
                Self(Uuid::now_v7())
            }

            /// Wrap a UUID read from a typed storage column.
            pub fn from_uuid(id: Uuid) -> Self {
                Self(id)
            }

            /// Access the underlying UUID.
            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(&self.0.hyphenated(), f)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.to_string()
            }
        }

        impl TryFrom<String> for $name {
            type Error = ValueError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }
    };
}

define_uuid_id!(
    /// Stable user identifier.
    UserId,
    "user id"
);

define_uuid_id!(
    /// Stable organization identifier.
    OrganizationId,
    "organization id"
);

/// Role held by a member of an organization.
///
/// The set is open: `admin`, `member` and `guest` are built in, any other
/// string is accepted as a custom role. What a role may do is resolved through
/// the role lookup table, never through the string itself.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Role(String);

const ROLE_AUTHORITIES: &[(&str, bool)] = &[
    (Role::ADMIN, true),
    (Role::MEMBER, false),
    (Role::GUEST, false),
];

impl Role {
    /// Organization administrator.
    pub const ADMIN: &'static str = "admin";
    /// Regular member.
    pub const MEMBER: &'static str = "member";
    /// Guest with restricted access.
    pub const GUEST: &'static str = "guest";

    /// Construct a role. Any string is structurally valid.
    pub fn new(role: impl Into<String>) -> Self {
        Self(role.into())
    }

    /// The built-in administrator role.
    pub fn admin() -> Self {
        Self::new(Self::ADMIN)
    }

    /// The built-in member role.
    pub fn member() -> Self {
        Self::new(Self::MEMBER)
    }

    /// The built-in guest role.
    pub fn guest() -> Self {
        Self::new(Self::GUEST)
    }

    /// Borrow the role name.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Look up the `manage organization` capability of a built-in role.
    ///
    /// Returns `None` for custom roles; their capability lives only in the
    /// stored role table.
    ///
    /// # Examples
    /// ```
    /// use accounts::domain::Role;
    ///
    /// assert_eq!(Role::admin().manages_organization(), Some(true));
    /// assert_eq!(Role::new("auditor").manages_organization(), None);
    /// ```
    pub fn manages_organization(&self) -> Option<bool> {
        ROLE_AUTHORITIES
            .iter()
            .find(|(name, _)| *name == self.as_str())
            .map(|(_, authority)| *authority)
    }
}

impl From<String> for Role {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for Role {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

macro_rules! impl_string_value {
    ($($name:ident),* $(,)?) => {
        $(
            impl AsRef<str> for $name {
                fn as_ref(&self) -> &str {
                    self.as_str()
                }
            }

            impl fmt::Display for $name {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(self.as_str())
                }
            }

            impl From<$name> for String {
                fn from(value: $name) -> Self {
                    value.0
                }
            }
        )*
    };
}

impl_string_value!(Email, DisplayName, Role);

impl TryFrom<String> for Email {
    type Error = ValueError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<String> for DisplayName {
    type Error = ValueError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}
