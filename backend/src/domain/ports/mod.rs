//! Domain ports for the hexagonal boundary.
//!
//! Driven ports (`Find`, `Persist`) are implemented by storage adapters;
//! driving ports (`LoginOrSignup`, `InviteUser`) are implemented by the
//! domain services and called by inbound adapters. The read-side ports
//! (`HomeQuery`, `LatestLoggedInOrganizationQuery`) are served straight by
//! storage adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod home_query;
mod invite_user;
mod latest_logged_in_organization_query;
mod login_or_signup;
mod repository;

pub use home_query::{HomeQuery, HomeQueryError, HomeQueryRequest};
pub use invite_user::{InviteUser, InviteUserError};
pub use latest_logged_in_organization_query::{
    LatestLoggedInOrganizationQuery, LatestLoggedInOrganizationQueryError,
};
pub use login_or_signup::{LoginOrSignup, LoginOrSignupError};
pub use repository::{Find, Persist, PersistenceError};
