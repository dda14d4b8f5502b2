//! Multi-tenant account command layer.
//!
//! Users sign up or log in by email, receive a default organization or join
//! the organizations that invited them, and organization admins invite
//! others by email. Business rules live in [`domain`]; [`outbound`] holds
//! the PostgreSQL adapters behind the repository ports.

pub mod config;
pub mod domain;
pub mod outbound;
