//! Direct row writes for states the command layer never produces.
//!
//! Deletion, dismissal, cancellation and email changes are marker or fact
//! rows appended by other parts of the system; tests write them with the
//! sync `postgres` client.

use postgres::{Client, NoTls};
use uuid::Uuid;

use super::format_postgres_error;

fn execute(
    url: &str,
    sql: &str,
    params: &[&(dyn postgres::types::ToSql + Sync)],
) -> Result<u64, String> {
    let mut client = Client::connect(url, NoTls).map_err(|err| format_postgres_error(&err))?;
    client
        .execute(sql, params)
        .map_err(|err| format_postgres_error(&err))
}

/// Mark a user as deleted.
pub fn soft_delete_user(url: &str, user_id: Uuid) -> Result<(), String> {
    execute(
        url,
        "INSERT INTO users_delete (id, user_id) VALUES ($1, $2)",
        &[&Uuid::now_v7(), &user_id],
    )
    .map(|_| ())
}

/// Mark an organization as deleted.
pub fn delete_organization(url: &str, organization_id: Uuid) -> Result<(), String> {
    execute(
        url,
        "INSERT INTO organizations_delete (id, organization_id) VALUES ($1, $2)",
        &[&Uuid::now_v7(), &organization_id],
    )
    .map(|_| ())
}

/// Dismiss every membership of `user_id` in `organization_id`.
pub fn dismiss_membership(url: &str, user_id: Uuid, organization_id: Uuid) -> Result<u64, String> {
    execute(
        url,
        "INSERT INTO belong_dismiss (id, belong_id) \
         SELECT gen_random_uuid(), id FROM belong WHERE user_id = $1 AND organization_id = $2",
        &[&user_id, &organization_id],
    )
}

/// Cancel every invitation addressed to `email`.
pub fn cancel_invitations_to(url: &str, email: &str) -> Result<u64, String> {
    execute(
        url,
        "INSERT INTO organizations_invitation_cancel (id, organizations_invitation_id) \
         SELECT gen_random_uuid(), id FROM organizations_invitation \
         WHERE invitee_user_email = $1",
        &[&email],
    )
}

/// Register a new current email for a user.
pub fn change_email(url: &str, user_id: Uuid, email: &str) -> Result<(), String> {
    execute(
        url,
        "INSERT INTO users_email_registration (id, user_id, email) VALUES ($1, $2, $3)",
        &[&Uuid::now_v7(), &user_id, &email],
    )
    .map(|_| ())
}

/// Append a profile row renaming an organization.
pub fn rename_organization(url: &str, organization_id: Uuid, name: &str) -> Result<(), String> {
    execute(
        url,
        "INSERT INTO organizations_profile (id, organization_id, name) VALUES ($1, $2, $3)",
        &[&Uuid::now_v7(), &organization_id, &name],
    )
    .map(|_| ())
}

/// Number of rows in `organizations`.
pub fn count_organizations(url: &str) -> Result<i64, String> {
    let mut client = Client::connect(url, NoTls).map_err(|err| format_postgres_error(&err))?;
    let row = client
        .query_one("SELECT COUNT(*) FROM organizations", &[])
        .map_err(|err| format_postgres_error(&err))?;
    Ok(row.get(0))
}

/// Drop the `users` table and everything referencing it.
pub fn drop_users_table(url: &str) -> Result<(), String> {
    let mut client = Client::connect(url, NoTls).map_err(|err| format_postgres_error(&err))?;
    client
        .batch_execute("DROP TABLE IF EXISTS users CASCADE;")
        .map_err(|err| format_postgres_error(&err))
}
