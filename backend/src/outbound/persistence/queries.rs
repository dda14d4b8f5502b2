//! Raw SQL for current-state reads over the append-only tables.
//!
//! Latest means newest by `created_at`, ties broken by `id`; ids are UUIDv7
//! so `id` order is insertion order.

/// Keeps a `candidate` registration row only while it is the newest one of
/// a non-deleted user.
macro_rules! current_registration {
    () => {
        r#"NOT EXISTS (
            SELECT 1 FROM users_delete WHERE users_delete.user_id = candidate.user_id
        )
        AND NOT EXISTS (
            SELECT 1 FROM users_email_registration AS newer
            WHERE newer.user_id = candidate.user_id
                AND (newer.created_at, newer.id) > (candidate.created_at, candidate.id)
        )"#
    };
}

/// Current email of the users whose `candidate` row passes `$filter`.
macro_rules! registered_email_cte {
    ($filter:literal) => {
        concat!(
            r#"registered_email AS (
    SELECT candidate.user_id, candidate.email
    FROM users_email_registration AS candidate
    WHERE "#,
            $filter,
            r#"
        AND "#,
            current_registration!(),
            r#"
)"#
        )
    };
}

/// True while `invitee_user_email` is some live user's current email.
macro_rules! invitee_registered {
    () => {
        concat!(
            r#"EXISTS (
            SELECT 1 FROM users_email_registration AS candidate
            WHERE candidate.email = organizations_invitation.invitee_user_email
                AND "#,
            current_registration!(),
            r#"
        )"#
        )
    };
}

/// Latest role per membership listed in `active_belong`.
macro_rules! current_assign_cte {
    () => {
        r#"current_assign AS (
    SELECT DISTINCT ON (assign.belong_id)
        assign.belong_id,
        assign.role_name
    FROM assign
    INNER JOIN active_belong ON active_belong.id = assign.belong_id
    ORDER BY assign.belong_id, assign.created_at DESC, assign.id DESC
)"#
    };
}

macro_rules! user_profile_query {
    ($filter:literal) => {
        concat!(
            "WITH ",
            registered_email_cte!($filter),
            r#"
SELECT
    registered_email.user_id,
    registered_email.email,
    (
        SELECT users_profile.name
        FROM users_profile
        WHERE users_profile.user_id = registered_email.user_id
        ORDER BY users_profile.created_at DESC, users_profile.id DESC
        LIMIT 1
    ) AS name
FROM registered_email
INNER JOIN users ON users.id = registered_email.user_id
ORDER BY users.created_at DESC, users.id DESC
LIMIT 1"#
        )
    };
}

/// `$1`: email. Matches only a user's current email.
pub(crate) const USER_BY_EMAIL: &str = user_profile_query!("candidate.email = $1");

/// `$1`: user id.
pub(crate) const USER_BY_ID: &str = user_profile_query!("candidate.user_id = $1");

/// Latest non-dismissed membership per live organization of user `$1`.
macro_rules! active_memberships_cte {
    () => {
        r#"active_belong AS (
    SELECT DISTINCT ON (belong.organization_id)
        belong.id,
        belong.organization_id,
        belong.created_at
    FROM belong
    WHERE belong.user_id = $1
        AND NOT EXISTS (
            SELECT 1 FROM belong_dismiss WHERE belong_dismiss.belong_id = belong.id
        )
        AND NOT EXISTS (
            SELECT 1 FROM organizations_delete
            WHERE organizations_delete.organization_id = belong.organization_id
        )
        AND NOT EXISTS (
            SELECT 1 FROM users_delete WHERE users_delete.user_id = belong.user_id
        )
    ORDER BY belong.organization_id, belong.created_at DESC, belong.id DESC
)"#
    };
}

/// `$1`: user id. One row per organization, oldest membership first.
pub(crate) const MEMBERSHIPS_BY_USER: &str = concat!(
    "WITH ",
    active_memberships_cte!(),
    ",\n",
    current_assign_cte!(),
    r#"
SELECT
    active_belong.organization_id,
    current_assign.role_name,
    roles.manage_organization
FROM active_belong
INNER JOIN current_assign ON current_assign.belong_id = active_belong.id
INNER JOIN roles ON roles.name = current_assign.role_name
ORDER BY active_belong.created_at ASC, active_belong.id ASC"#
);

/// `$1`: user id. Like [`MEMBERSHIPS_BY_USER`] plus each organization's
/// latest profile name.
pub(crate) const BELONGING_ORGANIZATIONS_BY_USER: &str = concat!(
    "WITH ",
    active_memberships_cte!(),
    ",\n",
    current_assign_cte!(),
    r#"
SELECT
    active_belong.organization_id,
    (
        SELECT organizations_profile.name
        FROM organizations_profile
        WHERE organizations_profile.organization_id = active_belong.organization_id
        ORDER BY organizations_profile.created_at DESC, organizations_profile.id DESC
        LIMIT 1
    ) AS organization_name,
    current_assign.role_name,
    roles.manage_organization
FROM active_belong
INNER JOIN current_assign ON current_assign.belong_id = active_belong.id
INNER JOIN roles ON roles.name = current_assign.role_name
ORDER BY active_belong.created_at ASC, active_belong.id ASC"#
);

/// `$1`: user id. Always one row: the target of the user's newest switch
/// when they still belong to it, and their oldest active membership.
pub(crate) const LATEST_LOGGED_IN_ORGANIZATION: &str = concat!(
    "WITH ",
    active_memberships_cte!(),
    r#"
SELECT
    (
        SELECT last_switch.organization_id
        FROM (
            SELECT organizations_switch.organization_id
            FROM organizations_switch
            WHERE organizations_switch.user_id = $1
            ORDER BY organizations_switch.created_at DESC, organizations_switch.id DESC
            LIMIT 1
        ) AS last_switch
        WHERE EXISTS (
            SELECT 1 FROM active_belong
            WHERE active_belong.organization_id = last_switch.organization_id
        )
    ) AS last_switched_organization_id,
    (
        SELECT active_belong.organization_id
        FROM active_belong
        ORDER BY active_belong.created_at ASC, active_belong.id ASC
        LIMIT 1
    ) AS first_belonged_organization_id"#
);

/// `$1`: organization id. One row per user, oldest membership first.
pub(crate) const MEMBERS_BY_ORGANIZATION: &str = concat!(
    r#"WITH active_belong AS (
    SELECT DISTINCT ON (belong.user_id)
        belong.id,
        belong.user_id,
        belong.created_at
    FROM belong
    WHERE belong.organization_id = $1
        AND NOT EXISTS (
            SELECT 1 FROM belong_dismiss WHERE belong_dismiss.belong_id = belong.id
        )
        AND NOT EXISTS (
            SELECT 1 FROM users_delete WHERE users_delete.user_id = belong.user_id
        )
    ORDER BY belong.user_id, belong.created_at DESC, belong.id DESC
),
"#,
    current_assign_cte!(),
    r#"
SELECT
    active_belong.user_id,
    current_assign.role_name,
    (
        SELECT users_email_registration.email
        FROM users_email_registration
        WHERE users_email_registration.user_id = active_belong.user_id
        ORDER BY users_email_registration.created_at DESC, users_email_registration.id DESC
        LIMIT 1
    ) AS email,
    (
        SELECT users_profile.name
        FROM users_profile
        WHERE users_profile.user_id = active_belong.user_id
        ORDER BY users_profile.created_at DESC, users_profile.id DESC
        LIMIT 1
    ) AS name
FROM active_belong
INNER JOIN current_assign ON current_assign.belong_id = active_belong.id
ORDER BY active_belong.created_at ASC, active_belong.id ASC"#
);

/// `$1`: organization id. Pending invitations to unregistered emails, one
/// per email (latest wins), oldest first.
pub(crate) const PENDING_INVITATIONS_BY_ORGANIZATION: &str = concat!(
    r#"SELECT latest.organization_id, latest.invitee_user_email, latest.role_name
FROM (
    SELECT DISTINCT ON (organizations_invitation.invitee_user_email)
        organizations_invitation.id,
        organizations_invitation.organization_id,
        organizations_invitation.invitee_user_email,
        organizations_invitation.role_name,
        organizations_invitation.created_at
    FROM organizations_invitation
    WHERE organizations_invitation.organization_id = $1
        AND NOT EXISTS (
            SELECT 1 FROM organizations_invitation_cancel
            WHERE organizations_invitation_cancel.organizations_invitation_id
                = organizations_invitation.id
        )
        AND NOT "#,
    invitee_registered!(),
    r#"
    ORDER BY
        organizations_invitation.invitee_user_email,
        organizations_invitation.created_at DESC,
        organizations_invitation.id DESC
) AS latest
ORDER BY latest.created_at ASC, latest.id ASC"#
);

/// `$1`: email. Pending invitations addressed to an unregistered email, one
/// per live organization (latest wins), oldest first.
pub(crate) const INVITATIONS_BY_EMAIL: &str = concat!(
    r#"SELECT latest.organization_id, latest.invitee_user_email, latest.role_name
FROM (
    SELECT DISTINCT ON (organizations_invitation.organization_id)
        organizations_invitation.id,
        organizations_invitation.organization_id,
        organizations_invitation.invitee_user_email,
        organizations_invitation.role_name,
        organizations_invitation.created_at
    FROM organizations_invitation
    WHERE organizations_invitation.invitee_user_email = $1
        AND NOT EXISTS (
            SELECT 1 FROM organizations_invitation_cancel
            WHERE organizations_invitation_cancel.organizations_invitation_id
                = organizations_invitation.id
        )
        AND NOT EXISTS (
            SELECT 1 FROM organizations_delete
            WHERE organizations_delete.organization_id = organizations_invitation.organization_id
        )
        AND NOT "#,
    invitee_registered!(),
    r#"
    ORDER BY
        organizations_invitation.organization_id,
        organizations_invitation.created_at DESC,
        organizations_invitation.id DESC
) AS latest
ORDER BY latest.created_at ASC, latest.id ASC"#
);
