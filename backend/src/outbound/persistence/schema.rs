//! Diesel table definitions for the account schema.
//!
//! These definitions must match `migrations/` exactly. Every table is
//! append-only: the newest row per key (by `created_at`, then `id`) is the
//! current fact, and `*_delete`, `*_dismiss` and `*_cancel` tables hold
//! removal markers.

diesel::table! {
    /// Role lookup seeded with `admin`, `member` and `guest`.
    roles (name) {
        name -> Text,
        /// Whether holders may manage the organization (invite members).
        manage_organization -> Bool,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// User identities.
    users (id) {
        id -> Uuid,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Email registrations; the newest row per user is the current email.
    users_email_registration (id) {
        id -> Uuid,
        user_id -> Uuid,
        email -> Text,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Profile revisions; the newest row per user is current.
    users_profile (id) {
        id -> Uuid,
        user_id -> Uuid,
        name -> Nullable<Text>,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Soft-deletion markers for users.
    users_delete (id) {
        id -> Uuid,
        user_id -> Uuid,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Organization identities.
    organizations (id) {
        id -> Uuid,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Organization profile revisions; the newest row is current.
    organizations_profile (id) {
        id -> Uuid,
        organization_id -> Uuid,
        name -> Text,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Soft-deletion markers for organizations.
    organizations_delete (id) {
        id -> Uuid,
        organization_id -> Uuid,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Memberships of users in organizations.
    belong (id) {
        id -> Uuid,
        user_id -> Uuid,
        organization_id -> Uuid,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Membership removal markers.
    belong_dismiss (id) {
        id -> Uuid,
        belong_id -> Uuid,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Role assignments; the newest row per membership is the current role.
    assign (id) {
        id -> Uuid,
        belong_id -> Uuid,
        role_name -> Text,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Invitations addressed to an email.
    organizations_invitation (id) {
        id -> Uuid,
        organization_id -> Uuid,
        role_name -> Text,
        invitee_user_email -> Text,
        inviter_user_id -> Uuid,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Invitation cancellation markers.
    organizations_invitation_cancel (id) {
        id -> Uuid,
        organizations_invitation_id -> Uuid,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Organization selections, newest wins.
    organizations_switch (id) {
        id -> Uuid,
        user_id -> Uuid,
        organization_id -> Uuid,
        created_at -> Timestamptz,
    }
}

diesel::joinable!(users_email_registration -> users (user_id));
diesel::joinable!(users_profile -> users (user_id));
diesel::joinable!(users_delete -> users (user_id));
diesel::joinable!(organizations_profile -> organizations (organization_id));
diesel::joinable!(organizations_delete -> organizations (organization_id));
diesel::joinable!(belong -> users (user_id));
diesel::joinable!(belong -> organizations (organization_id));
diesel::joinable!(belong_dismiss -> belong (belong_id));
diesel::joinable!(assign -> belong (belong_id));
diesel::joinable!(assign -> roles (role_name));
diesel::joinable!(organizations_invitation -> organizations (organization_id));
diesel::joinable!(organizations_invitation -> roles (role_name));
diesel::joinable!(organizations_invitation -> users (inviter_user_id));
diesel::joinable!(
    organizations_invitation_cancel -> organizations_invitation (organizations_invitation_id)
);
diesel::joinable!(organizations_switch -> users (user_id));
diesel::joinable!(organizations_switch -> organizations (organization_id));

diesel::allow_tables_to_appear_in_same_query!(
    roles,
    users,
    users_email_registration,
    users_profile,
    users_delete,
    organizations,
    organizations_profile,
    organizations_delete,
    belong,
    belong_dismiss,
    assign,
    organizations_invitation,
    organizations_invitation_cancel,
    organizations_switch,
);
