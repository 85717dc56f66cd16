//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the migrations under `backend/migrations`
//! exactly. Regenerate with `diesel print-schema` after schema changes.

diesel::table! {
    /// Accounts. Pets live in the `pets` JSON array.
    users (id) {
        id -> Uuid,
        first_name -> Varchar,
        last_name -> Varchar,
        /// Lower-cased; unique via `users_email_key`.
        email -> Varchar,
        password_hash -> Varchar,
        phone -> Varchar,
        address -> Varchar,
        is_admin -> Bool,
        pets -> Jsonb,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Bearer sessions keyed by the SHA-256 digest of the token.
    sessions (token_digest) {
        token_digest -> Varchar,
        user_id -> Uuid,
        expires_at -> Timestamptz,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Clinic appointments. `appointments_active_slot_key` keeps one
    /// non-cancelled row per (date, time).
    appointments (id) {
        id -> Uuid,
        user_id -> Uuid,
        pet -> Varchar,
        service -> Varchar,
        date -> Date,
        time -> Time,
        notes -> Varchar,
        status -> Varchar,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    service_bookings (id) {
        id -> Uuid,
        user_id -> Uuid,
        pet -> Varchar,
        service_type -> Varchar,
        date -> Date,
        time -> Time,
        address -> Varchar,
        notes -> Varchar,
        status -> Varchar,
        price_cents -> Int8,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    products (id) {
        id -> Uuid,
        name -> Varchar,
        price_cents -> Int8,
        image -> Varchar,
        category -> Varchar,
        description -> Varchar,
        rating -> Float8,
        reviews -> Int4,
        is_new -> Bool,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Orders. Line items and contact details are stored as JSON.
    orders (id) {
        id -> Uuid,
        user_id -> Uuid,
        items -> Jsonb,
        total_cents -> Int8,
        shipping_address -> Varchar,
        contact_info -> Jsonb,
        payment_method -> Varchar,
        delivery_notes -> Varchar,
        status -> Varchar,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::joinable!(sessions -> users (user_id));

diesel::allow_tables_to_appear_in_same_query!(
    users,
    sessions,
    appointments,
    service_bookings,
    products,
    orders,
);
