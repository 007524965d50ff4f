//! Diesel table definitions mirroring `backend/migrations`.
//!
//! Keep in sync with the SQL migrations; Diesel checks queries against these
//! definitions at compile time.

diesel::table! {
    /// Registered users and their credentials.
    users (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Login name; unique (`users_username_key`).
        username -> Text,
        /// Contact address; unique (`users_email_key`).
        email -> Text,
        /// Full name as entered at registration.
        display_name -> Text,
        /// Public URL of the uploaded profile image.
        profile_image_url -> Nullable<Text>,
        /// Argon2 PHC string.
        password_hash -> Text,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}
