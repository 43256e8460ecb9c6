//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the migrations exactly; Diesel uses them for
//! compile-time query validation. Regenerate with `diesel print-schema` after
//! a migration changes the schema.

diesel::table! {
    /// Registered accounts.
    users (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Unique handle, 3 to 50 characters.
        username -> Varchar,
        /// Unique login email, stored lower-cased.
        email -> Varchar,
        /// Encoded credential digest.
        password_hash -> Varchar,
        /// Role tags granted to the account.
        roles -> Array<Text>,
        /// Record creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Pets and their full care state.
    pets (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Display name, 1 to 30 characters.
        name -> Varchar,
        /// Breed tag, immutable after creation.
        breed -> Varchar,
        /// Life stage tag derived from the action count.
        life_stage -> Varchar,
        /// Hunger level, 0 to 100.
        hunger -> Int2,
        /// Hygiene level, 0 to 100.
        hygiene -> Int2,
        /// Fun level, 0 to 100.
        fun -> Int2,
        /// Number of care actions applied over the pet's lifetime.
        action_count -> Int8,
        /// Whether the pet has passed away.
        dead -> Bool,
        /// When the pet passed away, if it has.
        death_at -> Nullable<Timestamptz>,
        /// Record creation timestamp.
        created_at -> Timestamptz,
        /// Owning account.
        owner_id -> Uuid,
        /// Optimistic concurrency revision, bumped on every update.
        revision -> Int8,
    }
}

diesel::joinable!(pets -> users (owner_id));

diesel::allow_tables_to_appear_in_same_query!(pets, users);
