//! Row structs bridging Diesel and the domain aggregates.
//!
//! Rows are plain data; conversion into validated domain types happens in the
//! repository adapters so constraint violations surface as query errors
//! rather than panics.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{pets, users};

/// Row struct for reading from the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub roles: Vec<String>,
    pub created_at: DateTime<Utc>,
}

/// Insertable struct for creating new user records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub id: Uuid,
    pub username: &'a str,
    pub email: &'a str,
    pub password_hash: &'a str,
    pub roles: Vec<&'a str>,
    pub created_at: DateTime<Utc>,
}

/// Row struct for reading from the pets table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = pets)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct PetRow {
    pub id: Uuid,
    pub name: String,
    pub breed: String,
    pub life_stage: String,
    pub hunger: i16,
    pub hygiene: i16,
    pub fun: i16,
    pub action_count: i64,
    pub dead: bool,
    pub death_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub owner_id: Uuid,
    pub revision: i64,
}

/// Insertable struct for creating new pet records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = pets)]
pub(crate) struct NewPetRow<'a> {
    pub id: Uuid,
    pub name: &'a str,
    pub breed: &'a str,
    pub life_stage: &'a str,
    pub hunger: i16,
    pub hygiene: i16,
    pub fun: i16,
    pub action_count: i64,
    pub dead: bool,
    pub death_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub owner_id: Uuid,
    pub revision: i64,
}

/// Changeset applied by the revision-guarded pet update.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = pets)]
pub(crate) struct PetUpdate<'a> {
    pub name: &'a str,
    pub life_stage: &'a str,
    pub hunger: i16,
    pub hygiene: i16,
    pub fun: i16,
    pub action_count: i64,
    pub dead: bool,
    pub death_at: Option<DateTime<Utc>>,
    pub revision: i64,
}
