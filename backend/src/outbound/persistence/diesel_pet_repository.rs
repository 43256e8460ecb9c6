//! PostgreSQL-backed `PetRepository` implementation using Diesel ORM.
//!
//! Updates are guarded by the pet's revision column: the `UPDATE` carries a
//! `WHERE revision = <expected>` predicate, so a write that raced another
//! action matches zero rows and surfaces as a revision mismatch instead of
//! silently clobbering the newer state.

use std::str::FromStr;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::pagination::{Page, PageRequest, SortDirection, SortField};
use crate::domain::pet::{Breed, LifeStage, Pet, PetId, PetName, StatValue, Stats};
use crate::domain::ports::{PetPersistenceError, PetRepository};
use crate::domain::UserId;

use super::diesel_error_mapping::map_query_error;
use super::models::{NewPetRow, PetRow, PetUpdate};
use super::pool::{DbPool, PoolError};
use super::schema::pets;

/// Diesel-backed implementation of the pet repository port.
#[derive(Clone)]
pub struct DieselPetRepository {
    pool: DbPool,
}

impl DieselPetRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> PetPersistenceError {
    PetPersistenceError::connection(error.message())
}

fn map_diesel_error(error: diesel::result::Error) -> PetPersistenceError {
    map_query_error(
        error,
        PetPersistenceError::query,
        PetPersistenceError::connection,
    )
}

fn stat_from_column(value: i16, column: &str) -> Result<StatValue, PetPersistenceError> {
    u8::try_from(value)
        .ok()
        .filter(|v| *v <= 100)
        .map(StatValue::new)
        .ok_or_else(|| PetPersistenceError::query(format!("stored {column} out of range: {value}")))
}

/// Convert a database row into a validated domain pet.
fn row_to_pet(row: PetRow) -> Result<Pet, PetPersistenceError> {
    let PetRow {
        id,
        name,
        breed,
        life_stage,
        hunger,
        hygiene,
        fun,
        action_count,
        dead,
        death_at,
        created_at,
        owner_id,
        revision,
    } = row;

    let name = PetName::new(name)
        .map_err(|err| PetPersistenceError::query(format!("stored name invalid: {err}")))?;
    let breed = Breed::from_str(&breed)
        .map_err(|err| PetPersistenceError::query(format!("stored breed invalid: {err}")))?;
    let life_stage = LifeStage::from_str(&life_stage)
        .map_err(|err| PetPersistenceError::query(format!("stored life stage invalid: {err}")))?;
    let stats = Stats {
        hunger: stat_from_column(hunger, "hunger")?,
        hygiene: stat_from_column(hygiene, "hygiene")?,
        fun: stat_from_column(fun, "fun")?,
    };
    let action_count = u32::try_from(action_count).map_err(|_| {
        PetPersistenceError::query(format!("stored action count invalid: {action_count}"))
    })?;
    let revision = u32::try_from(revision)
        .map_err(|_| PetPersistenceError::query(format!("stored revision invalid: {revision}")))?;

    Pet::from_parts(
        PetId::from(id),
        name,
        breed,
        life_stage,
        stats,
        action_count,
        dead,
        death_at,
        created_at,
        UserId::from(owner_id),
        revision,
    )
    .map_err(|err| PetPersistenceError::query(err.to_string()))
}

fn pet_to_new_row(pet: &Pet) -> NewPetRow<'_> {
    let stats = pet.stats();
    NewPetRow {
        id: *pet.id().as_uuid(),
        name: pet.name().as_ref(),
        breed: pet.breed().as_str(),
        life_stage: pet.life_stage().as_str(),
        hunger: i16::from(stats.hunger.value()),
        hygiene: i16::from(stats.hygiene.value()),
        fun: i16::from(stats.fun.value()),
        action_count: i64::from(pet.action_count()),
        dead: pet.is_dead(),
        death_at: pet.death_at(),
        created_at: pet.created_at(),
        owner_id: *pet.owner().as_uuid(),
        revision: i64::from(pet.revision()),
    }
}

/// Changeset for the guarded update, carrying the bumped revision.
fn pet_to_update(pet: &Pet) -> PetUpdate<'_> {
    let stats = pet.stats();
    PetUpdate {
        name: pet.name().as_ref(),
        life_stage: pet.life_stage().as_str(),
        hunger: i16::from(stats.hunger.value()),
        hygiene: i16::from(stats.hygiene.value()),
        fun: i16::from(stats.fun.value()),
        action_count: i64::from(pet.action_count()),
        dead: pet.is_dead(),
        death_at: pet.death_at(),
        revision: i64::from(pet.revision()) + 1,
    }
}

#[async_trait]
impl PetRepository for DieselPetRepository {
    async fn insert(&self, pet: &Pet) -> Result<(), PetPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(pets::table)
            .values(pet_to_new_row(pet))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(())
    }

    async fn find_by_id(&self, id: &PetId) -> Result<Option<Pet>, PetPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<PetRow> = pets::table
            .find(id.as_uuid())
            .select(PetRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_pet).transpose()
    }

    async fn update(&self, pet: &Pet) -> Result<Pet, PetPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let expected = i64::from(pet.revision());
        let stored: Option<PetRow> = diesel::update(
            pets::table
                .find(pet.id().as_uuid())
                .filter(pets::revision.eq(expected)),
        )
        .set(pet_to_update(pet))
        .returning(PetRow::as_returning())
        .get_result(&mut conn)
        .await
        .optional()
        .map_err(map_diesel_error)?;

        match stored {
            Some(row) => row_to_pet(row),
            // Zero rows matched: either the pet vanished or its revision
            // moved on. Both are losses of the optimistic race.
            None => Err(PetPersistenceError::revision_mismatch(pet.revision())),
        }
    }

    async fn delete(&self, id: &PetId) -> Result<bool, PetPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let removed = diesel::delete(pets::table.find(id.as_uuid()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(removed > 0)
    }

    async fn list_by_owner(&self, owner: &UserId) -> Result<Vec<Pet>, PetPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<PetRow> = pets::table
            .filter(pets::owner_id.eq(owner.as_uuid()))
            .order(pets::created_at.desc())
            .select(PetRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter().map(row_to_pet).collect()
    }

    async fn list_all(&self) -> Result<Vec<Pet>, PetPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<PetRow> = pets::table
            .order(pets::created_at.desc())
            .select(PetRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter().map(row_to_pet).collect()
    }

    async fn list_page(
        &self,
        owner: Option<&UserId>,
        page: &PageRequest,
    ) -> Result<Page<Pet>, PetPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let mut count_query = pets::table.count().into_boxed();
        if let Some(owner) = owner {
            count_query = count_query.filter(pets::owner_id.eq(*owner.as_uuid()));
        }
        let total: i64 = count_query
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        let mut query = pets::table.select(PetRow::as_select()).into_boxed();
        if let Some(owner) = owner {
            query = query.filter(pets::owner_id.eq(*owner.as_uuid()));
        }
        query = match (page.sort(), page.direction()) {
            (SortField::CreatedAt, SortDirection::Asc) => query.order(pets::created_at.asc()),
            (SortField::CreatedAt, SortDirection::Desc) => query.order(pets::created_at.desc()),
            (SortField::Name, SortDirection::Asc) => query.order(pets::name.asc()),
            (SortField::Name, SortDirection::Desc) => query.order(pets::name.desc()),
        };
        let offset = i64::try_from(page.offset()).unwrap_or(i64::MAX);
        let rows: Vec<PetRow> = query
            .offset(offset)
            .limit(i64::from(page.size()))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        let items = rows
            .into_iter()
            .map(row_to_pet)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Page {
            items,
            page: page.page(),
            size: page.size(),
            total: u64::try_from(total).unwrap_or_default(),
        })
    }

    async fn delete_by_owner(&self, owner: &UserId) -> Result<u64, PetPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let removed = diesel::delete(pets::table.filter(pets::owner_id.eq(owner.as_uuid())))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(u64::try_from(removed).unwrap_or_default())
    }
}
