//! Pet aggregate: clamped well-being stats, life stage, and death state.
//!
//! The aggregate holds the invariants the rest of the engine relies on:
//! stats never leave `[0, 100]`, and `dead`, `LifeStage::Passed`, and
//! `death_at` are always set (or unset) together.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::UserId;

/// Validation errors raised by the pet value-type constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PetValidationError {
    /// Name missing or blank once trimmed.
    EmptyName,
    /// Name longer than the allowed maximum.
    NameTooLong {
        /// Maximum accepted length.
        max: usize,
    },
    /// Breed tag not in the fixed catalogue.
    UnknownBreed,
}

impl fmt::Display for PetValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "pet name must not be empty"),
            Self::NameTooLong { max } => write!(f, "pet name must be at most {max} characters"),
            Self::UnknownBreed => write!(f, "breed is not in the catalogue"),
        }
    }
}

impl std::error::Error for PetValidationError {}

/// Stable pet identifier (UUID v4).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PetId(Uuid);

impl PetId {
    /// Generate a new random identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl From<Uuid> for PetId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl fmt::Display for PetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Maximum accepted pet name length.
pub const PET_NAME_MAX: usize = 30;

/// Display name given by the owner.
///
/// ## Invariants
/// - trimmed and non-empty;
/// - at most [`PET_NAME_MAX`] characters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PetName(String);

impl PetName {
    /// Validate a raw pet name.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, PetValidationError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(PetValidationError::EmptyName);
        }
        if trimmed.chars().count() > PET_NAME_MAX {
            return Err(PetValidationError::NameTooLong { max: PET_NAME_MAX });
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for PetName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for PetName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<PetName> for String {
    fn from(value: PetName) -> Self {
        value.0
    }
}

impl TryFrom<String> for PetName {
    type Error = PetValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Fixed breed catalogue, immutable after creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Breed {
    /// Spotted.
    Dalmatian,
    /// Food-motivated.
    Labrador,
    /// Also food-motivated.
    GoldenRetriever,
}

impl Breed {
    /// Stable string form used by persistence (matches the wire form).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Dalmatian => "DALMATIAN",
            Self::Labrador => "LABRADOR",
            Self::GoldenRetriever => "GOLDEN_RETRIEVER",
        }
    }
}

impl std::str::FromStr for Breed {
    type Err = PetValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "DALMATIAN" => Ok(Self::Dalmatian),
            "LABRADOR" => Ok(Self::Labrador),
            "GOLDEN_RETRIEVER" => Ok(Self::GoldenRetriever),
            _ => Err(PetValidationError::UnknownBreed),
        }
    }
}

/// Coarse age category derived purely from the cumulative action count.
///
/// `Passed` is terminal: it is only ever assigned by the death policy and is
/// never recomputed from the count afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LifeStage {
    /// 0 to 4 actions.
    Baby,
    /// 5 to 9 actions.
    Adult,
    /// 10 or more actions.
    Senior,
    /// Terminal; the pet has died.
    Passed,
}

impl LifeStage {
    /// Life-stage policy: map a cumulative action count to a stage.
    ///
    /// Only the living stages are reachable from here; callers must not
    /// invoke this for a dead pet.
    pub fn for_action_count(count: u32) -> Self {
        match count {
            0..=4 => Self::Baby,
            5..=9 => Self::Adult,
            _ => Self::Senior,
        }
    }

    /// Stable string form used by persistence (matches the wire form).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Baby => "BABY",
            Self::Adult => "ADULT",
            Self::Senior => "SENIOR",
            Self::Passed => "PASSED",
        }
    }
}

impl std::str::FromStr for LifeStage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "BABY" => Ok(Self::Baby),
            "ADULT" => Ok(Self::Adult),
            "SENIOR" => Ok(Self::Senior),
            "PASSED" => Ok(Self::Passed),
            other => Err(format!("unknown life stage: {other}")),
        }
    }
}

/// A well-being stat clamped to `[0, 100]`.
///
/// Deltas saturate at the bounds; no arithmetic on a stat can fail or
/// produce an out-of-range value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StatValue(u8);

/// Lower stat bound.
pub const STAT_MIN: u8 = 0;
/// Upper stat bound.
pub const STAT_MAX: u8 = 100;

impl StatValue {
    /// Construct a stat, clamping out-of-range input.
    pub fn new(value: u8) -> Self {
        Self(value.min(STAT_MAX))
    }

    /// Apply a signed delta, saturating at both bounds.
    #[must_use]
    pub fn apply(self, delta: i16) -> Self {
        let shifted = i16::from(self.0) + delta;
        Self(shifted.clamp(i16::from(STAT_MIN), i16::from(STAT_MAX)) as u8)
    }

    /// Raw value in `[0, 100]`.
    pub fn value(self) -> u8 {
        self.0
    }
}

impl fmt::Display for StatValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Integrity failures detected when rehydrating a pet from storage.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PetIntegrityError {
    /// `dead`, `life_stage == Passed`, and `death_at` disagree.
    #[error("death flags disagree: dead={dead}, stage={stage}, death_at set={has_death_at}")]
    InconsistentDeathState {
        /// Persisted `dead` flag.
        dead: bool,
        /// Persisted life stage tag.
        stage: &'static str,
        /// Whether a death timestamp was present.
        has_death_at: bool,
    },
}

/// Mutable numeric state of a pet, fields all clamped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stats {
    /// How hungry the pet is; 100 is starvation.
    pub hunger: StatValue,
    /// How clean the pet is; 0 is filthy.
    pub hygiene: StatValue,
    /// How entertained the pet is; 0 is miserable.
    pub fun: StatValue,
}

/// The pet aggregate.
///
/// ## Invariants
/// - every stat stays within `[0, 100]`;
/// - `dead == true` iff `life_stage == Passed` iff `death_at.is_some()`;
/// - `action_count` only ever grows, by exactly one per applied action;
/// - `owner`, `breed`, `created_at`, and `id` never change after creation.
#[derive(Debug, Clone, PartialEq)]
pub struct Pet {
    id: PetId,
    name: PetName,
    breed: Breed,
    life_stage: LifeStage,
    stats: Stats,
    action_count: u32,
    dead: bool,
    death_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    owner: UserId,
    revision: u32,
}

/// Spawn defaults for a newly created pet.
pub const SPAWN_HUNGER: u8 = 50;
/// Spawn hygiene.
pub const SPAWN_HYGIENE: u8 = 70;
/// Spawn fun.
pub const SPAWN_FUN: u8 = 60;

impl Pet {
    /// Create a newborn pet with the spawn stat defaults.
    pub fn new(
        id: PetId,
        name: PetName,
        breed: Breed,
        owner: UserId,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name,
            breed,
            life_stage: LifeStage::Baby,
            stats: Stats {
                hunger: StatValue::new(SPAWN_HUNGER),
                hygiene: StatValue::new(SPAWN_HYGIENE),
                fun: StatValue::new(SPAWN_FUN),
            },
            action_count: 0,
            dead: false,
            death_at: None,
            created_at,
            owner,
            revision: 0,
        }
    }

    /// Rehydrate a pet from persisted parts, checking the death invariant.
    #[expect(clippy::too_many_arguments, reason = "row rehydration seam")]
    pub fn from_parts(
        id: PetId,
        name: PetName,
        breed: Breed,
        life_stage: LifeStage,
        stats: Stats,
        action_count: u32,
        dead: bool,
        death_at: Option<DateTime<Utc>>,
        created_at: DateTime<Utc>,
        owner: UserId,
        revision: u32,
    ) -> Result<Self, PetIntegrityError> {
        let passed = life_stage == LifeStage::Passed;
        if dead != passed || dead != death_at.is_some() {
            return Err(PetIntegrityError::InconsistentDeathState {
                dead,
                stage: life_stage.as_str(),
                has_death_at: death_at.is_some(),
            });
        }
        Ok(Self {
            id,
            name,
            breed,
            life_stage,
            stats,
            action_count,
            dead,
            death_at,
            created_at,
            owner,
            revision,
        })
    }

    /// Stable identifier.
    pub fn id(&self) -> &PetId {
        &self.id
    }

    /// Owner-facing display name.
    pub fn name(&self) -> &PetName {
        &self.name
    }

    /// Fixed breed.
    pub fn breed(&self) -> Breed {
        self.breed
    }

    /// Current life stage.
    pub fn life_stage(&self) -> LifeStage {
        self.life_stage
    }

    /// Current stats.
    pub fn stats(&self) -> Stats {
        self.stats
    }

    /// Cumulative count of successfully applied actions.
    pub fn action_count(&self) -> u32 {
        self.action_count
    }

    /// Whether a death condition has fired.
    pub fn is_dead(&self) -> bool {
        self.dead
    }

    /// Alive and able to receive actions.
    pub fn is_alive(&self) -> bool {
        !self.dead && self.life_stage != LifeStage::Passed
    }

    /// Timestamp of death, set exactly once.
    pub fn death_at(&self) -> Option<DateTime<Utc>> {
        self.death_at
    }

    /// Creation timestamp.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Owning user.
    pub fn owner(&self) -> &UserId {
        &self.owner
    }

    /// Optimistic concurrency token, bumped by the repository on update.
    pub fn revision(&self) -> u32 {
        self.revision
    }

    /// Rename the pet. The only mutation allowed outside the action engine.
    pub fn rename(&mut self, name: PetName) {
        self.name = name;
    }

    pub(crate) fn set_stats(&mut self, stats: Stats) {
        self.stats = stats;
    }

    pub(crate) fn bump_action_count(&mut self) {
        self.action_count += 1;
    }

    pub(crate) fn set_life_stage(&mut self, stage: LifeStage) {
        self.life_stage = stage;
    }

    pub(crate) fn with_bumped_revision(mut self) -> Self {
        self.revision += 1;
        self
    }

    pub(crate) fn mark_dead(&mut self, at: DateTime<Utc>) {
        // Only the first trigger records the timestamp.
        if self.dead {
            return;
        }
        self.dead = true;
        self.life_stage = LifeStage::Passed;
        self.death_at = Some(at);
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    fn sample_pet() -> Pet {
        Pet::new(
            PetId::random(),
            PetName::new("Buddy").expect("valid name"),
            Breed::Labrador,
            UserId::random(),
            Utc::now(),
        )
    }

    #[test]
    fn newborn_pet_uses_spawn_defaults() {
        let pet = sample_pet();
        assert_eq!(pet.stats().hunger.value(), 50);
        assert_eq!(pet.stats().hygiene.value(), 70);
        assert_eq!(pet.stats().fun.value(), 60);
        assert_eq!(pet.life_stage(), LifeStage::Baby);
        assert_eq!(pet.action_count(), 0);
        assert!(pet.is_alive());
        assert!(pet.death_at().is_none());
        assert_eq!(pet.revision(), 0);
    }

    #[rstest]
    #[case(50, -70, 0)]
    #[case(50, 70, 100)]
    #[case(0, -1, 0)]
    #[case(100, 1, 100)]
    #[case(30, 15, 45)]
    fn stat_deltas_saturate(#[case] start: u8, #[case] delta: i16, #[case] expected: u8) {
        assert_eq!(StatValue::new(start).apply(delta).value(), expected);
    }

    #[test]
    fn stat_constructor_clamps() {
        assert_eq!(StatValue::new(250).value(), 100);
    }

    #[rstest]
    #[case(0, LifeStage::Baby)]
    #[case(4, LifeStage::Baby)]
    #[case(5, LifeStage::Adult)]
    #[case(9, LifeStage::Adult)]
    #[case(10, LifeStage::Senior)]
    #[case(40, LifeStage::Senior)]
    fn life_stage_follows_action_count(#[case] count: u32, #[case] expected: LifeStage) {
        assert_eq!(LifeStage::for_action_count(count), expected);
    }

    #[rstest]
    #[case("", PetValidationError::EmptyName)]
    #[case("   ", PetValidationError::EmptyName)]
    fn rejects_blank_names(#[case] raw: &str, #[case] expected: PetValidationError) {
        assert_eq!(PetName::new(raw).expect_err("must fail"), expected);
    }

    #[test]
    fn rejects_overlong_name() {
        let raw = "x".repeat(PET_NAME_MAX + 1);
        assert_eq!(
            PetName::new(raw).expect_err("must fail"),
            PetValidationError::NameTooLong { max: PET_NAME_MAX }
        );
    }

    #[rstest]
    #[case(Breed::Dalmatian, "DALMATIAN")]
    #[case(Breed::Labrador, "LABRADOR")]
    #[case(Breed::GoldenRetriever, "GOLDEN_RETRIEVER")]
    fn breed_tags_round_trip(#[case] breed: Breed, #[case] tag: &str) {
        assert_eq!(breed.as_str(), tag);
        assert_eq!(tag.parse::<Breed>().expect("parse breed"), breed);
    }

    #[test]
    fn rehydration_rejects_inconsistent_death_state() {
        let template = sample_pet();
        let err = Pet::from_parts(
            *template.id(),
            template.name().clone(),
            template.breed(),
            LifeStage::Passed,
            template.stats(),
            3,
            false,
            None,
            template.created_at(),
            *template.owner(),
            1,
        )
        .expect_err("passed stage without dead flag must fail");
        assert!(matches!(
            err,
            PetIntegrityError::InconsistentDeathState { .. }
        ));
    }

    #[test]
    fn rehydration_accepts_consistent_death_state() {
        let template = sample_pet();
        let now = Utc::now();
        let pet = Pet::from_parts(
            *template.id(),
            template.name().clone(),
            template.breed(),
            LifeStage::Passed,
            template.stats(),
            12,
            true,
            Some(now),
            template.created_at(),
            *template.owner(),
            4,
        )
        .expect("consistent parts");
        assert!(pet.is_dead());
        assert!(!pet.is_alive());
        assert_eq!(pet.death_at(), Some(now));
    }

    #[test]
    fn mark_dead_is_idempotent() {
        let mut pet = sample_pet();
        let first = Utc::now();
        pet.mark_dead(first);
        let recorded = pet.death_at();
        pet.mark_dead(Utc::now());
        assert_eq!(pet.death_at(), recorded);
        assert_eq!(pet.life_stage(), LifeStage::Passed);
    }
}
