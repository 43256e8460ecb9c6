//! The action engine: one atomic transition per feed/wash/play request.
//!
//! [`apply_action`] is a pure function from a pet and an action to either a
//! new pet state plus advisories, or a rejection. Persistence and
//! authorisation live elsewhere; everything here is deterministic and
//! side-effect free, which is what makes the lifecycle rules testable in
//! isolation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::pet::{LifeStage, Pet, Stats};

/// One of the three state-mutating care actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum PetAction {
    /// Lower hunger at a small cost to hygiene and fun.
    Feed,
    /// Raise hygiene at a cost to fun and a little hunger.
    Wash,
    /// Raise fun at a cost of hunger.
    Play,
}

impl PetAction {
    /// Stable tag used in logs and route paths.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Feed => "feed",
            Self::Wash => "wash",
            Self::Play => "play",
        }
    }
}

/// Signed stat deltas applied by one action, before clamping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatDeltas {
    /// Delta applied to hunger.
    pub hunger: i16,
    /// Delta applied to hygiene.
    pub hygiene: i16,
    /// Delta applied to fun.
    pub fun: i16,
}

/// Effect tuning for the three actions.
///
/// The magnitudes are deliberately configuration, not hard-wired constants:
/// the product has cycled through several balance presets and will again.
/// [`ActionEffects::CANONICAL`] is the currently shipped tuning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionEffects {
    /// Deltas for [`PetAction::Feed`].
    pub feed: StatDeltas,
    /// Deltas for [`PetAction::Wash`].
    pub wash: StatDeltas,
    /// Deltas for [`PetAction::Play`].
    pub play: StatDeltas,
}

impl ActionEffects {
    /// The shipped balance preset. No passive per-action tick.
    pub const CANONICAL: Self = Self {
        feed: StatDeltas {
            hunger: -70,
            hygiene: -5,
            fun: -10,
        },
        wash: StatDeltas {
            hunger: 10,
            hygiene: 30,
            fun: -20,
        },
        play: StatDeltas {
            hunger: 15,
            hygiene: 0,
            fun: 40,
        },
    };

    /// Deltas for the given action.
    pub fn for_action(&self, action: PetAction) -> StatDeltas {
        match action {
            PetAction::Feed => self.feed,
            PetAction::Wash => self.wash,
            PetAction::Play => self.play,
        }
    }
}

impl Default for ActionEffects {
    fn default() -> Self {
        Self::CANONICAL
    }
}

/// Hunger at or above this value raises [`Warning::HungerHigh`].
pub const WARN_HUNGER_AT: u8 = 75;
/// Hygiene at or below this value raises [`Warning::HygieneLow`].
pub const WARN_HYGIENE_AT: u8 = 25;
/// Fun at or below this value raises [`Warning::FunLow`].
pub const WARN_FUN_AT: u8 = 25;

/// Non-fatal advisory tag returned alongside a successful action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Warning {
    /// Hunger is dangerously high.
    HungerHigh,
    /// Hygiene is dangerously low.
    HygieneLow,
    /// Fun is dangerously low.
    FunLow,
}

impl Warning {
    /// Wire tag for the advisory.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::HungerHigh => "hunger_high",
            Self::HygieneLow => "hygiene_low",
            Self::FunLow => "fun_low",
        }
    }
}

/// Notice attached to the response when an action kills the pet.
pub const DEATH_NOTICE: &str = "Your pet has passed away";

/// Why an action was rejected. Rejections never mutate the pet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ActionRejection {
    /// The pet is in the terminal state.
    #[error("pet is deceased")]
    PetDeceased,
    /// Feed requested at zero hunger.
    #[error("pet is not hungry")]
    PetNotHungry,
    /// Wash requested at full hygiene.
    #[error("pet is already clean")]
    PetAlreadyClean,
    /// Play requested at full fun.
    #[error("pet is too happy")]
    PetTooHappy,
}

impl ActionRejection {
    /// Stable machine tag carried in error details.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::PetDeceased => "pet_deceased",
            Self::PetNotHungry => "pet_not_hungry",
            Self::PetAlreadyClean => "pet_already_clean",
            Self::PetTooHappy => "pet_too_happy",
        }
    }
}

/// Result of a successfully applied action.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionOutcome {
    /// The pet's next state, not yet persisted.
    pub pet: Pet,
    /// Advisories; empty when the pet just died.
    pub warnings: Vec<Warning>,
    /// Whether this action was the one that killed the pet.
    pub died: bool,
}

impl ActionOutcome {
    /// Human-readable death notice, present only when the pet just died.
    pub fn death_notice(&self) -> Option<&'static str> {
        self.died.then_some(DEATH_NOTICE)
    }
}

/// Apply one care action to a pet.
///
/// The full transition runs in order: liveness precondition, resource
/// precondition, clamped effect deltas, action-count bookkeeping, life-stage
/// policy, death policy, warning computation. The input pet is untouched;
/// the caller persists the returned state atomically or not at all.
pub fn apply_action(
    pet: &Pet,
    action: PetAction,
    effects: &ActionEffects,
    now: DateTime<Utc>,
) -> Result<ActionOutcome, ActionRejection> {
    if !pet.is_alive() {
        return Err(ActionRejection::PetDeceased);
    }

    let stats = pet.stats();
    match action {
        PetAction::Feed if stats.hunger.value() == 0 => {
            return Err(ActionRejection::PetNotHungry);
        }
        PetAction::Wash if stats.hygiene.value() == 100 => {
            return Err(ActionRejection::PetAlreadyClean);
        }
        PetAction::Play if stats.fun.value() == 100 => {
            return Err(ActionRejection::PetTooHappy);
        }
        _ => {}
    }

    let deltas = effects.for_action(action);
    let mut next = pet.clone();
    next.set_stats(Stats {
        hunger: stats.hunger.apply(deltas.hunger),
        hygiene: stats.hygiene.apply(deltas.hygiene),
        fun: stats.fun.apply(deltas.fun),
    });
    next.bump_action_count();
    next.set_life_stage(LifeStage::for_action_count(next.action_count()));

    evaluate_death(&mut next, now);

    let warnings = if next.is_dead() {
        Vec::new()
    } else {
        collect_warnings(next.stats())
    };

    Ok(ActionOutcome {
        died: next.is_dead(),
        pet: next,
        warnings,
    })
}

/// Death policy: stat-threshold death, then senior attrition.
///
/// The two triggers do not stack; `mark_dead` records the timestamp once.
fn evaluate_death(pet: &mut Pet, now: DateTime<Utc>) {
    let stats = pet.stats();
    if stats.hunger.value() == 100 || (stats.hygiene.value() == 0 && stats.fun.value() == 0) {
        pet.mark_dead(now);
        return;
    }
    if pet.life_stage() == LifeStage::Senior && pet.action_count() >= 15 {
        pet.mark_dead(now);
    }
}

fn collect_warnings(stats: Stats) -> Vec<Warning> {
    let mut warnings = Vec::new();
    if stats.hunger.value() >= WARN_HUNGER_AT {
        warnings.push(Warning::HungerHigh);
    }
    if stats.hygiene.value() <= WARN_HYGIENE_AT {
        warnings.push(Warning::HygieneLow);
    }
    if stats.fun.value() <= WARN_FUN_AT {
        warnings.push(Warning::FunLow);
    }
    warnings
}

#[cfg(test)]
mod tests {
    //! Scenario coverage for the lifecycle rules.
    use super::*;
    use crate::domain::pet::{Breed, PetId, PetName, StatValue};
    use crate::domain::UserId;
    use rstest::rstest;

    fn pet_with(hunger: u8, hygiene: u8, fun: u8, action_count: u32) -> Pet {
        let mut pet = Pet::new(
            PetId::random(),
            PetName::new("Buddy").expect("valid name"),
            Breed::Dalmatian,
            UserId::random(),
            Utc::now(),
        );
        pet.set_stats(Stats {
            hunger: StatValue::new(hunger),
            hygiene: StatValue::new(hygiene),
            fun: StatValue::new(fun),
        });
        for _ in 0..action_count {
            pet.bump_action_count();
        }
        pet.set_life_stage(LifeStage::for_action_count(pet.action_count()));
        pet
    }

    fn apply(pet: &Pet, action: PetAction) -> Result<ActionOutcome, ActionRejection> {
        apply_action(pet, action, &ActionEffects::CANONICAL, Utc::now())
    }

    #[test]
    fn feed_applies_clamped_deltas_and_counts() {
        // hunger 45 - 70 clamps to 0; hygiene 70 - 5; fun 30 - 10.
        let pet = pet_with(45, 70, 30, 0);
        let outcome = apply(&pet, PetAction::Feed).expect("feed succeeds");
        let stats = outcome.pet.stats();
        assert_eq!(stats.hunger.value(), 0);
        assert_eq!(stats.hygiene.value(), 65);
        assert_eq!(stats.fun.value(), 20);
        assert_eq!(outcome.pet.action_count(), 1);
        assert!(!outcome.died);
    }

    #[rstest]
    #[case(PetAction::Feed, 0, 50, 50, ActionRejection::PetNotHungry)]
    #[case(PetAction::Wash, 50, 100, 50, ActionRejection::PetAlreadyClean)]
    #[case(PetAction::Play, 50, 50, 100, ActionRejection::PetTooHappy)]
    fn resource_preconditions_reject_without_mutation(
        #[case] action: PetAction,
        #[case] hunger: u8,
        #[case] hygiene: u8,
        #[case] fun: u8,
        #[case] expected: ActionRejection,
    ) {
        let pet = pet_with(hunger, hygiene, fun, 3);
        let err = apply(&pet, action).expect_err("precondition must reject");
        assert_eq!(err, expected);
    }

    #[test]
    fn rejection_is_idempotent() {
        let pet = pet_with(0, 50, 50, 2);
        for _ in 0..5 {
            let err = apply(&pet, PetAction::Feed).expect_err("always rejected");
            assert_eq!(err, ActionRejection::PetNotHungry);
        }
        // The input is untouched by design; the count never moved.
        assert_eq!(pet.action_count(), 2);
    }

    #[test]
    fn depleted_hygiene_and_fun_kill_on_any_action() {
        let pet = pet_with(50, 0, 0, 1);
        // Feed lowers hygiene and fun further; both stay at 0.
        let outcome = apply(&pet, PetAction::Feed).expect("feed applies");
        assert!(outcome.died);
        assert!(outcome.pet.is_dead());
        assert_eq!(outcome.pet.life_stage(), LifeStage::Passed);
        assert!(outcome.pet.death_at().is_some());
        assert!(outcome.warnings.is_empty());
        assert_eq!(outcome.death_notice(), Some(DEATH_NOTICE));
    }

    #[test]
    fn starvation_kills() {
        // 90 + 15 (play) clamps to 100 -> stat-threshold death.
        let pet = pet_with(90, 80, 10, 2);
        let outcome = apply(&pet, PetAction::Play).expect("play applies");
        assert!(outcome.died);
        assert_eq!(outcome.pet.stats().hunger.value(), 100);
    }

    #[test]
    fn tenth_action_promotes_to_senior() {
        let pet = pet_with(50, 70, 60, 9);
        assert_eq!(pet.life_stage(), LifeStage::Adult);
        let outcome = apply(&pet, PetAction::Wash).expect("wash succeeds");
        assert_eq!(outcome.pet.action_count(), 10);
        assert_eq!(outcome.pet.life_stage(), LifeStage::Senior);
        assert!(!outcome.died);
    }

    #[test]
    fn senior_attrition_kills_at_fifteen_actions() {
        // Healthy stats: death comes from attrition alone.
        let pet = pet_with(40, 80, 70, 14);
        assert_eq!(pet.life_stage(), LifeStage::Senior);
        let outcome = apply(&pet, PetAction::Wash).expect("wash applies");
        assert_eq!(outcome.pet.action_count(), 15);
        assert!(outcome.died);
        assert_eq!(outcome.pet.life_stage(), LifeStage::Passed);
    }

    #[test]
    fn actions_on_a_dead_pet_are_gone() {
        let pet = pet_with(50, 0, 0, 1);
        let dead = apply(&pet, PetAction::Wash).expect("lethal wash").pet;
        for action in [PetAction::Feed, PetAction::Wash, PetAction::Play] {
            let err = apply(&dead, action).expect_err("terminal state is sticky");
            assert_eq!(err, ActionRejection::PetDeceased);
        }
    }

    #[test]
    fn no_sequence_of_actions_revives_a_pet() {
        let pet = pet_with(50, 0, 0, 1);
        let dead = apply(&pet, PetAction::Play).expect("lethal play").pet;
        let death_at = dead.death_at();
        assert!(death_at.is_some());
        // Rejections carry no state; the pet we hold is still terminal.
        assert!(apply(&dead, PetAction::Feed).is_err());
        assert_eq!(dead.death_at(), death_at);
        assert_eq!(dead.life_stage(), LifeStage::Passed);
    }

    #[rstest]
    #[case(80, 60, 60, vec![Warning::HungerHigh])]
    #[case(30, 20, 60, vec![Warning::HygieneLow])]
    #[case(30, 60, 10, vec![Warning::FunLow])]
    #[case(80, 20, 10, vec![Warning::HungerHigh, Warning::HygieneLow, Warning::FunLow])]
    #[case(30, 60, 60, vec![])]
    fn warnings_follow_thresholds(
        #[case] hunger: u8,
        #[case] hygiene: u8,
        #[case] fun: u8,
        #[case] expected: Vec<Warning>,
    ) {
        let stats = Stats {
            hunger: StatValue::new(hunger),
            hygiene: StatValue::new(hygiene),
            fun: StatValue::new(fun),
        };
        assert_eq!(collect_warnings(stats), expected);
    }

    #[test]
    fn warnings_reflect_post_action_stats() {
        // 60 + 15 hunger = 75, right on the threshold; fun 60 + 40 = 100.
        let pet = pet_with(60, 80, 60, 1);
        let outcome = apply(&pet, PetAction::Play).expect("play succeeds");
        assert_eq!(outcome.warnings, vec![Warning::HungerHigh]);
        assert!(outcome.death_notice().is_none());
    }

    #[test]
    fn stats_stay_in_range_across_long_action_runs() {
        use rand::prelude::*;
        let mut rng = rand::rngs::SmallRng::seed_from_u64(7);
        let mut pet = pet_with(50, 70, 60, 0);
        for _ in 0..200 {
            let action = match rng.gen_range(0..3) {
                0 => PetAction::Feed,
                1 => PetAction::Wash,
                _ => PetAction::Play,
            };
            match apply(&pet, action) {
                Ok(outcome) => pet = outcome.pet,
                Err(ActionRejection::PetDeceased) => break,
                Err(_) => continue,
            }
            let stats = pet.stats();
            for value in [stats.hunger, stats.hygiene, stats.fun] {
                assert!(value.value() <= 100);
            }
            assert_eq!(pet.is_dead(), pet.life_stage() == LifeStage::Passed);
            assert_eq!(pet.is_dead(), pet.death_at().is_some());
        }
    }
}
