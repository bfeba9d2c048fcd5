//! Testing utilities.
//!
//! [`TestHarness`] drives a [`GameStore`] on a manual clock so scenarios
//! involving the daily tick are deterministic, and bundles the content
//! catalog into one-line setup steps.

use crate::content;
use crate::intent::{CharacterIntent, CombatIntent, Effect, Intent, IntentError};
use crate::store::GameStore;
use chrono::{DateTime, Duration, TimeZone, Utc};

/// Test harness for running game scenarios on a simulated clock.
pub struct TestHarness {
    /// The store under test.
    pub store: GameStore,
    /// The simulated wall-clock time stamped on every dispatch.
    pub now: DateTime<Utc>,
}

impl TestHarness {
    /// Create a harness with a fresh store at a fixed point in time.
    pub fn new() -> Self {
        let now = Utc
            .with_ymd_and_hms(2024, 1, 1, 9, 0, 0)
            .single()
            .expect("fixed start time is valid");
        Self {
            store: GameStore::new(now),
            now,
        }
    }

    /// Move the simulated clock forward.
    pub fn advance(&mut self, duration: Duration) -> &mut Self {
        self.now = self.now + duration;
        self
    }

    /// Dispatch an intent at the simulated time.
    pub fn dispatch(&mut self, intent: Intent) -> Result<Vec<Effect>, IntentError> {
        self.store.dispatch(intent, self.now)
    }

    /// Dispatch an intent that the scenario requires to succeed.
    #[track_caller]
    pub fn expect_dispatch(&mut self, intent: Intent) -> Vec<Effect> {
        self.store
            .dispatch(intent.clone(), self.now)
            .unwrap_or_else(|e| panic!("intent {intent:?} was rejected: {e}"))
    }

    /// Recruit a companion from the content catalog by id.
    #[track_caller]
    pub fn recruit(&mut self, id: &str) -> &mut Self {
        let companion = content::recruitable(id)
            .unwrap_or_else(|| panic!("no recruitable companion '{id}'"))
            .clone();
        self.expect_dispatch(Intent::Character(CharacterIntent::RecruitCompanion {
            companion,
        }));
        self
    }

    /// Start the stock skirmish encounter.
    #[track_caller]
    pub fn start_skirmish(&mut self) -> &mut Self {
        self.expect_dispatch(Intent::Combat(CombatIntent::StartBattle {
            player_units: content::SKIRMISH_PLAYER_UNITS.clone(),
            enemy_units: content::SKIRMISH_ENEMY_UNITS.clone(),
            kind: "skirmish".to_string(),
        }));
        self
    }

    /// Current gold.
    pub fn gold(&self) -> u64 {
        self.store.resources().gold
    }

    /// Whether a battle is on the field.
    pub fn in_battle(&self) -> bool {
        self.store.combat().battle.is_some()
    }

    /// Number of recruited companions.
    pub fn companion_count(&self) -> usize {
        self.store.character().companions.len()
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Assertion Helpers
// ============================================================================

/// Assert the treasury holds exactly this much gold.
#[track_caller]
pub fn assert_gold(harness: &TestHarness, expected: u64) {
    let actual = harness.gold();
    assert_eq!(actual, expected, "Expected {expected} gold, got {actual}");
}

/// Assert a battle is on the field.
#[track_caller]
pub fn assert_in_battle(harness: &TestHarness) {
    assert!(harness.in_battle(), "Expected a battle to be in progress");
}

/// Assert no battle is on the field.
#[track_caller]
pub fn assert_not_in_battle(harness: &TestHarness) {
    assert!(
        !harness.in_battle(),
        "Expected no battle to be in progress"
    );
}
