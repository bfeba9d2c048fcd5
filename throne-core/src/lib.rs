//! Kingdom narrative strategy game engine.
//!
//! This crate provides:
//! - Five independent state slices: resources, companions, combat,
//!   narrative, and session state
//! - A typed intent surface routed through a single [`GameStore`]
//! - Effects describing every applied state change
//! - A [`GameSession`] wrapper that owns the store and the deferred
//!   post-battle cleanup timer
//!
//! # Quick Start
//!
//! ```
//! use throne_core::{GameStore, Intent, ResourceIntent, ResourceKind};
//! use chrono::Utc;
//!
//! let mut store = GameStore::new(Utc::now());
//!
//! let effects = store
//!     .dispatch(
//!         Intent::Resource(ResourceIntent::AddResource {
//!             kind: ResourceKind::Gold,
//!             amount: 250,
//!         }),
//!         Utc::now(),
//!     )
//!     .expect("gold grant is always valid");
//!
//! assert_eq!(store.resources().amount(ResourceKind::Gold), 1250);
//! assert_eq!(effects.len(), 1);
//! ```

pub mod character;
pub mod combat;
pub mod content;
pub mod game;
pub mod intent;
pub mod narrative;
pub mod resource;
pub mod session;
pub mod store;
pub mod testing;

// Primary public API
pub use character::{Companion, CompanionId, GiftKind, Rarity};
pub use combat::{BattleOutcome, BattlePhase, BattleRewards, BattleUnit, UnitId, UnitSpec};
pub use game::{GamePhase, Settings, SettingsPatch, TextSpeed};
pub use intent::{
    CharacterIntent, CombatIntent, Effect, GameIntent, Intent, IntentError, NarrativeIntent,
    ResourceIntent,
};
pub use narrative::{Choice, FlagValue, StoryPosition};
pub use resource::{BuildingKind, ResourceKind};
pub use session::{GameSession, SessionConfig, SessionError};
pub use store::GameStore;
pub use testing::TestHarness;

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn store_starts_with_seed_resources() {
        let store = GameStore::new(Utc::now());
        assert_eq!(store.resources().amount(ResourceKind::Gold), 1000);
        assert_eq!(store.resources().amount(ResourceKind::Soldiers), 100);
        assert_eq!(store.resources().amount(ResourceKind::Gems), 0);
    }

    #[test]
    fn rejected_intent_leaves_store_unchanged() {
        let now = Utc::now();
        let mut store = GameStore::new(now);
        let before = serde_json::to_value(&store).expect("store serializes");

        let err = store.dispatch(
            Intent::Combat(intent::CombatIntent::EndBattle {
                outcome: BattleOutcome::Victory,
                rewards: BattleRewards::default(),
            }),
            now,
        );

        assert!(matches!(err, Err(IntentError::NoBattleInProgress)));
        let after = serde_json::to_value(&store).expect("store serializes");
        assert_eq!(before, after);
    }
}
