//! The root state store.
//!
//! Owns the five slices and routes each dispatched intent to the one slice
//! that owns it. No game logic lives here, and no slice reads another
//! slice's state during a transition.

use crate::character::CharacterState;
use crate::combat::CombatState;
use crate::game::GameState;
use crate::intent::{Effect, Intent, IntentError};
use crate::narrative::NarrativeState;
use crate::resource::ResourceState;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// The composed game state. One per session; nothing global.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameStore {
    game: GameState,
    narrative: NarrativeState,
    character: CharacterState,
    resource: ResourceState,
    combat: CombatState,
}

impl GameStore {
    /// Build a fresh store. `now` seeds the resource ledger's daily-reset
    /// stamp.
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            game: GameState::default(),
            narrative: NarrativeState::default(),
            character: CharacterState::default(),
            resource: ResourceState::new(now),
            combat: CombatState::default(),
        }
    }

    /// Route an intent to its owning slice.
    ///
    /// Exactly one slice transition runs; it either applies the change and
    /// reports the effects or rejects, in which case the entire store is
    /// left as it was.
    pub fn dispatch(
        &mut self,
        intent: Intent,
        now: DateTime<Utc>,
    ) -> Result<Vec<Effect>, IntentError> {
        debug!(?intent, "dispatching intent");
        match intent {
            Intent::Resource(intent) => self.resource.apply(intent, now),
            Intent::Character(intent) => self.character.apply(intent, now),
            Intent::Combat(intent) => self.combat.apply(intent, now),
            Intent::Narrative(intent) => self.narrative.apply(intent, now),
            Intent::Game(intent) => self.game.apply(intent),
        }
    }

    // Read surface: one snapshot accessor per slice.

    pub fn game(&self) -> &GameState {
        &self.game
    }

    pub fn narrative(&self) -> &NarrativeState {
        &self.narrative
    }

    pub fn character(&self) -> &CharacterState {
        &self.character
    }

    pub fn resources(&self) -> &ResourceState {
        &self.resource
    }

    pub fn combat(&self) -> &CombatState {
        &self.combat
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intent::{GameIntent, NarrativeIntent, ResourceIntent};
    use crate::resource::ResourceKind;

    #[test]
    fn dispatch_routes_to_owning_slice() {
        let now = Utc::now();
        let mut store = GameStore::new(now);

        store
            .dispatch(
                Intent::Game(GameIntent::StartNewGame {
                    player_name: "Aurelia".to_string(),
                }),
                now,
            )
            .unwrap();
        store
            .dispatch(
                Intent::Resource(ResourceIntent::SpendResource {
                    kind: ResourceKind::Gold,
                    amount: 100,
                }),
                now,
            )
            .unwrap();
        store
            .dispatch(
                Intent::Narrative(NarrativeIntent::UnlockStory {
                    id: "coronation".to_string(),
                }),
                now,
            )
            .unwrap();

        assert_eq!(store.game().player_name, "Aurelia");
        assert_eq!(store.resources().gold, 900);
        assert!(store.narrative().is_unlocked("coronation"));
        // Untouched slices keep their defaults.
        assert!(store.character().companions.is_empty());
        assert!(store.combat().battle.is_none());
    }
}
