//! The branching story engine.
//!
//! Tracks where the player is in the story, which choices are on offer,
//! and the flags and dialogue history their decisions leave behind. No
//! branching logic lives here: choosing and advancing are separate
//! transitions, and the caller decides which scene a choice leads to.

use crate::game::TextSpeed;
use crate::intent::{Effect, IntentError, NarrativeIntent};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Where the player currently is in a story.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoryPosition {
    pub story_id: String,
    pub chapter_id: u32,
    pub scene_id: String,
}

/// A choice offered to the player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Choice {
    pub id: String,
    pub text: String,
    /// Flag set when this choice is taken.
    pub consequence: Option<String>,
}

impl Choice {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            consequence: None,
        }
    }

    pub fn with_consequence(mut self, consequence: impl Into<String>) -> Self {
        self.consequence = Some(consequence.into());
        self
    }
}

/// A story flag value. Choices set booleans; callers may also record text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FlagValue {
    Bool(bool),
    Text(String),
}

/// One record in the dialogue history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DialogueEntry {
    pub choice_id: String,
    pub consequence: Option<String>,
    pub speaker: Option<String>,
    pub timestamp: DateTime<Utc>,
}

/// The narrative slice.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NarrativeState {
    pub current_story: Option<StoryPosition>,
    pub current_choices: Vec<Choice>,
    pub story_progress: u32,
    pub unlocked_stories: Vec<String>,
    pub completed_stories: Vec<String>,
    pub story_flags: HashMap<String, FlagValue>,
    pub dialogue_history: Vec<DialogueEntry>,
    pub current_speaker: Option<String>,
    pub text_display_speed: TextSpeed,
    pub auto_advance: bool,
}

impl Default for NarrativeState {
    fn default() -> Self {
        Self {
            current_story: None,
            current_choices: Vec::new(),
            story_progress: 0,
            unlocked_stories: vec!["tutorial".to_string()],
            completed_stories: Vec::new(),
            story_flags: HashMap::new(),
            dialogue_history: Vec::new(),
            current_speaker: None,
            text_display_speed: TextSpeed::Normal,
            auto_advance: false,
        }
    }
}

impl NarrativeState {
    pub fn flag(&self, name: &str) -> Option<&FlagValue> {
        self.story_flags.get(name)
    }

    pub fn is_unlocked(&self, story_id: &str) -> bool {
        self.unlocked_stories.iter().any(|s| s == story_id)
    }

    pub fn is_completed(&self, story_id: &str) -> bool {
        self.completed_stories.iter().any(|s| s == story_id)
    }

    /// Apply one narrative intent.
    pub fn apply(
        &mut self,
        intent: NarrativeIntent,
        now: DateTime<Utc>,
    ) -> Result<Vec<Effect>, IntentError> {
        match intent {
            NarrativeIntent::StartStory {
                story_id,
                chapter_id,
                scene_id,
            } => {
                self.current_story = Some(StoryPosition {
                    story_id: story_id.clone(),
                    chapter_id,
                    scene_id,
                });
                self.story_progress = 0;
                Ok(vec![Effect::StoryStarted { story_id }])
            }
            NarrativeIntent::MakeChoice {
                choice_id,
                consequence,
            } => {
                self.dialogue_history.push(DialogueEntry {
                    choice_id: choice_id.clone(),
                    consequence: consequence.clone(),
                    speaker: self.current_speaker.clone(),
                    timestamp: now,
                });
                if let Some(flag) = &consequence {
                    self.story_flags.insert(flag.clone(), FlagValue::Bool(true));
                }
                self.current_choices.clear();
                Ok(vec![Effect::ChoiceMade {
                    choice_id,
                    flag_set: consequence,
                }])
            }
            NarrativeIntent::AdvanceStory {
                next_scene_id,
                choices,
            } => {
                let position = self
                    .current_story
                    .as_mut()
                    .ok_or(IntentError::NoActiveStory)?;
                position.scene_id = next_scene_id.clone();
                self.story_progress += 1;
                self.current_choices = choices;
                Ok(vec![Effect::StoryAdvanced {
                    scene_id: next_scene_id,
                    progress: self.story_progress,
                }])
            }
            NarrativeIntent::UnlockStory { id } => {
                if self.is_unlocked(&id) {
                    return Ok(Vec::new());
                }
                self.unlocked_stories.push(id.clone());
                Ok(vec![Effect::StoryUnlocked { id }])
            }
            NarrativeIntent::CompleteStory { id } => {
                if self.is_completed(&id) {
                    return Ok(Vec::new());
                }
                self.completed_stories.push(id.clone());
                Ok(vec![Effect::StoryCompleted { id }])
            }
            NarrativeIntent::SetStoryFlag { flag, value } => {
                self.story_flags.insert(flag.clone(), value);
                Ok(vec![Effect::StoryFlagSet { flag }])
            }
            NarrativeIntent::SetCurrentChoices { choices } => {
                self.current_choices = choices;
                Ok(vec![Effect::ChoicesReplaced])
            }
            NarrativeIntent::SetCurrentSpeaker { speaker } => {
                self.current_speaker = speaker;
                Ok(vec![Effect::SpeakerChanged])
            }
            NarrativeIntent::ToggleAutoAdvance => {
                self.auto_advance = !self.auto_advance;
                Ok(vec![Effect::AutoAdvanceToggled {
                    enabled: self.auto_advance,
                }])
            }
            NarrativeIntent::ResetNarrative => {
                *self = NarrativeState::default();
                Ok(vec![Effect::NarrativeReset])
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn started() -> NarrativeState {
        let mut s = NarrativeState::default();
        s.apply(
            NarrativeIntent::StartStory {
                story_id: "tutorial".to_string(),
                chapter_id: 1,
                scene_id: "intro".to_string(),
            },
            Utc::now(),
        )
        .unwrap();
        s
    }

    #[test]
    fn choice_sets_flag_and_clears_offers() {
        let mut s = started();
        s.current_choices = vec![
            Choice::new("diplomatic", "Call for a council of advisors")
                .with_consequence("diplomatic_path"),
            Choice::new("military", "Inspect the royal guard").with_consequence("military_path"),
        ];

        s.apply(
            NarrativeIntent::MakeChoice {
                choice_id: "diplomatic".to_string(),
                consequence: Some("diplomatic_path".to_string()),
            },
            Utc::now(),
        )
        .unwrap();

        assert_eq!(s.flag("diplomatic_path"), Some(&FlagValue::Bool(true)));
        assert!(s.current_choices.is_empty());
        assert_eq!(s.dialogue_history.len(), 1);
        assert_eq!(s.dialogue_history[0].choice_id, "diplomatic");
    }

    #[test]
    fn advance_requires_active_story() {
        let mut s = NarrativeState::default();
        let err = s.apply(
            NarrativeIntent::AdvanceStory {
                next_scene_id: "council".to_string(),
                choices: vec![],
            },
            Utc::now(),
        );
        assert_eq!(err, Err(IntentError::NoActiveStory));
        assert_eq!(s.story_progress, 0);
    }

    #[test]
    fn advance_moves_scene_and_progress() {
        let mut s = started();
        s.apply(
            NarrativeIntent::AdvanceStory {
                next_scene_id: "council".to_string(),
                choices: vec![Choice::new("listen", "Hear the advisors out")],
            },
            Utc::now(),
        )
        .unwrap();
        let position = s.current_story.as_ref().unwrap();
        assert_eq!(position.scene_id, "council");
        assert_eq!(s.story_progress, 1);
        assert_eq!(s.current_choices.len(), 1);
    }

    #[test]
    fn unlock_and_complete_are_idempotent() {
        let mut s = NarrativeState::default();
        let now = Utc::now();
        // "tutorial" is unlocked from the start.
        let effects = s
            .apply(
                NarrativeIntent::UnlockStory {
                    id: "tutorial".to_string(),
                },
                now,
            )
            .unwrap();
        assert!(effects.is_empty());

        for _ in 0..2 {
            s.apply(
                NarrativeIntent::CompleteStory {
                    id: "tutorial".to_string(),
                },
                now,
            )
            .unwrap();
        }
        assert_eq!(
            s.completed_stories,
            vec!["tutorial".to_string()],
        );
    }

    #[test]
    fn dialogue_records_the_current_speaker() {
        let mut s = started();
        s.apply(
            NarrativeIntent::SetCurrentSpeaker {
                speaker: Some("Chancellor Mauro".to_string()),
            },
            Utc::now(),
        )
        .unwrap();
        s.apply(
            NarrativeIntent::MakeChoice {
                choice_id: "listen".to_string(),
                consequence: None,
            },
            Utc::now(),
        )
        .unwrap();
        assert_eq!(
            s.dialogue_history[0].speaker.as_deref(),
            Some("Chancellor Mauro")
        );
        // No consequence named, no flag written.
        assert!(s.story_flags.is_empty());
    }

    #[test]
    fn restart_resets_progress() {
        let mut s = started();
        s.apply(
            NarrativeIntent::AdvanceStory {
                next_scene_id: "council".to_string(),
                choices: vec![],
            },
            Utc::now(),
        )
        .unwrap();
        assert_eq!(s.story_progress, 1);

        s.apply(
            NarrativeIntent::StartStory {
                story_id: "coronation".to_string(),
                chapter_id: 2,
                scene_id: "opening".to_string(),
            },
            Utc::now(),
        )
        .unwrap();
        assert_eq!(s.story_progress, 0);
        assert_eq!(s.current_story.as_ref().unwrap().story_id, "coronation");
    }
}
