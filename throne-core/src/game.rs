//! Coarse session state: active screen, game phase, chapter/scene pointer,
//! settings, achievements, and play statistics.

use crate::intent::{Effect, GameIntent, IntentError};
use serde::{Deserialize, Serialize};

/// Fallback name for a monarch who leaves the name field blank.
pub const DEFAULT_PLAYER_NAME: &str = "Your Majesty";

/// Coarse game phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GamePhase {
    Menu,
    Playing,
    Paused,
    GameOver,
}

impl Default for GamePhase {
    fn default() -> Self {
        GamePhase::Menu
    }
}

/// Dialogue text display speed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextSpeed {
    Slow,
    Normal,
    Fast,
}

impl Default for TextSpeed {
    fn default() -> Self {
        TextSpeed::Normal
    }
}

/// Player-facing settings. Survive a full game reset.
///
/// Volumes are stored exactly as given; this layer does not range-check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    pub music_volume: f32,
    pub sound_volume: f32,
    pub auto_advance: bool,
    pub text_speed: TextSpeed,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            music_volume: 0.7,
            sound_volume: 0.8,
            auto_advance: false,
            text_speed: TextSpeed::Normal,
        }
    }
}

/// Partial settings update; `None` fields are left alone.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SettingsPatch {
    pub music_volume: Option<f32>,
    pub sound_volume: Option<f32>,
    pub auto_advance: Option<bool>,
    pub text_speed: Option<TextSpeed>,
}

/// Lifetime play statistics.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlayStatistics {
    pub play_time_minutes: u64,
    pub choices_made: u64,
    pub characters_met: u64,
    pub battles_won: u64,
}

/// Partial statistics update; `None` fields are left alone.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StatisticsPatch {
    pub play_time_minutes: Option<u64>,
    pub choices_made: Option<u64>,
    pub characters_met: Option<u64>,
    pub battles_won: Option<u64>,
}

/// The game session slice.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Route id from the navigation layer.
    pub current_screen: String,
    pub phase: GamePhase,
    pub player_name: String,
    pub current_chapter: u32,
    pub current_scene: u32,
    pub game_started: bool,
    pub settings: Settings,
    pub achievements: Vec<String>,
    pub statistics: PlayStatistics,
}

impl Default for GameState {
    fn default() -> Self {
        Self {
            current_screen: "main-menu".to_string(),
            phase: GamePhase::Menu,
            player_name: String::new(),
            current_chapter: 1,
            current_scene: 0,
            game_started: false,
            settings: Settings::default(),
            achievements: Vec::new(),
            statistics: PlayStatistics::default(),
        }
    }
}

impl GameState {
    pub fn has_achievement(&self, id: &str) -> bool {
        self.achievements.iter().any(|a| a == id)
    }

    /// Apply one game-session intent.
    pub fn apply(&mut self, intent: GameIntent) -> Result<Vec<Effect>, IntentError> {
        match intent {
            GameIntent::StartNewGame { player_name } => {
                self.phase = GamePhase::Playing;
                self.game_started = true;
                self.current_chapter = 1;
                self.current_scene = 0;
                self.player_name = if player_name.trim().is_empty() {
                    DEFAULT_PLAYER_NAME.to_string()
                } else {
                    player_name
                };
                Ok(vec![Effect::GameStarted {
                    player_name: self.player_name.clone(),
                }])
            }
            GameIntent::SetScreen { screen } => {
                self.current_screen = screen.clone();
                Ok(vec![Effect::ScreenChanged { screen }])
            }
            GameIntent::SetPhase { phase } => {
                self.phase = phase;
                Ok(vec![Effect::PhaseChanged { phase }])
            }
            GameIntent::SetPlayerName { name } => {
                self.player_name = name.clone();
                Ok(vec![Effect::PlayerRenamed { name }])
            }
            GameIntent::AdvanceChapter => {
                self.current_chapter += 1;
                self.current_scene = 0;
                Ok(vec![Effect::ChapterAdvanced {
                    chapter: self.current_chapter,
                }])
            }
            GameIntent::AdvanceScene => {
                self.current_scene += 1;
                Ok(vec![Effect::SceneAdvanced {
                    scene: self.current_scene,
                }])
            }
            GameIntent::UpdateSettings { patch } => {
                if let Some(volume) = patch.music_volume {
                    self.settings.music_volume = volume;
                }
                if let Some(volume) = patch.sound_volume {
                    self.settings.sound_volume = volume;
                }
                if let Some(auto_advance) = patch.auto_advance {
                    self.settings.auto_advance = auto_advance;
                }
                if let Some(text_speed) = patch.text_speed {
                    self.settings.text_speed = text_speed;
                }
                Ok(vec![Effect::SettingsUpdated])
            }
            GameIntent::GrantAchievement { id } => {
                if self.has_achievement(&id) {
                    return Ok(Vec::new());
                }
                self.achievements.push(id.clone());
                Ok(vec![Effect::AchievementGranted { id }])
            }
            GameIntent::UpdateStatistics { patch } => {
                if let Some(minutes) = patch.play_time_minutes {
                    self.statistics.play_time_minutes = minutes;
                }
                if let Some(choices) = patch.choices_made {
                    self.statistics.choices_made = choices;
                }
                if let Some(met) = patch.characters_met {
                    self.statistics.characters_met = met;
                }
                if let Some(won) = patch.battles_won {
                    self.statistics.battles_won = won;
                }
                Ok(vec![Effect::StatisticsUpdated])
            }
            GameIntent::ResetGame => {
                // Settings ride through a full reset.
                let settings = self.settings.clone();
                *self = GameState {
                    settings,
                    ..GameState::default()
                };
                Ok(vec![Effect::GameReset])
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_name_defaults_to_royal_address() {
        let mut s = GameState::default();
        s.apply(GameIntent::StartNewGame {
            player_name: "   ".to_string(),
        })
        .unwrap();
        assert_eq!(s.player_name, DEFAULT_PLAYER_NAME);
        assert_eq!(s.phase, GamePhase::Playing);
        assert!(s.game_started);
    }

    #[test]
    fn reset_preserves_settings() {
        let mut s = GameState::default();
        s.apply(GameIntent::StartNewGame {
            player_name: "Aurelia".to_string(),
        })
        .unwrap();
        s.apply(GameIntent::UpdateSettings {
            patch: SettingsPatch {
                music_volume: Some(0.2),
                text_speed: Some(TextSpeed::Fast),
                ..SettingsPatch::default()
            },
        })
        .unwrap();
        s.apply(GameIntent::GrantAchievement {
            id: "first_decree".to_string(),
        })
        .unwrap();

        s.apply(GameIntent::ResetGame).unwrap();

        assert_eq!(s.settings.music_volume, 0.2);
        assert_eq!(s.settings.text_speed, TextSpeed::Fast);
        assert_eq!(s.player_name, "");
        assert!(!s.game_started);
        assert!(s.achievements.is_empty());
    }

    #[test]
    fn achievements_are_idempotent() {
        let mut s = GameState::default();
        for _ in 0..2 {
            s.apply(GameIntent::GrantAchievement {
                id: "first_decree".to_string(),
            })
            .unwrap();
        }
        assert_eq!(s.achievements.len(), 1);
    }

    #[test]
    fn out_of_range_volume_is_stored_as_given() {
        let mut s = GameState::default();
        s.apply(GameIntent::UpdateSettings {
            patch: SettingsPatch {
                music_volume: Some(1.4),
                ..SettingsPatch::default()
            },
        })
        .unwrap();
        assert_eq!(s.settings.music_volume, 1.4);
    }

    #[test]
    fn chapter_advance_resets_scene() {
        let mut s = GameState::default();
        s.apply(GameIntent::AdvanceScene).unwrap();
        s.apply(GameIntent::AdvanceScene).unwrap();
        assert_eq!(s.current_scene, 2);
        s.apply(GameIntent::AdvanceChapter).unwrap();
        assert_eq!(s.current_chapter, 2);
        assert_eq!(s.current_scene, 0);
    }
}
