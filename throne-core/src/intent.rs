//! The typed intent surface and its effects.
//!
//! The presentation layer drives the game exclusively through [`Intent`]
//! values dispatched at the store. Each intent is owned by exactly one state
//! slice; the store routes it to that slice's transition function, which
//! either applies the change and reports it as [`Effect`]s or rejects it
//! with an [`IntentError`] leaving the whole store untouched.

use crate::character::{Companion, CompanionId, GiftKind};
use crate::combat::{BattleOutcome, BattleRewards, BattleSpeed, UnitId, UnitSpec};
use crate::game::{SettingsPatch, StatisticsPatch};
use crate::narrative::{Choice, FlagValue};
use crate::resource::{BuildingKind, ConsumptionPatch, IncomePatch, ResourceKind};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A request for a single state transition, tagged by its owning slice.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Intent {
    Resource(ResourceIntent),
    Character(CharacterIntent),
    Combat(CombatIntent),
    Narrative(NarrativeIntent),
    Game(GameIntent),
}

/// Intents owned by the resource ledger.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ResourceIntent {
    /// Add to a counter (saturating).
    AddResource { kind: ResourceKind, amount: u64 },

    /// Subtract from a counter, clamped at zero.
    SpendResource { kind: ResourceKind, amount: u64 },

    /// Set a counter outright.
    SetResource { kind: ResourceKind, amount: u64 },

    /// Upgrade a building, paying `cost` gold.
    UpgradeBuilding { building: BuildingKind, cost: u64 },

    /// Apply daily income/consumption if 24h have passed since the last tick.
    ProcessDailyReset,

    /// Merge new values into the daily income rates.
    UpdateDailyIncome { patch: IncomePatch },

    /// Merge new values into the daily consumption rates.
    UpdateDailyConsumption { patch: ConsumptionPatch },

    /// Restore the ledger to its starting state.
    ResetResources,
}

/// Intents owned by the companion roster.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum CharacterIntent {
    /// Recruit a companion. Recruiting an already-present id is a no-op.
    RecruitCompanion { companion: Companion },

    /// Remove a companion and their relationship/romance entries.
    DismissCompanion { id: CompanionId },

    /// Adjust a relationship score, clamped to [-100, 100].
    UpdateRelationship { id: CompanionId, delta: i32 },

    /// Adjust a romance level, clamped to [0, 100].
    UpdateRomance { id: CompanionId, delta: i32 },

    /// Consume one gift from stock and raise affection and romance.
    GiveGift {
        id: CompanionId,
        gift: GiftKind,
        affection_gain: i32,
    },

    /// Add gifts to stock.
    AddGift { gift: GiftKind, amount: u32 },

    /// Record a level-up (level and experience come from the caller).
    SetCompanionLevel {
        id: CompanionId,
        level: u32,
        experience: u64,
    },

    /// Change which companion the UI focuses on.
    SetCurrentCompanion { id: Option<CompanionId> },

    /// Restore the roster to its starting state.
    ResetRoster,
}

/// Intents owned by the combat engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum CombatIntent {
    /// Begin a battle from the idle phase.
    StartBattle {
        player_units: Vec<UnitSpec>,
        enemy_units: Vec<UnitSpec>,
        kind: String,
    },

    /// Resolve one unit's action against a target.
    PerformAction {
        unit_id: UnitId,
        action: String,
        target_id: UnitId,
        damage: u32,
        effects: Vec<String>,
    },

    /// Advance the turn pointer through the turn order.
    NextTurn,

    /// Conclude the battle with a result and rewards.
    EndBattle {
        outcome: BattleOutcome,
        rewards: BattleRewards,
    },

    /// Tear the finished battle down to the idle phase.
    ///
    /// Scheduled by the session layer after a fixed delay; statistics
    /// survive, rosters and log do not.
    ClearBattle,

    /// Flip automatic action driving on or off.
    ToggleAutoBattle,

    /// Change the battle playback speed.
    SetBattleSpeed { speed: BattleSpeed },

    /// Restore the combat slice, statistics included.
    ResetCombat,
}

/// Intents owned by the narrative engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum NarrativeIntent {
    /// Position the story at a chapter/scene and zero the progress counter.
    StartStory {
        story_id: String,
        chapter_id: u32,
        scene_id: String,
    },

    /// Record a choice, set its consequence flag, clear the offered choices.
    MakeChoice {
        choice_id: String,
        consequence: Option<String>,
    },

    /// Move the scene pointer forward and offer a new choice set.
    AdvanceStory {
        next_scene_id: String,
        choices: Vec<Choice>,
    },

    /// Mark a story as available. Idempotent.
    UnlockStory { id: String },

    /// Mark a story as finished. Idempotent.
    CompleteStory { id: String },

    /// Set an arbitrary story flag.
    SetStoryFlag { flag: String, value: FlagValue },

    /// Replace the offered choice set.
    SetCurrentChoices { choices: Vec<Choice> },

    /// Change the speaking character shown with dialogue.
    SetCurrentSpeaker { speaker: Option<String> },

    /// Toggle automatic dialogue advancement.
    ToggleAutoAdvance,

    /// Restore the narrative slice to its starting state.
    ResetNarrative,
}

/// Intents owned by the game session slice.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum GameIntent {
    /// Begin a fresh playthrough.
    StartNewGame { player_name: String },

    /// Change the active screen (route id from the navigation layer).
    SetScreen { screen: String },

    /// Change the coarse game phase.
    SetPhase { phase: crate::game::GamePhase },

    /// Rename the player.
    SetPlayerName { name: String },

    /// Move to the next chapter, resetting the scene pointer.
    AdvanceChapter,

    /// Move to the next scene within the chapter.
    AdvanceScene,

    /// Shallow-merge settings fields. Values are stored as given.
    UpdateSettings { patch: SettingsPatch },

    /// Record an achievement. Idempotent.
    GrantAchievement { id: String },

    /// Shallow-merge play statistics.
    UpdateStatistics { patch: StatisticsPatch },

    /// Restore defaults for everything except settings.
    ResetGame,
}

/// A state change that a transition applied.
///
/// Effects are the dispatch return value: the caller learns what actually
/// happened instead of re-deriving it from snapshots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Effect {
    // Resource ledger
    ResourceChanged {
        kind: ResourceKind,
        new_value: u64,
    },
    BuildingUpgraded {
        building: BuildingKind,
        new_level: u32,
        next_cost: u64,
    },
    DailyTickApplied,
    RatesUpdated,
    ResourcesReset,

    // Companion roster
    CompanionRecruited {
        id: CompanionId,
    },
    CompanionDismissed {
        id: CompanionId,
    },
    RelationshipChanged {
        id: CompanionId,
        new_value: i32,
    },
    RomanceChanged {
        id: CompanionId,
        new_value: i32,
    },
    GiftGiven {
        id: CompanionId,
        gift: GiftKind,
        remaining_stock: u32,
        new_affection: i64,
    },
    GiftStocked {
        gift: GiftKind,
        new_count: u32,
    },
    CompanionLeveled {
        id: CompanionId,
        new_level: u32,
    },
    CurrentCompanionChanged {
        id: Option<CompanionId>,
    },
    RosterReset,

    // Combat engine
    BattleStarted {
        kind: String,
        turn_order: Vec<UnitId>,
    },
    ActionPerformed {
        actor: UnitId,
        target: UnitId,
        damage: u32,
        target_health: u32,
        target_defeated: bool,
    },
    TurnAdvanced {
        current_turn: usize,
    },
    BattleEnded {
        outcome: BattleOutcome,
    },
    BattleCleared,
    AutoBattleToggled {
        enabled: bool,
    },
    BattleSpeedChanged {
        speed: BattleSpeed,
    },
    CombatReset,

    // Narrative engine
    StoryStarted {
        story_id: String,
    },
    ChoiceMade {
        choice_id: String,
        flag_set: Option<String>,
    },
    StoryAdvanced {
        scene_id: String,
        progress: u32,
    },
    StoryUnlocked {
        id: String,
    },
    StoryCompleted {
        id: String,
    },
    StoryFlagSet {
        flag: String,
    },
    ChoicesReplaced,
    SpeakerChanged,
    AutoAdvanceToggled {
        enabled: bool,
    },
    NarrativeReset,

    // Game session
    GameStarted {
        player_name: String,
    },
    ScreenChanged {
        screen: String,
    },
    PhaseChanged {
        phase: crate::game::GamePhase,
    },
    PlayerRenamed {
        name: String,
    },
    ChapterAdvanced {
        chapter: u32,
    },
    SceneAdvanced {
        scene: u32,
    },
    SettingsUpdated,
    AchievementGranted {
        id: String,
    },
    StatisticsUpdated,
    GameReset,
}

/// Why an intent was rejected.
///
/// A rejected intent never changes state: every transition validates before
/// it mutates.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IntentError {
    #[error("no companion with id '{0}' is recruited")]
    UnknownCompanion(CompanionId),

    #[error("no {0} left in the gift inventory")]
    GiftOutOfStock(GiftKind),

    #[error("{0} is already at its maximum level")]
    BuildingAtMaxLevel(BuildingKind),

    #[error("upgrade costs {required} gold but only {available} is available")]
    InsufficientGold { required: u64, available: u64 },

    #[error("a battle is already in progress")]
    BattleInProgress,

    #[error("no battle is in progress")]
    NoBattleInProgress,

    #[error("no unit with id '{0}' is on the field")]
    UnknownUnit(UnitId),

    #[error("no story is active")]
    NoActiveStory,
}
