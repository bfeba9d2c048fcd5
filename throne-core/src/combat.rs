//! Turn-based battle tracking.
//!
//! One battle at a time: two unit rosters, a speed-sorted turn order, an
//! append-only log, and aggregate statistics that outlive the battle.
//!
//! Phase machine: `Idle -> Preparing -> (Victory | Defeat) -> Idle`. The
//! teardown back to idle is its own transition ([`CombatIntent::ClearBattle`])
//! so the session layer can defer it.

use crate::intent::{CombatIntent, Effect, IntentError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for battles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BattleId(pub Uuid);

impl BattleId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for BattleId {
    fn default() -> Self {
        Self::new()
    }
}

/// Unique identifier for units on the field. Content-addressed
/// (e.g. "player_1", "enemy_2").
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UnitId(pub String);

impl UnitId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Where the combat slice is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BattlePhase {
    Idle,
    Preparing,
    Victory,
    Defeat,
}

impl Default for BattlePhase {
    fn default() -> Self {
        BattlePhase::Idle
    }
}

/// How a battle ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BattleOutcome {
    Victory,
    Defeat,
}

impl BattleOutcome {
    pub fn phase(&self) -> BattlePhase {
        match self {
            BattleOutcome::Victory => BattlePhase::Victory,
            BattleOutcome::Defeat => BattlePhase::Defeat,
        }
    }
}

/// A unit as the caller describes it when the battle starts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnitSpec {
    pub id: UnitId,
    pub name: String,
    pub max_health: u32,
    pub attack: u32,
    pub defense: u32,
    pub speed: u32,
}

impl UnitSpec {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: UnitId::new(id),
            name: name.into(),
            max_health: 1,
            attack: 0,
            defense: 0,
            speed: 0,
        }
    }

    pub fn with_health(mut self, max_health: u32) -> Self {
        self.max_health = max_health;
        self
    }

    pub fn with_attack(mut self, attack: u32) -> Self {
        self.attack = attack;
        self
    }

    pub fn with_defense(mut self, defense: u32) -> Self {
        self.defense = defense;
        self
    }

    pub fn with_speed(mut self, speed: u32) -> Self {
        self.speed = speed;
        self
    }
}

/// A unit on the field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BattleUnit {
    pub id: UnitId,
    pub name: String,
    pub max_health: u32,
    pub current_health: u32,
    pub attack: u32,
    pub defense: u32,
    pub speed: u32,
    /// Never flips back to true within the same battle.
    pub is_alive: bool,
    /// Accumulates for the duration of the battle; nothing expires them.
    pub status_effects: Vec<String>,
}

impl BattleUnit {
    fn from_spec(spec: UnitSpec) -> Self {
        Self {
            id: spec.id,
            name: spec.name,
            max_health: spec.max_health,
            current_health: spec.max_health,
            attack: spec.attack,
            defense: spec.defense,
            speed: spec.speed,
            is_alive: true,
            status_effects: Vec::new(),
        }
    }
}

/// One slot in the turn order, fixed at battle start.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurnEntry {
    pub unit_id: UnitId,
    pub name: String,
    pub speed: u32,
    pub is_player: bool,
}

/// The active battle's identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Battle {
    pub id: BattleId,
    /// Free-form battle kind, e.g. "skirmish".
    pub kind: String,
    pub started_at: DateTime<Utc>,
}

/// One resolved action in the battle log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BattleLogEntry {
    pub actor: UnitId,
    pub target: UnitId,
    pub action: String,
    pub damage: u32,
    pub effects: Vec<String>,
    pub timestamp: DateTime<Utc>,
}

/// What a finished battle pays out.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattleRewards {
    pub experience: u64,
    pub gold: u64,
    pub items: Vec<String>,
}

/// Aggregate battle statistics. Survive battle teardown.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BattleStatistics {
    pub battles_won: u32,
    pub battles_lost: u32,
    pub total_damage_dealt: u64,
    pub total_damage_taken: u64,
    pub units_lost: u32,
}

/// Battle playback speed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BattleSpeed {
    Slow,
    Normal,
    Fast,
}

impl Default for BattleSpeed {
    fn default() -> Self {
        BattleSpeed::Normal
    }
}

/// The combat slice.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CombatState {
    pub battle: Option<Battle>,
    pub phase: BattlePhase,
    pub player_units: Vec<BattleUnit>,
    pub enemy_units: Vec<BattleUnit>,
    pub turn_order: Vec<TurnEntry>,
    pub current_turn: usize,
    pub log: Vec<BattleLogEntry>,
    pub rewards: BattleRewards,
    pub statistics: BattleStatistics,
    pub auto_battle: bool,
    pub battle_speed: BattleSpeed,
}

impl CombatState {
    /// Look a unit up across both rosters.
    pub fn unit(&self, id: &UnitId) -> Option<&BattleUnit> {
        self.player_units
            .iter()
            .chain(self.enemy_units.iter())
            .find(|u| &u.id == id)
    }

    fn unit_mut(&mut self, id: &UnitId) -> Option<&mut BattleUnit> {
        self.player_units
            .iter_mut()
            .chain(self.enemy_units.iter_mut())
            .find(|u| &u.id == id)
    }

    fn is_player_unit(&self, id: &UnitId) -> bool {
        self.player_units.iter().any(|u| &u.id == id)
    }

    /// Apply one combat intent.
    pub fn apply(
        &mut self,
        intent: CombatIntent,
        now: DateTime<Utc>,
    ) -> Result<Vec<Effect>, IntentError> {
        match intent {
            CombatIntent::StartBattle {
                player_units,
                enemy_units,
                kind,
            } => self.start_battle(player_units, enemy_units, kind, now),
            CombatIntent::PerformAction {
                unit_id,
                action,
                target_id,
                damage,
                effects,
            } => self.perform_action(unit_id, action, target_id, damage, effects, now),
            CombatIntent::NextTurn => {
                if self.battle.is_none() || self.turn_order.is_empty() {
                    return Err(IntentError::NoBattleInProgress);
                }
                self.current_turn = (self.current_turn + 1) % self.turn_order.len();
                Ok(vec![Effect::TurnAdvanced {
                    current_turn: self.current_turn,
                }])
            }
            CombatIntent::EndBattle { outcome, rewards } => self.end_battle(outcome, rewards),
            CombatIntent::ClearBattle => Ok(self.clear_battle()),
            CombatIntent::ToggleAutoBattle => {
                self.auto_battle = !self.auto_battle;
                Ok(vec![Effect::AutoBattleToggled {
                    enabled: self.auto_battle,
                }])
            }
            CombatIntent::SetBattleSpeed { speed } => {
                self.battle_speed = speed;
                Ok(vec![Effect::BattleSpeedChanged { speed }])
            }
            CombatIntent::ResetCombat => {
                *self = CombatState::default();
                Ok(vec![Effect::CombatReset])
            }
        }
    }

    /// Snapshot the rosters and fix the turn order.
    ///
    /// The combined roster is sorted by descending speed; the sort is stable,
    /// so equal speeds keep the player-before-enemy submission order.
    fn start_battle(
        &mut self,
        player_units: Vec<UnitSpec>,
        enemy_units: Vec<UnitSpec>,
        kind: String,
        now: DateTime<Utc>,
    ) -> Result<Vec<Effect>, IntentError> {
        if self.phase != BattlePhase::Idle {
            return Err(IntentError::BattleInProgress);
        }

        let mut turn_order: Vec<TurnEntry> = player_units
            .iter()
            .map(|u| (u, true))
            .chain(enemy_units.iter().map(|u| (u, false)))
            .map(|(u, is_player)| TurnEntry {
                unit_id: u.id.clone(),
                name: u.name.clone(),
                speed: u.speed,
                is_player,
            })
            .collect();
        turn_order.sort_by(|a, b| b.speed.cmp(&a.speed));

        self.battle = Some(Battle {
            id: BattleId::new(),
            kind: kind.clone(),
            started_at: now,
        });
        self.player_units = player_units.into_iter().map(BattleUnit::from_spec).collect();
        self.enemy_units = enemy_units.into_iter().map(BattleUnit::from_spec).collect();
        self.phase = BattlePhase::Preparing;
        self.log.clear();
        self.current_turn = 0;
        let order_ids = turn_order.iter().map(|e| e.unit_id.clone()).collect();
        self.turn_order = turn_order;

        Ok(vec![Effect::BattleStarted {
            kind,
            turn_order: order_ids,
        }])
    }

    /// Resolve one action.
    ///
    /// Actor and target are looked up across both rosters with no faction
    /// constraint; a unit may target its own side. Damage floors health at
    /// zero, and a unit whose health reaches zero stays down for the rest of
    /// the battle.
    fn perform_action(
        &mut self,
        unit_id: UnitId,
        action: String,
        target_id: UnitId,
        damage: u32,
        effects: Vec<String>,
        now: DateTime<Utc>,
    ) -> Result<Vec<Effect>, IntentError> {
        if self.battle.is_none() {
            return Err(IntentError::NoBattleInProgress);
        }
        if self.unit(&unit_id).is_none() {
            return Err(IntentError::UnknownUnit(unit_id));
        }
        let target_was_player = self.is_player_unit(&target_id);
        let actor_is_player = self.is_player_unit(&unit_id);

        let target = self
            .unit_mut(&target_id)
            .ok_or_else(|| IntentError::UnknownUnit(target_id.clone()))?;

        let mut target_defeated = false;
        if damage > 0 {
            target.current_health = target.current_health.saturating_sub(damage);
            if target.current_health == 0 && target.is_alive {
                target.is_alive = false;
                target_defeated = true;
            }
        }
        target.status_effects.extend(effects.iter().cloned());
        let target_health = target.current_health;

        self.log.push(BattleLogEntry {
            actor: unit_id.clone(),
            target: target_id.clone(),
            action,
            damage,
            effects,
            timestamp: now,
        });

        if actor_is_player {
            self.statistics.total_damage_dealt += u64::from(damage);
        } else {
            self.statistics.total_damage_taken += u64::from(damage);
        }
        if target_defeated && target_was_player {
            self.statistics.units_lost += 1;
        }

        Ok(vec![Effect::ActionPerformed {
            actor: unit_id,
            target: target_id,
            damage,
            target_health,
            target_defeated,
        }])
    }

    fn end_battle(
        &mut self,
        outcome: BattleOutcome,
        rewards: BattleRewards,
    ) -> Result<Vec<Effect>, IntentError> {
        if self.battle.is_none() {
            return Err(IntentError::NoBattleInProgress);
        }

        self.phase = outcome.phase();
        self.rewards = rewards;
        match outcome {
            BattleOutcome::Victory => self.statistics.battles_won += 1,
            BattleOutcome::Defeat => self.statistics.battles_lost += 1,
        }

        Ok(vec![Effect::BattleEnded { outcome }])
    }

    /// Tear the battle down to idle. Statistics and rewards survive;
    /// harmless when nothing is in flight.
    fn clear_battle(&mut self) -> Vec<Effect> {
        if self.battle.is_none() && self.phase == BattlePhase::Idle {
            return Vec::new();
        }
        self.battle = None;
        self.phase = BattlePhase::Idle;
        self.player_units.clear();
        self.enemy_units.clear();
        self.turn_order.clear();
        self.current_turn = 0;
        self.log.clear();
        vec![Effect::BattleCleared]
    }
}
