//! The companion roster.
//!
//! Recruited companions, their relationship and romance scores, and the
//! gift inventory. Relationship scores live in [-100, 100] and romance in
//! [0, 100]; affection accumulates without bound.

use crate::intent::{CharacterIntent, Effect, IntentError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

pub const RELATIONSHIP_MIN: i32 = -100;
pub const RELATIONSHIP_MAX: i32 = 100;
pub const ROMANCE_MIN: i32 = 0;
pub const ROMANCE_MAX: i32 = 100;

/// Unique identifier for companions. Content-addressed (e.g. "lady_elena").
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CompanionId(pub String);

impl CompanionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl fmt::Display for CompanionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Companion rarity tiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rarity {
    Common,
    Rare,
    Epic,
    Legendary,
}

impl Rarity {
    pub fn name(&self) -> &'static str {
        match self {
            Rarity::Common => "common",
            Rarity::Rare => "rare",
            Rarity::Epic => "epic",
            Rarity::Legendary => "legendary",
        }
    }
}

impl fmt::Display for Rarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// The kinds of gift the court keeps in stock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GiftKind {
    Flowers,
    Jewelry,
    Books,
    Weapons,
}

impl GiftKind {
    pub fn name(&self) -> &'static str {
        match self {
            GiftKind::Flowers => "flowers",
            GiftKind::Jewelry => "jewelry",
            GiftKind::Books => "books",
            GiftKind::Weapons => "weapons",
        }
    }

    pub fn all() -> [GiftKind; 4] {
        [
            GiftKind::Flowers,
            GiftKind::Jewelry,
            GiftKind::Books,
            GiftKind::Weapons,
        ]
    }
}

impl fmt::Display for GiftKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A recruitable character of the court.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Companion {
    pub id: CompanionId,
    pub name: String,
    pub title: String,
    pub description: String,
    /// Named stats, e.g. diplomacy/combat/commerce.
    pub stats: HashMap<String, i64>,
    pub rarity: Rarity,
    pub level: u32,
    pub experience: u64,
    /// Accumulates without bound; romance is the clamped counterpart.
    pub affection: i64,
    pub recruited: bool,
    pub recruited_at: DateTime<Utc>,
}

impl Companion {
    /// Describe a companion before recruitment. Level, experience, and
    /// affection are reset on recruit regardless of what the caller set.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: CompanionId::new(id),
            name: name.into(),
            title: String::new(),
            description: String::new(),
            stats: HashMap::new(),
            rarity: Rarity::Common,
            level: 1,
            experience: 0,
            affection: 0,
            recruited: false,
            recruited_at: DateTime::<Utc>::MIN_UTC,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_rarity(mut self, rarity: Rarity) -> Self {
        self.rarity = rarity;
        self
    }

    pub fn with_stat(mut self, name: impl Into<String>, value: i64) -> Self {
        self.stats.insert(name.into(), value);
        self
    }
}

/// Aggregate roster statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RosterStats {
    pub total_recruited: u32,
    pub max_level: u32,
    pub total_affection: i64,
}

impl Default for RosterStats {
    fn default() -> Self {
        Self {
            total_recruited: 0,
            max_level: 1,
            total_affection: 0,
        }
    }
}

/// The companion roster slice.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CharacterState {
    /// Recruitment order is preserved.
    pub companions: Vec<Companion>,
    pub current_companion: Option<CompanionId>,
    pub relationships: HashMap<CompanionId, i32>,
    pub romance_levels: HashMap<CompanionId, i32>,
    pub gifts: HashMap<GiftKind, u32>,
    pub stats: RosterStats,
}

impl Default for CharacterState {
    fn default() -> Self {
        let mut gifts = HashMap::new();
        gifts.insert(GiftKind::Flowers, 5);
        gifts.insert(GiftKind::Jewelry, 2);
        gifts.insert(GiftKind::Books, 3);
        gifts.insert(GiftKind::Weapons, 1);

        Self {
            companions: Vec::new(),
            current_companion: None,
            relationships: HashMap::new(),
            romance_levels: HashMap::new(),
            gifts,
            stats: RosterStats::default(),
        }
    }
}

impl CharacterState {
    pub fn companion(&self, id: &CompanionId) -> Option<&Companion> {
        self.companions.iter().find(|c| &c.id == id)
    }

    fn companion_mut(&mut self, id: &CompanionId) -> Option<&mut Companion> {
        self.companions.iter_mut().find(|c| &c.id == id)
    }

    pub fn relationship(&self, id: &CompanionId) -> Option<i32> {
        self.relationships.get(id).copied()
    }

    pub fn romance(&self, id: &CompanionId) -> Option<i32> {
        self.romance_levels.get(id).copied()
    }

    pub fn gift_stock(&self, gift: GiftKind) -> u32 {
        self.gifts.get(&gift).copied().unwrap_or(0)
    }

    /// Apply one roster intent.
    pub fn apply(
        &mut self,
        intent: CharacterIntent,
        now: DateTime<Utc>,
    ) -> Result<Vec<Effect>, IntentError> {
        match intent {
            CharacterIntent::RecruitCompanion { companion } => Ok(self.recruit(companion, now)),
            CharacterIntent::DismissCompanion { id } => self.dismiss(&id),
            CharacterIntent::UpdateRelationship { id, delta } => {
                let score = self
                    .relationships
                    .get_mut(&id)
                    .ok_or_else(|| IntentError::UnknownCompanion(id.clone()))?;
                *score = (*score + delta).clamp(RELATIONSHIP_MIN, RELATIONSHIP_MAX);
                let new_value = *score;
                Ok(vec![Effect::RelationshipChanged { id, new_value }])
            }
            CharacterIntent::UpdateRomance { id, delta } => {
                let score = self
                    .romance_levels
                    .get_mut(&id)
                    .ok_or_else(|| IntentError::UnknownCompanion(id.clone()))?;
                *score = (*score + delta).clamp(ROMANCE_MIN, ROMANCE_MAX);
                let new_value = *score;
                Ok(vec![Effect::RomanceChanged { id, new_value }])
            }
            CharacterIntent::GiveGift {
                id,
                gift,
                affection_gain,
            } => self.give_gift(&id, gift, affection_gain),
            CharacterIntent::AddGift { gift, amount } => {
                let count = self.gifts.entry(gift).or_insert(0);
                *count = count.saturating_add(amount);
                let new_count = *count;
                Ok(vec![Effect::GiftStocked { gift, new_count }])
            }
            CharacterIntent::SetCompanionLevel {
                id,
                level,
                experience,
            } => {
                let companion = self
                    .companions
                    .iter_mut()
                    .find(|c| c.id == id)
                    .ok_or_else(|| IntentError::UnknownCompanion(id.clone()))?;
                companion.level = level;
                companion.experience = experience;
                self.stats.max_level = self.stats.max_level.max(level);
                Ok(vec![Effect::CompanionLeveled { id, new_level: level }])
            }
            CharacterIntent::SetCurrentCompanion { id } => {
                self.current_companion = id.clone();
                Ok(vec![Effect::CurrentCompanionChanged { id }])
            }
            CharacterIntent::ResetRoster => {
                *self = CharacterState::default();
                Ok(vec![Effect::RosterReset])
            }
        }
    }

    /// Insert a companion unless the id is already on the roster.
    ///
    /// A duplicate recruit is not an error; it reports no effects.
    fn recruit(&mut self, companion: Companion, now: DateTime<Utc>) -> Vec<Effect> {
        if self.companion(&companion.id).is_some() {
            return Vec::new();
        }

        let id = companion.id.clone();
        self.companions.push(Companion {
            level: 1,
            experience: 0,
            affection: 0,
            recruited: true,
            recruited_at: now,
            ..companion
        });
        self.relationships.insert(id.clone(), 0);
        self.romance_levels.insert(id.clone(), 0);
        self.stats.total_recruited += 1;

        vec![Effect::CompanionRecruited { id }]
    }

    fn dismiss(&mut self, id: &CompanionId) -> Result<Vec<Effect>, IntentError> {
        if self.companion(id).is_none() {
            return Err(IntentError::UnknownCompanion(id.clone()));
        }
        self.companions.retain(|c| &c.id != id);
        self.relationships.remove(id);
        self.romance_levels.remove(id);
        if self.current_companion.as_ref() == Some(id) {
            self.current_companion = None;
        }
        Ok(vec![Effect::CompanionDismissed { id: id.clone() }])
    }

    /// Consume one gift and raise affection (unbounded) and romance
    /// (clamped). Rejected without touching stock when none are left.
    fn give_gift(
        &mut self,
        id: &CompanionId,
        gift: GiftKind,
        affection_gain: i32,
    ) -> Result<Vec<Effect>, IntentError> {
        if self.gift_stock(gift) == 0 {
            return Err(IntentError::GiftOutOfStock(gift));
        }
        if self.companion(id).is_none() {
            return Err(IntentError::UnknownCompanion(id.clone()));
        }

        let remaining_stock = {
            let count = self.gifts.entry(gift).or_insert(0);
            *count -= 1;
            *count
        };

        let companion = self.companion_mut(id).expect("presence checked above");
        companion.affection += i64::from(affection_gain);
        let new_affection = companion.affection;
        self.stats.total_affection += i64::from(affection_gain);

        let romance = self.romance_levels.entry(id.clone()).or_insert(0);
        *romance = (*romance + affection_gain).clamp(ROMANCE_MIN, ROMANCE_MAX);
        let new_romance = *romance;

        Ok(vec![
            Effect::GiftGiven {
                id: id.clone(),
                gift,
                remaining_stock,
                new_affection,
            },
            Effect::RomanceChanged {
                id: id.clone(),
                new_value: new_romance,
            },
        ])
    }
}
