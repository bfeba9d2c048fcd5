//! The kingdom's resource ledger.
//!
//! Tracks the five currencies, the four buildings, and the daily
//! income/consumption rates. Counters are unsigned: decrements clamp at
//! zero, increments saturate.

use crate::intent::{Effect, IntentError, ResourceIntent};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The five tracked currencies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Gold,
    Soldiers,
    Influence,
    Prestige,
    Gems,
}

impl ResourceKind {
    pub fn name(&self) -> &'static str {
        match self {
            ResourceKind::Gold => "gold",
            ResourceKind::Soldiers => "soldiers",
            ResourceKind::Influence => "influence",
            ResourceKind::Prestige => "prestige",
            ResourceKind::Gems => "gems",
        }
    }

    pub fn all() -> [ResourceKind; 5] {
        [
            ResourceKind::Gold,
            ResourceKind::Soldiers,
            ResourceKind::Influence,
            ResourceKind::Prestige,
            ResourceKind::Gems,
        ]
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// The four fixed buildings of the realm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuildingKind {
    Castle,
    Barracks,
    Treasury,
    Court,
}

impl BuildingKind {
    pub fn name(&self) -> &'static str {
        match self {
            BuildingKind::Castle => "castle",
            BuildingKind::Barracks => "barracks",
            BuildingKind::Treasury => "treasury",
            BuildingKind::Court => "court",
        }
    }

    pub fn all() -> [BuildingKind; 4] {
        [
            BuildingKind::Castle,
            BuildingKind::Barracks,
            BuildingKind::Treasury,
            BuildingKind::Court,
        ]
    }
}

impl fmt::Display for BuildingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// One building's upgrade track.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Building {
    pub level: u32,
    pub max_level: u32,
    /// Gold price of the next upgrade. Grows by x1.5 (floored) per level.
    pub cost: u64,
}

impl Building {
    fn new(max_level: u32, cost: u64) -> Self {
        Self {
            level: 1,
            max_level,
            cost,
        }
    }
}

/// Resources accrued every day.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyIncome {
    pub gold: u64,
    pub soldiers: u64,
    pub influence: u64,
    pub prestige: u64,
}

/// Resources drained every day (upkeep).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyConsumption {
    pub gold: u64,
    pub soldiers: u64,
}

/// Partial update to the daily income rates.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IncomePatch {
    pub gold: Option<u64>,
    pub soldiers: Option<u64>,
    pub influence: Option<u64>,
    pub prestige: Option<u64>,
}

/// Partial update to the daily consumption rates.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConsumptionPatch {
    pub gold: Option<u64>,
    pub soldiers: Option<u64>,
}

/// The complete resource ledger.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceState {
    pub gold: u64,
    pub soldiers: u64,
    pub influence: u64,
    pub prestige: u64,
    /// Premium currency.
    pub gems: u64,
    pub daily_income: DailyIncome,
    pub daily_consumption: DailyConsumption,
    pub castle: Building,
    pub barracks: Building,
    pub treasury: Building,
    pub court: Building,
    pub last_daily_reset: DateTime<Utc>,
}

impl ResourceState {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            gold: 1000,
            soldiers: 100,
            influence: 50,
            prestige: 25,
            gems: 0,
            daily_income: DailyIncome {
                gold: 100,
                soldiers: 5,
                influence: 2,
                prestige: 1,
            },
            daily_consumption: DailyConsumption {
                gold: 50,
                soldiers: 2,
            },
            castle: Building::new(10, 500),
            barracks: Building::new(8, 300),
            treasury: Building::new(5, 200),
            court: Building::new(6, 400),
            last_daily_reset: now,
        }
    }

    /// Current amount of a currency.
    pub fn amount(&self, kind: ResourceKind) -> u64 {
        match kind {
            ResourceKind::Gold => self.gold,
            ResourceKind::Soldiers => self.soldiers,
            ResourceKind::Influence => self.influence,
            ResourceKind::Prestige => self.prestige,
            ResourceKind::Gems => self.gems,
        }
    }

    fn set_amount(&mut self, kind: ResourceKind, value: u64) {
        match kind {
            ResourceKind::Gold => self.gold = value,
            ResourceKind::Soldiers => self.soldiers = value,
            ResourceKind::Influence => self.influence = value,
            ResourceKind::Prestige => self.prestige = value,
            ResourceKind::Gems => self.gems = value,
        }
    }

    pub fn building(&self, kind: BuildingKind) -> &Building {
        match kind {
            BuildingKind::Castle => &self.castle,
            BuildingKind::Barracks => &self.barracks,
            BuildingKind::Treasury => &self.treasury,
            BuildingKind::Court => &self.court,
        }
    }

    fn building_mut(&mut self, kind: BuildingKind) -> &mut Building {
        match kind {
            BuildingKind::Castle => &mut self.castle,
            BuildingKind::Barracks => &mut self.barracks,
            BuildingKind::Treasury => &mut self.treasury,
            BuildingKind::Court => &mut self.court,
        }
    }

    /// Apply one resource intent.
    pub fn apply(
        &mut self,
        intent: ResourceIntent,
        now: DateTime<Utc>,
    ) -> Result<Vec<Effect>, IntentError> {
        match intent {
            ResourceIntent::AddResource { kind, amount } => {
                let value = self.amount(kind).saturating_add(amount);
                self.set_amount(kind, value);
                Ok(vec![Effect::ResourceChanged {
                    kind,
                    new_value: value,
                }])
            }
            ResourceIntent::SpendResource { kind, amount } => {
                let value = self.amount(kind).saturating_sub(amount);
                self.set_amount(kind, value);
                Ok(vec![Effect::ResourceChanged {
                    kind,
                    new_value: value,
                }])
            }
            ResourceIntent::SetResource { kind, amount } => {
                self.set_amount(kind, amount);
                Ok(vec![Effect::ResourceChanged {
                    kind,
                    new_value: amount,
                }])
            }
            ResourceIntent::UpgradeBuilding { building, cost } => {
                self.upgrade_building(building, cost)
            }
            ResourceIntent::ProcessDailyReset => Ok(self.process_daily_reset(now)),
            ResourceIntent::UpdateDailyIncome { patch } => {
                if let Some(gold) = patch.gold {
                    self.daily_income.gold = gold;
                }
                if let Some(soldiers) = patch.soldiers {
                    self.daily_income.soldiers = soldiers;
                }
                if let Some(influence) = patch.influence {
                    self.daily_income.influence = influence;
                }
                if let Some(prestige) = patch.prestige {
                    self.daily_income.prestige = prestige;
                }
                Ok(vec![Effect::RatesUpdated])
            }
            ResourceIntent::UpdateDailyConsumption { patch } => {
                if let Some(gold) = patch.gold {
                    self.daily_consumption.gold = gold;
                }
                if let Some(soldiers) = patch.soldiers {
                    self.daily_consumption.soldiers = soldiers;
                }
                Ok(vec![Effect::RatesUpdated])
            }
            ResourceIntent::ResetResources => {
                *self = ResourceState::new(now);
                Ok(vec![Effect::ResourcesReset])
            }
        }
    }

    fn upgrade_building(
        &mut self,
        kind: BuildingKind,
        cost: u64,
    ) -> Result<Vec<Effect>, IntentError> {
        let building = self.building(kind);
        if building.level >= building.max_level {
            return Err(IntentError::BuildingAtMaxLevel(kind));
        }
        if self.gold < cost {
            return Err(IntentError::InsufficientGold {
                required: cost,
                available: self.gold,
            });
        }

        self.gold -= cost;
        let building = self.building_mut(kind);
        building.level += 1;
        // Next price scales from the stored cost, not the price just paid.
        building.cost = (building.cost as f64 * 1.5).floor() as u64;
        let new_level = building.level;
        let next_cost = building.cost;

        match kind {
            BuildingKind::Treasury => self.daily_income.gold += 20,
            BuildingKind::Barracks => self.daily_income.soldiers += 3,
            BuildingKind::Court => self.daily_income.influence += 1,
            // The castle grants no income. Its upgrades gate story content.
            BuildingKind::Castle => {}
        }

        Ok(vec![Effect::BuildingUpgraded {
            building: kind,
            new_level,
            next_cost,
        }])
    }

    /// Apply accrued income and upkeep once per 24-hour window.
    ///
    /// Calls inside the window are no-ops that report no effects.
    fn process_daily_reset(&mut self, now: DateTime<Utc>) -> Vec<Effect> {
        if now - self.last_daily_reset < Duration::hours(24) {
            return Vec::new();
        }

        self.gold = self.gold.saturating_add(self.daily_income.gold);
        self.soldiers = self.soldiers.saturating_add(self.daily_income.soldiers);
        self.influence = self.influence.saturating_add(self.daily_income.influence);
        self.prestige = self.prestige.saturating_add(self.daily_income.prestige);

        self.gold = self.gold.saturating_sub(self.daily_consumption.gold);
        self.soldiers = self.soldiers.saturating_sub(self.daily_consumption.soldiers);

        self.last_daily_reset = now;
        vec![Effect::DailyTickApplied]
    }
}
