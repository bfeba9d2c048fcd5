//! QA tests for the combat engine driven through the store.

use throne_core::combat::{BattleSpeed, UnitId, UnitSpec};
use throne_core::intent::CombatIntent;
use throne_core::testing::{assert_in_battle, assert_not_in_battle, TestHarness};
use throne_core::{BattleOutcome, BattlePhase, BattleRewards, Intent, IntentError};

fn strike(actor: &str, target: &str, damage: u32) -> Intent {
    Intent::Combat(CombatIntent::PerformAction {
        unit_id: UnitId::new(actor),
        action: "attack".to_string(),
        target_id: UnitId::new(target),
        damage,
        effects: vec![],
    })
}

#[test]
fn turn_order_sorts_descending_by_speed() {
    let mut harness = TestHarness::new();
    harness.start_skirmish();

    let order = harness.store.combat();
    let speeds: Vec<u32> = order.turn_order.iter().map(|e| e.speed).collect();
    assert_eq!(speeds, vec![15, 12, 11, 10]);
    assert_eq!(order.phase, BattlePhase::Preparing);
    assert_eq!(order.current_turn, 0);
    assert!(order.log.is_empty());
}

#[test]
fn equal_speeds_keep_submission_order() {
    let mut harness = TestHarness::new();
    harness.expect_dispatch(Intent::Combat(CombatIntent::StartBattle {
        player_units: vec![UnitSpec::new("p1", "Pikeman").with_health(50).with_speed(9)],
        enemy_units: vec![UnitSpec::new("e1", "Raider").with_health(50).with_speed(9)],
        kind: "duel".to_string(),
    }));
    let order: Vec<&str> = harness
        .store
        .combat()
        .turn_order
        .iter()
        .map(|e| e.unit_id.0.as_str())
        .collect();
    // Stable sort: the player roster was submitted first.
    assert_eq!(order, vec!["p1", "e1"]);
}

#[test]
fn battle_snapshot_starts_units_at_full_health() {
    let mut harness = TestHarness::new();
    harness.start_skirmish();
    for unit in harness
        .store
        .combat()
        .player_units
        .iter()
        .chain(harness.store.combat().enemy_units.iter())
    {
        assert_eq!(unit.current_health, unit.max_health);
        assert!(unit.is_alive);
        assert!(unit.status_effects.is_empty());
    }
}

#[test]
fn actions_require_a_battle_and_known_units() {
    let mut harness = TestHarness::new();
    let err = harness.dispatch(strike("player_1", "enemy_1", 10));
    assert_eq!(err, Err(IntentError::NoBattleInProgress));

    harness.start_skirmish();
    let err = harness.dispatch(strike("ghost", "enemy_1", 10));
    assert_eq!(err, Err(IntentError::UnknownUnit(UnitId::new("ghost"))));
    let err = harness.dispatch(strike("player_1", "ghost", 10));
    assert_eq!(err, Err(IntentError::UnknownUnit(UnitId::new("ghost"))));
    assert!(harness.store.combat().log.is_empty());
}

#[test]
fn overkill_floors_health_and_defeat_is_final() {
    let mut harness = TestHarness::new();
    harness.start_skirmish();

    harness.expect_dispatch(strike("player_2", "enemy_1", 75));
    let bandit = harness.store.combat().unit(&UnitId::new("enemy_1")).unwrap();
    assert_eq!(bandit.current_health, 0);
    assert!(!bandit.is_alive);

    harness.expect_dispatch(strike("player_1", "enemy_1", 5));
    let bandit = harness.store.combat().unit(&UnitId::new("enemy_1")).unwrap();
    assert_eq!(bandit.current_health, 0);
    assert!(!bandit.is_alive);
}

#[test]
fn exact_lethal_damage_marks_the_kill() {
    let mut harness = TestHarness::new();
    harness.start_skirmish();
    // Bandit has exactly 60 health.
    let effects = harness.expect_dispatch(strike("player_1", "enemy_1", 60));
    assert_eq!(effects.len(), 1);
    match &effects[0] {
        throne_core::Effect::ActionPerformed {
            target_health,
            target_defeated,
            ..
        } => {
            assert_eq!(*target_health, 0);
            assert!(*target_defeated);
        }
        other => panic!("unexpected effect {other:?}"),
    }
}

#[test]
fn statistics_accumulate_across_battles() {
    let mut harness = TestHarness::new();
    harness.start_skirmish();
    harness.expect_dispatch(strike("player_1", "enemy_1", 30));
    harness.expect_dispatch(strike("enemy_2", "player_1", 22));
    harness.expect_dispatch(Intent::Combat(CombatIntent::EndBattle {
        outcome: BattleOutcome::Victory,
        rewards: BattleRewards {
            experience: 100,
            gold: 50,
            items: vec![],
        },
    }));
    harness.expect_dispatch(Intent::Combat(CombatIntent::ClearBattle));
    assert_not_in_battle(&harness);

    harness.start_skirmish();
    harness.expect_dispatch(strike("enemy_1", "player_2", 90));
    harness.expect_dispatch(Intent::Combat(CombatIntent::EndBattle {
        outcome: BattleOutcome::Defeat,
        rewards: BattleRewards::default(),
    }));

    let stats = &harness.store.combat().statistics;
    assert_eq!(stats.battles_won, 1);
    assert_eq!(stats.battles_lost, 1);
    assert_eq!(stats.total_damage_dealt, 30);
    assert_eq!(stats.total_damage_taken, 112);
    assert_eq!(stats.units_lost, 1);
}

#[test]
fn ending_without_a_battle_is_rejected() {
    let mut harness = TestHarness::new();
    let err = harness.dispatch(Intent::Combat(CombatIntent::EndBattle {
        outcome: BattleOutcome::Victory,
        rewards: BattleRewards::default(),
    }));
    assert_eq!(err, Err(IntentError::NoBattleInProgress));
}

#[test]
fn starting_over_an_active_battle_is_rejected() {
    let mut harness = TestHarness::new();
    harness.start_skirmish();
    assert_in_battle(&harness);

    let err = harness.dispatch(Intent::Combat(CombatIntent::StartBattle {
        player_units: vec![UnitSpec::new("p1", "Pikeman").with_health(50)],
        enemy_units: vec![UnitSpec::new("e1", "Raider").with_health(50)],
        kind: "ambush".to_string(),
    }));
    assert_eq!(err, Err(IntentError::BattleInProgress));
    assert_eq!(harness.store.combat().battle.as_ref().unwrap().kind, "skirmish");
}

#[test]
fn auto_battle_and_speed_settings() {
    let mut harness = TestHarness::new();
    assert!(!harness.store.combat().auto_battle);
    harness.expect_dispatch(Intent::Combat(CombatIntent::ToggleAutoBattle));
    assert!(harness.store.combat().auto_battle);
    harness.expect_dispatch(Intent::Combat(CombatIntent::ToggleAutoBattle));
    assert!(!harness.store.combat().auto_battle);

    harness.expect_dispatch(Intent::Combat(CombatIntent::SetBattleSpeed {
        speed: BattleSpeed::Fast,
    }));
    assert_eq!(harness.store.combat().battle_speed, BattleSpeed::Fast);
}

#[test]
fn log_records_every_action_with_the_dispatch_time() {
    let mut harness = TestHarness::new();
    harness.start_skirmish();
    harness.expect_dispatch(strike("player_1", "enemy_2", 10));
    harness.advance(chrono::Duration::seconds(5));
    harness.expect_dispatch(strike("enemy_2", "player_1", 15));

    let log = &harness.store.combat().log;
    assert_eq!(log.len(), 2);
    assert_eq!(log[0].action, "attack");
    assert_eq!(log[1].timestamp - log[0].timestamp, chrono::Duration::seconds(5));
}
