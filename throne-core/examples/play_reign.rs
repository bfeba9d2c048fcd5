//! Quick end-to-end drive of the game core: a short reign with a choice,
//! a recruitment, a gift, and a skirmish.

use throne_core::character::GiftKind;
use throne_core::combat::UnitId;
use throne_core::intent::{CharacterIntent, CombatIntent, NarrativeIntent};
use throne_core::{
    content, BattleOutcome, BattleRewards, GameSession, Intent, SessionConfig,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== A Short Reign ===\n");

    println!("1. Taking the throne...");
    let mut session =
        GameSession::new(SessionConfig::new().with_player_name("Queen Aurelia")).await?;
    let snapshot = session.snapshot().await;
    println!("   Ruler: {}", snapshot.game().player_name);
    println!("   Gold:  {}", snapshot.resources().gold);

    println!("\n2. The first decree...");
    let opening = content::chapter(1).expect("opening chapter");
    let intro = &opening.scenes[0];
    session
        .dispatch(Intent::Narrative(NarrativeIntent::StartStory {
            story_id: "tutorial".to_string(),
            chapter_id: opening.number,
            scene_id: intro.id.to_string(),
        }))
        .await?;
    let choice = &intro.choices[0];
    session
        .dispatch(Intent::Narrative(NarrativeIntent::MakeChoice {
            choice_id: choice.id.clone(),
            consequence: choice.consequence.clone(),
        }))
        .await?;
    println!("   Chose: {}", choice.text);

    println!("\n3. Recruiting Lady Elena...");
    let elena = content::recruitable("lady_elena").expect("known companion").clone();
    session
        .dispatch(Intent::Character(CharacterIntent::RecruitCompanion {
            companion: elena,
        }))
        .await?;
    session
        .dispatch(Intent::Character(CharacterIntent::GiveGift {
            id: throne_core::CompanionId::new("lady_elena"),
            gift: GiftKind::Flowers,
            affection_gain: 8,
        }))
        .await?;
    let snapshot = session.snapshot().await;
    let elena = snapshot
        .character()
        .companion(&throne_core::CompanionId::new("lady_elena"))
        .expect("recruited");
    println!("   Affection: {}", elena.affection);

    println!("\n4. Bandits on the king's road...");
    session
        .dispatch(Intent::Combat(CombatIntent::StartBattle {
            player_units: content::SKIRMISH_PLAYER_UNITS.clone(),
            enemy_units: content::SKIRMISH_ENEMY_UNITS.clone(),
            kind: "skirmish".to_string(),
        }))
        .await?;
    session
        .dispatch(Intent::Combat(CombatIntent::PerformAction {
            unit_id: UnitId::new("player_2"),
            action: "attack".to_string(),
            target_id: UnitId::new("enemy_1"),
            damage: 30,
            effects: vec![],
        }))
        .await?;
    session
        .dispatch(Intent::Combat(CombatIntent::EndBattle {
            outcome: BattleOutcome::Victory,
            rewards: BattleRewards {
                experience: 120,
                gold: 75,
                items: vec!["bandit_banner".to_string()],
            },
        }))
        .await?;
    let snapshot = session.snapshot().await;
    println!(
        "   Battles won: {}",
        snapshot.combat().statistics.battles_won
    );
    println!(
        "   Damage dealt: {}",
        snapshot.combat().statistics.total_damage_dealt
    );

    println!("\n=== The realm endures. ===");
    Ok(())
}
