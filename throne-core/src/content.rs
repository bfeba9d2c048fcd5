//! Built-in game content.
//!
//! Catalogs of the recruitable companions, the opening story chapter, and
//! the stock skirmish encounter. The engine itself never reads these; they
//! exist so drivers and tests share one source of truth for content.

use crate::character::{Companion, Rarity};
use crate::combat::UnitSpec;
use crate::narrative::Choice;

/// A scene of a story chapter.
#[derive(Debug, Clone)]
pub struct SceneDef {
    pub id: &'static str,
    pub title: &'static str,
    pub text: &'static str,
    pub choices: Vec<Choice>,
}

/// A story chapter.
#[derive(Debug, Clone)]
pub struct ChapterDef {
    pub number: u32,
    pub title: &'static str,
    pub scenes: Vec<SceneDef>,
}

lazy_static::lazy_static! {
    /// The opening chapter.
    pub static ref CHAPTERS: Vec<ChapterDef> = vec![
        ChapterDef {
            number: 1,
            title: "The Crown's Burden",
            scenes: vec![SceneDef {
                id: "intro",
                title: "A New Reign Begins",
                text: "You sit upon the throne, the weight of the crown heavy upon your \
                       brow. The courtiers whisper among themselves, waiting for your \
                       first decree as the new monarch.",
                choices: vec![
                    Choice::new("diplomatic", "Call for a council of advisors")
                        .with_consequence("diplomatic_path"),
                    Choice::new("military", "Inspect the royal guard")
                        .with_consequence("military_path"),
                    Choice::new("economic", "Review the treasury reports")
                        .with_consequence("economic_path"),
                ],
            }],
        },
    ];

    /// Companions available for recruitment at the court.
    pub static ref RECRUITABLE_COMPANIONS: Vec<Companion> = vec![
        Companion::new("lady_elena", "Lady Elena")
            .with_title("Court Diplomat")
            .with_description("A skilled diplomat with silver tongue and sharp wit.")
            .with_rarity(Rarity::Epic)
            .with_stat("diplomacy", 85)
            .with_stat("intelligence", 90)
            .with_stat("loyalty", 70),
        Companion::new("sir_gareth", "Sir Gareth")
            .with_title("Royal Guard Captain")
            .with_description("A veteran warrior with unwavering loyalty to the crown.")
            .with_rarity(Rarity::Legendary)
            .with_stat("combat", 95)
            .with_stat("loyalty", 100)
            .with_stat("leadership", 80),
        Companion::new("merchant_aldric", "Merchant Aldric")
            .with_title("Master Trader")
            .with_description("A wealthy merchant with connections across the realm.")
            .with_rarity(Rarity::Rare)
            .with_stat("commerce", 90)
            .with_stat("intelligence", 75)
            .with_stat("charisma", 85),
    ];

    /// The stock skirmish encounter: the royal retinue against roadside
    /// bandits.
    pub static ref SKIRMISH_PLAYER_UNITS: Vec<UnitSpec> = vec![
        UnitSpec::new("player_1", "Royal Guard")
            .with_health(100)
            .with_attack(25)
            .with_defense(15)
            .with_speed(10),
        UnitSpec::new("player_2", "Knight")
            .with_health(80)
            .with_attack(30)
            .with_defense(10)
            .with_speed(12),
    ];

    /// Skirmish opposition.
    pub static ref SKIRMISH_ENEMY_UNITS: Vec<UnitSpec> = vec![
        UnitSpec::new("enemy_1", "Bandit")
            .with_health(60)
            .with_attack(20)
            .with_defense(8)
            .with_speed(15),
        UnitSpec::new("enemy_2", "Mercenary")
            .with_health(70)
            .with_attack(22)
            .with_defense(12)
            .with_speed(11),
    ];
}

/// Find a recruitable companion by id.
pub fn recruitable(id: &str) -> Option<&'static Companion> {
    RECRUITABLE_COMPANIONS.iter().find(|c| c.id.0 == id)
}

/// Find a chapter by number.
pub fn chapter(number: u32) -> Option<&'static ChapterDef> {
    CHAPTERS.iter().find(|c| c.number == number)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opening_chapter_offers_three_paths() {
        let opening = chapter(1).expect("chapter 1 exists");
        assert_eq!(opening.title, "The Crown's Burden");
        let intro = &opening.scenes[0];
        assert_eq!(intro.id, "intro");
        assert_eq!(intro.choices.len(), 3);
        assert!(intro
            .choices
            .iter()
            .all(|c| c.consequence.is_some()));
    }

    #[test]
    fn recruitables_are_unique_by_id() {
        for companion in RECRUITABLE_COMPANIONS.iter() {
            let matches = RECRUITABLE_COMPANIONS
                .iter()
                .filter(|c| c.id == companion.id)
                .count();
            assert_eq!(matches, 1, "duplicate id {}", companion.id);
        }
        assert!(recruitable("sir_gareth").is_some());
        assert!(recruitable("nobody").is_none());
    }
}
