//! End-to-end DPR scenarios over whole creatures.

use ll_dpr::{Action, Bestiary, Confidence, Creature, ReportConfig, RollMode, Shape};
use proptest::prelude::*;

const SWEEP: [f64; 7] = [5.0, 10.0, 12.0, 15.0, 18.0, 20.0, 25.0];

fn melee(name: &str, hit: i32, damage: &str) -> Action {
    Action::attack(name, "Melee Weapon Attack", hit, damage)
}

fn bear() -> Creature {
    Creature::new("Brown Bear")
        .with_armor_class(11)
        .with_hit_points(34)
        .with_action(Action::multiattack(
            "The bear makes two attacks: one with its bite and one with its claws.",
        ))
        .with_action(melee("Bite", 6, "1d8+4"))
        .with_action(melee("Claws", 6, "2d6+4"))
}

#[test]
fn single_attack_without_multiattack() {
    let goblin = Creature::new("Goblin").with_action(melee("Scimitar", 4, "1d6+2"));
    assert_eq!(goblin.shape(), Shape::NoMultiattack);
    assert_eq!(goblin.dpr(10.0), Some(4.125));
    assert_eq!(goblin.confidence(), Confidence::Exact);
}

#[test]
fn bear_sums_bite_and_claws() {
    let bear = bear();
    let classification = bear.classification();
    assert_eq!(classification.shape, Shape::TwoNamedCounts);
    let pairs: Vec<(u32, &str)> = classification
        .extraction
        .as_ref()
        .unwrap()
        .pairs()
        .map(|(n, a)| (n, a.name.as_str()))
        .collect();
    assert_eq!(pairs, vec![(1, "Bite"), (1, "Claws")]);

    let bite = bear.catalog().resolve("bite").unwrap();
    let claws = bear.catalog().resolve("claws").unwrap();
    for ac in SWEEP {
        let expected = bite.expected_damage(ac, RollMode::Normal)
            + claws.expected_damage(ac, RollMode::Normal);
        let dpr = bear.dpr(ac).unwrap();
        assert!((dpr - expected).abs() < 1e-9, "AC {ac}: {dpr} vs {expected}");
    }
}

#[test]
fn unknown_attack_name_is_unknown_everywhere() {
    let odd = Creature::new("Odd Bear")
        .with_action(Action::multiattack(
            "The bear makes two attacks: one with its bite and one with its tentacle.",
        ))
        .with_action(melee("Bite", 6, "1d8+4"))
        .with_action(melee("Claws", 6, "2d6+4"));
    assert!(odd.classification().extraction.is_none());
    for ac in SWEEP {
        assert_eq!(odd.dpr(ac), None);
        assert_eq!(odd.dpr_result(ac, RollMode::Normal).to_string(), "??");
    }
}

#[test]
fn no_attacks_at_all_is_unknown_everywhere() {
    let commoner = Creature::new("Commoner");
    for ac in SWEEP {
        assert_eq!(commoner.dpr(ac), None);
    }
}

#[test]
fn classification_is_repeatable() {
    let first = bear().classification().clone();
    let second = bear().classification().clone();
    assert_eq!(first, second);
}

#[test]
fn hydra_override_uses_five_heads() {
    let hydra = Creature::new("Hydra")
        .with_action(Action::multiattack(
            "The hydra makes as many bite attacks as it has heads.",
        ))
        .with_action(melee("Bite", 8, "1d10+5"));
    assert_eq!(hydra.confidence(), Confidence::Approximate);
    // needs 2: 0.95 * 10.5 * 5
    let dpr = hydra.dpr(10.0).unwrap();
    assert!((dpr - 49.875).abs() < 1e-9);
}

#[test]
fn scout_picks_the_better_routine() {
    let scout = Creature::new("Scout")
        .with_action(Action::multiattack(
            "The scout makes two melee attacks or two ranged attacks.",
        ))
        .with_action(melee("Shortsword", 4, "1d6+2"))
        .with_action(Action::attack("Longbow", "Ranged Weapon Attack", 4, "1d8+2"));
    assert_eq!(scout.shape(), Shape::MeleeOrRanged);
    // ranged: 2 * 0.75 * 6.5
    let dpr = scout.dpr(10.0).unwrap();
    assert!((dpr - 9.75).abs() < 1e-9);
}

#[test]
fn roll_modes_order_damage() {
    let bear = bear();
    let normal = bear.dpr_with(15.0, RollMode::Normal).unwrap();
    let adv = bear.dpr_with(15.0, RollMode::Advantage).unwrap();
    let dis = bear.dpr_with(15.0, RollMode::Disadvantage).unwrap();
    assert!(dis < normal && normal < adv);
}

#[test]
fn bestiary_summaries() {
    let json = r#"{
        "creatures": [
            { "name": "Brown Bear", "armor_class": 11, "hit_points": 34, "actions": [
                { "name": "Multiattack",
                  "text": "The bear makes two attacks: one with its bite and one with its claws." },
                { "name": "Bite", "text": "Melee Weapon Attack", "attack_bonus": 6, "damage": "1d8+4" },
                { "name": "Claws", "text": "Melee Weapon Attack", "attack_bonus": 6, "damage": "2d6+4" }
            ] },
            { "name": "Wolf", "armor_class": 13, "hit_points": 11, "actions": [
                { "name": "Bite", "text": "Melee Weapon Attack", "attack_bonus": 4, "damage": "2d6+1" }
            ] },
            { "name": "Commoner", "hit_points": 4 }
        ]
    }"#;
    let bestiary = Bestiary::from_json_str(json).unwrap();
    let lines: Vec<String> = bestiary
        .creatures
        .iter()
        .map(|c| format!("{}: {} {}", c.name, c.shape(), c.summary(&bestiary.report)))
        .collect();
    insta::assert_snapshot!(lines.join("\n"), @r"
    Brown Bear: TwoNamedCounts DPR=16.6/11.7/6.8
    Wolf: NoMultiattack DPR=6.0/4.0/2.0
    Commoner: NoMultiattack DPR:??
    ");
}

#[test]
fn summary_follows_report_config() {
    let config = ReportConfig::default()
        .with_armor_classes(vec![12.0])
        .with_decimals(3);
    // needs 6: 0.75 * 19.5
    assert_eq!(bear().summary(&config), "DPR=14.625");
}

fn dice() -> impl Strategy<Value = String> {
    (1u32..4, prop::sample::select(vec![4u32, 6, 8, 10, 12]), -8i64..6)
        .prop_map(|(n, sides, flat)| format!("{n}d{sides}{flat:+}"))
}

fn multiattack() -> impl Strategy<Value = Option<String>> {
    prop::sample::select(vec![
        None,
        Some("The beast makes two attacks: one with its bite and one with its claws."),
        Some("The beast makes two attacks."),
        Some("The beast makes three melee attacks."),
        Some("The beast makes two bite attacks."),
        Some("The beast attacks twice, each time with its bite and its claws."),
        Some("The beast makes two attacks with its claws or its bite."),
        Some("The beast dances."),
        Some("The beast makes two attacks: one with its bite and one with its horn."),
    ])
    .prop_map(|t| t.map(str::to_string))
}

proptest! {
    /// Property: a harder target never yields more damage
    #[test]
    fn prop_dpr_non_increasing_in_ac(
        bite_hit in -2i32..15,
        claws_hit in -2i32..15,
        bite in dice(),
        claws in dice(),
        text in multiattack(),
        low in 0.0f64..30.0,
        step in 0.0f64..10.0,
    ) {
        let mut beast = Creature::new("Beast")
            .with_action(melee("Bite", bite_hit, &bite))
            .with_action(melee("Claws", claws_hit, &claws));
        if let Some(text) = text {
            beast = beast.with_action(Action::multiattack(text));
        }
        let easy = beast.dpr(low);
        let hard = beast.dpr(low + step);
        prop_assert_eq!(easy.is_some(), hard.is_some());
        if let (Some(easy), Some(hard)) = (easy, hard) {
            prop_assert!(hard >= 0.0, "negative DPR {hard}");
            prop_assert!(hard <= easy + 1e-9, "{hard} > {easy}");
        }
    }

    /// Property: classification does not depend on call count
    #[test]
    fn prop_classification_idempotent(text in multiattack()) {
        let catalog = bear().catalog().clone();
        let a = ll_dpr::classify(text.as_deref(), &catalog);
        let b = ll_dpr::classify(text.as_deref(), &catalog);
        prop_assert_eq!(a, b);
    }
}
