//! The pattern cascade: classifying multiattack text into a [`Shape`].
//!
//! Candidates are tried in a fixed order:
//!
//! 1. literal overrides ([`LiteralOverride::ALL`]), compared against the
//!    whole text;
//! 2. the templated rules in [`RULES`], each a full-text regex;
//! 3. [`Shape::Default`], which accepts anything.
//!
//! A candidate wins only if its captures also validate against the
//! creature's catalog. When the text matched one or more rules but none of
//! them validated, the first such rule is reported with no extraction, so
//! the DPR is unknown rather than silently approximated.

use std::sync::LazyLock;

use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};

use crate::calc::{self, DprResult};
use crate::catalog::{ALIAS_TABLE_VERSION, AttackCatalog, AttackCategory};
use crate::odds::RollMode;
use crate::shape::{Confidence, LiteralOverride, Shape};
use crate::validate::{self, Extraction, Issue, RawCaptures, RawItem};

/// Creature name or article at the start of the text ("The bear").
const CREATURE: &str = r"(?P<mname>[^.:]+?)";
/// A count word.
const NUMBER: &str =
    r"(?:one|two|three|four|five|six|seven|eight|nine|ten|once|twice|thrice|an|a|\d+)";
/// An optional possessive or article before an attack name.
const ARTICLE: &str = r"(?:(?:its|his|her|their|a|an|the) )?";
/// An attack-name fragment.
const ITEM: &str = r"[^,.:]+?";

/// Templated rules in cascade order. A shape may own several phrasings.
///
/// Placeholders: `{C}` creature, `{N}` count word, `{A}` article,
/// `{I}` attack name.
pub const RULES: &[(Shape, &str)] = &[
    (
        Shape::ByHalfSpellLevel,
        r"{C} makes a number of attacks equal to half this spell's level \(rounded down\)\.",
    ),
    (Shape::Any, r"{C} makes (?P<total>{N}) (?:weapon )?attacks?\."),
    (Shape::AnyMelee, r"{C} makes (?P<num1>{N}) melee (?:weapon )?attacks?\."),
    (Shape::AnyRanged, r"{C} makes (?P<num1>{N}) ranged (?:weapon )?attacks?\."),
    (
        Shape::MeleeOrRanged,
        r"{C} makes (?P<num1>{N}) melee (?:weapon )?attacks?,? or (?P<num2>{N}) ranged (?:weapon )?attacks?\.",
    ),
    (
        Shape::EitherOrCounts,
        r"{C} makes (?P<num1>{N}) (?P<name1>{I}) attacks?,? or (?P<num2>{N}) (?P<name2>{I}) attacks?\.",
    ),
    (
        Shape::UsesThenNamedCounts,
        r"{C} (?:can )?uses? {A}(?P<rider>[^.]+?)\. It then makes (?P<total>{N}) attacks: (?P<num1>{N}) with {A}(?P<name1>{I}),? and (?P<num2>{N}) with {A}(?P<name2>{I})\.",
    ),
    (
        Shape::TwoOfThreeChoice,
        r"{C} makes (?P<total>{N}) attacks: (?P<num1>{N}) with {A}(?P<name1>{I}),? and (?P<num2>{N}) with {A}(?P<name2>{I}) or {A}(?P<name3>{I})\.",
    ),
    (
        Shape::TwoNamedCounts,
        r"{C} makes (?P<total>{N}) attacks: (?P<num1>{N}) with {A}(?P<name1>{I}),? and (?P<num2>{N}) with {A}(?P<name2>{I})\.",
    ),
    (
        Shape::TwiceNamedPair,
        r"{C} attacks twice, each time with {A}(?P<name1>{I}) and {A}(?P<name2>{I})\.",
    ),
    (
        Shape::AttacksWithNamed,
        r"{C} makes (?P<num1>{N}) (?:melee |ranged )?(?:weapon )?attacks? with {A}(?P<name1>{I}),? and (?P<num2>{N}) (?:attacks? )?with {A}(?P<name2>{I})\.",
    ),
    (
        Shape::NamedPairAttacks,
        r"{C} makes (?P<num1>{N}) (?P<name1>{I}) attacks?,? and (?P<num2>{N}) (?P<name2>{I}) attacks?\.",
    ),
    (
        Shape::NamedAndUses,
        r"{C} makes (?P<num1>{N}) (?P<name1>{I}) attacks? and (?:can )?uses? {A}(?P<rider>[^.]+?)\.",
    ),
    (
        Shape::NamedAndUses,
        r"{C} uses {A}(?P<rider>[^.]+?) and makes (?P<num1>{N}) (?P<name1>{I}) attacks?\.",
    ),
    (
        Shape::WithNamedTwoOptions,
        r"{C} makes (?P<num1>{N}) (?:melee |ranged )?(?:weapon )?attacks? with {A}(?P<name1>{I}),? or {A}(?P<name2>{I})\.",
    ),
    (
        Shape::WithNamed,
        r"{C} makes (?P<num1>{N}) (?:melee |ranged )?(?:weapon )?attacks? with {A}(?P<name1>{I})\.",
    ),
    (Shape::Named, r"{C} makes (?P<num1>{N}) (?P<name1>{I}) attacks?\."),
];

static COMPILED: LazyLock<Vec<(Shape, Regex)>> = LazyLock::new(|| {
    RULES
        .iter()
        .map(|&(shape, template)| {
            let pattern = expand(template);
            let regex = Regex::new(&pattern)
                .unwrap_or_else(|e| panic!("rule for {shape} does not compile: {e}"));
            (shape, regex)
        })
        .collect()
});

/// Expand a rule template into a case-insensitive, fully anchored regex.
fn expand(template: &str) -> String {
    let body = template
        .replace("{C}", CREATURE)
        .replace("{N}", NUMBER)
        .replace("{A}", ARTICLE)
        .replace("{I}", ITEM);
    format!("(?i)^{body}$")
}

/// The outcome of classifying one creature's multiattack text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    /// The winning shape.
    pub shape: Shape,
    /// Typed counts and attacks, or `None` if validation failed or the
    /// creature has no usable attacks.
    pub extraction: Option<Extraction>,
    /// Diagnostics raised for the winning shape.
    pub issues: Vec<Issue>,
    /// Revision of the alias table names were resolved with.
    pub alias_table_version: u32,
}

impl Classification {
    /// Static confidence of the winning shape.
    pub fn confidence(&self) -> Confidence {
        self.shape.confidence()
    }

    /// Expected damage per round against `ac`.
    pub fn dpr(&self, ac: f64, mode: RollMode) -> Option<f64> {
        calc::dpr(self.shape, self.extraction.as_ref(), ac, mode)
    }

    /// Expected damage per round tagged with its confidence.
    pub fn dpr_result(&self, ac: f64, mode: RollMode) -> DprResult {
        DprResult {
            value: self.dpr(ac, mode),
            confidence: self.confidence(),
        }
    }
}

/// Classify a creature's multiattack text against its catalog.
///
/// Never fails: absent text yields [`Shape::NoMultiattack`] and text that
/// no rule recognizes yields [`Shape::Default`].
pub fn classify(text: Option<&str>, catalog: &AttackCatalog) -> Classification {
    let Some(text) = text else {
        return settle(Shape::NoMultiattack, &best_single(), catalog);
    };
    let text = text.trim();

    let literal = LiteralOverride::ALL
        .iter()
        .filter(|o| o.spec().text == text)
        .map(|&o| (Shape::Literal(o), literal_captures(o)));
    let templated = COMPILED.iter().filter_map(|(shape, regex)| {
        regex
            .captures(text)
            .map(|caps| (*shape, pattern_captures(*shape, &caps)))
    });

    let mut rejected: Option<Classification> = None;
    for (shape, raw) in literal.chain(templated) {
        let (extraction, issues) = validate::check(shape, &raw, catalog);
        match extraction {
            Some(extraction) => {
                tracing::debug!(%shape, "classified multiattack");
                for issue in &issues {
                    issue.log();
                }
                return Classification {
                    shape,
                    extraction: Some(extraction),
                    issues,
                    alias_table_version: ALIAS_TABLE_VERSION,
                };
            }
            None => {
                tracing::debug!(%shape, "text matched but did not validate");
                if rejected.is_none() {
                    rejected = Some(Classification {
                        shape,
                        extraction: None,
                        issues,
                        alias_table_version: ALIAS_TABLE_VERSION,
                    });
                }
            }
        }
    }

    match rejected {
        Some(rejected) => {
            for issue in &rejected.issues {
                issue.log();
            }
            rejected
        }
        None => settle(Shape::Default, &best_single(), catalog),
    }
}

/// Validate a fixed shape and log its issues.
fn settle(shape: Shape, raw: &RawCaptures, catalog: &AttackCatalog) -> Classification {
    let (extraction, issues) = validate::check(shape, raw, catalog);
    for issue in &issues {
        issue.log();
    }
    Classification {
        shape,
        extraction,
        issues,
        alias_table_version: ALIAS_TABLE_VERSION,
    }
}

/// One use of the best attack in the catalog.
fn best_single() -> RawCaptures {
    RawCaptures {
        total: None,
        items: vec![RawItem::category(None, AttackCategory::Any)],
    }
}

fn literal_captures(o: LiteralOverride) -> RawCaptures {
    let spec = o.spec();
    RawCaptures {
        total: spec.total.map(str::to_string),
        items: spec
            .items
            .iter()
            .map(|&(count, name)| RawItem::named(Some(count), &[name]))
            .collect(),
    }
}

/// Map a rule's regex captures to raw items, per shape.
fn pattern_captures(shape: Shape, caps: &Captures<'_>) -> RawCaptures {
    let get = |name: &str| caps.name(name).map(|m| m.as_str().trim());
    let name = |name: &str| get(name).unwrap_or_default();
    let total = get("total").map(str::to_string);

    let items = match shape {
        Shape::Any => vec![RawItem::category(get("total"), AttackCategory::Any)],
        Shape::AnyMelee => vec![RawItem::category(get("num1"), AttackCategory::Melee)],
        Shape::AnyRanged => vec![RawItem::category(get("num1"), AttackCategory::Ranged)],
        Shape::MeleeOrRanged => vec![
            RawItem::category(get("num1"), AttackCategory::Melee),
            RawItem::category(get("num2"), AttackCategory::Ranged),
        ],
        Shape::EitherOrCounts
        | Shape::UsesThenNamedCounts
        | Shape::TwoNamedCounts
        | Shape::AttacksWithNamed
        | Shape::NamedPairAttacks => vec![
            RawItem::named(get("num1"), &[name("name1")]),
            RawItem::named(get("num2"), &[name("name2")]),
        ],
        Shape::TwoOfThreeChoice => vec![
            RawItem::named(get("num1"), &[name("name1")]),
            RawItem::named(get("num2"), &[name("name2"), name("name3")]),
        ],
        Shape::TwiceNamedPair => vec![
            RawItem::named(None, &[name("name1")]),
            RawItem::named(None, &[name("name2")]),
        ],
        Shape::WithNamedTwoOptions => {
            vec![RawItem::named(get("num1"), &[name("name1"), name("name2")])]
        }
        Shape::NamedAndUses | Shape::WithNamed | Shape::Named => {
            vec![RawItem::named(get("num1"), &[name("name1")])]
        }
        Shape::Literal(o) => return literal_captures(o),
        Shape::Default | Shape::NoMultiattack => return best_single(),
        Shape::ByHalfSpellLevel => Vec::new(),
    };

    // "makes two attacks." states a total only through its single count
    let total = if shape == Shape::Any { None } else { total };
    RawCaptures { total, items }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Attack, AttackKind};

    fn catalog(attacks: &[(&str, i32, &str, AttackKind)]) -> AttackCatalog {
        AttackCatalog::from_attacks(
            attacks
                .iter()
                .map(|&(name, hit, dmg, kind)| Attack::new(name, hit, dmg, kind).unwrap())
                .collect(),
        )
    }

    fn beast() -> AttackCatalog {
        use AttackKind::*;
        catalog(&[
            ("Bite", 5, "1d8+3", Melee),
            ("Claws", 5, "2d6+3", Melee),
            ("Tail", 5, "1d10+3", Melee),
            ("Spit", 3, "2d4", Ranged),
        ])
    }

    fn pairs(c: &Classification) -> Vec<(u32, String)> {
        c.extraction
            .as_ref()
            .unwrap()
            .pairs()
            .map(|(n, a)| (n, a.name.clone()))
            .collect()
    }

    fn shape_of(text: &str) -> Shape {
        classify(Some(text), &beast()).shape
    }

    #[test]
    fn every_rule_compiles() {
        assert_eq!(COMPILED.len(), RULES.len());
    }

    #[test]
    fn rule_order_is_fixed() {
        let mut order: Vec<Shape> = RULES.iter().map(|(s, _)| *s).collect();
        order.dedup();
        assert_eq!(
            order,
            vec![
                Shape::ByHalfSpellLevel,
                Shape::Any,
                Shape::AnyMelee,
                Shape::AnyRanged,
                Shape::MeleeOrRanged,
                Shape::EitherOrCounts,
                Shape::UsesThenNamedCounts,
                Shape::TwoOfThreeChoice,
                Shape::TwoNamedCounts,
                Shape::TwiceNamedPair,
                Shape::AttacksWithNamed,
                Shape::NamedPairAttacks,
                Shape::NamedAndUses,
                Shape::WithNamedTwoOptions,
                Shape::WithNamed,
                Shape::Named,
            ]
        );
    }

    #[test]
    fn absent_text_is_no_multiattack() {
        let c = classify(None, &beast());
        assert_eq!(c.shape, Shape::NoMultiattack);
        assert_eq!(c.extraction.unwrap().groups[0].options.len(), 4);
    }

    #[test]
    fn bear_pair() {
        let c = classify(
            Some("The bear makes two attacks: one with its bite and one with its claws."),
            &beast(),
        );
        assert_eq!(c.shape, Shape::TwoNamedCounts);
        assert_eq!(pairs(&c), vec![(1, "Bite".into()), (1, "Claws".into())]);
        assert_eq!(c.extraction.unwrap().total, Some(2));
        assert!(c.issues.is_empty());
    }

    #[test]
    fn category_shapes() {
        assert_eq!(shape_of("The griffon makes two attacks."), Shape::Any);
        assert_eq!(shape_of("The knight makes two weapon attacks."), Shape::Any);
        assert_eq!(shape_of("The ogre makes two melee attacks."), Shape::AnyMelee);
        assert_eq!(shape_of("The scout makes two ranged attacks."), Shape::AnyRanged);
        assert_eq!(
            shape_of("The scout makes two melee attacks or two ranged attacks."),
            Shape::MeleeOrRanged
        );
    }

    #[test]
    fn named_shapes() {
        assert_eq!(shape_of("The wolf makes two bite attacks."), Shape::Named);
        assert_eq!(shape_of("The wolf makes three attacks with its claws."), Shape::WithNamed);
        assert_eq!(
            shape_of("The wolf makes two attacks with its bite or its claws."),
            Shape::WithNamedTwoOptions
        );
        assert_eq!(
            shape_of("The wolf makes two attacks with its claws and one with its bite."),
            Shape::AttacksWithNamed
        );
        assert_eq!(
            shape_of("The wolf makes one bite attack and two claw attacks."),
            Shape::NamedPairAttacks
        );
        assert_eq!(
            shape_of("The wolf makes two claws attacks or two spit attacks."),
            Shape::EitherOrCounts
        );
        assert_eq!(
            shape_of("The wolf attacks twice, each time with its bite and its tail."),
            Shape::TwiceNamedPair
        );
    }

    #[test]
    fn choice_of_three() {
        let c = classify(
            Some("The beast makes three attacks: one with its bite and two with its claws or tail."),
            &beast(),
        );
        assert_eq!(c.shape, Shape::TwoOfThreeChoice);
        let extraction = c.extraction.unwrap();
        assert_eq!(extraction.groups.len(), 2);
        assert_eq!(extraction.groups[1].count, 2);
        assert_eq!(extraction.groups[1].options.len(), 2);
    }

    #[test]
    fn rider_shapes_are_lower_bounds() {
        let c = classify(
            Some(
                "The dragon can use its Frightful Presence. It then makes three attacks: \
                 one with its bite and two with its claws.",
            ),
            &beast(),
        );
        assert_eq!(c.shape, Shape::UsesThenNamedCounts);
        assert_eq!(c.confidence(), Confidence::LowerBound);
        assert_eq!(pairs(&c), vec![(1, "Bite".into()), (2, "Claws".into())]);

        let c = classify(
            Some("The beast makes two claw attacks and uses its Roar."),
            &beast(),
        );
        assert_eq!(c.shape, Shape::NamedAndUses);
        assert_eq!(pairs(&c), vec![(2, "Claws".into())]);

        let c = classify(
            Some("The beast uses its Roar and makes one bite attack."),
            &beast(),
        );
        assert_eq!(c.shape, Shape::NamedAndUses);
    }

    #[test]
    fn literal_overrides_win_first() {
        let hydra = catalog(&[("Bite", 8, "1d10+5", AttackKind::Melee)]);
        let c = classify(
            Some("The hydra makes as many bite attacks as it has heads."),
            &hydra,
        );
        assert_eq!(c.shape, Shape::Literal(LiteralOverride::Hydra));
        assert_eq!(pairs(&c), vec![(5, "Bite".into())]);
        assert_eq!(c.confidence(), Confidence::Approximate);

        let behir = catalog(&[
            ("Bite", 10, "3d10+6", AttackKind::Melee),
            ("Constrict", 10, "2d10+6", AttackKind::Melee),
        ]);
        let c = classify(
            Some("The behir makes two attacks: one with its bite and one to constrict."),
            &behir,
        );
        assert_eq!(c.shape, Shape::Literal(LiteralOverride::Behir));
        assert_eq!(pairs(&c).len(), 2);
    }

    #[test]
    fn pit_fiend_needs_its_override() {
        let fiend = catalog(&[
            ("Bite", 14, "4d6+8", AttackKind::Melee),
            ("Claw", 14, "2d8+8", AttackKind::Melee),
            ("Mace", 14, "2d6+8", AttackKind::Melee),
            ("Tail", 14, "3d10+8", AttackKind::Melee),
        ]);
        let c = classify(Some(LiteralOverride::PitFiend.spec().text), &fiend);
        assert_eq!(c.shape, Shape::Literal(LiteralOverride::PitFiend));
        assert_eq!(c.extraction.unwrap().count_sum(), 4);
    }

    #[test]
    fn unknown_text_falls_back_to_default() {
        let c = classify(
            Some("The beast flails wildly at anything nearby."),
            &beast(),
        );
        assert_eq!(c.shape, Shape::Default);
        assert_eq!(c.confidence(), Confidence::Approximate);
        assert!(c.extraction.is_some());
    }

    #[test]
    fn unresolved_name_is_unknown_not_default() {
        let c = classify(
            Some("The bear makes two attacks: one with its bite and one with its tentacle."),
            &beast(),
        );
        assert_eq!(c.shape, Shape::TwoNamedCounts);
        assert!(c.extraction.is_none());
        assert_eq!(c.dpr(10.0, RollMode::Normal), None);
        assert!(c.issues.iter().any(Issue::is_error));
    }

    #[test]
    fn failed_candidate_yields_to_a_later_rule() {
        // the category rule fails (no ranged attacks at all) so the named
        // reading of the same text is tried next
        let archer = catalog(&[("Ranged", 4, "1d8+2", AttackKind::Melee)]);
        let c = classify(Some("The archer makes two ranged attacks."), &archer);
        assert_eq!(c.shape, Shape::Named);
        assert_eq!(pairs(&c), vec![(2, "Ranged".into())]);
    }

    #[test]
    fn spell_level_routine_is_unknown() {
        let c = classify(
            Some("The aberration makes a number of attacks equal to half this spell's level (rounded down)."),
            &beast(),
        );
        assert_eq!(c.shape, Shape::ByHalfSpellLevel);
        assert_eq!(c.dpr(10.0, RollMode::Normal), None);
    }

    #[test]
    fn inconsistent_total_still_classifies() {
        let c = classify(
            Some("The bear makes three attacks: one with its bite and one with its claws."),
            &beast(),
        );
        assert_eq!(c.shape, Shape::TwoNamedCounts);
        assert!(c.extraction.is_some());
        assert_eq!(c.issues.len(), 1);
        assert!(!c.issues[0].is_error());
    }

    #[test]
    fn article_counts_mean_one() {
        let c = classify(
            Some("The beast makes a bite attack and two claw attacks."),
            &beast(),
        );
        assert_eq!(c.shape, Shape::NamedPairAttacks);
        assert_eq!(pairs(&c), vec![(1, "Bite".into()), (2, "Claws".into())]);

        let c = classify(Some("The beast makes an attack with its tail."), &beast());
        assert_eq!(c.shape, Shape::WithNamed);
        assert_eq!(pairs(&c), vec![(1, "Tail".into())]);
    }

    #[test]
    fn huge_counts_are_unknown_without_panicking() {
        let c = classify(
            Some(
                "The beast makes 5 attacks: 4000000000 with its bite and 4000000000 with its claws.",
            ),
            &beast(),
        );
        assert_eq!(c.shape, Shape::TwoNamedCounts);
        assert!(c.extraction.is_none());
        assert_eq!(c.dpr(10.0, RollMode::Normal), None);
        assert!(
            c.issues
                .iter()
                .all(|i| matches!(i, Issue::UnknownCount { word, .. } if word == "4000000000"))
        );

        let c = classify(Some("The beast makes 4294967295 attacks."), &beast());
        assert_eq!(c.shape, Shape::Any);
        assert!(c.extraction.is_none());
    }

    /// Hit bonus and damage rank these two differently, so the best single
    /// attack changes with AC.
    fn duelist() -> AttackCatalog {
        catalog(&[
            ("Dagger", 9, "1d4+2", AttackKind::Melee),
            ("Maul", 2, "2d6+4", AttackKind::Melee),
        ])
    }

    fn best_expected(catalog: &AttackCatalog, ac: f64) -> f64 {
        catalog
            .iter()
            .map(|a| a.expected_damage(ac, RollMode::Normal))
            .fold(0.0, f64::max)
    }

    #[test]
    fn best_single_attack_fallback_values() {
        let duelist = duelist();
        let absent = classify(None, &duelist);
        let unknown = classify(Some("The duelist dances around its foe."), &duelist);
        assert_eq!(unknown.shape, Shape::Default);

        // AC 15: Maul 0.40 * 11 beats Dagger 0.75 * 4.5
        let at_15 = absent.dpr(15.0, RollMode::Normal).unwrap();
        assert!((at_15 - 4.4).abs() < 1e-9);
        // AC 20: Dagger 0.50 * 4.5 beats Maul 0.15 * 11
        let at_20 = absent.dpr(20.0, RollMode::Normal).unwrap();
        assert!((at_20 - 2.25).abs() < 1e-9);

        for ac in [5.0, 10.0, 15.0, 16.5, 20.0, 25.0] {
            let best = best_expected(&duelist, ac);
            assert!((absent.dpr(ac, RollMode::Normal).unwrap() - best).abs() < 1e-9);
            assert!((unknown.dpr(ac, RollMode::Normal).unwrap() - best).abs() < 1e-9);
        }
    }

    #[test]
    fn any_shape_repeats_the_best_attack() {
        let duelist = duelist();
        let c = classify(Some("The duelist makes three attacks."), &duelist);
        assert_eq!(c.shape, Shape::Any);
        for ac in [10.0, 15.0, 20.0] {
            let expected = 3.0 * best_expected(&duelist, ac);
            assert!((c.dpr(ac, RollMode::Normal).unwrap() - expected).abs() < 1e-9);
        }
        assert!((c.dpr(15.0, RollMode::Normal).unwrap() - 13.2).abs() < 1e-9);
    }

    #[test]
    fn classifications_carry_the_alias_table_version() {
        let catalog = beast();
        for text in [
            None,
            Some("The beast flails wildly at anything nearby."),
            Some("The bear makes two attacks: one with its bite and one with its tentacle."),
            Some("The bear makes two attacks: one with its bite and one with its claws."),
        ] {
            assert_eq!(classify(text, &catalog).alias_table_version, ALIAS_TABLE_VERSION);
        }
    }

    #[test]
    fn classification_is_idempotent() {
        let text = Some("The wolf makes two attacks with its claws and one with its bite.");
        let catalog = beast();
        assert_eq!(classify(text, &catalog), classify(text, &catalog));
    }

    #[test]
    fn empty_catalog_gives_unknown_without_issues() {
        let c = classify(Some("The bear makes two attacks."), &AttackCatalog::default());
        assert_eq!(c.shape, Shape::Any);
        assert!(c.extraction.is_none());
        assert!(c.issues.is_empty());
    }
}
