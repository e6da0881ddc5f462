//! Condition-safe rewrites of a slot's candidate pool.
//!
//! Each medical condition owns one standalone transform. They run in the
//! fixed order of [`CHAIN`], so later transforms see the names and calories
//! produced by earlier ones.

use crate::catalog::MealCandidate;
use fitaxis_shared::mealplan::{MealSlot, Tag};
use fitaxis_shared::user::{DietType, MedicalCondition};
use std::collections::BTreeSet;

pub type TransformFn = fn(Vec<MealCandidate>, MealSlot) -> Vec<MealCandidate>;

pub struct ConditionTransform {
    pub condition: MedicalCondition,
    pub apply: TransformFn,
}

pub const CHAIN: [ConditionTransform; 5] = [
    ConditionTransform {
        condition: MedicalCondition::Diabetes,
        apply: diabetes_safe,
    },
    ConditionTransform {
        condition: MedicalCondition::BloodPressure,
        apply: blood_pressure_safe,
    },
    ConditionTransform {
        condition: MedicalCondition::FattyLiver,
        apply: fatty_liver_safe,
    },
    ConditionTransform {
        condition: MedicalCondition::Asthma,
        apply: asthma_safe,
    },
    ConditionTransform {
        condition: MedicalCondition::Thyroid,
        apply: thyroid_safe,
    },
];

pub const FATTY_LIVER_SOUP: &str = "Lauki-Turmeric Soup + Ginger";
pub const ASTHMA_SOUP: &str = "Moong Dal Soup + Lemon + Ginger";

/// Runs every transform whose condition is present, in chain order.
pub fn apply_chain(
    candidates: Vec<MealCandidate>,
    slot: MealSlot,
    conditions: &BTreeSet<MedicalCondition>,
) -> Vec<MealCandidate> {
    CHAIN
        .iter()
        .filter(|t| conditions.contains(&t.condition))
        .fold(candidates, |pool, transform| {
            let before = pool.len();
            let pool = (transform.apply)(pool, slot);
            tracing::trace!(
                condition = %transform.condition,
                %slot,
                before,
                after = pool.len(),
                "condition transform applied"
            );
            pool
        })
}

fn rename(mut pool: Vec<MealCandidate>, table: &[(&str, &str)]) -> Vec<MealCandidate> {
    for meal in pool.iter_mut() {
        if let Some((_, to)) = table.iter().find(|(from, _)| *from == meal.name) {
            meal.name = (*to).to_owned();
        }
    }

    pool
}

fn scale_where(
    mut pool: Vec<MealCandidate>,
    factor: f64,
    predicate: impl Fn(&MealCandidate) -> bool,
) -> Vec<MealCandidate> {
    for meal in pool.iter_mut().filter(|m| predicate(m)) {
        meal.base_calories *= factor;
    }

    pool
}

fn remove_matching(pool: Vec<MealCandidate>, keywords: &[&str]) -> Vec<MealCandidate> {
    pool.into_iter()
        .filter(|m| !m.name_matches(keywords))
        .collect()
}

/// Swaps white rice and plain rotis for low-GI staples, keeps dairy unsweetened.
pub fn diabetes_safe(pool: Vec<MealCandidate>, _slot: MealSlot) -> Vec<MealCandidate> {
    let pool = rename(
        pool,
        &[
            ("Rajma + Rice", "Rajma + Brown Rice"),
            ("Lauki Chana Dal + Rice", "Lauki Chana Dal + Brown Rice"),
            ("Tofu + Rice + Veg Curry", "Tofu + Millets + Veg Curry"),
            (
                "Boiled Chicken + Rice + Veggies",
                "Boiled Chicken + Brown Rice + Veggies",
            ),
            ("Masoor Dal + Rice + Salad", "Masoor Dal + Brown Rice + Salad"),
            ("Paneer Bhurji + Rotis", "Paneer Bhurji + Multigrain Rotis"),
            ("Moong Dal + Roti + Salad", "Moong Dal + Multigrain Roti + Salad"),
            ("Curd + Roti + Sabzi", "Unsweetened Curd + Bajra Roti + Sabzi"),
            ("Oats + Milk + Raisins", "Oats + Milk + Almonds"),
        ],
    );

    let pool = scale_where(pool, 0.93, |m| {
        m.name_matches(&["brown rice", "millet", "multigrain", "bajra"])
    });

    scale_where(pool, 0.95, |m| {
        m.name_matches(&["unsweetened curd", "unsweetened yogurt"])
    })
}

/// Rebrands salty items as low-salt variants and nudges low-salt items down.
pub fn blood_pressure_safe(pool: Vec<MealCandidate>, _slot: MealSlot) -> Vec<MealCandidate> {
    let pool = rename(
        pool,
        &[
            ("Paneer Cubes", "Paneer Cubes (Low-Salt, Homemade)"),
            ("Chana Masala + Salad", "Chana + Salad (No Packaged Masala)"),
            (
                "Boiled Chicken + Rice + Veggies",
                "Boiled Chicken + Brown Rice + Veggies (Low-Salt)",
            ),
            ("Boiled Chicken + Veg Soup", "Chicken + Veg Soup (Low-Salt Broth)"),
            ("Greek Yogurt", "Unsweetened Yogurt (Low-Salt)"),
            (
                "Curd + Roti + Sabzi",
                "Unsweetened Curd + Bajra Roti + Sabzi (Low-Salt)",
            ),
        ],
    );

    scale_where(pool, 0.98, |m| m.has_tag(Tag::LowSalt))
}

/// Leaner dairy and soy, no fried or creamy dishes, plus a liver-supportive soup.
pub fn fatty_liver_safe(pool: Vec<MealCandidate>, slot: MealSlot) -> Vec<MealCandidate> {
    let pool = rename(
        pool,
        &[
            ("Paneer Paratha + Curd", "Oats Cheela + Mint Yogurt (Low-Fat)"),
            ("Paneer Bhurji + Rotis", "Moong Dal Bhurji + Multigrain Rotis"),
            ("Paneer Cubes", "Grilled Chicken Cubes (Lean)"),
            ("Soybeans (boiled)", "Steamed Moong Sprouts"),
            ("Boiled Soybeans", "Green Gram (Moong) Boiled"),
            ("Tofu + Veggies", "Tofu + Veggies (Grilled, Low Oil)"),
            ("Rajma + Rice", "Rajma + Brown Rice (Low Oil)"),
            ("Curd + Roti + Sabzi", "Plain Roti + Stir-Fried Veggies (Low Oil)"),
        ],
    );

    let pool = remove_matching(pool, &["fried", "deep", "butter", "cheese", "cream"]);
    let pool = scale_where(pool, 0.88, |m| {
        m.name_matches(&["paneer", "curd", "yogurt", "tofu", "soy"])
    });
    let pool = scale_where(pool, 1.02, |m| m.has_tag(Tag::Fiber));
    let mut pool = scale_where(pool, 1.01, |m| m.has_tag(Tag::LowSalt));

    pool.push(
        MealCandidate::new(FATTY_LIVER_SOUP, slot, DietType::Vegetarian, "250ml soup", 120.0)
            .with_tags([Tag::LowSpice, Tag::Fiber, Tag::Antioxidant])
            .with_notes([MedicalCondition::FattyLiver]),
    );

    pool
}

/// Drops mucus triggers (dairy, soy) and adds an anti-inflammatory soup.
pub fn asthma_safe(pool: Vec<MealCandidate>, slot: MealSlot) -> Vec<MealCandidate> {
    let pool = rename(
        pool,
        &[
            ("Soybeans (boiled)", "Steamed Moong Sprouts + Ginger"),
            ("Boiled Soybeans", "Green Moong + Carrot Mix"),
            ("Paneer Paratha + Curd", "Oats Cheela + Mint Chutney"),
            ("Greek Yogurt", "Almond Yogurt (Unsweetened)"),
            ("Paneer Cubes", "Roasted Chickpeas"),
            ("Tofu + Veggies", "Moong Dal + Veggies (Light Curry)"),
            ("Tofu + Rice + Veg Curry", "Moong Dal + Brown Rice + Veg Curry"),
        ],
    );

    let mut pool = remove_matching(pool, &["tofu", "soy", "paneer", "curd", "yogurt"]);

    pool.push(
        MealCandidate::new(ASTHMA_SOUP, slot, DietType::Vegetarian, "250ml soup", 150.0)
            .with_tags([Tag::LowSpice, Tag::Fiber, Tag::AntiInflammatory])
            .with_notes([MedicalCondition::Asthma]),
    );

    scale_where(pool, 0.98, |m| m.has_tag(Tag::LowSpice))
}

/// Anti-goitrogenic swaps: soy out, egg/chicken/lentils in.
pub fn thyroid_safe(pool: Vec<MealCandidate>, _slot: MealSlot) -> Vec<MealCandidate> {
    let pool = rename(
        pool,
        &[
            ("Tofu + Veggies", "Egg White Scramble + Veggies"),
            ("Boiled Soybeans", "Steamed Moong Sprouts + Lemon"),
            ("Soybeans (boiled)", "Green Moong + Cucumber"),
            ("Tofu + Rice + Veg Curry", "Boiled Chicken + Rice + Veg Curry"),
            ("Paneer Bhurji + Rotis", "Egg Bhurji + Multigrain Rotis"),
            ("Paneer Paratha + Curd", "Oats Cheela + Mint Yogurt (Low-Fat)"),
        ],
    );

    // Zeroed rather than deleted: the row stays but contributes nothing.
    let pool = scale_where(pool, 0.0, |m| m.name_matches(&["tofu", "soy"]));

    scale_where(pool, 1.04, |m| m.name_matches(&["egg", "chicken"]))
}
