use crate::catalog::{Catalog, MealCandidate};
use crate::filter::filter_pool;
use crate::fuzzy::FuzzyFactors;
use fitaxis_shared::mealplan::{MealSlot, Tag};
use fitaxis_shared::user::{FitnessGoal, UserProfile};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

/// Upper bound (exclusive) of the tie-break jitter added to every score.
pub const JITTER_MAX: f64 = 0.05;

pub const NO_SUITABLE_MEAL: &str = "No suitable meal";

/// Source of the per-candidate tie-break term.
pub trait Jitter {
    /// Returns a value in `[0, JITTER_MAX)`.
    fn next_jitter(&mut self) -> f64;
}

impl<J: Jitter + ?Sized> Jitter for &mut J {
    fn next_jitter(&mut self) -> f64 {
        (**self).next_jitter()
    }
}

/// Uniform jitter drawn from a [`StdRng`].
#[derive(Debug, Clone)]
pub struct RandomJitter {
    rng: StdRng,
}

impl RandomJitter {
    /// Reproducible jitter: the same seed yields the same sequence.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn from_seed(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::seeded(seed),
            None => Self::default(),
        }
    }
}

impl Default for RandomJitter {
    fn default() -> Self {
        Self {
            rng: StdRng::from_rng(&mut rand::rng()),
        }
    }
}

impl Jitter for RandomJitter {
    fn next_jitter(&mut self) -> f64 {
        self.rng.random_range(0.0..JITTER_MAX)
    }
}

/// Always zero, ordering depends on the score alone.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoJitter;

impl Jitter for NoJitter {
    fn next_jitter(&mut self) -> f64 {
        0.0
    }
}

/// Per-goal selection policy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GoalPolicy {
    pub tolerance: f64,
    /// Item caps indexed by [`MealSlot::index`]
    pub caps: [usize; 4],
    pub widen: f64,
}

impl GoalPolicy {
    pub fn max_items(&self, slot: MealSlot) -> usize {
        self.caps[slot.index()]
    }
}

pub fn goal_policy(goal: FitnessGoal) -> GoalPolicy {
    match goal {
        FitnessGoal::Bulking => GoalPolicy {
            tolerance: 0.25,
            caps: [2, 2, 2, 3],
            widen: 1.40,
        },
        FitnessGoal::Cutting | FitnessGoal::WeightLoss => GoalPolicy {
            tolerance: 0.20,
            caps: [2, 2, 2, 1],
            widen: 1.00,
        },
        FitnessGoal::Maintain => GoalPolicy {
            tolerance: 0.15,
            caps: [2, 2, 2, 2],
            widen: 1.10,
        },
    }
}

/// Calorie window for a slot. Informational, never used to admit or reject
/// a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SlotBounds {
    pub lo: f64,
    pub hi: f64,
}

pub fn slot_bounds(
    calorie_target: f64,
    slot: MealSlot,
    goal: FitnessGoal,
    fuzzy: &FuzzyFactors,
) -> SlotBounds {
    let policy = goal_policy(goal);
    let base = calorie_target * slot.share();
    let widen = if goal.is_bulking() { policy.widen } else { 1.0 };

    SlotBounds {
        lo: base * (1.0 - policy.tolerance) * fuzzy.scale,
        hi: base * (1.0 + policy.tolerance) * widen * fuzzy.scale,
    }
}

/// One chosen meal as shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlanItem {
    pub name: String,
    pub quantity: String,
    pub calories: u32,
}

impl PlanItem {
    /// Renders a candidate at `factor`; calories are truncated toward zero.
    pub fn scaled(meal: &MealCandidate, factor: f64) -> Self {
        Self {
            name: meal.name.clone(),
            quantity: format!("{factor:.2} × {}", meal.base_quantity),
            calories: (meal.base_calories * factor) as u32,
        }
    }

    pub fn no_suitable_meal() -> Self {
        Self {
            name: NO_SUITABLE_MEAL.to_owned(),
            quantity: String::new(),
            calories: 0,
        }
    }

    pub fn is_sentinel(&self) -> bool {
        self.name == NO_SUITABLE_MEAL && self.calories == 0
    }
}

/// Deterministic part of a candidate's score; lower ranks first.
pub fn base_score(meal: &MealCandidate, fuzzy: &FuzzyFactors) -> f64 {
    let sort_key = if meal.has_tag(Tag::Protein) {
        0.0
    } else {
        1.0 - fuzzy.protein_bias
    };

    let mut penalty = 0.0;
    if !meal.has_tag(Tag::LowSalt) {
        penalty += 0.6 * fuzzy.salt_caution;
    }
    if meal.has_tag(Tag::Carb) {
        penalty += 0.5 * fuzzy.carb_caution;
    }
    if meal.has_tag(Tag::Dairy) || meal.has_tag(Tag::HealthyFat) {
        penalty += 0.4 * fuzzy.fat_caution;
    }
    if meal.has_tag(Tag::Soy) {
        penalty += 0.6 * fuzzy.soy_caution;
    }
    if !meal.has_tag(Tag::LowSpice) {
        penalty += 0.5 * fuzzy.inflammation_caution;
    }

    sort_key + penalty
}

/// Scores `pool` and keeps the `max_items` best, rendered at factor 1.0.
pub fn rank_candidates(
    pool: &[MealCandidate],
    max_items: usize,
    fuzzy: &FuzzyFactors,
    jitter: &mut impl Jitter,
) -> Vec<PlanItem> {
    let mut scored: Vec<(f64, &MealCandidate)> = pool
        .iter()
        .map(|meal| (base_score(meal, fuzzy) + jitter.next_jitter(), meal))
        .collect();

    // Stable sort keeps catalog order for exact ties.
    scored.sort_by(|a, b| a.0.total_cmp(&b.0));

    scored
        .into_iter()
        .take(max_items)
        .map(|(_, meal)| PlanItem::scaled(meal, 1.0))
        .collect()
}

/// Chooses the meals for one slot.
///
/// Never fails: an empty pool after every fallback yields a single
/// zero-calorie [`NO_SUITABLE_MEAL`] item.
pub fn pick_meals_for_slot(
    catalog: &Catalog,
    profile: &UserProfile,
    slot: MealSlot,
    calorie_target: f64,
    fuzzy: &FuzzyFactors,
    jitter: &mut impl Jitter,
) -> Vec<PlanItem> {
    let goal = profile.fitness_goal;
    let bounds = slot_bounds(calorie_target, slot, goal, fuzzy);
    let max_items = goal_policy(goal).max_items(slot);

    tracing::debug!(%slot, lo = bounds.lo, hi = bounds.hi, max_items, "slot bounds");

    let pool = filter_pool(catalog, profile, slot);
    if pool.is_empty() {
        tracing::warn!(%slot, "no suitable meal for slot");
        return vec![PlanItem::no_suitable_meal()];
    }

    rank_candidates(&pool.candidates, max_items, fuzzy, jitter)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fuzzy::compute_fuzzy_factors;
    use fitaxis_shared::user::DietType;

    struct FixedJitter(f64);

    impl Jitter for FixedJitter {
        fn next_jitter(&mut self) -> f64 {
            self.0
        }
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_goal_policies() {
        assert_eq!(goal_policy(FitnessGoal::Bulking).max_items(MealSlot::Snacks), 3);
        assert_eq!(goal_policy(FitnessGoal::Cutting).max_items(MealSlot::Snacks), 1);
        assert_eq!(goal_policy(FitnessGoal::WeightLoss).max_items(MealSlot::Snacks), 1);
        assert_eq!(goal_policy(FitnessGoal::Maintain).max_items(MealSlot::Snacks), 2);

        for goal in [FitnessGoal::Bulking, FitnessGoal::Cutting, FitnessGoal::Maintain] {
            assert_eq!(goal_policy(goal).max_items(MealSlot::Lunch), 2);
        }
    }

    #[test]
    fn test_slot_bounds() {
        let neutral = FuzzyFactors::default();

        let maintain = slot_bounds(2000.0, MealSlot::Lunch, FitnessGoal::Maintain, &neutral);
        assert!(approx(maintain.lo, 700.0 * 0.85));
        // widen only applies when bulking
        assert!(approx(maintain.hi, 700.0 * 1.15));

        let profile = UserProfile::default().with_goal(FitnessGoal::Bulking);
        let fuzzy = compute_fuzzy_factors(&profile, 2000.0);
        let bulking = slot_bounds(2000.0, MealSlot::Breakfast, FitnessGoal::Bulking, &fuzzy);
        assert!(approx(bulking.lo, 500.0 * 0.75 * 1.05));
        assert!(approx(bulking.hi, 500.0 * 1.25 * 1.40 * 1.05));
    }

    #[test]
    fn test_base_score_penalties() {
        let meal = MealCandidate::new("Rice Bowl", MealSlot::Lunch, DietType::Vegetarian, "1 bowl", 400.0)
            .with_tags([Tag::Carb, Tag::Dairy, Tag::Soy]);
        let fuzzy = FuzzyFactors {
            protein_bias: 0.3,
            salt_caution: 0.6,
            carb_caution: 0.5,
            fat_caution: 0.45,
            inflammation_caution: 0.6,
            soy_caution: 0.6,
            ..FuzzyFactors::default()
        };

        let expected = 0.7 + 0.6 * 0.6 + 0.5 * 0.5 + 0.4 * 0.45 + 0.6 * 0.6 + 0.5 * 0.6;
        assert!(approx(base_score(&meal, &fuzzy), expected));

        let protein = MealCandidate::new("Eggs", MealSlot::Breakfast, DietType::NonVegetarian, "2", 140.0)
            .with_tags([Tag::Protein, Tag::LowSalt, Tag::LowSpice]);
        assert!(approx(base_score(&protein, &fuzzy), 0.0));
    }

    #[test]
    fn test_rank_is_deterministic_without_jitter() {
        let pool: Vec<MealCandidate> = Catalog::builtin().for_slot(MealSlot::Breakfast).cloned().collect();
        let fuzzy = FuzzyFactors::default();

        let first = rank_candidates(&pool, 2, &fuzzy, &mut NoJitter);
        let second = rank_candidates(&pool, 2, &fuzzy, &mut FixedJitter(0.01));

        assert_eq!(first, second);
        assert_eq!(first.len(), 2);
        assert!(first.iter().all(|item| item.quantity.starts_with("1.00 × ")));
    }

    #[test]
    fn test_protein_ranks_first() {
        let pool = vec![
            MealCandidate::new("Poha", MealSlot::Breakfast, DietType::Vegetarian, "1 plate", 250.0)
                .with_tags([Tag::Carb]),
            MealCandidate::new("Moong Chilla", MealSlot::Breakfast, DietType::Vegetarian, "2 pcs", 280.5)
                .with_tags([Tag::Protein]),
        ];

        let items = rank_candidates(&pool, 1, &FuzzyFactors::default(), &mut NoJitter);

        assert_eq!(
            items,
            vec![PlanItem {
                name: "Moong Chilla".to_owned(),
                quantity: "1.00 × 2 pcs".to_owned(),
                calories: 280,
            }]
        );
    }

    #[test]
    fn test_seeded_jitter_is_reproducible() {
        let mut a = RandomJitter::seeded(7);
        let mut b = RandomJitter::seeded(7);

        for _ in 0..32 {
            let value = a.next_jitter();
            assert!((0.0..JITTER_MAX).contains(&value));
            assert_eq!(value.to_bits(), b.next_jitter().to_bits());
        }
    }

    #[test]
    fn test_sentinel_when_nothing_survives() -> anyhow::Result<()> {
        let catalog = Catalog::new(vec![
            MealCandidate::new("Chicken Curry", MealSlot::Dinner, DietType::NonVegetarian, "200g", 350.0)
                .with_tags([Tag::Protein]),
        ])?;
        let profile = UserProfile::default().with_diet(DietType::Vegetarian);
        let fuzzy = compute_fuzzy_factors(&profile, 2000.0);

        let items = pick_meals_for_slot(&catalog, &profile, MealSlot::Breakfast, 2000.0, &fuzzy, &mut NoJitter);

        assert_eq!(items, vec![PlanItem::no_suitable_meal()]);
        assert!(items[0].is_sentinel());

        Ok(())
    }

    #[test]
    fn test_pick_respects_caps() {
        let catalog = Catalog::builtin();
        let profile = UserProfile::default().with_goal(FitnessGoal::Bulking);
        let fuzzy = compute_fuzzy_factors(&profile, 2500.0);
        let mut jitter = RandomJitter::seeded(42);

        let snacks = pick_meals_for_slot(catalog, &profile, MealSlot::Snacks, 2500.0, &fuzzy, &mut jitter);
        let lunch = pick_meals_for_slot(catalog, &profile, MealSlot::Lunch, 2500.0, &fuzzy, &mut jitter);

        assert_eq!(snacks.len(), 3);
        assert_eq!(lunch.len(), 2);
    }
}
