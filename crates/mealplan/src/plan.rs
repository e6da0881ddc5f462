use crate::catalog::Catalog;
use crate::filter::{FilteredPool, filter_pool};
use crate::fuzzy::{FuzzyFactors, compute_fuzzy_factors};
use crate::selector::{Jitter, PlanItem, RandomJitter, pick_meals_for_slot};
use fitaxis_shared::mealplan::MealSlot;
use fitaxis_shared::user::UserProfile;
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::fmt;
use strum::VariantArray;

/// Fixed guidance appended to every plan.
pub const GUIDANCE_NOTE: &str = "\
🍲 If any food is unavailable, replace with its nearest alternative (e.g., tofu ↔ paneer, chicken ↔ soybeans).
🌶️ Avoid spicy and oily food; use minimal oil, mild spices; onion, tomato, and garlic allowed.
🥗 You may freely add fruits and vegetables to boost fiber, vitamins, and minerals.
💧 Drink sufficient water throughout the day.
📱 If calories still feel insufficient/excessive, check App (Supplement section) for portion guidance.
✅ Stay consistent – stick with the same plan rather than switching frequently.";

#[derive(Debug, Clone, PartialEq)]
pub struct SlotMeals {
    pub slot: MealSlot,
    pub items: Vec<PlanItem>,
}

/// One day of meals, rescaled to the calorie target.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyPlan {
    /// Always breakfast, lunch, dinner, snacks
    pub meals: Vec<SlotMeals>,
    /// Truncated calorie target, not a re-sum of the items.
    pub total_calories: i64,
    pub note: String,
}

impl DailyPlan {
    pub fn items(&self, slot: MealSlot) -> &[PlanItem] {
        self.meals
            .iter()
            .find(|m| m.slot == slot)
            .map(|m| m.items.as_slice())
            .unwrap_or_default()
    }

    pub fn all_items(&self) -> impl Iterator<Item = &PlanItem> {
        self.meals.iter().flat_map(|m| m.items.iter())
    }

    /// Sum of the rescaled item calories. May differ from `total_calories`
    /// by the per-item truncation.
    pub fn item_calories(&self) -> u64 {
        self.all_items().map(|i| u64::from(i.calories)).sum()
    }

    pub fn render_text(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for DailyPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for meals in &self.meals {
            writeln!(f, "{}:", meals.slot.title())?;
            for item in &meals.items {
                writeln!(f, "  - {} → {}, {} kcal", item.name, item.quantity, item.calories)?;
            }
        }
        writeln!(f, "Total Calories: {} kcal", self.total_calories)?;
        writeln!(f)?;
        write!(f, "{}", self.note)
    }
}

impl Serialize for DailyPlan {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.meals.len() + 2))?;
        for meals in &self.meals {
            map.serialize_entry(meals.slot.title(), &meals.items)?;
        }
        map.serialize_entry("total_calories", &self.total_calories)?;
        map.serialize_entry("note", &self.note)?;
        map.end()
    }
}

/// Rescales every item so the day lands on `calorie_target`.
///
/// Quantities keep their previous factor, so a selector quantity of
/// `"1.00 × 2 pcs"` becomes `"1.07 × 1.00 × 2 pcs"`. A plan without any
/// calories is left as is.
fn adjust_to_target(meals: &mut [SlotMeals], calorie_target: f64, fuzzy: &FuzzyFactors) {
    let total: f64 = meals
        .iter()
        .flat_map(|m| m.items.iter())
        .map(|i| f64::from(i.calories))
        .sum::<f64>()
        * fuzzy.scale;

    if total <= 0.0 {
        tracing::debug!("plan has no calories to rescale");
        return;
    }

    let scale_factor = calorie_target / total.max(1e-6);
    let final_scale = fuzzy.scale * scale_factor;

    tracing::debug!(total, scale_factor, final_scale, "rescaling plan");

    for item in meals.iter_mut().flat_map(|m| m.items.iter_mut()) {
        item.calories = (f64::from(item.calories) * final_scale) as u32;
        item.quantity = format!("{final_scale:.2} × {}", item.quantity);
    }
}

/// Plan generator bound to a catalog and a jitter source.
///
/// Each instance owns its jitter, so concurrent requests should each build
/// their own recommender over the shared catalog.
pub struct Recommender<'a, J = RandomJitter> {
    catalog: &'a Catalog,
    jitter: J,
}

impl<'a> Recommender<'a, RandomJitter> {
    pub fn new(catalog: &'a Catalog) -> Self {
        Self::with_jitter(catalog, RandomJitter::default())
    }

    pub fn seeded(catalog: &'a Catalog, seed: Option<u64>) -> Self {
        Self::with_jitter(catalog, RandomJitter::from_seed(seed))
    }
}

impl<'a, J: Jitter> Recommender<'a, J> {
    pub fn with_jitter(catalog: &'a Catalog, jitter: J) -> Self {
        Self { catalog, jitter }
    }

    pub fn filter_pool(&self, profile: &UserProfile, slot: MealSlot) -> FilteredPool {
        filter_pool(self.catalog, profile, slot)
    }

    pub fn pick_meals_for_slot(
        &mut self,
        profile: &UserProfile,
        slot: MealSlot,
        calorie_target: f64,
        fuzzy: &FuzzyFactors,
    ) -> Vec<PlanItem> {
        pick_meals_for_slot(
            self.catalog,
            profile,
            slot,
            calorie_target,
            fuzzy,
            &mut self.jitter,
        )
    }

    /// Builds a full day for `profile`. Infallible for any profile and target.
    pub fn generate_daily_plan(&mut self, profile: &UserProfile, calorie_target: f64) -> DailyPlan {
        let fuzzy = compute_fuzzy_factors(profile, calorie_target);

        let mut meals: Vec<SlotMeals> = MealSlot::VARIANTS
            .iter()
            .map(|&slot| SlotMeals {
                slot,
                items: self.pick_meals_for_slot(profile, slot, calorie_target, &fuzzy),
            })
            .collect();

        adjust_to_target(&mut meals, calorie_target, &fuzzy);

        tracing::debug!(
            calorie_target,
            goal = %profile.fitness_goal,
            items = meals.iter().map(|m| m.items.len()).sum::<usize>(),
            "daily plan generated"
        );

        DailyPlan {
            meals,
            total_calories: calorie_target.trunc() as i64,
            note: GUIDANCE_NOTE.to_owned(),
        }
    }
}

/// Daily plan over the built-in catalog with OS-seeded jitter.
pub fn generate_daily_plan(profile: &UserProfile, calorie_target: f64) -> DailyPlan {
    Recommender::new(Catalog::builtin()).generate_daily_plan(profile, calorie_target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selector::NoJitter;
    use fitaxis_shared::user::{DietType, FitnessGoal};

    #[test]
    fn test_slots_in_fixed_order() {
        let plan = generate_daily_plan(&UserProfile::default(), 2000.0);

        let slots: Vec<MealSlot> = plan.meals.iter().map(|m| m.slot).collect();
        assert_eq!(
            slots,
            vec![MealSlot::Breakfast, MealSlot::Lunch, MealSlot::Dinner, MealSlot::Snacks]
        );
        assert_eq!(plan.total_calories, 2000);
        assert_eq!(plan.note, GUIDANCE_NOTE);

        // Maintain caps every slot at two items.
        for slot in slots {
            assert_eq!(plan.items(slot).len(), 2, "{slot}");
        }
    }

    #[test]
    fn test_total_is_truncated_target() {
        let plan = generate_daily_plan(&UserProfile::default(), 1850.9);
        assert_eq!(plan.total_calories, 1850);
    }

    #[test]
    fn test_items_land_near_target() {
        let catalog = Catalog::builtin();
        let profile = UserProfile::default().with_goal(FitnessGoal::Cutting);
        let plan = Recommender::with_jitter(catalog, NoJitter).generate_daily_plan(&profile, 1700.0);

        // Each item loses at most one kcal to truncation, twice.
        let items = plan.all_items().count() as u64;
        let sum = plan.item_calories();
        assert!(sum <= 1700 && sum + 2 * items >= 1700, "sum {sum}");
    }

    #[test]
    fn test_quantity_compounds_scale() {
        let mut recommender = Recommender::with_jitter(Catalog::builtin(), NoJitter);
        let plan = recommender.generate_daily_plan(&UserProfile::default(), 2000.0);

        for item in plan.all_items() {
            let (factor, rest) = item.quantity.split_once(" × ").expect("scaled quantity");
            assert!(factor.parse::<f64>().is_ok(), "{}", item.quantity);
            assert!(rest.starts_with("1.00 × "), "{}", item.quantity);
        }
    }

    #[test]
    fn test_no_jitter_is_deterministic() {
        let profile = UserProfile::default().with_diet(DietType::Vegetarian);
        let a = Recommender::with_jitter(Catalog::builtin(), NoJitter).generate_daily_plan(&profile, 2200.0);
        let b = Recommender::with_jitter(Catalog::builtin(), NoJitter).generate_daily_plan(&profile, 2200.0);
        assert_eq!(a, b);

        let c = Recommender::seeded(Catalog::builtin(), Some(9)).generate_daily_plan(&profile, 2200.0);
        let d = Recommender::seeded(Catalog::builtin(), Some(9)).generate_daily_plan(&profile, 2200.0);
        assert_eq!(c, d);
    }

    #[test]
    fn test_render_text() {
        let plan = Recommender::with_jitter(Catalog::builtin(), NoJitter)
            .generate_daily_plan(&UserProfile::default(), 2000.0);
        let text = plan.render_text();

        assert!(text.starts_with("Breakfast:\n  - "));
        assert!(text.contains("\nSnacks:\n"));
        assert!(text.contains("Total Calories: 2000 kcal"));
        assert!(text.ends_with(GUIDANCE_NOTE));
    }

    #[test]
    fn test_json_uses_display_keys() -> anyhow::Result<()> {
        let plan = Recommender::with_jitter(Catalog::builtin(), NoJitter)
            .generate_daily_plan(&UserProfile::default(), 2000.0);
        let value = serde_json::to_value(&plan)?;

        for key in ["Breakfast", "Lunch", "Dinner", "Snacks"] {
            assert!(value[key].is_array(), "missing {key}");
        }
        assert_eq!(value["total_calories"], 2000);
        assert!(value["Breakfast"][0]["calories"].is_u64());

        Ok(())
    }
}
