pub mod calorie;
pub mod catalog;
pub mod filter;
pub mod fuzzy;
pub mod plan;
pub mod selector;
pub mod transform;

pub use calorie::{
    CalorieFeatures, CaloriePredictor, MifflinStJeor, estimate_intake, goal_adjusted_target,
};
pub use catalog::{Catalog, MealCandidate};
pub use filter::{FilteredPool, PoolSource, filter_pool};
pub use fuzzy::{FuzzyFactors, compute_fuzzy_factors};
pub use plan::{DailyPlan, Recommender, SlotMeals, generate_daily_plan};
pub use selector::{
    Jitter, NoJitter, PlanItem, RandomJitter, SlotBounds, pick_meals_for_slot, slot_bounds,
};
