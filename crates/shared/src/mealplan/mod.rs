use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString, VariantArray};

/// Meal occasion of the day. `VARIANTS` is the order plans are assembled in.
#[derive(
    EnumString,
    Display,
    AsRefStr,
    VariantArray,
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[serde(rename_all = "snake_case")]
pub enum MealSlot {
    Breakfast,
    Lunch,
    Dinner,
    #[strum(to_string = "snacks", serialize = "snack")]
    Snacks,
}

impl MealSlot {
    /// Display-cased key used in rendered plans.
    pub fn title(&self) -> &'static str {
        match self {
            MealSlot::Breakfast => "Breakfast",
            MealSlot::Lunch => "Lunch",
            MealSlot::Dinner => "Dinner",
            MealSlot::Snacks => "Snacks",
        }
    }

    /// Fraction of the daily calorie target allotted to this slot.
    pub fn share(&self) -> f64 {
        match self {
            MealSlot::Breakfast => 0.25,
            MealSlot::Lunch => 0.35,
            MealSlot::Dinner => 0.25,
            MealSlot::Snacks => 0.15,
        }
    }

    pub fn index(&self) -> usize {
        match self {
            MealSlot::Breakfast => 0,
            MealSlot::Lunch => 1,
            MealSlot::Dinner => 2,
            MealSlot::Snacks => 3,
        }
    }
}

/// Nutrition and preparation labels attached to catalog entries.
#[derive(
    EnumString,
    Display,
    AsRefStr,
    VariantArray,
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[serde(rename_all = "snake_case")]
pub enum Tag {
    Protein,
    Carb,
    Dairy,
    Soy,
    LowSalt,
    LowSpice,
    Fiber,
    HealthyFat,
    Clean,
    Antioxidant,
    AntiInflammatory,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use strum::VariantArray;

    #[test]
    fn test_slot_shares_sum_to_one() {
        let total: f64 = MealSlot::VARIANTS.iter().map(|s| s.share()).sum();
        assert!((total - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_slot_parsing_and_titles() {
        assert_eq!(MealSlot::from_str("Snack").unwrap(), MealSlot::Snacks);
        assert_eq!(MealSlot::from_str("DINNER").unwrap(), MealSlot::Dinner);
        assert_eq!(MealSlot::Snacks.to_string(), "snacks");
        assert_eq!(MealSlot::Lunch.title(), "Lunch");
        assert_eq!(
            MealSlot::VARIANTS,
            &[
                MealSlot::Breakfast,
                MealSlot::Lunch,
                MealSlot::Dinner,
                MealSlot::Snacks
            ]
        );
    }

    #[test]
    fn test_tag_parsing_is_case_insensitive() {
        assert_eq!(Tag::from_str("LOW_SALT").unwrap(), Tag::LowSalt);
        assert_eq!(Tag::from_str("healthy_fat").unwrap(), Tag::HealthyFat);
        assert_eq!(Tag::AntiInflammatory.as_ref(), "anti_inflammatory");
        assert!(Tag::from_str("crunchy").is_err());
    }
}
