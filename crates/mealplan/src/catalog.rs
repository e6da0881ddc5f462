use fitaxis_shared::mealplan::{MealSlot, Tag};
use fitaxis_shared::user::{Allergen, DietType, MedicalCondition};
use serde::Serialize;
use std::collections::BTreeSet;
use std::sync::LazyLock;

/// A meal candidate for one slot.
///
/// `name` is the display identity inside a slot; the same name may appear in
/// several slots with different servings. Entries are never mutated in place,
/// the condition-safe transforms derive new values from them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MealCandidate {
    pub name: String,
    pub slot: MealSlot,
    pub diet_class: DietType,
    pub base_quantity: String,
    /// Calories at scale factor 1.0
    pub base_calories: f64,
    pub tags: BTreeSet<Tag>,
    pub allergens: BTreeSet<Allergen>,
    /// Informational only, never used for exclusion
    pub medical_notes: BTreeSet<MedicalCondition>,
}

impl MealCandidate {
    pub fn new(
        name: impl Into<String>,
        slot: MealSlot,
        diet_class: DietType,
        base_quantity: impl Into<String>,
        base_calories: f64,
    ) -> Self {
        Self {
            name: name.into(),
            slot,
            diet_class,
            base_quantity: base_quantity.into(),
            base_calories,
            tags: BTreeSet::new(),
            allergens: BTreeSet::new(),
            medical_notes: BTreeSet::new(),
        }
    }

    pub fn with_tags(mut self, tags: impl IntoIterator<Item = Tag>) -> Self {
        self.tags.extend(tags);
        self
    }

    pub fn with_allergens(mut self, allergens: impl IntoIterator<Item = Allergen>) -> Self {
        self.allergens.extend(allergens);
        self
    }

    pub fn with_notes(mut self, notes: impl IntoIterator<Item = MedicalCondition>) -> Self {
        self.medical_notes.extend(notes);
        self
    }

    pub fn has_tag(&self, tag: Tag) -> bool {
        self.tags.contains(&tag)
    }

    pub fn is_vegetarian(&self) -> bool {
        self.diet_class == DietType::Vegetarian
    }

    /// Case-insensitive substring test of the name against any keyword.
    pub fn name_matches(&self, keywords: &[&str]) -> bool {
        let name = self.name.to_lowercase();
        keywords.iter().any(|k| name.contains(&k.to_lowercase()))
    }

    pub fn carries_any_allergen(&self, allergies: &BTreeSet<Allergen>) -> bool {
        !self.allergens.is_disjoint(allergies)
    }
}

struct Entry {
    name: &'static str,
    diet: DietType,
    quantity: &'static str,
    calories: f64,
    tags: &'static [Tag],
    allergens: &'static [Allergen],
    notes: &'static [MedicalCondition],
}

use Allergen::{Dairy as DAIRY, Gluten as GLUTEN};
use DietType::{NonVegetarian as NON_VEG, Vegetarian as VEG};
use MedicalCondition::{Asthma as ASTHMA, BloodPressure as BP, Diabetes as DIABETES};
use Tag::*;

const BREAKFAST: &[Entry] = &[
    Entry {
        name: "Egg White Omelet",
        diet: NON_VEG,
        quantity: "4 egg whites + 5g oil (~120g)",
        calories: 160.0,
        tags: &[Protein, LowSpice],
        allergens: &[],
        notes: &[],
    },
    Entry {
        name: "Boiled Eggs",
        diet: NON_VEG,
        quantity: "2 pcs (~100g)",
        calories: 140.0,
        tags: &[Protein, LowSpice],
        allergens: &[],
        notes: &[],
    },
    Entry {
        name: "Paneer Paratha + Curd",
        diet: VEG,
        quantity: "1 paratha (~100g) + 50g curd",
        calories: 350.0,
        tags: &[Carb, Protein, Dairy, LowSpice],
        allergens: &[GLUTEN, DAIRY],
        notes: &[],
    },
    Entry {
        name: "Tofu Scramble",
        diet: VEG,
        quantity: "100g tofu + onion + tomato",
        calories: 230.0,
        tags: &[Protein, Soy, LowSpice],
        allergens: &[],
        notes: &[],
    },
    Entry {
        name: "Sprout Salad",
        diet: VEG,
        quantity: "100g moong/chana sprouts",
        calories: 250.0,
        tags: &[Protein, Fiber, LowSalt, LowSpice],
        allergens: &[],
        notes: &[DIABETES, BP],
    },
    Entry {
        name: "Boiled Soybeans",
        diet: VEG,
        quantity: "100g soybeans",
        calories: 330.0,
        tags: &[Protein, Fiber, Soy, LowSpice],
        allergens: &[],
        notes: &[],
    },
    Entry {
        name: "Milk + Almonds",
        diet: VEG,
        quantity: "200ml milk + 5 almonds",
        calories: 180.0,
        tags: &[Dairy, HealthyFat, LowSpice],
        allergens: &[DAIRY],
        notes: &[],
    },
    Entry {
        name: "Oats + Milk + Raisins",
        diet: VEG,
        quantity: "40g oats + 200ml milk + 20g raisins",
        calories: 340.0,
        tags: &[Carb, Dairy, LowSpice],
        allergens: &[DAIRY, GLUTEN],
        notes: &[DIABETES],
    },
];

const LUNCH: &[Entry] = &[
    Entry {
        name: "Boiled Chicken + Rice + Veggies",
        diet: NON_VEG,
        quantity: "150g chicken + 150g rice + 100g veg",
        calories: 600.0,
        tags: &[Protein, Carb, Clean, LowSpice, LowSalt],
        allergens: &[],
        notes: &[],
    },
    Entry {
        name: "Paneer Bhurji + Rotis",
        diet: VEG,
        quantity: "100g paneer + 2 rotis (~120g)",
        calories: 520.0,
        tags: &[Protein, Carb, Dairy, LowSpice],
        allergens: &[GLUTEN, DAIRY],
        notes: &[],
    },
    Entry {
        name: "Rajma + Rice",
        diet: VEG,
        quantity: "150g rajma + 150g rice",
        calories: 550.0,
        tags: &[Protein, Carb, Fiber, LowSpice],
        allergens: &[],
        notes: &[],
    },
    Entry {
        name: "Tofu + Rice + Veg Curry",
        diet: VEG,
        quantity: "100g tofu + 150g rice + 100g veg curry",
        calories: 450.0,
        tags: &[Protein, Carb, Soy, LowSpice],
        allergens: &[],
        notes: &[],
    },
    Entry {
        name: "Moong Dal Khichdi + Curd",
        diet: VEG,
        quantity: "200g khichdi + 50g curd",
        calories: 420.0,
        tags: &[Protein, Carb, Dairy, LowSpice],
        allergens: &[DAIRY],
        notes: &[DIABETES],
    },
    Entry {
        name: "Chana Masala + Salad",
        diet: VEG,
        quantity: "150g chana + 100g salad",
        calories: 380.0,
        tags: &[Protein, Fiber, LowSalt, LowSpice],
        allergens: &[],
        notes: &[DIABETES],
    },
    Entry {
        name: "Mix Veg Curry + Bajra Roti",
        diet: VEG,
        quantity: "150g curry + 1 bajra roti (~50g)",
        calories: 360.0,
        tags: &[Fiber, LowSalt, LowSpice],
        allergens: &[],
        notes: &[BP, ASTHMA],
    },
    Entry {
        name: "Lauki Chana Dal + Rice",
        diet: VEG,
        quantity: "150g lauki + 100g chana dal + 150g rice",
        calories: 400.0,
        tags: &[Protein, Carb, LowSalt, LowSpice],
        allergens: &[],
        notes: &[],
    },
];

const DINNER: &[Entry] = &[
    Entry {
        name: "Boiled Chicken + Veg Soup",
        diet: NON_VEG,
        quantity: "150g chicken + 200ml soup",
        calories: 420.0,
        tags: &[Protein, Clean, LowSalt, LowSpice],
        allergens: &[],
        notes: &[],
    },
    Entry {
        name: "Paneer Curry + Rotis",
        diet: VEG,
        quantity: "100g paneer curry + 2 rotis",
        calories: 500.0,
        tags: &[Protein, Carb, Dairy, LowSpice],
        allergens: &[GLUTEN, DAIRY],
        notes: &[],
    },
    Entry {
        name: "Tofu + Veggies",
        diet: VEG,
        quantity: "100g tofu + 150g veggies",
        calories: 350.0,
        tags: &[Protein, Fiber, Soy, LowSalt, LowSpice],
        allergens: &[],
        notes: &[],
    },
    Entry {
        name: "Masoor Dal + Rice + Salad",
        diet: VEG,
        quantity: "150g dal + 150g rice + 100g salad",
        calories: 420.0,
        tags: &[Protein, Carb, Fiber, LowSpice],
        allergens: &[],
        notes: &[],
    },
    Entry {
        name: "Moong Dal + Roti + Salad",
        diet: VEG,
        quantity: "150g dal + 1 roti + 100g salad",
        calories: 380.0,
        tags: &[Protein, Fiber, LowSpice],
        allergens: &[GLUTEN],
        notes: &[DIABETES],
    },
    Entry {
        name: "Curd + Roti + Sabzi",
        diet: VEG,
        quantity: "100g curd + 1 roti + 150g sabzi",
        calories: 350.0,
        tags: &[Dairy, Carb, LowSpice],
        allergens: &[GLUTEN, DAIRY],
        notes: &[],
    },
    Entry {
        name: "Lauki/Tori Sabzi + Roti",
        diet: VEG,
        quantity: "150g lauki + 1 roti",
        calories: 300.0,
        tags: &[Fiber, LowSalt, LowSpice],
        allergens: &[GLUTEN],
        notes: &[BP],
    },
    Entry {
        name: "Palak Dal + Rotis",
        diet: VEG,
        quantity: "150g dal + 2 rotis",
        calories: 480.0,
        tags: &[Protein, Carb, Fiber, LowSpice],
        allergens: &[GLUTEN],
        notes: &[],
    },
];

const SNACKS: &[Entry] = &[
    Entry {
        name: "Boiled Eggs",
        diet: NON_VEG,
        quantity: "3 pcs (~150g)",
        calories: 210.0,
        tags: &[Protein, LowSpice],
        allergens: &[],
        notes: &[],
    },
    Entry {
        name: "Paneer Cubes",
        diet: VEG,
        quantity: "100g paneer",
        calories: 280.0,
        tags: &[Protein, Dairy, LowSpice],
        allergens: &[DAIRY],
        notes: &[],
    },
    Entry {
        name: "Sprouts Chaat",
        diet: VEG,
        quantity: "100g sprouts",
        calories: 200.0,
        tags: &[Protein, Fiber, LowSalt, LowSpice],
        allergens: &[],
        notes: &[DIABETES],
    },
    Entry {
        name: "Greek Yogurt",
        diet: VEG,
        quantity: "150g unsweetened yogurt",
        calories: 160.0,
        tags: &[Protein, Dairy, LowSpice],
        allergens: &[DAIRY],
        notes: &[],
    },
    Entry {
        name: "Soybeans (boiled)",
        diet: VEG,
        quantity: "50g soybeans",
        calories: 160.0,
        tags: &[Protein, Fiber, Soy, LowSpice],
        allergens: &[],
        notes: &[],
    },
    Entry {
        name: "Fruit Bowl",
        diet: VEG,
        quantity: "200g mixed fruit",
        calories: 200.0,
        tags: &[LowSalt, Fiber, LowSpice],
        allergens: &[],
        notes: &[],
    },
    Entry {
        name: "Almonds",
        diet: VEG,
        quantity: "7 pcs (~10g)",
        calories: 70.0,
        tags: &[HealthyFat, LowSpice],
        allergens: &[],
        notes: &[],
    },
    Entry {
        name: "Walnuts",
        diet: VEG,
        quantity: "3 halves (~15g)",
        calories: 90.0,
        tags: &[HealthyFat, LowSpice],
        allergens: &[],
        notes: &[],
    },
    Entry {
        name: "Raisins",
        diet: VEG,
        quantity: "20g raisins",
        calories: 60.0,
        tags: &[Carb, LowSpice],
        allergens: &[],
        notes: &[DIABETES],
    },
    Entry {
        name: "Roasted Makhana",
        diet: VEG,
        quantity: "25g makhana",
        calories: 150.0,
        tags: &[LowSalt, Fiber, LowSpice],
        allergens: &[],
        notes: &[BP],
    },
];

static BUILTIN: LazyLock<Catalog> = LazyLock::new(|| {
    let entries = [
        (MealSlot::Breakfast, BREAKFAST),
        (MealSlot::Lunch, LUNCH),
        (MealSlot::Dinner, DINNER),
        (MealSlot::Snacks, SNACKS),
    ]
    .into_iter()
    .flat_map(|(slot, rows)| {
        rows.iter().map(move |row| {
            MealCandidate::new(row.name, slot, row.diet, row.quantity, row.calories)
                .with_tags(row.tags.iter().copied())
                .with_allergens(row.allergens.iter().copied())
                .with_notes(row.notes.iter().copied())
        })
    })
    .collect();

    Catalog { entries }
});

/// Read-only meal catalog shared by every recommendation request.
#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    entries: Vec<MealCandidate>,
}

impl Catalog {
    /// Builds a custom catalog. Every entry must have positive, finite calories.
    pub fn new(entries: Vec<MealCandidate>) -> fitaxis_shared::Result<Self> {
        if let Some(entry) = entries
            .iter()
            .find(|e| !e.base_calories.is_finite() || e.base_calories <= 0.0)
        {
            fitaxis_shared::bail!(
                "catalog entry '{}' must have positive base calories, got {}",
                entry.name,
                entry.base_calories
            );
        }

        Ok(Self { entries })
    }

    /// The curated catalog, built once per process.
    pub fn builtin() -> &'static Catalog {
        &BUILTIN
    }

    pub fn entries(&self) -> &[MealCandidate] {
        &self.entries
    }

    pub fn for_slot(&self, slot: MealSlot) -> impl Iterator<Item = &MealCandidate> {
        self.entries.iter().filter(move |e| e.slot == slot)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::VariantArray;

    #[test]
    fn test_builtin_catalog_shape() {
        let catalog = Catalog::builtin();

        assert_eq!(catalog.for_slot(MealSlot::Breakfast).count(), 8);
        assert_eq!(catalog.for_slot(MealSlot::Lunch).count(), 8);
        assert_eq!(catalog.for_slot(MealSlot::Dinner).count(), 8);
        assert_eq!(catalog.for_slot(MealSlot::Snacks).count(), 10);
        assert_eq!(catalog.len(), 34);
    }

    #[test]
    fn test_builtin_catalog_invariants() {
        let catalog = Catalog::builtin();

        for slot in MealSlot::VARIANTS {
            assert!(
                catalog.for_slot(*slot).all(|e| e.base_calories > 0.0),
                "{slot} has a non-positive entry"
            );
        }

        // Same display name may exist in several slots.
        let boiled_eggs: Vec<_> = catalog
            .entries()
            .iter()
            .filter(|e| e.name == "Boiled Eggs")
            .map(|e| e.slot)
            .collect();
        assert_eq!(boiled_eggs, vec![MealSlot::Breakfast, MealSlot::Snacks]);
    }

    #[test]
    fn test_name_matches_is_case_insensitive_substring() {
        let meal = MealCandidate::new("Tofu + Rice + Veg Curry", MealSlot::Lunch, VEG, "1 bowl", 1.0);

        assert!(meal.name_matches(&["RICE"]));
        assert!(meal.name_matches(&["butter", "tofu"]));
        assert!(!meal.name_matches(&["paneer"]));
    }

    #[test]
    fn test_new_rejects_non_positive_calories() {
        let entries = vec![
            MealCandidate::new("Water", MealSlot::Snacks, VEG, "1 glass", 0.0),
        ];

        assert!(Catalog::new(entries).is_err());
        assert!(Catalog::new(vec![]).is_ok_and(|c| c.is_empty()));
    }
}
