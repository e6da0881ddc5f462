use crate::catalog::{Catalog, MealCandidate};
use crate::transform::apply_chain;
use fitaxis_shared::mealplan::{MealSlot, Tag};
use fitaxis_shared::user::UserProfile;

/// Where the candidates of a filtered pool came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoolSource {
    /// Condition transforms, allergy and diet filters all applied.
    Filtered,
    /// Transforms and allergy exclusion emptied the slot; low-spice, high-fiber
    /// entries of the same slot were used instead.
    ConditionFallback,
    /// Nothing survived at all; low-spice, high-fiber entries from every slot.
    CatalogFallback,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FilteredPool {
    pub candidates: Vec<MealCandidate>,
    pub source: PoolSource,
}

impl FilteredPool {
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    pub fn is_fallback(&self) -> bool {
        self.source != PoolSource::Filtered
    }
}

/// Safety-net membership: low-spice and high-fiber.
pub fn is_fallback_meal(meal: &MealCandidate) -> bool {
    meal.has_tag(Tag::LowSpice) && meal.has_tag(Tag::Fiber)
}

/// Builds the candidate pool for one slot.
///
/// # Business Rules
/// - Condition-safe transforms run first, in chain order
/// - Allergy exclusion is strict and checked after every rename
/// - Vegetarian users only keep vegetarian entries
/// - Fallback pools skip the allergy and diet filters
pub fn filter_pool(catalog: &Catalog, profile: &UserProfile, slot: MealSlot) -> FilteredPool {
    let subset: Vec<MealCandidate> = catalog.for_slot(slot).cloned().collect();

    let mut candidates = apply_chain(subset.clone(), slot, &profile.medical_history);
    let mut source = PoolSource::Filtered;

    if !profile.allergies.is_empty() {
        candidates.retain(|m| !m.carries_any_allergen(&profile.allergies));
    }

    if candidates.is_empty() {
        tracing::debug!(%slot, "condition filters emptied slot, using slot fallback");
        candidates = subset.into_iter().filter(is_fallback_meal).collect();
        source = PoolSource::ConditionFallback;
    }

    if profile.is_vegetarian() {
        candidates.retain(MealCandidate::is_vegetarian);
    }

    if candidates.is_empty() {
        tracing::debug!(%slot, "no candidates left, using catalog-wide fallback");
        candidates = catalog
            .entries()
            .iter()
            .filter(|m| is_fallback_meal(m))
            .cloned()
            .collect();
        source = PoolSource::CatalogFallback;
    }

    tracing::debug!(%slot, size = candidates.len(), ?source, "candidate pool ready");

    FilteredPool { candidates, source }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fitaxis_shared::user::{Allergen, DietType, MedicalCondition};

    #[test]
    fn test_plain_profile_keeps_whole_slot() {
        let catalog = Catalog::builtin();
        let pool = filter_pool(catalog, &UserProfile::default(), MealSlot::Snacks);

        assert_eq!(pool.source, PoolSource::Filtered);
        assert_eq!(pool.candidates.len(), 10);
    }

    #[test]
    fn test_allergies_are_excluded_after_transforms() {
        let catalog = Catalog::builtin();
        let profile = UserProfile::default()
            .with_conditions([MedicalCondition::FattyLiver])
            .with_allergies([Allergen::Dairy, Allergen::Gluten]);

        let pool = filter_pool(catalog, &profile, MealSlot::Breakfast);

        // "Paneer Paratha + Curd" is renamed to an oats dish but keeps its allergens.
        assert!(
            pool.candidates
                .iter()
                .all(|m| !m.carries_any_allergen(&profile.allergies))
        );
        assert!(
            !pool
                .candidates
                .iter()
                .any(|m| m.name == "Oats Cheela + Mint Yogurt (Low-Fat)")
        );
    }

    #[test]
    fn test_vegetarian_filter() {
        let catalog = Catalog::builtin();
        let profile = UserProfile::default().with_diet(DietType::Vegetarian);

        for slot in [MealSlot::Breakfast, MealSlot::Lunch, MealSlot::Dinner, MealSlot::Snacks] {
            let pool = filter_pool(catalog, &profile, slot);
            assert!(pool.candidates.iter().all(MealCandidate::is_vegetarian));
            assert!(!pool.is_fallback());
        }
    }

    #[test]
    fn test_condition_fallback_uses_same_slot() -> anyhow::Result<()> {
        let catalog = Catalog::new(vec![
            MealCandidate::new("Paneer Tikka", MealSlot::Dinner, DietType::Vegetarian, "150g", 300.0)
                .with_tags([Tag::Protein, Tag::Dairy])
                .with_allergens([Allergen::Dairy]),
            MealCandidate::new("Dal Palak", MealSlot::Dinner, DietType::Vegetarian, "200g", 250.0)
                .with_tags([Tag::LowSpice, Tag::Fiber])
                .with_allergens([Allergen::Dairy]),
            MealCandidate::new("Veg Poha", MealSlot::Breakfast, DietType::Vegetarian, "150g", 250.0)
                .with_tags([Tag::LowSpice, Tag::Fiber]),
        ])?;
        let profile = UserProfile::default().with_allergies([Allergen::Dairy]);

        let pool = filter_pool(&catalog, &profile, MealSlot::Dinner);

        // The slot fallback ignores allergies.
        assert_eq!(pool.source, PoolSource::ConditionFallback);
        assert_eq!(pool.candidates.len(), 1);
        assert_eq!(pool.candidates[0].name, "Dal Palak");

        Ok(())
    }

    #[test]
    fn test_catalog_fallback_ignores_slot_and_diet() -> anyhow::Result<()> {
        let catalog = Catalog::new(vec![
            MealCandidate::new("Fish Curry", MealSlot::Dinner, DietType::NonVegetarian, "200g", 350.0)
                .with_tags([Tag::Protein]),
            MealCandidate::new("Chicken Soup", MealSlot::Lunch, DietType::NonVegetarian, "250ml", 200.0)
                .with_tags([Tag::LowSpice, Tag::Fiber]),
        ])?;
        let profile = UserProfile::default().with_diet(DietType::Vegetarian);

        let pool = filter_pool(&catalog, &profile, MealSlot::Dinner);

        assert_eq!(pool.source, PoolSource::CatalogFallback);
        assert_eq!(pool.candidates.len(), 1);
        assert_eq!(pool.candidates[0].name, "Chicken Soup");
        assert!(!pool.candidates[0].is_vegetarian());

        Ok(())
    }
}
