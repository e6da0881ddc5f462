use fitaxis_shared::user::{Allergen, MedicalCondition, UserProfile};
use serde::Serialize;

pub const SCALE_RANGE: (f64, f64) = (0.93, 1.07);
pub const PROTEIN_BIAS_RANGE: (f64, f64) = (0.0, 0.6);
pub const SALT_CAUTION_RANGE: (f64, f64) = (0.0, 0.8);
pub const CARB_CAUTION_RANGE: (f64, f64) = (0.0, 0.7);
pub const FAT_CAUTION_RANGE: (f64, f64) = (0.0, 0.7);
pub const INFLAMMATION_CAUTION_RANGE: (f64, f64) = (0.0, 0.8);
pub const SOY_CAUTION_RANGE: (f64, f64) = (0.0, 0.9);
pub const ALLERGY_CAUTION_RANGE: (f64, f64) = (0.0, 1.0);

/// Bias and caution coefficients derived from a profile.
///
/// Computed once per request and read-only afterwards. `Default` is the
/// neutral set: scale 1.0, every bias and caution 0.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FuzzyFactors {
    /// Global calorie multiplier
    pub scale: f64,
    pub protein_bias: f64,
    pub salt_caution: f64,
    pub carb_caution: f64,
    pub fat_caution: f64,
    pub inflammation_caution: f64,
    pub soy_caution: f64,
    /// Not consumed by selection, allergy exclusion is strict.
    pub dairy_caution: f64,
    /// Not consumed by selection, allergy exclusion is strict.
    pub gluten_caution: f64,
}

impl Default for FuzzyFactors {
    fn default() -> Self {
        Self {
            scale: 1.0,
            protein_bias: 0.0,
            salt_caution: 0.0,
            carb_caution: 0.0,
            fat_caution: 0.0,
            inflammation_caution: 0.0,
            soy_caution: 0.0,
            dairy_caution: 0.0,
            gluten_caution: 0.0,
        }
    }
}

fn clamp(value: f64, (lo, hi): (f64, f64)) -> f64 {
    value.clamp(lo, hi)
}

fn indicator(present: bool) -> f64 {
    if present { 1.0 } else { 0.0 }
}

/// Maps goal, medical history and allergies to continuous coefficients.
///
/// Memberships are crisp 0/1 indicators. `_calorie_target` is accepted for
/// target-sensitive scaling later on and does not influence the result today.
pub fn compute_fuzzy_factors(profile: &UserProfile, _calorie_target: f64) -> FuzzyFactors {
    let cut = indicator(profile.fitness_goal.is_cutting());
    let bulk = indicator(profile.fitness_goal.is_bulking());

    let bp = indicator(profile.has_condition(MedicalCondition::BloodPressure));
    let diabetes = indicator(profile.has_condition(MedicalCondition::Diabetes));
    let fatty_liver = indicator(profile.has_condition(MedicalCondition::FattyLiver));
    let asthma = indicator(profile.has_condition(MedicalCondition::Asthma));
    let thyroid = indicator(profile.has_condition(MedicalCondition::Thyroid));

    let dairy = indicator(profile.is_allergic_to(Allergen::Dairy));
    let gluten = indicator(profile.is_allergic_to(Allergen::Gluten));

    FuzzyFactors {
        scale: clamp(1.0 + 0.05 * (bulk - cut), SCALE_RANGE),
        protein_bias: clamp(0.30 * cut + 0.15 * bulk, PROTEIN_BIAS_RANGE),
        salt_caution: clamp(0.60 * bp, SALT_CAUTION_RANGE),
        carb_caution: clamp(0.50 * diabetes, CARB_CAUTION_RANGE),
        fat_caution: clamp(0.45 * fatty_liver + 0.20 * thyroid, FAT_CAUTION_RANGE),
        inflammation_caution: clamp(0.60 * asthma, INFLAMMATION_CAUTION_RANGE),
        soy_caution: clamp(0.60 * thyroid, SOY_CAUTION_RANGE),
        dairy_caution: clamp(0.80 * dairy, ALLERGY_CAUTION_RANGE),
        gluten_caution: clamp(0.80 * gluten, ALLERGY_CAUTION_RANGE),
    }
}
