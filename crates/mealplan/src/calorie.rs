//! Daily calorie target ahead of plan generation.
//!
//! The learned regression model lives outside this crate; anything that can
//! turn [`CalorieFeatures`] into kcal plugs in through [`CaloriePredictor`].

use fitaxis_shared::user::{BodyType, DietType, FitnessGoal, Gender, UserProfile};
use fitaxis_shared::{Error, Result};
use serde::Serialize;

pub const DEFAULT_CALORIES: f64 = 2000.0;
pub const DEFAULT_GOAL_ADJUSTMENT: f64 = 300.0;

/// Moderately active multiplier applied on top of BMR.
const ACTIVITY_FACTOR: f64 = 1.55;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalorieFeatures {
    pub age: u32,
    pub weight_kg: f64,
    pub height_cm: f64,
    pub gender: Gender,
    pub body_type: BodyType,
    pub diet_type: DietType,
    pub goal: FitnessGoal,
}

impl From<&UserProfile> for CalorieFeatures {
    fn from(profile: &UserProfile) -> Self {
        Self {
            age: profile.age,
            weight_kg: profile.weight_kg,
            height_cm: profile.height_cm,
            gender: profile.gender,
            body_type: profile.body_type,
            diet_type: profile.diet_type,
            goal: profile.fitness_goal,
        }
    }
}

pub trait CaloriePredictor {
    fn predict(&self, features: &CalorieFeatures) -> Result<f64>;
}

/// Mifflin-St Jeor BMR scaled by a fixed activity factor.
#[derive(Debug, Clone, Copy, Default)]
pub struct MifflinStJeor;

impl CaloriePredictor for MifflinStJeor {
    fn predict(&self, features: &CalorieFeatures) -> Result<f64> {
        let CalorieFeatures {
            age,
            weight_kg,
            height_cm,
            gender,
            ..
        } = *features;

        if age == 0 {
            return Err(Error::Prediction("age must be positive".to_owned()));
        }

        for (label, value) in [("weight", weight_kg), ("height", height_cm)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(Error::Prediction(format!(
                    "{label} must be a positive number, got {value}"
                )));
            }
        }

        let offset = match gender {
            Gender::Male => 5.0,
            Gender::Female => -161.0,
        };
        let bmr = 10.0 * weight_kg + 6.25 * height_cm - 5.0 * f64::from(age) + offset;

        if bmr <= 0.0 {
            return Err(Error::Prediction(format!("implausible BMR {bmr:.1}")));
        }

        Ok(bmr * ACTIVITY_FACTOR)
    }
}

/// Predicted current intake, or `fallback` when prediction fails.
pub fn estimate_intake(
    predictor: &impl CaloriePredictor,
    features: &CalorieFeatures,
    fallback: f64,
) -> f64 {
    match predictor.predict(features) {
        Ok(kcal) if kcal.is_finite() && kcal > 0.0 => kcal,
        Ok(kcal) => {
            tracing::warn!(kcal, fallback, "predicted intake out of range, using fallback");
            fallback
        }
        Err(err) => {
            tracing::warn!(error = %err, fallback, "calorie prediction failed, using fallback");
            fallback
        }
    }
}

/// Shifts the current intake toward the fitness goal.
pub fn goal_adjusted_target(current: f64, goal: FitnessGoal, adjustment: f64) -> f64 {
    match goal {
        FitnessGoal::Bulking => current + adjustment,
        FitnessGoal::Cutting | FitnessGoal::WeightLoss => current - adjustment,
        FitnessGoal::Maintain => current,
    }
}
