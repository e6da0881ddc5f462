use anyhow::Context;
use clap::Args;
use fitaxis_mealplan::{
    CalorieFeatures, Catalog, MifflinStJeor, Recommender, estimate_intake, goal_adjusted_target,
};
use fitaxis_shared::user::{Labels, UserData, UserProfile};
use std::path::PathBuf;

use super::OutputFormat;
use crate::config::Config;

#[derive(Args, Debug, Default)]
pub struct RecommendArgs {
    /// JSON user record; flags below override its fields
    #[arg(long)]
    pub profile: Option<PathBuf>,

    #[arg(long)]
    pub gender: Option<String>,

    #[arg(long)]
    pub age: Option<u32>,

    /// Height in cm
    #[arg(long)]
    pub height: Option<f64>,

    /// Weight in kg
    #[arg(long)]
    pub weight: Option<f64>,

    #[arg(long)]
    pub body_type: Option<String>,

    #[arg(long)]
    pub diet: Option<String>,

    #[arg(long)]
    pub goal: Option<String>,

    /// Comma separated, e.g. "diabetes,blood pressure"
    #[arg(long, value_delimiter = ',')]
    pub medical: Vec<String>,

    /// Comma separated, e.g. "dairy,gluten"
    #[arg(long = "allergy", value_delimiter = ',')]
    pub allergies: Vec<String>,

    /// Current daily intake in kcal, skips prediction
    #[arg(long)]
    pub calories: Option<f64>,

    /// Jitter seed for a reproducible plan
    #[arg(long)]
    pub seed: Option<u64>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

impl RecommendArgs {
    /// Merges the profile file, if any, with the explicit flags.
    pub fn user_data(&self) -> anyhow::Result<UserData> {
        let mut data = match &self.profile {
            Some(path) => {
                let json = std::fs::read_to_string(path)
                    .with_context(|| format!("failed to read profile {}", path.display()))?;
                UserData::from_json(&json)
                    .with_context(|| format!("invalid profile {}", path.display()))?
            }
            None => UserData::default(),
        };

        if self.gender.is_some() {
            data.gender = self.gender.clone();
        }
        if self.age.is_some() {
            data.age = self.age;
        }
        if self.height.is_some() {
            data.height = self.height;
        }
        if self.weight.is_some() {
            data.weight = self.weight;
        }
        if self.body_type.is_some() {
            data.body_type = self.body_type.clone();
        }
        if self.diet.is_some() {
            data.diet_type = self.diet.clone();
        }
        if self.goal.is_some() {
            data.fitness_goal = self.goal.clone();
        }
        if !self.medical.is_empty() {
            data.medical_history = Labels::from(self.medical.clone());
        }
        if !self.allergies.is_empty() {
            data.allergies = Labels::from(self.allergies.clone());
        }

        Ok(data)
    }
}

/// Explicit intake wins over prediction; prediction falls back to the
/// configured default.
pub fn current_intake(
    config: &Config,
    profile: &UserProfile,
    explicit: Option<f64>,
) -> fitaxis_shared::Result<f64> {
    match explicit {
        Some(kcal) if !kcal.is_finite() || kcal <= 0.0 => {
            fitaxis_shared::bail!("--calories must be a positive number, got {kcal}")
        }
        Some(kcal) => Ok(kcal),
        None => Ok(estimate_intake(
            &MifflinStJeor,
            &CalorieFeatures::from(profile),
            config.planner.default_calories,
        )),
    }
}

pub fn recommend(config: &Config, args: RecommendArgs) -> anyhow::Result<()> {
    let profile = UserProfile::from(args.user_data()?);

    let current = current_intake(config, &profile, args.calories)?;
    let target = goal_adjusted_target(current, profile.fitness_goal, config.planner.goal_adjustment);
    let seed = args.seed.or(config.planner.seed);

    tracing::info!(
        goal = %profile.fitness_goal,
        diet = %profile.diet_type,
        conditions = profile.medical_history.len(),
        allergies = profile.allergies.len(),
        current,
        target,
        "generating daily plan"
    );

    let plan = Recommender::seeded(Catalog::builtin(), seed).generate_daily_plan(&profile, target);

    match args.format {
        OutputFormat::Text => {
            println!("Fitness Profile Summary");
            println!(
                "   Gender: {}, Age: {}, Height: {:.1} cm, Weight: {:.1} kg",
                profile.gender, profile.age, profile.height_cm, profile.weight_kg
            );
            println!(
                "   Body Type: {}, Goal: {}",
                profile.body_type, profile.fitness_goal
            );
            println!("Current Calorie Intake: {current:.2} kcal");
            println!("Adjusted Calorie Target: {target:.2} kcal");
            println!();
            println!("{}", plan.render_text());
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&plan)?),
    }

    Ok(())
}
