use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeSet;
use strum::{AsRefStr, Display, EnumString, VariantArray};

#[derive(
    EnumString,
    Display,
    AsRefStr,
    VariantArray,
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Male,
    #[default]
    Female,
}

#[derive(
    EnumString,
    Display,
    AsRefStr,
    VariantArray,
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[serde(rename_all = "snake_case")]
pub enum BodyType {
    Ectomorph,
    #[default]
    Mesomorph,
    Endomorph,
}

/// Diet preference of the user, also the diet class of a catalog entry.
#[derive(
    EnumString,
    Display,
    AsRefStr,
    VariantArray,
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
)]
#[strum(ascii_case_insensitive)]
#[serde(rename_all = "kebab-case")]
pub enum DietType {
    #[strum(to_string = "vegetarian", serialize = "veg")]
    Vegetarian,
    #[default]
    #[strum(
        to_string = "non-vegetarian",
        serialize = "non_vegetarian",
        serialize = "non vegetarian",
        serialize = "non-veg"
    )]
    NonVegetarian,
}

#[derive(
    EnumString,
    Display,
    AsRefStr,
    VariantArray,
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
)]
#[strum(ascii_case_insensitive)]
#[serde(rename_all = "snake_case")]
pub enum FitnessGoal {
    #[strum(to_string = "bulking", serialize = "bulk")]
    Bulking,
    #[strum(to_string = "cutting", serialize = "cut")]
    Cutting,
    #[strum(
        to_string = "weight_loss",
        serialize = "weight loss",
        serialize = "lose weight"
    )]
    WeightLoss,
    #[default]
    #[strum(to_string = "maintain", serialize = "maintenance")]
    Maintain,
}

impl FitnessGoal {
    /// Cutting and weight loss share every downstream rule.
    pub fn is_cutting(&self) -> bool {
        matches!(self, FitnessGoal::Cutting | FitnessGoal::WeightLoss)
    }

    pub fn is_bulking(&self) -> bool {
        matches!(self, FitnessGoal::Bulking)
    }
}

/// Declaration order is the order the condition-safe transforms run in.
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
#[strum(ascii_case_insensitive)]
#[serde(rename_all = "snake_case")]
pub enum MedicalCondition {
    #[strum(to_string = "diabetes")]
    Diabetes,
    #[strum(
        to_string = "blood_pressure",
        serialize = "blood pressure",
        serialize = "bp"
    )]
    BloodPressure,
    #[strum(to_string = "fatty_liver", serialize = "fatty liver")]
    FattyLiver,
    #[strum(to_string = "asthma")]
    Asthma,
    #[strum(to_string = "thyroid")]
    Thyroid,
}

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
pub enum Allergen {
    Dairy,
    Gluten,
}

macro_rules! impl_parse_lossy {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $ty {
                /// Parses a free-form label, falling back to the neutral default.
                pub fn parse_lossy(value: &str) -> Self {
                    value.trim().parse().unwrap_or_default()
                }
            }
        )+
    };
}

impl_parse_lossy!(Gender, BodyType, DietType, FitnessGoal);

/// One label or a list of labels, as sent by the prompt and the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Labels {
    One(String),
    Many(Vec<String>),
}

impl Default for Labels {
    fn default() -> Self {
        Labels::Many(Vec::new())
    }
}

impl Labels {
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        match self {
            Labels::One(value) => std::slice::from_ref(value).iter(),
            Labels::Many(values) => values.iter(),
        }
        .map(String::as_str)
    }
}

impl From<Vec<String>> for Labels {
    fn from(value: Vec<String>) -> Self {
        Labels::Many(value)
    }
}

/// Raw user record handed over by the input collaborator.
///
/// Accepts both snake_case keys and the display keys of the interactive prompt
/// ("Diet Type", "Fitness Goal", ...). Nothing is validated here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserData {
    #[serde(alias = "Gender")]
    pub gender: Option<String>,
    #[serde(alias = "Age", deserialize_with = "lenient_age")]
    pub age: Option<u32>,
    #[serde(alias = "Height", deserialize_with = "lenient_number")]
    pub height: Option<f64>,
    #[serde(alias = "Weight", deserialize_with = "lenient_number")]
    pub weight: Option<f64>,
    #[serde(alias = "Body Type")]
    pub body_type: Option<String>,
    #[serde(alias = "Diet Type")]
    pub diet_type: Option<String>,
    #[serde(alias = "Fitness Goal")]
    pub fitness_goal: Option<String>,
    #[serde(alias = "Medical History", deserialize_with = "null_as_default")]
    pub medical_history: Labels,
    #[serde(alias = "Allergies", deserialize_with = "null_as_default")]
    pub allergies: Labels,
}

/// An explicit `null` reads like a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Numbers or numeric strings; anything else, negatives included, is `None`.
fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let number = match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse().ok(),
        _ => None,
    };

    Ok(number.filter(|n: &f64| n.is_finite() && *n >= 0.0))
}

/// Like [`lenient_number`], truncated to whole years.
fn lenient_age<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_number(deserializer)?.map(|age| age.trunc() as u32))
}

impl UserData {
    pub fn from_json(json: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub gender: Gender,
    pub age: u32,
    pub height_cm: f64,
    pub weight_kg: f64,
    pub body_type: BodyType,
    pub diet_type: DietType,
    pub fitness_goal: FitnessGoal,
    pub medical_history: BTreeSet<MedicalCondition>,
    pub allergies: BTreeSet<Allergen>,
}

impl UserProfile {
    pub fn with_diet(mut self, diet_type: DietType) -> Self {
        self.diet_type = diet_type;
        self
    }

    pub fn with_goal(mut self, fitness_goal: FitnessGoal) -> Self {
        self.fitness_goal = fitness_goal;
        self
    }

    pub fn with_conditions(
        mut self,
        conditions: impl IntoIterator<Item = MedicalCondition>,
    ) -> Self {
        self.medical_history.extend(conditions);
        self
    }

    pub fn with_allergies(mut self, allergies: impl IntoIterator<Item = Allergen>) -> Self {
        self.allergies.extend(allergies);
        self
    }

    pub fn with_biometrics(
        mut self,
        gender: Gender,
        age: u32,
        height_cm: f64,
        weight_kg: f64,
    ) -> Self {
        self.gender = gender;
        self.age = age;
        self.height_cm = height_cm;
        self.weight_kg = weight_kg;
        self
    }

    pub fn has_condition(&self, condition: MedicalCondition) -> bool {
        self.medical_history.contains(&condition)
    }

    pub fn is_allergic_to(&self, allergen: Allergen) -> bool {
        self.allergies.contains(&allergen)
    }

    pub fn is_vegetarian(&self) -> bool {
        self.diet_type == DietType::Vegetarian
    }
}

impl From<UserData> for UserProfile {
    fn from(value: UserData) -> Self {
        UserProfile {
            gender: Gender::parse_lossy(value.gender.as_deref().unwrap_or_default()),
            age: value.age.unwrap_or_default(),
            height_cm: value.height.unwrap_or_default(),
            weight_kg: value.weight.unwrap_or_default(),
            body_type: BodyType::parse_lossy(value.body_type.as_deref().unwrap_or_default()),
            diet_type: DietType::parse_lossy(value.diet_type.as_deref().unwrap_or_default()),
            fitness_goal: FitnessGoal::parse_lossy(value.fitness_goal.as_deref().unwrap_or_default()),
            medical_history: value
                .medical_history
                .iter()
                .filter_map(|label| label.trim().parse().ok())
                .collect(),
            allergies: value
                .allergies
                .iter()
                .filter_map(|label| label.trim().parse().ok())
                .collect(),
        }
    }
}
