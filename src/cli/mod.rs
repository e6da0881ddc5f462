mod catalog;
mod recommend;

pub use catalog::*;
pub use recommend::*;

use clap::{Parser, Subcommand, ValueEnum};

/// fitaxis - Condition-aware daily meal plans
#[derive(Parser)]
#[command(name = "fitaxis", version)]
#[command(about = "Personalized daily meal plans from goals, conditions and allergies", long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate a daily meal plan
    Recommend(RecommendArgs),
    /// List the built-in meal catalog
    Catalog(CatalogArgs),
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}
