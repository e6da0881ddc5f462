use clap::Args;
use fitaxis_mealplan::{Catalog, MealCandidate};
use fitaxis_shared::mealplan::MealSlot;
use strum::VariantArray;

use super::OutputFormat;

#[derive(Args, Debug, Default)]
pub struct CatalogArgs {
    /// Only list one slot (breakfast, lunch, dinner, snacks)
    #[arg(long)]
    pub slot: Option<MealSlot>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

fn join<T: ToString>(values: impl IntoIterator<Item = T>) -> String {
    let joined = values
        .into_iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(", ");

    if joined.is_empty() { "-".to_owned() } else { joined }
}

fn render_entry(meal: &MealCandidate) -> String {
    format!(
        "  - {} ({}) {}, {} kcal | tags: {} | allergens: {}",
        meal.name,
        meal.diet_class,
        meal.base_quantity,
        meal.base_calories,
        join(&meal.tags),
        join(&meal.allergens),
    )
}

/// Human readable listing of `catalog`, grouped by slot.
pub fn render_catalog(catalog: &Catalog, slot: Option<MealSlot>) -> String {
    let slots = match slot {
        Some(slot) => vec![slot],
        None => MealSlot::VARIANTS.to_vec(),
    };

    let mut lines = Vec::new();
    for slot in slots {
        lines.push(format!("{}:", slot.title()));
        lines.extend(catalog.for_slot(slot).map(render_entry));
    }

    lines.join("\n")
}

pub fn catalog(args: CatalogArgs) -> anyhow::Result<()> {
    let catalog = Catalog::builtin();
    tracing::debug!(entries = catalog.len(), slot = ?args.slot, "listing catalog");

    match args.format {
        OutputFormat::Text => println!("{}", render_catalog(catalog, args.slot)),
        OutputFormat::Json => {
            let entries: Vec<&MealCandidate> = catalog
                .entries()
                .iter()
                .filter(|m| args.slot.is_none_or(|slot| m.slot == slot))
                .collect();
            println!("{}", serde_json::to_string_pretty(&entries)?);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_single_slot() {
        let text = render_catalog(Catalog::builtin(), Some(MealSlot::Snacks));

        assert!(text.starts_with("Snacks:\n"));
        assert!(!text.contains("Breakfast:"));
        assert_eq!(text.lines().count(), 11);
        assert!(text.contains("Roasted Makhana"));
    }

    #[test]
    fn test_render_all_slots() {
        let text = render_catalog(Catalog::builtin(), None);

        for title in ["Breakfast:", "Lunch:", "Dinner:", "Snacks:"] {
            assert!(text.contains(title));
        }
        assert_eq!(text.lines().count(), 34 + 4);
    }
}
