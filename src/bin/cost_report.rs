//! Print the cost breakdown of one cached recipe
//!
//! Usage: cost_report <recipe name or id> [units]

use bakecost::config;
use bakecost::costing::{cost_recipe, normalize_str};
use bakecost::db::{Database, SnapshotCache};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut args = std::env::args().skip(1);
    let Some(query) = args.next() else {
        eprintln!("Usage: cost_report <recipe name or id> [units]");
        std::process::exit(2);
    };

    let cache_path = config::cache_path();
    if !cache_path.exists() {
        return Err(format!("No cache at {}", cache_path.display()).into());
    }
    println!("Cache path: {}", cache_path.display());

    let cache = SnapshotCache::open(Database::new(&cache_path)?)?;
    let snapshot = cache.load()?.ok_or("The cache holds no catalog yet")?;

    let wanted = query.trim().to_lowercase();
    let recipe = snapshot
        .recipe(&query)
        .or_else(|| snapshot.recipes.iter().find(|r| r.name.trim().to_lowercase() == wanted))
        .ok_or_else(|| format!("Recipe '{}' not found", query))?;

    let units = args
        .next()
        .map(|u| normalize_str(&u, recipe.base_yield))
        .unwrap_or(recipe.base_yield);
    let cost = cost_recipe(&snapshot, recipe, units);

    println!("{} ({}), {} units, base yield {}", recipe.name, recipe.id, units, recipe.base_yield);
    println!();
    println!("Ingredients:");
    for row in &cost.ingredients {
        println!("  {:<30} {:>10.1} {:<6} {:>12.2}", row.name, row.required_quantity, row.unit, row.cost);
    }
    println!("Supplies:");
    for row in &cost.supplies {
        println!("  {:<30} {:>10.1} {:<6} {:>12.2}", row.name, row.required_quantity, row.unit, row.cost);
    }
    println!("Energy:");
    for row in &cost.energy {
        println!(
            "  {:<30} {:>6.2} h {:>7.2} kWh {:>12.2}",
            row.name, row.time_hours, row.kwh, row.cost
        );
    }
    println!();
    println!("  Ingredients: {:>12.2}", cost.total_ingredients);
    println!("  Supplies:    {:>12.2}", cost.total_supplies);
    println!("  Energy:      {:>12.2}", cost.total_energy);
    println!("  Total:       {:>12.2}", cost.total);
    println!("  Per unit:    {:>12.2}", cost.unit_cost);

    Ok(())
}
