//! Recipe model
//!
//! A recipe header: its base yield and baking notes. Component quantities live
//! in the recipe link tables.

use serde::{Deserialize, Serialize};

/// A recipe
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    /// Units one batch produces; component quantities are given per batch
    pub base_yield: f64,
    pub oven_minutes: Option<f64>,
    pub oven_temperature: Option<f64>,
    pub steps: Option<String>,
}

/// Data for creating or replacing a recipe
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecipeUpsert {
    pub id: Option<String>,
    pub name: String,
    pub description: Option<String>,
    pub base_yield: Option<f64>,
    pub oven_minutes: Option<f64>,
    pub oven_temperature: Option<f64>,
    pub steps: Option<String>,
}

/// Base yield to store: absent, non-finite or non-positive values become 1
pub fn normalize_yield(base_yield: Option<f64>) -> f64 {
    match base_yield {
        Some(y) if y.is_finite() && y > 0.0 => y,
        _ => 1.0,
    }
}

fn non_blank(text: &Option<String>) -> Option<String> {
    text.as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
}

impl Recipe {
    pub const ID_PREFIX: &'static str = "rec";

    pub fn from_upsert(id: String, data: &RecipeUpsert) -> Self {
        Self {
            id,
            name: data.name.trim().to_string(),
            description: non_blank(&data.description),
            base_yield: normalize_yield(data.base_yield),
            oven_minutes: data.oven_minutes.filter(|m| m.is_finite()),
            oven_temperature: data.oven_temperature.filter(|t| t.is_finite()),
            steps: non_blank(&data.steps),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_yield() {
        assert_eq!(normalize_yield(Some(12.0)), 12.0);
        assert_eq!(normalize_yield(None), 1.0);
        assert_eq!(normalize_yield(Some(0.0)), 1.0);
        assert_eq!(normalize_yield(Some(-4.0)), 1.0);
        assert_eq!(normalize_yield(Some(f64::NAN)), 1.0);
    }

    #[test]
    fn test_from_upsert_trims_text() {
        let data = RecipeUpsert {
            name: " Cupcakes ".to_string(),
            description: Some(String::new()),
            base_yield: Some(12.0),
            steps: Some("Mix, bake".to_string()),
            ..Default::default()
        };
        let recipe = Recipe::from_upsert("rec_1".to_string(), &data);
        assert_eq!(recipe.name, "Cupcakes");
        assert_eq!(recipe.description, None);
        assert_eq!(recipe.steps.as_deref(), Some("Mix, bake"));
        assert_eq!(recipe.base_yield, 12.0);
    }
}
