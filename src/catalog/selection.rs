//! Shopping selection list
//!
//! Ordered recipe selections for consolidation. Adding a recipe that is
//! already listed bumps its multiplier instead of adding a second entry.

use serde::{Deserialize, Serialize};

use crate::costing::{finite_or, Selection};
use crate::models::CatalogSnapshot;

/// One selected recipe
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionEntry {
    pub recipe_id: String,
    /// How many full batches of the recipe to produce
    pub multiplier: u32,
}

/// Clamp a requested multiplier to a whole number of at least 1
pub fn clamp_multiplier(value: f64) -> u32 {
    let value = finite_or(value, 1.0).round();
    if value < 1.0 {
        1
    } else if value >= f64::from(u32::MAX) {
        u32::MAX
    } else {
        value as u32
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SelectionList {
    entries: Vec<SelectionEntry>,
}

impl SelectionList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[SelectionEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Add a recipe with multiplier 1, or increment it if already listed.
    /// Returns the entry's multiplier afterwards.
    pub fn add(&mut self, recipe_id: &str) -> u32 {
        if let Some(entry) = self.entries.iter_mut().find(|e| e.recipe_id == recipe_id) {
            entry.multiplier = entry.multiplier.saturating_add(1);
            return entry.multiplier;
        }
        self.entries.push(SelectionEntry {
            recipe_id: recipe_id.to_string(),
            multiplier: 1,
        });
        1
    }

    /// Set a listed recipe's multiplier (at least 1); `None` if not listed
    pub fn set_multiplier(&mut self, recipe_id: &str, multiplier: u32) -> Option<u32> {
        let entry = self.entries.iter_mut().find(|e| e.recipe_id == recipe_id)?;
        entry.multiplier = multiplier.max(1);
        Some(entry.multiplier)
    }

    pub fn remove(&mut self, recipe_id: &str) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.recipe_id != recipe_id);
        self.entries.len() != before
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Drop entries whose recipe is no longer in the catalog
    pub fn prune(&mut self, catalog: &CatalogSnapshot) -> usize {
        let before = self.entries.len();
        self.entries.retain(|e| catalog.recipe(&e.recipe_id).is_some());
        before - self.entries.len()
    }

    /// Selections for consolidation, skipping recipes that no longer exist
    pub fn resolve<'a>(&self, catalog: &'a CatalogSnapshot) -> Vec<Selection<'a>> {
        self.entries
            .iter()
            .filter_map(|e| {
                catalog.recipe(&e.recipe_id).map(|recipe| Selection {
                    recipe,
                    multiplier: e.multiplier,
                })
            })
            .collect()
    }
}
