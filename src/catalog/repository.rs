//! Catalog repository
//!
//! Owns the catalog snapshot. Every mutation runs against a working copy that
//! replaces the live snapshot only when the whole change succeeded.

use thiserror::Error;

use crate::costing::{finite_or, CostLookup};
use crate::models::{
    generate_id, CatalogSnapshot, Equipment, EquipmentUpsert, Ingredient, IngredientUpsert,
    Recipe, RecipeEquipment, RecipeEquipmentUpsert, RecipeIngredient, RecipeIngredientUpsert,
    RecipeSupply, RecipeSupplyUpsert, RecipeUpsert, Supply, SupplyUpsert, DEFAULT_ENERGY_COST,
};

/// Catalog validation errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CatalogError {
    #[error("{kind} name must not be blank")]
    BlankName { kind: &'static str },

    #[error("{kind} '{id}' not found")]
    NotFound { kind: &'static str, id: String },
}

pub type CatalogResult<T> = Result<T, CatalogError>;

/// Records addressed by string ID
trait Identified {
    fn id(&self) -> &str;
}

macro_rules! identified {
    ($($ty:ty),*) => {
        $(impl Identified for $ty {
            fn id(&self) -> &str {
                &self.id
            }
        })*
    };
}

identified!(
    Ingredient,
    Supply,
    Equipment,
    Recipe,
    RecipeIngredient,
    RecipeSupply,
    RecipeEquipment
);

fn find<'a, T: Identified>(items: &'a [T], id: &str) -> Option<&'a T> {
    items.iter().find(|item| item.id() == id)
}

/// Replace the record with the same ID in place, or append it
fn put<T: Identified>(items: &mut Vec<T>, item: T) {
    match items.iter().position(|existing| existing.id() == item.id()) {
        Some(pos) => items[pos] = item,
        None => items.push(item),
    }
}

fn take<T: Identified>(items: &mut Vec<T>, kind: &'static str, id: &str) -> CatalogResult<T> {
    match items.iter().position(|item| item.id() == id) {
        Some(pos) => Ok(items.remove(pos)),
        None => Err(CatalogError::NotFound {
            kind,
            id: id.to_string(),
        }),
    }
}

fn require_name(kind: &'static str, name: &str) -> CatalogResult<()> {
    if name.trim().is_empty() {
        return Err(CatalogError::BlankName { kind });
    }
    Ok(())
}

fn require<T: Identified>(items: &[T], kind: &'static str, id: &str) -> CatalogResult<()> {
    if find(items, id).is_none() {
        return Err(CatalogError::NotFound {
            kind,
            id: id.to_string(),
        });
    }
    Ok(())
}

/// Keep the caller's ID when given, otherwise generate one
fn assign_id(id: &Option<String>, prefix: &str) -> String {
    id.as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| generate_id(prefix))
}

/// Number of link records a delete removed along with the item
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct Cascade {
    pub recipe_ingredients: usize,
    pub recipe_supplies: usize,
    pub recipe_equipment: usize,
}

impl Cascade {
    pub fn total(&self) -> usize {
        self.recipe_ingredients + self.recipe_supplies + self.recipe_equipment
    }
}

fn remove_links<T>(links: &mut Vec<T>, matches: impl Fn(&T) -> bool) -> usize {
    let before = links.len();
    links.retain(|link| !matches(link));
    before - links.len()
}

/// The in-memory catalog
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    snapshot: CatalogSnapshot,
}

impl Catalog {
    pub fn new(snapshot: CatalogSnapshot) -> Self {
        Self { snapshot }
    }

    pub fn snapshot(&self) -> &CatalogSnapshot {
        &self.snapshot
    }

    /// Replace the whole catalog
    pub fn restore(&mut self, snapshot: CatalogSnapshot) {
        self.snapshot = snapshot;
    }

    /// Apply `change` to a copy of the snapshot and keep it only on success
    pub fn transact<T, F>(&mut self, change: F) -> CatalogResult<T>
    where
        F: FnOnce(&mut CatalogSnapshot) -> CatalogResult<T>,
    {
        let mut working = self.snapshot.clone();
        let out = change(&mut working)?;
        self.snapshot = working;
        Ok(out)
    }

    // ========================================================================
    // Ingredients
    // ========================================================================

    pub fn ingredients(&self) -> &[Ingredient] {
        &self.snapshot.ingredients
    }

    pub fn ingredient(&self, id: &str) -> Option<&Ingredient> {
        find(&self.snapshot.ingredients, id)
    }

    pub fn upsert_ingredient(&mut self, data: &IngredientUpsert) -> CatalogResult<Ingredient> {
        require_name("ingredient", &data.name)?;
        self.transact(|s| {
            let item = Ingredient::from_upsert(assign_id(&data.id, Ingredient::ID_PREFIX), data);
            put(&mut s.ingredients, item.clone());
            Ok(item)
        })
    }

    pub fn delete_ingredient(&mut self, id: &str) -> CatalogResult<Cascade> {
        self.transact(|s| {
            take(&mut s.ingredients, "ingredient", id)?;
            Ok(Cascade {
                recipe_ingredients: remove_links(&mut s.recipe_ingredients, |l| l.ingredient_id == id),
                ..Default::default()
            })
        })
    }

    // ========================================================================
    // Supplies
    // ========================================================================

    pub fn supplies(&self) -> &[Supply] {
        &self.snapshot.supplies
    }

    pub fn supply(&self, id: &str) -> Option<&Supply> {
        find(&self.snapshot.supplies, id)
    }

    pub fn upsert_supply(&mut self, data: &SupplyUpsert) -> CatalogResult<Supply> {
        require_name("supply", &data.name)?;
        self.transact(|s| {
            let item = Supply::from_upsert(assign_id(&data.id, Supply::ID_PREFIX), data);
            put(&mut s.supplies, item.clone());
            Ok(item)
        })
    }

    pub fn delete_supply(&mut self, id: &str) -> CatalogResult<Cascade> {
        self.transact(|s| {
            take(&mut s.supplies, "supply", id)?;
            Ok(Cascade {
                recipe_supplies: remove_links(&mut s.recipe_supplies, |l| l.supply_id == id),
                ..Default::default()
            })
        })
    }

    // ========================================================================
    // Equipment
    // ========================================================================

    pub fn equipment(&self) -> &[Equipment] {
        &self.snapshot.equipment
    }

    pub fn equipment_item(&self, id: &str) -> Option<&Equipment> {
        find(&self.snapshot.equipment, id)
    }

    pub fn upsert_equipment(&mut self, data: &EquipmentUpsert) -> CatalogResult<Equipment> {
        require_name("equipment", &data.name)?;
        self.transact(|s| {
            let item = Equipment::from_upsert(assign_id(&data.id, Equipment::ID_PREFIX), data);
            put(&mut s.equipment, item.clone());
            Ok(item)
        })
    }

    pub fn delete_equipment(&mut self, id: &str) -> CatalogResult<Cascade> {
        self.transact(|s| {
            take(&mut s.equipment, "equipment", id)?;
            Ok(Cascade {
                recipe_equipment: remove_links(&mut s.recipe_equipment, |l| l.equipment_id == id),
                ..Default::default()
            })
        })
    }

    // ========================================================================
    // Recipes
    // ========================================================================

    pub fn recipes(&self) -> &[Recipe] {
        &self.snapshot.recipes
    }

    pub fn recipe(&self, id: &str) -> Option<&Recipe> {
        find(&self.snapshot.recipes, id)
    }

    pub fn upsert_recipe(&mut self, data: &RecipeUpsert) -> CatalogResult<Recipe> {
        require_name("recipe", &data.name)?;
        self.transact(|s| {
            let recipe = Recipe::from_upsert(assign_id(&data.id, Recipe::ID_PREFIX), data);
            put(&mut s.recipes, recipe.clone());
            Ok(recipe)
        })
    }

    pub fn delete_recipe(&mut self, id: &str) -> CatalogResult<Cascade> {
        self.transact(|s| {
            take(&mut s.recipes, "recipe", id)?;
            Ok(Cascade {
                recipe_ingredients: remove_links(&mut s.recipe_ingredients, |l| l.recipe_id == id),
                recipe_supplies: remove_links(&mut s.recipe_supplies, |l| l.recipe_id == id),
                recipe_equipment: remove_links(&mut s.recipe_equipment, |l| l.recipe_id == id),
            })
        })
    }

    // ========================================================================
    // Recipe links
    // ========================================================================

    pub fn recipe_ingredients(&self, recipe_id: &str) -> Vec<&RecipeIngredient> {
        self.snapshot.ingredient_links(recipe_id)
    }

    pub fn recipe_supplies(&self, recipe_id: &str) -> Vec<&RecipeSupply> {
        self.snapshot.supply_links(recipe_id)
    }

    pub fn recipe_equipment(&self, recipe_id: &str) -> Vec<&RecipeEquipment> {
        self.snapshot.equipment_links(recipe_id)
    }

    pub fn upsert_recipe_ingredient(
        &mut self,
        data: &RecipeIngredientUpsert,
    ) -> CatalogResult<RecipeIngredient> {
        self.transact(|s| {
            require(&s.recipes, "recipe", &data.recipe_id)?;
            require(&s.ingredients, "ingredient", &data.ingredient_id)?;
            let link = RecipeIngredient {
                id: assign_id(&data.id, RecipeIngredient::ID_PREFIX),
                recipe_id: data.recipe_id.clone(),
                ingredient_id: data.ingredient_id.clone(),
                quantity: finite_or(data.quantity, 0.0),
            };
            put(&mut s.recipe_ingredients, link.clone());
            Ok(link)
        })
    }

    pub fn upsert_recipe_supply(&mut self, data: &RecipeSupplyUpsert) -> CatalogResult<RecipeSupply> {
        self.transact(|s| {
            require(&s.recipes, "recipe", &data.recipe_id)?;
            require(&s.supplies, "supply", &data.supply_id)?;
            let link = RecipeSupply {
                id: assign_id(&data.id, RecipeSupply::ID_PREFIX),
                recipe_id: data.recipe_id.clone(),
                supply_id: data.supply_id.clone(),
                quantity: finite_or(data.quantity, 0.0),
            };
            put(&mut s.recipe_supplies, link.clone());
            Ok(link)
        })
    }

    pub fn upsert_recipe_equipment(
        &mut self,
        data: &RecipeEquipmentUpsert,
    ) -> CatalogResult<RecipeEquipment> {
        self.transact(|s| {
            require(&s.recipes, "recipe", &data.recipe_id)?;
            require(&s.equipment, "equipment", &data.equipment_id)?;
            let link = RecipeEquipment {
                id: assign_id(&data.id, RecipeEquipment::ID_PREFIX),
                recipe_id: data.recipe_id.clone(),
                equipment_id: data.equipment_id.clone(),
                hours: finite_or(data.hours, 0.0),
            };
            put(&mut s.recipe_equipment, link.clone());
            Ok(link)
        })
    }

    pub fn delete_recipe_ingredient(&mut self, id: &str) -> CatalogResult<RecipeIngredient> {
        self.transact(|s| take(&mut s.recipe_ingredients, "recipe ingredient", id))
    }

    pub fn delete_recipe_supply(&mut self, id: &str) -> CatalogResult<RecipeSupply> {
        self.transact(|s| take(&mut s.recipe_supplies, "recipe supply", id))
    }

    pub fn delete_recipe_equipment(&mut self, id: &str) -> CatalogResult<RecipeEquipment> {
        self.transact(|s| take(&mut s.recipe_equipment, "recipe equipment", id))
    }

    // ========================================================================
    // Settings
    // ========================================================================

    pub fn global_energy_cost(&self) -> f64 {
        finite_or(self.snapshot.global_energy_cost, DEFAULT_ENERGY_COST)
    }

    /// Set the global kWh cost; non-finite values reset it to the default
    pub fn set_global_energy_cost(&mut self, cost: f64) -> CatalogResult<f64> {
        self.transact(|s| {
            s.global_energy_cost = finite_or(cost, DEFAULT_ENERGY_COST);
            Ok(s.global_energy_cost)
        })
    }
}
