//! Working session
//!
//! Ties the catalog and the selection list to the optional local cache. Each
//! successful catalog change is written through to the cache.

use super::repository::{Catalog, CatalogResult};
use super::selection::SelectionList;
use crate::db::{DbResult, SnapshotCache};
use crate::models::CatalogSnapshot;

pub struct Session {
    catalog: Catalog,
    selections: SelectionList,
    cache: Option<SnapshotCache>,
}

impl Session {
    pub fn new(snapshot: CatalogSnapshot, cache: Option<SnapshotCache>) -> Self {
        Self {
            catalog: Catalog::new(snapshot),
            selections: SelectionList::new(),
            cache,
        }
    }

    /// Session without a cache, starting from an empty catalog
    pub fn in_memory() -> Self {
        Self::new(CatalogSnapshot::default(), None)
    }

    /// Resume from the cache, or start empty when nothing was cached
    pub fn open(cache: SnapshotCache) -> DbResult<Self> {
        let snapshot = match cache.load()? {
            Some(snapshot) => {
                tracing::info!(
                    "Restored cached catalog: {} ingredients, {} supplies, {} equipment, {} recipes",
                    snapshot.ingredients.len(),
                    snapshot.supplies.len(),
                    snapshot.equipment.len(),
                    snapshot.recipes.len()
                );
                snapshot
            }
            None => {
                tracing::info!("No cached catalog, starting empty");
                CatalogSnapshot::default()
            }
        };
        Ok(Self::new(snapshot, Some(cache)))
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn snapshot(&self) -> &CatalogSnapshot {
        self.catalog.snapshot()
    }

    pub fn selections(&self) -> &SelectionList {
        &self.selections
    }

    pub fn selections_mut(&mut self) -> &mut SelectionList {
        &mut self.selections
    }

    pub fn has_cache(&self) -> bool {
        self.cache.is_some()
    }

    /// Run a catalog change and persist the result if it succeeded
    pub fn mutate<T, F>(&mut self, change: F) -> CatalogResult<T>
    where
        F: FnOnce(&mut Catalog) -> CatalogResult<T>,
    {
        let out = change(&mut self.catalog)?;
        self.selections.prune(self.catalog.snapshot());
        self.persist();
        Ok(out)
    }

    /// Replace the whole catalog, dropping selections of vanished recipes.
    /// Returns how many selections were dropped.
    pub fn restore(&mut self, snapshot: CatalogSnapshot) -> usize {
        self.catalog.restore(snapshot);
        let dropped = self.selections.prune(self.catalog.snapshot());
        if dropped > 0 {
            tracing::info!("Dropped {} selections for recipes no longer in the catalog", dropped);
        }
        self.persist();
        dropped
    }

    fn persist(&self) {
        if let Some(cache) = &self.cache {
            if let Err(e) = cache.save(self.catalog.snapshot()) {
                tracing::warn!("Failed to write catalog cache: {}", e);
            }
        }
    }
}
