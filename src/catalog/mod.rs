//! Catalog repository, selection list and session

pub mod repository;
pub mod selection;
pub mod session;

pub use repository::{Cascade, Catalog, CatalogError, CatalogResult};
pub use selection::{clamp_multiplier, SelectionEntry, SelectionList};
pub use session::Session;
