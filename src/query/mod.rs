//! Query layer
//!
//! Selects subsets of a provider's framework records.
//!
//! - [`filters`] - Composable record predicates and region rewriting
//! - [`region`] - Region to environment resolution
//! - [`engine`] - Category queries combining the filters
//! - [`lifecycle`] - Image deletion queries

mod engine;
pub mod filters;
pub mod lifecycle;
pub mod region;

pub use engine::{resolve, scope_to_region, Category, ResourceQuery};
pub use region::environment_for;
