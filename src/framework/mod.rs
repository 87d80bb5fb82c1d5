//! Framework data layer
//!
//! Framework documents describe, per cloud provider, the update servers,
//! the published images and the regions they live in. They are read once
//! at startup and served from memory.
//!
//! # Architecture
//!
//! - [`record`] - Generic attributed records and result sets
//! - [`document`] - XML parsing into an attributed node tree
//! - [`store`] - Immutable per-provider store with region index
//! - [`loader`] - Discovers and loads documents from disk
//!
//! # Example
//!
//! ```ignore
//! use pint_server::framework::load_from_pattern;
//!
//! let store = load_from_pattern("framework/*.xml");
//! for provider in store.providers() {
//!     println!("{}: {} images", provider, store.images(provider).unwrap().len());
//! }
//! ```

pub mod document;
mod loader;
pub mod record;
mod store;

pub use loader::{discover, load_document, load_from_pattern};
pub use record::{borrow_all, named_records, Record, RecordSet};
pub use store::{Environment, FrameworkStore, Provider};
