//! pint-server
//!
//! Public Cloud Information Server: a read-only HTTP API over per-provider
//! framework documents describing update servers and published images.

pub mod api;
pub mod catalog;
pub mod config;
pub mod error;
pub mod format;
pub mod framework;
pub mod query;

/// Version injected at compile time via PINT_VERSION env var (set by CI/CD),
/// or "dev" for local builds.
pub const VERSION: &str = match option_env!("PINT_VERSION") {
    Some(v) => v,
    None => "dev",
};
