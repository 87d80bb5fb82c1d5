//! Catalog
//!
//! The single read-only context every request is answered from: the loaded
//! framework store plus the configured validation tables. Built once at
//! startup and shared behind an `Arc`.

use crate::config::Settings;
use crate::error::ApiError;
use crate::framework::{named_records, FrameworkStore, Provider, RecordSet};
use crate::query::filters::type_matches;
use crate::query::lifecycle::parse_date;
use crate::query::Category;
use chrono::NaiveDate;

/// Placeholder listed for providers without region information
pub const NO_REGION_INFO: &str = "No region information available...";

#[derive(Debug, Clone, Default)]
pub struct Catalog {
    store: FrameworkStore,
    settings: Settings,
}

impl Catalog {
    pub fn new(store: FrameworkStore, settings: Settings) -> Self {
        Self { store, settings }
    }

    pub fn store(&self) -> &FrameworkStore {
        &self.store
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    // =========================================================================
    // Validation
    // =========================================================================

    pub fn provider(&self, name: &str) -> Result<&Provider, ApiError> {
        self.store
            .provider(&name.to_lowercase())
            .ok_or_else(|| ApiError::not_found(format!("provider '{}'", name)))
    }

    pub fn category(&self, name: &str) -> Result<Category, ApiError> {
        Category::from_name(name).ok_or_else(|| ApiError::not_found(format!("category '{}'", name)))
    }

    pub fn region(&self, provider: &Provider, region: &str) -> Result<(), ApiError> {
        if provider.has_region(region) {
            Ok(())
        } else {
            Err(ApiError::not_found(format!(
                "region '{}' for provider '{}'",
                region, provider.name
            )))
        }
    }

    /// Accepts a configured server type or a hyphenated refinement of one
    /// (`regionserver-sap`)
    pub fn server_type(&self, server_type: &str) -> Result<(), ApiError> {
        let known = self
            .settings
            .server_types
            .iter()
            .any(|t| type_matches(server_type, t));

        if known {
            Ok(())
        } else {
            Err(ApiError::not_found(format!("server type '{}'", server_type)))
        }
    }

    pub fn image_state(&self, state: &str) -> Result<(), ApiError> {
        if self.settings.is_image_state(state) {
            Ok(())
        } else {
            Err(ApiError::not_found(format!("image state '{}'", state)))
        }
    }

    pub fn date(&self, date: &str) -> Result<NaiveDate, ApiError> {
        parse_date(date).ok_or_else(|| ApiError::not_found(format!("date '{}'", date)))
    }

    // =========================================================================
    // Metadata listings
    // =========================================================================

    pub fn provider_names(&self) -> RecordSet<'static> {
        named_records("provider", self.store.providers())
    }

    pub fn image_states(&self) -> RecordSet<'static> {
        named_records("state", &self.settings.image_states)
    }

    /// Server types present in the provider's data, or the configured ones
    /// when the provider lists no servers
    pub fn server_types(&self, provider: &Provider) -> RecordSet<'static> {
        let types = provider.server_types();
        if types.is_empty() {
            named_records("type", &self.settings.server_types)
        } else {
            named_records("type", types)
        }
    }

    pub fn regions(&self, provider: &Provider) -> RecordSet<'static> {
        if provider.regions().is_empty() {
            named_records("region", [NO_REGION_INFO])
        } else {
            named_records("region", provider.regions())
        }
    }

    pub fn deletion_months(&self, provider: &Provider) -> u32 {
        self.settings.deletion_months(&provider.name)
    }
}
