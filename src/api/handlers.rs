//! Endpoint Handlers
//!
//! Validates the parameters of a parsed endpoint against the catalog, runs
//! the query and renders the result.

use super::routes::Endpoint;
use crate::catalog::Catalog;
use crate::error::ApiError;
use crate::format::{format_records, format_value, Format};
use crate::framework::{Provider, RecordSet};
use crate::query::{lifecycle, resolve, Category, ResourceQuery};
use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use std::collections::HashMap;
use std::sync::Arc;

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<Catalog>,
}

/// Rendered response body with its format
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub format: Format,
    pub body: Vec<u8>,
}

impl Reply {
    pub fn content_type(&self) -> &'static str {
        self.format.content_type()
    }

    fn records(format: Format, collection: &str, records: &RecordSet<'_>) -> Result<Self, ApiError> {
        Ok(Self {
            format,
            body: format_records(format, collection, records)?,
        })
    }

    fn value(format: Format, key: &str, value: &str) -> Result<Self, ApiError> {
        Ok(Self {
            format,
            body: format_value(format, key, value)?,
        })
    }
}

impl IntoResponse for Reply {
    fn into_response(self) -> Response {
        ([(header::CONTENT_TYPE, self.content_type())], self.body).into_response()
    }
}

/// Answer one endpoint
pub fn handle(
    catalog: &Catalog,
    endpoint: &Endpoint,
    format: Format,
    params: &HashMap<String, String>,
) -> Result<Reply, ApiError> {
    match endpoint {
        Endpoint::Providers => Reply::records(format, "providers", &catalog.provider_names()),

        Endpoint::ImageStates => Reply::records(format, "states", &catalog.image_states()),

        Endpoint::ServerTypes { provider } => {
            let provider = catalog.provider(provider)?;
            Reply::records(format, "types", &catalog.server_types(provider))
        }

        Endpoint::Regions { provider } => {
            let provider = catalog.provider(provider)?;
            Reply::records(format, "regions", &catalog.regions(provider))
        }

        Endpoint::DataVersion { provider } => {
            let provider = catalog.provider(provider)?;
            let category = params
                .get("category")
                .ok_or_else(|| ApiError::bad_request("missing category parameter"))?;
            let category = Category::from_name(category).ok_or_else(|| {
                ApiError::bad_request(format!("invalid category parameter '{}'", category))
            })?;
            let version = provider.data_version(category).ok_or_else(|| {
                ApiError::not_found(format!("data version of {}/{}", provider.name, category))
            })?;
            Reply::value(format, "version", version)
        }

        Endpoint::Category {
            provider,
            region,
            category,
        } => {
            let provider = catalog.provider(provider)?;
            let region = validated_region(catalog, provider, region)?;
            let category = catalog.category(category)?;
            let query = ResourceQuery {
                region,
                ..Default::default()
            };
            let records = resolve(provider, category, &query);
            Reply::records(format, category.as_str(), &records)
        }

        Endpoint::Servers {
            provider,
            region,
            server_type,
        } => {
            let provider = catalog.provider(provider)?;
            let region = validated_region(catalog, provider, region)?;
            catalog.server_type(server_type)?;
            let query = ResourceQuery {
                region,
                server_type: Some(server_type.as_str()),
                ..Default::default()
            };
            let records = resolve(provider, Category::Servers, &query);
            Reply::records(format, Category::Servers.as_str(), &records)
        }

        Endpoint::Images {
            provider,
            region,
            state,
        } => {
            let provider = catalog.provider(provider)?;
            let region = validated_region(catalog, provider, region)?;
            catalog.image_state(state)?;
            let query = ResourceQuery {
                region,
                image_state: Some(state.as_str()),
                ..Default::default()
            };
            let records = resolve(provider, Category::Images, &query);
            Reply::records(format, Category::Images.as_str(), &records)
        }

        Endpoint::DeletedBy {
            provider,
            region,
            date,
        } => {
            let provider = catalog.provider(provider)?;
            let region = validated_region(catalog, provider, region)?;
            let date = catalog.date(date)?;
            let records =
                lifecycle::deleted_by(provider, date, catalog.deletion_months(provider), region);
            Reply::records(format, Category::Images.as_str(), &records)
        }

        Endpoint::DeletionDate {
            provider,
            region,
            image,
        } => {
            let provider = catalog.provider(provider)?;
            let region = validated_region(catalog, provider, region)?;
            let date =
                lifecycle::deletion_date(provider, image, catalog.deletion_months(provider), region)
                    .ok_or_else(|| ApiError::not_found(format!("image '{}'", image)))?;
            Reply::value(format, "deletiondate", &date)
        }
    }
}

/// `GET /v1/{*path}`
pub async fn v1(
    State(state): State<AppState>,
    Path(path): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Reply, ApiError> {
    let (endpoint, format) = super::routes::parse(&path)?;
    handle(&state.catalog, &endpoint, format, &params)
}

/// `GET /`
pub async fn root() -> &'static str {
    "Public Cloud Information Server\n"
}

/// `GET /package-version`
pub async fn package_version() -> Json<HashMap<&'static str, &'static str>> {
    Json(HashMap::from([("package version", crate::VERSION)]))
}

/// Anything outside the known paths
pub async fn fallback() -> StatusCode {
    StatusCode::BAD_REQUEST
}

fn validated_region<'r>(
    catalog: &Catalog,
    provider: &Provider,
    region: &'r Option<String>,
) -> Result<Option<&'r str>, ApiError> {
    match region.as_deref() {
        Some(region) => {
            catalog.region(provider, region)?;
            Ok(Some(region))
        }
        None => Ok(None),
    }
}
