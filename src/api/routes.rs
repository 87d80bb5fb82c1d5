//! Route Parsing
//!
//! Maps the path below `/v1/` onto an [`Endpoint`]. The last segment may end
//! in `.json` or `.xml` to pick the response format. Image names are taken
//! verbatim, so they may contain dots of their own.

use crate::error::ApiError;
use crate::format::Format;

/// A recognised `/v1` endpoint with its raw path parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    Providers,
    ImageStates,
    ServerTypes {
        provider: String,
    },
    Regions {
        provider: String,
    },
    DataVersion {
        provider: String,
    },
    /// Plain category listing, optionally scoped to a region
    Category {
        provider: String,
        region: Option<String>,
        category: String,
    },
    Servers {
        provider: String,
        region: Option<String>,
        server_type: String,
    },
    Images {
        provider: String,
        region: Option<String>,
        state: String,
    },
    DeletedBy {
        provider: String,
        region: Option<String>,
        date: String,
    },
    DeletionDate {
        provider: String,
        region: Option<String>,
        image: String,
    },
}

/// Split a `.json`/`.xml` suffix off the last segment. Any other suffix stays
/// part of the segment.
pub fn split_extension(segment: &str) -> (&str, Format) {
    segment
        .rsplit_once('.')
        .and_then(|(stem, ext)| Format::from_extension(ext).map(|format| (stem, format)))
        .unwrap_or((segment, Format::default()))
}

/// Parse the path below `/v1/`
pub fn parse(path: &str) -> Result<(Endpoint, Format), ApiError> {
    let mut segments: Vec<&str> = path.trim_end_matches('/').split('/').collect();

    let Some(last) = segments.pop() else {
        return Err(ApiError::bad_request("empty path"));
    };
    let (last, format) = split_extension(last);
    let unsupported = last.rsplit_once('.').map(|(_, ext)| ext);
    segments.push(last);

    if segments.iter().any(|s| s.is_empty()) {
        return Err(ApiError::bad_request(format!("unroutable path '/v1/{}'", path)));
    }

    fn own(s: &str) -> String {
        s.to_string()
    }

    let endpoint = match segments.as_slice() {
        ["providers"] => Endpoint::Providers,
        ["images", "states"] => Endpoint::ImageStates,
        [provider, "servers", "types"] => Endpoint::ServerTypes { provider: own(provider) },
        [provider, "regions"] => Endpoint::Regions { provider: own(provider) },
        [provider, "dataversion"] => Endpoint::DataVersion { provider: own(provider) },
        [provider, "images", "deletedby", date] => Endpoint::DeletedBy {
            provider: own(provider),
            region: None,
            date: own(date),
        },
        [provider, region, "images", "deletedby", date] => Endpoint::DeletedBy {
            provider: own(provider),
            region: Some(own(region)),
            date: own(date),
        },
        [provider, "images", "deletiondate", image] => Endpoint::DeletionDate {
            provider: own(provider),
            region: None,
            image: own(image),
        },
        [provider, region, "images", "deletiondate", image] => Endpoint::DeletionDate {
            provider: own(provider),
            region: Some(own(region)),
            image: own(image),
        },
        [provider, "servers", server_type] => Endpoint::Servers {
            provider: own(provider),
            region: None,
            server_type: own(server_type),
        },
        [provider, region, "servers", server_type] => Endpoint::Servers {
            provider: own(provider),
            region: Some(own(region)),
            server_type: own(server_type),
        },
        [provider, "images", state] => Endpoint::Images {
            provider: own(provider),
            region: None,
            state: own(state),
        },
        [provider, region, "images", state] => Endpoint::Images {
            provider: own(provider),
            region: Some(own(region)),
            state: own(state),
        },
        [provider, category] => Endpoint::Category {
            provider: own(provider),
            region: None,
            category: own(category),
        },
        [provider, region, category] => Endpoint::Category {
            provider: own(provider),
            region: Some(own(region)),
            category: own(category),
        },
        _ => return Err(ApiError::bad_request(format!("unroutable path '/v1/{}'", path))),
    };

    // Only image names may carry a dot; anywhere else it is a format suffix
    if let Some(ext) = unsupported {
        if !matches!(endpoint, Endpoint::DeletionDate { .. }) {
            return Err(ApiError::bad_request(format!("unsupported extension '{}'", ext)));
        }
    }

    Ok((endpoint, format))
}
