//! Nearby-places results. This widget depends on an external lookup, so it
//! renders nothing output-shaped until `output-available`; the resolver
//! shows a distinct "searching" indicator while only input exists.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PlacesSeed {
    #[serde(default)]
    pub query: Option<String>,
    #[serde(default)]
    pub neighbourhood: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlaceResult {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub map_url: Option<String>,
}

/// Wire shape of the tool output: either results or an error string.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PlacesOutput {
    #[serde(default)]
    pub results: Vec<PlaceResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum PlacesBlock {
    Results {
        query: String,
        places: Vec<PlaceResult>,
    },
    /// Error output or an empty list; a calm fallback, not a crash.
    NoResults { query: String },
}

pub fn resolve(seed: &PlacesSeed, output: Option<&JsonValue>) -> PlacesBlock {
    let query = seed.query.clone().unwrap_or_else(|| "nearby".to_string());
    let decoded: PlacesOutput = output
        .and_then(|v| serde_json::from_value(v.clone()).ok())
        .unwrap_or_default();
    if decoded.error.is_some() || decoded.results.is_empty() {
        return PlacesBlock::NoResults { query };
    }
    PlacesBlock::Results {
        query,
        places: decoded.results,
    }
}
