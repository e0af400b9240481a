//! Places lookup collaborator: free-text query plus a neighbourhood anchor
//! point, answered by a ranked list or an explicit error string. The error
//! travels inside the tool output so the widget can render its own
//! fallback; a lookup failure never fails the message.

use crate::config::PlacesConfig;
use crate::data;
use crate::widgets::places::PlacesOutput;
use anyhow::Result;
use serde_json::Value as JsonValue;
use tracing::warn;

#[derive(Clone)]
pub struct PlacesClient {
    http: reqwest::Client,
    endpoint: Option<String>,
    api_key: Option<String>,
}

impl PlacesClient {
    pub fn new(cfg: &PlacesConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: cfg.endpoint.clone(),
            api_key: cfg.api_key.clone(),
        }
    }

    /// Resolve a nearby-places query to a tool output payload. Always
    /// returns a payload; failures become `{"error": ...}`.
    pub async fn lookup(&self, query: &str, neighbourhood_slug: Option<&str>) -> JsonValue {
        let Some(endpoint) = &self.endpoint else {
            return error_output("places lookup is not configured");
        };
        match self.fetch(endpoint, query, neighbourhood_slug).await {
            Ok(output) => output,
            Err(e) => {
                warn!("places lookup failed: {}", e);
                error_output("lookup failed")
            }
        }
    }

    async fn fetch(
        &self,
        endpoint: &str,
        query: &str,
        neighbourhood_slug: Option<&str>,
    ) -> Result<JsonValue> {
        let mut url = format!(
            "{}?query={}",
            endpoint.trim_end_matches('/'),
            urlencoding::encode(query)
        );
        if let Some(anchor) = neighbourhood_slug.and_then(data::neighbourhood) {
            url.push_str(&format!(
                "&lat={}&lng={}",
                anchor.center.0, anchor.center.1
            ));
        }
        let mut rb = self.http.get(&url);
        if let Some(key) = &self.api_key {
            rb = rb.header("Authorization", format!("Bearer {}", key));
        }
        let resp = rb.send().await?;
        if !resp.status().is_success() {
            anyhow::bail!("places endpoint returned {}", resp.status());
        }
        // Validate the shape, then hand the payload through untouched.
        let output: PlacesOutput = resp.json().await?;
        Ok(serde_json::to_value(output)?)
    }
}

fn error_output(message: &str) -> JsonValue {
    serde_json::json!({ "error": message })
}
