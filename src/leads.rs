//! Lead submission: the outbound path for the schedule-viewing widget and
//! the site's standalone forms. When no endpoint is configured the sink
//! falls back to a log-only path with no user-visible difference.

use crate::config::LeadsConfig;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LeadSubmission {
    pub name: String,
    pub contact: String,
    pub message: String,
    /// Where on the site the lead came from, e.g. "chat-schedule-viewing".
    pub source: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct LeadOutcome {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl LeadOutcome {
    fn ok() -> Self {
        Self {
            ok: true,
            error: None,
        }
    }

    fn failed(reason: impl Into<String>) -> Self {
        Self {
            ok: false,
            error: Some(reason.into()),
        }
    }
}

#[derive(Clone)]
pub struct LeadSink {
    http: reqwest::Client,
    endpoint: Option<String>,
}

impl LeadSink {
    pub fn new(cfg: &LeadsConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: cfg.endpoint.clone(),
        }
    }

    pub async fn submit(&self, lead: &LeadSubmission) -> LeadOutcome {
        match &self.endpoint {
            Some(endpoint) => match self.post(endpoint, lead).await {
                Ok(()) => LeadOutcome::ok(),
                Err(e) => {
                    warn!("lead submission to {} failed: {}", endpoint, e);
                    LeadOutcome::failed("We couldn't send that just now — please try again.")
                }
            },
            None => {
                // Log-only fallback: the lead is still captured server-side.
                info!(
                    "lead (log-only): source={} name={} contact={} message={}",
                    lead.source, lead.name, lead.contact, lead.message
                );
                LeadOutcome::ok()
            }
        }
    }

    async fn post(&self, endpoint: &str, lead: &LeadSubmission) -> Result<()> {
        let resp = self.http.post(endpoint).json(lead).send().await?;
        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            anyhow::bail!("lead endpoint returned {}: {}", status, text);
        }
        Ok(())
    }
}
