use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub assistant: AssistantConfig,
    /// The human agent behind the site. Feeds the contact-card widget and
    /// the lead sink's notification target.
    pub agent: AgentIdentity,
    #[serde(default)]
    pub leads: LeadsConfig,
    #[serde(default)]
    pub places: PlacesConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AssistantConfig {
    /// Base URL of the hosted assistant streaming backend.
    pub url: String,
    pub model: String,
    pub api_key: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AgentIdentity {
    pub name: String,
    pub email: String,
    pub phone: String,
    #[serde(default)]
    pub brokerage: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct LeadsConfig {
    /// Outbound lead endpoint. When absent, lead submissions fall back to a
    /// log-only path that still reports success to the visitor.
    pub endpoint: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct PlacesConfig {
    /// Places lookup endpoint. When absent, nearby-places searches resolve
    /// to an error output that the widget renders as a calm fallback.
    pub endpoint: Option<String>,
    pub api_key: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct LoggingConfig {
    pub level: Option<String>,
    pub directory: Option<String>,
    pub retention_days: Option<u64>,
}

impl Config {
    pub fn load_with_path() -> Result<(Self, Option<PathBuf>)> {
        let mut candidates = Vec::new();

        if let Ok(explicit) = std::env::var("HEARTH_CONFIG") {
            candidates.push(PathBuf::from(explicit));
        }

        candidates.push(PathBuf::from("hearth.toml"));

        if let Some(dir) = dirs::config_dir() {
            candidates.push(dir.join("hearth").join("hearth.toml"));
        }
        if let Some(dir) = dirs::data_dir() {
            candidates.push(dir.join("hearth").join("hearth.toml"));
        }

        for path in candidates {
            if path.exists() {
                let content = fs::read_to_string(&path)?;
                let config: Config = toml::from_str(&content)?;
                return Ok((config, Some(path)));
            }
        }

        Ok((Config::default(), None))
    }

    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            anyhow::bail!("Server port must be greater than 0");
        }
        let url_lower = self.assistant.url.trim().to_lowercase();
        if !url_lower.starts_with("http://") && !url_lower.starts_with("https://") {
            anyhow::bail!(
                "Assistant URL must start with http:// or https://, got: {}",
                self.assistant.url
            );
        }
        if self.assistant.model.trim().is_empty() {
            anyhow::bail!("Assistant model cannot be empty");
        }
        if self.agent.name.trim().is_empty() {
            anyhow::bail!("Agent name cannot be empty");
        }
        if let Some(endpoint) = &self.leads.endpoint {
            let lower = endpoint.trim().to_lowercase();
            if !lower.starts_with("http://") && !lower.starts_with("https://") {
                anyhow::bail!("Lead endpoint must be an http(s) URL, got: {}", endpoint);
            }
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig { port: 8741 },
            assistant: AssistantConfig {
                url: "http://127.0.0.1:11434".to_string(),
                model: "hearth-assistant".to_string(),
                api_key: None,
            },
            agent: AgentIdentity {
                name: "Maya Whitfield".to_string(),
                email: "maya@hearth.homes".to_string(),
                phone: "604-555-0184".to_string(),
                brokerage: Some("Hearth Realty Group".to_string()),
            },
            leads: LeadsConfig::default(),
            places: PlacesConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_validates() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_zero_port() {
        let mut cfg = Config::default();
        cfg.server.port = 0;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_rejects_bad_assistant_url() {
        let mut cfg = Config::default();
        cfg.assistant.url = "ftp://example.com".into();
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_rejects_bad_lead_endpoint() {
        let mut cfg = Config::default();
        cfg.leads.endpoint = Some("mailto:leads@example.com".into());
        assert!(cfg.validate().is_err());
    }
}
