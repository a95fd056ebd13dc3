//! Global configuration types for voxroute.
//!
//! `GlobalConfig` represents the top-level `config.toml`: server binding,
//! chat log database, Dialogflow connection settings, per-agent descriptors,
//! logging options, and the keyword routing table. Every section has defaults
//! so an empty file is valid.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::agent::{AgentCategory, AgentConfig};
use crate::error::ConfigError;

/// Top-level configuration for the router.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GlobalConfig {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub database: DatabaseConfig,

    #[serde(default)]
    pub dialogflow: DialogflowConfig,

    #[serde(default)]
    pub logging: LoggingConfig,

    /// Per-agent connection descriptors keyed by category wire name.
    #[serde(default = "default_agents")]
    pub agents: BTreeMap<String, AgentConfig>,

    /// Ordered routing rules. The first matching rule wins.
    #[serde(default)]
    pub keywords: KeywordTable,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            database: DatabaseConfig::default(),
            dialogflow: DialogflowConfig::default(),
            logging: LoggingConfig::default(),
            agents: default_agents(),
            keywords: KeywordTable::default(),
        }
    }
}

impl GlobalConfig {
    /// Resolve the `[agents.*]` section into typed categories.
    ///
    /// Section names are matched case-insensitively against the category wire
    /// names; an unrecognized name is a configuration error.
    pub fn agent_map(&self) -> Result<BTreeMap<AgentCategory, AgentConfig>, ConfigError> {
        self.agents
            .iter()
            .map(|(name, agent)| {
                let category = name.parse::<AgentCategory>().map_err(|reason| {
                    ConfigError::Invalid {
                        key: format!("agents.{name}"),
                        reason,
                    }
                })?;
                Ok((category, agent.clone()))
            })
            .collect()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Chat log storage. `url` has no default: it must come from the file or
/// `VOXROUTE_DATABASE_URL`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DialogflowConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_language_code")]
    pub language_code: String,
    /// Upper bound on a single detect-intent call.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "https://dialogflow.googleapis.com".to_string()
}

fn default_language_code() -> String {
    "en".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

impl Default for DialogflowConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            language_code: default_language_code(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Also append log lines to this file.
    #[serde(default)]
    pub log_file: Option<PathBuf>,
    /// Emit JSON lines instead of human-readable text.
    #[serde(default)]
    pub json: bool,
    /// Export spans through OpenTelemetry (stdout exporter).
    #[serde(default)]
    pub otel: bool,
}

/// The production agents, with credentials mounted under
/// `/app/credentials/`.
pub fn default_agents() -> BTreeMap<String, AgentConfig> {
    [
        (AgentCategory::Jokes, "neon-water-367016", "Jokes-bot.json"),
        (AgentCategory::SmallTalk, "reverberant-yew-376713", "Small-talk-bot.json"),
        (AgentCategory::Weather, "subtle-isotope-376716", "Weather-bot.json"),
        (AgentCategory::Faq, "western-grid-376705", "FAQ-bot.json"),
        (AgentCategory::Alarm, "my-new-project-451705", "Alarm-bot.json"),
    ]
    .into_iter()
    .map(|(category, project_id, file)| {
        (
            category.to_string(),
            AgentConfig {
                project_id: project_id.to_string(),
                credentials_path: PathBuf::from("/app/credentials").join(file),
            },
        )
    })
    .collect()
}

/// One routing rule: if any lemma is in `keywords`, route to `category`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordRule {
    pub category: AgentCategory,
    pub keywords: Vec<String>,
}

impl KeywordRule {
    pub fn new(category: AgentCategory, keywords: &[&str]) -> Self {
        Self {
            category,
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
        }
    }
}

/// Ordered category -> trigger-word table.
///
/// Serialized transparently as an array so `config.toml` can override it with
/// `[[keywords]]` entries. Rule order is priority order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeywordTable {
    pub rules: Vec<KeywordRule>,
}

impl KeywordTable {
    pub fn new(rules: Vec<KeywordRule>) -> Self {
        Self { rules }
    }

    /// Lowercase and trim every keyword, dropping empties.
    pub fn normalized(mut self) -> Self {
        for rule in &mut self.rules {
            rule.keywords = rule
                .keywords
                .iter()
                .map(|k| k.trim().to_lowercase())
                .filter(|k| !k.is_empty())
                .collect();
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl Default for KeywordTable {
    fn default() -> Self {
        Self::new(vec![
            KeywordRule::new(AgentCategory::Jokes, &["joke", "funny"]),
            KeywordRule::new(
                AgentCategory::SmallTalk,
                &["hello", "hi", "bye", "goodbye", "how", "you"],
            ),
            KeywordRule::new(
                AgentCategory::Weather,
                &["weather", "forecast", "rain", "temperature"],
            ),
            KeywordRule::new(
                AgentCategory::Faq,
                &["what", "do", "how", "where", "why", "compute", "engine"],
            ),
            KeywordRule::new(
                AgentCategory::Alarm,
                &["alarm", "wake", "repeat", "day", "check", "show", "set"],
            ),
        ])
    }
}
