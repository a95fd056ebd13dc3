//! Agent categories and per-agent connection descriptors.
//!
//! An agent is one specialized conversational backend scoped to a topic
//! (jokes, small talk, weather, FAQ, alarm). Every routed turn resolves to at
//! most one [`AgentCategory`].

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Intent label used when no agent handled the turn.
pub const UNKNOWN_INTENT: &str = "unknown";

/// Reply text used when no agent handled the turn.
pub const FALLBACK_RESPONSE: &str = "I'm not sure how to respond to that.";

/// The fixed set of agents a turn can be routed to.
///
/// Wire names are `jokes`, `small_talk`, `weather`, `FAQ` and `alarm`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AgentCategory {
    #[serde(rename = "jokes")]
    Jokes,
    #[serde(rename = "small_talk")]
    SmallTalk,
    #[serde(rename = "weather")]
    Weather,
    #[serde(rename = "FAQ", alias = "faq")]
    Faq,
    #[serde(rename = "alarm")]
    Alarm,
}

impl AgentCategory {
    /// All categories in classification priority order.
    pub const ALL: [AgentCategory; 5] = [
        AgentCategory::Jokes,
        AgentCategory::SmallTalk,
        AgentCategory::Weather,
        AgentCategory::Faq,
        AgentCategory::Alarm,
    ];

    /// The wire name of this category.
    pub fn as_str(&self) -> &'static str {
        match self {
            AgentCategory::Jokes => "jokes",
            AgentCategory::SmallTalk => "small_talk",
            AgentCategory::Weather => "weather",
            AgentCategory::Faq => "FAQ",
            AgentCategory::Alarm => "alarm",
        }
    }
}

impl fmt::Display for AgentCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AgentCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "jokes" => Ok(AgentCategory::Jokes),
            "small_talk" => Ok(AgentCategory::SmallTalk),
            "weather" => Ok(AgentCategory::Weather),
            "faq" => Ok(AgentCategory::Faq),
            "alarm" => Ok(AgentCategory::Alarm),
            other => Err(format!("invalid agent category: '{other}'")),
        }
    }
}

/// Connection descriptor for one Dialogflow agent.
///
/// Loaded once at startup and never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Cloud project hosting the agent.
    pub project_id: String,
    /// Where the agent's access credential lives.
    pub credentials_path: PathBuf,
}

/// Result of a detect-intent call: the matched intent and its reply text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectedIntent {
    pub intent: String,
    pub fulfillment_text: String,
}

impl DetectedIntent {
    pub fn new(intent: impl Into<String>, fulfillment_text: impl Into<String>) -> Self {
        Self {
            intent: intent.into(),
            fulfillment_text: fulfillment_text.into(),
        }
    }

    /// The `("unknown", fallback)` pair returned whenever no agent can answer.
    pub fn unknown() -> Self {
        Self::new(UNKNOWN_INTENT, FALLBACK_RESPONSE)
    }

    pub fn is_unknown(&self) -> bool {
        self.intent == UNKNOWN_INTENT
    }
}
