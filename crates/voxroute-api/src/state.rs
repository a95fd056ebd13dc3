//! Application state wiring the chat service to its concrete adapters.
//!
//! ChatService is generic over lemmatizer, gateway and log repository;
//! AppState pins it to the rule lemmatizer, the Dialogflow gateway and the
//! SQLite chat log.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use voxroute_core::chat::service::ChatService;
use voxroute_core::classify::AgentClassifier;
use voxroute_core::nlp::RuleLemmatizer;
use voxroute_infra::config::require_database_url;
use voxroute_infra::dialogflow::DialogflowGateway;
use voxroute_infra::sqlite::chat_log::SqliteChatLogRepository;
use voxroute_infra::sqlite::pool::DatabasePool;
use voxroute_types::config::GlobalConfig;

/// Concrete type alias for the service generics pinned to infra implementations.
pub type ConcreteChatService =
    ChatService<RuleLemmatizer, DialogflowGateway, SqliteChatLogRepository>;

/// Shared application state, used by both CLI commands and HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    pub chat_service: Arc<ConcreteChatService>,
}

impl AppState {
    /// Connect to the chat log database and wire the chat service.
    ///
    /// Fails when the database URL is missing, the database cannot be
    /// opened, or an `[agents]` entry names an unknown category.
    pub async fn init(config: &GlobalConfig) -> anyhow::Result<Self> {
        let db_url = require_database_url(config)?;
        let db_pool = DatabasePool::open(db_url)
            .await
            .with_context(|| format!("failed to open chat log database at {db_url}"))?;

        if config.keywords.is_empty() {
            tracing::warn!("Keyword table is empty; every turn will be unmatched");
        }
        let classifier = AgentClassifier::new(RuleLemmatizer::new(), config.keywords.clone());

        let agents = config.agent_map()?;
        let gateway = DialogflowGateway::new(agents, &config.dialogflow)?;
        let configured: Vec<&str> = gateway.configured_agents().map(|a| a.as_str()).collect();
        tracing::info!(agents = ?configured, "Dialogflow gateway ready");

        let chat_service = ChatService::new(
            classifier,
            gateway,
            SqliteChatLogRepository::new(db_pool),
        )
        .with_gateway_timeout(Duration::from_secs(config.dialogflow.timeout_secs.max(1)));

        Ok(Self::from_service(chat_service))
    }

    pub fn from_service(chat_service: ConcreteChatService) -> Self {
        Self {
            chat_service: Arc::new(chat_service),
        }
    }
}
