//! Chat service orchestrating a single routed turn.
//!
//! ChatService coordinates the classifier, the DialogueGateway and the
//! ChatLogRepository: classify the utterance, ask the matched agent (or fall
//! back to the unknown reply), append the turn to the chat log, and return
//! the reply. Backend and storage failures are logged and absorbed; a turn
//! always produces a reply.

use std::time::Duration;

use tracing::{debug, error, info, warn};
use uuid::Uuid;
use voxroute_types::agent::{AgentCategory, DetectedIntent};
use voxroute_types::chat::{ChatLogEntry, ChatReply};
use voxroute_types::error::{GatewayError, RepositoryError};

use crate::chat::repository::ChatLogRepository;
use crate::classify::AgentClassifier;
use crate::dialogue::DialogueGateway;
use crate::nlp::Lemmatizer;

/// Default upper bound on one dialogue backend call.
pub const DEFAULT_GATEWAY_TIMEOUT: Duration = Duration::from_secs(10);

/// Orchestrates classification, intent detection and chat logging.
///
/// Generic over the lemmatizer, gateway and repository so that voxroute-core
/// never depends on voxroute-infra.
pub struct ChatService<L: Lemmatizer, G: DialogueGateway, R: ChatLogRepository> {
    classifier: AgentClassifier<L>,
    gateway: G,
    log_repo: R,
    gateway_timeout: Duration,
}

impl<L: Lemmatizer, G: DialogueGateway, R: ChatLogRepository> ChatService<L, G, R> {
    /// Create a new chat service.
    pub fn new(classifier: AgentClassifier<L>, gateway: G, log_repo: R) -> Self {
        Self {
            classifier,
            gateway,
            log_repo,
            gateway_timeout: DEFAULT_GATEWAY_TIMEOUT,
        }
    }

    /// Override the dialogue backend timeout.
    pub fn with_gateway_timeout(mut self, timeout: Duration) -> Self {
        self.gateway_timeout = timeout;
        self
    }

    pub fn classifier(&self) -> &AgentClassifier<L> {
        &self.classifier
    }

    pub fn log_repo(&self) -> &R {
        &self.log_repo
    }

    /// Handle one turn end to end.
    ///
    /// Unmatched utterances never reach the gateway. The log entry is written
    /// after the reply is known; a failed write is logged and does not affect
    /// the reply.
    pub async fn handle_turn(&self, session_id: Uuid, utterance: &str) -> ChatReply {
        info!(session_id = %session_id, user_input = %utterance, "Chat turn received");

        let agent = self.classifier.classify(utterance);
        let detected = match agent {
            Some(agent) => self.detect(utterance, agent, session_id).await,
            None => DetectedIntent::unknown(),
        };

        info!(
            session_id = %session_id,
            agent = agent.map(|a| a.as_str()).unwrap_or("none"),
            intent = %detected.intent,
            response = %detected.fulfillment_text,
            "Chat turn resolved"
        );

        let entry = ChatLogEntry::new(
            session_id,
            utterance,
            agent,
            detected.intent.clone(),
            detected.fulfillment_text.clone(),
        );
        if let Err(e) = self.log_repo.append(&entry).await {
            error!(session_id = %session_id, entry_id = %entry.id, error = %e, "Failed to save chat log entry");
        } else {
            debug!(session_id = %session_id, entry_id = %entry.id, "Chat log entry saved");
        }

        ChatReply {
            agent,
            intent: detected.intent,
            response: detected.fulfillment_text,
        }
    }

    /// Ask the gateway, degrading to the unknown reply on error or timeout.
    async fn detect(&self, utterance: &str, agent: AgentCategory, session_id: Uuid) -> DetectedIntent {
        let call = self.gateway.detect_intent(utterance, agent, session_id);
        let result = match tokio::time::timeout(self.gateway_timeout, call).await {
            Ok(result) => result,
            Err(_) => Err(GatewayError::Timeout(self.gateway_timeout.as_millis() as u64)),
        };

        match result {
            Ok(detected) => detected,
            Err(e) => {
                warn!(
                    session_id = %session_id,
                    agent = %agent,
                    error = %e,
                    "Dialogue backend failed, falling back to unknown reply"
                );
                DetectedIntent::unknown()
            }
        }
    }

    /// Stored turns of a session, oldest first.
    pub async fn history(
        &self,
        session_id: &Uuid,
        limit: Option<i64>,
    ) -> Result<Vec<ChatLogEntry>, RepositoryError> {
        self.log_repo.list_by_session(session_id, limit).await
    }

    /// Total number of stored turns.
    pub async fn count_turns(&self) -> Result<u64, RepositoryError> {
        self.log_repo.count().await
    }
}
