//! DialogueGateway trait definition.
//!
//! Uses native async fn in traits (RPITIT), matching the repository traits.

use uuid::Uuid;
use voxroute_types::agent::{AgentCategory, DetectedIntent};
use voxroute_types::error::GatewayError;

/// Sends a routed utterance to the agent scoped to `agent` and returns the
/// detected intent and fulfillment text.
///
/// Implementations return `Ok(DetectedIntent::unknown())` when no backend is
/// configured for `agent`; `Err` is reserved for backend failures.
pub trait DialogueGateway: Send + Sync {
    fn detect_intent(
        &self,
        text: &str,
        agent: AgentCategory,
        session_id: Uuid,
    ) -> impl std::future::Future<Output = Result<DetectedIntent, GatewayError>> + Send;
}
