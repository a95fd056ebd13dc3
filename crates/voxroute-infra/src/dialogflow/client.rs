//! DialogflowGateway -- concrete [`DialogueGateway`] implementation for
//! Dialogflow ES agents.
//!
//! Each agent category maps to its own Dialogflow project. A turn is sent to
//! `POST {base_url}/v2/projects/{project}/agent/sessions/{session}:detectIntent`
//! with a bearer token resolved from the agent's credential reference.
//! Tokens minted from service-account keys are cached per agent.
//!
//! The matched intent's `displayName` is returned as Dialogflow sent it; a
//! response without a matched intent yields an empty intent name.
//!
//! Categories without a configured agent get the unknown reply without any
//! network traffic.

use std::collections::BTreeMap;
use std::time::Duration;

use secrecy::ExposeSecret;
use uuid::Uuid;
use voxroute_core::dialogue::DialogueGateway;
use voxroute_types::agent::{AgentCategory, AgentConfig, DetectedIntent};
use voxroute_types::config::DialogflowConfig;
use voxroute_types::error::GatewayError;

use super::credentials::AccessTokenProvider;
use super::types::{DetectIntentRequest, DetectIntentResponse};

/// Dialogflow ES gateway.
///
/// Does not derive Debug: it is constructed from credential references and
/// has no useful printable state.
pub struct DialogflowGateway {
    client: reqwest::Client,
    agents: BTreeMap<AgentCategory, AgentConfig>,
    tokens: AccessTokenProvider,
    base_url: String,
    language_code: String,
}

impl DialogflowGateway {
    /// Create a gateway for the given agents.
    ///
    /// The HTTP client timeout matches `config.timeout_secs`; the chat service
    /// applies its own bound on top.
    pub fn new(
        agents: BTreeMap<AgentCategory, AgentConfig>,
        config: &DialogflowConfig,
    ) -> Result<Self, GatewayError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs.max(1)))
            .build()
            .map_err(|e| GatewayError::Transport(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            tokens: AccessTokenProvider::new(client.clone()),
            client,
            agents,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            language_code: config.language_code.clone(),
        })
    }

    /// Override the base URL (useful for testing or proxies).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Categories that have a backend configured.
    pub fn configured_agents(&self) -> impl Iterator<Item = AgentCategory> + '_ {
        self.agents.keys().copied()
    }

    fn session_url(&self, project_id: &str, session_id: Uuid) -> String {
        format!(
            "{}/v2/projects/{}/agent/sessions/{}:detectIntent",
            self.base_url, project_id, session_id
        )
    }
}

impl DialogueGateway for DialogflowGateway {
    async fn detect_intent(
        &self,
        text: &str,
        agent: AgentCategory,
        session_id: Uuid,
    ) -> Result<DetectedIntent, GatewayError> {
        let Some(agent_config) = self.agents.get(&agent) else {
            tracing::debug!(agent = %agent, "No Dialogflow agent configured");
            return Ok(DetectedIntent::unknown());
        };

        let token = self.tokens.access_token(agent, agent_config).await?;
        let url = self.session_url(&agent_config.project_id, session_id);
        let body = DetectIntentRequest::text(text, &self.language_code);

        tracing::debug!(agent = %agent, project_id = %agent_config.project_id, "Sending detectIntent");

        let response = self
            .client
            .post(&url)
            .bearer_auth(token.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(|e| GatewayError::Transport(format!("HTTP request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(match status.as_u16() {
                401 | 403 => GatewayError::Authentication,
                429 => GatewayError::RateLimited,
                code => GatewayError::Status {
                    status: code,
                    body: error_body,
                },
            });
        }

        let parsed: DetectIntentResponse = response.json().await.map_err(|e| {
            GatewayError::Deserialization(format!("failed to parse response: {e}"))
        })?;

        let result = parsed.query_result.unwrap_or_default();
        let intent = result
            .intent
            .and_then(|i| i.display_name)
            .unwrap_or_default();

        Ok(DetectedIntent {
            intent,
            fulfillment_text: result.fulfillment_text.unwrap_or_default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    use axum::extract::{Path, State};
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::post;
    use axum::{Form, Json, Router};

    #[derive(Clone, Default)]
    struct Captured {
        calls: Arc<Mutex<Vec<(String, String, Option<String>, serde_json::Value)>>>,
    }

    /// Fake Dialogflow endpoint. Project `denied` answers 401, `broken`
    /// answers 500, `nomatch` answers without a matched intent, anything
    /// else answers with a canned intent.
    async fn detect_intent_handler(
        State(captured): State<Captured>,
        Path((project, session)): Path<(String, String)>,
        headers: HeaderMap,
        Json(body): Json<serde_json::Value>,
    ) -> (StatusCode, Json<serde_json::Value>) {
        let auth = headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        captured
            .calls
            .lock()
            .unwrap()
            .push((project.clone(), session, auth, body));

        match project.as_str() {
            "denied" => (StatusCode::UNAUTHORIZED, Json(serde_json::json!({}))),
            "broken" => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({"error": "boom"})),
            ),
            "nomatch" => (
                StatusCode::OK,
                Json(serde_json::json!({
                    "responseId": "r-2",
                    "queryResult": {
                        "intent": { "displayName": "" },
                        "fulfillmentText": "Sorry, could you say that again?"
                    }
                })),
            ),
            _ => (
                StatusCode::OK,
                Json(serde_json::json!({
                    "responseId": "r-1",
                    "queryResult": {
                        "intent": { "displayName": "smalltalk.greetings.hello" },
                        "fulfillmentText": "Hi there!"
                    }
                })),
            ),
        }
    }

    /// Fake OAuth token endpoint for service-account agents.
    async fn token_handler(Form(form): Form<HashMap<String, String>>) -> Json<serde_json::Value> {
        assert!(form.contains_key("assertion"));
        Json(serde_json::json!({"access_token": "sa-minted-token", "expires_in": 3599}))
    }

    async fn spawn_fake_dialogflow() -> (String, Captured) {
        let captured = Captured::default();
        let app = Router::new()
            .route(
                "/v2/projects/{project}/agent/sessions/{session}",
                post(detect_intent_handler),
            )
            .route("/token", post(token_handler))
            .with_state(captured.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        (format!("http://{addr}"), captured)
    }

    fn agent_with_token(dir: &tempfile::TempDir, project: &str, token: &str) -> AgentConfig {
        let path = dir.path().join(format!("{project}.json"));
        std::fs::write(&path, format!(r#"{{"access_token": "{token}"}}"#)).unwrap();
        AgentConfig {
            project_id: project.to_string(),
            credentials_path: path,
        }
    }

    fn gateway(agents: BTreeMap<AgentCategory, AgentConfig>, base_url: &str) -> DialogflowGateway {
        DialogflowGateway::new(agents, &DialogflowConfig::default())
            .unwrap()
            .with_base_url(base_url)
    }

    #[tokio::test]
    async fn test_detect_intent_success() {
        let (base_url, captured) = spawn_fake_dialogflow().await;
        let dir = tempfile::tempdir().unwrap();
        let mut agents = BTreeMap::new();
        agents.insert(
            AgentCategory::SmallTalk,
            agent_with_token(&dir, "small-talk-project", "st-token"),
        );
        let gw = gateway(agents, &base_url);
        let session = Uuid::now_v7();

        let detected = gw
            .detect_intent("hello", AgentCategory::SmallTalk, session)
            .await
            .unwrap();

        assert_eq!(detected.intent, "smalltalk.greetings.hello");
        assert_eq!(detected.fulfillment_text, "Hi there!");

        let calls = captured.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        let (project, session_segment, auth, body) = &calls[0];
        assert_eq!(project, "small-talk-project");
        assert_eq!(session_segment, &format!("{session}:detectIntent"));
        assert_eq!(auth.as_deref(), Some("Bearer st-token"));
        assert_eq!(body["queryInput"]["text"]["text"], "hello");
        assert_eq!(body["queryInput"]["text"]["languageCode"], "en");
    }

    #[tokio::test]
    async fn test_service_account_agent_uses_minted_token() {
        let (base_url, captured) = spawn_fake_dialogflow().await;
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Jokes-bot.json");
        let key = serde_json::json!({
            "type": "service_account",
            "project_id": "jokes-project",
            "private_key": include_str!("testdata/service_account_key.pem"),
            "client_email": "jokes-bot@jokes-project.iam.gserviceaccount.com",
            "token_uri": format!("{base_url}/token"),
        });
        std::fs::write(&path, key.to_string()).unwrap();
        let mut agents = BTreeMap::new();
        agents.insert(
            AgentCategory::Jokes,
            AgentConfig {
                project_id: "jokes-project".to_string(),
                credentials_path: path,
            },
        );
        let gw = gateway(agents, &base_url);

        for _ in 0..2 {
            gw.detect_intent("tell me a joke", AgentCategory::Jokes, Uuid::now_v7())
                .await
                .unwrap();
        }

        let calls = captured.calls.lock().unwrap();
        assert_eq!(calls.len(), 2);
        for (project, _, auth, _) in calls.iter() {
            assert_eq!(project, "jokes-project");
            assert_eq!(auth.as_deref(), Some("Bearer sa-minted-token"));
        }
    }

    #[tokio::test]
    async fn test_empty_display_name_passes_through() {
        let (base_url, _captured) = spawn_fake_dialogflow().await;
        let dir = tempfile::tempdir().unwrap();
        let mut agents = BTreeMap::new();
        agents.insert(AgentCategory::Faq, agent_with_token(&dir, "nomatch", "t"));
        let gw = gateway(agents, &base_url);

        let detected = gw
            .detect_intent("what does it cost", AgentCategory::Faq, Uuid::now_v7())
            .await
            .unwrap();

        assert_eq!(detected.intent, "");
        assert!(!detected.is_unknown());
        assert_eq!(detected.fulfillment_text, "Sorry, could you say that again?");
    }

    #[tokio::test]
    async fn test_unconfigured_agent_returns_unknown_without_network() {
        // Nothing listens on this port; any request would fail.
        let gw = gateway(BTreeMap::new(), "http://127.0.0.1:9");

        let detected = gw
            .detect_intent("tell me a joke", AgentCategory::Jokes, Uuid::now_v7())
            .await
            .unwrap();

        assert!(detected.is_unknown());
        assert_eq!(detected.fulfillment_text, "I'm not sure how to respond to that.");
    }

    #[tokio::test]
    async fn test_unauthorized_maps_to_authentication_error() {
        let (base_url, _captured) = spawn_fake_dialogflow().await;
        let dir = tempfile::tempdir().unwrap();
        let mut agents = BTreeMap::new();
        agents.insert(AgentCategory::Jokes, agent_with_token(&dir, "denied", "bad"));
        let gw = gateway(agents, &base_url);

        let err = gw
            .detect_intent("joke", AgentCategory::Jokes, Uuid::now_v7())
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::Authentication));
    }

    #[tokio::test]
    async fn test_server_error_maps_to_status_error() {
        let (base_url, _captured) = spawn_fake_dialogflow().await;
        let dir = tempfile::tempdir().unwrap();
        let mut agents = BTreeMap::new();
        agents.insert(AgentCategory::Weather, agent_with_token(&dir, "broken", "t"));
        let gw = gateway(agents, &base_url);

        let err = gw
            .detect_intent("rain?", AgentCategory::Weather, Uuid::now_v7())
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::Status { status: 500, .. }));
    }

    #[tokio::test]
    async fn test_missing_credentials_fail_before_request() {
        let (base_url, captured) = spawn_fake_dialogflow().await;
        let mut agents = BTreeMap::new();
        agents.insert(
            AgentCategory::Faq,
            AgentConfig {
                project_id: "faq".to_string(),
                credentials_path: "/nonexistent/voxroute/faq.json".into(),
            },
        );
        let gw = gateway(agents, &base_url);

        let err = gw
            .detect_intent("what is this", AgentCategory::Faq, Uuid::now_v7())
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::Credentials { .. }));
        assert!(captured.calls.lock().unwrap().is_empty());
    }

    #[test]
    fn test_session_url_shape() {
        let gw = gateway(BTreeMap::new(), "https://dialogflow.example.com/");
        let session = Uuid::nil();
        assert_eq!(
            gw.session_url("proj", session),
            "https://dialogflow.example.com/v2/projects/proj/agent/sessions/00000000-0000-0000-0000-000000000000:detectIntent"
        );
    }
}
