//! Axum router configuration with middleware.
//!
//! Middleware: CORS (session header exposed to browsers) and request tracing.

use axum::Router;
use axum::http::HeaderName;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use voxroute_core::chat::session::SESSION_HEADER;

use crate::http::handlers;
use crate::state::AppState;

/// Build the complete API router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
        .expose_headers([HeaderName::from_static(SESSION_HEADER)]);

    Router::new()
        .route("/", get(handlers::home::welcome))
        .route("/chat/", post(handlers::chat::chat))
        .route("/chat", post(handlers::chat::chat))
        .route("/sessions/{id}/logs", get(handlers::session::get_logs))
        .route("/health", get(handlers::home::health_check))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::{Value, json};
    use tower::ServiceExt;
    use uuid::Uuid;

    use voxroute_core::chat::service::ChatService;
    use voxroute_core::classify::AgentClassifier;
    use voxroute_core::nlp::RuleLemmatizer;
    use voxroute_infra::dialogflow::DialogflowGateway;
    use voxroute_infra::sqlite::chat_log::SqliteChatLogRepository;
    use voxroute_infra::sqlite::pool::DatabasePool;
    use voxroute_types::config::DialogflowConfig;

    /// Router over a temp SQLite log and a gateway with no agents, so matched
    /// turns resolve to the unknown reply without network access.
    async fn test_router() -> Router {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite://{}?mode=rwc", dir.path().join("chat.db").display());
        // Leak tempdir so it lives for the test
        std::mem::forget(dir);
        let pool = DatabasePool::open(&url).await.unwrap();

        let gateway = DialogflowGateway::new(BTreeMap::new(), &DialogflowConfig::default()).unwrap();
        let service = ChatService::new(
            AgentClassifier::with_default_table(RuleLemmatizer::new()),
            gateway,
            SqliteChatLogRepository::new(pool),
        );
        build_router(AppState::from_service(service))
    }

    fn chat_request(uri: &str, session: Option<&str>, body: Value) -> Request<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json");
        if let Some(session) = session {
            builder = builder.header(SESSION_HEADER, session);
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    async fn body_json(resp: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_welcome() {
        let app = test_router().await;
        let resp = app
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            body_json(resp).await,
            json!({"message": "Welcome to the AI Voice Assistant API!"})
        );
    }

    #[tokio::test]
    async fn test_unmatched_chat_returns_null_agent() {
        let app = test_router().await;
        let resp = app
            .oneshot(chat_request(
                "/chat/",
                None,
                json!({"user_input": "xyz completely unrelated text"}),
            ))
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        let session = resp.headers().get(SESSION_HEADER).unwrap().to_str().unwrap();
        assert!(Uuid::parse_str(session).is_ok());
        assert_eq!(
            body_json(resp).await,
            json!({
                "agent": null,
                "intent": "unknown",
                "response": "I'm not sure how to respond to that."
            })
        );
    }

    #[tokio::test]
    async fn test_matched_chat_without_backend_is_unknown() {
        let app = test_router().await;
        let resp = app
            .oneshot(chat_request("/chat", None, json!({"user_input": "tell me a joke"})))
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        let body = body_json(resp).await;
        assert_eq!(body["agent"], "jokes");
        assert_eq!(body["intent"], "unknown");
        assert_eq!(body["response"], "I'm not sure how to respond to that.");
    }

    #[tokio::test]
    async fn test_bad_session_header_rejected() {
        let app = test_router().await;
        let resp = app
            .oneshot(chat_request(
                "/chat/",
                Some("not-a-uuid"),
                json!({"user_input": "hello"}),
            ))
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(resp).await["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_malformed_body_rejected() {
        let app = test_router().await;
        let resp = app
            .oneshot(
                Request::post("/chat/")
                    .header("content-type", "application/json")
                    .body(Body::from("{\"text\": 1}"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert!(resp.status().is_client_error());
    }

    #[tokio::test]
    async fn test_session_logs_and_health() {
        let app = test_router().await;
        let session = Uuid::now_v7().to_string();

        for text in ["hi there", "set an alarm for 7am", "qwerty"] {
            let resp = app
                .clone()
                .oneshot(chat_request("/chat/", Some(&session), json!({"user_input": text})))
                .await
                .unwrap();
            assert_eq!(resp.status(), StatusCode::OK);
            assert_eq!(resp.headers().get(SESSION_HEADER).unwrap(), session.as_str());
        }

        let resp = app
            .clone()
            .oneshot(
                Request::get(format!("/sessions/{session}/logs"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let logs = body_json(resp).await;
        let logs = logs.as_array().unwrap();
        assert_eq!(logs.len(), 3);
        assert_eq!(logs[0]["user_input"], "hi there");
        assert_eq!(logs[0]["agent"], "small_talk");
        assert_eq!(logs[1]["agent"], "alarm");
        assert_eq!(logs[2]["agent"], Value::Null);

        let resp = app
            .clone()
            .oneshot(
                Request::get(format!("/sessions/{session}/logs?limit=1"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(body_json(resp).await.as_array().unwrap().len(), 1);

        let resp = app
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let health = body_json(resp).await;
        assert_eq!(health["status"], "ok");
        assert_eq!(health["chat_logs"], 3);
    }

    #[tokio::test]
    async fn test_logs_bad_session_id_rejected() {
        let app = test_router().await;
        let resp = app
            .oneshot(
                Request::get("/sessions/nope/logs")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}
