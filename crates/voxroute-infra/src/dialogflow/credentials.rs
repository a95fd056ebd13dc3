//! Access tokens for Dialogflow agents.
//!
//! Each agent's credential reference (`credentials_path`) resolves to a
//! bearer token. Resolution order:
//! 1. `VOXROUTE_{AGENT}_ACCESS_TOKEN` (e.g. `VOXROUTE_SMALL_TALK_ACCESS_TOKEN`)
//! 2. a token previously minted for the agent that is not about to expire
//! 3. the file at `credentials_path`:
//!    - a Google service-account key (`"type": "service_account"`): an RS256
//!      JWT assertion is signed with the key's private key and exchanged at
//!      its `token_uri`; the result is cached per agent until expiry
//!    - a JSON object with `access_token` or `token`
//!    - otherwise the trimmed file content as a raw token
//!
//! Tokens are wrapped in [`SecretString`] and never logged.

use std::collections::BTreeMap;
use std::sync::Mutex;

use chrono::Utc;
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use voxroute_types::agent::{AgentCategory, AgentConfig};
use voxroute_types::error::GatewayError;

/// OAuth scope granting access to the Dialogflow API.
pub const DIALOGFLOW_SCOPE: &str = "https://www.googleapis.com/auth/dialogflow";

const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";
const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const ASSERTION_LIFETIME_SECS: i64 = 3600;
/// Minted tokens are refreshed this long before they expire.
const EXPIRY_MARGIN_SECS: i64 = 60;

/// The fields of a Google service-account key file needed to mint tokens.
#[derive(Deserialize)]
pub struct ServiceAccountKey {
    pub client_email: String,
    pub private_key: SecretString,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

/// What a credential file contains.
pub enum Credential {
    /// A ready bearer token.
    Token(SecretString),
    /// A key that tokens are minted from.
    ServiceAccount(ServiceAccountKey),
}

/// Environment variable that overrides the token for `agent`.
pub fn token_env_var(agent: AgentCategory) -> String {
    format!("VOXROUTE_{}_ACCESS_TOKEN", agent.as_str().to_uppercase())
}

/// Classify credential file content.
pub fn parse_credential_file(content: &str) -> Result<Credential, String> {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return Err("credential file is empty".to_string());
    }
    if !trimmed.starts_with('{') {
        return Ok(Credential::Token(SecretString::from(trimmed.to_string())));
    }

    let value: serde_json::Value =
        serde_json::from_str(trimmed).map_err(|e| format!("invalid JSON: {e}"))?;

    if value.get("type").and_then(|v| v.as_str()) == Some("service_account") {
        let key: ServiceAccountKey = serde_json::from_value(value)
            .map_err(|e| format!("invalid service account key: {e}"))?;
        return Ok(Credential::ServiceAccount(key));
    }

    ["access_token", "token"]
        .iter()
        .find_map(|key| value.get(key).and_then(|v| v.as_str()))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(|t| Credential::Token(SecretString::from(t.to_string())))
        .ok_or_else(|| "no access token or service account key found".to_string())
}

#[derive(Serialize)]
struct AssertionClaims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<i64>,
}

struct CachedToken {
    token: SecretString,
    expires_at: i64,
}

fn credentials_error(agent: AgentCategory, reason: impl Into<String>) -> GatewayError {
    GatewayError::Credentials {
        agent: agent.to_string(),
        reason: reason.into(),
    }
}

/// Resolves and caches bearer tokens for every configured agent.
pub struct AccessTokenProvider {
    client: reqwest::Client,
    cache: Mutex<BTreeMap<AgentCategory, CachedToken>>,
}

impl AccessTokenProvider {
    pub fn new(client: reqwest::Client) -> Self {
        Self {
            client,
            cache: Mutex::new(BTreeMap::new()),
        }
    }

    /// Bearer token for one agent.
    pub async fn access_token(
        &self,
        agent: AgentCategory,
        config: &AgentConfig,
    ) -> Result<SecretString, GatewayError> {
        if let Ok(token) = std::env::var(token_env_var(agent)) {
            if !token.trim().is_empty() {
                return Ok(SecretString::from(token.trim().to_string()));
            }
        }

        if let Some(token) = self.cached(agent) {
            return Ok(token);
        }

        let content = tokio::fs::read_to_string(&config.credentials_path)
            .await
            .map_err(|e| {
                credentials_error(
                    agent,
                    format!("cannot read {}: {e}", config.credentials_path.display()),
                )
            })?;

        let credential = parse_credential_file(&content).map_err(|reason| {
            credentials_error(
                agent,
                format!("{} in {}", reason, config.credentials_path.display()),
            )
        })?;

        match credential {
            Credential::Token(token) => Ok(token),
            Credential::ServiceAccount(key) => {
                let minted = self.exchange(agent, &key).await?;
                let token = SecretString::from(minted.token.expose_secret().to_string());
                if let Ok(mut cache) = self.cache.lock() {
                    cache.insert(agent, minted);
                }
                Ok(token)
            }
        }
    }

    fn cached(&self, agent: AgentCategory) -> Option<SecretString> {
        let cache = self.cache.lock().ok()?;
        let entry = cache.get(&agent)?;
        if Utc::now().timestamp() < entry.expires_at - EXPIRY_MARGIN_SECS {
            Some(SecretString::from(entry.token.expose_secret().to_string()))
        } else {
            None
        }
    }

    /// Sign a JWT assertion with the service-account key and trade it for an
    /// access token at the key's `token_uri`.
    async fn exchange(
        &self,
        agent: AgentCategory,
        key: &ServiceAccountKey,
    ) -> Result<CachedToken, GatewayError> {
        let now = Utc::now().timestamp();
        let claims = AssertionClaims {
            iss: &key.client_email,
            scope: DIALOGFLOW_SCOPE,
            aud: &key.token_uri,
            iat: now,
            exp: now + ASSERTION_LIFETIME_SECS,
        };

        let encoding_key = EncodingKey::from_rsa_pem(key.private_key.expose_secret().as_bytes())
            .map_err(|e| credentials_error(agent, format!("invalid service account private key: {e}")))?;
        let assertion = jsonwebtoken::encode(&Header::new(Algorithm::RS256), &claims, &encoding_key)
            .map_err(|e| credentials_error(agent, format!("failed to sign JWT assertion: {e}")))?;

        let response = self
            .client
            .post(&key.token_uri)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()
            .await
            .map_err(|e| GatewayError::Transport(format!("token exchange failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(credentials_error(
                agent,
                format!("token exchange returned HTTP {status}: {body}"),
            ));
        }

        let parsed: TokenResponse = response
            .json()
            .await
            .map_err(|e| GatewayError::Deserialization(format!("invalid token response: {e}")))?;

        tracing::info!(
            agent = %agent,
            client_email = %key.client_email,
            "Minted Dialogflow access token from service account"
        );

        Ok(CachedToken {
            token: SecretString::from(parsed.access_token),
            expires_at: now + parsed.expires_in.unwrap_or(ASSERTION_LIFETIME_SECS),
        })
    }
}
