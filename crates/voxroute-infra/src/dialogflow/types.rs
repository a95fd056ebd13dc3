//! Dialogflow v2 `detectIntent` REST types.
//!
//! These are Dialogflow-specific wire structures. They are NOT the generic
//! types from voxroute-types -- those are backend-agnostic.

use serde::{Deserialize, Serialize};

/// Request body for `POST .../sessions/{session}:detectIntent`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectIntentRequest {
    pub query_input: QueryInput,
}

#[derive(Debug, Clone, Serialize)]
pub struct QueryInput {
    pub text: TextInput,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TextInput {
    pub text: String,
    pub language_code: String,
}

impl DetectIntentRequest {
    pub fn text(text: &str, language_code: &str) -> Self {
        Self {
            query_input: QueryInput {
                text: TextInput {
                    text: text.to_string(),
                    language_code: language_code.to_string(),
                },
            },
        }
    }
}

/// Response body of `detectIntent`. Only the fields the router reads.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectIntentResponse {
    #[serde(default)]
    pub query_result: Option<QueryResult>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryResult {
    #[serde(default)]
    pub intent: Option<Intent>,
    #[serde(default)]
    pub fulfillment_text: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Intent {
    #[serde(default)]
    pub display_name: Option<String>,
}
