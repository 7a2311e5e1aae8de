// Hosted question-answering bridge
// Sends a question plus the flattened dataset context to the Hugging Face
// hosted inference endpoint and extracts the answer field. Transport and
// HTTP failures propagate; only a missing answer field gets the fallback.

use anyhow::{Context, Result};
use reqwest::blocking::Client as HttpClient;
use serde::Serialize;
use std::env;
use std::time::Duration;

/// Hosted inference endpoint base URL
pub const DEFAULT_ENDPOINT: &str = "https://api-inference.huggingface.co";

/// Extractive question-answering model served by the endpoint
pub const MODEL_REPO_ID: &str = "distilbert-base-cased-distilled-squad";

/// Returned when the model response carries no answer field
pub const NO_ANSWER_FALLBACK: &str = "No answer found.";

/// Optional bearer token for the hosted endpoint
pub const API_TOKEN_ENV: &str = "HF_API_TOKEN";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone)]
pub struct InferenceClient {
    endpoint: String,
    api_token: Option<String>,
}

impl InferenceClient {
    /// Client against the hosted endpoint, picking up `HF_API_TOKEN` from
    /// the environment when present (the endpoint also answers without one).
    pub fn new() -> Self {
        Self::with_endpoint(DEFAULT_ENDPOINT)
    }

    /// Client against a specific endpoint base URL (tests point this at a
    /// local stub).
    pub fn with_endpoint<S: Into<String>>(endpoint: S) -> Self {
        let api_token = match env::var(API_TOKEN_ENV) {
            Ok(token) if !token.trim().is_empty() => Some(token),
            _ => None,
        };
        Self {
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            api_token,
        }
    }

    /// Ask the hosted model a question over the given context.
    ///
    /// The request blocks until the endpoint responds; there is no retry and
    /// no rate-limit handling. A response object without an `answer` field
    /// yields the fixed fallback string.
    pub fn ask(&self, question: &str, context: &str) -> Result<String> {
        #[derive(Serialize)]
        struct Inputs<'a> {
            question: &'a str,
            context: &'a str,
        }
        #[derive(Serialize)]
        struct Payload<'a> {
            inputs: Inputs<'a>,
        }

        let http = HttpClient::builder()
            .user_agent("policy-analyzer/0.1")
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("Failed to build HTTP client")?;

        let url = format!("{}/models/{}", self.endpoint, MODEL_REPO_ID);
        let mut request = http.post(&url).json(&Payload {
            inputs: Inputs { question, context },
        });
        if let Some(token) = &self.api_token {
            request = request.bearer_auth(token);
        }

        let body: serde_json::Value = request
            .send()
            .context("Inference request failed")?
            .error_for_status()
            .context("Inference endpoint returned an error status")?
            .json()
            .context("Failed to decode inference response")?;

        Ok(body
            .get("answer")
            .and_then(|v| v.as_str())
            .map(str::to_string)
            .unwrap_or_else(|| NO_ANSWER_FALLBACK.to_string()))
    }
}

impl Default for InferenceClient {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// TESTS
// ============================================================================
