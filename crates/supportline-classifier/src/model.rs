//! Model client abstraction and the hosted Gemini implementation
//!
//! The pipeline only needs "prompt in, text out". [`ModelClient`] is that seam;
//! [`GeminiClient`] talks to the Generative Language REST API:
//!
//! ```text
//! POST {base}/models/{model}:generateContent
//! {"contents":[{"role":"user","parts":[{"text":"..."}]}],"generationConfig":{"temperature":0.2}}
//! ```

use crate::config::ModelSettings;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, OnceLock};
use std::time::Duration;
use supportline_core::{Error, Result};

/// Environment variables checked for an API key, in priority order
pub const API_KEY_VARS: [&str; 2] = ["GEMINI_API_KEY", "GOOGLE_API_KEY"];

const API_KEY_HEADER: &str = "x-goog-api-key";

/// A single text generation call
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    /// Model identifier
    pub model: String,

    /// Full prompt text
    pub prompt: String,

    /// Sampling temperature
    pub temperature: f32,
}

impl GenerationRequest {
    pub fn new(model: impl Into<String>, prompt: impl Into<String>, temperature: f32) -> Self {
        Self {
            model: model.into(),
            prompt: prompt.into(),
            temperature,
        }
    }
}

/// Trait for generative text backends
#[async_trait]
pub trait ModelClient: Send + Sync {
    /// Generate free-form text for the request
    ///
    /// An empty string is a valid answer. Errors are reserved for transport and
    /// API failures.
    async fn generate(&self, request: &GenerationRequest) -> Result<String>;

    /// Backend name, for logging
    fn name(&self) -> &str;
}

/// How the client authenticates
#[derive(Clone, PartialEq, Eq)]
pub enum Credentials {
    /// Send this API key with every request
    ApiKey(String),

    /// Send no key and let the provider resolve or reject credentials
    Implicit,
}

impl Credentials {
    /// Resolve credentials from [`API_KEY_VARS`]; empty values count as unset
    pub fn from_env() -> Self {
        Self::resolve(|name| std::env::var(name).ok())
    }

    /// Resolve credentials through an arbitrary variable lookup
    pub fn resolve(lookup: impl Fn(&str) -> Option<String>) -> Self {
        API_KEY_VARS
            .into_iter()
            .filter_map(|name| lookup(name))
            .map(|value| value.trim().to_string())
            .find(|value| !value.is_empty())
            .map(Self::ApiKey)
            .unwrap_or(Self::Implicit)
    }

    pub fn is_explicit(&self) -> bool {
        matches!(self, Self::ApiKey(_))
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ApiKey(_) => f.write_str("ApiKey(<redacted>)"),
            Self::Implicit => f.write_str("Implicit"),
        }
    }
}

/// Client for the Gemini generateContent endpoint
#[derive(Debug, Clone)]
pub struct GeminiClient {
    http: Client,
    base_url: String,
    credentials: Credentials,
}

impl GeminiClient {
    /// Build a client with explicit credentials
    pub fn new(settings: &ModelSettings, credentials: Credentials) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(|e| Error::config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: settings.api_base_url.trim_end_matches('/').to_string(),
            credentials,
        })
    }

    /// Build a client with credentials taken from the environment
    pub fn from_env(settings: &ModelSettings) -> Result<Self> {
        let credentials = Credentials::from_env();
        if !credentials.is_explicit() {
            tracing::debug!("No API key in environment, relying on implicit credentials");
        }
        Self::new(settings, credentials)
    }

    fn endpoint(&self, model: &str) -> String {
        format!("{}/models/{}:generateContent", self.base_url, model)
    }
}

#[async_trait]
impl ModelClient for GeminiClient {
    async fn generate(&self, request: &GenerationRequest) -> Result<String> {
        let body = GenerateContentRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![TextPart {
                    text: &request.prompt,
                }],
            }],
            generation_config: GenerationConfig {
                temperature: request.temperature,
            },
        };

        let mut builder = self.http.post(self.endpoint(&request.model)).json(&body);
        if let Credentials::ApiKey(key) = &self.credentials {
            builder = builder.header(API_KEY_HEADER, key);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| Error::transport(format!("Request to model API failed: {}", e)))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| Error::transport(format!("Failed to read model API response: {}", e)))?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorEnvelope>(&text)
                .map(|envelope| envelope.error.message)
                .unwrap_or(text);
            return Err(Error::api(status.as_u16(), message));
        }

        let parsed: GenerateContentResponse = serde_json::from_str(&text)?;
        Ok(parsed.text())
    }

    fn name(&self) -> &str {
        "gemini"
    }
}

static SHARED_CLIENT: OnceLock<Arc<GeminiClient>> = OnceLock::new();

/// Process-wide Gemini client, created on first use
///
/// Later calls return the same handle and ignore `settings`.
pub fn shared_client(settings: &ModelSettings) -> Result<Arc<GeminiClient>> {
    if let Some(client) = SHARED_CLIENT.get() {
        return Ok(Arc::clone(client));
    }

    let client = Arc::new(GeminiClient::from_env(settings)?);
    Ok(Arc::clone(SHARED_CLIENT.get_or_init(|| client)))
}

#[derive(Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content<'a> {
    role: &'a str,
    parts: Vec<TextPart<'a>>,
}

#[derive(Serialize)]
struct TextPart<'a> {
    text: &'a str,
}

#[derive(Serialize)]
struct GenerationConfig {
    temperature: f32,
}

#[derive(Deserialize, Default)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

impl GenerateContentResponse {
    /// Concatenated text of the first candidate, or empty
    fn text(&self) -> String {
        self.candidates
            .first()
            .and_then(|candidate| candidate.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .filter_map(|part| part.text.as_deref())
                    .collect::<String>()
            })
            .unwrap_or_default()
    }
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}
