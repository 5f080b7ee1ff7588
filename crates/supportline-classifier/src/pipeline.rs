//! Classification pipeline: request, validate, retry once, fall back
//!
//! ```text
//! FirstAttempt --valid--> Done
//!      |
//!   invalid
//!      v
//! SecondAttempt --valid--> Done
//!      |
//!   invalid
//!      v
//!   Fallback ------------> Done
//! ```
//!
//! At most two model calls are made per classification. Transport and API errors
//! abort the pipeline and are returned to the caller; unusable model output never is.

use crate::classifier::Classifier;
use crate::config::{ClassifierConfig, CORRECTION_TEMPERATURE};
use crate::extract::{extract_json_object, parse_candidate};
use crate::model::{GenerationRequest, ModelClient};
use crate::prompt::{classification_input, correction_prompt, instruction_prompt};
use crate::validator::{validate_result, SchemaViolation};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Instant;
use supportline_core::{
    Category, ClassificationRequest, ClassificationResult, Result, Sentiment,
};
use tracing::{debug, info, warn};

/// Which model call is being made
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attempt {
    /// Classification from the instruction prompt
    First,
    /// Repair of the first attempt's output
    Correction,
}

impl Attempt {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::First => "first",
            Self::Correction => "correction",
        }
    }

    pub fn number(&self) -> u8 {
        match self {
            Self::First => 1,
            Self::Correction => 2,
        }
    }
}

/// How the returned result was obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// The first response was valid
    FirstAttempt,
    /// The corrective response was valid
    Corrected,
    /// Neither response was usable
    Fallback,
}

impl Resolution {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FirstAttempt => "first_attempt",
            Self::Corrected => "corrected",
            Self::Fallback => "fallback",
        }
    }
}

/// Why a raw model response could not be used
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Rejection {
    #[error("no JSON object found in response")]
    NoJson,

    #[error("extracted text is not valid JSON")]
    Malformed,

    #[error("{0}")]
    Schema(#[from] SchemaViolation),
}

/// Extract, parse and validate one raw response
pub fn evaluate_response(raw: &str) -> std::result::Result<ClassificationResult, Rejection> {
    let candidate = extract_json_object(raw).ok_or(Rejection::NoJson)?;
    let value = parse_candidate(Some(candidate)).ok_or(Rejection::Malformed)?;
    Ok(validate_result(&value)?)
}

/// Complete pipeline execution result
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineOutcome {
    /// Schema-valid result handed to the caller
    pub result: ClassificationResult,

    /// Path taken through the pipeline
    pub resolution: Resolution,

    /// Number of model calls made (1 or 2)
    pub attempts: u8,

    /// Total pipeline execution time
    pub latency_us: u64,
}

enum PipelineState {
    FirstAttempt,
    SecondAttempt { previous_output: String },
    Fallback,
    Done {
        result: ClassificationResult,
        resolution: Resolution,
    },
}

/// Customer support classifier backed by a generative model
pub struct SupportClassifier {
    name: String,
    client: Arc<dyn ModelClient>,
    config: ClassifierConfig,
    instructions: String,
}

impl SupportClassifier {
    /// Create a classifier around a model client
    ///
    /// Fails with a configuration error if `config` does not validate.
    pub fn new(client: Arc<dyn ModelClient>, config: ClassifierConfig) -> Result<Self> {
        Self::with_name("support", client, config)
    }

    pub fn with_name(
        name: impl Into<String>,
        client: Arc<dyn ModelClient>,
        config: ClassifierConfig,
    ) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            name: name.into(),
            client,
            config,
            instructions: instruction_prompt(&Category::ALL, &Sentiment::ALL),
        })
    }

    /// Classify raw user input, rejecting blank messages
    pub async fn classify_message(&self, message: &str) -> Result<ClassificationResult> {
        let request = ClassificationRequest::new(message)?;
        self.classify(&request).await
    }

    /// Run the pipeline and report how the result was obtained
    pub async fn classify_detailed(&self, request: &ClassificationRequest) -> Result<PipelineOutcome> {
        let start = Instant::now();
        let mut attempts = 0u8;
        let mut state = PipelineState::FirstAttempt;

        loop {
            state = match state {
                PipelineState::FirstAttempt => {
                    let prompt = classification_input(&self.instructions, request.message());
                    let raw = self.call_model(Attempt::First, prompt).await?;
                    attempts += 1;

                    match self.evaluate(Attempt::First, &raw) {
                        Some(result) => PipelineState::Done {
                            result,
                            resolution: Resolution::FirstAttempt,
                        },
                        None => PipelineState::SecondAttempt {
                            previous_output: raw,
                        },
                    }
                }

                PipelineState::SecondAttempt { previous_output } => {
                    let prompt = correction_prompt(&previous_output);
                    let raw = self.call_model(Attempt::Correction, prompt).await?;
                    attempts += 1;

                    match self.evaluate(Attempt::Correction, &raw) {
                        Some(result) => PipelineState::Done {
                            result,
                            resolution: Resolution::Corrected,
                        },
                        None => PipelineState::Fallback,
                    }
                }

                PipelineState::Fallback => PipelineState::Done {
                    result: ClassificationResult::fallback(),
                    resolution: Resolution::Fallback,
                },

                PipelineState::Done { result, resolution } => {
                    let latency_us = start.elapsed().as_micros() as u64;
                    self.record(resolution, latency_us);

                    return Ok(PipelineOutcome {
                        result,
                        resolution,
                        attempts,
                        latency_us,
                    });
                }
            };
        }
    }

    async fn call_model(&self, attempt: Attempt, prompt: String) -> Result<String> {
        let temperature = match attempt {
            Attempt::First => self.config.temperature,
            Attempt::Correction => CORRECTION_TEMPERATURE,
        };

        debug!(
            classifier = %self.name,
            backend = self.client.name(),
            attempt = attempt.number(),
            temperature,
            "Calling model"
        );
        metrics::counter!("supportline_model_calls_total", "attempt" => attempt.as_str())
            .increment(1);

        let request = GenerationRequest::new(self.config.model.clone(), prompt, temperature);
        let raw = self.client.generate(&request).await?;

        debug!(attempt = attempt.number(), response_len = raw.len(), "Model responded");
        if self.config.log_raw_responses {
            debug!(attempt = attempt.number(), raw = %raw, "Raw model response");
        }

        Ok(raw)
    }

    fn evaluate(&self, attempt: Attempt, raw: &str) -> Option<ClassificationResult> {
        match evaluate_response(raw) {
            Ok(result) => Some(result),
            Err(rejection) => {
                warn!(
                    classifier = %self.name,
                    attempt = attempt.number(),
                    reason = %rejection,
                    "Model response rejected"
                );
                None
            }
        }
    }

    fn record(&self, resolution: Resolution, latency_us: u64) {
        match resolution {
            Resolution::FirstAttempt => {}
            Resolution::Corrected => info!(classifier = %self.name, "Resolved by corrective attempt"),
            Resolution::Fallback => info!(classifier = %self.name, "Using fallback result"),
        }

        metrics::counter!("supportline_classifications_total", "resolution" => resolution.as_str())
            .increment(1);
        metrics::histogram!("supportline_classify_latency_us").record(latency_us as f64);
    }
}

#[async_trait]
impl Classifier for SupportClassifier {
    async fn classify(&self, request: &ClassificationRequest) -> Result<ClassificationResult> {
        Ok(self.classify_detailed(request).await?.result)
    }

    fn name(&self) -> &str {
        &self.name
    }
}
