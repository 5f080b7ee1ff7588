//! SupportLine Classifier
//!
//! Classifies a customer support message with a hosted generative model.
//!
//! One classification is a short, fixed procedure:
//! - Build the instruction prompt from the allowed vocabularies
//! - Call the model and pull a JSON object out of its answer
//! - Validate the object against the result schema
//! - On failure, ask the model once to repair its output
//! - If that also fails, return the fixed fallback result
//!
//! Callers always receive a schema-valid result unless the model API itself
//! is unreachable or rejects the request.

pub mod classifier;
pub mod config;
pub mod extract;
pub mod model;
pub mod pipeline;
pub mod prompt;
pub mod validator;

pub use classifier::Classifier;
pub use config::{load_config, ClassifierConfig, ModelSettings};
pub use extract::{extract_json_object, parse_candidate, parse_model_json};
pub use model::{shared_client, Credentials, GeminiClient, GenerationRequest, ModelClient};
pub use pipeline::{
    evaluate_response, Attempt, PipelineOutcome, Rejection, Resolution, SupportClassifier,
};
pub use validator::{validate_result, SchemaViolation};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::classifier::Classifier;
    pub use crate::config::ClassifierConfig;
    pub use crate::model::{GeminiClient, ModelClient};
    pub use crate::pipeline::{PipelineOutcome, Resolution, SupportClassifier};
    pub use supportline_core::prelude::*;
}
