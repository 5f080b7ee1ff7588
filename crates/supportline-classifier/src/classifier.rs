//! Classifier trait

use async_trait::async_trait;
use supportline_core::{ClassificationRequest, ClassificationResult, Result};

/// Trait for all message classifiers
#[async_trait]
pub trait Classifier: Send + Sync {
    /// Classify a single customer message
    ///
    /// A returned result always satisfies the result schema. Errors mean the
    /// classifier could not run at all.
    async fn classify(&self, request: &ClassificationRequest) -> Result<ClassificationResult>;

    /// Get the classifier name
    fn name(&self) -> &str;
}
