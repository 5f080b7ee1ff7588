//! Mock model clients for testing
//!
//! Provides scripted implementations of the ModelClient trait for exercising
//! the classification pipeline end to end without network access.

use async_trait::async_trait;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use supportline_classifier::{
    ClassifierConfig, Classifier, GenerationRequest, ModelClient, Resolution, SupportClassifier,
};
use supportline_core::{
    Category, ClassificationRequest, ClassificationResult, Error, Result, Sentiment,
};

/// A model client that replays queued responses in order
pub struct MockModelClient {
    responses: Mutex<Vec<String>>,
    prompts: Mutex<Vec<GenerationRequest>>,
    call_count: AtomicU32,
}

impl MockModelClient {
    /// Create a client with no queued responses (answers with empty text)
    pub fn new() -> Self {
        Self {
            responses: Mutex::new(Vec::new()),
            prompts: Mutex::new(Vec::new()),
            call_count: AtomicU32::new(0),
        }
    }

    /// Queue the next response
    pub fn with_response(self, response: &str) -> Self {
        self.responses.lock().unwrap().insert(0, response.to_string());
        self
    }

    /// Get the number of times generate was called
    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::Relaxed)
    }

    /// Requests received so far
    pub fn requests(&self) -> Vec<GenerationRequest> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl ModelClient for MockModelClient {
    async fn generate(&self, request: &GenerationRequest) -> Result<String> {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        self.prompts.lock().unwrap().push(request.clone());
        Ok(self.responses.lock().unwrap().pop().unwrap_or_default())
    }

    fn name(&self) -> &str {
        "mock"
    }
}

/// A model client that always fails - for testing error paths
pub struct FailingModelClient {
    status: Option<u16>,
    call_count: AtomicU32,
}

impl FailingModelClient {
    /// Fail with a transport error
    pub fn unreachable() -> Self {
        Self {
            status: None,
            call_count: AtomicU32::new(0),
        }
    }

    /// Fail with an API error carrying this status
    pub fn with_status(status: u16) -> Self {
        Self {
            status: Some(status),
            call_count: AtomicU32::new(0),
        }
    }

    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl ModelClient for FailingModelClient {
    async fn generate(&self, _request: &GenerationRequest) -> Result<String> {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        match self.status {
            Some(status) => Err(Error::api(status, "Simulated API failure")),
            None => Err(Error::transport("Simulated network failure")),
        }
    }

    fn name(&self) -> &str {
        "failing"
    }
}

fn support_classifier(client: Arc<dyn ModelClient>) -> SupportClassifier {
    SupportClassifier::new(client, ClassifierConfig::default()).unwrap()
}

fn request(message: &str) -> ClassificationRequest {
    ClassificationRequest::new(message).unwrap()
}

#[tokio::test]
async fn test_valid_first_response_is_returned_unchanged() {
    let client = Arc::new(MockModelClient::new().with_response(
        r#"{"category":"Delivery Question","sentiment":"Negative","reply":"We're sorry for the delay; checking now."}"#,
    ));
    let classifier = support_classifier(client.clone());

    let outcome = classifier
        .classify_detailed(&request("Where is my package? It's been two weeks."))
        .await
        .unwrap();

    assert_eq!(
        outcome.result,
        ClassificationResult::new(
            Category::DeliveryQuestion,
            Sentiment::Negative,
            "We're sorry for the delay; checking now."
        )
    );
    assert_eq!(outcome.resolution, Resolution::FirstAttempt);
    assert_eq!(client.call_count(), 1);
}

#[tokio::test]
async fn test_prose_prefix_is_tolerated_without_retry() {
    let client = Arc::new(MockModelClient::new().with_response(
        r#"Sure! {"category":"Spam","sentiment":"Neutral","reply":"Thanks."}"#,
    ));
    let classifier = support_classifier(client.clone());

    let result = classifier
        .classify(&request("WIN A FREE CRUISE!!! click now"))
        .await
        .unwrap();

    assert_eq!(result.category, Category::Spam);
    assert_eq!(result.sentiment, Sentiment::Neutral);
    assert_eq!(result.reply, "Thanks.");
    assert_eq!(client.call_count(), 1);
}

#[tokio::test]
async fn test_plain_prose_then_valid_correction() {
    let client = Arc::new(
        MockModelClient::new()
            .with_response("This customer wants their money back and is upset.")
            .with_response(
                r#"{"category":"Refund/Return","sentiment":"Negative","reply":"We're sorry. We'll start your refund right away."}"#,
            ),
    );
    let classifier = support_classifier(client.clone());

    let outcome = classifier
        .classify_detailed(&request("I want a refund, this blender broke on day one."))
        .await
        .unwrap();

    assert_eq!(outcome.resolution, Resolution::Corrected);
    assert_eq!(outcome.attempts, 2);
    assert_eq!(outcome.result.category, Category::RefundReturn);
    assert_eq!(client.call_count(), 2);

    let requests = client.requests();
    assert_eq!(requests[0].temperature, 0.2);
    assert_eq!(requests[1].temperature, 0.0);
    assert!(requests[1]
        .prompt
        .contains("This customer wants their money back and is upset."));
}

#[tokio::test]
async fn test_two_invalid_responses_yield_fallback() {
    let client = Arc::new(
        MockModelClient::new()
            .with_response("Not sure what this is.")
            .with_response(r#"{"category":"Billing","sentiment":"Neutral","reply":"Hello"}"#),
    );
    let classifier = support_classifier(client.clone());

    let outcome = classifier
        .classify_detailed(&request("asdf"))
        .await
        .unwrap();

    assert_eq!(outcome.result, ClassificationResult::fallback());
    assert_eq!(outcome.resolution, Resolution::Fallback);
    assert_eq!(client.call_count(), 2);
}

#[tokio::test]
async fn test_empty_responses_yield_fallback() {
    let client = Arc::new(MockModelClient::new());
    let classifier = support_classifier(client.clone());

    let result = classifier.classify(&request("hello?")).await.unwrap();

    assert_eq!(result, ClassificationResult::fallback());
    assert_eq!(client.call_count(), 2);
}

#[tokio::test]
async fn test_overlong_reply_triggers_correction() {
    let long_reply = "a".repeat(351);
    let first = format!(
        r#"{{"category":"Complaint","sentiment":"Negative","reply":"{long_reply}"}}"#
    );
    let client = Arc::new(
        MockModelClient::new()
            .with_response(&first)
            .with_response(r#"{"category":"Complaint","sentiment":"Negative","reply":"Sorry about that."}"#),
    );
    let classifier = support_classifier(client.clone());

    let outcome = classifier
        .classify_detailed(&request("Your service is terrible."))
        .await
        .unwrap();

    assert_eq!(outcome.resolution, Resolution::Corrected);
    assert_eq!(outcome.result.reply, "Sorry about that.");
}

#[tokio::test]
async fn test_transport_failure_propagates_without_retry() {
    let client = Arc::new(FailingModelClient::unreachable());
    let classifier = support_classifier(client.clone());

    let err = classifier.classify(&request("hello")).await.unwrap_err();

    assert!(matches!(err, Error::Transport(_)));
    assert_eq!(client.call_count(), 1);
}

#[tokio::test]
async fn test_credential_failure_propagates() {
    let client = Arc::new(FailingModelClient::with_status(401));
    let classifier = support_classifier(client.clone());

    let err = classifier.classify(&request("hello")).await.unwrap_err();

    assert!(matches!(err, Error::Api { status: 401, .. }));
    assert!(err.is_upstream());
    assert_eq!(client.call_count(), 1);
}

#[tokio::test]
async fn test_custom_model_identifier_is_forwarded() {
    let client = Arc::new(MockModelClient::new().with_response(
        r#"{"category":"Sales Inquiry","sentiment":"Positive","reply":"Happy to help with pricing!"}"#,
    ));
    let config = ClassifierConfig {
        model: "gemini-2.0-flash".to_string(),
        temperature: 0.5,
        ..Default::default()
    };
    let classifier = SupportClassifier::new(client.clone(), config).unwrap();

    let result = classifier
        .classify_message("  Do you offer volume discounts?  ")
        .await
        .unwrap();

    assert_eq!(result.category, Category::SalesInquiry);
    let requests = client.requests();
    assert_eq!(requests[0].model, "gemini-2.0-flash");
    assert_eq!(requests[0].temperature, 0.5);
    assert!(requests[0]
        .prompt
        .ends_with("Customer message:\nDo you offer volume discounts?"));
}
