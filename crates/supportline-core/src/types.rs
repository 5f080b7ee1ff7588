//! Core types for SupportLine

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum reply length, counted in characters
pub const MAX_REPLY_CHARS: usize = 350;

/// Reply used by the fallback result
pub const FALLBACK_REPLY: &str =
    "Thanks for reaching out. Could you please share a bit more detail so we can assist you?";

/// Topic assigned to a customer message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "Complaint")]
    Complaint,
    #[serde(rename = "Refund/Return")]
    RefundReturn,
    #[serde(rename = "Sales Inquiry")]
    SalesInquiry,
    #[serde(rename = "Delivery Question")]
    DeliveryQuestion,
    #[serde(rename = "Account/Technical Issue")]
    AccountTechnicalIssue,
    #[serde(rename = "General Query")]
    GeneralQuery,
    #[serde(rename = "Spam")]
    Spam,
}

impl Category {
    /// Every category, in the order they are presented to the model
    pub const ALL: [Category; 7] = [
        Category::Complaint,
        Category::RefundReturn,
        Category::SalesInquiry,
        Category::DeliveryQuestion,
        Category::AccountTechnicalIssue,
        Category::GeneralQuery,
        Category::Spam,
    ];

    /// The exact label the model must emit
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Complaint => "Complaint",
            Self::RefundReturn => "Refund/Return",
            Self::SalesInquiry => "Sales Inquiry",
            Self::DeliveryQuestion => "Delivery Question",
            Self::AccountTechnicalIssue => "Account/Technical Issue",
            Self::GeneralQuery => "General Query",
            Self::Spam => "Spam",
        }
    }

    /// Look up a category by its exact, case-sensitive label
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == label)
    }

    /// All labels in presentation order
    pub fn labels() -> Vec<&'static str> {
        Self::ALL.iter().map(Category::as_str).collect()
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tone of a customer message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sentiment {
    Positive,
    Neutral,
    Negative,
}

impl Sentiment {
    /// Every sentiment, in the order they are presented to the model
    pub const ALL: [Sentiment; 3] = [Sentiment::Positive, Sentiment::Neutral, Sentiment::Negative];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Positive => "Positive",
            Self::Neutral => "Neutral",
            Self::Negative => "Negative",
        }
    }

    /// Look up a sentiment by its exact, case-sensitive label
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.as_str() == label)
    }

    pub fn labels() -> Vec<&'static str> {
        Self::ALL.iter().map(Sentiment::as_str).collect()
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single customer message submitted for classification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassificationRequest {
    message: String,
}

impl ClassificationRequest {
    /// Create a request from raw user input
    ///
    /// Surrounding whitespace is removed. Blank input is rejected.
    pub fn new(message: impl AsRef<str>) -> Result<Self> {
        let message = message.as_ref().trim();
        if message.is_empty() {
            return Err(Error::invalid_request("customer message is empty"));
        }

        Ok(Self {
            message: message.to_string(),
        })
    }

    /// The trimmed customer message
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Schema-valid classification of a customer message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationResult {
    /// Assigned topic
    pub category: Category,

    /// Assigned tone
    pub sentiment: Sentiment,

    /// Suggested auto-reply
    pub reply: String,
}

impl ClassificationResult {
    /// Create a new classification result
    pub fn new(category: Category, sentiment: Sentiment, reply: impl Into<String>) -> Self {
        Self {
            category,
            sentiment,
            reply: reply.into(),
        }
    }

    /// The generic result returned when the model output cannot be salvaged
    pub fn fallback() -> Self {
        Self::new(Category::GeneralQuery, Sentiment::Neutral, FALLBACK_REPLY)
    }
}
