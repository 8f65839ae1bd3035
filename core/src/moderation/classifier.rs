//! moderation/classifier.rs
//! Opaque classifier contract and the decision rule applied to its output.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::ModerationConfig;
use crate::moderation::image::Bitmap;

/// One label with its probability in `0.0..=1.0`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub label: String,
    pub probability: f32,
}

impl Prediction {
    pub fn new(label: impl Into<String>, probability: f32) -> Self {
        Self { label: label.into(), probability }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct ClassifierError(pub String);

/// Image classification model. Runs on the moderation worker thread.
pub trait Classifier: Send {
    fn classify(&mut self, bitmap: &Bitmap) -> Result<Vec<Prediction>, ClassifierError>;
}

/// Unsafe when any forbidden label meets the threshold.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassificationRule {
    pub threshold: f32,
    pub forbidden_labels: Vec<String>,
}

impl Default for ClassificationRule {
    fn default() -> Self {
        Self::from(&ModerationConfig::default())
    }
}

impl From<&ModerationConfig> for ClassificationRule {
    fn from(config: &ModerationConfig) -> Self {
        Self {
            threshold: config.threshold,
            forbidden_labels: config.forbidden_labels.clone(),
        }
    }
}

impl ClassificationRule {
    pub fn is_unsafe(&self, predictions: &[Prediction]) -> bool {
        predictions.iter().any(|p| {
            p.probability >= self.threshold && self.forbidden_labels.iter().any(|l| *l == p.label)
        })
    }
}
