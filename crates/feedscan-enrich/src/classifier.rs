use async_trait::async_trait;
use feedscan_core::ClassificationResult;

use crate::error::EnrichError;

/// A text-classification backend.
#[async_trait]
pub trait Classifier: Send + Sync {
    /// Classifies up to a handful of caption samples.
    async fn classify(&self, samples: &[String]) -> Result<ClassificationResult, EnrichError>;
}
