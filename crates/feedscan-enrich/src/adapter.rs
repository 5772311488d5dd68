use std::sync::Arc;
use std::time::Duration;

use feedscan_core::{AppConfig, ClassificationResult};
use tokio_util::sync::CancellationToken;

use crate::classifier::Classifier;
use crate::error::EnrichError;
use crate::openai::OpenAiClassifier;

/// Caption samples sent per classification.
pub const MAX_SAMPLES: usize = 5;

/// First [`MAX_SAMPLES`] non-empty captions, trimmed.
pub fn select_samples<'a, I>(captions: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    captions
        .into_iter()
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .take(MAX_SAMPLES)
        .map(str::to_owned)
        .collect()
}

/// Bounded-time wrapper that never fails.
pub struct EnrichmentAdapter {
    classifier: Option<Arc<dyn Classifier>>,
    timeout: Duration,
}

impl EnrichmentAdapter {
    #[must_use]
    pub fn new(classifier: Arc<dyn Classifier>, timeout: Duration) -> Self {
        Self {
            classifier: Some(classifier),
            timeout,
        }
    }

    /// Adapter with no backend; every call returns an empty result.
    #[must_use]
    pub fn unconfigured() -> Self {
        Self {
            classifier: None,
            timeout: Duration::ZERO,
        }
    }

    /// Uses [`OpenAiClassifier`] when `OPENAI_API_KEY` is set, otherwise
    /// [`EnrichmentAdapter::unconfigured`].
    ///
    /// # Errors
    ///
    /// Returns [`EnrichError::Http`] if the HTTP client cannot be built.
    pub fn from_config(config: &AppConfig) -> Result<Self, EnrichError> {
        let Some(api_key) = config.openai_api_key.as_deref() else {
            return Ok(Self::unconfigured());
        };
        let classifier = OpenAiClassifier::new(
            api_key,
            &config.openai_model,
            &config.openai_base_url,
            config.ai_timeout(),
        )?;
        Ok(Self::new(Arc::new(classifier), config.ai_timeout()))
    }

    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.classifier.is_some()
    }

    /// Classifies `samples` (at most [`MAX_SAMPLES`] are sent).
    ///
    /// Unconfigured adapters and empty sample lists return an empty result
    /// without calling out. Timeouts, backend errors and cancellation are
    /// logged and also yield an empty result.
    pub async fn classify(
        &self,
        samples: &[String],
        cancel: &CancellationToken,
    ) -> ClassificationResult {
        let Some(classifier) = self.classifier.as_ref() else {
            tracing::debug!("classification skipped; no classifier configured");
            return ClassificationResult::default();
        };
        if samples.is_empty() {
            tracing::debug!("classification skipped; no caption samples");
            return ClassificationResult::default();
        }
        let samples = &samples[..samples.len().min(MAX_SAMPLES)];

        tokio::select! {
            biased;
            () = cancel.cancelled() => {
                tracing::warn!("classification cancelled; continuing with empty result");
                ClassificationResult::default()
            }
            outcome = tokio::time::timeout(self.timeout, classifier.classify(samples)) => match outcome {
                Ok(Ok(result)) => result,
                Ok(Err(e)) => {
                    tracing::warn!(error = %e, "classification failed; continuing with empty result");
                    ClassificationResult::default()
                }
                Err(_) => {
                    tracing::warn!(
                        timeout_secs = self.timeout.as_secs_f64(),
                        "classification timed out; continuing with empty result"
                    );
                    ClassificationResult::default()
                }
            },
        }
    }
}
