//! Best-effort AI classification of post captions.
//!
//! [`EnrichmentAdapter`] wraps any [`Classifier`] with a timeout and folds
//! every failure into an empty [`feedscan_core::ClassificationResult`].

pub mod adapter;
pub mod classifier;
pub mod error;
pub mod openai;

pub use adapter::{select_samples, EnrichmentAdapter, MAX_SAMPLES};
pub use classifier::Classifier;
pub use error::EnrichError;
pub use openai::OpenAiClassifier;
