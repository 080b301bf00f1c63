pub mod annotate;
pub mod classify;
pub mod config;
pub mod inspect;

use flowsteer_common::config::AppConfig;
use flowsteer_processing_core::classify::DirectionClassifier;

/// Classifier from config, with an optional command-line threshold override.
pub fn classifier_for(
    config: &AppConfig,
    threshold: Option<f64>,
) -> anyhow::Result<DirectionClassifier> {
    let threshold = threshold.unwrap_or(config.classifier.threshold);
    if !threshold.is_finite() || threshold < 0.0 {
        anyhow::bail!("threshold must be a finite non-negative number, got {threshold}");
    }
    Ok(DirectionClassifier::new(threshold))
}
