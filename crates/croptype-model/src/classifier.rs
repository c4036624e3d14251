//! The classifier seam used by the inference pipeline.

use croptype_core::NUM_FEATURES;

/// Result of a single classifier invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    /// Predicted class code (a Crop encoder code).
    pub class: usize,
    /// One probability per entry of [`Classifier::classes`], same order.
    pub probabilities: Vec<f64>,
}

/// A trained multi-class probabilistic model over one encoded feature row.
///
/// Implementations must be stateless at prediction time so a predictor can be
/// shared read-only across threads.
pub trait Classifier: Send + Sync {
    /// Class codes in the model's native order.
    fn classes(&self) -> &[usize];

    /// Predict the class and the full probability distribution in one call.
    ///
    /// `class` must be the code at the first maximum of `probabilities`; the
    /// predictor rejects a disagreeing pair.
    fn predict_with_proba(&self, row: &[f64; NUM_FEATURES]) -> Prediction;

    fn name(&self) -> &str {
        "classifier"
    }
}
