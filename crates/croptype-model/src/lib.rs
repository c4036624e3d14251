//! Crop-type inference: artifact loading, categorical encoding, gradient-boosted
//! tree scoring, and probability ranking.
//!
//! The usual entry point is [`CropTypePredictor`], which loads the classifier
//! and encoder set from the installation directory and answers
//! [`CropTypePredictor::predict`] calls.

pub mod artifacts;
pub mod classifier;
pub mod encoder;
mod error;
pub mod gbdt;
pub mod predictor;
pub mod ranking;

pub use artifacts::{ArtifactPaths, Artifacts};
pub use classifier::{Classifier, Prediction};
pub use encoder::{EncodedFeature, EncoderSet, LabelEncoder};
pub use error::{
    Artifact, ArtifactError, EncodingError, FormatError, PredictError, UninitializedModelError,
};
pub use gbdt::GradientBoostedTrees;
pub use predictor::{ArtifactStatus, CropTypePredictor, PredictionResult};
pub use ranking::{RankedCrop, Ranking};

#[cfg(test)]
pub(crate) mod testing;
