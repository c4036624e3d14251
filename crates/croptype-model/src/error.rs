use std::fmt;
use std::path::PathBuf;

use croptype_core::InputError;
use thiserror::Error;

use crate::encoder::EncodedFeature;

/// The two persisted artifacts a predictor depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Artifact {
    Classifier,
    Encoders,
}

impl Artifact {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Classifier => "classifier",
            Self::Encoders => "encoder set",
        }
    }
}

impl fmt::Display for Artifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failure to load an artifact that exists on disk.
///
/// A missing file is not an error: it loads as an absent artifact.
#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("cannot locate installation directory: {0}")]
    Locate(#[source] std::io::Error),

    #[error("failed to read {artifact} at {}: {source}", path.display())]
    Io {
        artifact: Artifact,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("corrupt {artifact} at {}: {source}", path.display())]
    Corrupt {
        artifact: Artifact,
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("classifier class code {code} has no Crop label ({known} labels known)")]
    Inconsistent { code: usize, known: usize },

    #[error("Crop label '{crop}' is never scored by the classifier ({scored} of {known} labels scored)")]
    UnscoredCrop {
        crop: String,
        scored: usize,
        known: usize,
    },
}

/// Structural problem in a deserialized artifact.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct FormatError(pub String);

/// A categorical value outside the trained vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {feature} category '{value}'; expected one of {valid:?}")]
pub struct EncodingError {
    pub feature: EncodedFeature,
    pub value: String,
    /// Every category the encoder knows, in code order.
    pub valid: Vec<String>,
}

/// A predictor used before its artifacts were loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("model not initialized: {missing} was not found at load time")]
pub struct UninitializedModelError {
    pub missing: Artifact,
}

#[derive(Debug, Error)]
pub enum PredictError {
    #[error(transparent)]
    Input(#[from] InputError),

    #[error(transparent)]
    Encoding(#[from] EncodingError),

    #[error(transparent)]
    Uninitialized(#[from] UninitializedModelError),

    #[error("classifier predicted class code {code}, which has no Crop label")]
    UnknownClassCode { code: usize },

    #[error("classifier returned {actual} probabilities for {expected} classes")]
    ProbabilityShape { expected: usize, actual: usize },

    #[error("classifier predicted class code {class}, but its most probable class is {most_probable}")]
    ClassMismatch { class: usize, most_probable: usize },

    #[error("classifier does not score Crop label '{crop}'")]
    UnscoredCrop { crop: String },
}
