//! The inference pipeline: encode, project, classify, decode, rank.

use std::path::Path;

use croptype_core::{FeatureValue, FeatureVector};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::artifacts::{self, ArtifactPaths, Artifacts};
use crate::classifier::{Classifier, Prediction};
use crate::encoder::{EncodedFeature, EncoderSet};
use crate::error::{Artifact, ArtifactError, PredictError, UninitializedModelError};
use crate::ranking::Ranking;

/// Predicted crop plus the full ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub crop: String,
    pub ranking: Ranking,
}

/// Which artifacts a predictor holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ArtifactStatus {
    pub classifier: bool,
    pub encoders: bool,
}

impl ArtifactStatus {
    pub fn is_ready(&self) -> bool {
        self.classifier && self.encoders
    }
}

/// Crop-type predictor over immutable, once-loaded artifacts.
///
/// Construction succeeds even when the artifact files are missing; the first
/// call that needs a missing artifact fails with [`UninitializedModelError`].
pub struct CropTypePredictor {
    classifier: Option<Box<dyn Classifier>>,
    encoders: Option<EncoderSet>,
}

impl CropTypePredictor {
    /// Load artifacts from the installation directory.
    pub fn new() -> Result<Self, ArtifactError> {
        Self::load(&ArtifactPaths::installed()?)
    }

    /// Load artifacts from an explicit directory.
    pub fn from_dir(dir: impl AsRef<Path>) -> Result<Self, ArtifactError> {
        Self::load(&ArtifactPaths::in_dir(dir.as_ref()))
    }

    pub fn load(paths: &ArtifactPaths) -> Result<Self, ArtifactError> {
        Ok(Self::from_artifacts(artifacts::load(paths)?))
    }

    pub fn from_artifacts(artifacts: Artifacts) -> Self {
        Self {
            classifier: artifacts
                .classifier
                .map(|m| Box::new(m) as Box<dyn Classifier>),
            encoders: artifacts.encoders,
        }
    }

    /// Assemble from already-built parts, e.g. a custom [`Classifier`].
    pub fn from_parts(
        classifier: Option<Box<dyn Classifier>>,
        encoders: Option<EncoderSet>,
    ) -> Self {
        Self {
            classifier,
            encoders,
        }
    }

    pub fn status(&self) -> ArtifactStatus {
        ArtifactStatus {
            classifier: self.classifier.is_some(),
            encoders: self.encoders.is_some(),
        }
    }

    /// Soil types the encoder accepts, in code order.
    pub fn soil_types(&self) -> Result<&[String], UninitializedModelError> {
        Ok(self.encoders()?.soil().classes())
    }

    /// Crop types the model can predict, in code order.
    pub fn crop_types(&self) -> Result<&[String], UninitializedModelError> {
        Ok(self.encoders()?.crop().classes())
    }

    /// Predict from nine positional values.
    pub fn predict_values(&self, values: Vec<FeatureValue>) -> Result<PredictionResult, PredictError> {
        let features = FeatureVector::from_values(values)?;
        self.predict(&features)
    }

    pub fn predict(&self, features: &FeatureVector) -> Result<PredictionResult, PredictError> {
        let encoders = self.encoders()?;
        let classifier = self.classifier()?;

        let soil_code = encoders.encode(EncodedFeature::Soil, features.soil())?;
        let row = features.features().to_model_row(soil_code);

        let Prediction {
            class,
            probabilities,
        } = classifier.predict_with_proba(&row);

        let classes = classifier.classes();
        if probabilities.len() != classes.len() {
            return Err(PredictError::ProbabilityShape {
                expected: classes.len(),
                actual: probabilities.len(),
            });
        }

        if let Some(&most_probable) = classes.get(first_max(&probabilities))
            && class != most_probable
        {
            return Err(PredictError::ClassMismatch {
                class,
                most_probable,
            });
        }

        let crop = decode_crop(encoders, class)?.to_string();
        let labelled = classes
            .iter()
            .zip(probabilities)
            .map(|(&code, p)| Ok((decode_crop(encoders, code)?.to_string(), p)))
            .collect::<Result<Vec<_>, PredictError>>()?;
        let ranking = Ranking::new(labelled);

        if let Some(missing) = encoders
            .crop()
            .classes()
            .iter()
            .find(|c| ranking.get(c.as_str()).is_none())
        {
            return Err(PredictError::UnscoredCrop {
                crop: missing.clone(),
            });
        }

        debug!(
            crop = %crop,
            probability = ranking.first().map(|e| e.probability),
            model = classifier.name(),
            "predicted crop"
        );
        Ok(PredictionResult { crop, ranking })
    }

    fn encoders(&self) -> Result<&EncoderSet, UninitializedModelError> {
        self.encoders.as_ref().ok_or(UninitializedModelError {
            missing: Artifact::Encoders,
        })
    }

    fn classifier(&self) -> Result<&dyn Classifier, UninitializedModelError> {
        self.classifier
            .as_deref()
            .ok_or(UninitializedModelError {
                missing: Artifact::Classifier,
            })
    }
}

/// Index of the first maximum probability; ties go to native class order.
fn first_max(probabilities: &[f64]) -> usize {
    let mut best = 0;
    for (i, &p) in probabilities.iter().enumerate().skip(1) {
        if p > probabilities[best] {
            best = i;
        }
    }
    best
}

fn decode_crop(encoders: &EncoderSet, code: usize) -> Result<&str, PredictError> {
    encoders
        .decode(EncodedFeature::Crop, code)
        .ok_or(PredictError::UnknownClassCode { code })
}
