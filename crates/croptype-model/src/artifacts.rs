//! Artifact store: locates and deserializes the classifier and encoder set.
//!
//! Paths resolve against the installation directory (`models/` beside the
//! running executable), never the caller's working directory. A missing file
//! loads as an absent artifact so a predictor can always be constructed; any
//! other read or parse failure is an installation problem and propagates.

use std::fs::File;
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use tracing::{info, warn};

use crate::classifier::Classifier;
use crate::encoder::EncoderSet;
use crate::error::{Artifact, ArtifactError};
use crate::gbdt::GradientBoostedTrees;

pub const MODEL_FILE: &str = "crop_model_gradient_boosting.json";
pub const ENCODERS_FILE: &str = "label_encoders.json";

/// Subdirectory of the installation directory holding both artifacts.
pub const MODEL_DIR: &str = "models";

/// Locations of the two artifact files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    pub classifier: PathBuf,
    pub encoders: PathBuf,
}

impl ArtifactPaths {
    /// Fixed filenames inside `dir`.
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            classifier: dir.join(MODEL_FILE),
            encoders: dir.join(ENCODERS_FILE),
        }
    }

    /// Fixed filenames inside the installation's `models/` directory.
    pub fn installed() -> Result<Self, ArtifactError> {
        Ok(Self::in_dir(&installation_dir()?.join(MODEL_DIR)))
    }
}

/// Directory containing the running executable.
pub fn installation_dir() -> Result<PathBuf, ArtifactError> {
    let exe = std::env::current_exe().map_err(ArtifactError::Locate)?;
    exe.parent().map(Path::to_path_buf).ok_or_else(|| {
        ArtifactError::Locate(io::Error::new(
            io::ErrorKind::NotFound,
            format!("{} has no parent directory", exe.display()),
        ))
    })
}

/// Loaded artifacts; `None` marks a file that was not present.
#[derive(Debug, Clone, Default)]
pub struct Artifacts {
    pub classifier: Option<GradientBoostedTrees>,
    pub encoders: Option<EncoderSet>,
}

/// Load both artifacts.
///
/// When both are present, the classifier's class codes must be exactly the
/// Crop encoder's codes: every class decodes and every crop is scored.
pub fn load(paths: &ArtifactPaths) -> Result<Artifacts, ArtifactError> {
    let classifier: Option<GradientBoostedTrees> =
        load_json(&paths.classifier, Artifact::Classifier)?;
    let encoders: Option<EncoderSet> = load_json(&paths.encoders, Artifact::Encoders)?;

    if let Some(model) = &classifier {
        info!(
            path = %paths.classifier.display(),
            classes = model.classes().len(),
            stages = model.num_stages(),
            "loaded classifier"
        );
    }
    if let Some(set) = &encoders {
        info!(
            path = %paths.encoders.display(),
            soils = set.soil().len(),
            crops = set.crop().len(),
            "loaded encoder set"
        );
    }

    if let (Some(model), Some(set)) = (&classifier, &encoders)
        && let Some(&code) = model.classes().iter().find(|&&c| c >= set.crop().len())
    {
        return Err(ArtifactError::Inconsistent {
            code,
            known: set.crop().len(),
        });
    }
    // Class codes are unique and in range, so a matching count means all of them.
    if let (Some(model), Some(set)) = (&classifier, &encoders)
        && model.classes().len() != set.crop().len()
    {
        let crop = (0..set.crop().len())
            .find(|code| !model.classes().contains(code))
            .and_then(|code| set.crop().inverse_transform(code))
            .unwrap_or_default()
            .to_string();
        return Err(ArtifactError::UnscoredCrop {
            crop,
            scored: model.classes().len(),
            known: set.crop().len(),
        });
    }

    Ok(Artifacts {
        classifier,
        encoders,
    })
}

fn load_json<T: DeserializeOwned>(
    path: &Path,
    artifact: Artifact,
) -> Result<Option<T>, ArtifactError> {
    let file = match File::open(path) {
        Ok(f) => f,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            warn!(%artifact, path = %path.display(), "artifact not found; predictions will fail");
            return Ok(None);
        }
        Err(source) => {
            return Err(ArtifactError::Io {
                artifact,
                path: path.to_path_buf(),
                source,
            });
        }
    };

    serde_json::from_reader(BufReader::new(file))
        .map(Some)
        .map_err(|source| ArtifactError::Corrupt {
            artifact,
            path: path.to_path_buf(),
            source,
        })
}
