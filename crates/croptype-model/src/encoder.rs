//! Label encoders for the categorical columns.
//!
//! An encoder assigns each known category the dense integer code equal to its
//! position in `classes`. Codes are fixed at training time; encoding an unseen
//! category is an error, never a default.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{EncodingError, FormatError};

/// Categorical columns that carry an encoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EncodedFeature {
    Soil,
    Crop,
}

impl EncodedFeature {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Soil => "Soil",
            Self::Crop => "Crop",
        }
    }
}

impl fmt::Display for EncodedFeature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// On-disk layout of one encoder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncoderFile {
    pub classes: Vec<String>,
}

/// Bidirectional category ↔ code mapping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "EncoderFile", into = "EncoderFile")]
pub struct LabelEncoder {
    classes: Vec<String>,
}

impl LabelEncoder {
    /// Build an encoder; `classes` must be non-empty and free of duplicates.
    pub fn new(classes: Vec<String>) -> Result<Self, FormatError> {
        if classes.is_empty() {
            return Err(FormatError("encoder has no classes".into()));
        }
        let mut seen = HashSet::with_capacity(classes.len());
        for class in &classes {
            if !seen.insert(class.as_str()) {
                return Err(FormatError(format!("duplicate encoder class '{class}'")));
            }
        }
        Ok(Self { classes })
    }

    /// Code for a category, `None` if it was never seen in training.
    pub fn transform(&self, category: &str) -> Option<usize> {
        self.classes.iter().position(|c| c == category)
    }

    /// Category for a code, `None` if out of range.
    pub fn inverse_transform(&self, code: usize) -> Option<&str> {
        self.classes.get(code).map(String::as_str)
    }

    /// Known categories in code order.
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

impl TryFrom<EncoderFile> for LabelEncoder {
    type Error = FormatError;

    fn try_from(file: EncoderFile) -> Result<Self, Self::Error> {
        Self::new(file.classes)
    }
}

impl From<LabelEncoder> for EncoderFile {
    fn from(encoder: LabelEncoder) -> Self {
        Self {
            classes: encoder.classes,
        }
    }
}

/// The encoders persisted alongside the classifier, keyed by column name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncoderSet {
    #[serde(rename = "Soil")]
    soil: LabelEncoder,
    #[serde(rename = "Crop")]
    crop: LabelEncoder,
}

impl EncoderSet {
    pub fn new(soil: LabelEncoder, crop: LabelEncoder) -> Self {
        Self { soil, crop }
    }

    pub fn soil(&self) -> &LabelEncoder {
        &self.soil
    }

    pub fn crop(&self) -> &LabelEncoder {
        &self.crop
    }

    pub fn get(&self, feature: EncodedFeature) -> &LabelEncoder {
        match feature {
            EncodedFeature::Soil => &self.soil,
            EncodedFeature::Crop => &self.crop,
        }
    }

    /// Encode a category, reporting the offending value and the full
    /// vocabulary when it is unknown.
    pub fn encode(&self, feature: EncodedFeature, category: &str) -> Result<usize, EncodingError> {
        let encoder = self.get(feature);
        encoder.transform(category).ok_or_else(|| EncodingError {
            feature,
            value: category.to_string(),
            valid: encoder.classes().to_vec(),
        })
    }

    pub fn decode(&self, feature: EncodedFeature, code: usize) -> Option<&str> {
        self.get(feature).inverse_transform(code)
    }
}
