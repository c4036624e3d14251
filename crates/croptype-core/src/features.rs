//! Feature vectors: the positional input and its named record.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::InputError;
use crate::schema::{Field, NUM_FEATURES};

/// A single raw input slot: numeric or categorical.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FeatureValue {
    Number(f64),
    Category(String),
}

impl FeatureValue {
    /// Parse a command-line token: numbers become [`FeatureValue::Number`],
    /// anything else a category.
    pub fn parse(token: &str) -> Self {
        match token.trim().parse::<f64>() {
            Ok(n) => Self::Number(n),
            Err(_) => Self::Category(token.to_string()),
        }
    }
}

impl From<f64> for FeatureValue {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<&str> for FeatureValue {
    fn from(s: &str) -> Self {
        Self::Category(s.to_string())
    }
}

impl From<String> for FeatureValue {
    fn from(s: String) -> Self {
        Self::Category(s)
    }
}

impl fmt::Display for FeatureValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Category(s) => f.write_str(s),
        }
    }
}

/// Named agronomic record, one field per schema slot.
///
/// `moisture` is a fraction in `[0, 1]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CropFeatures {
    pub temperature: f64,
    pub rainfall: f64,
    #[serde(rename = "PH")]
    pub ph: f64,
    pub moisture: f64,
    pub nitrogen: f64,
    pub potassium: f64,
    pub phosphorous: f64,
    pub soil: String,
    pub carbon: f64,
}

impl CropFeatures {
    /// Numeric value of a non-categorical field, `None` for soil.
    pub fn numeric(&self, field: Field) -> Option<f64> {
        match field {
            Field::Temperature => Some(self.temperature),
            Field::Rainfall => Some(self.rainfall),
            Field::Ph => Some(self.ph),
            Field::Moisture => Some(self.moisture),
            Field::Nitrogen => Some(self.nitrogen),
            Field::Potassium => Some(self.potassium),
            Field::Phosphorous => Some(self.phosphorous),
            Field::Soil => None,
            Field::Carbon => Some(self.carbon),
        }
    }

    /// Project to the classifier's column order, substituting the encoded
    /// soil code into the soil slot.
    pub fn to_model_row(&self, soil_code: usize) -> [f64; NUM_FEATURES] {
        Field::ALL.map(|field| self.numeric(field).unwrap_or(soil_code as f64))
    }
}

/// A validated 9-slot feature vector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "CropFeatures", into = "CropFeatures")]
pub struct FeatureVector {
    features: CropFeatures,
}

impl FeatureVector {
    /// Validate a named record; every numeric field must be finite.
    pub fn new(features: CropFeatures) -> Result<Self, InputError> {
        for field in Field::ALL {
            if let Some(value) = features.numeric(field)
                && !value.is_finite()
            {
                return Err(InputError::NonFinite { field, value });
            }
        }
        check_ranges(&features);
        Ok(Self { features })
    }

    /// Assemble a vector from positional values.
    ///
    /// Slot 7 must be a category and every other slot a finite number.
    pub fn from_values(values: Vec<FeatureValue>) -> Result<Self, InputError> {
        if values.len() != NUM_FEATURES {
            return Err(InputError::WrongLength {
                expected: NUM_FEATURES,
                actual: values.len(),
            });
        }

        let mut numbers = [0.0f64; NUM_FEATURES];
        let mut soil = String::new();

        for (field, value) in Field::ALL.into_iter().zip(values) {
            match (field.is_categorical(), value) {
                (true, FeatureValue::Category(s)) => soil = s,
                (true, FeatureValue::Number(n)) => {
                    return Err(InputError::ExpectedCategory { field, value: n });
                }
                (false, FeatureValue::Number(n)) => numbers[field.index()] = n,
                (false, FeatureValue::Category(s)) => {
                    return Err(InputError::ExpectedNumber { field, value: s });
                }
            }
        }

        Self::new(CropFeatures {
            temperature: numbers[Field::Temperature.index()],
            rainfall: numbers[Field::Rainfall.index()],
            ph: numbers[Field::Ph.index()],
            moisture: numbers[Field::Moisture.index()],
            nitrogen: numbers[Field::Nitrogen.index()],
            potassium: numbers[Field::Potassium.index()],
            phosphorous: numbers[Field::Phosphorous.index()],
            soil,
            carbon: numbers[Field::Carbon.index()],
        })
    }

    pub fn features(&self) -> &CropFeatures {
        &self.features
    }

    pub fn soil(&self) -> &str {
        &self.features.soil
    }

    /// Slots in positional order, for echoing input back to the user.
    pub fn values(&self) -> impl Iterator<Item = (Field, FeatureValue)> + '_ {
        Field::ALL.into_iter().map(|field| {
            let value = match self.features.numeric(field) {
                Some(n) => FeatureValue::Number(n),
                None => FeatureValue::Category(self.features.soil.clone()),
            };
            (field, value)
        })
    }
}

impl TryFrom<CropFeatures> for FeatureVector {
    type Error = InputError;

    fn try_from(features: CropFeatures) -> Result<Self, Self::Error> {
        Self::new(features)
    }
}

impl From<FeatureVector> for CropFeatures {
    fn from(vector: FeatureVector) -> Self {
        vector.features
    }
}

fn check_ranges(features: &CropFeatures) {
    if !(0.0..=1.0).contains(&features.moisture) {
        warn!(
            moisture = features.moisture,
            "moisture outside [0, 1]; expected a fraction, not a percentage"
        );
    }
    if !(0.0..=14.0).contains(&features.ph) {
        warn!(ph = features.ph, "pH outside [0, 14]");
    }
}
