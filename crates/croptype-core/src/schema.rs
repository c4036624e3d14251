//! Fixed agronomic feature schema.
//!
//! Input vectors are positional: nine slots in the order of [`Field::ALL`].
//! The model sees the same order, with the soil slot replaced by its encoded
//! integer code (see [`MODEL_FEATURES`]).

use std::fmt;

use serde::{Deserialize, Serialize};

/// Number of slots in a feature vector.
pub const NUM_FEATURES: usize = 9;

/// Position of the categorical soil slot.
pub const SOIL_INDEX: usize = 7;

/// Column names the classifier was trained on, in projection order.
pub const MODEL_FEATURES: [&str; NUM_FEATURES] = [
    "Temperature",
    "Rainfall",
    "PH",
    "Moisture",
    "Nitrogen",
    "Potassium",
    "Phosphorous",
    "Soil_Encoded",
    "Carbon",
];

/// One slot of the input schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Field {
    Temperature,
    Rainfall,
    Ph,
    Moisture,
    Nitrogen,
    Potassium,
    Phosphorous,
    Soil,
    Carbon,
}

impl Field {
    /// All fields in positional order.
    pub const ALL: [Field; NUM_FEATURES] = [
        Field::Temperature,
        Field::Rainfall,
        Field::Ph,
        Field::Moisture,
        Field::Nitrogen,
        Field::Potassium,
        Field::Phosphorous,
        Field::Soil,
        Field::Carbon,
    ];

    /// Record column name (matches the training data headers).
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Temperature => "Temperature",
            Self::Rainfall => "Rainfall",
            Self::Ph => "PH",
            Self::Moisture => "Moisture",
            Self::Nitrogen => "Nitrogen",
            Self::Potassium => "Potassium",
            Self::Phosphorous => "Phosphorous",
            Self::Soil => "Soil",
            Self::Carbon => "Carbon",
        }
    }

    /// Human-readable label used in reports.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Ph => "PH",
            Self::Soil => "Soil Type",
            other => other.as_str(),
        }
    }

    /// Display unit, empty for dimensionless and categorical fields.
    pub fn unit(&self) -> &'static str {
        match self {
            Self::Temperature => "°C",
            Self::Rainfall => "mm",
            Self::Ph | Self::Soil => "",
            // Moisture is a fraction in [0, 1], not a percentage.
            Self::Moisture => "fraction",
            Self::Nitrogen | Self::Potassium | Self::Phosphorous => "kg/ha",
            Self::Carbon => "%",
        }
    }

    /// Position in the input vector.
    pub fn index(&self) -> usize {
        *self as usize
    }

    pub fn is_categorical(&self) -> bool {
        matches!(self, Self::Soil)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positions_match_declaration_order() {
        for (i, field) in Field::ALL.iter().enumerate() {
            assert_eq!(field.index(), i, "{field} at wrong position");
        }
        assert_eq!(Field::Soil.index(), SOIL_INDEX);
    }

    #[test]
    fn only_soil_is_categorical() {
        let categorical: Vec<_> = Field::ALL.iter().filter(|f| f.is_categorical()).collect();
        assert_eq!(categorical, vec![&Field::Soil]);
    }

    #[test]
    fn model_features_follow_input_order() {
        for (field, model_name) in Field::ALL.iter().zip(MODEL_FEATURES) {
            if field.is_categorical() {
                assert_eq!(model_name, "Soil_Encoded");
            } else {
                assert_eq!(model_name, field.as_str());
            }
        }
    }
}
