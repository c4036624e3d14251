//! Small hand-built artifacts shared by unit tests.
//!
//! Crops: Maize (0), Rice (1), Wheat (2). Soils: Loamy (0), Neutral (1), Peaty (2).
//! One boosting stage with a stump per class:
//! - Maize: +2 when Temperature <= 25
//! - Rice:  +3 when Rainfall > 150
//! - Wheat: +1 when Soil_Encoded > 0.5

use croptype_core::MODEL_FEATURES;

use crate::encoder::{EncoderSet, LabelEncoder};
use crate::gbdt::{FORMAT_VERSION, GbdtFile, GradientBoostedTrees, Node, Tree};

pub fn encoders() -> EncoderSet {
    EncoderSet::new(
        LabelEncoder::new(vec![
            "Loamy Soil".into(),
            "Neutral Soil".into(),
            "Peaty Soil".into(),
        ])
        .unwrap(),
        LabelEncoder::new(vec!["Maize".into(), "Rice".into(), "Wheat".into()]).unwrap(),
    )
}

pub fn stump(feature: usize, threshold: f64, left: f64, right: f64) -> Tree {
    Tree {
        nodes: vec![
            Node::Split {
                feature,
                threshold,
                left: 1,
                right: 2,
            },
            Node::Leaf { value: left },
            Node::Leaf { value: right },
        ],
    }
}

pub fn model_file() -> GbdtFile {
    GbdtFile {
        format_version: FORMAT_VERSION,
        feature_names: MODEL_FEATURES.iter().map(|s| s.to_string()).collect(),
        classes: vec![0, 1, 2],
        learning_rate: 1.0,
        init_scores: vec![0.0, 0.0, 0.0],
        stages: vec![vec![
            stump(0, 25.0, 2.0, 0.0),
            stump(1, 150.0, 0.0, 3.0),
            stump(7, 0.5, 0.0, 1.0),
        ]],
    }
}

pub fn model() -> GradientBoostedTrees {
    GradientBoostedTrees::try_from(model_file()).unwrap()
}
