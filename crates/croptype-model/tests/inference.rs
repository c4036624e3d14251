//! End-to-end: artifacts on disk → predictor → ranking.

use std::path::Path;

use croptype_core::{CropFeatures, FeatureValue, FeatureVector};
use croptype_model::{
    Artifact, ArtifactError, CropTypePredictor, EncodedFeature, PredictError,
};
use serde_json::json;

const SOILS: [&str; 3] = ["Loamy Soil", "Neutral Soil", "Peaty Soil"];
const CROPS: [&str; 4] = ["Maize", "Rice", "Sugarcane", "Wheat"];

fn leaf(value: f64) -> serde_json::Value {
    json!({ "value": value })
}

fn stump(feature: usize, threshold: f64, left: f64, right: f64) -> serde_json::Value {
    json!({ "nodes": [
        { "feature": feature, "threshold": threshold, "left": 1, "right": 2 },
        leaf(left),
        leaf(right),
    ]})
}

/// Two-stage, four-class model with a deeper tree in the second stage.
fn model_json() -> serde_json::Value {
    json!({
        "format_version": 1,
        "feature_names": [
            "Temperature", "Rainfall", "PH", "Moisture", "Nitrogen",
            "Potassium", "Phosphorous", "Soil_Encoded", "Carbon"
        ],
        "classes": [0, 1, 2, 3],
        "learning_rate": 0.5,
        "init_scores": [0.1, 0.0, -0.1, 0.0],
        "stages": [
            [
                stump(0, 25.0, 1.5, -0.5),
                stump(1, 150.0, -0.5, 2.0),
                stump(4, 100.0, 0.0, 1.0),
                stump(7, 1.5, 0.0, 1.5),
            ],
            [
                { "nodes": [
                    { "feature": 2, "threshold": 6.0, "left": 1, "right": 2 },
                    leaf(-0.5),
                    { "feature": 3, "threshold": 0.3, "left": 3, "right": 4 },
                    leaf(0.25),
                    leaf(0.75),
                ]},
                stump(1, 250.0, 0.0, 1.0),
                stump(8, 2.0, 0.0, 0.5),
                stump(0, 15.0, 1.0, 0.0),
            ]
        ]
    })
}

fn encoders_json() -> serde_json::Value {
    json!({
        "Soil": { "classes": SOILS },
        "Crop": { "classes": CROPS },
    })
}

fn write(dir: &Path, name: &str, value: &serde_json::Value) {
    std::fs::write(dir.join(name), serde_json::to_vec_pretty(value).unwrap()).unwrap();
}

fn installed() -> (tempfile::TempDir, CropTypePredictor) {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "crop_model_gradient_boosting.json", &model_json());
    write(dir.path(), "label_encoders.json", &encoders_json());
    let predictor = CropTypePredictor::from_dir(dir.path()).unwrap();
    (dir, predictor)
}

fn example_input() -> Vec<FeatureValue> {
    vec![
        22.5.into(),
        120.0.into(),
        6.5.into(),
        0.4.into(),
        80.0.into(),
        40.0.into(),
        30.0.into(),
        "Loamy Soil".into(),
        1.2.into(),
    ]
}

#[test]
fn example_scenario() {
    let (_dir, predictor) = installed();
    let result = predictor.predict_values(example_input()).unwrap();

    assert!(CROPS.contains(&result.crop.as_str()));
    let head = result.ranking.first().unwrap();
    assert_eq!(head.crop, result.crop);
    assert!(result.ranking.iter().all(|e| head.probability >= e.probability));
}

#[test]
fn ranking_invariants_hold_across_inputs() {
    let (_dir, predictor) = installed();

    for soil in SOILS {
        for temperature in [10.0, 20.0, 30.0] {
            for rainfall in [50.0, 200.0, 300.0] {
                for (ph, moisture) in [(5.5, 0.2), (7.0, 0.2), (7.0, 0.6)] {
                    let features = FeatureVector::new(CropFeatures {
                        temperature,
                        rainfall,
                        ph,
                        moisture,
                        nitrogen: 120.0,
                        potassium: 40.0,
                        phosphorous: 30.0,
                        soil: soil.to_string(),
                        carbon: 2.5,
                    })
                    .unwrap();
                    let result = predictor.predict(&features).unwrap();

                    assert_eq!(result.ranking.len(), CROPS.len());
                    assert!((result.ranking.total() - 1.0).abs() < 1e-6);
                    let probs: Vec<f64> =
                        result.ranking.iter().map(|e| e.probability).collect();
                    assert!(probs.windows(2).all(|w| w[0] >= w[1]), "{probs:?}");
                    assert!(probs.iter().all(|p| (0.0..=1.0).contains(p)));
                    for crop in CROPS {
                        assert!(result.ranking.get(crop).is_some());
                    }
                    assert_eq!(result.ranking.first().unwrap().crop, result.crop);
                }
            }
        }
    }
}

#[test]
fn wet_peaty_conditions_favour_rice() {
    let (_dir, predictor) = installed();
    let mut input = example_input();
    input[0] = 30.0.into();
    input[1] = 300.0.into();
    input[7] = "Peaty Soil".into();
    let result = predictor.predict_values(input).unwrap();
    assert_eq!(result.crop, "Rice");
}

#[test]
fn unknown_soil_lists_the_vocabulary() {
    let (_dir, predictor) = installed();
    let mut input = example_input();
    input[7] = "Sandy Soil".into();

    match predictor.predict_values(input).unwrap_err() {
        PredictError::Encoding(e) => {
            assert_eq!(e.feature, EncodedFeature::Soil);
            assert_eq!(e.value, "Sandy Soil");
            assert_eq!(e.valid, SOILS);
        }
        other => panic!("expected encoding error, got {other:?}"),
    }
}

#[test]
fn predictions_are_idempotent() {
    let (_dir, predictor) = installed();
    let first = predictor.predict_values(example_input()).unwrap();
    let second = predictor.predict_values(example_input()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn empty_installation_constructs_then_fails_on_use() {
    let dir = tempfile::tempdir().unwrap();
    let predictor = CropTypePredictor::from_dir(dir.path()).unwrap();
    assert!(!predictor.status().classifier);
    assert!(!predictor.status().encoders);

    match predictor.predict_values(example_input()).unwrap_err() {
        PredictError::Uninitialized(e) => assert_eq!(e.missing, Artifact::Encoders),
        other => panic!("expected uninitialized model, got {other:?}"),
    }
}

#[test]
fn corrupt_model_fails_construction() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "label_encoders.json", &encoders_json());
    std::fs::write(dir.path().join("crop_model_gradient_boosting.json"), "{\"stages\": [").unwrap();

    let err = CropTypePredictor::from_dir(dir.path()).err().unwrap();
    assert!(matches!(err, ArtifactError::Corrupt { artifact: Artifact::Classifier, .. }));
}

#[test]
fn predictor_can_be_shared_across_threads() {
    let (_dir, predictor) = installed();
    let expected = predictor.predict_values(example_input()).unwrap();

    std::thread::scope(|s| {
        let handles: Vec<_> = (0..4)
            .map(|_| s.spawn(|| predictor.predict_values(example_input()).unwrap()))
            .collect();
        for h in handles {
            assert_eq!(h.join().unwrap(), expected);
        }
    });
}
