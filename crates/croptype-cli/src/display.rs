//! Console report for a single prediction.
//!
//! The text layout echoes the nine inputs with units, then the predicted crop
//! and the top three crops with proportional bars. Prediction errors collapse
//! into a single `Error:` line; this is the only place they are swallowed.

use std::io::{self, Write};

use croptype_core::FeatureVector;
use croptype_model::{ArtifactStatus, PredictError, PredictionResult};
use serde::Serialize;

const RULE_WIDTH: usize = 70;
const BAR_WIDTH: usize = 50;
const TOP_N: usize = 3;

/// Print the text report.
pub fn render_report<W: Write>(
    out: &mut W,
    features: &FeatureVector,
    outcome: &Result<PredictionResult, PredictError>,
) -> io::Result<()> {
    let rule = "=".repeat(RULE_WIDTH);

    writeln!(out, "\n{rule}")?;
    writeln!(out, "Predictions Results")?;
    writeln!(out, "{rule}")?;

    writeln!(out, "\n ==> Input Data:")?;
    for (field, value) in features.values() {
        let unit = field.unit();
        if unit.is_empty() {
            writeln!(out, " - {}: {value}", field.label())?;
        } else {
            writeln!(out, " - {}: {value} {unit}", field.label())?;
        }
    }

    writeln!(out, "\n{rule}")?;
    writeln!(out, "\n ==> Predictions:")?;

    match outcome {
        Ok(result) => {
            writeln!(out, "\n Predicted Crop: {}", result.crop)?;
            writeln!(out, "\n Top {TOP_N} Predictions: Confidence level")?;
            for (i, entry) in result.ranking.top(TOP_N).iter().enumerate() {
                writeln!(
                    out,
                    "  {}. {:<15}: {} ==> {:.2}%",
                    i + 1,
                    entry.crop,
                    bar(entry.probability),
                    entry.probability * 100.0
                )?;
            }
        }
        Err(e) => writeln!(out, " Error: {e}")?,
    }
    Ok(())
}

/// `█` repeated in proportion to `probability`, at most [`BAR_WIDTH`] long.
pub fn bar(probability: f64) -> String {
    let len = (probability.clamp(0.0, 1.0) * BAR_WIDTH as f64) as usize;
    "█".repeat(len)
}

#[derive(Serialize)]
struct JsonReport<'a> {
    input: &'a FeatureVector,
    #[serde(flatten)]
    outcome: JsonOutcome<'a>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum JsonOutcome<'a> {
    Prediction { prediction: &'a PredictionResult },
    Error { error: String },
}

/// Print the same information as [`render_report`] as one JSON object.
pub fn render_json<W: Write>(
    out: &mut W,
    features: &FeatureVector,
    outcome: &Result<PredictionResult, PredictError>,
) -> anyhow::Result<()> {
    let outcome = match outcome {
        Ok(prediction) => JsonOutcome::Prediction { prediction },
        Err(e) => JsonOutcome::Error {
            error: e.to_string(),
        },
    };
    serde_json::to_writer_pretty(&mut *out, &JsonReport {
        input: features,
        outcome,
    })?;
    writeln!(out)?;
    Ok(())
}

/// Artifact status and vocabularies, for `croptype info`.
pub fn render_info<W: Write>(
    out: &mut W,
    model_dir: &std::path::Path,
    status: ArtifactStatus,
    soils: Option<&[String]>,
    crops: Option<&[String]>,
) -> io::Result<()> {
    let loaded = |ok: bool| if ok { "loaded" } else { "missing" };

    writeln!(out, "Model directory  {}", model_dir.display())?;
    writeln!(out, "Classifier       {}", loaded(status.classifier))?;
    writeln!(out, "Encoder set      {}", loaded(status.encoders))?;
    if let Some(soils) = soils {
        writeln!(out, "Soil types       {}", soils.join(", "))?;
    }
    if let Some(crops) = crops {
        writeln!(out, "Crop types ({})  {}", crops.len(), crops.join(", "))?;
    }
    Ok(())
}
