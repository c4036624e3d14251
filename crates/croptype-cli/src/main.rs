mod display;

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Args, Parser, Subcommand, ValueEnum};
use croptype_core::{CropFeatures, FeatureValue, FeatureVector};
use croptype_model::artifacts::{self, MODEL_DIR};
use croptype_model::CropTypePredictor;

/// Crop-type recommendation from soil and climate measurements
#[derive(Parser)]
#[command(name = "croptype", version, about)]
struct Cli {
    /// Directory holding the classifier and encoder artifacts
    /// (default: `models/` beside the executable)
    #[arg(long, env = "CROPTYPE_MODEL_DIR", global = true)]
    model_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Predict the crop type for one set of measurements
    Predict(PredictArgs),

    /// Show artifact status and the known soil and crop types
    Info,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Text,
    Json,
}

#[derive(Args)]
struct PredictArgs {
    /// Nine positional values: temperature rainfall ph moisture nitrogen
    /// potassium phosphorous soil carbon
    #[arg(num_args = 9, value_name = "VALUE", allow_negative_numbers = true, conflicts_with_all = [
        "temperature", "rainfall", "ph", "moisture", "nitrogen",
        "potassium", "phosphorous", "soil", "carbon",
    ])]
    values: Vec<String>,

    /// Temperature in °C
    #[arg(long)]
    temperature: Option<f64>,
    /// Rainfall in mm
    #[arg(long)]
    rainfall: Option<f64>,
    /// Soil pH
    #[arg(long)]
    ph: Option<f64>,
    /// Soil moisture as a fraction in [0, 1]
    #[arg(long)]
    moisture: Option<f64>,
    /// Nitrogen content in kg/ha
    #[arg(long)]
    nitrogen: Option<f64>,
    /// Potassium content in kg/ha
    #[arg(long)]
    potassium: Option<f64>,
    /// Phosphorous content in kg/ha
    #[arg(long)]
    phosphorous: Option<f64>,
    /// Soil type, e.g. "Loamy Soil"
    #[arg(long)]
    soil: Option<String>,
    /// Carbon content in %
    #[arg(long)]
    carbon: Option<f64>,

    /// Report format
    #[arg(long, value_enum, default_value = "text")]
    format: Format,
}

impl PredictArgs {
    fn features(&self) -> anyhow::Result<FeatureVector> {
        if !self.values.is_empty() {
            let values = self.values.iter().map(|v| FeatureValue::parse(v)).collect();
            return Ok(FeatureVector::from_values(values)?);
        }

        let missing = |name: &str| anyhow::anyhow!("missing --{name} (or give nine positional values)");
        Ok(FeatureVector::new(CropFeatures {
            temperature: self.temperature.ok_or_else(|| missing("temperature"))?,
            rainfall: self.rainfall.ok_or_else(|| missing("rainfall"))?,
            ph: self.ph.ok_or_else(|| missing("ph"))?,
            moisture: self.moisture.ok_or_else(|| missing("moisture"))?,
            nitrogen: self.nitrogen.ok_or_else(|| missing("nitrogen"))?,
            potassium: self.potassium.ok_or_else(|| missing("potassium"))?,
            phosphorous: self.phosphorous.ok_or_else(|| missing("phosphorous"))?,
            soil: self.soil.clone().ok_or_else(|| missing("soil"))?,
            carbon: self.carbon.ok_or_else(|| missing("carbon"))?,
        })?)
    }
}

fn main() -> anyhow::Result<ExitCode> {
    // Logs go to stderr; stdout is the report. Default: warn, override with RUST_LOG.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();
    tracing::debug!("croptype v{}", env!("CARGO_PKG_VERSION"));

    let cli = Cli::parse();

    let model_dir = match cli.model_dir {
        Some(dir) => dir,
        None => artifacts::installation_dir()?.join(MODEL_DIR),
    };
    let predictor = CropTypePredictor::from_dir(&model_dir)
        .with_context(|| format!("loading artifacts from {}", model_dir.display()))?;

    let mut stdout = io::stdout().lock();

    match cli.command {
        Command::Predict(args) => {
            let features = match args.features() {
                Ok(f) => f,
                Err(e) => {
                    eprintln!(" Error: {e}");
                    return Ok(ExitCode::from(2));
                }
            };

            let outcome = predictor.predict(&features);
            match args.format {
                Format::Text => display::render_report(&mut stdout, &features, &outcome)?,
                Format::Json => display::render_json(&mut stdout, &features, &outcome)?,
            }
            stdout.flush()?;

            Ok(if outcome.is_ok() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
        Command::Info => {
            display::render_info(
                &mut stdout,
                &model_dir,
                predictor.status(),
                predictor.soil_types().ok(),
                predictor.crop_types().ok(),
            )?;
            Ok(ExitCode::SUCCESS)
        }
    }
}
