pub mod error;
pub mod features;
pub mod schema;

pub use error::InputError;
pub use features::{CropFeatures, FeatureValue, FeatureVector};
pub use schema::{Field, MODEL_FEATURES, NUM_FEATURES, SOIL_INDEX};
