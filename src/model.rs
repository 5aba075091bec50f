//! The model represents the static input data provided by the user.
use crate::geography::GeoData;
use std::path::PathBuf;

pub mod parameters;
pub use parameters::ModelParameters;

/// Model definition
pub struct Model {
    /// Path to model folder
    pub model_path: PathBuf,
    /// Parameters from the model TOML file
    pub parameters: ModelParameters,
    /// Facilities, admissions and travel times
    pub geodata: GeoData,
}
