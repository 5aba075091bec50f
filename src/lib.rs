//! Common functionality for stroke_pathway.
//!
//! The program assigns the nearest stroke treatment facilities to each area using travel time
//! matrices, then generates a configuration for every combination of scenario parameters.
#![warn(missing_docs)]
use std::path::PathBuf;

pub mod area;
pub mod cli;
pub mod facility;
pub mod geography;
pub mod id;
pub mod input;
pub mod log;
pub mod model;
pub mod output;
pub mod scenario;
pub mod settings;
pub mod simulation;
pub mod travel_time;

#[cfg(test)]
mod fixture;

/// Get the config folder for the program.
///
/// # Panics
///
/// If the platform has no config folder.
pub fn get_stroke_pathway_config_dir() -> PathBuf {
    let Some(mut config_dir) = dirs::config_dir() else {
        panic!("Configuration directory not available on this platform");
    };
    config_dir.push("stroke_pathway");

    config_dir
}
