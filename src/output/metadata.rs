//! Code for writing information about a run to `metadata.toml`
use crate::model::Model;
use anyhow::{Result, anyhow};
use chrono::Local;
use platform_info::{PlatformInfo, PlatformInfoAPI, UNameAPI};
use serde::Serialize;
use std::fs;
use std::path::Path;

/// The output file name for metadata
const METADATA_FILE_NAME: &str = "metadata.toml";

/// Information about the program build via `built` crate
mod built_info {
    // The file has been placed there by the build script.
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

/// The short git hash for this build, with a `-dirty` suffix if there were uncommitted changes
fn git_hash() -> String {
    match (built_info::GIT_COMMIT_HASH_SHORT, built_info::GIT_DIRTY) {
        (Some(hash), Some(true)) => format!("{hash}-dirty"),
        (Some(hash), _) => hash.into(),
        (None, _) => "unknown".into(),
    }
}

#[derive(Serialize)]
struct Metadata<'a> {
    run: RunMetadata<'a>,
    program: ProgramMetadata,
    platform: PlatformMetadata,
}

/// Information about the model run
#[derive(Serialize)]
struct RunMetadata<'a> {
    /// Path to the model which was run
    model_path: &'a Path,
    /// Prefix used for scenario names
    scenario_prefix: &'a str,
    /// Number of scenarios generated from the scenario parameters
    num_scenarios: usize,
    /// Number of areas in the area travel time matrix
    num_areas: usize,
    /// Number of facilities
    num_facilities: usize,
    /// When the run started
    datetime: String,
}

#[derive(Serialize)]
struct ProgramMetadata {
    name: &'static str,
    version: &'static str,
    target: &'static str,
    is_debug: bool,
    rustc_version: &'static str,
    build_time_utc: &'static str,
    git_commit_hash: String,
}

impl ProgramMetadata {
    fn new() -> Self {
        Self {
            name: built_info::PKG_NAME,
            version: built_info::PKG_VERSION,
            target: built_info::TARGET,
            is_debug: built_info::DEBUG,
            rustc_version: built_info::RUSTC_VERSION,
            build_time_utc: built_info::BUILT_TIME_UTC,
            git_commit_hash: git_hash(),
        }
    }
}

/// Information about the machine the program is running on, from [`PlatformInfo`]
#[derive(Serialize)]
struct PlatformMetadata {
    sysname: String,
    nodename: String,
    release: String,
    version: String,
    machine: String,
    osname: String,
}

impl PlatformMetadata {
    fn new() -> Result<Self> {
        let info =
            PlatformInfo::new().map_err(|err| anyhow!("Unable to determine platform info: {err}"))?;
        Ok(Self {
            sysname: info.sysname().to_string_lossy().into(),
            nodename: info.nodename().to_string_lossy().into(),
            release: info.release().to_string_lossy().into(),
            version: info.version().to_string_lossy().into(),
            machine: info.machine().to_string_lossy().into(),
            osname: info.osname().to_string_lossy().into(),
        })
    }
}

/// Write metadata about the run to the specified output path in TOML format
pub fn write_metadata(output_path: &Path, model: &Model, num_scenarios: usize) -> Result<()> {
    let metadata = Metadata {
        run: RunMetadata {
            model_path: &model.model_path,
            scenario_prefix: &model.parameters.prefix,
            num_scenarios,
            num_areas: model.geodata.area_travel_times.num_rows(),
            num_facilities: model.geodata.facilities.len(),
            datetime: Local::now().to_rfc2822(),
        },
        program: ProgramMetadata::new(),
        platform: PlatformMetadata::new()?,
    };
    fs::write(
        output_path.join(METADATA_FILE_NAME),
        toml::to_string(&metadata)?,
    )?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::geodata;
    use crate::geography::GeoData;
    use crate::model::ModelParameters;
    use rstest::rstest;
    use tempfile::tempdir;

    #[rstest]
    fn test_write_metadata(geodata: GeoData) {
        let model = Model {
            model_path: "some/model".into(),
            parameters: ModelParameters {
                prefix: "msu".into(),
                defaults: Default::default(),
                scenarios: Default::default(),
            },
            geodata,
        };
        let dir = tempdir().unwrap();
        write_metadata(dir.path(), &model, 4).unwrap();

        let contents = fs::read_to_string(dir.path().join(METADATA_FILE_NAME)).unwrap();
        let table: toml::Table = toml::from_str(&contents).unwrap();
        let run = table["run"].as_table().unwrap();
        assert_eq!(run["scenario_prefix"].as_str(), Some("msu"));
        assert_eq!(run["num_scenarios"].as_integer(), Some(4));
        assert_eq!(run["num_areas"].as_integer(), Some(3));
        assert_eq!(run["num_facilities"].as_integer(), Some(3));
        assert_eq!(
            table["program"]["name"].as_str(),
            Some(env!("CARGO_PKG_NAME"))
        );
    }
}
