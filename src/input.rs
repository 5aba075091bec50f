//! Common routines for handling input data.
use crate::facility::{Capability, FacilityID, FacilityMap, facilities_with_capability};
use crate::geography::GeoData;
use crate::id::IDCollection;
use crate::model::{Model, ModelParameters};
use anyhow::{Context, Result, ensure};
use indexmap::IndexSet;
use log::warn;
use serde::de::{Deserialize, DeserializeOwned, Deserializer};
use std::fs;
use std::path::Path;

pub mod admissions;
use admissions::read_admissions;
pub mod facility;
use facility::read_facilities;
pub mod travel_time;
use travel_time::{
    AREA_TRAVEL_TIME_FILE_NAME, FACILITY_TRAVEL_TIME_FILE_NAME, read_area_travel_times,
    read_facility_travel_times,
};

/// Read a series of type `T`s from a CSV file.
///
/// Will raise an error if the file is empty.
///
/// # Arguments
///
/// * `file_path` - Path to the CSV file
pub fn read_csv<T: DeserializeOwned>(file_path: &Path) -> Result<impl Iterator<Item = T> + use<T>> {
    let vec = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(file_path)
        .with_context(|| input_err_msg(file_path))?
        .into_deserialize()
        .collect::<Result<Vec<T>, _>>()
        .with_context(|| input_err_msg(file_path))?;
    ensure!(
        !vec.is_empty(),
        "CSV file {} cannot be empty",
        file_path.display()
    );

    Ok(vec.into_iter())
}

/// Parse a TOML file at the specified path.
///
/// # Arguments
///
/// * `file_path` - Path to the TOML file
///
/// # Returns
///
/// * The deserialised TOML data or an error if the file could not be read or parsed.
pub fn read_toml<T: DeserializeOwned>(file_path: &Path) -> Result<T> {
    let toml_str = fs::read_to_string(file_path).with_context(|| input_err_msg(file_path))?;
    let toml_data = toml::from_str(&toml_str).with_context(|| input_err_msg(file_path))?;
    Ok(toml_data)
}

/// Read a 0/1 flag as a `bool`
pub fn deserialise_flag<'de, D>(deserialiser: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value: u8 = Deserialize::deserialize(deserialiser)?;
    match value {
        0 => Ok(false),
        1 => Ok(true),
        _ => Err(serde::de::Error::custom(format!(
            "Flag must be 0 or 1 (got {value})"
        ))),
    }
}

/// Format an error message to include the file path. To be used with `anyhow::Context`.
pub fn input_err_msg<P: AsRef<Path>>(file_path: P) -> String {
    format!("Error reading {}", file_path.as_ref().display())
}

/// Check that every facility offering one of `capabilities` has a column in a travel time matrix
fn check_facility_columns(
    facilities: &FacilityMap,
    columns: &IndexSet<FacilityID>,
    capabilities: &[Capability],
) -> Result<()> {
    for &capability in capabilities {
        for id in facilities_with_capability(facilities, capability) {
            columns
                .get_id(&id)
                .with_context(|| format!("No travel times for {capability} facility {id}"))?;
        }
    }

    Ok(())
}

/// Check that the different input files are consistent with one another
fn check_geodata(geodata: &GeoData, model_dir: &Path) -> Result<()> {
    check_facility_columns(
        &geodata.facilities,
        geodata.area_travel_times.columns(),
        &[
            Capability::Thrombolysis,
            Capability::Thrombectomy,
            Capability::MobileStrokeUnit,
        ],
    )
    .with_context(|| input_err_msg(model_dir.join(AREA_TRAVEL_TIME_FILE_NAME)))?;

    // Transfers start at thrombolysis facilities and end at thrombectomy facilities
    check_facility_columns(
        &geodata.facilities,
        geodata.facility_travel_times.columns(),
        &[Capability::Thrombectomy],
    )
    .with_context(|| input_err_msg(model_dir.join(FACILITY_TRAVEL_TIME_FILE_NAME)))?;
    let rows = geodata.facility_travel_times.rows();
    for id in facilities_with_capability(&geodata.facilities, Capability::Thrombolysis) {
        if !rows.contains(&id) {
            warn!("No transfer times from thrombolysis facility {id}");
        }
    }

    let unmatched = geodata
        .admissions
        .keys()
        .filter(|area| !geodata.area_travel_times.rows().contains(*area))
        .count();
    if unmatched > 0 {
        warn!("{unmatched} areas with admissions data have no travel times and will be ignored");
    }

    Ok(())
}

/// Read the geographic input data from the specified model directory
pub fn read_geodata(model_dir: &Path) -> Result<GeoData> {
    let geodata = GeoData {
        facilities: read_facilities(model_dir)?,
        admissions: read_admissions(model_dir)?,
        area_travel_times: read_area_travel_times(model_dir)?,
        facility_travel_times: read_facility_travel_times(model_dir)?,
    };
    check_geodata(&geodata, model_dir)?;

    Ok(geodata)
}

/// Read a model from the specified directory.
///
/// # Arguments
///
/// * `model_dir` - Folder containing model configuration files
///
/// # Returns
///
/// The loaded model or an error.
pub fn load_model<P: AsRef<Path>>(model_dir: P) -> Result<Model> {
    let model_dir = model_dir.as_ref();
    let parameters = ModelParameters::from_path(model_dir)?;
    let geodata = read_geodata(model_dir)?;

    Ok(Model {
        model_path: model_dir.to_path_buf(),
        parameters,
        geodata,
    })
}
