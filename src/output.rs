//! The module responsible for writing output data to disk.
use crate::geography::{AssignmentMap, CombinedTable, ResolvedAssignments, TransferMap};
use crate::id::IDLike;
use crate::scenario::{ScenarioConfiguration, ScenarioSpace};
use crate::simulation::Simulation;
use anyhow::{Context, Result, ensure};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use toml::Value;

pub mod metadata;

/// The root folder in which model-specific output folders will be created
const OUTPUT_DIRECTORY_ROOT: &str = "stroke_pathway_results";

/// The output file name for the combined geography table
const PROCESSED_DATA_FILE_NAME: &str = "processed_data.csv";

/// The subfolder in which per-scenario configurations are written
const SCENARIOS_DIRECTORY_NAME: &str = "scenarios";

/// The output file name for the transfer assignments
const TRANSFER_DEBUG_FILE_NAME: &str = "debug_transfer_mt_unit.csv";

/// Get the default output directory for the model specified at `model_dir`
pub fn get_output_dir(model_dir: &Path) -> Result<PathBuf> {
    // Get the model name from the dir path. This ends up being convoluted because we need to check
    // for all possible errors. Ugh.
    let model_dir = model_dir
        .canonicalize() // canonicalise in case the user has specified "."
        .context("Could not resolve path to model")?;

    let model_name = model_dir
        .file_name()
        .context("Model cannot be in root folder")?
        .to_str()
        .context("Invalid chars in model dir name")?;

    // Construct path
    Ok([OUTPUT_DIRECTORY_ROOT, model_name].iter().collect())
}

/// Create a new output directory for the model, optionally overwriting existing data.
///
/// # Arguments
///
/// * `output_dir` - The output directory to create/overwrite
/// * `allow_overwrite` - Whether to delete and recreate the folder if it is non-empty
///
/// # Returns
///
/// `true` if the output dir contained existing data that was deleted, `false` if not, or an error.
pub fn create_output_directory(output_dir: &Path, allow_overwrite: bool) -> Result<bool> {
    // If the folder already exists, then delete it
    let overwrite = if let Ok(mut it) = fs::read_dir(output_dir) {
        if it.next().is_none() {
            // Folder exists and is empty: nothing to do
            return Ok(false);
        }

        ensure!(
            allow_overwrite,
            "Output folder already exists and is not empty. \
            Please delete the folder or pass the --overwrite command-line option."
        );

        fs::remove_dir_all(output_dir)?;
        true
    } else {
        false
    };

    // Try to create the directory, with parents
    fs::create_dir_all(output_dir)?;

    Ok(overwrite)
}

/// Represents a row in the combined geography CSV file.
///
/// Missing values are written as empty fields.
#[derive(Serialize, Debug, PartialEq)]
struct ProcessedDataRow<'a> {
    area: &'a str,
    nearest_ivt_unit: Option<&'a str>,
    nearest_ivt_time: Option<f64>,
    nearest_mt_unit: Option<&'a str>,
    nearest_mt_time: Option<f64>,
    transfer_mt_unit: Option<&'a str>,
    transfer_mt_time: Option<f64>,
    transfer_required: Option<bool>,
    nearest_msu_unit: Option<&'a str>,
    nearest_msu_time: Option<f64>,
    admissions: Option<f64>,
}

/// Write the combined geography table to a CSV file
pub fn write_processed_data(output_path: &Path, table: &CombinedTable) -> Result<()> {
    let file_path = output_path.join(PROCESSED_DATA_FILE_NAME);
    let mut writer = csv::Writer::from_path(file_path)?;
    for (area, record) in table {
        let ivt = record.nearest_ivt.as_ref();
        let mt = record.nearest_mt.as_ref();
        let transfer = record.transfer_mt.as_ref();
        let msu = record.nearest_msu.as_ref();
        writer.serialize(ProcessedDataRow {
            area: &area.0,
            nearest_ivt_unit: ivt.map(|a| &*a.facility.0),
            nearest_ivt_time: ivt.map(|a| a.time),
            nearest_mt_unit: mt.map(|a| &*a.facility.0),
            nearest_mt_time: mt.map(|a| a.time),
            transfer_mt_unit: transfer.map(|t| &*t.facility.0),
            transfer_mt_time: transfer.map(|t| t.time),
            transfer_required: transfer.map(|t| t.transfer_required),
            nearest_msu_unit: msu.map(|a| &*a.facility.0),
            nearest_msu_time: msu.map(|a| a.time),
            admissions: record.admissions,
        })?;
    }
    writer.flush()?;

    Ok(())
}

/// Represents a row in one of the assignment debug CSV files
#[derive(Serialize, Debug, PartialEq)]
struct AssignmentRow<'a> {
    from: &'a str,
    unit: Option<&'a str>,
    time: Option<f64>,
}

/// Represents a row in the transfer debug CSV file
#[derive(Serialize, Debug, PartialEq)]
struct TransferRow<'a> {
    from: &'a str,
    unit: Option<&'a str>,
    time: Option<f64>,
    transfer_required: Option<bool>,
}

fn write_assignments<R: IDLike>(file_path: &Path, assignments: &AssignmentMap<R>) -> Result<()> {
    let mut writer = csv::Writer::from_path(file_path)?;
    for (from, assignment) in assignments {
        let from: &str = from.borrow();
        let assignment = assignment.as_ref();
        writer.serialize(AssignmentRow {
            from,
            unit: assignment.map(|a| &*a.facility.0),
            time: assignment.map(|a| a.time),
        })?;
    }
    writer.flush()?;

    Ok(())
}

fn write_transfers(file_path: &Path, transfers: &TransferMap) -> Result<()> {
    let mut writer = csv::Writer::from_path(file_path)?;
    for (from, transfer) in transfers {
        let transfer = transfer.as_ref();
        writer.serialize(TransferRow {
            from: &from.0,
            unit: transfer.map(|t| &*t.facility.0),
            time: transfer.map(|t| t.time),
            transfer_required: transfer.map(|t| t.transfer_required),
        })?;
    }
    writer.flush()?;

    Ok(())
}

/// Write the individual assignment tables to CSV files, for debugging
pub fn write_debug_assignments(output_path: &Path, assignments: &ResolvedAssignments) -> Result<()> {
    let tables = [
        ("debug_nearest_ivt_unit.csv", &assignments.nearest_ivt),
        ("debug_nearest_mt_unit.csv", &assignments.nearest_mt),
        ("debug_nearest_msu_unit.csv", &assignments.nearest_msu),
    ];
    for (file_name, table) in tables {
        write_assignments(&output_path.join(file_name), table)?;
    }
    write_transfers(
        &output_path.join(TRANSFER_DEBUG_FILE_NAME),
        &assignments.transfers,
    )?;

    Ok(())
}

/// The file name for the list of scenarios with the given prefix
fn scenario_list_file_name(prefix: &str) -> String {
    format!("scenario_list_{prefix}.csv")
}

/// Format a parameter value for the scenario list.
///
/// Strings are written without quotes; everything else uses TOML syntax.
fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Write the list of all scenarios to a CSV file.
///
/// The first column holds the scenario index and there is one further column per parameter.
pub fn write_scenario_list(output_path: &Path, prefix: &str, space: &ScenarioSpace) -> Result<()> {
    let file_path = output_path.join(scenario_list_file_name(prefix));
    let mut writer = csv::Writer::from_path(file_path)?;
    writer.write_record(std::iter::once("Scenario").chain(space.axis_names()))?;
    for (index, point) in space.iter() {
        writer.write_record(
            std::iter::once(index.to_string()).chain(point.values().map(format_value)),
        )?;
    }
    writer.flush()?;

    Ok(())
}

/// Writes the effective configuration for each scenario to a TOML file.
///
/// This allows the scenarios to be run by an external pathway simulation.
pub struct ScenarioConfigWriter {
    scenarios_path: PathBuf,
}

impl ScenarioConfigWriter {
    /// Create a new [`ScenarioConfigWriter`], creating the output folder for scenarios
    pub fn create(output_path: &Path) -> Result<Self> {
        let scenarios_path = output_path.join(SCENARIOS_DIRECTORY_NAME);
        fs::create_dir_all(&scenarios_path).with_context(|| {
            format!(
                "Failed to create scenarios directory: {}",
                scenarios_path.display()
            )
        })?;

        Ok(Self { scenarios_path })
    }
}

impl Simulation for ScenarioConfigWriter {
    fn run(&mut self, scenario: &ScenarioConfiguration, _geodata: &CombinedTable) -> Result<()> {
        let file_path = self.scenarios_path.join(format!("{}.toml", scenario.name));
        fs::write(&file_path, toml::to_string(scenario)?)
            .with_context(|| format!("Failed to write {}", file_path.display()))?;

        Ok(())
    }
}
