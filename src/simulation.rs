//! Functionality for running the pathway model over every scenario.
use crate::geography::{CombinedTable, resolve_assignments};
use crate::model::{Model, ModelParameters};
use crate::output::metadata::write_metadata;
use crate::output::{
    ScenarioConfigWriter, write_debug_assignments, write_processed_data, write_scenario_list,
};
use crate::scenario::{OverrideMap, ScenarioConfiguration, ScenarioSpace};
use anyhow::{Context, Result};
use log::info;
use std::path::Path;
use toml::Value;

/// A model which can be run for a single scenario.
///
/// Implementors receive a fully built configuration for each scenario along with the combined
/// geography table, which is shared between all scenarios and must not be modified.
pub trait Simulation {
    /// Run the model for one scenario
    fn run(&mut self, scenario: &ScenarioConfiguration, geodata: &CombinedTable) -> Result<()>;
}

/// Build the configuration for the scenario at `index` in the scenario space.
///
/// Overrides are applied in this order: the model's defaults, then the scenario's own parameter
/// values, then its name.
pub fn build_scenario(
    parameters: &ModelParameters,
    space: &ScenarioSpace,
    index: usize,
) -> Result<ScenarioConfiguration> {
    let point = space
        .point(index)
        .with_context(|| format!("No scenario with index {index}"))?;
    let name = OverrideMap::from([(
        "name".to_string(),
        Value::String(parameters.scenario_name(index)),
    )]);

    ScenarioConfiguration::from_overrides([&parameters.defaults, &point, &name])
}

/// Run the simulation for every scenario in `space`, in order.
///
/// # Arguments
///
/// * `parameters` - Model parameters providing the scenario name prefix and default overrides
/// * `space` - The scenarios to run
/// * `geodata` - The combined geography table
/// * `simulation` - The model to run for each scenario
pub fn run_scenarios<S: Simulation + ?Sized>(
    parameters: &ModelParameters,
    space: &ScenarioSpace,
    geodata: &CombinedTable,
    simulation: &mut S,
) -> Result<()> {
    info!("Running {} scenarios", space.len());
    for index in 0..space.len() {
        let name = parameters.scenario_name(index);
        let scenario = build_scenario(parameters, space, index)
            .with_context(|| format!("Could not build scenario {name}"))?;

        info!("Running scenario {name}");
        simulation
            .run(&scenario, geodata)
            .with_context(|| format!("Scenario {name} failed"))?;
    }

    Ok(())
}

/// Run the model.
///
/// Assigns facilities to every area, writes the combined table and scenario list to
/// `output_path`, then writes the effective configuration for every scenario.
///
/// # Arguments
///
/// * `model` - The model to run
/// * `output_path` - The folder to which output files will be written
/// * `debug_model` - Whether to write the individual assignment tables as well
pub fn run(model: &Model, output_path: &Path, debug_model: bool) -> Result<()> {
    let space = model.parameters.scenario_space()?;
    write_metadata(output_path, model, space.len()).context("Failed to save metadata")?;

    let assignments = resolve_assignments(&model.geodata)?;
    if debug_model {
        write_debug_assignments(output_path, &assignments)
            .context("Failed to write debug output")?;
    }

    let geodata = assignments.collate(&model.geodata.admissions);
    write_processed_data(output_path, &geodata).context("Failed to write combined table")?;
    info!("Combined data for {} areas", geodata.len());

    info!("Scenario parameters: {}", space.describe());
    write_scenario_list(output_path, &model.parameters.prefix, &space)
        .context("Failed to write scenario list")?;

    let mut writer = ScenarioConfigWriter::create(output_path)?;
    run_scenarios(&model.parameters, &space, &geodata, &mut writer)
}
