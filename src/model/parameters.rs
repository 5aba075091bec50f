//! Defines the `ModelParameters` struct, which represents the contents of `model.toml`.
use crate::input::{input_err_msg, read_toml};
use crate::scenario::{OverrideMap, ScenarioAxes, ScenarioConfiguration, ScenarioSpace};
use anyhow::{Context, Result, ensure};
use serde::Deserialize;
use std::path::Path;

const MODEL_PARAMETERS_FILE_NAME: &str = "model.toml";

/// Represents the contents of the entire model file.
#[derive(Debug, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ModelParameters {
    /// Prefix for scenario names and the scenario list file name
    #[serde(default)]
    pub prefix: String,
    /// Scenario parameters to apply to every scenario, before the scenario's own values
    #[serde(default)]
    pub defaults: OverrideMap,
    /// Candidate values for each scenario parameter.
    ///
    /// A scenario is run for every combination of values.
    #[serde(default)]
    pub scenarios: ScenarioAxes,
}

/// Check that the `prefix` parameter is valid
fn check_prefix(prefix: &str) -> Result<()> {
    ensure!(
        !prefix.contains(['/', '\\']),
        "`prefix` cannot contain path separators"
    );

    Ok(())
}

impl ModelParameters {
    /// Read a model file from the specified directory.
    ///
    /// # Arguments
    ///
    /// * `model_dir` - Folder containing model configuration files
    ///
    /// # Returns
    ///
    /// The model file contents as a [`ModelParameters`] struct or an error if the file is invalid
    pub fn from_path<P: AsRef<Path>>(model_dir: P) -> Result<ModelParameters> {
        let file_path = model_dir.as_ref().join(MODEL_PARAMETERS_FILE_NAME);
        let model_params: ModelParameters = read_toml(&file_path)?;

        model_params
            .validate()
            .with_context(|| input_err_msg(file_path))?;

        Ok(model_params)
    }

    /// Validate parameters after reading in file
    fn validate(&self) -> Result<()> {
        // prefix
        check_prefix(&self.prefix)?;

        // defaults
        self.default_scenario()
            .context("Invalid value in `defaults`")?;

        // scenarios
        self.scenario_space()?;

        Ok(())
    }

    /// The configuration which every scenario starts from
    pub fn default_scenario(&self) -> Result<ScenarioConfiguration> {
        ScenarioConfiguration::from_overrides([&self.defaults])
    }

    /// The space of all scenarios to run
    pub fn scenario_space(&self) -> Result<ScenarioSpace> {
        Ok(ScenarioSpace::new(self.scenarios.clone())?)
    }

    /// The name for the scenario with the given index
    pub fn scenario_name(&self, index: usize) -> String {
        format!("{}_{index}", self.prefix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::assert_error;
    use crate::scenario::ScenarioSpaceError;
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    fn write_model_file(dir: &Path, contents: &str) {
        let mut file = File::create(dir.join(MODEL_PARAMETERS_FILE_NAME)).unwrap();
        writeln!(file, "{contents}").unwrap();
    }

    #[test]
    fn test_check_prefix() {
        assert!(check_prefix("").is_ok());
        assert!(check_prefix("msu").is_ok());
        assert!(check_prefix("a/b").is_err());
        assert!(check_prefix("a\\b").is_err());
    }

    #[test]
    fn test_model_params_from_path() {
        let dir = tempdir().unwrap();
        write_model_file(
            dir.path(),
            "prefix = \"msu\"

[defaults]
process_msu_dispatch = 10

[scenarios]
transfer_time_delay = [30, 60, 90]
limit_to_england = [true, false]",
        );

        let model_params = ModelParameters::from_path(dir.path()).unwrap();
        assert_eq!(model_params.prefix, "msu");
        assert!(
            model_params
                .scenarios
                .keys()
                .eq(["transfer_time_delay", "limit_to_england"])
        );
        assert_eq!(model_params.scenario_space().unwrap().len(), 6);
        assert_eq!(
            model_params.default_scenario().unwrap().process_msu_dispatch,
            10.0
        );
        assert_eq!(model_params.scenario_name(4), "msu_4");
    }

    #[test]
    fn test_model_params_from_path_empty() {
        let dir = tempdir().unwrap();
        write_model_file(dir.path(), "");

        let model_params = ModelParameters::from_path(dir.path()).unwrap();
        assert_eq!(model_params.prefix, "");
        assert!(model_params.defaults.is_empty());
        assert_eq!(model_params.scenario_space().unwrap().len(), 1);
        assert_eq!(model_params.scenario_name(0), "_0");
    }

    #[test]
    fn test_model_params_empty_axis() {
        let dir = tempdir().unwrap();
        write_model_file(dir.path(), "[scenarios]\nstroke_mimics = []");

        let err = ModelParameters::from_path(dir.path()).unwrap_err();
        assert_eq!(
            err.root_cause().downcast_ref::<ScenarioSpaceError>(),
            Some(&ScenarioSpaceError::EmptyAxis {
                axis: "stroke_mimics".into()
            })
        );
    }

    #[test]
    fn test_model_params_invalid_default() {
        let dir = tempdir().unwrap();
        write_model_file(dir.path(), "[defaults]\nstroke_mimics = 2.0");

        let result = ModelParameters::from_path(dir.path());
        assert_error!(
            result,
            format!(
                "Error reading {}",
                dir.path().join(MODEL_PARAMETERS_FILE_NAME).display()
            )
        );
    }

    #[test]
    fn test_model_params_unknown_field() {
        let dir = tempdir().unwrap();
        write_model_file(dir.path(), "milestone_years = [2020]");
        assert!(ModelParameters::from_path(dir.path()).is_err());
    }
}
