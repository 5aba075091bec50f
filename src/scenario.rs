//! Scenarios hold the global parameters for a single run of the pathway model.
//!
//! A [`ScenarioConfiguration`] starts from built-in defaults, which may be overridden by any number
//! of override tables (e.g. defaults from `model.toml`, then a point in the scenario space). Later
//! overrides take precedence over earlier ones.
use anyhow::{Context, Result, ensure};
use indexmap::IndexMap;
use log::warn;
use serde::{Deserialize, Serialize};
use toml::{Table, Value};

pub mod space;
pub use space::{ScenarioAxes, ScenarioPoint, ScenarioSpace, ScenarioSpaceError};

/// Parameter values to override, keyed by parameter name
pub type OverrideMap = IndexMap<String, Value>;

/// Proportions (in percent) of each stroke type for arrivals within six hours of onset
#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct StrokeTypeProportions {
    /// Haemorrhagic
    pub h: f64,
    /// Non-large vessel occlusion
    pub nlvo: f64,
    /// Large vessel occlusion
    pub lvo: f64,
}

/// Global parameters for the pathway model.
///
/// Process times are all in minutes.
#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioConfiguration {
    /// A name identifying the scenario
    pub name: String,
    /// Whether to restrict the geography to England
    pub limit_to_england: bool,
    /// Proportions of each stroke type
    pub stroke_type_proportions: StrokeTypeProportions,
    /// Proportion of all calls that are stroke mimics
    pub stroke_mimics: f64,
    /// Proportion of nLVO patients treated with thrombolysis
    pub prop_nlvo_treated_with_ivt: f64,
    /// Proportion of nLVO patients treated with thrombectomy
    pub prop_nlvo_treated_with_mt: f64,
    /// Proportion of LVO patients treated with thrombolysis
    pub prop_lvo_treated_with_ivt: f64,
    /// Proportion of LVO patients treated with thrombectomy
    pub prop_lvo_treated_with_mt: f64,
    /// Time from stroke onset to calling an ambulance
    pub process_time_call_ambulance: f64,
    /// Time for an ambulance to arrive
    pub process_time_ambulance_response: f64,
    /// Time the ambulance spends on scene
    pub process_ambulance_on_scene_duration: f64,
    /// Time to dispatch a mobile stroke unit
    pub process_msu_dispatch: f64,
    /// Time for a mobile stroke unit to give thrombolysis
    pub process_msu_thrombolysis: f64,
    /// Time a mobile stroke unit stays on scene after thrombolysis
    pub process_msu_on_scene_post_thrombolysis: f64,
    /// Time a mobile stroke unit spends on scene without thrombolysis
    pub process_msu_on_scene_no_thrombolysis: f64,
    /// Time from arrival at a facility to thrombolysis
    pub process_time_arrival_to_needle: f64,
    /// Delay before a patient is transferred between facilities
    pub transfer_time_delay: f64,
    /// Time from arrival at a facility to arterial puncture
    pub process_time_arrival_to_puncture: f64,
    /// Time from arrival by mobile stroke unit to arterial puncture
    pub process_time_msu_arrival_to_puncture: f64,
    /// Whether results should be saved for every area
    pub save_lsoa_results: bool,
    /// Parameters which are not recognised by the model.
    ///
    /// These are kept so that they can be passed through to the simulation, but otherwise have no
    /// effect.
    #[serde(flatten)]
    pub extra: OverrideMap,
}

impl Default for ScenarioConfiguration {
    fn default() -> Self {
        Self {
            name: "No_name".into(),
            limit_to_england: true,
            // See: https://samuel-book.github.io/samuel-1/descriptive_stats/10_using_nihss_10_for_lvo.html
            stroke_type_proportions: StrokeTypeProportions {
                h: 13.6,
                nlvo: 60.9,
                lvo: 25.5,
            },
            stroke_mimics: 0.3,
            // Gives 20% IVT and 15% MT with the above proportions
            prop_nlvo_treated_with_ivt: 0.16,
            prop_nlvo_treated_with_mt: 0.0,
            prop_lvo_treated_with_ivt: 0.40,
            prop_lvo_treated_with_mt: 0.60,
            process_time_call_ambulance: 60.0,
            process_time_ambulance_response: 20.0,
            process_ambulance_on_scene_duration: 30.0,
            process_msu_dispatch: 15.0,
            process_msu_thrombolysis: 30.0,
            process_msu_on_scene_post_thrombolysis: 5.0,
            process_msu_on_scene_no_thrombolysis: 30.0,
            process_time_arrival_to_needle: 45.0,
            transfer_time_delay: 60.0,
            process_time_arrival_to_puncture: 90.0,
            process_time_msu_arrival_to_puncture: 60.0,
            save_lsoa_results: false,
            extra: OverrideMap::new(),
        }
    }
}

impl ScenarioConfiguration {
    /// Build a new configuration by applying overrides to `defaults`.
    ///
    /// Overrides are applied in order, so later values for a parameter replace earlier ones.
    /// Parameters which the model does not recognise are kept in [`Self::extra`] and a warning is
    /// issued for each.
    ///
    /// # Arguments
    ///
    /// * `defaults` - The configuration to start from
    /// * `overrides` - Tables of parameter values to override
    pub fn build<'a, I>(defaults: &Self, overrides: I) -> Result<Self>
    where
        I: IntoIterator<Item = &'a OverrideMap>,
    {
        let Value::Table(mut table) =
            Value::try_from(defaults).context("Could not convert scenario to TOML")?
        else {
            unreachable!("Scenario configuration should always be a table")
        };

        for map in overrides {
            apply_overrides(&mut table, map);
        }

        let config: Self = Value::Table(table)
            .try_into()
            .context("Invalid scenario parameter")?;
        for key in config.extra.keys() {
            if !defaults.extra.contains_key(key) {
                warn!("Unknown scenario parameter '{key}' will be ignored by the model");
            }
        }

        config.validate()?;

        Ok(config)
    }

    /// Build a new configuration by applying overrides to the built-in defaults
    pub fn from_overrides<'a, I>(overrides: I) -> Result<Self>
    where
        I: IntoIterator<Item = &'a OverrideMap>,
    {
        Self::build(&Self::default(), overrides)
    }

    /// Names of parameters which are not recognised by the model
    pub fn unknown_keys(&self) -> impl Iterator<Item = &str> {
        self.extra.keys().map(String::as_str)
    }

    /// Check that parameter values are within their valid ranges
    fn validate(&self) -> Result<()> {
        let proportions = [
            ("stroke_mimics", self.stroke_mimics),
            ("prop_nlvo_treated_with_ivt", self.prop_nlvo_treated_with_ivt),
            ("prop_nlvo_treated_with_mt", self.prop_nlvo_treated_with_mt),
            ("prop_lvo_treated_with_ivt", self.prop_lvo_treated_with_ivt),
            ("prop_lvo_treated_with_mt", self.prop_lvo_treated_with_mt),
        ];
        for (name, value) in proportions {
            ensure!(
                (0.0..=1.0).contains(&value),
                "{name} must be between 0 and 1 (got {value})"
            );
        }

        let StrokeTypeProportions { h, nlvo, lvo } = self.stroke_type_proportions;
        ensure!(
            [h, nlvo, lvo].iter().all(|p| p.is_finite() && *p >= 0.0),
            "stroke_type_proportions must be finite, non-negative numbers"
        );

        let durations = [
            ("process_time_call_ambulance", self.process_time_call_ambulance),
            (
                "process_time_ambulance_response",
                self.process_time_ambulance_response,
            ),
            (
                "process_ambulance_on_scene_duration",
                self.process_ambulance_on_scene_duration,
            ),
            ("process_msu_dispatch", self.process_msu_dispatch),
            ("process_msu_thrombolysis", self.process_msu_thrombolysis),
            (
                "process_msu_on_scene_post_thrombolysis",
                self.process_msu_on_scene_post_thrombolysis,
            ),
            (
                "process_msu_on_scene_no_thrombolysis",
                self.process_msu_on_scene_no_thrombolysis,
            ),
            (
                "process_time_arrival_to_needle",
                self.process_time_arrival_to_needle,
            ),
            ("transfer_time_delay", self.transfer_time_delay),
            (
                "process_time_arrival_to_puncture",
                self.process_time_arrival_to_puncture,
            ),
            (
                "process_time_msu_arrival_to_puncture",
                self.process_time_msu_arrival_to_puncture,
            ),
        ];
        for (name, value) in durations {
            ensure!(
                value.is_finite() && value >= 0.0,
                "{name} must be a finite, non-negative number of minutes (got {value})"
            );
        }

        Ok(())
    }
}

/// Replace entries in `table` with those in `overrides`
fn apply_overrides(table: &mut Table, overrides: &OverrideMap) {
    for (key, value) in overrides {
        table.insert(key.clone(), value.clone());
    }
}
