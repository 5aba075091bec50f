//! Code for loading program settings.
use crate::get_stroke_pathway_config_dir;
use crate::input::read_toml;
use crate::log::DEFAULT_LOG_LEVEL;
use anyhow::{Context, Result};
use documented::DocumentedFields;
use serde::{Deserialize, Serialize};
use std::fmt::Write;
use std::path::{Path, PathBuf};

const SETTINGS_FILE_NAME: &str = "settings.toml";

const DEFAULT_SETTINGS_FILE_HEADER: &str = "# Program settings for stroke_pathway
# Uncomment a line to change the setting from its default value.
";

/// Default log level for program
fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

/// Get the path to where the settings file will be read from
pub fn get_settings_file_path() -> PathBuf {
    let mut path = get_stroke_pathway_config_dir();
    path.push(SETTINGS_FILE_NAME);

    path
}

/// Program settings from config file
#[derive(Debug, DocumentedFields, Serialize, Deserialize, PartialEq)]
pub struct Settings {
    /// The default program log level
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Whether to overwrite output files by default
    #[serde(default)]
    pub overwrite: bool,
    /// Whether to write the individual assignment tables to CSV files
    #[serde(default)]
    pub debug_model: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            overwrite: false,
            debug_model: false,
        }
    }
}

impl Settings {
    /// Read the program settings file.
    ///
    /// If the file is not present, default values for settings will be used
    ///
    /// # Returns
    ///
    /// The program settings as a `Settings` struct or an error if the file is invalid
    pub fn load() -> Result<Settings> {
        Self::load_from_path(&get_settings_file_path())
    }

    /// Read settings from the specified path, falling back to defaults if there is no file
    fn load_from_path(file_path: &Path) -> Result<Settings> {
        if !file_path.is_file() {
            return Ok(Settings::default());
        }

        read_toml(file_path)
    }

    /// The contents of the default settings file, with every setting commented out
    pub fn default_file_contents() -> Result<String> {
        let settings_raw =
            toml::to_string(&Settings::default()).context("Could not convert settings to TOML")?;

        let mut out = DEFAULT_SETTINGS_FILE_HEADER.to_string();
        for line in settings_raw.lines() {
            let Some((field, _)) = line.split_once('=') else {
                continue;
            };

            let docs = Settings::get_field_docs(field.trim())
                .with_context(|| format!("Missing doc comment for field {}", field.trim()))?;
            for doc_line in docs.lines() {
                write!(&mut out, "\n# # {}\n", doc_line.trim())?;
            }
            writeln!(&mut out, "# {}", line.trim())?;
        }

        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn test_settings_load_from_path_no_file() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join(SETTINGS_FILE_NAME); // NB: doesn't exist
        assert_eq!(
            Settings::load_from_path(&file_path).unwrap(),
            Settings::default()
        );
    }

    #[test]
    fn test_settings_load_from_path() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join(SETTINGS_FILE_NAME);

        {
            let mut file = File::create(&file_path).unwrap();
            writeln!(file, "log_level = \"warn\"\ndebug_model = true").unwrap();
        }

        assert_eq!(
            Settings::load_from_path(&file_path).unwrap(),
            Settings {
                log_level: "warn".to_string(),
                debug_model: true,
                overwrite: false
            }
        );
    }

    #[test]
    fn test_settings_from_empty_file() {
        let settings: Settings = toml::from_str("").unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_default_file_contents() {
        let contents = Settings::default_file_contents().unwrap();
        assert!(contents.starts_with(DEFAULT_SETTINGS_FILE_HEADER));
        assert!(contents.contains("# # The default program log level\n# log_level = \"info\""));
        assert!(contents.contains("# overwrite = false"));

        // Uncommenting the settings gives the defaults back
        let uncommented: String = contents
            .lines()
            .filter(|line| !line.starts_with("# #"))
            .filter_map(|line| line.strip_prefix("# "))
            .filter(|line| line.contains('='))
            .map(|line| format!("{line}\n"))
            .collect();
        let settings: Settings = toml::from_str(&uncommented).unwrap();
        assert_eq!(settings, Settings::default());
    }
}
