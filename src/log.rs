//! Initialisation and configuration of the program logger.
//!
//! Messages below warning level go to stdout and warnings and errors go to stderr, with colours if
//! the stream is a terminal. When running a model, the same messages are also written to log files
//! in the output folder.
use anyhow::{Context, Result, bail};
use chrono::Local;
use fern::colors::{Color, ColoredLevelConfig};
use fern::{Dispatch, FormatCallback};
use log::{LevelFilter, Record};
use std::env;
use std::fmt::{Arguments, Display};
use std::fs::{File, OpenOptions};
use std::io::IsTerminal;
use std::path::Path;
use std::sync::OnceLock;

/// A flag indicating whether the logger has been initialised
static LOGGER_INIT: OnceLock<()> = OnceLock::new();

/// The environment variable which overrides the log level set in the settings file
pub const LOG_LEVEL_ENV_VAR: &str = "STROKE_PATHWAY_LOG_LEVEL";

/// The default log level for the program.
///
/// Used if the user hasn't given a level in the settings file or with [`LOG_LEVEL_ENV_VAR`].
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Log file for ordinary progress messages
const LOG_INFO_FILE_NAME: &str = "stroke_pathway_info.log";

/// Log file for warnings and errors
const LOG_ERROR_FILE_NAME: &str = "stroke_pathway_error.log";

/// Whether the program logger has been initialised
pub fn is_logger_initialised() -> bool {
    LOGGER_INIT.get().is_some()
}

/// Convert a log level name (case-insensitive) to a [`LevelFilter`]
fn parse_log_level(level: &str) -> Result<LevelFilter> {
    Ok(match level.to_lowercase().as_str() {
        "off" => LevelFilter::Off,
        "error" => LevelFilter::Error,
        "warn" => LevelFilter::Warn,
        "info" => LevelFilter::Info,
        "debug" => LevelFilter::Debug,
        "trace" => LevelFilter::Trace,
        unknown => bail!("Unknown log level: {unknown}"),
    })
}

/// Create (or truncate) a log file in `dir`
fn create_log_file(dir: &Path, file_name: &str) -> Result<File> {
    let file_path = dir.join(file_name);
    OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(&file_path)
        .with_context(|| format!("Could not create log file {}", file_path.display()))
}

/// Initialise the program logger.
///
/// The log level is taken from the [`LOG_LEVEL_ENV_VAR`] environment variable if it is set,
/// otherwise from `log_level_from_settings`. Valid levels are `off`, `error`, `warn`, `info`,
/// `debug` and `trace`.
///
/// # Arguments
///
/// * `log_level_from_settings` - The log level specified in `settings.toml`
/// * `log_file_dir` - Where to save log files (if `None`, no log files are written)
pub fn init(log_level_from_settings: &str, log_file_dir: Option<&Path>) -> Result<()> {
    let log_level = match env::var(LOG_LEVEL_ENV_VAR) {
        Ok(level) => parse_log_level(&level)
            .with_context(|| format!("Invalid value for {LOG_LEVEL_ENV_VAR}"))?,
        Err(_) => parse_log_level(log_level_from_settings)?,
    };

    let colours = ColoredLevelConfig::new()
        .error(Color::Red)
        .warn(Color::Yellow)
        .info(Color::Green)
        .debug(Color::Blue)
        .trace(Color::Magenta);
    let use_colour_stdout = std::io::stdout().is_terminal();
    let use_colour_stderr = std::io::stderr().is_terminal();

    let mut dispatch = Dispatch::new()
        .chain(
            Dispatch::new()
                .filter(|metadata| metadata.level() > LevelFilter::Warn)
                .format(move |out, message, record| {
                    write_log_colour(out, message, record, use_colour_stdout, &colours);
                })
                .level(log_level)
                .chain(std::io::stdout()),
        )
        .chain(
            Dispatch::new()
                .format(move |out, message, record| {
                    write_log_colour(out, message, record, use_colour_stderr, &colours);
                })
                .level(log_level.min(LevelFilter::Warn))
                .chain(std::io::stderr()),
        );

    if let Some(dir) = log_file_dir {
        // The info log always records progress, even if the console is quieter
        dispatch = dispatch
            .chain(
                Dispatch::new()
                    .filter(|metadata| metadata.level() > LevelFilter::Warn)
                    .format(write_log_plain)
                    .level(log_level.max(LevelFilter::Info))
                    .chain(create_log_file(dir, LOG_INFO_FILE_NAME)?),
            )
            .chain(
                Dispatch::new()
                    .format(write_log_plain)
                    .level(LevelFilter::Warn)
                    .chain(create_log_file(dir, LOG_ERROR_FILE_NAME)?),
            );
    }

    dispatch.apply().context("Logger already initialised")?;
    LOGGER_INIT.get_or_init(|| ());

    Ok(())
}

/// Write a log message with a timestamp, level and target
fn write_log<T: Display>(out: FormatCallback, level: T, target: &str, message: &Arguments) {
    let timestamp = Local::now().format("%H:%M:%S");

    out.finish(format_args!("[{timestamp} {level} {target}] {message}"));
}

/// Write to the log with no colours
fn write_log_plain(out: FormatCallback, message: &Arguments, record: &Record) {
    write_log(out, record.level(), record.target(), message);
}

/// Write to the log, colouring the level if `use_colour` is set
fn write_log_colour(
    out: FormatCallback,
    message: &Arguments,
    record: &Record,
    use_colour: bool,
    colours: &ColoredLevelConfig,
) {
    if use_colour {
        write_log(out, colours.color(record.level()), record.target(), message);
    } else {
        write_log_plain(out, message, record);
    }
}
