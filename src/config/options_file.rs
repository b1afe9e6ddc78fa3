use std::fs;
use std::path::Path;

use chrono::format::{Item, StrftimeItems};
use clap::ValueEnum;
use saphyr::{LoadableYamlNode, Scalar, Yaml};
use snafu::prelude::*;
use tracing::debug;

use crate::config::{Options, parse_choice};
use crate::ext::BestEffortPathExt;
use crate::filesystem::{ItemFilter, NameKey};

/// Reads an options file, starting from the defaults.
pub fn read_options_file(path: &Path) -> Result<Options, ConfigError> {
    debug!("Opening options file: {}", path.best_effort_path_display());
    let contents = fs::read_to_string(path).context(ReadSnafu {
        file_path: path.best_effort_path_display(),
    })?;
    debug!("Successfully read options file: {} bytes", contents.len());

    let mut options = Options::default();
    apply_yaml(&mut options, &contents)?;
    Ok(options)
}

/// Overlays the keys of a YAML mapping onto `options`.
///
/// Keys use the option field names; enum values accept the same spellings
/// as the command line.
pub fn apply_yaml(options: &mut Options, contents: &str) -> Result<(), ConfigError> {
    let documents = Yaml::load_from_str(contents).map_err(|e| ConfigError::ParseError { source: e })?;
    let Some(document) = documents.first() else {
        // an empty file keeps every default
        return Ok(());
    };
    let mapping = document.as_mapping().ok_or(ConfigError::TopLevelNotMap)?;

    for (key, value) in mapping.iter() {
        let Yaml::Value(Scalar::String(key)) = key else {
            return MalformedConfigSnafu.fail();
        };
        apply_option(options, key, value)?;
    }
    validate_date_format(&options.date_format)
}

fn apply_option(options: &mut Options, key: &str, value: &Yaml) -> Result<(), ConfigError> {
    match key {
        "rel_to_cwd" => options.rel_to_cwd = boolean(key, value)?,
        "append" => options.append = boolean(key, value)?,
        "header" => options.header = string(key, value)?,
        "footer" => options.footer = string(key, value)?,

        "file_format" => options.file_format = Some(string(key, value)?),
        "dir_format" => options.dir_format = Some(string(key, value)?),
        "dir_close_format" => options.dir_close_format = Some(string(key, value)?),
        "root_format" => options.root_format = Some(string(key, value)?),
        "ellipsis_format" => options.ellipsis_format = Some(string(key, value)?),

        "format_type" => options.format_type = choice(key, value)?,
        "start_level" => options.start_level = integer(key, value)?,
        "max_depth" => options.max_depth = integer(key, value)?,
        "show_indent" => options.show_indent = boolean(key, value)?,
        "indent" => options.indent = string(key, value)?,
        "newline" => options.newline = string(key, value)?,
        "properties" => options.properties = strings(key, value)?,

        "show_folders" => options.show_folders = boolean(key, value)?,
        "show_files" => options.show_files = boolean(key, value)?,
        "exclude" => options.filter = Some(ItemFilter::names(strings(key, value)?)),
        "filter_hidden" => options.filter_hidden = boolean(key, value)?,
        "item_grouping" => options.item_grouping = choice(key, value)?,
        "ignore_case" => {
            options.sort_key = boolean(key, value)?.then(NameKey::case_insensitive);
        }

        "name_type" => options.name_type = choice(key, value)?,
        "root_name_type" => options.root_name_type = choice(key, value)?,
        "show_size" => options.show_size = boolean(key, value)?,
        "show_date" => options.show_date = boolean(key, value)?,
        "date_type" => options.date_type = choice(key, value)?,
        "date_format" => options.date_format = string(key, value)?,
        "show_hash" => options.show_hash = boolean(key, value)?,
        "show_ellipsis" => options.show_ellipsis = boolean(key, value)?,
        "ellipsis" => options.ellipsis = string(key, value)?,
        "show_hidden" => options.show_hidden = boolean(key, value)?,
        "hidden" => options.hidden = string(key, value)?,
        _ => {
            return UnknownOptionSnafu { key }.fail();
        }
    }
    Ok(())
}

fn invalid(key: &str, expected: &str) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        expected: expected.to_string(),
    }
}

fn boolean(key: &str, value: &Yaml) -> Result<bool, ConfigError> {
    match value {
        Yaml::Value(Scalar::Boolean(flag)) => Ok(*flag),
        _ => Err(invalid(key, "a boolean")),
    }
}

fn integer(key: &str, value: &Yaml) -> Result<usize, ConfigError> {
    match value {
        Yaml::Value(Scalar::Integer(number)) => {
            usize::try_from(*number).map_err(|_| invalid(key, "a non-negative integer"))
        }
        _ => Err(invalid(key, "a non-negative integer")),
    }
}

fn string(key: &str, value: &Yaml) -> Result<String, ConfigError> {
    match value {
        Yaml::Value(Scalar::String(text)) => Ok(text.to_string()),
        Yaml::Value(Scalar::Null) => Ok(String::new()),
        _ => Err(invalid(key, "a string")),
    }
}

fn strings(key: &str, value: &Yaml) -> Result<Vec<String>, ConfigError> {
    match value {
        Yaml::Sequence(items) => items.iter().map(|item| string(key, item)).collect(),
        _ => Err(invalid(key, "a list of strings")),
    }
}

fn choice<E: ValueEnum>(key: &str, value: &Yaml) -> Result<E, ConfigError> {
    let text = string(key, value)?;
    parse_choice(&text).ok_or_else(|| {
        let choices = E::value_variants()
            .iter()
            .filter_map(|variant| variant.to_possible_value())
            .map(|possible| possible.get_name().to_string())
            .collect::<Vec<_>>()
            .join(", ");
        invalid(key, &format!("one of: {choices}"))
    })
}

/// Rejects strftime patterns that would fail when rendering dates.
pub fn validate_date_format(date_format: &str) -> Result<(), ConfigError> {
    if StrftimeItems::new(date_format).any(|item| matches!(item, Item::Error)) {
        return InvalidDateFormatSnafu { date_format }.fail();
    }
    Ok(())
}

#[derive(Debug, Snafu)]
pub enum ConfigError {
    #[snafu(display("Failed to read the options file: {}", file_path))]
    ReadError {
        file_path: String,
        source: std::io::Error,
    },
    #[snafu(display("Failed to parse the options file"))]
    ParseError { source: saphyr::ScanError },
    #[snafu(display("Option keys must be plain strings"))]
    MalformedConfig,
    #[snafu(display("Top level of the options file should be a map"))]
    TopLevelNotMap,
    #[snafu(display("Unknown option '{}'", key))]
    UnknownOption { key: String },
    #[snafu(display("Option '{}' should be {}", key, expected))]
    InvalidValue { key: String, expected: String },
    #[snafu(display("Invalid date format '{}'", date_format))]
    InvalidDateFormat { date_format: String },
}
