//! `kiln config`: read and write configuration values.

use std::{fs, path::Path};

use toml::{Table, Value};

use crate::{
    cli::{ConfigCommands, GlobalArgs},
    config::{AppConfig, KNOWN_KEYS, unknown_key},
    error::{CliError, CliResult, IntoCli},
    output::OutputManager,
};

pub fn execute(
    cmd: ConfigCommands,
    global: &GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    match cmd {
        ConfigCommands::Get { key } => {
            let value = config.get(&key)?;
            output.print(&value)?;
        }

        ConfigCommands::Set { key, value } => {
            let path = AppConfig::active_path(global.config.as_ref());
            set_value(&path, &key, &value)?;
            output.success(&format!("Set {key} = {value} in {}", path.display()))?;
        }

        ConfigCommands::List => {
            if output.is_json() {
                output.json(&config)?;
            } else {
                let serialised = toml::to_string_pretty(&config)
                    .with_cli_context(|| "failed to serialise config")?;
                output.print(serialised.trim_end())?;
            }
        }

        ConfigCommands::Path => {
            let path = AppConfig::active_path(global.config.as_ref());
            output.print(&path.display().to_string())?;
        }
    }

    Ok(())
}

/// Update one dotted key in the TOML file at `path`, creating it if needed.
///
/// The result must still deserialize as an [`AppConfig`]; otherwise nothing
/// is written.
fn set_value(path: &Path, key: &str, raw: &str) -> CliResult<()> {
    if !KNOWN_KEYS.contains(&key) {
        return Err(unknown_key(key));
    }

    let mut table: Table = if path.exists() {
        let text = fs::read_to_string(path)
            .with_cli_context(|| format!("failed to read '{}'", path.display()))?;
        toml::from_str(&text).with_cli_context(|| format!("'{}' is not valid TOML", path.display()))?
    } else {
        Table::new()
    };

    insert_dotted(&mut table, key, parse_value(raw))?;

    Value::Table(table.clone())
        .try_into::<AppConfig>()
        .with_cli_context(|| format!("invalid value '{raw}' for {key}"))?;

    let text = toml::to_string_pretty(&table).with_cli_context(|| "failed to serialise config")?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_cli_context(|| format!("failed to create '{}'", parent.display()))?;
    }
    fs::write(path, text).with_cli_context(|| format!("failed to write '{}'", path.display()))
}

/// `true`/`false` and integers keep their type; everything else is a string.
fn parse_value(raw: &str) -> Value {
    match raw {
        "true" => Value::Boolean(true),
        "false" => Value::Boolean(false),
        _ => raw
            .parse::<i64>()
            .map(Value::Integer)
            .unwrap_or_else(|_| Value::String(raw.to_owned())),
    }
}

fn insert_dotted(table: &mut Table, key: &str, value: Value) -> CliResult<()> {
    let (section, leaf) = key.split_once('.').ok_or_else(|| unknown_key(key))?;
    let entry = table
        .entry(section.to_owned())
        .or_insert_with(|| Value::Table(Table::new()));
    match entry {
        Value::Table(inner) => {
            inner.insert(leaf.to_owned(), value);
            Ok(())
        }
        _ => Err(CliError::ConfigError {
            message: format!("'{section}' is not a table in the config file"),
            source: None,
        }),
    }
}
