use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};
use toml::{Table, Value};
use tracing::{debug, warn};

use super::schema::{
    ConfigValue, SchemaEntry, ValueKind, APP, DATETIME_FORMAT, DEFAULT_DATETIME_FORMAT,
};

/// Key/value configuration with sections, backed by a TOML file.
///
/// The raw document is kept alongside the typed values so sections and keys
/// that no schema entry names survive a save untouched.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
    document: Table,
    values: BTreeMap<String, BTreeMap<String, ConfigValue>>,
    datetime_format: String,
}

impl ConfigStore {
    /// Load `path`, fill in every schema key and write the result back.
    ///
    /// Creates the file when it does not exist. A stored value that cannot be
    /// read as the kind of its default is replaced by the default.
    pub fn load(path: &Path, schema: &[SchemaEntry]) -> Result<Self> {
        let document = read_document(path)?;
        let mut store = Self {
            path: path.to_path_buf(),
            document,
            values: BTreeMap::new(),
            datetime_format: DEFAULT_DATETIME_FORMAT.to_string(),
        };

        // Timestamps decode with the stored datetime format, so they go last.
        let (timestamps, others): (Vec<&SchemaEntry>, Vec<&SchemaEntry>) = schema
            .iter()
            .partition(|entry| entry.default.kind() == ValueKind::Timestamp);

        for entry in others.into_iter().chain(timestamps) {
            let value = match store.stored(entry.section, entry.key) {
                Some(raw) => decode(raw, entry.default.kind(), &store.datetime_format)
                    .unwrap_or_else(|| {
                        warn!(
                            section = entry.section,
                            key = entry.key,
                            "Stored value is not a valid {}, using default",
                            entry.default.kind()
                        );
                        entry.default.clone()
                    }),
                None => {
                    debug!(section = entry.section, key = entry.key, "Adding default value");
                    entry.default.clone()
                }
            };
            store.set(entry.section, entry.key, value);
        }

        store.save()?;
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get(&self, section: &str, key: &str) -> Option<&ConfigValue> {
        self.values.get(section)?.get(key)
    }

    /// Update a value in memory. Call [`ConfigStore::save`] to persist it.
    pub fn set(&mut self, section: &str, key: &str, value: ConfigValue) {
        if section == APP && key == DATETIME_FORMAT {
            if let ConfigValue::Str(format) = &value {
                self.datetime_format = format.clone();
            }
        }

        let encoded = encode(&value, &self.datetime_format);
        let slot = self
            .document
            .entry(section.to_string())
            .or_insert_with(|| Value::Table(Table::new()));
        if !slot.is_table() {
            warn!(section, "Replacing non-table value with a section");
            *slot = Value::Table(Table::new());
        }
        if let Value::Table(table) = slot {
            table.insert(key.to_string(), encoded);
        }

        self.values
            .entry(section.to_string())
            .or_default()
            .insert(key.to_string(), value);
    }

    /// Write the document back to disk
    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let content =
            toml::to_string_pretty(&self.document).context("Failed to serialize config to TOML")?;

        fs::write(&self.path, content)
            .with_context(|| format!("Failed to write config file: {}", self.path.display()))?;

        Ok(())
    }

    fn stored(&self, section: &str, key: &str) -> Option<&Value> {
        self.document.get(section)?.as_table()?.get(key)
    }
}

fn read_document(path: &Path) -> Result<Table> {
    if !path.exists() {
        return Ok(Table::new());
    }

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

fn decode(raw: &Value, kind: ValueKind, datetime_format: &str) -> Option<ConfigValue> {
    match (kind, raw) {
        (ValueKind::Bool, Value::Boolean(b)) => Some(ConfigValue::Bool(*b)),
        (ValueKind::Bool, Value::String(s)) => parse_bool(s).map(ConfigValue::Bool),
        (ValueKind::Int, Value::Integer(i)) => Some(ConfigValue::Int(*i)),
        (ValueKind::Int, Value::String(s)) => s.trim().parse().ok().map(ConfigValue::Int),
        (ValueKind::Str, Value::String(s)) => Some(ConfigValue::Str(unescape_percent(s))),
        (ValueKind::Str, Value::Integer(i)) => Some(ConfigValue::Str(i.to_string())),
        (ValueKind::Str, Value::Boolean(b)) => Some(ConfigValue::Str(b.to_string())),
        (ValueKind::StrList, Value::Array(items)) => items
            .iter()
            .map(|item| item.as_str().map(str::to_string))
            .collect::<Option<Vec<_>>>()
            .map(ConfigValue::StrList),
        // Older files kept lists as JSON inside a string cell
        (ValueKind::StrList, Value::String(s)) => serde_json::from_str::<Vec<String>>(s)
            .ok()
            .map(ConfigValue::StrList),
        (ValueKind::Timestamp, Value::String(s)) => {
            NaiveDateTime::parse_from_str(s.trim(), datetime_format)
                .ok()
                .map(ConfigValue::Timestamp)
        }
        _ => None,
    }
}

fn encode(value: &ConfigValue, datetime_format: &str) -> Value {
    match value {
        ConfigValue::Bool(b) => Value::Boolean(*b),
        ConfigValue::Int(i) => Value::Integer(*i),
        ConfigValue::Str(s) => Value::String(escape_percent(s)),
        ConfigValue::StrList(items) => {
            Value::Array(items.iter().cloned().map(Value::String).collect())
        }
        ConfigValue::Timestamp(ts) => Value::String(format_timestamp(ts, datetime_format)),
    }
}

/// Format with `format`, falling back to the default pattern when `format`
/// holds specifiers chrono cannot render.
pub fn format_timestamp(ts: &NaiveDateTime, format: &str) -> String {
    let mut out = String::new();
    if write!(out, "{}", ts.format(format)).is_ok() {
        return out;
    }
    warn!(format, "Invalid datetime format, using default");
    ts.format(DEFAULT_DATETIME_FORMAT).to_string()
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.trim().to_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Some(true),
        "false" | "no" | "off" | "0" => Some(false),
        _ => None,
    }
}

pub fn escape_percent(s: &str) -> String {
    s.replace('%', "%%")
}

pub fn unescape_percent(s: &str) -> String {
    s.replace("%%", "%")
}
