use anyhow::{Context, Result};
use chrono::NaiveDateTime;

use super::loader::ConfigStore;

pub const APP: &str = "App";
pub const NAMECHEAP: &str = "Namecheap";
pub const CLIENT: &str = "Client";
pub const GET_DOMAINS: &str = "getDomains";

pub const DEBUG: &str = "debug";
pub const USE_LOCAL: &str = "uselocal";
pub const DATETIME_FORMAT: &str = "datetimeformat";
pub const IP_SERVICE: &str = "ipservice";
pub const USERNAME: &str = "username";
pub const API_KEY: &str = "apikey";
pub const IP_ADDR: &str = "ipaddr";
pub const API_DOMAIN: &str = "apidomain";
pub const API_COMMAND: &str = "apicommand";
pub const CACHE_FILE: &str = "cachefile";
pub const CACHE_TIME: &str = "cachetime";
pub const LAST_PERFORMED: &str = "lastperformed";
pub const PAGE: &str = "page";
pub const PAGE_SIZE: &str = "pagesize";
pub const SORT_BY: &str = "sortby";
pub const COL_KEYS: &str = "colKeys";
pub const SKIP_INCOMPLETE: &str = "skipincomplete";

pub const DEFAULT_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
pub const DEFAULT_USERNAME: &str = "NAMECHEAP_USERNAME";
pub const DEFAULT_API_KEY: &str = "NAMECHEAP_API_KEY";
pub const DEFAULT_IP_ADDR: &str = "YOUR_IP_ADDRESSHERE";

/// A typed configuration value. The variant of a schema default decides how
/// the stored cell is parsed and written back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigValue {
    Bool(bool),
    Int(i64),
    Str(String),
    StrList(Vec<String>),
    Timestamp(NaiveDateTime),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Bool,
    Int,
    Str,
    StrList,
    Timestamp,
}

impl ConfigValue {
    pub fn kind(&self) -> ValueKind {
        match self {
            ConfigValue::Bool(_) => ValueKind::Bool,
            ConfigValue::Int(_) => ValueKind::Int,
            ConfigValue::Str(_) => ValueKind::Str,
            ConfigValue::StrList(_) => ValueKind::StrList,
            ConfigValue::Timestamp(_) => ValueKind::Timestamp,
        }
    }

    pub fn str(value: &str) -> Self {
        ConfigValue::Str(value.to_string())
    }
}

impl std::fmt::Display for ValueKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValueKind::Bool => write!(f, "boolean"),
            ValueKind::Int => write!(f, "integer"),
            ValueKind::Str => write!(f, "string"),
            ValueKind::StrList => write!(f, "string list"),
            ValueKind::Timestamp => write!(f, "timestamp"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SchemaEntry {
    pub section: &'static str,
    pub key: &'static str,
    pub default: ConfigValue,
}

impl SchemaEntry {
    fn new(section: &'static str, key: &'static str, default: ConfigValue) -> Self {
        Self {
            section,
            key,
            default,
        }
    }
}

/// Compiled-in defaults, in the order sections and keys are written to a fresh file.
pub fn default_schema() -> Vec<SchemaEntry> {
    vec![
        SchemaEntry::new(APP, DEBUG, ConfigValue::Bool(false)),
        SchemaEntry::new(APP, USE_LOCAL, ConfigValue::Bool(false)),
        SchemaEntry::new(APP, DATETIME_FORMAT, ConfigValue::str(DEFAULT_DATETIME_FORMAT)),
        SchemaEntry::new(APP, IP_SERVICE, ConfigValue::str("https://api.ipify.org")),
        SchemaEntry::new(NAMECHEAP, USERNAME, ConfigValue::str(DEFAULT_USERNAME)),
        SchemaEntry::new(NAMECHEAP, API_KEY, ConfigValue::str(DEFAULT_API_KEY)),
        SchemaEntry::new(CLIENT, IP_ADDR, ConfigValue::str(DEFAULT_IP_ADDR)),
        SchemaEntry::new(GET_DOMAINS, API_DOMAIN, ConfigValue::str("api.namecheap.com")),
        SchemaEntry::new(GET_DOMAINS, API_COMMAND, ConfigValue::str("namecheap.domains.getList")),
        SchemaEntry::new(
            GET_DOMAINS,
            CACHE_FILE,
            ConfigValue::str("./cache/getDomainsResponse.json"),
        ),
        SchemaEntry::new(GET_DOMAINS, CACHE_TIME, ConfigValue::Int(240)),
        SchemaEntry::new(
            GET_DOMAINS,
            LAST_PERFORMED,
            ConfigValue::Timestamp(NaiveDateTime::default()),
        ),
        SchemaEntry::new(GET_DOMAINS, PAGE, ConfigValue::Int(1)),
        SchemaEntry::new(GET_DOMAINS, PAGE_SIZE, ConfigValue::Int(100)), // 0-100
        SchemaEntry::new(GET_DOMAINS, SORT_BY, ConfigValue::str("EXPIREDATE")),
        SchemaEntry::new(
            GET_DOMAINS,
            COL_KEYS,
            ConfigValue::StrList(
                [
                    "@Name",
                    "@Expires",
                    "@IsExpired",
                    "@AutoRenew",
                    "@IsOurDNS",
                    "@WhoisGuard",
                ]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            ),
        ),
        SchemaEntry::new(GET_DOMAINS, SKIP_INCOMPLETE, ConfigValue::Bool(true)),
    ]
}

/// Typed view over a loaded [`ConfigStore`].
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub app: AppSettings,
    pub credentials: Credentials,
    pub client_ip: String,
    pub get_domains: GetDomainsSettings,
}

#[derive(Debug, Clone)]
pub struct AppSettings {
    pub debug: bool,
    pub use_local: bool,
    pub datetime_format: String,
    pub ip_service: String,
}

#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub api_key: String,
}

#[derive(Debug, Clone)]
pub struct GetDomainsSettings {
    pub api_domain: String,
    pub api_command: String,
    pub cache_file: String,
    pub cache_time_seconds: i64,
    pub last_performed: NaiveDateTime,
    pub page: i64,
    pub page_size: i64,
    pub sort_by: String,
    pub col_keys: Vec<String>,
    pub skip_incomplete: bool,
}

impl AppConfig {
    pub fn from_store(store: &ConfigStore) -> Result<Self> {
        Ok(Self {
            app: AppSettings {
                debug: bool_value(store, APP, DEBUG)?,
                use_local: bool_value(store, APP, USE_LOCAL)?,
                datetime_format: str_value(store, APP, DATETIME_FORMAT)?,
                ip_service: str_value(store, APP, IP_SERVICE)?,
            },
            credentials: Credentials {
                username: str_value(store, NAMECHEAP, USERNAME)?,
                api_key: str_value(store, NAMECHEAP, API_KEY)?,
            },
            client_ip: str_value(store, CLIENT, IP_ADDR)?,
            get_domains: GetDomainsSettings {
                api_domain: str_value(store, GET_DOMAINS, API_DOMAIN)?,
                api_command: str_value(store, GET_DOMAINS, API_COMMAND)?,
                cache_file: str_value(store, GET_DOMAINS, CACHE_FILE)?,
                cache_time_seconds: int_value(store, GET_DOMAINS, CACHE_TIME)?,
                last_performed: timestamp_value(store, GET_DOMAINS, LAST_PERFORMED)?,
                page: int_value(store, GET_DOMAINS, PAGE)?,
                page_size: int_value(store, GET_DOMAINS, PAGE_SIZE)?,
                sort_by: str_value(store, GET_DOMAINS, SORT_BY)?,
                col_keys: list_value(store, GET_DOMAINS, COL_KEYS)?,
                skip_incomplete: bool_value(store, GET_DOMAINS, SKIP_INCOMPLETE)?,
            },
        })
    }
}

fn lookup<'a>(store: &'a ConfigStore, section: &str, key: &str) -> Result<&'a ConfigValue> {
    store
        .get(section, key)
        .with_context(|| format!("Missing configuration value: [{}] {}", section, key))
}

fn mismatch(section: &str, key: &str, expected: ValueKind) -> anyhow::Error {
    anyhow::anyhow!(
        "Configuration value [{}] {} is not a {}",
        section,
        key,
        expected
    )
}

fn bool_value(store: &ConfigStore, section: &str, key: &str) -> Result<bool> {
    match lookup(store, section, key)? {
        ConfigValue::Bool(v) => Ok(*v),
        _ => Err(mismatch(section, key, ValueKind::Bool)),
    }
}

fn int_value(store: &ConfigStore, section: &str, key: &str) -> Result<i64> {
    match lookup(store, section, key)? {
        ConfigValue::Int(v) => Ok(*v),
        _ => Err(mismatch(section, key, ValueKind::Int)),
    }
}

fn str_value(store: &ConfigStore, section: &str, key: &str) -> Result<String> {
    match lookup(store, section, key)? {
        ConfigValue::Str(v) => Ok(v.clone()),
        _ => Err(mismatch(section, key, ValueKind::Str)),
    }
}

fn list_value(store: &ConfigStore, section: &str, key: &str) -> Result<Vec<String>> {
    match lookup(store, section, key)? {
        ConfigValue::StrList(v) => Ok(v.clone()),
        _ => Err(mismatch(section, key, ValueKind::StrList)),
    }
}

fn timestamp_value(store: &ConfigStore, section: &str, key: &str) -> Result<NaiveDateTime> {
    match lookup(store, section, key)? {
        ConfigValue::Timestamp(v) => Ok(*v),
        _ => Err(mismatch(section, key, ValueKind::Timestamp)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_schema_has_no_duplicate_keys() {
        let schema = default_schema();
        let unique: HashSet<_> = schema.iter().map(|e| (e.section, e.key)).collect();
        assert_eq!(unique.len(), schema.len());
    }

    #[test]
    fn test_datetime_format_precedes_timestamps() {
        let schema = default_schema();
        let format_pos = schema
            .iter()
            .position(|e| e.section == APP && e.key == DATETIME_FORMAT)
            .unwrap();
        let first_timestamp = schema
            .iter()
            .position(|e| e.default.kind() == ValueKind::Timestamp)
            .unwrap();
        assert!(format_pos < first_timestamp);
    }

    #[test]
    fn test_app_config_from_defaults() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let store = ConfigStore::load(&temp_dir.path().join("c.toml"), &default_schema()).unwrap();
        let config = AppConfig::from_store(&store).unwrap();

        assert_eq!(config.credentials.username, DEFAULT_USERNAME);
        assert_eq!(config.client_ip, DEFAULT_IP_ADDR);
        assert_eq!(config.get_domains.cache_time_seconds, 240);
        assert_eq!(config.get_domains.col_keys.len(), 6);
        assert_eq!(config.get_domains.last_performed, NaiveDateTime::default());
        assert!(config.get_domains.skip_incomplete);
    }
}
