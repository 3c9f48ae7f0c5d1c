pub mod loader;
pub mod schema;

pub use loader::ConfigStore;
pub use schema::{default_schema, AppConfig, ConfigValue};
