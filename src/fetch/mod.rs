pub mod cache;
pub mod policy;

use chrono::NaiveDateTime;
use tracing::{info, warn};

use crate::api::{ApiResult, ListRequest, Registrar};
use crate::config::schema::{GET_DOMAINS, LAST_PERFORMED};
use crate::config::{AppConfig, ConfigStore, ConfigValue};
use crate::models::{extract_domains, DomainRecord};

pub use cache::CacheFile;
pub use policy::{choose_source, Source};

/// Serves the domain list from the cache while it is fresh and from the
/// registrar otherwise.
pub struct DomainFetcher<'a, R: Registrar + ?Sized> {
    registrar: &'a R,
    request: ListRequest,
    cache: CacheFile,
    last_performed: NaiveDateTime,
    ttl_seconds: i64,
}

impl<'a, R: Registrar + ?Sized> DomainFetcher<'a, R> {
    pub fn new(registrar: &'a R, config: &AppConfig) -> Self {
        Self {
            registrar,
            request: ListRequest::from_config(config),
            cache: CacheFile::new(&config.get_domains.cache_file),
            last_performed: config.get_domains.last_performed,
            ttl_seconds: config.get_domains.cache_time_seconds,
        }
    }

    pub fn source(&self, now: NaiveDateTime, force_local: bool) -> Source {
        choose_source(
            now,
            self.last_performed,
            self.ttl_seconds,
            force_local,
            self.cache.exists(),
        )
    }

    /// Load the domain list. A live reply is validated before it replaces
    /// the cache, and `lastperformed` only moves once the cache is written.
    pub async fn fetch(
        &self,
        store: &mut ConfigStore,
        now: NaiveDateTime,
        force_local: bool,
    ) -> ApiResult<Vec<DomainRecord>> {
        if let Source::Cache { age } = self.source(now, force_local) {
            info!(
                "Gathering from local cache ({:.1}s / {}s)",
                age.num_milliseconds() as f64 / 1000.0,
                self.ttl_seconds
            );
            match self.cache.read() {
                Ok(response) => return extract_domains(&response),
                Err(e) => warn!("Cache unavailable, fetching from registrar: {:#}", e),
            }
        }

        info!("Gathering from registrar");
        let response = self.registrar.list_domains(&self.request).await?;
        let domains = extract_domains(&response)?;

        if let Err(e) = self.cache.write(&response) {
            warn!(path = %self.cache.path().display(), "Error writing cache: {:#}", e);
            return Ok(domains);
        }

        store.set(GET_DOMAINS, LAST_PERFORMED, ConfigValue::Timestamp(now));
        if let Err(e) = store.save() {
            warn!("Failed to record fetch time: {:#}", e);
        }

        Ok(domains)
    }
}
