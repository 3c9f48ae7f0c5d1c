use async_trait::async_trait;
use reqwest::Url;
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::AppConfig;

use super::client::{ApiClient, ApiResult};
use super::error::ApiError;
use super::registrar::Registrar;
use super::xml::xml_to_value;

/// Parameters of a `domains.getList` call.
#[derive(Debug, Clone)]
pub struct ListRequest {
    pub api_domain: String,
    pub command: String,
    pub username: String,
    pub api_key: String,
    pub client_ip: String,
    pub page: i64,
    pub page_size: i64,
    pub sort_by: String,
}

impl ListRequest {
    pub fn from_config(config: &AppConfig) -> Self {
        let settings = &config.get_domains;
        Self {
            api_domain: settings.api_domain.clone(),
            command: settings.api_command.clone(),
            username: config.credentials.username.clone(),
            api_key: config.credentials.api_key.clone(),
            client_ip: config.client_ip.clone(),
            page: settings.page,
            page_size: settings.page_size,
            sort_by: settings.sort_by.clone(),
        }
    }

    fn validate(&self) -> ApiResult<()> {
        let required = [
            ("api command", &self.command),
            ("api key", &self.api_key),
            ("api client ip", &self.client_ip),
            ("api username", &self.username),
            ("api domain", &self.api_domain),
        ];

        let missing: Vec<&str> = required
            .iter()
            .filter(|(_, value)| value.trim().is_empty())
            .map(|(name, _)| *name)
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            for name in &missing {
                warn!("Missing {}", name);
            }
            Err(ApiError::InvalidRequest(format!(
                "missing {}",
                missing.join(", ")
            )))
        }
    }

    /// Build `{base}/xml.response?...`; `base` defaults to `https://{api_domain}`.
    pub fn url(&self, base: Option<&str>) -> ApiResult<Url> {
        self.validate()?;
        self.build_url(base, &self.api_key)
    }

    /// Same URL with the API key masked, for logging.
    pub fn redacted_url(&self, base: Option<&str>) -> ApiResult<Url> {
        self.build_url(base, "***")
    }

    fn build_url(&self, base: Option<&str>, api_key: &str) -> ApiResult<Url> {
        let base = match base {
            Some(base) => base.trim_end_matches('/').to_string(),
            None => format!("https://{}", self.api_domain),
        };
        let page = self.page.to_string();
        let page_size = self.page_size.to_string();

        Url::parse_with_params(
            &format!("{}/xml.response", base),
            &[
                ("ApiUser", self.username.as_str()),
                ("ApiKey", api_key),
                ("UserName", self.username.as_str()),
                ("Command", self.command.as_str()),
                ("ClientIp", self.client_ip.as_str()),
                ("Page", page.as_str()),
                ("PageSize", page_size.as_str()),
                ("SortBy", self.sort_by.as_str()),
            ],
        )
        .map_err(|e| ApiError::InvalidRequest(format!("Invalid API URL: {}", e)))
    }
}

#[derive(Clone)]
pub struct NamecheapClient {
    client: ApiClient,
    base_url: Option<String>,
}

impl NamecheapClient {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            base_url: None,
        }
    }

    /// Send requests to `base_url` instead of `https://{api_domain}`.
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = Some(base_url.to_string());
        self
    }
}

#[async_trait]
impl Registrar for NamecheapClient {
    async fn list_domains(&self, request: &ListRequest) -> ApiResult<Value> {
        let url = request.url(self.base_url.as_deref())?;
        if let Ok(redacted) = request.redacted_url(self.base_url.as_deref()) {
            debug!(url = %redacted, "Requesting domain list");
        }

        let body = self.client.get_text(url).await?;
        xml_to_value(&body)
    }
}
