use tracing::{debug, warn};

use super::client::ApiClient;

/// Looks up the caller's public address through an IP-echo service.
#[derive(Clone)]
pub struct PublicIpResolver {
    client: ApiClient,
    endpoint: String,
}

impl PublicIpResolver {
    pub fn new(client: ApiClient, endpoint: &str) -> Self {
        Self {
            client,
            endpoint: endpoint.to_string(),
        }
    }

    /// Returns `None` on any failure. The result is only ever a suggestion
    /// for the whitelisted client IP.
    pub async fn resolve(&self) -> Option<String> {
        let url = match reqwest::Url::parse(&self.endpoint) {
            Ok(url) => url,
            Err(e) => {
                warn!(endpoint = %self.endpoint, "Invalid IP service URL: {}", e);
                return None;
            }
        };

        match self.client.get_text(url).await {
            Ok(body) => {
                let ip = body.trim();
                if ip.is_empty() {
                    warn!(endpoint = %self.endpoint, "IP service returned an empty body");
                    return None;
                }
                debug!(ip, "Resolved public IP");
                Some(ip.to_string())
            }
            Err(e) => {
                warn!(endpoint = %self.endpoint, "Failed to resolve public IP: {}", e);
                None
            }
        }
    }
}
