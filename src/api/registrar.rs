use async_trait::async_trait;
use serde_json::Value;

use super::client::ApiResult;
use super::namecheap::ListRequest;

#[async_trait]
pub trait Registrar: Send + Sync {
    /// Fetch the registrar's domain list, converted to a JSON tree
    async fn list_domains(&self, request: &ListRequest) -> ApiResult<Value>;
}
