use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::api::{ApiError, ApiResult};

/// One `<Domain>` entry as the registrar sent it, keyed by attribute name
/// (`@Name`, `@Expires`, `@AutoRenew`, ...).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DomainRecord {
    fields: Map<String, Value>,
}

impl DomainRecord {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self { fields }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    /// Field value when present and textual
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).and_then(Value::as_str)
    }

    pub fn name(&self) -> Option<&str> {
        self.get("@Name")
    }
}

/// Status reported in `ApiResponse/@Status`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiStatus {
    Ok,
    Error,
    Other(String),
}

impl std::str::FromStr for ApiStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "OK" => Ok(ApiStatus::Ok),
            "ERROR" => Ok(ApiStatus::Error),
            "" => Err("Empty API status".to_string()),
            other => Ok(ApiStatus::Other(other.to_string())),
        }
    }
}

/// Validate a converted `domains.getList` reply and pull out its domains.
///
/// The list lives at `ApiResponse/CommandResponse/DomainGetListResult/Domain`.
/// A lone `<Domain>` converts to an object rather than a list and is wrapped.
pub fn extract_domains(response: &Value) -> ApiResult<Vec<DomainRecord>> {
    let api = response
        .get("ApiResponse")
        .and_then(Value::as_object)
        .ok_or_else(|| invalid("missing ApiResponse"))?;

    let status: ApiStatus = api
        .get("@Status")
        .and_then(Value::as_str)
        .ok_or_else(|| invalid("missing API status"))?
        .parse()
        .map_err(ApiError::InvalidResponse)?;

    if status == ApiStatus::Error {
        let payload = serde_json::to_string(api).unwrap_or_else(|_| format!("{:?}", api));
        return Err(ApiError::ApiReported(payload));
    }

    let command = api
        .get("CommandResponse")
        .and_then(Value::as_object)
        .ok_or_else(|| invalid("missing CommandResponse"))?;

    let result = match command.get("DomainGetListResult") {
        Some(Value::Object(result)) => result,
        Some(Value::Null) => return Ok(Vec::new()),
        _ => return Err(invalid("missing DomainGetListResult")),
    };

    match result.get("Domain") {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Object(domain)) => Ok(vec![DomainRecord::new(domain.clone())]),
        Some(Value::Array(domains)) => domains
            .iter()
            .map(|domain| {
                domain
                    .as_object()
                    .map(|fields| DomainRecord::new(fields.clone()))
                    .ok_or_else(|| invalid("Domain entry is not an element with attributes"))
            })
            .collect(),
        Some(_) => Err(invalid("Domain entry is not an element with attributes")),
    }
}

fn invalid(message: &str) -> ApiError {
    ApiError::InvalidResponse(message.to_string())
}
