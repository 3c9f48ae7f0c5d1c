use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("Server error: {status} - {message}")]
    ServerError { status: u16, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Registrar reported an error: {0}")]
    ApiReported(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl ApiError {
    /// True for failures that happened before a usable response arrived.
    pub fn is_network(&self) -> bool {
        matches!(self, ApiError::NetworkError(_) | ApiError::ServerError { .. })
    }
}
