pub mod client;
pub mod error;
pub mod namecheap;
pub mod public_ip;
pub mod registrar;
pub mod xml;

pub use client::{ApiClient, ApiResult};
pub use error::ApiError;
pub use namecheap::{ListRequest, NamecheapClient};
pub use public_ip::PublicIpResolver;
pub use registrar::Registrar;
