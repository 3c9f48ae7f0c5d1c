pub mod domain;

pub use domain::{extract_domains, DomainRecord};
