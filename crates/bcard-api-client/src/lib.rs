mod client;
mod error;
mod headers;
mod routes;

pub mod jwt;
pub mod request;
pub mod response;
pub mod types;

pub use client::{BcardApi, BcardApiClient, DEFAULT_API_URL};
pub use error::BcardApiError;
pub use jwt::{decode_claims, Claims};
