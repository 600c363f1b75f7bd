pub mod client;
pub mod error;
pub mod poller;

pub use client::{AdminToken, ApiClient};
pub use error::ClientError;
