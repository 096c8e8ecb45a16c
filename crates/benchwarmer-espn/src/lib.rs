// ESPN fantasy football API v3: HTTP client and payload conversion.

pub mod client;
pub mod convert;
pub mod error;
pub mod mapping;
pub mod types;

pub use client::EspnClient;
pub use error::EspnError;
