//! Transport implementations for the credential API

mod http;

pub use http::{router, HttpTransport};
