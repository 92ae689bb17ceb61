//! # passop-server
//!
//! HTTP JSON API for the PassOP password manager. Passwords are
//! encrypted before they reach the document store and decrypted on
//! every listing.

pub mod cli;
pub mod response;
mod server;
pub mod transport;

pub use cli::Args;
pub use response::{ApiError, ApiResponse};
pub use server::PassopServer;
pub use transport::{router, HttpTransport};
