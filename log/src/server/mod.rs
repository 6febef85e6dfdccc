//! HTTP server for the message log.
//!
//! This module exposes the log over a small REST API: `POST /messages`
//! appends, `GET /messages` reads a page, plus metrics and health probes.

mod config;
mod error;
pub mod handlers;
mod http;
pub mod metrics;
mod middleware;
pub mod request;
pub mod response;

pub use config::{CliArgs, MessageLogServerConfig};
pub use error::ApiError;
pub use http::MessageLogServer;
