//! HTTP server for the network administration API.
//!
//! Exposes the VLAN record store over REST. Handlers decode requests, run
//! the admission rules, call the store, and map failures to status codes;
//! all consistency guarantees live in `netadmin-vlan`.

pub mod config;
pub mod error;
pub mod handler;
pub mod router;
pub mod server;

pub use config::ServerConfig;
pub use error::{ApiError, ErrorResponse, ServerError, ServerResult};
pub use handler::{AppState, HealthResponse};
pub use server::{shutdown_signal, NetAdminServer};
