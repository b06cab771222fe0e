//! Mock HTTP API serving the generated dataset and posted ads

pub mod config;
pub mod error;
pub mod routes;
pub mod server;

pub use config::{build_config, CliArgs, ConfigError, ServerConfig};
pub use error::{ApiError, ErrorBody};
pub use routes::{build_router, AppState, Dataset};
pub use server::Server;
