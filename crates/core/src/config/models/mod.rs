pub mod api_observability;
pub mod app_config;
pub mod database;
pub mod network;

// Re-export main types for easier imports
pub use api_observability::{ApiConfig, LogFormat, ObservabilityConfig};
pub use app_config::AppConfig;
pub use database::DatabaseConfig;
pub use network::{ApiNodeConfig, FeeStatsConfig, NetworkIdentityConfig};
