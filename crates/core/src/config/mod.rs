//! Application configuration
//!
//! Configuration is assembled by the `config` crate from built-in defaults, an
//! optional TOML file and `CHAINREST__*` environment overrides, then validated.

pub mod models;

pub use models::*;
