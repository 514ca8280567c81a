pub mod network_service;

pub use network_service::NetworkService;
