pub mod health;
pub mod network;
