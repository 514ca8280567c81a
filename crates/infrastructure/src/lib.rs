pub mod database;
pub mod file_cache;
pub mod in_memory_blocks;
pub mod services;

pub use database::*;
pub use file_cache::{FileCache, FileCacheError};
pub use in_memory_blocks::InMemoryBlockRepository;
pub use services::NetworkService;
