pub mod sqlite_block_repository;

pub use sqlite_block_repository::SqliteBlockRepository;
