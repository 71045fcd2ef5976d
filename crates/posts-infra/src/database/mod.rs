//! Database connection management and post storage.

mod connections;
mod memory;

#[cfg(feature = "postgres")]
mod executor;
#[cfg(feature = "postgres")]
pub mod postgres_repo;
#[cfg(feature = "postgres")]
pub mod update;

pub use connections::{DatabaseConfig, InvalidSslMode, SslMode};
pub use memory::InMemoryPostRepository;

#[cfg(feature = "postgres")]
pub use connections::DatabasePool;
#[cfg(feature = "postgres")]
pub use executor::QueryExecutor;
#[cfg(feature = "postgres")]
pub use postgres_repo::PostgresPostRepository;
