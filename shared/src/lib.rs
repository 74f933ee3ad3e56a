pub mod config;
pub mod data;
pub mod database;
pub mod entity;
pub mod error;
pub mod models;
pub mod redis;
pub mod time;

pub use config::{CacheTtls, Config, ConfigError};
pub use data::{DataSource, DbRepo, MySqlPriceStore, PriceStore, SnapshotLoader};
pub use database::{get_db_connection, get_pool, DbPool};
pub use error::{DataError, DataResult};
pub use models::*;
pub use redis::{get_redis_client, Cache, Redis, RedisCache};
