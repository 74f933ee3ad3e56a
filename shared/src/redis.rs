use anyhow::Result;
use async_trait::async_trait;
use redis::{AsyncCommands, Client};

use crate::error::DataResult;

pub type Redis = Client;

pub fn get_redis_client(redis_url: &str) -> Result<Redis> {
    let client = Client::open(redis_url)?;
    Ok(client)
}

/// String key-value cache with per-entry expiry.
#[async_trait]
pub trait Cache: Send + Sync {
    async fn get(&self, key: &str) -> DataResult<Option<String>>;
    async fn set_ex(&self, key: &str, value: &str, ttl_secs: u64) -> DataResult<()>;
}

/// `Cache` over a redis client. A multiplexed connection is opened per call.
#[derive(Clone)]
pub struct RedisCache {
    client: Redis,
}

impl RedisCache {
    pub fn new(client: Redis) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Cache for RedisCache {
    async fn get(&self, key: &str) -> DataResult<Option<String>> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let value: Option<String> = conn.get(key).await?;
        Ok(value)
    }

    async fn set_ex(&self, key: &str, value: &str, ttl_secs: u64) -> DataResult<()> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let _: () = conn.set_ex(key, value, ttl_secs).await?;
        Ok(())
    }
}
