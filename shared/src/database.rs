use anyhow::Result;
use sea_orm::{Database, DatabaseConnection};
use sqlx::MySqlPool;
use tracing::info;

pub async fn get_pool(database_url: &str) -> Result<MySqlPool> {
    info!("Connecting to database at: {}", redact(database_url));
    let pool = MySqlPool::connect(database_url).await?;
    Ok(pool)
}

pub async fn get_db_connection(database_url: &str) -> Result<DatabaseConnection> {
    info!("Connecting to database via Sea-ORM at: {}", redact(database_url));
    let db = Database::connect(database_url).await?;
    Ok(db)
}

pub type DbPool = MySqlPool;

/// Strip the password from a connection URL before it is logged.
pub fn redact(database_url: &str) -> String {
    let Some((scheme, rest)) = database_url.split_once("://") else {
        return database_url.to_string();
    };
    match rest.split_once('@') {
        Some((credentials, host)) => {
            let user = credentials.split(':').next().unwrap_or_default();
            format!("{scheme}://{user}:***@{host}")
        }
        None => database_url.to_string(),
    }
}
