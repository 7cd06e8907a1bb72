pub mod accounts;
pub mod error;
pub mod profiles;

pub use accounts::{AccountStore, ResetToken, User};
pub use error::{Result, StoreError};
pub use profiles::{DirectoryFilter, DirectoryPage, ProfileStore, RehostCandidate};

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

/// Connect to Postgres and run the embedded migrations.
pub async fn connect(database_url: &str) -> Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    Ok(pool)
}
