pub mod schema;

use sqlx::MySqlPool;
use sqlx::mysql::MySqlPoolOptions;

use crate::config::AppConfig;

#[derive(Clone)]
pub struct Db {
    pub pool: MySqlPool,
}

impl Db {
    pub async fn connect(cfg: &AppConfig) -> anyhow::Result<Self> {
        let pool = MySqlPoolOptions::new()
            .max_connections(cfg.db_max_open_conns)
            .min_connections(cfg.db_max_idle_conns)
            .max_lifetime(cfg.db_conn_max_lifetime)
            // MySQL rejects isolation changes mid-transaction, so the level
            // is pinned per connection before any transaction begins.
            .after_connect(|conn, _meta| {
                Box::pin(async move {
                    sqlx::query("SET SESSION TRANSACTION ISOLATION LEVEL REPEATABLE READ")
                        .execute(conn)
                        .await?;
                    Ok(())
                })
            })
            .connect(&cfg.database_url())
            .await?;

        Ok(Self { pool })
    }

    pub async fn migrate(&self) -> anyhow::Result<()> {
        schema::migrate(&self.pool).await
    }
}
