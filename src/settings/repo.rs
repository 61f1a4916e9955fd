use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::PgPool;

#[async_trait]
pub trait SettingRepo: Send + Sync {
    /// Stored value; a NULL value counts as missing.
    async fn get(&self, key: &str) -> anyhow::Result<Option<String>>;
    async fn put(&self, key: &str, value: &str) -> anyhow::Result<()>;
    /// Upserts every pair in one transaction.
    async fn put_many(&self, pairs: &[(&str, String)]) -> anyhow::Result<()>;
    async fn all(&self) -> anyhow::Result<HashMap<String, String>>;
}

#[derive(Clone)]
pub struct PgSettingRepo {
    db: PgPool,
}

impl PgSettingRepo {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

const UPSERT: &str = r#"
    INSERT INTO settings (key, value)
    VALUES ($1, $2)
    ON CONFLICT (key) DO UPDATE SET value = EXCLUDED.value
"#;

#[async_trait]
impl SettingRepo for PgSettingRepo {
    async fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        let value: Option<Option<String>> =
            sqlx::query_scalar(r#"SELECT value FROM settings WHERE key = $1"#)
                .bind(key)
                .fetch_optional(&self.db)
                .await?;
        Ok(value.flatten())
    }

    async fn put(&self, key: &str, value: &str) -> anyhow::Result<()> {
        sqlx::query(UPSERT)
            .bind(key)
            .bind(value)
            .execute(&self.db)
            .await?;
        Ok(())
    }

    async fn put_many(&self, pairs: &[(&str, String)]) -> anyhow::Result<()> {
        let mut tx = self.db.begin().await?;
        for (key, value) in pairs {
            sqlx::query(UPSERT)
                .bind(*key)
                .bind(value)
                .execute(&mut *tx)
                .await?;
        }
        tx.commit().await?;
        Ok(())
    }

    async fn all(&self) -> anyhow::Result<HashMap<String, String>> {
        let rows: Vec<(String, Option<String>)> =
            sqlx::query_as(r#"SELECT key, value FROM settings"#)
                .fetch_all(&self.db)
                .await?;
        Ok(rows
            .into_iter()
            .filter_map(|(k, v)| v.map(|v| (k, v)))
            .collect())
    }
}
