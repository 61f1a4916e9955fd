use async_trait::async_trait;
use sqlx::PgPool;

use super::repo_types::{DuplicateClassName, SchoolClass};

const UNIQUE_VIOLATION: &str = "23505";

fn map_write_error(err: sqlx::Error, name: Option<&str>) -> anyhow::Error {
    let unique = matches!(
        &err,
        sqlx::Error::Database(db) if db.code().as_deref() == Some(UNIQUE_VIOLATION)
    );
    match name {
        Some(name) if unique => DuplicateClassName(name.to_string()).into(),
        _ => err.into(),
    }
}

#[async_trait]
pub trait ClassRepo: Send + Sync {
    /// All classes ordered by name.
    async fn list(&self) -> anyhow::Result<Vec<SchoolClass>>;
    async fn find(&self, id: i32) -> anyhow::Result<Option<SchoolClass>>;
    async fn find_by_name(&self, name: &str) -> anyhow::Result<Option<SchoolClass>>;
    /// A name clash fails with a wrapped [`DuplicateClassName`].
    async fn create(&self, name: &str, amount: f64) -> anyhow::Result<SchoolClass>;
    /// Changes whichever of name and amount is given.
    async fn update(
        &self,
        id: i32,
        name: Option<&str>,
        amount: Option<f64>,
    ) -> anyhow::Result<Option<SchoolClass>>;
    async fn delete(&self, id: i32) -> anyhow::Result<bool>;
}

#[derive(Clone)]
pub struct PgClassRepo {
    db: PgPool,
}

impl PgClassRepo {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ClassRepo for PgClassRepo {
    async fn list(&self) -> anyhow::Result<Vec<SchoolClass>> {
        let rows = sqlx::query_as::<_, SchoolClass>(
            r#"
            SELECT id, name, rice_bowl_amount, created_at
            FROM school_classes
            ORDER BY name
            "#,
        )
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }

    async fn find(&self, id: i32) -> anyhow::Result<Option<SchoolClass>> {
        let row = sqlx::query_as::<_, SchoolClass>(
            r#"SELECT id, name, rice_bowl_amount, created_at FROM school_classes WHERE id = $1"#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?;
        Ok(row)
    }

    async fn find_by_name(&self, name: &str) -> anyhow::Result<Option<SchoolClass>> {
        let row = sqlx::query_as::<_, SchoolClass>(
            r#"SELECT id, name, rice_bowl_amount, created_at FROM school_classes WHERE name = $1"#,
        )
        .bind(name)
        .fetch_optional(&self.db)
        .await?;
        Ok(row)
    }

    async fn create(&self, name: &str, amount: f64) -> anyhow::Result<SchoolClass> {
        let row = sqlx::query_as::<_, SchoolClass>(
            r#"
            INSERT INTO school_classes (name, rice_bowl_amount)
            VALUES ($1, $2)
            RETURNING id, name, rice_bowl_amount, created_at
            "#,
        )
        .bind(name)
        .bind(amount)
        .fetch_one(&self.db)
        .await
        .map_err(|e| map_write_error(e, Some(name)))?;
        Ok(row)
    }

    async fn update(
        &self,
        id: i32,
        name: Option<&str>,
        amount: Option<f64>,
    ) -> anyhow::Result<Option<SchoolClass>> {
        let row = sqlx::query_as::<_, SchoolClass>(
            r#"
            UPDATE school_classes
            SET name = COALESCE($2, name),
                rice_bowl_amount = COALESCE($3, rice_bowl_amount)
            WHERE id = $1
            RETURNING id, name, rice_bowl_amount, created_at
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(amount)
        .fetch_optional(&self.db)
        .await
        .map_err(|e| map_write_error(e, name))?;
        Ok(row)
    }

    async fn delete(&self, id: i32) -> anyhow::Result<bool> {
        let res = sqlx::query(r#"DELETE FROM school_classes WHERE id = $1"#)
            .bind(id)
            .execute(&self.db)
            .await?;
        Ok(res.rows_affected() == 1)
    }
}
