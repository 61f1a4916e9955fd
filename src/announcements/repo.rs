use async_trait::async_trait;
use sqlx::PgPool;

use super::repo_types::{Announcement, AnnouncementDraft};

#[async_trait]
pub trait AnnouncementRepo: Send + Sync {
    /// Newest first.
    async fn list(&self) -> anyhow::Result<Vec<Announcement>>;
    async fn find(&self, id: i32) -> anyhow::Result<Option<Announcement>>;
    async fn create(&self, draft: &AnnouncementDraft) -> anyhow::Result<Announcement>;
    async fn update(&self, id: i32, draft: &AnnouncementDraft) -> anyhow::Result<bool>;
    async fn delete(&self, id: i32) -> anyhow::Result<bool>;
}

#[derive(Clone)]
pub struct PgAnnouncementRepo {
    db: PgPool,
}

impl PgAnnouncementRepo {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl AnnouncementRepo for PgAnnouncementRepo {
    async fn list(&self) -> anyhow::Result<Vec<Announcement>> {
        let rows = sqlx::query_as::<_, Announcement>(
            r#"
            SELECT id, text, start_at, end_at, enabled, created_at
            FROM announcements
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }

    async fn find(&self, id: i32) -> anyhow::Result<Option<Announcement>> {
        let row = sqlx::query_as::<_, Announcement>(
            r#"
            SELECT id, text, start_at, end_at, enabled, created_at
            FROM announcements
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?;
        Ok(row)
    }

    async fn create(&self, draft: &AnnouncementDraft) -> anyhow::Result<Announcement> {
        let row = sqlx::query_as::<_, Announcement>(
            r#"
            INSERT INTO announcements (text, start_at, end_at, enabled)
            VALUES ($1, $2, $3, $4)
            RETURNING id, text, start_at, end_at, enabled, created_at
            "#,
        )
        .bind(&draft.text)
        .bind(draft.start_at)
        .bind(draft.end_at)
        .bind(draft.enabled)
        .fetch_one(&self.db)
        .await?;
        Ok(row)
    }

    async fn update(&self, id: i32, draft: &AnnouncementDraft) -> anyhow::Result<bool> {
        let res = sqlx::query(
            r#"
            UPDATE announcements
            SET text = $2, start_at = $3, end_at = $4, enabled = $5
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(&draft.text)
        .bind(draft.start_at)
        .bind(draft.end_at)
        .bind(draft.enabled)
        .execute(&self.db)
        .await?;
        Ok(res.rows_affected() == 1)
    }

    async fn delete(&self, id: i32) -> anyhow::Result<bool> {
        let res = sqlx::query(r#"DELETE FROM announcements WHERE id = $1"#)
            .bind(id)
            .execute(&self.db)
            .await?;
        Ok(res.rows_affected() == 1)
    }
}
