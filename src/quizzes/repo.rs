use async_trait::async_trait;
use sqlx::PgPool;

use super::repo_types::{Quiz, QuizRow, QuizUpdate};

#[async_trait]
pub trait QuizRepo: Send + Sync {
    /// All quizzes ordered by week.
    async fn list(&self) -> anyhow::Result<Vec<Quiz>>;
    async fn find_by_week(&self, week: i32) -> anyhow::Result<Option<Quiz>>;
    /// Creates default rows for any of `weeks` that do not exist yet.
    async fn insert_missing_weeks(&self, weeks: &[i32]) -> anyhow::Result<u64>;
    async fn update(&self, week: i32, update: &QuizUpdate) -> anyhow::Result<bool>;
}

#[derive(Clone)]
pub struct PgQuizRepo {
    db: PgPool,
}

impl PgQuizRepo {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

const QUIZ_COLUMNS: &str = "id, week_number, country_name, description, forms_link, \
    opens_at, closes_at, schedule_mode, manual_visible, participant_count, \
    participants_text, winner_1, winner_2, winner_3, created_at, updated_at";

#[async_trait]
impl QuizRepo for PgQuizRepo {
    async fn list(&self) -> anyhow::Result<Vec<Quiz>> {
        let rows = sqlx::query_as::<_, QuizRow>(&format!(
            "SELECT {QUIZ_COLUMNS} FROM quizzes ORDER BY week_number"
        ))
        .fetch_all(&self.db)
        .await?;
        Ok(rows.into_iter().map(Quiz::from).collect())
    }

    async fn find_by_week(&self, week: i32) -> anyhow::Result<Option<Quiz>> {
        let row = sqlx::query_as::<_, QuizRow>(&format!(
            "SELECT {QUIZ_COLUMNS} FROM quizzes WHERE week_number = $1"
        ))
        .bind(week)
        .fetch_optional(&self.db)
        .await?;
        Ok(row.map(Quiz::from))
    }

    async fn insert_missing_weeks(&self, weeks: &[i32]) -> anyhow::Result<u64> {
        let res = sqlx::query(
            r#"
            INSERT INTO quizzes (week_number, country_name, schedule_mode, manual_visible)
            SELECT w, 'Week ' || w, 'manual', FALSE
            FROM UNNEST($1::int4[]) AS w
            ON CONFLICT (week_number) DO NOTHING
            "#,
        )
        .bind(weeks)
        .execute(&self.db)
        .await?;
        Ok(res.rows_affected())
    }

    async fn update(&self, week: i32, u: &QuizUpdate) -> anyhow::Result<bool> {
        let [w1, w2, w3] = &u.winners;
        let res = sqlx::query(
            r#"
            UPDATE quizzes
            SET country_name = $2, description = $3, forms_link = $4,
                opens_at = $5, closes_at = $6, schedule_mode = $7, manual_visible = $8,
                participant_count = $9, participants_text = $10,
                winner_1 = $11, winner_2 = $12, winner_3 = $13,
                updated_at = now()
            WHERE week_number = $1
            "#,
        )
        .bind(week)
        .bind(&u.country_name)
        .bind(&u.description)
        .bind(&u.forms_link)
        .bind(u.opens_at)
        .bind(u.closes_at)
        .bind(u.schedule_mode.as_str())
        .bind(u.manual_visible)
        .bind(u.participant_count)
        .bind(&u.participants_text)
        .bind(w1)
        .bind(w2)
        .bind(w3)
        .execute(&self.db)
        .await?;
        Ok(res.rows_affected() == 1)
    }
}
