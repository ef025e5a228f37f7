use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::{Date, OffsetDateTime};
use uuid::Uuid;

/// Expense record. `user_id` is the owner, fixed at creation; no query in
/// this module ever updates it.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Expense {
    pub id: Uuid,
    pub user_id: Uuid,
    pub date: Date,
    pub amount: f64,
    pub category: String,
    pub description: Option<String>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl Expense {
    pub async fn create(
        db: &PgPool,
        user_id: Uuid,
        date: Date,
        amount: f64,
        category: &str,
        description: Option<&str>,
    ) -> Result<Expense, sqlx::Error> {
        sqlx::query_as::<_, Expense>(
            r#"
            INSERT INTO expenses (id, user_id, date, amount, category, description)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, user_id, date, amount, category, description, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(date)
        .bind(amount)
        .bind(category)
        .bind(description)
        .fetch_one(db)
        .await
    }

    /// Newest-first by creation time.
    pub async fn list_by_owner(db: &PgPool, user_id: Uuid) -> Result<Vec<Expense>, sqlx::Error> {
        sqlx::query_as::<_, Expense>(
            r#"
            SELECT id, user_id, date, amount, category, description, created_at, updated_at
            FROM expenses
            WHERE user_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(db)
        .await
    }

    pub async fn find_by_id(db: &PgPool, id: Uuid) -> Result<Option<Expense>, sqlx::Error> {
        sqlx::query_as::<_, Expense>(
            r#"
            SELECT id, user_id, date, amount, category, description, created_at, updated_at
            FROM expenses
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await
    }

    /// Replaces the four mutable fields in one statement and bumps
    /// `updated_at`. Returns `None` when the id does not exist.
    pub async fn update(
        db: &PgPool,
        id: Uuid,
        date: Date,
        amount: f64,
        category: &str,
        description: Option<&str>,
    ) -> Result<Option<Expense>, sqlx::Error> {
        sqlx::query_as::<_, Expense>(
            r#"
            UPDATE expenses
            SET date = $2, amount = $3, category = $4, description = $5, updated_at = now()
            WHERE id = $1
            RETURNING id, user_id, date, amount, category, description, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(date)
        .bind(amount)
        .bind(category)
        .bind(description)
        .fetch_optional(db)
        .await
    }

    /// Returns `false` when the id does not exist.
    pub async fn delete(db: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM expenses WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
