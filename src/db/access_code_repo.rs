// src/db/access_code_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::common::error::AppError;
use crate::models::access_code::AccessCode;

#[derive(Clone)]
pub struct AccessCodeRepository {
    pool: PgPool,
}

impl AccessCodeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create<'e, E>(
        &self,
        executor: E,
        code: &str,
        company_name: &str,
        max_uses: i32,
        expires_at: Option<chrono::DateTime<chrono::Utc>>,
    ) -> Result<AccessCode, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let access_code = sqlx::query_as::<_, AccessCode>(
            r#"
            INSERT INTO access_codes (code, company_name, max_uses, expires_at)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(code)
        .bind(company_name)
        .bind(max_uses)
        .bind(expires_at)
        .fetch_one(executor)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return AppError::UniqueConstraintViolation("access_codes.code".to_string());
                }
            }
            e.into()
        })?;

        Ok(access_code)
    }

    pub async fn list(&self) -> Result<Vec<AccessCode>, AppError> {
        let codes = sqlx::query_as::<_, AccessCode>(
            "SELECT * FROM access_codes ORDER BY created_at DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(codes)
    }

    pub async fn find_by_code<'e, E>(
        &self,
        executor: E,
        code: &str,
    ) -> Result<Option<AccessCode>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let maybe_code =
            sqlx::query_as::<_, AccessCode>("SELECT * FROM access_codes WHERE code = $1")
                .bind(code)
                .fetch_optional(executor)
                .await?;

        Ok(maybe_code)
    }

    /// Consome um uso do código. O guard `uses_count < max_uses` na
    /// própria query torna o incremento atômico: dois resgates
    /// simultâneos do último uso não passam os dois.
    pub async fn claim_use<'e, E>(&self, executor: E, id: Uuid) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query(
            r#"
            UPDATE access_codes
            SET uses_count = uses_count + 1
            WHERE id = $1 AND is_active AND uses_count < max_uses
            "#,
        )
        .bind(id)
        .execute(executor)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
