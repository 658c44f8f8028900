// src/db/dashboard_repo.rs

use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres, Row};
use uuid::Uuid;

use crate::common::error::AppError;
use crate::models::dashboard::DashboardSummary;

#[derive(Clone)]
pub struct DashboardRepository {
    pool: PgPool,
}

impl DashboardRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // Uma query só, com FILTER por status. "expirado" é derivado de
    // valid_until aqui na leitura, coerente com o resto do sistema.
    pub async fn get_summary<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
    ) -> Result<DashboardSummary, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let row = sqlx::query(
            r#"
            SELECT
                COUNT(*) FILTER (
                    WHERE job_status = 'QUOTED'
                      AND (valid_until IS NULL OR valid_until >= NOW())
                ) AS quoted_count,
                COUNT(*) FILTER (
                    WHERE job_status = 'QUOTED' AND valid_until < NOW()
                ) AS expired_count,
                COUNT(*) FILTER (WHERE job_status = 'ACCEPTED')  AS accepted_count,
                COUNT(*) FILTER (WHERE job_status = 'DENIED')    AS denied_count,
                COUNT(*) FILTER (WHERE job_status = 'COMPLETED') AS completed_count,
                COALESCE(SUM(final_price) FILTER (
                    WHERE job_status = 'QUOTED'
                      AND (valid_until IS NULL OR valid_until >= NOW())
                ), 0) AS open_quoted_value,
                COALESCE(SUM(profit_loss) FILTER (
                    WHERE job_status = 'COMPLETED'
                ), 0) AS realized_profit
            FROM quotes
            WHERE tenant_id = $1
            "#,
        )
        .bind(tenant_id)
        .fetch_one(executor)
        .await?;

        let quoted_count: i64 = row.get("quoted_count");
        let expired_count: i64 = row.get("expired_count");
        let accepted_count: i64 = row.get("accepted_count");
        let denied_count: i64 = row.get("denied_count");
        let completed_count: i64 = row.get("completed_count");
        let open_quoted_value: Decimal = row.get("open_quoted_value");
        let realized_profit: Decimal = row.get("realized_profit");

        // Taxa de aceite entre os já respondidos (aceitos seguem contando
        // depois de concluídos).
        let responded = accepted_count + completed_count + denied_count;
        let acceptance_rate = if responded == 0 {
            Decimal::ZERO
        } else {
            Decimal::from(accepted_count + completed_count) / Decimal::from(responded)
                * Decimal::ONE_HUNDRED
        };

        Ok(DashboardSummary {
            quoted_count,
            accepted_count,
            denied_count,
            completed_count,
            expired_count,
            open_quoted_value,
            acceptance_rate,
            realized_profit,
        })
    }
}
