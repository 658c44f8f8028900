// src/db/quote_repo.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::types::Json;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::common::error::AppError;
use crate::models::quotes::{EnhancedBaseCosts, JobStatus, Quote, QuoteDetails, QuoteVersion};
use crate::services::job_tracker::JobActuals;

#[derive(Clone)]
pub struct QuoteRepository {
    pool: PgPool,
}

impl QuoteRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // A subquery do display_id pega o próximo número amigável da empresa
    // na mesma query do INSERT (sem round-trip extra).
    pub async fn create<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        project_id: Uuid,
        base_costs: &EnhancedBaseCosts,
        markup_percentage: Decimal,
        final_price: Decimal,
        details: &QuoteDetails,
        valid_until: Option<DateTime<Utc>>,
    ) -> Result<Quote, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let quote = sqlx::query_as::<_, Quote>(
            r#"
            INSERT INTO quotes (
                tenant_id, project_id, display_id,
                base_costs, markup_percentage, final_price, details, valid_until
            )
            VALUES (
                $1, $2,
                (SELECT COALESCE(MAX(display_id), 0) + 1 FROM quotes WHERE tenant_id = $1),
                $3, $4, $5, $6, $7
            )
            RETURNING *
            "#,
        )
        .bind(tenant_id)
        .bind(project_id)
        .bind(Json(base_costs))
        .bind(markup_percentage)
        .bind(final_price)
        .bind(Json(details))
        .bind(valid_until)
        .fetch_one(executor)
        .await?;

        Ok(quote)
    }

    pub async fn list<'e, E>(&self, executor: E, tenant_id: Uuid) -> Result<Vec<Quote>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let quotes = sqlx::query_as::<_, Quote>(
            r#"
            SELECT * FROM quotes
            WHERE tenant_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(tenant_id)
        .fetch_all(executor)
        .await?;

        Ok(quotes)
    }

    pub async fn find_by_id<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        quote_id: Uuid,
    ) -> Result<Option<Quote>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let quote =
            sqlx::query_as::<_, Quote>("SELECT * FROM quotes WHERE tenant_id = $1 AND id = $2")
                .bind(tenant_id)
                .bind(quote_id)
                .fetch_optional(executor)
                .await?;

        Ok(quote)
    }

    // Fluxo público: a conexão chega com app.share_token definido e a
    // policy quote_share_access libera exatamente esta linha.
    pub async fn find_by_share_token<'e, E>(
        &self,
        executor: E,
        share_token: Uuid,
    ) -> Result<Option<Quote>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let quote = sqlx::query_as::<_, Quote>("SELECT * FROM quotes WHERE share_token = $1")
            .bind(share_token)
            .fetch_optional(executor)
            .await?;

        Ok(quote)
    }

    /// Reescreve o preço do orçamento (edição). Política de concorrência:
    /// last-write-wins; o snapshot de versão é trilha de auditoria, não
    /// detecção de conflito.
    pub async fn update_pricing<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        quote_id: Uuid,
        base_costs: &EnhancedBaseCosts,
        markup_percentage: Decimal,
        final_price: Decimal,
        details: &QuoteDetails,
        valid_until: Option<DateTime<Utc>>,
    ) -> Result<Quote, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let quote = sqlx::query_as::<_, Quote>(
            r#"
            UPDATE quotes
            SET base_costs = $3,
                markup_percentage = $4,
                final_price = $5,
                details = $6,
                valid_until = $7
            WHERE tenant_id = $1 AND id = $2
            RETURNING *
            "#,
        )
        .bind(tenant_id)
        .bind(quote_id)
        .bind(Json(base_costs))
        .bind(markup_percentage)
        .bind(final_price)
        .bind(Json(details))
        .bind(valid_until)
        .fetch_one(executor)
        .await?;

        Ok(quote)
    }

    pub async fn insert_version<'e, E>(&self, executor: E, quote: &Quote) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let snapshot = serde_json::to_value(quote)
            .map_err(|e| anyhow::anyhow!("Falha ao serializar snapshot do orçamento: {}", e))?;

        sqlx::query(
            r#"
            INSERT INTO quote_versions (quote_id, tenant_id, snapshot)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(quote.id)
        .bind(quote.tenant_id)
        .bind(Json(snapshot))
        .execute(executor)
        .await?;

        Ok(())
    }

    /// Trilha de auditoria da edição, do snapshot mais recente para o
    /// mais antigo. Leitura de exibição apenas: nunca entra na detecção
    /// de conflito.
    pub async fn list_versions<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        quote_id: Uuid,
    ) -> Result<Vec<QuoteVersion>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let versions = sqlx::query_as::<_, QuoteVersion>(
            r#"
            SELECT * FROM quote_versions
            WHERE tenant_id = $1 AND quote_id = $2
            ORDER BY created_at DESC
            "#,
        )
        .bind(tenant_id)
        .bind(quote_id)
        .fetch_all(executor)
        .await?;

        Ok(versions)
    }

    // responded_at é gravado como veio (Some no aceite/recusa, None no
    // reset manual). O carimbo de conclusão nunca é regravado.
    pub async fn update_status<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        quote_id: Uuid,
        status: JobStatus,
        responded_at: Option<DateTime<Utc>>,
    ) -> Result<Quote, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let quote = sqlx::query_as::<_, Quote>(
            r#"
            UPDATE quotes
            SET job_status = $3,
                responded_at = $4,
                completed_at = CASE
                    WHEN $3 = 'COMPLETED'::job_status THEN COALESCE(completed_at, NOW())
                    ELSE completed_at
                END
            WHERE tenant_id = $1 AND id = $2
            RETURNING *
            "#,
        )
        .bind(tenant_id)
        .bind(quote_id)
        .bind(status)
        .bind(responded_at)
        .fetch_one(executor)
        .await?;

        Ok(quote)
    }

    /// Lança (ou relança) os custos reais. Não é terminal: pode ser
    /// chamado repetidas vezes enquanto o serviço está em andamento.
    pub async fn record_actuals<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        quote_id: Uuid,
        actuals: &JobActuals,
        notes: Option<&str>,
        profit_loss: Decimal,
    ) -> Result<Quote, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let quote = sqlx::query_as::<_, Quote>(
            r#"
            UPDATE quotes
            SET actual_labor_cost = $3,
                actual_materials_cost = $4,
                actual_supplies_cost = $5,
                completion_notes = $6,
                profit_loss = $7
            WHERE tenant_id = $1 AND id = $2
            RETURNING *
            "#,
        )
        .bind(tenant_id)
        .bind(quote_id)
        .bind(actuals.labor_cost)
        .bind(actuals.materials_cost)
        .bind(actuals.supplies_cost)
        .bind(notes)
        .bind(profit_loss)
        .fetch_one(executor)
        .await?;

        Ok(quote)
    }

    /// Transição terminal accepted -> completed. O COALESCE preserva o
    /// primeiro carimbo em re-execuções (escrita idempotente).
    pub async fn mark_completed<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        quote_id: Uuid,
    ) -> Result<Quote, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let quote = sqlx::query_as::<_, Quote>(
            r#"
            UPDATE quotes
            SET job_status = 'COMPLETED',
                completed_at = COALESCE(completed_at, NOW())
            WHERE tenant_id = $1 AND id = $2
            RETURNING *
            "#,
        )
        .bind(tenant_id)
        .bind(quote_id)
        .fetch_one(executor)
        .await?;

        Ok(quote)
    }

    /// Decisão do cliente pelo link público (aceite ou recusa).
    pub async fn decide_by_share_token<'e, E>(
        &self,
        executor: E,
        share_token: Uuid,
        status: JobStatus,
    ) -> Result<Quote, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let quote = sqlx::query_as::<_, Quote>(
            r#"
            UPDATE quotes
            SET job_status = $2,
                responded_at = NOW()
            WHERE share_token = $1
            RETURNING *
            "#,
        )
        .bind(share_token)
        .bind(status)
        .fetch_one(executor)
        .await?;

        Ok(quote)
    }
}
