// src/db/settings_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{common::error::AppError, models::settings::CostSettings};

#[derive(Clone)]
pub struct SettingsRepository {
    pool: PgPool,
}

impl SettingsRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // Empresa sem linha gravada se comporta como recém-criada: devolve os
    // mesmos padrões da migração em vez de "Not Found".
    pub async fn get_settings<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
    ) -> Result<CostSettings, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let settings = sqlx::query_as::<_, CostSettings>(
            "SELECT * FROM tenant_settings WHERE tenant_id = $1",
        )
        .bind(tenant_id)
        .fetch_optional(executor)
        .await?;

        Ok(settings.unwrap_or_else(|| CostSettings::defaults_for(tenant_id)))
    }

    /// Garante a linha de configurações no onboarding da empresa.
    /// Os valores vêm dos DEFAULTs da própria tabela.
    pub async fn seed_defaults<'e, E>(&self, executor: E, tenant_id: Uuid) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query(
            r#"
            INSERT INTO tenant_settings (tenant_id)
            VALUES ($1)
            ON CONFLICT (tenant_id) DO NOTHING
            "#,
        )
        .bind(tenant_id)
        .execute(executor)
        .await?;

        Ok(())
    }

    // UPSERT do estado completo: o handler carrega o atual (ou os
    // padrões), aplica o payload parcial e grava tudo de volta.
    pub async fn upsert_settings<'e, E>(
        &self,
        executor: E,
        settings: &CostSettings,
    ) -> Result<CostSettings, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let updated = sqlx::query_as::<_, CostSettings>(
            r#"
            INSERT INTO tenant_settings (
                tenant_id, company_name, document_number, address, phone, email, pix_key,
                labor_rate_per_hour, labor_percentage,
                paint_cost_good, paint_cost_better, paint_cost_best,
                supplies_base_cost, door_unit_price,
                baseboard_charge_method, baseboard_price_per_linear_foot,
                rate_walls, rate_ceilings, rate_trim, rate_doors, rate_baseboards
            )
            VALUES (
                $1, $2, $3, $4, $5, $6, $7,
                $8, $9,
                $10, $11, $12,
                $13, $14,
                $15, $16,
                $17, $18, $19, $20, $21
            )
            ON CONFLICT (tenant_id)
            DO UPDATE SET
                company_name = EXCLUDED.company_name,
                document_number = EXCLUDED.document_number,
                address = EXCLUDED.address,
                phone = EXCLUDED.phone,
                email = EXCLUDED.email,
                pix_key = EXCLUDED.pix_key,
                labor_rate_per_hour = EXCLUDED.labor_rate_per_hour,
                labor_percentage = EXCLUDED.labor_percentage,
                paint_cost_good = EXCLUDED.paint_cost_good,
                paint_cost_better = EXCLUDED.paint_cost_better,
                paint_cost_best = EXCLUDED.paint_cost_best,
                supplies_base_cost = EXCLUDED.supplies_base_cost,
                door_unit_price = EXCLUDED.door_unit_price,
                baseboard_charge_method = EXCLUDED.baseboard_charge_method,
                baseboard_price_per_linear_foot = EXCLUDED.baseboard_price_per_linear_foot,
                rate_walls = EXCLUDED.rate_walls,
                rate_ceilings = EXCLUDED.rate_ceilings,
                rate_trim = EXCLUDED.rate_trim,
                rate_doors = EXCLUDED.rate_doors,
                rate_baseboards = EXCLUDED.rate_baseboards,
                updated_at = NOW()
            RETURNING *
            "#,
        )
        .bind(settings.tenant_id)
        .bind(&settings.company_name)
        .bind(&settings.document_number)
        .bind(&settings.address)
        .bind(&settings.phone)
        .bind(&settings.email)
        .bind(&settings.pix_key)
        .bind(settings.labor_rate_per_hour)
        .bind(settings.labor_percentage)
        .bind(settings.paint_cost_good)
        .bind(settings.paint_cost_better)
        .bind(settings.paint_cost_best)
        .bind(settings.supplies_base_cost)
        .bind(settings.door_unit_price)
        .bind(settings.baseboard_charge_method)
        .bind(settings.baseboard_price_per_linear_foot)
        .bind(settings.rate_walls)
        .bind(settings.rate_ceilings)
        .bind(settings.rate_trim)
        .bind(settings.rate_doors)
        .bind(settings.rate_baseboards)
        .fetch_one(executor)
        .await?;

        Ok(updated)
    }
}
