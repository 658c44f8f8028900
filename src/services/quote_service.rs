// src/services/quote_service.rs
//
// O agregado de orçamento: recalcula preço na escrita, grava snapshot de
// versão na edição, aplica a máquina de estados e fecha o serviço com os
// custos reais. Totais enviados pelo cliente NUNCA são confiáveis: tudo
// é derivado aqui no servidor a partir dos detalhes validados.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::{Acquire, Executor, Postgres};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{ProjectRepository, QuoteRepository, SettingsRepository},
    models::quotes::{
        BaseCosts, EnhancedBaseCosts, JobStatus, Quote, QuoteDetails, QuotePublicView,
        QuoteVersion, QuoteView,
    },
    models::settings::CostSettings,
    services::{
        job_tracker::{self, JobActuals, JobSummary},
        pricing::{self, InternalMetrics},
        room_calculator::{self, AdvancedQuoteParams},
        surface_calculator,
    },
};

// Resultado da derivação de preço de um conjunto de detalhes.
#[derive(Debug, Clone)]
pub struct ComputedPricing {
    pub base_costs: EnhancedBaseCosts,
    pub subtotal: Decimal,
    pub final_price: Decimal,
}

// Métricas internas + alertas, como o endpoint do contratante devolve.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InternalMetricsView {
    #[serde(flatten)]
    pub metrics: InternalMetrics,

    pub warnings: Vec<String>,
}

// Resultado do fechamento (lançamento de custos reais).
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct JobCompletionView {
    #[serde(flatten)]
    pub summary: JobSummary,

    pub quote: QuoteView,
}

/// Deriva custos base, subtotal e preço final dos detalhes.
///
/// Base do markup por método:
/// - Simples: o preço do projeto já é preço de venda (taxa por sqft
///   embute o lucro), então a base é preço do projeto + sundries.
/// - Avançado: a base é o subtotal de custos itemizados.
pub fn compute_pricing(
    details: &QuoteDetails,
    settings: &CostSettings,
    markup_percentage: Decimal,
) -> ComputedPricing {
    let (base_costs, subtotal) = match details {
        QuoteDetails::Simple {
            surfaces,
            sundries,
            labor_percentage,
        } => {
            let breakdown =
                surface_calculator::calculate_simple_quote(surfaces, *sundries, *labor_percentage);

            let base_costs = EnhancedBaseCosts {
                base: BaseCosts {
                    labor: breakdown.labor_estimate,
                    paint: breakdown.total_materials_cost,
                    supplies: Decimal::ZERO,
                },
                door_trim_work: Decimal::ZERO,
                baseboards: Decimal::ZERO,
                sundries: *sundries,
            };
            let subtotal = breakdown.total_project_price + *sundries;

            (base_costs, subtotal)
        }
        QuoteDetails::Advanced {
            rooms,
            paint_quality,
            coats,
            sundries,
        } => {
            let params = AdvancedQuoteParams {
                paint_cost_per_gallon: settings.paint_cost_for(*paint_quality),
                labor_cost_per_hour: settings.labor_rate_per_hour,
                baseboard_charge_method: settings.baseboard_charge_method,
                baseboard_price_per_linear_foot: settings.baseboard_price_per_linear_foot,
                supplies_base_cost: settings.supplies_base_cost,
                sundries: *sundries,
                coats: *coats,
            };
            let breakdown = room_calculator::calculate_advanced_quote(rooms, &params);

            let subtotal = breakdown.base_costs.subtotal();
            (breakdown.base_costs, subtotal)
        }
    };

    let final_price = pricing::apply_markup(subtotal, markup_percentage).final_price;

    ComputedPricing {
        base_costs,
        subtotal,
        final_price,
    }
}

#[derive(Clone)]
pub struct QuoteService {
    quote_repo: QuoteRepository,
    project_repo: ProjectRepository,
    settings_repo: SettingsRepository,
}

impl QuoteService {
    pub fn new(
        quote_repo: QuoteRepository,
        project_repo: ProjectRepository,
        settings_repo: SettingsRepository,
    ) -> Self {
        Self {
            quote_repo,
            project_repo,
            settings_repo,
        }
    }

    pub async fn create_quote<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        project_id: Uuid,
        details: QuoteDetails,
        markup_percentage: Decimal,
        valid_until: Option<DateTime<Utc>>,
    ) -> Result<QuoteView, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        self.project_repo
            .find_by_id(&mut *tx, tenant_id, project_id)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound(format!("Projeto {}", project_id)))?;

        let settings = self.settings_repo.get_settings(&mut *tx, tenant_id).await?;
        let computed = compute_pricing(&details, &settings, markup_percentage);

        let quote = self
            .quote_repo
            .create(
                &mut *tx,
                tenant_id,
                project_id,
                &computed.base_costs,
                markup_percentage,
                computed.final_price,
                &details,
                valid_until,
            )
            .await?;

        tx.commit().await?;

        Ok(QuoteView::new(quote, Utc::now()))
    }

    pub async fn list_quotes<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
    ) -> Result<Vec<QuoteView>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let now = Utc::now();
        let quotes = self.quote_repo.list(executor, tenant_id).await?;
        Ok(quotes
            .into_iter()
            .map(|quote| QuoteView::new(quote, now))
            .collect())
    }

    pub async fn get_quote<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        quote_id: Uuid,
    ) -> Result<QuoteView, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let quote = self
            .quote_repo
            .find_by_id(executor, tenant_id, quote_id)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound(format!("Orçamento {}", quote_id)))?;

        Ok(QuoteView::new(quote, Utc::now()))
    }

    /// Edição: grava o estado anterior como snapshot de versão (trilha de
    /// auditoria) e recalcula tudo. Last-write-wins entre edições
    /// concorrentes; o snapshot nunca é lido para detectar conflito.
    pub async fn update_quote<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        quote_id: Uuid,
        details: QuoteDetails,
        markup_percentage: Decimal,
        valid_until: Option<DateTime<Utc>>,
    ) -> Result<QuoteView, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let current = self
            .quote_repo
            .find_by_id(&mut *tx, tenant_id, quote_id)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound(format!("Orçamento {}", quote_id)))?;

        self.quote_repo.insert_version(&mut *tx, &current).await?;

        let settings = self.settings_repo.get_settings(&mut *tx, tenant_id).await?;
        let computed = compute_pricing(&details, &settings, markup_percentage);

        let updated = self
            .quote_repo
            .update_pricing(
                &mut *tx,
                tenant_id,
                quote_id,
                &computed.base_costs,
                markup_percentage,
                computed.final_price,
                &details,
                valid_until,
            )
            .await?;

        tx.commit().await?;

        Ok(QuoteView::new(updated, Utc::now()))
    }

    /// Transição manual de status pela máquina de estados:
    /// quoted -> {accepted, denied}; accepted -> completed; qualquer
    /// estado volta para quoted (override da UI). Transição inválida é
    /// erro para o chamador; nada é re-tentado.
    pub async fn transition_status<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        quote_id: Uuid,
        new_status: JobStatus,
    ) -> Result<QuoteView, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let current = self
            .quote_repo
            .find_by_id(&mut *tx, tenant_id, quote_id)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound(format!("Orçamento {}", quote_id)))?;

        if !current.job_status.can_transition_to(new_status) {
            return Err(AppError::InvalidStatusTransition {
                from: current.job_status,
                to: new_status,
            });
        }

        let responded_at = match new_status {
            JobStatus::Accepted | JobStatus::Denied => Some(Utc::now()),
            // Reset manual limpa a resposta; conclusão preserva a atual.
            JobStatus::Quoted => None,
            JobStatus::Completed => current.responded_at,
        };

        let updated = self
            .quote_repo
            .update_status(&mut *tx, tenant_id, quote_id, new_status, responded_at)
            .await?;

        tx.commit().await?;

        Ok(QuoteView::new(updated, Utc::now()))
    }

    /// Lança os custos reais do serviço. `finalize` = false mantém o
    /// orçamento aceito (lançamento parcial, repetível); true executa a
    /// transição terminal accepted -> completed. Ambos são escritas
    /// idempotentes: repetir com os mesmos valores não muda nada.
    pub async fn record_actuals<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        quote_id: Uuid,
        actuals: JobActuals,
        notes: Option<String>,
        finalize: bool,
    ) -> Result<JobCompletionView, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let current = self
            .quote_repo
            .find_by_id(&mut *tx, tenant_id, quote_id)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound(format!("Orçamento {}", quote_id)))?;

        // Custos reais só existem para serviço aceito (ou já concluído,
        // no caso de relançamento).
        if !matches!(current.job_status, JobStatus::Accepted | JobStatus::Completed) {
            return Err(AppError::QuoteNotAccepted);
        }

        let summary =
            job_tracker::summarize_job(current.final_price, &current.base_costs.0, &actuals);

        let mut updated = self
            .quote_repo
            .record_actuals(
                &mut *tx,
                tenant_id,
                quote_id,
                &actuals,
                notes.as_deref(),
                summary.profit_loss,
            )
            .await?;

        if finalize {
            updated = self
                .quote_repo
                .mark_completed(&mut *tx, tenant_id, quote_id)
                .await?;
        }

        tx.commit().await?;

        Ok(JobCompletionView {
            summary,
            quote: QuoteView::new(updated, Utc::now()),
        })
    }

    /// Snapshots de versões anteriores (trilha de auditoria da edição).
    pub async fn list_versions<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        quote_id: Uuid,
    ) -> Result<Vec<QuoteVersion>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.quote_repo
            .list_versions(executor, tenant_id, quote_id)
            .await
    }

    /// Projeção de lucratividade interna do orçamento. Nunca exposta nas
    /// rotas públicas.
    pub async fn internal_metrics<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        quote_id: Uuid,
    ) -> Result<InternalMetricsView, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let quote = self
            .quote_repo
            .find_by_id(executor, tenant_id, quote_id)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound(format!("Orçamento {}", quote_id)))?;

        let metrics = pricing::add_internal_metrics(&quote.base_costs.0, quote.markup_percentage);
        let warnings = pricing::metric_warnings(&metrics);

        Ok(InternalMetricsView { metrics, warnings })
    }

    /// Visão do link público: projeção segura para o cliente, sem markup,
    /// custos base ou métricas internas.
    pub async fn public_view<'e, E>(
        &self,
        executor: E,
        share_token: Uuid,
    ) -> Result<QuotePublicView, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let quote = self
            .quote_repo
            .find_by_share_token(&mut *tx, share_token)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound("Orçamento".to_string()))?;

        let view = self.build_public_view(&mut tx, quote).await?;
        tx.commit().await?;

        Ok(view)
    }

    /// Decisão do cliente pelo link público. Só vale com o orçamento
    /// ainda em aberto e dentro da validade.
    pub async fn public_decision<'e, E>(
        &self,
        executor: E,
        share_token: Uuid,
        accepted: bool,
    ) -> Result<QuotePublicView, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let current = self
            .quote_repo
            .find_by_share_token(&mut *tx, share_token)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound("Orçamento".to_string()))?;

        let now = Utc::now();
        if current.is_expired(now) {
            return Err(AppError::QuoteExpired);
        }
        if current.job_status != JobStatus::Quoted {
            return Err(AppError::QuoteAlreadyResponded);
        }

        let new_status = if accepted {
            JobStatus::Accepted
        } else {
            JobStatus::Denied
        };

        let updated = self
            .quote_repo
            .decide_by_share_token(&mut *tx, share_token, new_status)
            .await?;

        let view = self.build_public_view(&mut tx, updated).await?;
        tx.commit().await?;

        Ok(view)
    }

    async fn build_public_view(
        &self,
        tx: &mut sqlx::Transaction<'_, Postgres>,
        quote: Quote,
    ) -> Result<QuotePublicView, AppError> {
        let project = self
            .project_repo
            .find_by_id(&mut **tx, quote.tenant_id, quote.project_id)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound("Projeto".to_string()))?;

        let settings = self
            .settings_repo
            .get_settings(&mut **tx, quote.tenant_id)
            .await?;

        let status = quote.display_status(Utc::now());
        Ok(QuotePublicView {
            display_id: quote.display_id,
            company_name: settings.company_name,
            client_name: project.client_name,
            final_price: quote.final_price,
            status,
            valid_until: quote.valid_until,
            details: quote.details,
            created_at: quote.created_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::quotes::{Surface, SurfaceKind};

    fn settings() -> CostSettings {
        CostSettings::defaults_for(Uuid::new_v4())
    }

    fn simple_details() -> QuoteDetails {
        QuoteDetails::Simple {
            surfaces: vec![Surface {
                kind: SurfaceKind::Walls,
                square_footage: Decimal::from(500),
                rate_per_sqft: Decimal::from(3),
                paint_product: None,
                paint_cost_per_gallon: Decimal::from(26),
                spread_rate: Decimal::from(350),
            }],
            sundries: Decimal::from(100),
            labor_percentage: Decimal::from(30),
        }
    }

    #[test]
    fn orcamento_simples_precifica_pelo_preco_do_projeto() {
        // Projeto de 1500 + 100 de sundries; sem markup o preço final é
        // a própria base.
        let computed = compute_pricing(&simple_details(), &settings(), Decimal::ZERO);
        assert_eq!(computed.subtotal, Decimal::from(1600));
        assert_eq!(computed.final_price, Decimal::from(1600));

        // O snapshot de custos guarda o que foi derivado.
        assert_eq!(computed.base_costs.base.labor, Decimal::from(450));
        assert_eq!(computed.base_costs.base.paint, Decimal::from(52));
        assert_eq!(computed.base_costs.sundries, Decimal::from(100));
    }

    #[test]
    fn markup_incide_sobre_o_subtotal() {
        let computed = compute_pricing(&simple_details(), &settings(), Decimal::from(20));
        // 1600 × 1.2
        assert_eq!(computed.final_price, Decimal::from(1920));
    }

    #[test]
    fn orcamento_avancado_precifica_pelo_subtotal_de_custos() {
        let details = QuoteDetails::Advanced {
            rooms: vec![],
            paint_quality: crate::models::settings::PaintQuality::Good,
            coats: 2,
            sundries: Decimal::from(70),
        };

        // Sem cômodos sobram os custos fixos: supplies padrão (100) +
        // sundries (70).
        let computed = compute_pricing(&details, &settings(), Decimal::from(10));
        assert_eq!(computed.subtotal, Decimal::from(170));
        assert_eq!(computed.final_price, Decimal::from(187));
    }
}
