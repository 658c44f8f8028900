// src/models/quotes.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use sqlx::types::Json;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::settings::PaintQuality;

// --- Enums ---

// Status PERSISTIDO do orçamento. "Expired" não existe aqui de propósito:
// expiração é derivada de valid_until na leitura (ver display_status).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "job_status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobStatus {
    Quoted,    // Aguardando resposta do cliente
    Accepted,  // Cliente aceitou
    Denied,    // Cliente recusou
    Completed, // Serviço executado e custos reais lançados
}

impl JobStatus {
    // Máquina de estados: quoted -> {accepted, denied}; accepted -> completed;
    // qualquer estado pode voltar para quoted (override manual da UI).
    pub fn can_transition_to(self, next: JobStatus) -> bool {
        matches!(
            (self, next),
            (_, JobStatus::Quoted)
                | (JobStatus::Quoted, JobStatus::Accepted)
                | (JobStatus::Quoted, JobStatus::Denied)
                | (JobStatus::Accepted, JobStatus::Completed)
        )
    }
}

// Status de EXIBIÇÃO: o persistido mais o "expired" derivado.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum QuoteDisplayStatus {
    Quoted,
    Accepted,
    Denied,
    Completed,
    Expired,
}

// --- Detalhes do orçamento (união etiquetada, validada na borda) ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum SurfaceKind {
    Walls,
    Ceilings,
    Trim,
    Doors,
    Baseboards,
}

// Uma superfície do orçamento simples. Campos numéricos ausentes viram 0
// via serde(default), nunca erro (escolha explícita de robustez).
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Surface {
    pub kind: SurfaceKind,

    #[serde(default)]
    #[schema(example = "500")]
    pub square_footage: Decimal,

    #[serde(default)]
    #[schema(example = "3.00")]
    pub rate_per_sqft: Decimal,

    // Referência de produto ou nome de tinta avulso digitado pelo pintor
    #[schema(example = "Suvinil Toque de Seda")]
    pub paint_product: Option<String>,

    #[serde(default)]
    #[schema(example = "26.00")]
    pub paint_cost_per_gallon: Decimal,

    // Rendimento: pés quadrados cobertos por galão
    #[serde(default)]
    #[schema(example = "350")]
    pub spread_rate: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DoorSpec {
    #[schema(example = "Porta almofadada")]
    pub door_type: String,

    #[serde(default)]
    #[schema(example = 2)]
    pub count: u32,

    #[serde(default)]
    #[schema(example = "120.00")]
    pub unit_price: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    #[schema(example = "Sala de estar")]
    pub name: String,

    // Comprimentos das paredes em ordem (pés)
    #[serde(default)]
    pub wall_lengths: Vec<Decimal>,

    #[serde(default)]
    #[schema(example = "8")]
    pub ceiling_height: Decimal,

    #[serde(default)]
    pub doors: Vec<DoorSpec>,

    #[serde(default)]
    #[schema(example = 2)]
    pub windows_count: u32,

    // Pés lineares de rodapé
    #[serde(default)]
    #[schema(example = "44")]
    pub baseboard_length: Decimal,

    #[serde(default)]
    pub include_ceiling: bool,

    #[serde(default)]
    pub include_trim: bool,
}

fn default_coats() -> u32 {
    2
}

// Substitui o blob JSON dinâmico da versão anterior: o método do orçamento
// é uma etiqueta explícita e o shape é validado na desserialização.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(tag = "quoteMethod", rename_all = "camelCase")]
pub enum QuoteDetails {
    #[serde(rename_all = "camelCase")]
    Simple {
        surfaces: Vec<Surface>,

        #[serde(default)]
        sundries: Decimal,

        #[serde(default)]
        labor_percentage: Decimal,
    },

    #[serde(rename_all = "camelCase")]
    Advanced {
        rooms: Vec<Room>,

        paint_quality: PaintQuality,

        #[serde(default = "default_coats")]
        coats: u32,

        #[serde(default)]
        sundries: Decimal,
    },
}

// --- Custos base ---

// O mínimo que todo orçamento carrega.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BaseCosts {
    #[serde(default)]
    #[schema(example = "1200.00")]
    pub labor: Decimal,

    #[serde(default)]
    #[schema(example = "380.00")]
    pub paint: Decimal,

    #[serde(default)]
    #[schema(example = "100.00")]
    pub supplies: Decimal,
}

// Versão completa gravada no orçamento (blob base_costs).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EnhancedBaseCosts {
    #[serde(flatten)]
    pub base: BaseCosts,

    #[serde(default)]
    pub door_trim_work: Decimal,

    #[serde(default)]
    pub baseboards: Decimal,

    #[serde(default)]
    pub sundries: Decimal,
}

impl EnhancedBaseCosts {
    // Invariante global: o subtotal é a soma de TODOS os custos itemizados.
    // finalPrice = subtotal * (1 + markup/100) é aplicado em cima disto.
    pub fn subtotal(&self) -> Decimal {
        self.base.labor
            + self.base.paint
            + self.base.supplies
            + self.door_trim_work
            + self.baseboards
            + self.sundries
    }
}

// --- O agregado ---

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    pub id: Uuid,

    #[schema(ignore)]
    pub tenant_id: Uuid,

    pub project_id: Uuid,

    // Numeração amigável por tenant ("Orçamento #42")
    #[schema(example = 42)]
    pub display_id: i32,

    #[schema(value_type = EnhancedBaseCosts)]
    pub base_costs: Json<EnhancedBaseCosts>,

    #[schema(example = "20.00")]
    pub markup_percentage: Decimal,

    #[schema(example = "2760.00")]
    pub final_price: Decimal,

    #[schema(value_type = QuoteDetails)]
    pub details: Json<QuoteDetails>,

    pub job_status: JobStatus,

    pub valid_until: Option<DateTime<Utc>>,

    // Token do link público de aceite do cliente
    pub share_token: Uuid,

    pub responded_at: Option<DateTime<Utc>>,

    // Preenchidos apenas após a conclusão do serviço
    pub actual_labor_cost: Option<Decimal>,
    pub actual_materials_cost: Option<Decimal>,
    pub actual_supplies_cost: Option<Decimal>,
    pub completion_notes: Option<String>,
    pub profit_loss: Option<Decimal>,
    pub completed_at: Option<DateTime<Utc>>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Quote {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.job_status == JobStatus::Quoted
            && self.valid_until.map(|v| v < now).unwrap_or(false)
    }

    pub fn display_status(&self, now: DateTime<Utc>) -> QuoteDisplayStatus {
        if self.is_expired(now) {
            return QuoteDisplayStatus::Expired;
        }
        match self.job_status {
            JobStatus::Quoted => QuoteDisplayStatus::Quoted,
            JobStatus::Accepted => QuoteDisplayStatus::Accepted,
            JobStatus::Denied => QuoteDisplayStatus::Denied,
            JobStatus::Completed => QuoteDisplayStatus::Completed,
        }
    }
}

// Resposta autenticada: o registro mais o status efetivo (com Expired).
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuoteView {
    #[serde(flatten)]
    pub quote: Quote,

    pub status: QuoteDisplayStatus,
}

impl QuoteView {
    pub fn new(quote: Quote, now: DateTime<Utc>) -> Self {
        let status = quote.display_status(now);
        Self { quote, status }
    }
}

// Projeção pública (link do cliente): sem markup, sem custos base,
// sem métricas internas. O cliente vê preço, validade e itens.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuotePublicView {
    pub display_id: i32,
    pub company_name: Option<String>,
    pub client_name: String,
    pub final_price: Decimal,
    pub status: QuoteDisplayStatus,
    pub valid_until: Option<DateTime<Utc>>,
    #[schema(value_type = QuoteDetails)]
    pub details: Json<QuoteDetails>,
    pub created_at: DateTime<Utc>,
}

// Trilha de auditoria de edições (gravada, nunca usada para detectar
// conflito: política atual é last-write-wins).
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuoteVersion {
    pub id: Uuid,

    pub quote_id: Uuid,

    #[schema(ignore)]
    pub tenant_id: Uuid,

    #[schema(value_type = Object)]
    pub snapshot: Json<serde_json::Value>,

    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn quoted_pode_ir_para_accepted_ou_denied() {
        assert!(JobStatus::Quoted.can_transition_to(JobStatus::Accepted));
        assert!(JobStatus::Quoted.can_transition_to(JobStatus::Denied));
        assert!(!JobStatus::Quoted.can_transition_to(JobStatus::Completed));
    }

    #[test]
    fn somente_accepted_conclui() {
        assert!(JobStatus::Accepted.can_transition_to(JobStatus::Completed));
        assert!(!JobStatus::Denied.can_transition_to(JobStatus::Completed));
        assert!(!JobStatus::Completed.can_transition_to(JobStatus::Accepted));
        assert!(!JobStatus::Denied.can_transition_to(JobStatus::Accepted));
    }

    #[test]
    fn qualquer_estado_reseta_para_quoted() {
        for status in [
            JobStatus::Quoted,
            JobStatus::Accepted,
            JobStatus::Denied,
            JobStatus::Completed,
        ] {
            assert!(status.can_transition_to(JobStatus::Quoted));
        }
    }

    fn quote_fixture(status: JobStatus, valid_until: Option<DateTime<Utc>>) -> Quote {
        let now = Utc::now();
        Quote {
            id: Uuid::new_v4(),
            tenant_id: Uuid::new_v4(),
            project_id: Uuid::new_v4(),
            display_id: 1,
            base_costs: Json(EnhancedBaseCosts::default()),
            markup_percentage: Decimal::ZERO,
            final_price: Decimal::ZERO,
            details: Json(QuoteDetails::Simple {
                surfaces: vec![],
                sundries: Decimal::ZERO,
                labor_percentage: Decimal::ZERO,
            }),
            job_status: status,
            valid_until,
            share_token: Uuid::new_v4(),
            responded_at: None,
            actual_labor_cost: None,
            actual_materials_cost: None,
            actual_supplies_cost: None,
            completion_notes: None,
            profit_loss: None,
            completed_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn expiracao_e_derivada_nunca_gravada() {
        let now = Utc::now();
        let vencido = quote_fixture(JobStatus::Quoted, Some(now - Duration::days(1)));

        // O status persistido continua Quoted; só a exibição muda.
        assert_eq!(vencido.job_status, JobStatus::Quoted);
        assert_eq!(vencido.display_status(now), QuoteDisplayStatus::Expired);

        let vigente = quote_fixture(JobStatus::Quoted, Some(now + Duration::days(30)));
        assert_eq!(vigente.display_status(now), QuoteDisplayStatus::Quoted);

        // Orçamento aceito não expira, mesmo com valid_until no passado.
        let aceito = quote_fixture(JobStatus::Accepted, Some(now - Duration::days(1)));
        assert_eq!(aceito.display_status(now), QuoteDisplayStatus::Accepted);
    }

    #[test]
    fn detalhes_desserializam_pela_etiqueta() {
        let json = serde_json::json!({
            "quoteMethod": "simple",
            "surfaces": [{
                "kind": "walls",
                "squareFootage": 500,
                "ratePerSqft": 3.0,
                "paintCostPerGallon": 26,
                "spreadRate": 350
            }],
            "sundries": 100,
            "laborPercentage": 30
        });

        let details: QuoteDetails = serde_json::from_value(json).unwrap();
        match details {
            QuoteDetails::Simple { surfaces, .. } => assert_eq!(surfaces.len(), 1),
            QuoteDetails::Advanced { .. } => panic!("etiqueta errada"),
        }
    }

    #[test]
    fn campos_numericos_ausentes_viram_zero() {
        // Coerção defensiva: entrada incompleta não derruba o cálculo.
        let json = serde_json::json!({ "kind": "ceilings" });
        let surface: Surface = serde_json::from_value(json).unwrap();
        assert_eq!(surface.square_footage, Decimal::ZERO);
        assert_eq!(surface.spread_rate, Decimal::ZERO);
    }

    #[test]
    fn subtotal_soma_todos_os_itens() {
        let costs = EnhancedBaseCosts {
            base: BaseCosts {
                labor: Decimal::from(1200),
                paint: Decimal::from(380),
                supplies: Decimal::from(100),
            },
            door_trim_work: Decimal::from(240),
            baseboards: Decimal::from(110),
            sundries: Decimal::from(70),
        };
        assert_eq!(costs.subtotal(), Decimal::from(2100));
    }
}
