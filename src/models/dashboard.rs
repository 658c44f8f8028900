// src/models/dashboard.rs

use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;

// Resumo gerencial do contratante. "expired" aqui é derivado de
// valid_until na própria consulta, nunca de um status gravado.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    #[schema(example = 4)]
    pub quoted_count: i64,

    #[schema(example = 2)]
    pub accepted_count: i64,

    #[schema(example = 1)]
    pub denied_count: i64,

    #[schema(example = 3)]
    pub completed_count: i64,

    #[schema(example = 1)]
    pub expired_count: i64,

    // Valor somado dos orçamentos em aberto (quoted, não expirados)
    #[schema(example = "8400.00")]
    pub open_quoted_value: Decimal,

    // Percentual de aceites entre os orçamentos já respondidos
    #[schema(example = "83.33")]
    pub acceptance_rate: Decimal,

    // Lucro/prejuízo real somado dos serviços concluídos
    #[schema(example = "3120.00")]
    pub realized_profit: Decimal,
}
