// src/services/job_tracker.rs
//
// Fechamento de serviço: compara os custos reais lançados com o
// orçamento original e fecha as contas (lucro/prejuízo, margem e
// variância por categoria). Função pura; a transição de status e a
// persistência ficam no quote_service.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::quotes::EnhancedBaseCosts;

// Custos reais lançados pelo contratante ao fechar o serviço.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct JobActuals {
    #[serde(default)]
    #[schema(example = "1000.00")]
    pub labor_cost: Decimal,

    #[serde(default)]
    #[schema(example = "410.00")]
    pub materials_cost: Decimal,

    #[serde(default)]
    #[schema(example = "90.00")]
    pub supplies_cost: Decimal,
}

// Variância = estimado − real; positiva significa abaixo do orçado.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CostVariance {
    #[schema(example = "200.00")]
    pub labor: Decimal,

    #[schema(example = "-30.00")]
    pub materials: Decimal,

    #[schema(example = "80.00")]
    pub supplies: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct JobSummary {
    #[schema(example = "1500.00")]
    pub total_actual_costs: Decimal,

    #[schema(example = "1260.00")]
    pub profit_loss: Decimal,

    #[schema(example = "45.65")]
    pub profit_margin: Decimal,

    pub variance: CostVariance,
}

pub fn summarize_job(
    final_price: Decimal,
    estimated: &EnhancedBaseCosts,
    actuals: &JobActuals,
) -> JobSummary {
    let total_actual_costs = actuals.labor_cost + actuals.materials_cost + actuals.supplies_cost;
    let profit_loss = final_price - total_actual_costs;

    let profit_margin = if final_price == Decimal::ZERO {
        Decimal::ZERO
    } else {
        profit_loss / final_price * Decimal::ONE_HUNDRED
    };

    // Categorias reais <-> estimadas: mão de obra com mão de obra, tinta
    // com materiais, e supplies cobre supplies + sundries (porta/rodapé
    // são escopo da obra, não categoria acompanhada).
    let variance = CostVariance {
        labor: estimated.base.labor - actuals.labor_cost,
        materials: estimated.base.paint - actuals.materials_cost,
        supplies: estimated.base.supplies + estimated.sundries - actuals.supplies_cost,
    };

    JobSummary {
        total_actual_costs,
        profit_loss,
        profit_margin,
        variance,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::quotes::BaseCosts;

    fn estimated() -> EnhancedBaseCosts {
        EnhancedBaseCosts {
            base: BaseCosts {
                labor: Decimal::from(1200),
                paint: Decimal::from(380),
                supplies: Decimal::from(100),
            },
            door_trim_work: Decimal::from(240),
            baseboards: Decimal::from(110),
            sundries: Decimal::from(70),
        }
    }

    fn actuals() -> JobActuals {
        JobActuals {
            labor_cost: Decimal::from(1000),
            materials_cost: Decimal::from(410),
            supplies_cost: Decimal::from(90),
        }
    }

    #[test]
    fn variancia_positiva_e_abaixo_do_orcado() {
        // Mão de obra estimada em 1200 e realizada em 1000: +200.
        let summary = summarize_job(Decimal::from(2760), &estimated(), &actuals());
        assert_eq!(summary.variance.labor, Decimal::from(200));
        // Tinta estourou em 30.
        assert_eq!(summary.variance.materials, Decimal::from(-30));
        // Supplies estimados = supplies + sundries = 170; gastos 90.
        assert_eq!(summary.variance.supplies, Decimal::from(80));
    }

    #[test]
    fn lucro_e_margem_contra_o_preco_fechado() {
        let summary = summarize_job(Decimal::from(2760), &estimated(), &actuals());
        assert_eq!(summary.total_actual_costs, Decimal::from(1500));
        assert_eq!(summary.profit_loss, Decimal::from(1260));
        assert_eq!(
            summary.profit_margin,
            Decimal::from(1260) / Decimal::from(2760) * Decimal::ONE_HUNDRED
        );
    }

    #[test]
    fn preco_zero_nao_divide() {
        let summary = summarize_job(Decimal::ZERO, &estimated(), &actuals());
        assert_eq!(summary.profit_margin, Decimal::ZERO);
        assert_eq!(summary.profit_loss, Decimal::from(-1500));
    }

    #[test]
    fn mesmo_lancamento_duas_vezes_da_o_mesmo_resultado() {
        // Lançar os custos reais de novo com os mesmos valores não pode
        // mudar nada: o resumo é função só das entradas.
        let primeira = summarize_job(Decimal::from(2760), &estimated(), &actuals());
        let segunda = summarize_job(Decimal::from(2760), &estimated(), &actuals());
        assert_eq!(primeira, segunda);
    }
}
