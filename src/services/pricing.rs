// src/services/pricing.rs
//
// Constantes de negócio e as duas operações transversais de preço
// (markup e métricas internas). As heurísticas de cobertura e projeção
// vivem SÓ aqui: os calculadores importam daqui, nunca redeclaram.

use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;

use crate::models::quotes::EnhancedBaseCosts;

// Rendimento padrão da tinta: pés quadrados cobertos por um galão.
pub const COVERAGE_SQFT_PER_GALLON: u32 = 350;

// Horas de mão de obra por unidade de cobertura (350 sqft = 4 horas).
pub const LABOR_HOURS_PER_COVERAGE: u32 = 4;

// Área fixa descontada da parede por porta e por janela.
pub const DOOR_AREA_SQFT: u32 = 20;
pub const WINDOW_AREA_SQFT: u32 = 15;

// Portas pintadas com um galão.
pub const DOORS_PER_GALLON: u32 = 4;

pub fn coverage_per_gallon() -> Decimal {
    Decimal::from(COVERAGE_SQFT_PER_GALLON)
}

// Heurística de projeção de mão de obra: 30% do subtotal de custos.
pub fn projected_labor_ratio() -> Decimal {
    Decimal::new(30, 2)
}

// Margem projetada mínima antes do alerta interno.
fn minimum_margin_percentage() -> Decimal {
    Decimal::from(10)
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MarkupResult {
    pub final_price: Decimal,
    pub profit: Decimal,
}

// finalPrice = base × (1 + markup/100); profit = finalPrice − base.
// Base negativa passa direto, sem clamp: a validação fica na borda da API.
pub fn apply_markup(base_cost: Decimal, markup_percentage: Decimal) -> MarkupResult {
    let final_price = base_cost * (Decimal::ONE + markup_percentage / Decimal::ONE_HUNDRED);
    MarkupResult {
        final_price,
        profit: final_price - base_cost,
    }
}

// Projeção de lucratividade exclusiva do contratante, nunca exibida ao
// cliente final.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InternalMetrics {
    pub subtotal: Decimal,
    pub material_costs: Decimal,
    pub final_price: Decimal,
    pub net_revenue: Decimal,
    pub projected_labour: Decimal,
    pub projected_profit: Decimal,
}

// A mão de obra desta projeção é SÓ a heurística de 30%: o valor digitado
// no campo labor fica fora da base, de modo que mexer nele não desloca a
// projeção. Os demais custos itemizados entram todos.
pub fn add_internal_metrics(
    costs: &EnhancedBaseCosts,
    markup_percentage: Decimal,
) -> InternalMetrics {
    let subtotal = costs.subtotal() - costs.base.labor;
    let material_costs = costs.base.paint + costs.sundries;

    let MarkupResult { final_price, .. } = apply_markup(subtotal, markup_percentage);

    let net_revenue = subtotal - material_costs;
    let projected_labour = subtotal * projected_labor_ratio();
    let projected_profit = net_revenue - projected_labour;

    InternalMetrics {
        subtotal,
        material_costs,
        final_price,
        net_revenue,
        projected_labour,
        projected_profit,
    }
}

// Alertas consultivos sobre a projeção. Nunca bloqueiam nada: a tela do
// contratante decide como exibir.
pub fn metric_warnings(metrics: &InternalMetrics) -> Vec<String> {
    let mut warnings = Vec::new();

    if metrics.projected_profit <= Decimal::ZERO {
        warnings.push("Lucro projetado menor ou igual a zero.".to_string());
    }

    if metrics.net_revenue < metrics.projected_labour {
        warnings.push("Receita líquida abaixo da mão de obra projetada.".to_string());
    }

    let margin = if metrics.final_price == Decimal::ZERO {
        Decimal::ZERO
    } else {
        metrics.projected_profit / metrics.final_price * Decimal::ONE_HUNDRED
    };
    if margin < minimum_margin_percentage() {
        warnings.push("Margem projetada abaixo de 10%.".to_string());
    }

    warnings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::quotes::BaseCosts;

    fn base_costs(labor: i64, paint: i64, supplies: i64, sundries: i64) -> EnhancedBaseCosts {
        EnhancedBaseCosts {
            base: BaseCosts {
                labor: Decimal::from(labor),
                paint: Decimal::from(paint),
                supplies: Decimal::from(supplies),
            },
            door_trim_work: Decimal::ZERO,
            baseboards: Decimal::ZERO,
            sundries: Decimal::from(sundries),
        }
    }

    #[test]
    fn markup_de_20_sobre_2300() {
        let result = apply_markup(Decimal::from(2300), Decimal::from(20));
        assert_eq!(result.final_price, Decimal::from(2760));
        assert_eq!(result.profit, Decimal::from(460));
    }

    #[test]
    fn markup_zero_e_identidade() {
        for base in [Decimal::ZERO, Decimal::from(1500), Decimal::new(-30050, 2)] {
            let result = apply_markup(base, Decimal::ZERO);
            assert_eq!(result.final_price, base);
            assert_eq!(result.profit, Decimal::ZERO);
        }
    }

    #[test]
    fn lucro_e_sempre_preco_menos_base() {
        let cases = [
            (Decimal::from(100), Decimal::from(15)),
            (Decimal::from(2300), Decimal::from(20)),
            (Decimal::new(99999, 2), Decimal::new(725, 2)),
            // Base negativa passa direto, sem clamp.
            (Decimal::from(-500), Decimal::from(10)),
        ];
        for (base, markup) in cases {
            let result = apply_markup(base, markup);
            assert_eq!(result.profit, result.final_price - base);
        }
    }

    #[test]
    fn projecao_de_mao_de_obra_e_exatamente_30_por_cento() {
        let metrics = add_internal_metrics(&base_costs(800, 380, 100, 70), Decimal::from(20));
        assert_eq!(metrics.projected_labour, metrics.subtotal * Decimal::new(30, 2));
    }

    #[test]
    fn mudar_o_labor_digitado_nao_mexe_na_projecao() {
        // Tinta e sundries fixos; só o labor varia entre os dois cenários.
        let a = add_internal_metrics(&base_costs(500, 380, 100, 70), Decimal::from(20));
        let b = add_internal_metrics(&base_costs(5000, 380, 100, 70), Decimal::from(20));

        assert_eq!(a.projected_labour, b.projected_labour);
        assert_eq!(a.projected_profit, b.projected_profit);
    }

    #[test]
    fn custos_de_material_sao_tinta_mais_sundries() {
        let metrics = add_internal_metrics(&base_costs(800, 380, 100, 70), Decimal::ZERO);
        assert_eq!(metrics.material_costs, Decimal::from(450));
        assert_eq!(metrics.net_revenue, metrics.subtotal - Decimal::from(450));
    }

    #[test]
    fn alertas_de_projecao_ruim() {
        // Tudo é material: receita líquida zero, lucro projetado negativo.
        let metrics = add_internal_metrics(&base_costs(0, 1000, 0, 0), Decimal::ZERO);
        let warnings = metric_warnings(&metrics);

        assert_eq!(warnings.len(), 3);
        assert!(warnings[0].contains("Lucro projetado"));
    }

    #[test]
    fn projecao_saudavel_nao_gera_alerta() {
        // Base majoritariamente de serviço: margem folgada.
        let metrics = add_internal_metrics(&base_costs(0, 100, 900, 0), Decimal::from(30));
        assert!(metric_warnings(&metrics).is_empty());
    }
}
