// src/services/surface_calculator.rs
//
// Calculadora do orçamento SIMPLES: preço por área pintada, materiais
// por galão e mão de obra como percentual do preço do projeto. Funções
// puras, síncronas, sem I/O; quem persiste é o quote_service.

use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;

use crate::models::quotes::{Surface, SurfaceKind};
use crate::services::pricing;

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SurfaceCalculation {
    pub kind: SurfaceKind,

    pub paint_product: Option<String>,

    #[schema(example = "500")]
    pub square_footage: Decimal,

    #[schema(example = "3.00")]
    pub rate_per_sqft: Decimal,

    #[schema(example = "2")]
    pub gallons_needed: Decimal,

    #[schema(example = "52.00")]
    pub paint_cost: Decimal,

    #[schema(example = "1500.00")]
    pub surface_total: Decimal,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SimpleQuoteBreakdown {
    pub surface_calculations: Vec<SurfaceCalculation>,

    #[schema(example = "1500.00")]
    pub total_project_price: Decimal,

    #[schema(example = "52.00")]
    pub total_materials_cost: Decimal,

    #[schema(example = "450.00")]
    pub labor_estimate: Decimal,

    #[schema(example = "100.00")]
    pub sundries: Decimal,

    #[schema(example = "898.00")]
    pub projected_profit: Decimal,
}

// Rendimento não positivo cai no padrão de 350 sqft/galão: divisão por
// zero em Decimal dá panic, então o clamp aqui é obrigatório.
fn effective_spread_rate(spread_rate: Decimal) -> Decimal {
    if spread_rate <= Decimal::ZERO {
        pricing::coverage_per_gallon()
    } else {
        spread_rate
    }
}

pub fn calculate_surface(surface: &Surface) -> SurfaceCalculation {
    let spread_rate = effective_spread_rate(surface.spread_rate);

    // gallonsNeeded = ceil(sqft / spreadRate); galão não se compra pela metade
    let gallons_needed = (surface.square_footage / spread_rate).ceil();
    let paint_cost = gallons_needed * surface.paint_cost_per_gallon;
    let surface_total = surface.square_footage * surface.rate_per_sqft;

    SurfaceCalculation {
        kind: surface.kind,
        paint_product: surface.paint_product.clone(),
        square_footage: surface.square_footage,
        rate_per_sqft: surface.rate_per_sqft,
        gallons_needed,
        paint_cost,
        surface_total,
    }
}

pub fn calculate_simple_quote(
    surfaces: &[Surface],
    sundries: Decimal,
    labor_percentage: Decimal,
) -> SimpleQuoteBreakdown {
    let surface_calculations: Vec<SurfaceCalculation> =
        surfaces.iter().map(calculate_surface).collect();

    let total_project_price: Decimal =
        surface_calculations.iter().map(|s| s.surface_total).sum();
    let total_materials_cost: Decimal =
        surface_calculations.iter().map(|s| s.paint_cost).sum();

    let labor_estimate = total_project_price * labor_percentage / Decimal::ONE_HUNDRED;
    let projected_profit =
        total_project_price - total_materials_cost - labor_estimate - sundries;

    SimpleQuoteBreakdown {
        surface_calculations,
        total_project_price,
        total_materials_cost,
        labor_estimate,
        sundries,
        projected_profit,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wall_surface(sqft: i64, spread_rate: i64) -> Surface {
        Surface {
            kind: SurfaceKind::Walls,
            square_footage: Decimal::from(sqft),
            rate_per_sqft: Decimal::from(3),
            paint_product: None,
            paint_cost_per_gallon: Decimal::from(26),
            spread_rate: Decimal::from(spread_rate),
        }
    }

    #[test]
    fn cenario_de_ponta_a_ponta_500_sqft() {
        // 500 sqft a 3.00/sqft, tinta 26/galão rendendo 350 sqft,
        // sundries 100 e mão de obra de 30%.
        let breakdown = calculate_simple_quote(
            &[wall_surface(500, 350)],
            Decimal::from(100),
            Decimal::from(30),
        );

        let surface = &breakdown.surface_calculations[0];
        assert_eq!(surface.gallons_needed, Decimal::from(2));
        assert_eq!(surface.paint_cost, Decimal::from(52));
        assert_eq!(surface.surface_total, Decimal::from(1500));

        assert_eq!(breakdown.total_project_price, Decimal::from(1500));
        assert_eq!(breakdown.total_materials_cost, Decimal::from(52));
        assert_eq!(breakdown.labor_estimate, Decimal::from(450));
        assert_eq!(breakdown.projected_profit, Decimal::from(898));
    }

    #[test]
    fn galoes_nao_diminuem_com_mais_area() {
        let mut anterior = Decimal::ZERO;
        for sqft in [0, 100, 349, 350, 351, 700, 701, 1400] {
            let atual = calculate_surface(&wall_surface(sqft, 350)).gallons_needed;
            assert!(atual >= anterior, "{} sqft regrediu", sqft);
            anterior = atual;
        }
    }

    #[test]
    fn galoes_nao_aumentam_com_rendimento_maior() {
        let mut anterior = Decimal::from(i64::MAX);
        for spread in [100, 200, 350, 500, 700] {
            let atual = calculate_surface(&wall_surface(700, spread)).gallons_needed;
            assert!(atual <= anterior, "rendimento {} regrediu", spread);
            anterior = atual;
        }
    }

    #[test]
    fn rendimento_zero_cai_no_padrao() {
        // spreadRate 0 não pode dividir; usa os 350 sqft/galão padrão.
        let calc = calculate_surface(&wall_surface(700, 0));
        assert_eq!(calc.gallons_needed, Decimal::from(2));
    }

    #[test]
    fn orcamento_sem_superficies_e_todo_zero_menos_sundries() {
        let breakdown =
            calculate_simple_quote(&[], Decimal::from(100), Decimal::from(30));
        assert_eq!(breakdown.total_project_price, Decimal::ZERO);
        assert_eq!(breakdown.labor_estimate, Decimal::ZERO);
        assert_eq!(breakdown.projected_profit, Decimal::from(-100));
    }

    #[test]
    fn superficies_somam_no_agregado() {
        let breakdown = calculate_simple_quote(
            &[wall_surface(500, 350), wall_surface(350, 350)],
            Decimal::ZERO,
            Decimal::ZERO,
        );
        // 1500 + 1050 de preço; 2 + 1 galões de 26.
        assert_eq!(breakdown.total_project_price, Decimal::from(2550));
        assert_eq!(breakdown.total_materials_cost, Decimal::from(78));
    }
}
