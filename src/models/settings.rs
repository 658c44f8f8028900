// src/models/settings.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::quotes::SurfaceKind;

// Faixa de qualidade da tinta escolhida no orçamento avançado.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum PaintQuality {
    Good,
    Better,
    Best,
}

// Como o rodapé é cobrado: por pé linear ou já embutido no preço.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "baseboard_charge", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "snake_case")]
pub enum BaseboardChargeMethod {
    LinearFoot,
    Included,
}

// Configuração de preços por tenant. Criada com padrões no onboarding,
// alterada pela tela de configurações, nunca apagada (o upsert supersede).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CostSettings {
    #[schema(ignore)] // O contexto (header x-tenant-id) já define a empresa
    pub tenant_id: Uuid,

    // --- Apresentação (cabeçalho do PDF, contato) ---
    #[schema(example = "Pinturas Silva & Filhos")]
    pub company_name: Option<String>,

    #[schema(example = "12.345.678/0001-99")]
    pub document_number: Option<String>,

    #[schema(example = "Rua das Tintas, 123 - Centro")]
    pub address: Option<String>,

    #[schema(example = "(11) 99999-8888")]
    pub phone: Option<String>,

    #[schema(example = "contato@pinturassilva.com")]
    pub email: Option<String>,

    #[schema(example = "12.345.678/0001-99")]
    pub pix_key: Option<String>,

    // --- Mão de obra ---
    #[schema(example = "45.00")]
    pub labor_rate_per_hour: Decimal,

    // Percentual do preço do projeto estimado como mão de obra (orçamento simples)
    #[schema(example = "30.00")]
    pub labor_percentage: Decimal,

    // --- Tinta por galão, por faixa de qualidade ---
    #[schema(example = "26.00")]
    pub paint_cost_good: Decimal,

    #[schema(example = "38.00")]
    pub paint_cost_better: Decimal,

    #[schema(example = "55.00")]
    pub paint_cost_best: Decimal,

    #[schema(example = "100.00")]
    pub supplies_base_cost: Decimal,

    #[schema(example = "120.00")]
    pub door_unit_price: Decimal,

    pub baseboard_charge_method: BaseboardChargeMethod,

    #[schema(example = "2.50")]
    pub baseboard_price_per_linear_foot: Decimal,

    // --- Taxas padrão por superfície (orçamento simples) ---
    #[schema(example = "3.00")]
    pub rate_walls: Decimal,

    #[schema(example = "2.50")]
    pub rate_ceilings: Decimal,

    #[schema(example = "1.50")]
    pub rate_trim: Decimal,

    #[schema(example = "75.00")]
    pub rate_doors: Decimal,

    #[schema(example = "2.00")]
    pub rate_baseboards: Decimal,

    pub updated_at: DateTime<Utc>,
}

impl CostSettings {
    // Mesmos padrões da migração: um tenant sem linha gravada se comporta
    // exatamente como um recém-criado.
    pub fn defaults_for(tenant_id: Uuid) -> Self {
        Self {
            tenant_id,
            company_name: None,
            document_number: None,
            address: None,
            phone: None,
            email: None,
            pix_key: None,
            labor_rate_per_hour: Decimal::new(4500, 2),
            labor_percentage: Decimal::new(3000, 2),
            paint_cost_good: Decimal::new(2600, 2),
            paint_cost_better: Decimal::new(3800, 2),
            paint_cost_best: Decimal::new(5500, 2),
            supplies_base_cost: Decimal::new(10000, 2),
            door_unit_price: Decimal::new(12000, 2),
            baseboard_charge_method: BaseboardChargeMethod::LinearFoot,
            baseboard_price_per_linear_foot: Decimal::new(250, 2),
            rate_walls: Decimal::new(300, 2),
            rate_ceilings: Decimal::new(250, 2),
            rate_trim: Decimal::new(150, 2),
            rate_doors: Decimal::new(7500, 2),
            rate_baseboards: Decimal::new(200, 2),
            updated_at: Utc::now(),
        }
    }

    pub fn paint_cost_for(&self, quality: PaintQuality) -> Decimal {
        match quality {
            PaintQuality::Good => self.paint_cost_good,
            PaintQuality::Better => self.paint_cost_better,
            PaintQuality::Best => self.paint_cost_best,
        }
    }

    pub fn default_rate_for(&self, kind: SurfaceKind) -> Decimal {
        match kind {
            SurfaceKind::Walls => self.rate_walls,
            SurfaceKind::Ceilings => self.rate_ceilings,
            SurfaceKind::Trim => self.rate_trim,
            SurfaceKind::Doors => self.rate_doors,
            SurfaceKind::Baseboards => self.rate_baseboards,
        }
    }

    // Merge parcial vindo da tela de configurações: campo ausente mantém
    // o valor atual.
    pub fn apply(&mut self, input: UpdateSettingsPayload) {
        if let Some(v) = input.company_name {
            self.company_name = Some(v);
        }
        if let Some(v) = input.document_number {
            self.document_number = Some(v);
        }
        if let Some(v) = input.address {
            self.address = Some(v);
        }
        if let Some(v) = input.phone {
            self.phone = Some(v);
        }
        if let Some(v) = input.email {
            self.email = Some(v);
        }
        if let Some(v) = input.pix_key {
            self.pix_key = Some(v);
        }
        if let Some(v) = input.labor_rate_per_hour {
            self.labor_rate_per_hour = v;
        }
        if let Some(v) = input.labor_percentage {
            self.labor_percentage = v;
        }
        if let Some(v) = input.paint_cost_good {
            self.paint_cost_good = v;
        }
        if let Some(v) = input.paint_cost_better {
            self.paint_cost_better = v;
        }
        if let Some(v) = input.paint_cost_best {
            self.paint_cost_best = v;
        }
        if let Some(v) = input.supplies_base_cost {
            self.supplies_base_cost = v;
        }
        if let Some(v) = input.door_unit_price {
            self.door_unit_price = v;
        }
        if let Some(v) = input.baseboard_charge_method {
            self.baseboard_charge_method = v;
        }
        if let Some(v) = input.baseboard_price_per_linear_foot {
            self.baseboard_price_per_linear_foot = v;
        }
        if let Some(v) = input.rate_walls {
            self.rate_walls = v;
        }
        if let Some(v) = input.rate_ceilings {
            self.rate_ceilings = v;
        }
        if let Some(v) = input.rate_trim {
            self.rate_trim = v;
        }
        if let Some(v) = input.rate_doors {
            self.rate_doors = v;
        }
        if let Some(v) = input.rate_baseboards {
            self.rate_baseboards = v;
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSettingsPayload {
    #[schema(example = "Pinturas Silva & Filhos")]
    pub company_name: Option<String>,

    #[schema(example = "12.345.678/0001-99")]
    pub document_number: Option<String>,

    pub address: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub pix_key: Option<String>,

    pub labor_rate_per_hour: Option<Decimal>,
    pub labor_percentage: Option<Decimal>,

    pub paint_cost_good: Option<Decimal>,
    pub paint_cost_better: Option<Decimal>,
    pub paint_cost_best: Option<Decimal>,

    pub supplies_base_cost: Option<Decimal>,
    pub door_unit_price: Option<Decimal>,

    pub baseboard_charge_method: Option<BaseboardChargeMethod>,
    pub baseboard_price_per_linear_foot: Option<Decimal>,

    pub rate_walls: Option<Decimal>,
    pub rate_ceilings: Option<Decimal>,
    pub rate_trim: Option<Decimal>,
    pub rate_doors: Option<Decimal>,
    pub rate_baseboards: Option<Decimal>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload_vazio() -> UpdateSettingsPayload {
        UpdateSettingsPayload {
            company_name: None,
            document_number: None,
            address: None,
            phone: None,
            email: None,
            pix_key: None,
            labor_rate_per_hour: None,
            labor_percentage: None,
            paint_cost_good: None,
            paint_cost_better: None,
            paint_cost_best: None,
            supplies_base_cost: None,
            door_unit_price: None,
            baseboard_charge_method: None,
            baseboard_price_per_linear_foot: None,
            rate_walls: None,
            rate_ceilings: None,
            rate_trim: None,
            rate_doors: None,
            rate_baseboards: None,
        }
    }

    #[test]
    fn apply_mantem_o_que_nao_veio() {
        let mut settings = CostSettings::defaults_for(Uuid::new_v4());

        let mut input = payload_vazio();
        input.company_name = Some("Pinturas Teste".into());
        input.labor_rate_per_hour = Some(Decimal::new(6000, 2));
        input.baseboard_charge_method = Some(BaseboardChargeMethod::Included);
        settings.apply(input);

        assert_eq!(settings.company_name.as_deref(), Some("Pinturas Teste"));
        assert_eq!(settings.labor_rate_per_hour, Decimal::new(6000, 2));
        assert_eq!(
            settings.baseboard_charge_method,
            BaseboardChargeMethod::Included
        );
        // Não alterados:
        assert_eq!(settings.labor_percentage, Decimal::new(3000, 2));
        assert_eq!(settings.paint_cost_good, Decimal::new(2600, 2));
    }

    #[test]
    fn preco_da_tinta_por_faixa() {
        let settings = CostSettings::defaults_for(Uuid::new_v4());
        assert_eq!(
            settings.paint_cost_for(PaintQuality::Good),
            Decimal::new(2600, 2)
        );
        assert_eq!(
            settings.paint_cost_for(PaintQuality::Best),
            Decimal::new(5500, 2)
        );
    }
}
