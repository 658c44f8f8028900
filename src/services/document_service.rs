// src/services/document_service.rs

use genpdf::{elements, style, Element};
use image::Luma;
use qrcode::QrCode;
use rust_decimal::Decimal;
use sqlx::{Acquire, Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{ProjectRepository, QuoteRepository, SettingsRepository},
    models::quotes::{QuoteDetails, SurfaceKind},
    services::{room_calculator, surface_calculator},
};

#[derive(Clone)]
pub struct DocumentService {
    quote_repo: QuoteRepository,
    project_repo: ProjectRepository,
    settings_repo: SettingsRepository,
}

fn surface_label(kind: SurfaceKind) -> &'static str {
    match kind {
        SurfaceKind::Walls => "Paredes",
        SurfaceKind::Ceilings => "Tetos",
        SurfaceKind::Trim => "Acabamentos",
        SurfaceKind::Doors => "Portas",
        SurfaceKind::Baseboards => "Rodapés",
    }
}

impl DocumentService {
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

    pub async fn generate_quote_pdf<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        quote_id: Uuid,
    ) -> Result<Vec<u8>, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        // 1. Busca os dados
        let quote = self
            .quote_repo
            .find_by_id(&mut *tx, tenant_id, quote_id)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound(format!("Orçamento {}", quote_id)))?;

        let project = self
            .project_repo
            .find_by_id(&mut *tx, tenant_id, quote.project_id)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound("Projeto".to_string()))?;

        let settings = self.settings_repo.get_settings(&mut *tx, tenant_id).await?;

        tx.commit().await?;

        // 2. Configura o PDF (fonte carregada da pasta 'fonts/')
        let font_family = genpdf::fonts::from_files("./fonts", "Roboto", None).map_err(|_| {
            AppError::FontNotFound("Fonte não encontrada na pasta ./fonts".to_string())
        })?;

        let mut doc = genpdf::Document::new(font_family);
        doc.set_title(format!("Orçamento #{}", quote.display_id));
        let mut decorator = genpdf::SimplePageDecorator::new();
        decorator.set_margins(10);
        doc.set_page_decorator(decorator);

        // --- CABEÇALHO DA EMPRESA ---
        let title_text = settings
            .company_name
            .clone()
            .unwrap_or("PINCELPRO".to_string());
        doc.push(
            elements::Paragraph::new(title_text)
                .styled(style::Style::new().bold().with_font_size(18)),
        );

        if let Some(doc_num) = &settings.document_number {
            doc.push(
                elements::Paragraph::new(format!("CNPJ/CPF: {}", doc_num))
                    .styled(style::Style::new().with_font_size(10)),
            );
        }
        if let Some(phone) = &settings.phone {
            doc.push(
                elements::Paragraph::new(format!("Telefone: {}", phone))
                    .styled(style::Style::new().with_font_size(10)),
            );
        }

        doc.push(elements::Break::new(1.5));

        doc.push(
            elements::Paragraph::new(format!("ORÇAMENTO DE PINTURA #{}", quote.display_id))
                .styled(style::Style::new().bold().with_font_size(14)),
        );

        doc.push(elements::Paragraph::new(format!(
            "Data: {}",
            quote.created_at.format("%d/%m/%Y")
        )));
        doc.push(elements::Paragraph::new(format!(
            "Cliente: {}",
            project.client_name
        )));
        if let Some(address) = &project.address {
            doc.push(elements::Paragraph::new(format!("Obra: {}", address)));
        }
        if let Some(valid_until) = quote.valid_until {
            doc.push(elements::Paragraph::new(format!(
                "Válido até: {}",
                valid_until.format("%d/%m/%Y")
            )));
        }

        doc.push(elements::Break::new(2));

        // --- TABELA DE ITENS ---
        // Pesos das colunas: Item (4), Quantidade (2), Valor (2)
        let mut table = elements::TableLayout::new(vec![4, 2, 2]);
        table.set_cell_decorator(elements::FrameCellDecorator::new(true, true, false));

        let style_bold = style::Style::new().bold();
        table
            .row()
            .element(elements::Paragraph::new("Item").styled(style_bold))
            .element(elements::Paragraph::new("Medida").styled(style_bold))
            .element(elements::Paragraph::new("Valor").styled(style_bold))
            .push()
            .expect("Table error");

        // Rederiva o detalhamento dos mesmos detalhes gravados: o PDF
        // mostra exatamente o que foi cobrado.
        match &quote.details.0 {
            QuoteDetails::Simple {
                surfaces,
                sundries,
                labor_percentage,
            } => {
                let breakdown = surface_calculator::calculate_simple_quote(
                    surfaces,
                    *sundries,
                    *labor_percentage,
                );
                for calc in &breakdown.surface_calculations {
                    table
                        .row()
                        .element(elements::Paragraph::new(surface_label(calc.kind)))
                        .element(elements::Paragraph::new(format!(
                            "{} sqft",
                            calc.square_footage
                        )))
                        .element(elements::Paragraph::new(format!(
                            "R$ {:.2}",
                            calc.surface_total
                        )))
                        .push()
                        .expect("Table row error");
                }
                if *sundries > Decimal::ZERO {
                    table
                        .row()
                        .element(elements::Paragraph::new("Materiais de consumo"))
                        .element(elements::Paragraph::new("-"))
                        .element(elements::Paragraph::new(format!("R$ {:.2}", sundries)))
                        .push()
                        .expect("Table row error");
                }
            }
            QuoteDetails::Advanced {
                rooms,
                paint_quality,
                coats,
                sundries,
            } => {
                let params = room_calculator::AdvancedQuoteParams {
                    paint_cost_per_gallon: settings.paint_cost_for(*paint_quality),
                    labor_cost_per_hour: settings.labor_rate_per_hour,
                    baseboard_charge_method: settings.baseboard_charge_method,
                    baseboard_price_per_linear_foot: settings.baseboard_price_per_linear_foot,
                    supplies_base_cost: settings.supplies_base_cost,
                    sundries: *sundries,
                    coats: *coats,
                };
                let breakdown = room_calculator::calculate_advanced_quote(rooms, &params);
                for room in &breakdown.room_details {
                    table
                        .row()
                        .element(elements::Paragraph::new(room.name.clone()))
                        .element(elements::Paragraph::new(format!(
                            "{} sqft",
                            room.total_paint_area
                        )))
                        .element(elements::Paragraph::new(format!(
                            "R$ {:.2}",
                            room.room_total
                        )))
                        .push()
                        .expect("Table row error");
                }
                table
                    .row()
                    .element(elements::Paragraph::new("Suprimentos e consumíveis"))
                    .element(elements::Paragraph::new("-"))
                    .element(elements::Paragraph::new(format!(
                        "R$ {:.2}",
                        breakdown.base_costs.base.supplies + breakdown.base_costs.sundries
                    )))
                    .push()
                    .expect("Table row error");
            }
        }

        doc.push(table);
        doc.push(elements::Break::new(2));

        // --- TOTAL ---
        let mut total_paragraph =
            elements::Paragraph::new(format!("TOTAL: R$ {:.2}", quote.final_price));
        total_paragraph.set_alignment(genpdf::Alignment::Right);
        doc.push(total_paragraph.styled(style::Style::new().bold().with_font_size(12)));

        doc.push(elements::Break::new(2));

        // --- ÁREA DE PAGAMENTO (QR CODE) ---
        if let Some(key) = &settings.pix_key {
            doc.push(
                elements::Paragraph::new("PAGAMENTO VIA PIX")
                    .styled(style::Style::new().bold().with_font_size(12)),
            );
            doc.push(elements::Paragraph::new(format!("Chave: {}", key)));
            doc.push(elements::Break::new(1));

            // QR Code simples da chave. Para o "Pix Copia e Cola" oficial
            // (EMV BR Code) seria preciso uma lib de payload Pix.
            let code = QrCode::new(key.as_bytes())
                .map_err(|e| AppError::InternalServerError(anyhow::Error::msg(e.to_string())))?;

            let image_buffer = code.render::<Luma<u8>>().build();
            let dynamic_image = image::DynamicImage::ImageLuma8(image_buffer);

            let pdf_image = genpdf::elements::Image::from_dynamic_image(dynamic_image)
                .map_err(|e| AppError::InternalServerError(anyhow::Error::msg(e.to_string())))?
                .with_scale(genpdf::Scale::new(0.5, 0.5));

            doc.push(pdf_image);
        }

        // --- RODAPÉ ---
        if let Some(addr) = &settings.address {
            doc.push(elements::Break::new(2));
            doc.push(
                elements::Paragraph::new(addr.clone())
                    .styled(style::Style::new().italic().with_font_size(8)),
            );
        }

        // 3. Renderiza para buffer (memória)
        let mut buffer = Vec::new();
        doc.render(&mut buffer)
            .map_err(|e| AppError::InternalServerError(anyhow::Error::msg(e.to_string())))?;

        Ok(buffer)
    }
}
