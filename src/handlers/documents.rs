// src/handlers/documents.rs

use axum::{
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
};
use uuid::Uuid;

use crate::{
    common::{db_utils::get_rls_connection, error::ApiError},
    config::AppState,
    middleware::{auth::AuthenticatedUser, i18n::Locale, tenancy::TenantContext},
};

// GET /api/quotes/{quote_id}/pdf
#[utoipa::path(
    get,
    path = "/api/quotes/{quote_id}/pdf",
    tag = "Quotes",
    responses(
        (status = 200, description = "PDF do orçamento para envio ao cliente", content_type = "application/pdf"),
        (status = 404, description = "Orçamento não encontrado")
    ),
    params(
        ("quote_id" = Uuid, Path, description = "ID do Orçamento"),
        ("x-tenant-id" = Uuid, Header, description = "ID da Empresa")
    ),
    security(("api_jwt" = []))
)]
pub async fn generate_quote_pdf(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    tenant: TenantContext,
    Path(quote_id): Path<Uuid>,
) -> Result<Response, ApiError> {
    let mut rls_conn = get_rls_connection(&app_state, &tenant, &user)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let pdf_bytes = app_state
        .document_service
        .generate_quote_pdf(&mut *rls_conn, tenant.0, quote_id)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    // Headers para o navegador baixar o PDF
    let headers = [
        (header::CONTENT_TYPE, "application/pdf".to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"orcamento_{}.pdf\"", quote_id),
        ),
    ];

    Ok((headers, pdf_bytes).into_response())
}
