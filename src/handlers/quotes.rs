// src/handlers/quotes.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    common::{
        db_utils::get_rls_connection,
        error::ApiError,
    },
    config::AppState,
    middleware::{auth::AuthenticatedUser, i18n::Locale, tenancy::TenantContext},
    models::quotes::{JobStatus, QuoteDetails, QuoteVersion, QuoteView},
    services::{
        job_tracker::JobActuals,
        quote_service::{InternalMetricsView, JobCompletionView},
    },
};

// =============================================================================
//  PAYLOADS
// =============================================================================

fn default_markup() -> Decimal {
    Decimal::ZERO
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateQuotePayload {
    pub project_id: Uuid,

    // União etiquetada por quoteMethod: simple | advanced. O shape é
    // validado aqui na desserialização, não com optional-chaining depois.
    pub details: QuoteDetails,

    #[serde(default = "default_markup")]
    #[schema(example = "20.00")]
    pub markup_percentage: Decimal,

    pub valid_until: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateQuotePayload {
    pub details: QuoteDetails,

    #[serde(default = "default_markup")]
    pub markup_percentage: Decimal,

    pub valid_until: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TransitionStatusPayload {
    #[schema(example = "Accepted")]
    pub status: JobStatus,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecordActualsPayload {
    #[serde(flatten)]
    pub actuals: JobActuals,

    #[schema(example = "Obra fechada sem retrabalho")]
    pub notes: Option<String>,

    // true executa a transição terminal accepted -> completed
    #[serde(default, rename = "final")]
    #[schema(example = true)]
    pub finalize: bool,
}

// =============================================================================
//  CRUD
// =============================================================================

// POST /api/quotes
#[utoipa::path(
    post,
    path = "/api/quotes",
    tag = "Quotes",
    request_body = CreateQuotePayload,
    responses(
        (status = 201, description = "Orçamento criado (preço recalculado no servidor)", body = QuoteView),
        (status = 404, description = "Projeto não encontrado")
    ),
    params(
        ("x-tenant-id" = Uuid, Header, description = "ID da Empresa")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_quote(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    tenant: TenantContext,
    Json(payload): Json<CreateQuotePayload>,
) -> Result<impl IntoResponse, ApiError> {
    let mut rls_conn = get_rls_connection(&app_state, &tenant, &user)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let quote = app_state
        .quote_service
        .create_quote(
            &mut *rls_conn,
            tenant.0,
            payload.project_id,
            payload.details,
            payload.markup_percentage,
            payload.valid_until,
        )
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(quote)))
}

// GET /api/quotes
#[utoipa::path(
    get,
    path = "/api/quotes",
    tag = "Quotes",
    responses(
        (status = 200, description = "Orçamentos da empresa, com status efetivo (incl. expirado)", body = Vec<QuoteView>)
    ),
    params(
        ("x-tenant-id" = Uuid, Header, description = "ID da Empresa")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_quotes(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    tenant: TenantContext,
) -> Result<impl IntoResponse, ApiError> {
    let mut rls_conn = get_rls_connection(&app_state, &tenant, &user)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let quotes = app_state
        .quote_service
        .list_quotes(&mut *rls_conn, tenant.0)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(quotes)))
}

// GET /api/quotes/{quote_id}
#[utoipa::path(
    get,
    path = "/api/quotes/{quote_id}",
    tag = "Quotes",
    responses(
        (status = 200, description = "Orçamento com status efetivo", body = QuoteView),
        (status = 404, description = "Orçamento não encontrado")
    ),
    params(
        ("quote_id" = Uuid, Path, description = "ID do Orçamento"),
        ("x-tenant-id" = Uuid, Header, description = "ID da Empresa")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_quote(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    tenant: TenantContext,
    Path(quote_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let mut rls_conn = get_rls_connection(&app_state, &tenant, &user)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let quote = app_state
        .quote_service
        .get_quote(&mut *rls_conn, tenant.0, quote_id)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(quote)))
}

// PUT /api/quotes/{quote_id}
#[utoipa::path(
    put,
    path = "/api/quotes/{quote_id}",
    tag = "Quotes",
    request_body = UpdateQuotePayload,
    responses(
        (status = 200, description = "Orçamento reprecificado; versão anterior vai para a trilha de auditoria", body = QuoteView),
        (status = 404, description = "Orçamento não encontrado")
    ),
    params(
        ("quote_id" = Uuid, Path, description = "ID do Orçamento"),
        ("x-tenant-id" = Uuid, Header, description = "ID da Empresa")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_quote(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    tenant: TenantContext,
    Path(quote_id): Path<Uuid>,
    Json(payload): Json<UpdateQuotePayload>,
) -> Result<impl IntoResponse, ApiError> {
    let mut rls_conn = get_rls_connection(&app_state, &tenant, &user)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let quote = app_state
        .quote_service
        .update_quote(
            &mut *rls_conn,
            tenant.0,
            quote_id,
            payload.details,
            payload.markup_percentage,
            payload.valid_until,
        )
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(quote)))
}

// =============================================================================
//  CICLO DE VIDA
// =============================================================================

// POST /api/quotes/{quote_id}/status
#[utoipa::path(
    post,
    path = "/api/quotes/{quote_id}/status",
    tag = "Quotes",
    request_body = TransitionStatusPayload,
    responses(
        (status = 200, description = "Status alterado", body = QuoteView),
        (status = 409, description = "Transição inválida")
    ),
    params(
        ("quote_id" = Uuid, Path, description = "ID do Orçamento"),
        ("x-tenant-id" = Uuid, Header, description = "ID da Empresa")
    ),
    security(("api_jwt" = []))
)]
pub async fn transition_status(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    tenant: TenantContext,
    Path(quote_id): Path<Uuid>,
    Json(payload): Json<TransitionStatusPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let mut rls_conn = get_rls_connection(&app_state, &tenant, &user)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let quote = app_state
        .quote_service
        .transition_status(&mut *rls_conn, tenant.0, quote_id, payload.status)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(quote)))
}

// POST /api/quotes/{quote_id}/actuals
#[utoipa::path(
    post,
    path = "/api/quotes/{quote_id}/actuals",
    tag = "Quotes",
    request_body = RecordActualsPayload,
    responses(
        (status = 200, description = "Custos reais lançados; com final=true o serviço é concluído", body = JobCompletionView),
        (status = 409, description = "Orçamento ainda não aceito")
    ),
    params(
        ("quote_id" = Uuid, Path, description = "ID do Orçamento"),
        ("x-tenant-id" = Uuid, Header, description = "ID da Empresa")
    ),
    security(("api_jwt" = []))
)]
pub async fn record_actuals(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    tenant: TenantContext,
    Path(quote_id): Path<Uuid>,
    Json(payload): Json<RecordActualsPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let mut rls_conn = get_rls_connection(&app_state, &tenant, &user)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let completion = app_state
        .quote_service
        .record_actuals(
            &mut *rls_conn,
            tenant.0,
            quote_id,
            payload.actuals,
            payload.notes,
            payload.finalize,
        )
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(completion)))
}

// GET /api/quotes/{quote_id}/versions
#[utoipa::path(
    get,
    path = "/api/quotes/{quote_id}/versions",
    tag = "Quotes",
    responses(
        (status = 200, description = "Snapshots anteriores do orçamento (trilha de auditoria)", body = Vec<QuoteVersion>)
    ),
    params(
        ("quote_id" = Uuid, Path, description = "ID do Orçamento"),
        ("x-tenant-id" = Uuid, Header, description = "ID da Empresa")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_versions(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    tenant: TenantContext,
    Path(quote_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let mut rls_conn = get_rls_connection(&app_state, &tenant, &user)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let versions = app_state
        .quote_service
        .list_versions(&mut *rls_conn, tenant.0, quote_id)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(versions)))
}

// GET /api/quotes/{quote_id}/metrics
#[utoipa::path(
    get,
    path = "/api/quotes/{quote_id}/metrics",
    tag = "Quotes",
    responses(
        (status = 200, description = "Projeção de lucratividade interna (nunca exposta ao cliente)", body = InternalMetricsView),
        (status = 404, description = "Orçamento não encontrado")
    ),
    params(
        ("quote_id" = Uuid, Path, description = "ID do Orçamento"),
        ("x-tenant-id" = Uuid, Header, description = "ID da Empresa")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_internal_metrics(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    tenant: TenantContext,
    Path(quote_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let mut rls_conn = get_rls_connection(&app_state, &tenant, &user)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let metrics = app_state
        .quote_service
        .internal_metrics(&mut *rls_conn, tenant.0, quote_id)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(metrics)))
}
