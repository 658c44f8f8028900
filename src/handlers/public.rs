// src/handlers/public.rs
//
// O link de aceite do cliente: rotas sem autenticação, chaveadas pelo
// share_token do orçamento. Só a projeção pública circula por aqui:
// nada de markup, custos base ou métricas internas.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    common::{db_utils::get_share_connection, error::ApiError},
    config::AppState,
    middleware::i18n::Locale,
    models::quotes::QuotePublicView,
};

#[derive(Debug, Clone, Copy, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum PublicDecision {
    Accept,
    Deny,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PublicDecisionPayload {
    #[schema(example = "accept")]
    pub decision: PublicDecision,
}

// GET /api/public/quotes/{share_token}
#[utoipa::path(
    get,
    path = "/api/public/quotes/{share_token}",
    tag = "Public",
    responses(
        (status = 200, description = "Visão do cliente: preço, validade e itens", body = QuotePublicView),
        (status = 404, description = "Link inválido")
    ),
    params(
        ("share_token" = Uuid, Path, description = "Token do link compartilhado")
    )
)]
pub async fn get_public_quote(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(share_token): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let mut share_conn = get_share_connection(&app_state, share_token)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let view = app_state
        .quote_service
        .public_view(&mut *share_conn, share_token)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(view)))
}

// POST /api/public/quotes/{share_token}/decision
#[utoipa::path(
    post,
    path = "/api/public/quotes/{share_token}/decision",
    tag = "Public",
    request_body = PublicDecisionPayload,
    responses(
        (status = 200, description = "Decisão registrada", body = QuotePublicView),
        (status = 409, description = "Orçamento já respondido"),
        (status = 410, description = "Orçamento expirado")
    ),
    params(
        ("share_token" = Uuid, Path, description = "Token do link compartilhado")
    )
)]
pub async fn decide_public_quote(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(share_token): Path<Uuid>,
    Json(payload): Json<PublicDecisionPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let mut share_conn = get_share_connection(&app_state, share_token)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let accepted = matches!(payload.decision, PublicDecision::Accept);

    let view = app_state
        .quote_service
        .public_decision(&mut *share_conn, share_token, accepted)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(view)))
}
