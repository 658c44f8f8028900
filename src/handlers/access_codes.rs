// src/handlers/access_codes.rs

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use validator::Validate;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::i18n::Locale,
    models::access_code::{AccessCode, CreateAccessCodePayload, RedeemAccessCodePayload, RedeemResponse},
};

const ADMIN_KEY_HEADER: &str = "x-admin-key";

// A gestão de códigos não usa o JWT de tenant: é protegida pela chave
// administrativa da configuração imutável. Sem ADMIN_API_KEY definida,
// as rotas ficam desligadas.
fn ensure_admin_key(
    app_state: &AppState,
    headers: &HeaderMap,
    locale: &Locale,
) -> Result<(), ApiError> {
    let provided = headers.get(ADMIN_KEY_HEADER).and_then(|v| v.to_str().ok());

    match (&app_state.config.admin_api_key, provided) {
        (Some(expected), Some(given)) if given == expected => Ok(()),
        _ => Err(AppError::AdminKeyInvalid.to_api_error(locale, &app_state.i18n_store)),
    }
}

// POST /api/access-codes
#[utoipa::path(
    post,
    path = "/api/access-codes",
    tag = "Access Codes",
    request_body = CreateAccessCodePayload,
    responses(
        (status = 201, description = "Código de acesso criado", body = AccessCode),
        (status = 401, description = "Chave administrativa inválida")
    ),
    params(
        ("x-admin-key" = String, Header, description = "Chave administrativa")
    )
)]
pub async fn create_access_code(
    State(app_state): State<AppState>,
    locale: Locale,
    headers: HeaderMap,
    Json(payload): Json<CreateAccessCodePayload>,
) -> Result<impl IntoResponse, ApiError> {
    ensure_admin_key(&app_state, &headers, &locale)?;

    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let code = app_state
        .access_code_service
        .create_code(
            &payload.code,
            &payload.company_name,
            payload.max_uses,
            payload.expires_at,
        )
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(code)))
}

// GET /api/access-codes
#[utoipa::path(
    get,
    path = "/api/access-codes",
    tag = "Access Codes",
    responses(
        (status = 200, description = "Todos os códigos, com contadores de uso", body = Vec<AccessCode>),
        (status = 401, description = "Chave administrativa inválida")
    ),
    params(
        ("x-admin-key" = String, Header, description = "Chave administrativa")
    )
)]
pub async fn list_access_codes(
    State(app_state): State<AppState>,
    locale: Locale,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ApiError> {
    ensure_admin_key(&app_state, &headers, &locale)?;

    let codes = app_state
        .access_code_service
        .list_codes()
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(codes)))
}

// POST /api/access-codes/redeem (rota pública)
#[utoipa::path(
    post,
    path = "/api/access-codes/redeem",
    tag = "Access Codes",
    request_body = RedeemAccessCodePayload,
    responses(
        (status = 201, description = "Usuário + empresa provisionados, token emitido", body = RedeemResponse),
        (status = 400, description = "Código inválido"),
        (status = 409, description = "Código esgotado ou e-mail já em uso"),
        (status = 410, description = "Código expirado")
    )
)]
pub async fn redeem_access_code(
    State(app_state): State<AppState>,
    locale: Locale,
    Json(payload): Json<RedeemAccessCodePayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let response = app_state
        .access_code_service
        .redeem(&payload.code, &payload.email, &payload.password)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(response)))
}
