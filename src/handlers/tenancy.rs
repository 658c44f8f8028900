// src/handlers/tenancy.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{auth::AuthenticatedUser, i18n::Locale},
    models::tenancy::Tenant,
};

// O que o cliente precisa enviar para criar uma empresa
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCompanyPayload {
    #[validate(length(min = 1, message = "O nome da empresa é obrigatório."))]
    #[schema(example = "Pinturas Silva & Filhos")]
    pub name: String,

    pub description: Option<String>,
}

// POST /api/companies
#[utoipa::path(
    post,
    path = "/api/companies",
    tag = "Tenancy",
    request_body = CreateCompanyPayload,
    responses(
        (status = 201, description = "Empresa criada com configurações padrão", body = Tenant)
    ),
    security(("api_jwt" = []))
)]
pub async fn create_company(
    State(app_state): State<AppState>,
    locale: Locale,
    // Precisamos do usuário autenticado para torná-lo membro fundador
    user: AuthenticatedUser,
    Json(payload): Json<CreateCompanyPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    // Operação transacional: criar a empresa, vincular o usuário E
    // semear as configurações de preço.
    let new_company = app_state
        .tenancy_service
        .create_company(user.0.id, &payload.name, payload.description.as_deref())
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(new_company)))
}

// GET /api/companies
#[utoipa::path(
    get,
    path = "/api/companies",
    tag = "Tenancy",
    responses(
        (status = 200, description = "Empresas do usuário", body = Vec<Tenant>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_my_companies(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
) -> Result<impl IntoResponse, ApiError> {
    let companies = app_state
        .tenancy_service
        .list_user_companies(user.0.id)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(companies)))
}
