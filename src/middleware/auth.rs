// src/middleware/auth.rs

use axum::{
    body::Body,
    extract::{FromRequestParts, State},
    http::{request::Parts, Request, StatusCode},
    middleware::Next,
    response::Response,
};

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{i18n::Locale, tenancy::TenantContext},
    models::auth::User,
};

// Guard de autenticação: valida o Bearer token e insere o usuário nos
// "extensions" da requisição para os extratores dos handlers.
pub async fn auth_guard(
    State(app_state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let locale = Locale::from_headers(request.headers());
    let user = authenticate(&app_state, &request, &locale).await?;

    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

// Guard de tenancy: além do token, exige o cabeçalho x-tenant-id e
// verifica o vínculo do usuário com a empresa antes de liberar a rota.
pub async fn tenant_guard(
    State(app_state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let locale = Locale::from_headers(request.headers());
    let user = authenticate(&app_state, &request, &locale).await?;

    let tenant_ctx = TenantContext::from_headers(request.headers())?;

    let is_member = app_state
        .tenant_repo
        .check_user_tenancy(user.id, tenant_ctx.0)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    if !is_member {
        return Err(AppError::TenantAccessDenied.to_api_error(&locale, &app_state.i18n_store));
    }

    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

async fn authenticate(
    app_state: &AppState,
    request: &Request<Body>,
    locale: &Locale,
) -> Result<User, ApiError> {
    let token = request
        .headers()
        .get("Authorization")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "));

    match token {
        Some(token) => app_state
            .auth_service
            .validate_token(token)
            .await
            .map_err(|e| e.to_api_error(locale, &app_state.i18n_store)),
        None => Err(AppError::InvalidToken.to_api_error(locale, &app_state.i18n_store)),
    }
}

// Extrator para obter o usuário autenticado diretamente nos handlers.
// Só funciona atrás de um dos guards acima.
pub struct AuthenticatedUser(pub User);

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<User>()
            .cloned()
            .map(AuthenticatedUser)
            .ok_or(ApiError {
                status: StatusCode::UNAUTHORIZED,
                message: "Token de autenticação inválido ou ausente.".to_string(),
            })
    }
}
