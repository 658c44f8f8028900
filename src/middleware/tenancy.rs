// src/middleware/tenancy.rs

use axum::{
    extract::FromRequestParts,
    http::{request::Parts, HeaderMap, StatusCode},
};
use uuid::Uuid;

use crate::common::error::ApiError; // Usamos o nosso ApiError para rejeição

// O nome do nosso cabeçalho HTTP customizado
const TENANT_ID_HEADER: &str = "x-tenant-id";

// O extrator de contexto de tenant: guarda o UUID da empresa que o
// usuário quer acessar. O vínculo usuário <-> empresa é verificado pelo
// tenant_guard (middleware/auth.rs); aqui só validamos o cabeçalho.
#[derive(Debug, Clone)]
pub struct TenantContext(pub Uuid);

impl TenantContext {
    pub fn from_headers(headers: &HeaderMap) -> Result<Self, ApiError> {
        let header_value = headers.get(TENANT_ID_HEADER).ok_or(ApiError {
            status: StatusCode::BAD_REQUEST,
            message: "O cabeçalho X-Tenant-ID é obrigatório.".to_string(),
        })?;

        let value_str = header_value.to_str().map_err(|_| ApiError {
            status: StatusCode::BAD_REQUEST,
            message: "Cabeçalho X-Tenant-ID contém caracteres inválidos.".to_string(),
        })?;

        let tenant_id = Uuid::parse_str(value_str).map_err(|_| ApiError {
            status: StatusCode::BAD_REQUEST,
            message: "Cabeçalho X-Tenant-ID inválido (não é um UUID).".to_string(),
        })?;

        Ok(TenantContext(tenant_id))
    }
}

impl<S> FromRequestParts<S> for TenantContext
where
    S: Send + Sync,
{
    // ApiError já implementa IntoResponse
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        TenantContext::from_headers(&parts.headers)
    }
}
