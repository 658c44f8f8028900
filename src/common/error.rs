// src/common/error.rs

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::common::i18n::I18nStore;
use crate::middleware::i18n::Locale;
use crate::models::quotes::JobStatus;

// Nosso tipo de erro de domínio, com `thiserror` para melhor ergonomia.
// As mensagens aqui são para o log; a mensagem do cliente sai localizada
// via `to_api_error`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("E-mail já existe")]
    EmailAlreadyExists,

    #[error("Credenciais inválidas")]
    InvalidCredentials,

    #[error("Token inválido")]
    InvalidToken,

    #[error("Usuário não encontrado")]
    UserNotFound,

    #[error("Usuário sem vínculo com a empresa")]
    TenantAccessDenied,

    #[error("Recurso não encontrado: {0}")]
    ResourceNotFound(String),

    #[error("Transição de status inválida: {from:?} -> {to:?}")]
    InvalidStatusTransition { from: JobStatus, to: JobStatus },

    #[error("Orçamento expirado")]
    QuoteExpired,

    #[error("Orçamento já respondido pelo cliente")]
    QuoteAlreadyResponded,

    #[error("Orçamento ainda não aceito")]
    QuoteNotAccepted,

    #[error("Código de acesso inválido")]
    AccessCodeInvalid,

    #[error("Código de acesso esgotado")]
    AccessCodeExhausted,

    #[error("Código de acesso expirado")]
    AccessCodeExpired,

    #[error("Chave administrativa inválida")]
    AdminKeyInvalid,

    #[error("Fonte não encontrada: {0}")]
    FontNotFound(String),

    #[error("Violação de unicidade: {0}")]
    UniqueConstraintViolation(String),

    // Variante para erros de banco de dados
    #[error("Erro de banco de dados")]
    DatabaseError(#[from] sqlx::Error),

    // Variante genérica para qualquer outro erro inesperado.
    // `anyhow::Error` é ótimo para capturar o contexto do erro.
    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Erro de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

// O erro que atravessa a borda HTTP: status + mensagem já localizada.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(json!({ "error": self.message }));
        (self.status, body).into_response()
    }
}

impl AppError {
    // Converte para a borda HTTP com a mensagem no idioma do cliente.
    // Erros 5xx são logados aqui com o detalhe completo; o cliente só
    // recebe a mensagem genérica.
    pub fn to_api_error(&self, locale: &Locale, store: &I18nStore) -> ApiError {
        let lang = locale.0.as_str();

        let (status, key) = match self {
            AppError::ValidationError(_) => (StatusCode::BAD_REQUEST, "validation.invalid_fields"),
            AppError::EmailAlreadyExists => (StatusCode::CONFLICT, "auth.email_exists"),
            AppError::InvalidCredentials => (StatusCode::UNAUTHORIZED, "auth.invalid_credentials"),
            AppError::InvalidToken => (StatusCode::UNAUTHORIZED, "auth.invalid_token"),
            AppError::UserNotFound => (StatusCode::NOT_FOUND, "auth.user_not_found"),
            AppError::TenantAccessDenied => (StatusCode::FORBIDDEN, "tenancy.access_denied"),
            AppError::ResourceNotFound(_) => (StatusCode::NOT_FOUND, "resource.not_found"),
            AppError::InvalidStatusTransition { .. } => {
                (StatusCode::CONFLICT, "quote.invalid_transition")
            }
            AppError::QuoteExpired => (StatusCode::GONE, "quote.expired"),
            AppError::QuoteAlreadyResponded => (StatusCode::CONFLICT, "quote.already_responded"),
            AppError::QuoteNotAccepted => (StatusCode::CONFLICT, "quote.not_accepted"),
            AppError::AccessCodeInvalid => (StatusCode::BAD_REQUEST, "access_code.invalid"),
            AppError::AccessCodeExhausted => (StatusCode::CONFLICT, "access_code.exhausted"),
            AppError::AccessCodeExpired => (StatusCode::GONE, "access_code.expired"),
            AppError::AdminKeyInvalid => (StatusCode::UNAUTHORIZED, "admin.key_invalid"),
            AppError::UniqueConstraintViolation(_) => (StatusCode::CONFLICT, "db.unique_violation"),
            AppError::FontNotFound(detail) => {
                tracing::error!("Fonte do PDF ausente: {}", detail);
                (StatusCode::INTERNAL_SERVER_ERROR, "pdf.font_missing")
            }
            // Todos os outros viram 500. O detalhe fica no log do servidor.
            e => {
                tracing::error!("Erro Interno do Servidor: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "internal.unexpected")
            }
        };

        let mut message = store.translate(lang, key);
        if let AppError::ResourceNotFound(name) = self {
            message = format!("{}: {}", message, name);
        }

        ApiError { status, message }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_http_por_variante() {
        let store = I18nStore::new();
        let locale = Locale("pt".to_string());

        let cases = [
            (AppError::InvalidCredentials, StatusCode::UNAUTHORIZED),
            (AppError::EmailAlreadyExists, StatusCode::CONFLICT),
            (AppError::QuoteExpired, StatusCode::GONE),
            (AppError::TenantAccessDenied, StatusCode::FORBIDDEN),
            (AppError::AccessCodeExhausted, StatusCode::CONFLICT),
        ];

        for (err, expected) in cases {
            assert_eq!(err.to_api_error(&locale, &store).status, expected);
        }
    }

    #[test]
    fn recurso_nao_encontrado_carrega_o_nome() {
        let store = I18nStore::new();
        let locale = Locale("en".to_string());

        let api = AppError::ResourceNotFound("Quote 42".to_string()).to_api_error(&locale, &store);
        assert_eq!(api.status, StatusCode::NOT_FOUND);
        assert!(api.message.contains("Quote 42"));
    }
}
