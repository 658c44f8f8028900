// src/models/projects.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

// O registro do cliente/obra. Todo orçamento pertence a exatamente um
// projeto, e o projeto a exatamente uma empresa.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: Uuid,

    #[schema(ignore)]
    pub tenant_id: Uuid,

    #[schema(example = "Maria Oliveira")]
    pub client_name: String,

    #[schema(example = "maria@exemplo.com")]
    pub client_email: Option<String>,

    #[schema(example = "(11) 98888-7777")]
    pub client_phone: Option<String>,

    // Endereço da obra
    #[schema(example = "Av. das Acácias, 400 - apto 72")]
    pub address: Option<String>,

    pub notes: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateProjectPayload {
    #[validate(length(min = 1, message = "O nome do cliente é obrigatório."))]
    #[schema(example = "Maria Oliveira")]
    pub client_name: String,

    #[validate(email(message = "O e-mail fornecido é inválido."))]
    #[schema(example = "maria@exemplo.com")]
    pub client_email: Option<String>,

    pub client_phone: Option<String>,

    pub address: Option<String>,

    pub notes: Option<String>,
}
