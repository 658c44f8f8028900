// src/models/access_code.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::common::error::AppError;

// Código de provisionamento de demonstração. Independente da autenticação
// por tenant: quem resgata ganha usuário + empresa (com o nome do código)
// + configurações de preço padrão, tudo em uma transação.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AccessCode {
    pub id: Uuid,

    #[schema(example = "DEMO-PINTURA-2026")]
    pub code: String,

    // Nome da empresa criada no resgate
    #[schema(example = "Pinturas Demonstração")]
    pub company_name: String,

    #[schema(example = 5)]
    pub max_uses: i32,

    #[schema(example = 2)]
    pub uses_count: i32,

    pub expires_at: Option<DateTime<Utc>>,

    pub is_active: bool,

    pub created_at: DateTime<Utc>,
}

impl AccessCode {
    // Regras de resgate: ativo, dentro da validade e abaixo do limite de
    // usos. O incremento do contador em si é atômico no repositório.
    pub fn ensure_redeemable(&self, now: DateTime<Utc>) -> Result<(), AppError> {
        if !self.is_active {
            return Err(AppError::AccessCodeInvalid);
        }
        if let Some(expires_at) = self.expires_at {
            if expires_at < now {
                return Err(AppError::AccessCodeExpired);
            }
        }
        if self.uses_count >= self.max_uses {
            return Err(AppError::AccessCodeExhausted);
        }
        Ok(())
    }
}

fn default_max_uses() -> i32 {
    1
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateAccessCodePayload {
    #[validate(length(min = 4, message = "O código deve ter no mínimo 4 caracteres."))]
    #[schema(example = "DEMO-PINTURA-2026")]
    pub code: String,

    #[validate(length(min = 1, message = "O nome da empresa é obrigatório."))]
    #[schema(example = "Pinturas Demonstração")]
    pub company_name: String,

    #[serde(default = "default_max_uses")]
    #[schema(example = 5)]
    pub max_uses: i32,

    pub expires_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RedeemAccessCodePayload {
    #[validate(length(min = 4, message = "O código deve ter no mínimo 4 caracteres."))]
    #[schema(example = "DEMO-PINTURA-2026")]
    pub code: String,

    #[validate(email(message = "O e-mail fornecido é inválido."))]
    #[schema(example = "pintor@exemplo.com")]
    pub email: String,

    #[validate(length(min = 6, message = "A senha deve ter no mínimo 6 caracteres."))]
    pub password: String,
}

// Resposta do resgate: o token já autenticado e a empresa provisionada.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RedeemResponse {
    pub token: String,
    pub tenant_id: Uuid,
    pub company_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn code_fixture() -> AccessCode {
        AccessCode {
            id: Uuid::new_v4(),
            code: "DEMO".to_string(),
            company_name: "Pinturas Demo".to_string(),
            max_uses: 2,
            uses_count: 0,
            expires_at: None,
            is_active: true,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn codigo_valido_passa() {
        let code = code_fixture();
        assert!(code.ensure_redeemable(Utc::now()).is_ok());
    }

    #[test]
    fn codigo_inativo_rejeita() {
        let mut code = code_fixture();
        code.is_active = false;
        assert!(matches!(
            code.ensure_redeemable(Utc::now()),
            Err(AppError::AccessCodeInvalid)
        ));
    }

    #[test]
    fn codigo_vencido_rejeita() {
        let now = Utc::now();
        let mut code = code_fixture();
        code.expires_at = Some(now - Duration::hours(1));
        assert!(matches!(
            code.ensure_redeemable(now),
            Err(AppError::AccessCodeExpired)
        ));

        // Dentro da validade continua ok.
        code.expires_at = Some(now + Duration::hours(1));
        assert!(code.ensure_redeemable(now).is_ok());
    }

    #[test]
    fn codigo_esgotado_rejeita() {
        let mut code = code_fixture();
        code.uses_count = 2;
        assert!(matches!(
            code.ensure_redeemable(Utc::now()),
            Err(AppError::AccessCodeExhausted)
        ));
    }
}
