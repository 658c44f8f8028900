// src/services/access_code_service.rs

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::{
    common::error::AppError,
    db::{AccessCodeRepository, SettingsRepository, TenantRepository, UserRepository},
    models::access_code::{AccessCode, RedeemResponse},
    services::auth::AuthService,
};

#[derive(Clone)]
pub struct AccessCodeService {
    access_code_repo: AccessCodeRepository,
    user_repo: UserRepository,
    tenant_repo: TenantRepository,
    settings_repo: SettingsRepository,
    auth_service: AuthService,
    pool: PgPool,
}

impl AccessCodeService {
    pub fn new(
        access_code_repo: AccessCodeRepository,
        user_repo: UserRepository,
        tenant_repo: TenantRepository,
        settings_repo: SettingsRepository,
        auth_service: AuthService,
        pool: PgPool,
    ) -> Self {
        Self {
            access_code_repo,
            user_repo,
            tenant_repo,
            settings_repo,
            auth_service,
            pool,
        }
    }

    pub async fn create_code(
        &self,
        code: &str,
        company_name: &str,
        max_uses: i32,
        expires_at: Option<DateTime<Utc>>,
    ) -> Result<AccessCode, AppError> {
        self.access_code_repo
            .create(&self.pool, code, company_name, max_uses, expires_at)
            .await
    }

    pub async fn list_codes(&self) -> Result<Vec<AccessCode>, AppError> {
        self.access_code_repo.list().await
    }

    /// Resgate: valida o código, consome um uso e provisiona usuário +
    /// empresa (com o nome do código) + configurações padrão, tudo em UMA
    /// transação. Qualquer falha desfaz inclusive o uso consumido.
    pub async fn redeem(
        &self,
        code: &str,
        email: &str,
        password: &str,
    ) -> Result<RedeemResponse, AppError> {
        // Hashing fora da transação: não toca no banco.
        let hashed_password = self.auth_service.hash_password(password).await?;

        let mut tx = self.pool.begin().await?;

        let access_code = self
            .access_code_repo
            .find_by_code(&mut *tx, code)
            .await?
            .ok_or(AppError::AccessCodeInvalid)?;

        access_code.ensure_redeemable(Utc::now())?;

        // O guard atômico do claim_use segura a corrida pelo último uso.
        let claimed = self
            .access_code_repo
            .claim_use(&mut *tx, access_code.id)
            .await?;
        if !claimed {
            return Err(AppError::AccessCodeExhausted);
        }

        let user = self
            .user_repo
            .create_user(&mut *tx, email, &hashed_password)
            .await?;

        let tenant = self
            .tenant_repo
            .create_tenant(&mut *tx, &access_code.company_name, None)
            .await?;

        self.tenant_repo
            .add_member(&mut *tx, tenant.id, user.id)
            .await?;

        sqlx::query("SELECT set_config('app.tenant_id', $1, true)")
            .bind(tenant.id.to_string())
            .execute(&mut *tx)
            .await?;

        self.settings_repo.seed_defaults(&mut *tx, tenant.id).await?;

        tx.commit().await?;

        tracing::info!(
            "🎟️ Código '{}' resgatado: empresa '{}' provisionada",
            access_code.code,
            access_code.company_name
        );

        let token = self.auth_service.create_token(user.id)?;
        Ok(RedeemResponse {
            token,
            tenant_id: tenant.id,
            company_name: tenant.name,
        })
    }
}
