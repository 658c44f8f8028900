// src/services/tenancy_service.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{SettingsRepository, TenantRepository},
    models::tenancy::Tenant,
};

#[derive(Clone)]
pub struct TenancyService {
    tenant_repo: TenantRepository,
    settings_repo: SettingsRepository,
    pool: PgPool, // Usamos a pool para iniciar transações
}

impl TenancyService {
    pub fn new(
        tenant_repo: TenantRepository,
        settings_repo: SettingsRepository,
        pool: PgPool,
    ) -> Self {
        Self {
            tenant_repo,
            settings_repo,
            pool,
        }
    }

    /// Cria a empresa e, atomicamente, vincula o criador como primeiro
    /// membro e semeia as configurações de preço padrão. Toda empresa
    /// nasce pronta para orçar.
    pub async fn create_company(
        &self,
        owner_id: Uuid,
        name: &str,
        description: Option<&str>,
    ) -> Result<Tenant, AppError> {
        let mut tx = self.pool.begin().await?;

        let new_tenant = self
            .tenant_repo
            .create_tenant(&mut *tx, name, description)
            .await?;

        self.tenant_repo
            .add_member(&mut *tx, new_tenant.id, owner_id)
            .await?;

        // O INSERT em tenant_settings passa pela policy RLS; a chave do
        // tenant recém-criado precisa estar na transação.
        sqlx::query("SELECT set_config('app.tenant_id', $1, true)")
            .bind(new_tenant.id.to_string())
            .execute(&mut *tx)
            .await?;

        self.settings_repo
            .seed_defaults(&mut *tx, new_tenant.id)
            .await?;

        tx.commit().await?;

        tracing::info!("🏢 Empresa '{}' criada para o usuário {}", name, owner_id);
        Ok(new_tenant)
    }

    pub async fn list_user_companies(&self, user_id: Uuid) -> Result<Vec<Tenant>, AppError> {
        self.tenant_repo.list_tenants_for_user(user_id).await
    }
}
