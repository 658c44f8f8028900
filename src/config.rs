// src/config.rs

use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};
use std::{env, time::Duration};

use crate::{
    common::i18n::I18nStore,
    db::{
        AccessCodeRepository, DashboardRepository, ProjectRepository, QuoteRepository,
        SettingsRepository, TenantRepository, UserRepository,
    },
    services::{
        access_code_service::AccessCodeService, auth::AuthService,
        dashboard_service::DashboardService, document_service::DocumentService,
        quote_service::QuoteService, tenancy_service::TenancyService,
    },
};

// Configuração imutável, lida UMA vez na subida do processo. Nunca é
// mutada em runtime; nenhum outro módulo lê variável de ambiente.
#[derive(Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt_secret: String,
    // Chave do cabeçalho x-admin-key para a gestão de códigos de acesso.
    // Ausente = rotas administrativas desligadas.
    pub admin_api_key: Option<String>,
    pub bind_addr: String,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Self {
            database_url: env::var("DATABASE_URL").context("DATABASE_URL deve ser definida")?,
            jwt_secret: env::var("JWT_SECRET").context("JWT_SECRET deve ser definido")?,
            admin_api_key: env::var("ADMIN_API_KEY").ok(),
            bind_addr: env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string()),
        })
    }
}

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub config: AppConfig,
    pub i18n_store: I18nStore,

    // Repositórios acessados direto pelos handlers/guards
    pub settings_repo: SettingsRepository,
    pub tenant_repo: TenantRepository,
    pub project_repo: ProjectRepository,

    // Serviços
    pub auth_service: AuthService,
    pub tenancy_service: TenancyService,
    pub access_code_service: AccessCodeService,
    pub quote_service: QuoteService,
    pub dashboard_service: DashboardService,
    pub document_service: DocumentService,
}

impl AppState {
    pub async fn new() -> anyhow::Result<Self> {
        let config = AppConfig::from_env()?;

        // Conecta ao banco de dados, usando '?' para propagar erros
        let db_pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&config.database_url)
            .await?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        // --- Monta o gráfico de dependências ---
        let user_repo = UserRepository::new(db_pool.clone());
        let tenant_repo = TenantRepository::new(db_pool.clone());
        let access_code_repo = AccessCodeRepository::new(db_pool.clone());
        let settings_repo = SettingsRepository::new(db_pool.clone());
        let project_repo = ProjectRepository::new(db_pool.clone());
        let quote_repo = QuoteRepository::new(db_pool.clone());
        let dashboard_repo = DashboardRepository::new(db_pool.clone());

        let auth_service = AuthService::new(
            user_repo.clone(),
            config.jwt_secret.clone(),
            db_pool.clone(),
        );
        let tenancy_service = TenancyService::new(
            tenant_repo.clone(),
            settings_repo.clone(),
            db_pool.clone(),
        );
        let access_code_service = AccessCodeService::new(
            access_code_repo,
            user_repo,
            tenant_repo.clone(),
            settings_repo.clone(),
            auth_service.clone(),
            db_pool.clone(),
        );
        let quote_service = QuoteService::new(
            quote_repo.clone(),
            project_repo.clone(),
            settings_repo.clone(),
        );
        let dashboard_service = DashboardService::new(dashboard_repo);
        let document_service =
            DocumentService::new(quote_repo, project_repo.clone(), settings_repo.clone());

        Ok(Self {
            db_pool,
            config,
            i18n_store: I18nStore::new(),
            settings_repo,
            tenant_repo,
            project_repo,
            auth_service,
            tenancy_service,
            access_code_service,
            quote_service,
            dashboard_service,
            document_service,
        })
    }
}
