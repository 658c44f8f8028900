pub mod access_code_repo;
pub use access_code_repo::AccessCodeRepository;
pub mod dashboard_repo;
pub use dashboard_repo::DashboardRepository;
pub mod project_repo;
pub use project_repo::ProjectRepository;
pub mod quote_repo;
pub use quote_repo::QuoteRepository;
pub mod settings_repo;
pub use settings_repo::SettingsRepository;
pub mod tenancy_repo;
pub use tenancy_repo::TenantRepository;
pub mod user_repo;
pub use user_repo::UserRepository;
