// src/docs.rs

use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::OpenApi;

use crate::handlers;
use crate::models;
use crate::services;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth ---
        handlers::auth::register,
        handlers::auth::login,

        // --- Users ---
        handlers::auth::get_me,
        handlers::auth::get_my_companies,

        // --- Tenancy ---
        handlers::tenancy::create_company,
        handlers::tenancy::list_my_companies,

        // --- Access Codes ---
        handlers::access_codes::create_access_code,
        handlers::access_codes::list_access_codes,
        handlers::access_codes::redeem_access_code,

        // --- Settings ---
        handlers::settings::get_settings,
        handlers::settings::update_settings,

        // --- Projects ---
        handlers::projects::create_project,
        handlers::projects::list_projects,
        handlers::projects::get_project,

        // --- Quotes ---
        handlers::quotes::create_quote,
        handlers::quotes::list_quotes,
        handlers::quotes::get_quote,
        handlers::quotes::update_quote,
        handlers::quotes::transition_status,
        handlers::quotes::record_actuals,
        handlers::quotes::list_versions,
        handlers::quotes::get_internal_metrics,
        handlers::documents::generate_quote_pdf,

        // --- Public ---
        handlers::public::get_public_quote,
        handlers::public::decide_public_quote,

        // --- Dashboard ---
        handlers::dashboard::get_summary,
    ),
    components(
        schemas(
            // --- Auth ---
            models::auth::User,
            models::auth::RegisterUserPayload,
            models::auth::LoginUserPayload,
            models::auth::AuthResponse,

            // --- Tenancy ---
            models::tenancy::Tenant,
            models::tenancy::TenantMember,
            handlers::tenancy::CreateCompanyPayload,

            // --- Access Codes ---
            models::access_code::AccessCode,
            models::access_code::CreateAccessCodePayload,
            models::access_code::RedeemAccessCodePayload,
            models::access_code::RedeemResponse,

            // --- Settings ---
            models::settings::PaintQuality,
            models::settings::BaseboardChargeMethod,
            models::settings::CostSettings,
            models::settings::UpdateSettingsPayload,

            // --- Projects ---
            models::projects::Project,
            models::projects::CreateProjectPayload,

            // --- Quotes ---
            models::quotes::JobStatus,
            models::quotes::QuoteDisplayStatus,
            models::quotes::SurfaceKind,
            models::quotes::Surface,
            models::quotes::DoorSpec,
            models::quotes::Room,
            models::quotes::QuoteDetails,
            models::quotes::BaseCosts,
            models::quotes::EnhancedBaseCosts,
            models::quotes::Quote,
            models::quotes::QuoteView,
            models::quotes::QuotePublicView,
            models::quotes::QuoteVersion,
            handlers::quotes::CreateQuotePayload,
            handlers::quotes::UpdateQuotePayload,
            handlers::quotes::TransitionStatusPayload,
            handlers::quotes::RecordActualsPayload,
            handlers::public::PublicDecision,
            handlers::public::PublicDecisionPayload,

            // --- Cálculo ---
            services::surface_calculator::SurfaceCalculation,
            services::surface_calculator::SimpleQuoteBreakdown,
            services::room_calculator::RoomCalculation,
            services::room_calculator::AdvancedQuoteBreakdown,
            services::pricing::MarkupResult,
            services::pricing::InternalMetrics,
            services::job_tracker::JobActuals,
            services::job_tracker::CostVariance,
            services::job_tracker::JobSummary,
            services::quote_service::InternalMetricsView,
            services::quote_service::JobCompletionView,

            // --- Dashboard ---
            models::dashboard::DashboardSummary,
        )
    ),
    tags(
        (name = "Auth", description = "Autenticação e Registro"),
        (name = "Users", description = "Dados do Usuário e Perfil"),
        (name = "Tenancy", description = "Gestão de Empresas e Acesso"),
        (name = "Access Codes", description = "Provisionamento por Código de Acesso"),
        (name = "Settings", description = "Configurações de Preço da Empresa"),
        (name = "Projects", description = "Clientes e Obras"),
        (name = "Quotes", description = "Orçamentos de Pintura"),
        (name = "Public", description = "Link Público de Aceite do Cliente"),
        (name = "Dashboard", description = "Indicadores Gerenciais")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        );
    }
}
