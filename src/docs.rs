// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth ---
        handlers::auth::register,
        handlers::auth::login,
        handlers::auth::get_me,

        // --- Funnel ---
        handlers::funnel::get_summary,
        handlers::funnel::get_series,
        handlers::funnel::get_cards,
        handlers::funnel::preview_sheet,

        // --- Goals ---
        handlers::goals::list_goals,
        handlers::goals::resolve_goal,
        handlers::goals::upsert_goal,
        handlers::goals::bulk_upsert_goals,

        // --- Closers ---
        handlers::closers::list_weights,
        handlers::closers::set_weight,
        handlers::closers::reset_weights,

        // --- Permissions ---
        handlers::permissions::list_permissions,
        handlers::permissions::set_permissions,

        // --- Ads ---
        handlers::ads::get_insights,
    ),
    components(
        schemas(
            // --- Auth ---
            models::auth::User,
            models::auth::RegisterUserPayload,
            models::auth::LoginUserPayload,
            models::auth::AuthResponse,

            // --- Funnel ---
            models::funnel::BusinessUnit,
            models::funnel::Indicator,
            models::funnel::Grouping,
            models::funnel::MonetaryBreakdown,
            models::funnel::Movement,
            models::funnel::IndicatorSummary,
            models::funnel::FunnelSummary,
            models::funnel::SeriesBucket,
            models::funnel::FunnelSeries,
            models::funnel::CardListing,
            models::funnel::SheetPreviewPayload,
            models::funnel::PreviewTotals,
            models::funnel::SheetPreview,

            // --- Goals ---
            models::goal::GoalMetric,
            models::goal::Goal,
            models::goal::UpsertGoalPayload,
            models::goal::BulkGoalPayload,
            models::goal::BulkGoalRowResult,
            models::goal::BulkGoalResult,
            models::goal::GoalSource,
            models::goal::ResolvedGoal,

            // --- Closers ---
            models::closer::CloserWeight,
            models::closer::SetWeightPayload,

            // --- Permissions ---
            models::permission::TabPermission,
            models::permission::TabGrant,
            models::permission::SetPermissionsPayload,

            // --- Plan ---
            models::plan::PlanRow,

            // --- Ads ---
            models::ads::AdsInsights,
        )
    ),
    tags(
        (name = "Auth", description = "Autenticação e Registro"),
        (name = "Users", description = "Dados do Usuário e Perfil"),
        (name = "Funnel", description = "Funil de vendas: resumo, séries e drill-down"),
        (name = "Goals", description = "Metas mensais e reconciliação com o plano"),
        (name = "Closers", description = "Divisão da meta entre closers"),
        (name = "Permissions", description = "Permissões de abas do painel"),
        (name = "Ads", description = "Proxy de métricas de anúncios (Meta)")
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
            SecurityScheme::Http(
                Http::new(HttpAuthScheme::Bearer)
            ),
        );
    }
}
