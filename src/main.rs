//src/main.rs

use axum::{
    middleware as axum_middleware,
    routing::{get, post, put},
    Router,
};
use tokio::net::TcpListener;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

// Declaração dos nossos módulos
mod common;
mod config;
mod db;
mod docs;
mod funnel;
mod handlers;
mod middleware;
mod models;
mod services;

use crate::config::AppState;
use crate::middleware::auth::auth_guard;

#[tokio::main]
async fn main() {
    // Inicializa o logger.
    tracing_subscriber::fmt().with_target(false).compact().init();

    // Os mapas de fase precisam cobrir todos os indicadores; se o
    // vocabulário ficou furado, é melhor nem subir.
    funnel::units::validate_configs()
        .expect("Configuração de unidades inválida");

    // .expect() é bom aqui: se a configuração falhar, a aplicação não deve iniciar.
    let app_state = AppState::new()
        .await
        .expect("Falha ao inicializar o estado da aplicação.");

    // Roda as migrações do SQLx na inicialização (só no banco próprio;
    // o espelho do CRM não é nosso).
    sqlx::migrate!()
        .run(&app_state.db_pool)
        .await
        .expect("Falha ao rodar as migrações do banco de dados.");

    tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

    // Define as rotas de autenticação (públicas)
    let auth_routes = Router::new()
        .route("/register", post(handlers::auth::register))
        .route("/login", post(handlers::auth::login));

    // Rotas de usuário (protegidas pelo middleware)
    let user_routes = Router::new()
        .route("/me", get(handlers::auth::get_me))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let funnel_routes = Router::new()
        .route("/{bu}/summary", get(handlers::funnel::get_summary))
        .route("/{bu}/series", get(handlers::funnel::get_series))
        .route("/{bu}/cards", get(handlers::funnel::get_cards))
        .route("/{bu}/preview", post(handlers::funnel::preview_sheet))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let goal_routes = Router::new()
        .route("/"
               ,get(handlers::goals::list_goals)
               .put(handlers::goals::upsert_goal)
        )
        .route("/resolve", get(handlers::goals::resolve_goal))
        .route("/bulk", post(handlers::goals::bulk_upsert_goals))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let closer_routes = Router::new()
        .route("/{bu}", get(handlers::closers::list_weights))
        .route("/{bu}/weight", put(handlers::closers::set_weight))
        .route("/{bu}/reset", post(handlers::closers::reset_weights))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let permission_routes = Router::new()
        .route("/{user_id}"
               ,get(handlers::permissions::list_permissions)
               .put(handlers::permissions::set_permissions)
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let ads_routes = Router::new()
        .route("/insights", get(handlers::ads::get_insights))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    // Combina tudo no router principal
    let app = Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .nest("/api/auth", auth_routes)
        .nest("/api/users", user_routes)
        .nest("/api/funnel", funnel_routes)
        .nest("/api/goals", goal_routes)
        .nest("/api/closers", closer_routes)
        .nest("/api/permissions", permission_routes)
        .nest("/api/ads", ads_routes)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", docs::ApiDoc::openapi()))
        .with_state(app_state);

    // Inicia o servidor
    let addr = "0.0.0.0:3000";
    let listener = TcpListener::bind(addr)
        .await
        .expect("Falha ao iniciar o listener TCP");
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr().unwrap());
    axum::serve(listener, app)
        .await
        .expect("Erro no servidor Axum");
}
