// src/config.rs

use std::{env, sync::Arc, time::Duration};

use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::{
    db::{
        CloserRepository, GoalRepository, MovementRepository, PermissionRepository,
        PlanRepository, UserRepository,
    },
    services::{
        AdsService, AuthService, CloserService, FunnelService, GoalService, PermissionService,
    },
};

// O estado compartilhado que será acessível em toda a aplicação
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub auth_service: AuthService,
    pub funnel_service: FunnelService,
    pub goal_service: GoalService,
    pub closer_service: CloserService,
    pub permission_service: PermissionService,
    pub ads_service: AdsService,
}

impl AppState {
    pub async fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").expect("DATABASE_URL deve ser definida");
        // Espelho do Pipefy em Postgres, somente leitura.
        let crm_database_url =
            env::var("CRM_DATABASE_URL").expect("CRM_DATABASE_URL deve ser definida");
        let jwt_secret = env::var("JWT_SECRET").expect("JWT_SECRET deve ser definido");
        let meta_access_token =
            env::var("META_ACCESS_TOKEN").expect("META_ACCESS_TOKEN deve ser definido");

        let db_pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&database_url)
            .await?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        let crm_pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&crm_database_url)
            .await?;

        tracing::info!("✅ Conexão com o espelho do CRM estabelecida com sucesso!");

        // --- Monta o gráfico de dependências ---
        let user_repo = UserRepository::new(db_pool.clone());
        let goal_repo = GoalRepository::new(db_pool.clone());
        let closer_repo = CloserRepository::new(db_pool.clone());
        let permission_repo = PermissionRepository::new(db_pool.clone());
        let movement_repo = MovementRepository::new(crm_pool);

        // O plano derivado entra como dependência explícita do serviço
        // de metas.
        let plan_provider = Arc::new(PlanRepository::new(db_pool.clone()));

        let auth_service = AuthService::new(user_repo.clone(), jwt_secret);
        let goal_service = GoalService::new(goal_repo, closer_repo.clone(), plan_provider);
        let funnel_service = FunnelService::new(movement_repo, goal_service.clone());
        let closer_service = CloserService::new(closer_repo);
        let permission_service = PermissionService::new(permission_repo, user_repo);
        let ads_service = AdsService::new(reqwest::Client::new(), meta_access_token);

        Ok(Self {
            db_pool,
            auth_service,
            funnel_service,
            goal_service,
            closer_service,
            permission_service,
            ads_service,
        })
    }
}
