use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::collections::HashMap;
use thiserror::Error;

// Nosso tipo de erro, com `thiserror` para melhor ergonomia.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    // Regras de negócio das metas (ex: soma das sub-métricas acima do
    // faturamento). Mapa: campo -> código do erro.
    #[error("Regra de negócio violada")]
    RuleViolation(HashMap<String, String>),

    #[error("E-mail já existe")]
    EmailAlreadyExists,

    #[error("Credenciais inválidas")]
    InvalidCredentials,

    #[error("Token inválido")]
    InvalidToken,

    #[error("Usuário não encontrado")]
    UserNotFound,

    #[error("Unidade de negócio desconhecida: {0}")]
    UnknownBusinessUnit(String),

    #[error("Período inválido")]
    InvalidPeriod,

    // Falha ao buscar dados em uma fonte externa (espelho do CRM,
    // planilha, API de anúncios). Sem retry automático aqui: quem chama
    // decide reinvocar.
    #[error("Falha ao buscar dados da fonte externa: {0}")]
    SourceFetch(String),

    // Variante para erros de banco de dados (sqlx)
    #[error("Erro de banco de dados")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Erro na API de anúncios: {0}")]
    AdsApi(#[from] reqwest::Error),

    // Variante genérica para qualquer outro erro inesperado
    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Erro de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            // Retorna todos os detalhes da validação.
            AppError::ValidationError(errors) => {
                let mut details = HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors.iter()
                        .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                let body = Json(json!({
                    "error": "Um ou mais campos são inválidos.",
                    "details": details,
                }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }
            AppError::RuleViolation(details) => {
                let body = Json(json!({
                    "error": "A alteração viola uma regra de negócio.",
                    "details": details,
                }));
                return (StatusCode::UNPROCESSABLE_ENTITY, body).into_response();
            }
            AppError::EmailAlreadyExists => (StatusCode::CONFLICT, "Este e-mail já está em uso."),
            AppError::InvalidCredentials => (StatusCode::UNAUTHORIZED, "E-mail ou senha inválidos."),
            AppError::InvalidToken => (StatusCode::UNAUTHORIZED, "Token de autenticação inválido ou ausente."),
            AppError::UserNotFound => (StatusCode::NOT_FOUND, "Usuário não encontrado."),
            AppError::UnknownBusinessUnit(_) => (StatusCode::NOT_FOUND, "Unidade de negócio desconhecida."),
            AppError::InvalidPeriod => (StatusCode::BAD_REQUEST, "Período inválido: a data inicial deve ser anterior à final."),
            AppError::SourceFetch(ref msg) => {
                tracing::error!("Falha na fonte externa: {}", msg);
                (StatusCode::BAD_GATEWAY, "Falha ao buscar dados da fonte externa.")
            }
            AppError::AdsApi(ref e) => {
                tracing::error!("Erro na API de anúncios: {}", e);
                (StatusCode::BAD_GATEWAY, "Falha ao consultar a API de anúncios.")
            }

            // Todos os outros erros (DatabaseError, InternalServerError) viram 500.
            // O `tracing` vai logar a mensagem detalhada que `thiserror` nos deu.
            ref e => {
                tracing::error!("Erro Interno do Servidor: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Ocorreu um erro inesperado.")
            }
        };

        // Resposta padrão para erros simples que só têm uma mensagem.
        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}
