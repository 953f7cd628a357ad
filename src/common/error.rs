// src/common/error.rs

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use thiserror::Error;
use uuid::Uuid;

use crate::middleware::i18n::Locale;

// Erros de domínio. Os handlers convertem para ApiError com o idioma do cliente.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{entity} {id} não encontrado")]
    NotFound { entity: &'static str, id: Uuid },

    #[error("Campo inválido '{field}': {message}")]
    InvalidInput { field: &'static str, message: String },

    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    // Uma sequência de escrita falhou no meio; a transação já foi desfeita.
    #[error("Falha na transação: {0}")]
    TransactionFailure(String),

    #[error("Erro de banco de dados: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Erro interno do servidor: {0}")]
    InternalServerError(#[from] anyhow::Error),
}

impl AppError {
    pub fn invalid(field: &'static str, message: impl Into<String>) -> Self {
        AppError::InvalidInput {
            field,
            message: message.into(),
        }
    }

    /// Qualquer erro de banco dentro de uma escrita em várias etapas vira
    /// TransactionFailure. Erros de regra (NotFound, InvalidInput) passam intactos.
    pub fn into_transaction_failure(self) -> Self {
        match self {
            AppError::DatabaseError(e) => AppError::TransactionFailure(e.to_string()),
            AppError::InternalServerError(e) => AppError::TransactionFailure(e.to_string()),
            other => other,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::InvalidInput { .. } | AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    // Converte para a resposta HTTP, traduzindo a mensagem conforme o Accept-Language.
    pub fn to_api_error(&self, locale: &Locale) -> ApiError {
        let pt = locale.is_portuguese();
        let status = self.status();

        match self {
            AppError::NotFound { entity, id } => ApiError {
                status,
                error: if pt {
                    format!("Registro '{}' não encontrado.", entity)
                } else {
                    format!("The requested {} does not exist.", entity)
                },
                details: Some(json!({ "entity": entity, "id": id })),
            },
            AppError::InvalidInput { field, message } => {
                let mut details = serde_json::Map::new();
                details.insert(field.to_string(), json!([message]));
                ApiError {
                    status,
                    error: if pt {
                        "Um ou mais campos são inválidos.".to_string()
                    } else {
                        "One or more fields are invalid.".to_string()
                    },
                    details: Some(Value::Object(details)),
                }
            }
            AppError::ValidationError(errors) => {
                let mut details = serde_json::Map::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .map(|e| {
                            e.message
                                .as_ref()
                                .map(|m| m.to_string())
                                .unwrap_or_else(|| e.code.to_string())
                        })
                        .collect();
                    details.insert(field.to_string(), json!(messages));
                }
                ApiError {
                    status,
                    error: if pt {
                        "Um ou mais campos são inválidos.".to_string()
                    } else {
                        "One or more fields are invalid.".to_string()
                    },
                    details: Some(Value::Object(details)),
                }
            }
            AppError::TransactionFailure(e) => {
                tracing::error!("Transação desfeita: {}", e);
                ApiError {
                    status,
                    error: if pt {
                        "A operação falhou e nenhuma alteração foi salva.".to_string()
                    } else {
                        "The operation failed and no changes were saved.".to_string()
                    },
                    details: None,
                }
            }
            e => {
                tracing::error!("Erro Interno do Servidor: {}", e);
                ApiError {
                    status,
                    error: if pt {
                        "Ocorreu um erro inesperado.".to_string()
                    } else {
                        "An unexpected error occurred.".to_string()
                    },
                    details: None,
                }
            }
        }
    }
}

// Resposta de erro serializada para o cliente.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub error: String,
    pub details: Option<Value>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = match self.details {
            Some(details) => json!({ "error": self.error, "details": details }),
            None => json!({ "error": self.error }),
        };
        (self.status, Json(body)).into_response()
    }
}

// Sem Locale (ex.: middlewares), a resposta sai no idioma padrão.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        self.to_api_error(&Locale::default()).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_input_names_the_field() {
        let err = AppError::invalid("endDate", "must not be before startDate");
        let api = err.to_api_error(&Locale("en".into()));

        assert_eq!(api.status, StatusCode::BAD_REQUEST);
        let details = api.details.expect("details");
        assert_eq!(details["endDate"][0], "must not be before startDate");
    }

    #[test]
    fn database_errors_become_transaction_failures() {
        let err = AppError::DatabaseError(sqlx::Error::RowNotFound).into_transaction_failure();
        assert!(matches!(err, AppError::TransactionFailure(_)));

        let api = err.to_api_error(&Locale("pt".into()));
        assert_eq!(api.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(api.error.contains("nenhuma alteração"));
    }

    #[test]
    fn not_found_keeps_its_status() {
        let id = Uuid::new_v4();
        let err = AppError::NotFound { entity: "project", id }.into_transaction_failure();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }
}
