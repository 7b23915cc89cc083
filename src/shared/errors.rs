// src/shared/errors.rs

use std::time::Duration;

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use thiserror::Error;

use super::shared_structs::GenericResponse;
use crate::validacao::regras::ValidationReport;

/// Erros de configuração: parâmetros inutilizáveis ou falha ao conectar no banco.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{var} must be a valid port number, got {value:?}")]
    InvalidPort { var: &'static str, value: String },

    #[error("{var} has an invalid numeric value {value:?}")]
    InvalidNumber { var: &'static str, value: String },

    #[error("{var} must be a boolean (true/false/1/0/yes/no), got {value:?}")]
    InvalidFlag { var: &'static str, value: String },

    #[error("failed to connect to the database: {0}")]
    Connect(#[from] sqlx::Error),

    #[error("database connection attempt timed out after {0:?}")]
    Timeout(Duration),

    #[error("database handle was closed before the connection was established")]
    Closed,
}

/// Erro de validação de um DTO. Carrega o relatório completo, nunca só a primeira falha.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("validation failed on {} field(s)", .report.len())]
pub struct ValidationError {
    pub report: ValidationReport,
}

impl ValidationError {
    pub fn new(report: ValidationReport) -> Self {
        ValidationError { report }
    }
}

impl ResponseError for ValidationError {
    fn status_code(&self) -> StatusCode {
        StatusCode::BAD_REQUEST
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::BadRequest().json(GenericResponse::error(self.to_string(), Some(&self.report)))
    }
}

/// Erros do portão de prontidão: o banco ainda não conectou, falhou ou já foi fechado.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DbError {
    #[error("database connection is not ready yet")]
    NotReady,

    #[error("database connection is unavailable: {0}")]
    Unavailable(String),
}

impl ResponseError for DbError {
    fn status_code(&self) -> StatusCode {
        StatusCode::SERVICE_UNAVAILABLE
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::ServiceUnavailable().json(GenericResponse::<()>::error(self.to_string(), None))
    }
}
