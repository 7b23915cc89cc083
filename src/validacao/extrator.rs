// src/validacao/extrator.rs

use std::ops::Deref;

use actix_web::{dev::Payload, web, FromRequest, HttpRequest};
use futures::future::LocalBoxFuture;
use serde_json::Value;

use super::regras::Dto;

/// Extrator que lê o corpo JSON como valor bruto e o valida contra o esquema de `T`.
///
/// Em caso de falha a requisição é rejeitada com 400 e o relatório completo de
/// violações; o handler só é chamado com um DTO totalmente válido.
#[derive(Debug)]
pub struct Validated<T>(pub T);

impl<T> Validated<T> {
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> Deref for Validated<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.0
    }
}

impl<T: Dto + 'static> FromRequest for Validated<T> {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let corpo = web::Json::<Value>::from_request(req, payload);

        Box::pin(async move {
            let web::Json(bruto) = corpo.await?;

            match T::parse(&bruto) {
                Ok(dto) => Ok(Validated(dto)),
                Err(e) => {
                    tracing::debug!(schema = T::schema().name, report = ?e.report, "Entrada rejeitada na validação");
                    Err(e.into())
                }
            }
        })
    }
}
