// src/saude/saude_router.rs

use actix_web::{get, web, HttpResponse};

use crate::database::conexao::DbState;
use crate::shared::shared_structs::GenericResponse;
use crate::AppState;

/// Rota de health check.
///
/// Reporta o estado da conexão com o banco: 200 quando pronta, 503 enquanto
/// conecta ou depois de uma falha (a mensagem traz o motivo).
#[get("/health")]
pub async fn health(data: web::Data<AppState>) -> HttpResponse {
    match data.database.state() {
        DbState::Ready(_) => HttpResponse::Ok().json(GenericResponse::<()>::success("ready", None)),
        DbState::Connecting => {
            HttpResponse::ServiceUnavailable().json(GenericResponse::<()>::error("connecting", None))
        }
        DbState::Failed(motivo) => HttpResponse::ServiceUnavailable()
            .json(GenericResponse::<()>::error(format!("unavailable: {}", motivo), None)),
        DbState::Closed => HttpResponse::ServiceUnavailable().json(GenericResponse::<()>::error("closed", None)),
    }
}
