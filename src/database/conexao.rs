// src/database/conexao.rs

use std::future::Future;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;

use actix_web::{dev::Payload, rt, web, FromRequest, HttpRequest};
use futures::future::{ready, Ready};
use sqlx::mysql::{MySqlPool, MySqlPoolOptions};
use tracing::{debug, error, info, warn};

use super::database_structs::ENTITIES;
use crate::config::config_structs::DbConfig;
use crate::shared::errors::{ConfigError, DbError};
use crate::AppState;

// Espera antes da primeira nova tentativa; dobra a cada falha.
const INITIAL_BACKOFF: Duration = Duration::from_millis(500);

/// Estado da conexão com o banco ao longo da vida do processo.
#[derive(Debug, Clone)]
pub enum DbState {
    Connecting,
    Ready(MySqlPool),
    Failed(String),
    Closed,
}

/// Handle da conexão do processo.
///
/// Criado em main.rs a partir de um `DbConfig`, guardado no `AppState` e
/// consultado pelas rotas através de `pool()` ou do extrator `ReadyPool`.
/// Enquanto a conexão não estiver pronta, `pool()` devolve erro.
#[derive(Debug)]
pub struct Database {
    config: DbConfig,
    state: RwLock<DbState>,
}

impl Database {
    pub fn new(config: DbConfig) -> Self {
        Database {
            config,
            state: RwLock::new(DbState::Connecting),
        }
    }

    /// Handle já pronto, para um pool criado fora de `initialize`.
    pub fn with_pool(config: DbConfig, pool: MySqlPool) -> Self {
        Database {
            config,
            state: RwLock::new(DbState::Ready(pool)),
        }
    }

    pub fn config(&self) -> &DbConfig {
        &self.config
    }

    pub fn state(&self) -> DbState {
        self.read_state().clone()
    }

    pub fn is_ready(&self) -> bool {
        matches!(*self.read_state(), DbState::Ready(_))
    }

    /// Portão de prontidão: devolve o pool só depois que a conexão foi estabelecida.
    pub fn pool(&self) -> Result<MySqlPool, DbError> {
        match &*self.read_state() {
            DbState::Ready(pool) => Ok(pool.clone()),
            DbState::Connecting => Err(DbError::NotReady),
            DbState::Failed(motivo) => Err(DbError::Unavailable(motivo.clone())),
            DbState::Closed => Err(DbError::Unavailable("connection closed".to_string())),
        }
    }

    /// Conecta ao banco, confere as entidades registradas e atualiza o estado.
    ///
    /// Sucesso e falha são registrados no log; a falha também é devolvida para
    /// quem quiser tratá-la (modo fail-fast). Se já estiver pronta, devolve o
    /// pool existente sem reconectar. Um handle fechado nunca é reaberto.
    pub async fn initialize(&self) -> Result<MySqlPool, ConfigError> {
        {
            let mut estado = self.write_state();
            if let DbState::Ready(pool) = &*estado {
                return Ok(pool.clone());
            }
            if matches!(*estado, DbState::Closed) {
                return Err(ConfigError::Closed);
            }
            *estado = DbState::Connecting;
        }

        match connect(&self.config).await {
            Ok(pool) => {
                verify_entities(&pool, &self.config.database).await;

                // close() pode ter rodado enquanto conectávamos: o pool novo é descartado.
                if !self.publish(DbState::Ready(pool.clone())) {
                    pool.close().await;
                    warn!("Handle fechado durante a conexão; pool descartado");
                    return Err(ConfigError::Closed);
                }

                info!(
                    host = %self.config.host,
                    port = self.config.port,
                    database = %self.config.database,
                    "Conexão com o banco de dados estabelecida"
                );
                Ok(pool)
            }
            Err(e) => {
                error!(error = %e, "Erro de conexão com o banco de dados");
                self.publish(DbState::Failed(e.to_string()));
                Err(e)
            }
        }
    }

    /// Fecha o pool na finalização do processo.
    pub async fn close(&self) {
        let anterior = std::mem::replace(&mut *self.write_state(), DbState::Closed);

        if let DbState::Ready(pool) = anterior {
            pool.close().await;
            info!("Conexão com o banco de dados encerrada");
        }
    }

    // Troca o estado, exceto depois de close(). Devolve false se o handle já estava fechado.
    fn publish(&self, novo: DbState) -> bool {
        let mut estado = self.write_state();
        if matches!(*estado, DbState::Closed) {
            return false;
        }
        *estado = novo;
        true
    }

    // Um lock envenenado ainda guarda um estado válido; não há invariante parcial aqui.
    fn read_state(&self) -> RwLockReadGuard<'_, DbState> {
        self.state.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, DbState> {
        self.state.write().unwrap_or_else(|e| e.into_inner())
    }
}

async fn connect(config: &DbConfig) -> Result<MySqlPool, ConfigError> {
    with_retries(config.connect_retries, INITIAL_BACKOFF, || connect_once(config)).await
}

// Executa `tentativa` até `retries + 1` vezes, dobrando a espera entre elas.
async fn with_retries<T, F, Fut>(retries: u32, espera_inicial: Duration, mut tentativa: F) -> Result<T, ConfigError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ConfigError>>,
{
    let mut feitas = 0;
    let mut espera = espera_inicial;

    loop {
        match tentativa().await {
            Ok(valor) => return Ok(valor),
            Err(e) if feitas < retries => {
                feitas += 1;
                warn!(
                    tentativa = feitas,
                    error = %e,
                    "Falha ao conectar ao banco, nova tentativa em {:?}",
                    espera
                );
                rt::time::sleep(espera).await;
                espera *= 2;
            }
            Err(e) => return Err(e),
        }
    }
}

// Cada tentativa é limitada por connect_timeout. O timeout interno do pool
// (PoolTimedOut) é reportado da mesma forma.
async fn connect_once(config: &DbConfig) -> Result<MySqlPool, ConfigError> {
    let opcoes = MySqlPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(config.connect_timeout);

    match rt::time::timeout(config.connect_timeout, opcoes.connect_with(config.connect_options())).await {
        Ok(Ok(pool)) => Ok(pool),
        Ok(Err(sqlx::Error::PoolTimedOut)) | Err(_) => Err(ConfigError::Timeout(config.connect_timeout)),
        Ok(Err(e)) => Err(e.into()),
    }
}

/// Confere se as tabelas das entidades registradas existem. Somente leitura:
/// a conexão nunca cria nem altera tabelas.
async fn verify_entities(pool: &MySqlPool, database: &str) {
    for mapping in ENTITIES.iter() {
        let resultado = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM information_schema.tables WHERE table_schema = ? AND table_name = ?",
        )
        .bind(database)
        .bind(mapping.table)
        .fetch_one(pool)
        .await;

        match resultado {
            Ok(0) => warn!(
                entity = mapping.entity,
                table = mapping.table,
                "Tabela da entidade não encontrada; o schema não é sincronizado automaticamente"
            ),
            Ok(_) => debug!(entity = mapping.entity, table = mapping.table, "Entidade registrada"),
            Err(e) => warn!(entity = mapping.entity, error = %e, "Não foi possível conferir a tabela da entidade"),
        }
    }
}

/// Extrator que entrega o pool apenas quando o banco está pronto.
/// Caso contrário a requisição é rejeitada com 503.
#[derive(Debug, Clone)]
pub struct ReadyPool(pub MySqlPool);

impl FromRequest for ReadyPool {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let app_state = match req.app_data::<web::Data<AppState>>() {
            Some(state) => state,
            None => {
                error!("AppState não disponível no extrator ReadyPool");
                return ready(Err(DbError::NotReady.into()));
            }
        };

        ready(app_state.database.pool().map(ReadyPool).map_err(Into::into))
    }
}
