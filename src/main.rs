// src/main.rs

use std::io;

use actix_web::{middleware::Logger, rt, web, App, HttpServer};
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

use vendas_soa::config::config_structs::{DbConfig, ServerConfig};
use vendas_soa::database::conexao::Database;
use vendas_soa::saude::saude_router;
use vendas_soa::shared::errors::ConfigError;
use vendas_soa::AppState;

// Função principal da aplicação Actix Web.
#[actix_web::main]
async fn main() -> io::Result<()> {
    // Carrega o arquivo .env, se existir. Variáveis já definidas no ambiente têm prioridade.
    let dotenv = dotenvy::dotenv();

    init_tracing();

    match dotenv {
        Ok(path) => debug!("Variáveis carregadas de {}", path.display()),
        Err(_) => info!("Nenhum arquivo .env encontrado; usando apenas variáveis de ambiente"),
    }

    // Porta inválida (ou qualquer outro parâmetro inutilizável) encerra a aplicação aqui.
    let db_config = DbConfig::from_env().map_err(erro_de_configuracao)?;
    let server_config = ServerConfig::from_env().map_err(erro_de_configuracao)?;
    debug!(?db_config, "Configuração do banco carregada");

    let fail_fast = db_config.fail_fast;

    // Cria o estado compartilhado com o handle da conexão (ainda não conectado).
    let app_state = web::Data::new(AppState {
        database: Database::new(db_config),
    });

    if fail_fast {
        // Modo fail-fast: sem banco, a aplicação não sobe.
        app_state.database.initialize().await.map_err(erro_de_configuracao)?;
    } else {
        // Conecta em segundo plano; a falha fica no log e no /health.
        let state = app_state.clone();
        rt::spawn(async move {
            // O erro já foi registrado dentro de initialize(); aqui a aplicação segue
            // de pé e o /health passa a reportar a falha.
            if state.database.initialize().await.is_err() {
                debug!("Aplicação segue sem banco; rotas que dependem dele respondem 503");
            }
        });
    }

    info!("Iniciando API de vendas em {}:{}...", server_config.host, server_config.port);

    let server_state = app_state.clone();

    // Configura e inicia o servidor HTTP.
    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(server_state.clone())
            .service(saude_router::health)
    })
    .bind((server_config.host.as_str(), server_config.port))?
    .run()
    .await?;

    // Libera a conexão depois que o servidor parou.
    app_state.database.close().await;

    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt().with_env_filter(filter).compact().try_init();
}

fn erro_de_configuracao(e: ConfigError) -> io::Error {
    error!(error = %e, "Erro de configuração");
    io::Error::new(io::ErrorKind::Other, e)
}
