// src/lib.rs

// Declara os módulos da aplicação. O binário (main.rs) e os testes em `tests/`
// acessam tudo a partir daqui.
pub mod config;     // Módulo de configuração (variáveis de ambiente)
pub mod database;   // Módulo de conexão e entidades do banco
pub mod saude;      // Módulo de health check
pub mod shared;     // Módulo shared (respostas e erros)
pub mod validacao;  // Módulo do validador genérico
pub mod vendas;     // Módulo de vendas (DTOs)

use database::conexao::Database;

// Estado compartilhado que contém o handle da conexão com o banco de dados.
// É criado uma única vez em main.rs e compartilhado com as rotas via web::Data.
pub struct AppState {
    pub database: Database,
}
