// src/config/config_structs.rs

use std::fmt;
use std::time::Duration;

use sqlx::mysql::MySqlConnectOptions;

use crate::shared::errors::ConfigError;

// Valores padrão usados quando a variável de ambiente está ausente ou vazia.
pub const DEFAULT_DB_HOST: &str = "localhost";
pub const DEFAULT_DB_PORT: u16 = 3306;
pub const DEFAULT_DB_USERNAME: &str = "root";
pub const DEFAULT_DB_PASSWORD: &str = "";
pub const DEFAULT_DB_NAME: &str = "SOA";
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

pub const DEFAULT_APP_HOST: &str = "127.0.0.1";
pub const DEFAULT_APP_PORT: u16 = 8080;

/// Parâmetros de conexão com o banco MySQL.
///
/// Construída uma única vez na inicialização e passada para `Database::new`.
/// A sincronização automática de schema não é configurável: a conexão nunca
/// altera o schema (veja `DbConfig::synchronize`).
#[derive(Clone, PartialEq, Eq)]
pub struct DbConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub database: String,
    pub max_connections: u32,
    pub connect_timeout: Duration,
    pub connect_retries: u32,
    pub fail_fast: bool,
}

impl DbConfig {
    /// Lê a configuração das variáveis de ambiente do processo.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Lê a configuração a partir de uma função de busca qualquer.
    /// Valores vazios são tratados como ausentes.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |var: &str| lookup(var).filter(|valor| !valor.is_empty());

        let port = match get("DB_PORT") {
            Some(valor) => parse_port("DB_PORT", &valor)?,
            None => DEFAULT_DB_PORT,
        };

        let max_connections = match get("DB_MAX_CONNECTIONS") {
            Some(valor) => match parse_number("DB_MAX_CONNECTIONS", &valor)? {
                0 => {
                    return Err(ConfigError::InvalidNumber {
                        var: "DB_MAX_CONNECTIONS",
                        value: valor,
                    })
                }
                n => n,
            },
            None => DEFAULT_MAX_CONNECTIONS,
        };

        let connect_timeout = match get("DB_CONNECT_TIMEOUT_SECS") {
            Some(valor) => Duration::from_secs(u64::from(parse_number("DB_CONNECT_TIMEOUT_SECS", &valor)?)),
            None => Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
        };

        let connect_retries = match get("DB_CONNECT_RETRIES") {
            Some(valor) => parse_number("DB_CONNECT_RETRIES", &valor)?,
            None => 0,
        };

        let fail_fast = match get("DB_FAIL_FAST") {
            Some(valor) => parse_flag("DB_FAIL_FAST", &valor)?,
            None => false,
        };

        Ok(DbConfig {
            host: get("DB_HOST").unwrap_or_else(|| DEFAULT_DB_HOST.to_string()),
            port,
            username: get("DB_USERNAME").unwrap_or_else(|| DEFAULT_DB_USERNAME.to_string()),
            password: get("DB_PASSWORD").unwrap_or_else(|| DEFAULT_DB_PASSWORD.to_string()),
            database: get("DB_NAME").unwrap_or_else(|| DEFAULT_DB_NAME.to_string()),
            max_connections,
            connect_timeout,
            connect_retries,
            fail_fast,
        })
    }

    /// Sincronização automática de schema. Sempre desligada.
    pub fn synchronize(&self) -> bool {
        false
    }

    /// Opções de conexão do sqlx montadas a partir da configuração.
    pub fn connect_options(&self) -> MySqlConnectOptions {
        let options = MySqlConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.username)
            .database(&self.database);

        if self.password.is_empty() {
            options
        } else {
            options.password(&self.password)
        }
    }
}

impl Default for DbConfig {
    fn default() -> Self {
        DbConfig {
            host: DEFAULT_DB_HOST.to_string(),
            port: DEFAULT_DB_PORT,
            username: DEFAULT_DB_USERNAME.to_string(),
            password: DEFAULT_DB_PASSWORD.to_string(),
            database: DEFAULT_DB_NAME.to_string(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
            connect_retries: 0,
            fail_fast: false,
        }
    }
}

// A senha nunca aparece nos logs.
impl fmt::Debug for DbConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DbConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"***")
            .field("database", &self.database)
            .field("max_connections", &self.max_connections)
            .field("connect_timeout", &self.connect_timeout)
            .field("connect_retries", &self.connect_retries)
            .field("fail_fast", &self.fail_fast)
            .finish()
    }
}

/// Endereço onde o servidor HTTP escuta.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |var: &str| lookup(var).filter(|valor| !valor.is_empty());

        let port = match get("APP_PORT") {
            Some(valor) => parse_port("APP_PORT", &valor)?,
            None => DEFAULT_APP_PORT,
        };

        Ok(ServerConfig {
            host: get("APP_HOST").unwrap_or_else(|| DEFAULT_APP_HOST.to_string()),
            port,
        })
    }
}

fn parse_port(var: &'static str, valor: &str) -> Result<u16, ConfigError> {
    match valor.trim().parse::<u16>() {
        Ok(port) if port != 0 => Ok(port),
        _ => Err(ConfigError::InvalidPort {
            var,
            value: valor.to_string(),
        }),
    }
}

fn parse_number(var: &'static str, valor: &str) -> Result<u32, ConfigError> {
    valor.trim().parse::<u32>().map_err(|_| ConfigError::InvalidNumber {
        var,
        value: valor.to_string(),
    })
}

fn parse_flag(var: &'static str, valor: &str) -> Result<bool, ConfigError> {
    match valor.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        _ => Err(ConfigError::InvalidFlag {
            var,
            value: valor.to_string(),
        }),
    }
}
