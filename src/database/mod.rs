// src/database/mod.rs

// Declara o submódulo com as entidades (Sale, SaleDetail) e o registro de mapeamentos
pub mod database_structs;
// Declara o submódulo com o handle da conexão, a inicialização e o portão de prontidão
pub mod conexao;
