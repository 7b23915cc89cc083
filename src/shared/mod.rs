// src/shared/mod.rs

// Declara o submódulo com a estrutura de resposta genérica da API
pub mod shared_structs;
// Declara o submódulo com os tipos de erro da aplicação
pub mod errors;
