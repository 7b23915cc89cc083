// src/saude/mod.rs

// Declara o submódulo com a rota de health check
pub mod saude_router;
