// src/config/mod.rs

// Declara o submódulo com as structs de configuração (banco e servidor HTTP)
pub mod config_structs;
