// src/validacao/mod.rs

// Declara o submódulo com o validador genérico (regras, esquemas e relatório)
pub mod regras;
// Declara o submódulo com o extrator `Validated<T>` para o Actix Web
pub mod extrator;
