// src/vendas/mod.rs

// Declara o submódulo com os DTOs de entrada de vendas e itens de venda
pub mod vendas_structs;
