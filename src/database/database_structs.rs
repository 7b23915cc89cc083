// src/database/database_structs.rs

use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

/// Associação entre uma entidade e a tabela que ela mapeia.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntityMapping {
    pub entity: &'static str,
    pub table: &'static str,
}

/// Entidade persistida conhecida pela conexão.
pub trait Entity {
    const MAPPING: EntityMapping;
}

/// Estrutura que representa uma venda no banco de dados
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Sale {
    pub id: i32,
    pub user_id: Option<i32>,
    pub partner_id: Option<i32>,
    pub total_amount: BigDecimal,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Estrutura que representa um item de venda no banco de dados
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct SaleDetail {
    pub id: i32,
    pub sale_id: i32,
    pub ticket_id: Option<i32>,
    pub amount: BigDecimal,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Entity for Sale {
    const MAPPING: EntityMapping = EntityMapping { entity: "Sale", table: "sales" };
}

impl Entity for SaleDetail {
    const MAPPING: EntityMapping = EntityMapping { entity: "SaleDetail", table: "sale_details" };
}

// Registro estático das entidades que a conexão conhece.
pub static ENTITIES: [EntityMapping; 2] = [Sale::MAPPING, SaleDetail::MAPPING];
