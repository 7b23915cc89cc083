// src/vendas/vendas_structs.rs

use bigdecimal::BigDecimal;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::validacao::regras::{
    boolean, decimal, integer, Dto, Field, Presence, Schema, IS_ARRAY, IS_BOOLEAN, IS_INT, IS_NOT_EMPTY,
    IS_NUMBER,
};

// Esquemas de validação de cada DTO: campo -> lista de regras.
// Os nomes dos campos são os nomes expostos no JSON.

pub static CREATE_SALE_DETAIL_SCHEMA: Schema = Schema {
    name: "CreateSaleDetail",
    fields: &[
        Field { name: "ticketId", presence: Presence::Optional, rules: &[IS_INT], nested: None },
        Field { name: "amount", presence: Presence::Required, rules: &[IS_NOT_EMPTY, IS_NUMBER], nested: None },
    ],
};

pub static CREATE_SALE_SCHEMA: Schema = Schema {
    name: "CreateSale",
    fields: &[
        Field { name: "userId", presence: Presence::Optional, rules: &[IS_INT], nested: None },
        Field { name: "partnerId", presence: Presence::Optional, rules: &[IS_INT], nested: None },
        Field { name: "totalAmount", presence: Presence::Required, rules: &[IS_NOT_EMPTY, IS_NUMBER], nested: None },
        Field {
            name: "saleDetails",
            presence: Presence::Required,
            rules: &[IS_ARRAY],
            nested: Some(&CREATE_SALE_DETAIL_SCHEMA),
        },
    ],
};

pub static UPDATE_SALE_SCHEMA: Schema = Schema {
    name: "UpdateSale",
    fields: &[
        Field { name: "id", presence: Presence::Required, rules: &[IS_NOT_EMPTY, IS_INT], nested: None },
        Field { name: "userId", presence: Presence::Optional, rules: &[IS_INT], nested: None },
        Field { name: "partnerId", presence: Presence::Optional, rules: &[IS_INT], nested: None },
        Field { name: "totalAmount", presence: Presence::Optional, rules: &[IS_NUMBER], nested: None },
        Field { name: "isActive", presence: Presence::Optional, rules: &[IS_BOOLEAN], nested: None },
    ],
};

pub static UPDATE_SALE_DETAIL_SCHEMA: Schema = Schema {
    name: "UpdateSaleDetail",
    fields: &[
        Field { name: "id", presence: Presence::Required, rules: &[IS_NOT_EMPTY, IS_INT], nested: None },
        Field { name: "ticketId", presence: Presence::Optional, rules: &[IS_INT], nested: None },
        Field { name: "amount", presence: Presence::Optional, rules: &[IS_NUMBER], nested: None },
        Field { name: "isActive", presence: Presence::Optional, rules: &[IS_BOOLEAN], nested: None },
    ],
};

/// Item de uma nova venda.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSaleDetailDto {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ticket_id: Option<i32>,
    pub amount: BigDecimal,
}

/// Dados para cadastrar uma venda com seus itens.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSaleDto {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub partner_id: Option<i32>,
    pub total_amount: BigDecimal,
    pub sale_details: Vec<CreateSaleDetailDto>,
}

/// Atualização parcial de uma venda. Só `id` é obrigatório.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSaleDto {
    pub id: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub partner_id: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_amount: Option<BigDecimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

/// Atualização parcial de um item de venda.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSaleDetailDto {
    pub id: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ticket_id: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<BigDecimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

impl Dto for CreateSaleDetailDto {
    fn schema() -> &'static Schema {
        &CREATE_SALE_DETAIL_SCHEMA
    }

    fn from_fields(fields: &Map<String, Value>) -> Option<Self> {
        Some(CreateSaleDetailDto {
            ticket_id: integer(fields, "ticketId"),
            amount: decimal(fields, "amount")?,
        })
    }
}

impl Dto for CreateSaleDto {
    fn schema() -> &'static Schema {
        &CREATE_SALE_SCHEMA
    }

    fn from_fields(fields: &Map<String, Value>) -> Option<Self> {
        let sale_details = fields
            .get("saleDetails")?
            .as_array()?
            .iter()
            .map(|item| item.as_object().and_then(CreateSaleDetailDto::from_fields))
            .collect::<Option<Vec<_>>>()?;

        Some(CreateSaleDto {
            user_id: integer(fields, "userId"),
            partner_id: integer(fields, "partnerId"),
            total_amount: decimal(fields, "totalAmount")?,
            sale_details,
        })
    }
}

impl Dto for UpdateSaleDto {
    fn schema() -> &'static Schema {
        &UPDATE_SALE_SCHEMA
    }

    fn from_fields(fields: &Map<String, Value>) -> Option<Self> {
        Some(UpdateSaleDto {
            id: integer(fields, "id")?,
            user_id: integer(fields, "userId"),
            partner_id: integer(fields, "partnerId"),
            total_amount: decimal(fields, "totalAmount"),
            is_active: boolean(fields, "isActive"),
        })
    }
}

impl Dto for UpdateSaleDetailDto {
    fn schema() -> &'static Schema {
        &UPDATE_SALE_DETAIL_SCHEMA
    }

    fn from_fields(fields: &Map<String, Value>) -> Option<Self> {
        Some(UpdateSaleDetailDto {
            id: integer(fields, "id")?,
            ticket_id: integer(fields, "ticketId"),
            amount: decimal(fields, "amount"),
            is_active: boolean(fields, "isActive"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn constraints(err: &crate::shared::errors::ValidationError, path: &str) -> Vec<&'static str> {
        err.report
            .get(path)
            .unwrap_or_default()
            .iter()
            .map(|v| v.constraint)
            .collect()
    }

    #[test]
    fn item_valido_com_e_sem_ticket() {
        let item = CreateSaleDetailDto::parse(&json!({ "amount": 50 })).unwrap();
        assert_eq!(item.ticket_id, None);
        assert_eq!(item.amount, BigDecimal::from(50));

        let item = CreateSaleDetailDto::parse(&json!({ "ticketId": 9, "amount": 12.5 })).unwrap();
        assert_eq!(item.ticket_id, Some(9));

        let err = CreateSaleDetailDto::parse(&json!({ "ticketId": "9", "amount": 1 })).unwrap_err();
        assert_eq!(constraints(&err, "ticketId"), vec!["isInt"]);
    }

    #[test]
    fn venda_valida_sem_usuario_nem_parceiro() {
        let venda =
            CreateSaleDto::parse(&json!({ "totalAmount": 100, "saleDetails": [{ "amount": 50 }, { "amount": 50 }] }))
                .unwrap();

        assert_eq!(venda.user_id, None);
        assert_eq!(venda.partner_id, None);
        assert_eq!(venda.total_amount, BigDecimal::from(100));
        assert_eq!(venda.sale_details.len(), 2);
    }

    #[test]
    fn venda_sem_total_falha_em_total_amount() {
        let err = CreateSaleDto::parse(&json!({ "userId": 1, "saleDetails": [{ "amount": 50 }] })).unwrap_err();

        assert_eq!(err.report.paths().collect::<Vec<_>>(), vec!["totalAmount"]);
        assert_eq!(constraints(&err, "totalAmount"), vec!["isNotEmpty", "isNumber"]);

        // Continua falhando em totalAmount mesmo com outros campos inválidos.
        let err = CreateSaleDto::parse(&json!({ "userId": "x", "saleDetails": "nada" })).unwrap_err();
        assert!(err.report.get("totalAmount").is_some());
        assert!(err.report.get("saleDetails").is_some());
        assert!(err.report.get("userId").is_some());
    }

    #[test]
    fn total_nao_numerico_falha() {
        let err = CreateSaleDto::parse(&json!({ "totalAmount": "abc", "saleDetails": [] })).unwrap_err();

        assert_eq!(err.report.len(), 1);
        assert_eq!(constraints(&err, "totalAmount"), vec!["isNumber"]);
        assert_eq!(err.report.get("totalAmount").unwrap()[0].message, "totalAmount must be a number");
    }

    #[test]
    fn item_invalido_gera_violacao_so_no_seu_caminho() {
        let err = CreateSaleDto::parse(&json!({
            "totalAmount": 100,
            "saleDetails": [{ "amount": 50 }, { "amount": "cinquenta" }, { "ticketId": 3, "amount": 0 }]
        }))
        .unwrap_err();

        assert_eq!(err.report.paths().collect::<Vec<_>>(), vec!["saleDetails[1].amount"]);
        assert_eq!(constraints(&err, "saleDetails[1].amount"), vec!["isNumber"]);
    }

    #[test]
    fn campos_extras_sao_ignorados_e_nao_serializados() {
        let venda = CreateSaleDto::parse(&json!({
            "totalAmount": 10,
            "isAdmin": true,
            "saleDetails": [{ "amount": 10, "discount": 99 }]
        }))
        .unwrap();
        let json = serde_json::to_value(&venda).unwrap();

        assert_eq!(json.as_object().unwrap().keys().collect::<Vec<_>>(), vec!["saleDetails", "totalAmount"]);
        assert_eq!(json["saleDetails"][0].as_object().unwrap().len(), 1);
    }

    #[test]
    fn atualizacoes_aceitam_so_o_id() {
        let venda = UpdateSaleDto::parse(&json!({ "id": 1 })).unwrap();
        assert_eq!(
            venda,
            UpdateSaleDto { id: 1, user_id: None, partner_id: None, total_amount: None, is_active: None }
        );

        let item = UpdateSaleDetailDto::parse(&json!({ "id": 2 })).unwrap();
        assert_eq!(item, UpdateSaleDetailDto { id: 2, ticket_id: None, amount: None, is_active: None });
    }

    #[test]
    fn id_inteiro_escrito_como_float_e_aceito() {
        let venda = UpdateSaleDto::parse(&json!({ "id": 5.0, "userId": 3.0 })).unwrap();
        assert_eq!(venda.id, 5);
        assert_eq!(venda.user_id, Some(3));

        let item = CreateSaleDetailDto::parse(&json!({ "ticketId": 8.0, "amount": 1 })).unwrap();
        assert_eq!(item.ticket_id, Some(8));
    }

    #[test]
    fn is_active_nao_booleano_falha() {
        let err = UpdateSaleDto::parse(&json!({ "id": 1, "isActive": "yes" })).unwrap_err();
        assert_eq!(constraints(&err, "isActive"), vec!["isBoolean"]);

        let err = UpdateSaleDetailDto::parse(&json!({ "id": 1, "isActive": "yes" })).unwrap_err();
        assert_eq!(constraints(&err, "isActive"), vec!["isBoolean"]);

        let item = UpdateSaleDetailDto::parse(&json!({ "id": 1, "isActive": false, "amount": 3.75 })).unwrap();
        assert_eq!(item.is_active, Some(false));
    }

    #[test]
    fn atualizacao_sem_id_falha() {
        let err = UpdateSaleDto::parse(&json!({ "totalAmount": 5 })).unwrap_err();
        assert_eq!(constraints(&err, "id"), vec!["isNotEmpty", "isInt"]);

        let err = UpdateSaleDetailDto::parse(&json!({ "id": 1.5 })).unwrap_err();
        assert_eq!(constraints(&err, "id"), vec!["isInt"]);
    }

    #[test]
    fn validar_duas_vezes_gera_o_mesmo_relatorio() {
        let entrada = json!({ "totalAmount": null, "saleDetails": [{ "ticketId": 1.2 }, "x"] });

        let primeiro = CreateSaleDto::parse(&entrada).unwrap_err();
        let segundo = CreateSaleDto::parse(&entrada).unwrap_err();

        assert_eq!(primeiro, segundo);
        assert_eq!(
            primeiro.report.paths().collect::<Vec<_>>(),
            vec!["saleDetails[0].amount", "saleDetails[0].ticketId", "saleDetails[1]", "totalAmount"]
        );
    }
}
