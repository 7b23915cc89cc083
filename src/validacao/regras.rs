// src/validacao/regras.rs

use std::collections::BTreeMap;
use std::str::FromStr;

use bigdecimal::BigDecimal;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::shared::errors::ValidationError;

/// Uma restrição aplicada ao valor bruto de um campo: nome, mensagem e predicado.
#[derive(Clone, Copy)]
pub struct Rule {
    pub constraint: &'static str,
    pub message: &'static str,
    pub test: fn(&Value) -> bool,
}

pub const IS_NOT_EMPTY: Rule = Rule {
    constraint: "isNotEmpty",
    message: "should not be empty",
    test: is_not_empty,
};

pub const IS_NUMBER: Rule = Rule {
    constraint: "isNumber",
    message: "must be a number",
    test: Value::is_number,
};

pub const IS_INT: Rule = Rule {
    constraint: "isInt",
    message: "must be an integer number",
    test: is_int,
};

pub const IS_BOOLEAN: Rule = Rule {
    constraint: "isBoolean",
    message: "must be a boolean value",
    test: Value::is_boolean,
};

pub const IS_ARRAY: Rule = Rule {
    constraint: "isArray",
    message: "must be an array",
    test: Value::is_array,
};

fn is_not_empty(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(s) => !s.is_empty(),
        _ => true,
    }
}

// Os ids são INT no MySQL. `5.0` conta como inteiro; `5.5` não.
fn is_int(value: &Value) -> bool {
    as_i32(value).is_some()
}

fn as_i32(value: &Value) -> Option<i32> {
    if let Some(n) = value.as_i64() {
        return i32::try_from(n).ok();
    }

    let n = value.as_f64()?;
    if n.fract() == 0.0 && n >= f64::from(i32::MIN) && n <= f64::from(i32::MAX) {
        Some(n as i32)
    } else {
        None
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    Required,
    /// Ausente ou null: nenhuma regra é avaliada.
    Optional,
}

/// Um campo declarado do DTO. Só campos declarados são lidos da entrada.
pub struct Field {
    pub name: &'static str,
    pub presence: Presence,
    pub rules: &'static [Rule],
    /// Esquema de cada elemento quando o campo é uma lista de objetos aninhados.
    pub nested: Option<&'static Schema>,
}

pub struct Schema {
    pub name: &'static str,
    pub fields: &'static [Field],
}

/// Uma restrição violada.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    pub constraint: &'static str,
    pub message: String,
}

/// Relatório de validação: caminho do campo -> restrições violadas.
/// Relatório vazio significa entrada válida.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationReport {
    violations: BTreeMap<String, Vec<Violation>>,
}

impl ValidationReport {
    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    /// Quantidade de caminhos com pelo menos uma violação.
    pub fn len(&self) -> usize {
        self.violations.len()
    }

    pub fn get(&self, path: &str) -> Option<&[Violation]> {
        self.violations.get(path).map(Vec::as_slice)
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.violations.keys().map(String::as_str)
    }

    pub fn push(&mut self, path: &str, violation: Violation) {
        self.violations.entry(path.to_string()).or_default().push(violation);
    }
}

// Caminho usado quando a própria entrada não é um objeto.
pub const ROOT_PATH: &str = "$";

static ABSENT: Value = Value::Null;

/// Avalia todas as regras do esquema sobre a entrada e devolve o relatório completo.
/// Função pura: a mesma entrada sempre gera o mesmo relatório.
pub fn validate(schema: &Schema, input: &Value) -> ValidationReport {
    let mut report = ValidationReport::default();

    match input.as_object() {
        Some(object) => validate_object(schema, object, "", &mut report),
        None => report.push(
            ROOT_PATH,
            Violation {
                constraint: "isObject",
                message: format!("{} must be an object", schema.name),
            },
        ),
    }

    report
}

fn validate_object(schema: &Schema, object: &Map<String, Value>, prefix: &str, report: &mut ValidationReport) {
    for field in schema.fields {
        let path = if prefix.is_empty() {
            field.name.to_string()
        } else {
            format!("{}.{}", prefix, field.name)
        };
        let value = object.get(field.name).unwrap_or(&ABSENT);

        if field.presence == Presence::Optional && value.is_null() {
            continue;
        }

        for rule in field.rules {
            if !(rule.test)(value) {
                report.push(
                    &path,
                    Violation {
                        constraint: rule.constraint,
                        message: format!("{} {}", field.name, rule.message),
                    },
                );
            }
        }

        // Cada elemento da lista é validado com o esquema aninhado; as falhas
        // entram no relatório do pai com o índice no caminho.
        if let (Some(nested), Some(items)) = (field.nested, value.as_array()) {
            for (index, item) in items.iter().enumerate() {
                let item_path = format!("{}[{}]", path, index);
                match item.as_object() {
                    Some(item_object) => validate_object(nested, item_object, &item_path, report),
                    None => report.push(
                        &item_path,
                        Violation {
                            constraint: "nestedValidation",
                            message: format!("each value in {} must be an object", field.name),
                        },
                    ),
                }
            }
        }
    }
}

/// Um DTO com esquema declarado. `parse` é a única forma de construí-lo a partir de entrada externa.
pub trait Dto: Sized {
    fn schema() -> &'static Schema;

    /// Monta o DTO a partir de um objeto já validado, lendo só os campos declarados.
    fn from_fields(fields: &Map<String, Value>) -> Option<Self>;

    fn parse(input: &Value) -> Result<Self, ValidationError> {
        let report = validate(Self::schema(), input);
        if !report.is_empty() {
            return Err(ValidationError::new(report));
        }

        input.as_object().and_then(Self::from_fields).ok_or_else(|| {
            let mut report = ValidationReport::default();
            report.push(
                ROOT_PATH,
                Violation {
                    constraint: "isObject",
                    message: format!("{} could not be built from the input", Self::schema().name),
                },
            );
            ValidationError::new(report)
        })
    }
}

// Leitores de campos já validados.

pub fn integer(fields: &Map<String, Value>, name: &str) -> Option<i32> {
    fields.get(name).and_then(as_i32)
}

/// Converte pela forma textual do número, sem passar por f64.
pub fn decimal(fields: &Map<String, Value>, name: &str) -> Option<BigDecimal> {
    match fields.get(name)? {
        Value::Number(n) => BigDecimal::from_str(&n.to_string()).ok(),
        _ => None,
    }
}

pub fn boolean(fields: &Map<String, Value>, name: &str) -> Option<bool> {
    fields.get(name).and_then(Value::as_bool)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    static ITEM: Schema = Schema {
        name: "Item",
        fields: &[Field {
            name: "quantidade",
            presence: Presence::Required,
            rules: &[IS_NOT_EMPTY, IS_INT],
            nested: None,
        }],
    };

    static PEDIDO: Schema = Schema {
        name: "Pedido",
        fields: &[
            Field {
                name: "cliente",
                presence: Presence::Optional,
                rules: &[IS_INT],
                nested: None,
            },
            Field {
                name: "itens",
                presence: Presence::Required,
                rules: &[IS_ARRAY],
                nested: Some(&ITEM),
            },
        ],
    };

    fn constraints(report: &ValidationReport, path: &str) -> Vec<&'static str> {
        report
            .get(path)
            .unwrap_or_default()
            .iter()
            .map(|v| v.constraint)
            .collect()
    }

    #[test]
    fn campo_obrigatorio_ausente_viola_todas_as_regras() {
        let report = validate(&ITEM, &json!({}));

        assert_eq!(constraints(&report, "quantidade"), vec!["isNotEmpty", "isInt"]);
        assert_eq!(report.get("quantidade").unwrap()[0].message, "quantidade should not be empty");
    }

    #[test]
    fn string_vazia_nao_conta_como_presente() {
        let report = validate(&ITEM, &json!({ "quantidade": "" }));
        assert_eq!(constraints(&report, "quantidade"), vec!["isNotEmpty", "isInt"]);
    }

    #[test]
    fn opcional_nulo_ou_ausente_e_aceito() {
        assert!(validate(&PEDIDO, &json!({ "itens": [] })).is_empty());
        assert!(validate(&PEDIDO, &json!({ "cliente": null, "itens": [] })).is_empty());
        assert_eq!(
            constraints(&validate(&PEDIDO, &json!({ "cliente": "x", "itens": [] })), "cliente"),
            vec!["isInt"]
        );
    }

    #[test]
    fn inteiro_rejeita_fracao_e_estouro() {
        assert!(!is_int(&json!(1.5)));
        assert!(!is_int(&json!(i64::from(i32::MAX) + 1)));
        assert!(is_int(&json!(-7)));
    }

    #[test]
    fn inteiro_escrito_como_float_e_aceito() {
        assert!(is_int(&json!(5.0)));
        assert!(is_int(&json!(-2147483648.0)));
        assert!(!is_int(&json!(2147483648.0)));
        assert!(!is_int(&json!(5.25)));

        let fields = json!({ "id": 5.0 });
        assert_eq!(integer(fields.as_object().unwrap(), "id"), Some(5));
    }

    #[test]
    fn elementos_aninhados_usam_caminho_com_indice() {
        let report = validate(
            &PEDIDO,
            &json!({ "itens": [{ "quantidade": 1 }, { "quantidade": "dois" }, 3] }),
        );

        assert_eq!(report.paths().collect::<Vec<_>>(), vec!["itens[1].quantidade", "itens[2]"]);
        assert_eq!(constraints(&report, "itens[2]"), vec!["nestedValidation"]);
    }

    #[test]
    fn lista_ausente_viola_is_array() {
        let report = validate(&PEDIDO, &json!({}));
        assert_eq!(constraints(&report, "itens"), vec!["isArray"]);
    }

    #[test]
    fn entrada_que_nao_e_objeto_gera_violacao_na_raiz() {
        let report = validate(&PEDIDO, &json!([1, 2]));

        assert_eq!(report.len(), 1);
        assert_eq!(constraints(&report, ROOT_PATH), vec!["isObject"]);
    }

    #[test]
    fn relatorio_serializa_como_mapa_de_caminhos() {
        let report = validate(&ITEM, &json!({ "quantidade": true }));
        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(
            json,
            json!({ "quantidade": [{ "constraint": "isInt", "message": "quantidade must be an integer number" }] })
        );
    }

    #[test]
    fn decimal_preserva_a_forma_textual() {
        let fields = json!({ "valor": 0.1, "inteiro": 50 });
        let fields = fields.as_object().unwrap();

        assert_eq!(decimal(fields, "valor"), Some(BigDecimal::from_str("0.1").unwrap()));
        assert_eq!(decimal(fields, "inteiro"), Some(BigDecimal::from(50)));
        assert_eq!(decimal(fields, "ausente"), None);
    }
}
