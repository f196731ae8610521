use crate::query_functions::operator::Operator;
use crate::value_functions::cql_value::CqlValue;

/// Conector con la condición anterior. CQL solo acepta `and`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Boolean {
    And,
    Or,
}

// Representación de una condición del where
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    Basic {
        column: String,
        operator: Operator,
        value: CqlValue,
    },
    In {
        column: String,
        values: Vec<CqlValue>,
    },
    Contains {
        column: String,
        value: CqlValue,
    },
    ContainsKey {
        column: String,
        value: CqlValue,
    },
    /// `token("a", "b") > token(?, ?)`
    Token {
        columns: Vec<String>,
        operator: Operator,
        values: Vec<CqlValue>,
    },
}

impl Condition {
    /// Valores que la condición agrega a los bindings, en orden.
    pub fn bindings(&self) -> Vec<CqlValue> {
        match self {
            Condition::Basic { value, .. }
            | Condition::Contains { value, .. }
            | Condition::ContainsKey { value, .. } => vec![value.clone()],
            Condition::In { values, .. } | Condition::Token { values, .. } => values.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct WhereClause {
    pub boolean: Boolean,
    pub condition: Condition,
}
