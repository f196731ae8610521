use crate::value_functions::cql_value::CqlValue;
use std::collections::BTreeMap;
use std::fmt;

/// Fila a insertar o actualizar; las columnas quedan ordenadas por nombre.
pub type Record = BTreeMap<String, CqlValue>;

/// Texto CQL con sus valores posicionales (`?`).
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub query: String,
    pub values: Vec<CqlValue>,
}

impl Statement {
    pub fn new(query: impl Into<String>, values: Vec<CqlValue>) -> Self {
        Statement {
            query: query.into(),
            values,
        }
    }

    pub fn raw(query: impl Into<String>) -> Self {
        Self::new(query, vec![])
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.query)
    }
}
