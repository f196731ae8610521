use crate::error::CqlResult;
use crate::value_functions::{cql_value::CqlValue, host::to_host};
use serde_json::{Map, Value};
use std::rc::Rc;

/// Fila de un resultado. Los nombres de columna se comparten entre las filas de una página.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    columns: Rc<[String]>,
    values: Vec<CqlValue>,
}

impl Row {
    pub fn new(columns: Rc<[String]>, values: Vec<CqlValue>) -> Self {
        Row { columns, values }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn values(&self) -> &[CqlValue] {
        &self.values
    }

    pub fn get(&self, column: &str) -> Option<&CqlValue> {
        self.columns
            .iter()
            .position(|name| name == column)
            .and_then(|index| self.values.get(index))
    }

    /// Hidrata la fila como un objeto del host.
    pub fn to_json(&self) -> CqlResult<Value> {
        let mut object = Map::new();
        for (name, value) in self.columns.iter().zip(&self.values) {
            object.insert(name.clone(), to_host(value)?);
        }
        Ok(Value::Object(object))
    }
}
