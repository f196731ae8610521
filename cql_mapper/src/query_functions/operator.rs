use crate::error::{CqlResult, ErrorType};

// Operadores posibles para las condiciones
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Equal,              // "="
    NotEqual,           // "!="
    GreaterThan,        // ">"
    LessThan,           // "<"
    GreaterThanOrEqual, // ">="
    LessThanOrEqual,    // "<="
}

impl Operator {
    //se encarga de parsear los operadores
    pub fn parse(op_str: &str) -> CqlResult<Self> {
        match op_str.trim() {
            "=" | "==" => Ok(Operator::Equal),
            "!=" | "<>" => Ok(Operator::NotEqual),
            ">" => Ok(Operator::GreaterThan),
            "<" => Ok(Operator::LessThan),
            ">=" => Ok(Operator::GreaterThanOrEqual),
            "<=" => Ok(Operator::LessThanOrEqual),
            other => Err(ErrorType::InvalidQuery(format!(
                "Invalid operator: {}",
                other
            ))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::Equal => "=",
            Operator::NotEqual => "!=",
            Operator::GreaterThan => ">",
            Operator::LessThan => "<",
            Operator::GreaterThanOrEqual => ">=",
            Operator::LessThanOrEqual => "<=",
        }
    }
}
