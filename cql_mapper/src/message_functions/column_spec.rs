use crate::value_functions::column_type::ColumnType;

#[derive(Debug, Clone, PartialEq)]
pub struct ColumnSpec {
    pub keyspace: Option<String>, // Solo presente si no hay global table spec.
    pub table: Option<String>,
    pub name: String,          // Nombre de la columna.
    pub col_type: ColumnType, // Tipo de la columna (ejemplo: Varchar para 0x000D).
}

impl ColumnSpec {
    pub fn new(name: &str, col_type: ColumnType) -> Self {
        ColumnSpec {
            keyspace: None,
            table: None,
            name: name.to_string(),
            col_type,
        }
    }
}
