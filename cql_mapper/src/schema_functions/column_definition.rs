use crate::schema_functions::schema_type::SchemaType;

#[derive(Debug, Clone, PartialEq)]
pub struct ColumnDefinition {
    pub name: String,
    pub column_type: SchemaType,
    pub is_static: bool, // Columna compartida por toda la partición
}

impl ColumnDefinition {
    pub fn new(name: &str, column_type: SchemaType) -> Self {
        ColumnDefinition {
            name: name.to_string(),
            column_type,
            is_static: false,
        }
    }

    pub fn static_column(&mut self) -> &mut Self {
        self.is_static = true;
        self
    }
}
