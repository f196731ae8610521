#[derive(Debug, Clone, PartialEq)]
pub struct RowContent {
    pub values: Vec<Option<Vec<u8>>>, // Una celda [bytes] por columna; `None` es null.
}
