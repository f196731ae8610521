use crate::error::CqlResult;
use crate::pager_functions::page_cursor::PageCursor;
use crate::pager_functions::{row::Row, rows::Rows};
use crate::session::Session;
use crate::value_functions::cql_value::CqlValue;
use serde_json::Value;
use std::cmp::Ordering;

/// Filas acumuladas más el último cursor, para seguir pidiendo páginas.
#[derive(Debug, Clone, Default)]
pub struct Collection {
    items: Vec<Row>,
    rows: Option<Rows>,
}

impl Collection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_rows(rows: Rows) -> Self {
        Collection {
            items: rows.rows().to_vec(),
            rows: Some(rows),
        }
    }

    /// Cursor de la última página leída.
    pub fn rows_instance(&self) -> Option<&Rows> {
        self.rows.as_ref()
    }

    pub fn set_rows_instance(&mut self, rows: Rows) {
        self.rows = Some(rows);
    }

    pub fn next_page_token(&self) -> Option<&[u8]> {
        self.rows.as_ref().and_then(|rows| rows.paging_state_token())
    }

    /// Sin cursor se considera la última página.
    pub fn is_last_page(&self) -> bool {
        self.rows.as_ref().map_or(true, |rows| rows.is_last_page())
    }

    /// Colección con la página siguiente; vacía si ya no hay más.
    pub fn next_page(&self, session: &mut dyn Session) -> CqlResult<Collection> {
        match &self.rows {
            Some(rows) if rows.has_next_page() => {
                Ok(Collection::from_rows(rows.next_page(session, None)?))
            }
            _ => Ok(Collection::new()),
        }
    }

    /// Agrega las filas de la página siguiente. No tiene tope: quien llama
    /// decide cuántas filas traer.
    pub fn append_next_page(&mut self, session: &mut dyn Session) -> CqlResult<&mut Self> {
        let next = self.next_page(session)?;
        if let Some(rows) = next.rows {
            self.items.extend(next.items);
            self.rows = Some(rows);
        }
        Ok(self)
    }

    pub fn push(&mut self, row: Row) {
        self.items.push(row);
    }

    pub fn rows(&self) -> &[Row] {
        &self.items
    }

    pub fn into_items(self) -> Vec<Row> {
        self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn first(&self) -> Option<&Row> {
        self.items.first()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Row> {
        self.items.iter()
    }

    /// Valores de una columna; `Null` si la fila no la tiene.
    pub fn pluck(&self, column: &str) -> Vec<CqlValue> {
        self.items
            .iter()
            .map(|row| row.get(column).cloned().unwrap_or(CqlValue::Null))
            .collect()
    }

    /// Orden estable por una columna, ascendente.
    pub fn sort_by(mut self, column: &str) -> Self {
        self.items.sort_by(|a, b| compare_column(a, b, column));
        self
    }

    pub fn sort_by_desc(mut self, column: &str) -> Self {
        self.items.sort_by(|a, b| compare_column(b, a, column));
        self
    }

    pub fn take(mut self, count: usize) -> Self {
        self.items.truncate(count);
        self
    }

    pub fn into_json(&self) -> CqlResult<Value> {
        let rows = self
            .items
            .iter()
            .map(Row::to_json)
            .collect::<CqlResult<Vec<_>>>()?;
        Ok(Value::Array(rows))
    }
}

impl<'a> IntoIterator for &'a Collection {
    type Item = &'a Row;
    type IntoIter = std::slice::Iter<'a, Row>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

fn compare_column(a: &Row, b: &Row, column: &str) -> Ordering {
    match (a.get(column), b.get(column)) {
        (Some(x), Some(y)) => compare_values(x, y),
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Orden entre valores del mismo tipo; `Null` va primero y los tipos
/// que no se comparan quedan iguales.
pub fn compare_values(a: &CqlValue, b: &CqlValue) -> Ordering {
    if let (Some(x), Some(y)) = (a.as_i64(), b.as_i64()) {
        return x.cmp(&y);
    }
    match (a, b) {
        (CqlValue::Null, CqlValue::Null) => Ordering::Equal,
        (CqlValue::Null, _) => Ordering::Less,
        (_, CqlValue::Null) => Ordering::Greater,
        (CqlValue::Double(x), CqlValue::Double(y)) => x.total_cmp(y),
        (CqlValue::Float(x), CqlValue::Float(y)) => x.total_cmp(y),
        (CqlValue::Decimal(x), CqlValue::Decimal(y)) => x.cmp(y),
        (CqlValue::Varint(x), CqlValue::Varint(y)) => x.cmp(y),
        (CqlValue::Boolean(x), CqlValue::Boolean(y)) => x.cmp(y),
        (CqlValue::Timestamp(x), CqlValue::Timestamp(y)) => x.cmp(y),
        (CqlValue::Date(x), CqlValue::Date(y)) => x.cmp(y),
        (CqlValue::Time(x), CqlValue::Time(y)) => x.cmp(y),
        (CqlValue::Inet(x), CqlValue::Inet(y)) => x.cmp(y),
        _ => match (a.as_text(), b.as_text()) {
            (Some(x), Some(y)) => x.cmp(y),
            _ => match (a.as_uuid(), b.as_uuid()) {
                (Some(x), Some(y)) => x.cmp(&y),
                _ => Ordering::Equal,
            },
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message_functions::column_spec::ColumnSpec;
    use crate::query_functions::{query_options::QueryOptions, statement::Statement};
    use crate::session::Page;
    use crate::value_functions::column_type::ColumnType;

    fn collection(values: &[(i32, &str)]) -> Collection {
        let page = Page::new(
            vec![
                ColumnSpec::new("batch", ColumnType::Int),
                ColumnSpec::new("migration", ColumnType::Varchar),
            ],
            values
                .iter()
                .map(|(batch, name)| vec![CqlValue::Int(*batch), CqlValue::from(*name)])
                .collect(),
            None,
        );
        Collection::from_rows(Rows::new(
            Statement::raw("select * from \"migrations\""),
            QueryOptions::default(),
            page,
        ))
    }

    #[test]
    fn sort_is_stable_and_pluck_keeps_order() {
        let sorted = collection(&[(2, "c"), (1, "a"), (2, "d"), (1, "b")]).sort_by("batch");
        assert_eq!(
            sorted.pluck("migration"),
            vec![
                CqlValue::from("a"),
                CqlValue::from("b"),
                CqlValue::from("c"),
                CqlValue::from("d")
            ]
        );
    }

    #[test]
    fn sort_desc_then_take() {
        let top = collection(&[(1, "a"), (3, "c"), (2, "b")])
            .sort_by_desc("batch")
            .take(2);
        assert_eq!(top.pluck("batch"), vec![CqlValue::Int(3), CqlValue::Int(2)]);
    }

    #[test]
    fn empty_collection_is_last_page() {
        let empty = Collection::new();
        assert!(empty.is_last_page());
        assert_eq!(empty.next_page_token(), None);
    }

    #[test]
    fn json_uses_column_names() {
        let json = collection(&[(1, "create_users")]).into_json().unwrap();
        assert_eq!(
            json,
            serde_json::json!([{"batch": 1, "migration": "create_users"}])
        );
    }
}
