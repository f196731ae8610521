// session.rs
use crate::error::CqlResult;
use crate::message_functions::column_spec::ColumnSpec;
use crate::query_functions::{query_options::QueryOptions, statement::Statement};
use crate::value_functions::cql_value::CqlValue;

/// Una página de resultados tal como la devuelve el driver.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub columns: Vec<ColumnSpec>,
    pub rows: Vec<Vec<CqlValue>>,
    pub paging_state: Option<Vec<u8>>, // `None` en la última página
}

impl Page {
    pub fn new(columns: Vec<ColumnSpec>, rows: Vec<Vec<CqlValue>>, paging_state: Option<Vec<u8>>) -> Self {
        Page {
            columns,
            rows,
            paging_state,
        }
    }

    /// Resultado de una sentencia que no devuelve filas.
    pub fn void() -> Self {
        Self::default()
    }

    pub fn is_last(&self) -> bool {
        self.paging_state.is_none()
    }
}

/// Punto de unión con el driver. Los errores se propagan sin modificar
/// y no hay reintentos.
pub trait Session {
    fn execute(&mut self, statement: &Statement, options: &QueryOptions) -> CqlResult<Page>;

    fn batch(&mut self, statements: &[Statement], options: &QueryOptions) -> CqlResult<()>;

    /// Keyspace activo de la sesión, si hay uno.
    fn keyspace(&self) -> Option<&str> {
        None
    }
}

impl<S: Session + ?Sized> Session for Box<S> {
    fn execute(&mut self, statement: &Statement, options: &QueryOptions) -> CqlResult<Page> {
        (**self).execute(statement, options)
    }

    fn batch(&mut self, statements: &[Statement], options: &QueryOptions) -> CqlResult<()> {
        (**self).batch(statements, options)
    }

    fn keyspace(&self) -> Option<&str> {
        (**self).keyspace()
    }
}
