use crate::error::CqlResult;
use crate::message_functions::column_spec::ColumnSpec;
use crate::pager_functions::page_cursor::{PageCursor, PageState};
use crate::pager_functions::row::Row;
use crate::query_functions::{query_options::QueryOptions, statement::Statement};
use crate::session::{Page, Session};
use log::debug;
use std::rc::Rc;
use std::time::Duration;

/// Página de resultados junto con lo necesario para pedir la siguiente.
#[derive(Debug, Clone)]
pub struct Rows {
    columns: Vec<ColumnSpec>,
    rows: Vec<Row>,
    state: PageState,
    statement: Statement,
    options: QueryOptions,
}

impl Rows {
    pub fn new(statement: Statement, options: QueryOptions, page: Page) -> Self {
        let names: Rc<[String]> = page
            .columns
            .iter()
            .map(|spec| spec.name.clone())
            .collect::<Vec<_>>()
            .into();
        let rows = page
            .rows
            .into_iter()
            .map(|values| Row::new(Rc::clone(&names), values))
            .collect();
        Rows {
            columns: page.columns,
            rows,
            state: PageState::from_token(page.paging_state),
            statement,
            options,
        }
    }

    // Cursor vacío que ya no avanza.
    fn terminal(&self) -> Self {
        Rows {
            columns: self.columns.clone(),
            rows: vec![],
            state: PageState::LastPage,
            statement: self.statement.clone(),
            options: self.options.clone(),
        }
    }

    pub fn columns(&self) -> &[ColumnSpec] {
        &self.columns
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<Row> {
        self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn first(&self) -> Option<&Row> {
        self.rows.first()
    }

    /// Token para pedir la página siguiente; `None` en la última.
    pub fn paging_state_token(&self) -> Option<&[u8]> {
        match &self.state {
            PageState::HasMore(token) => Some(token),
            PageState::LastPage => None,
        }
    }

    pub fn statement(&self) -> &Statement {
        &self.statement
    }
}

impl PageCursor for Rows {
    fn page_state(&self) -> &PageState {
        &self.state
    }

    fn next_page(&self, session: &mut dyn Session, hint: Option<Duration>) -> CqlResult<Self> {
        let token = match &self.state {
            PageState::HasMore(token) => token.clone(),
            PageState::LastPage => return Ok(self.terminal()),
        };
        let options = self.options.clone().with_paging_state(Some(token));
        // El hint vale solo para este pedido; la página nueva no lo hereda
        let request = options.clone().with_timeout(hint);
        debug!("Pidiendo la página siguiente de: {}", self.statement);
        let page = session.execute(&self.statement, &request)?;
        Ok(Rows::new(self.statement.clone(), options, page))
    }
}
