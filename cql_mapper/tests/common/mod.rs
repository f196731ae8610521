#![allow(dead_code)]

use cql_mapper::config::ConnectionConfig;
use cql_mapper::connection::Connection;
use cql_mapper::error::{CqlResult, ErrorType};
use cql_mapper::message_functions::column_spec::ColumnSpec;
use cql_mapper::query_functions::{query_options::QueryOptions, statement::Statement};
use cql_mapper::session::{Page, Session};
use cql_mapper::value_functions::column_type::ColumnType;
use cql_mapper::value_functions::cql_value::CqlValue;
use std::collections::VecDeque;

/// Sesión en memoria: guarda lo que se ejecuta y responde con páginas armadas a mano.
#[derive(Default)]
pub struct RecordingSession {
    pub executed: Vec<(Statement, QueryOptions)>,
    pub batches: Vec<Vec<Statement>>,
    responses: VecDeque<CqlResult<Page>>,
}

impl RecordingSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(&mut self, page: Page) -> &mut Self {
        self.responses.push_back(Ok(page));
        self
    }

    pub fn fail(&mut self, code: i32, message: &str) -> &mut Self {
        self.responses.push_back(Err(ErrorType::Server {
            code,
            message: message.to_string(),
        }));
        self
    }

    /// Encola las páginas en orden.
    pub fn respond_pages(&mut self, pages: Vec<Page>) -> &mut Self {
        for page in pages {
            self.respond(page);
        }
        self
    }

    pub fn fetches(&self) -> usize {
        self.executed.len()
    }

    pub fn queries(&self) -> Vec<String> {
        self.executed
            .iter()
            .map(|(statement, _)| statement.query.clone())
            .collect()
    }
}

impl Session for RecordingSession {
    fn execute(&mut self, statement: &Statement, options: &QueryOptions) -> CqlResult<Page> {
        self.executed.push((statement.clone(), options.clone()));
        self.responses.pop_front().unwrap_or_else(|| Ok(Page::void()))
    }

    fn batch(&mut self, statements: &[Statement], _options: &QueryOptions) -> CqlResult<()> {
        self.batches.push(statements.to_vec());
        Ok(())
    }

    fn keyspace(&self) -> Option<&str> {
        Some("shop")
    }
}

pub fn config() -> ConnectionConfig {
    ConnectionConfig::new("127.0.0.1", "shop")
}

pub fn connection(session: RecordingSession) -> Connection<RecordingSession> {
    Connection::new(session, &config())
}

/// Página con una sola columna entera `n`.
pub fn int_page(values: &[i32], token: Option<&[u8]>) -> Page {
    Page::new(
        vec![ColumnSpec::new("n", ColumnType::Int)],
        values.iter().map(|v| vec![CqlValue::Int(*v)]).collect(),
        token.map(|t| t.to_vec()),
    )
}

/// Parte `values` en páginas de `size`; cada página salvo la última lleva token.
pub fn int_pages(values: &[i32], size: usize) -> Vec<Page> {
    let chunks: Vec<&[i32]> = values.chunks(size).collect();
    let last = chunks.len().saturating_sub(1);
    chunks
        .iter()
        .enumerate()
        .map(|(i, chunk)| {
            let token = if i == last {
                None
            } else {
                Some(vec![i as u8 + 1])
            };
            int_page(chunk, token.as_deref())
        })
        .collect()
}

pub fn ints(rows: &[cql_mapper::pager_functions::row::Row]) -> Vec<i64> {
    rows.iter()
        .filter_map(|row| row.get("n").and_then(CqlValue::as_i64))
        .collect()
}
