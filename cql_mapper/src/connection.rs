// connection.rs
use crate::config::ConnectionConfig;
use crate::error::{CqlResult, ErrorType};
use crate::grammar::{CqlGrammar, StatementCompiler};
use crate::message_functions::consistency::Consistency;
use crate::migration_repository::MigrationRepository;
use crate::native_session::NativeSession;
use crate::pager_functions::{
    collection::Collection, page_cursor::PageCursor, row::Row, rows::Rows,
};
use crate::query_functions::{
    query_builder::QueryBuilder,
    query_options::QueryOptions,
    statement::{Record, Statement},
};
use crate::schema_builder::SchemaBuilder;
use crate::schema_functions::replication_config::ReplicationConfig;
use crate::session::Session;
use crate::value_functions::cql_value::CqlValue;
use log::{debug, info};
use std::time::Duration;

/// El frame BATCH cuenta sus sentencias con un [short].
pub const MAX_BATCH_STATEMENTS: usize = u16::MAX as usize;

// Timeout de cada pedido descartado al saltar hasta una página.
const PAGE_SCAN_TIMEOUT: Duration = Duration::from_secs(2);

/// Une una sesión con un compilador de sentencias.
pub struct Connection<S: Session, C: StatementCompiler = CqlGrammar> {
    session: S,
    compiler: C,
    keyspace: String,
    default_page_size: i32,
    consistency: Consistency,
    migrations_table: String,
    replication: ReplicationConfig,
}

impl Connection<NativeSession, CqlGrammar> {
    /// Abre una sesión nativa con la configuración dada.
    pub fn connect(config: &ConnectionConfig) -> CqlResult<Self> {
        let session = NativeSession::connect(config)?;
        info!("Conexión `{}` lista sobre {}", config.name, config.keyspace);
        Ok(Connection::new(session, config))
    }
}

impl<S: Session> Connection<S, CqlGrammar> {
    pub fn new(session: S, config: &ConnectionConfig) -> Self {
        Connection::with_compiler(session, CqlGrammar::with_table_prefix(&config.prefix), config)
    }
}

impl<S: Session, C: StatementCompiler> Connection<S, C> {
    pub fn with_compiler(session: S, compiler: C, config: &ConnectionConfig) -> Self {
        Connection {
            session,
            compiler,
            keyspace: config.keyspace.clone(),
            default_page_size: config.default_page_size(),
            consistency: config.consistency,
            migrations_table: config.migrations.clone(),
            replication: config.replication.clone(),
        }
    }

    pub fn keyspace(&self) -> &str {
        self.session.keyspace().unwrap_or(self.keyspace.as_str())
    }

    pub fn compiler(&self) -> &C {
        &self.compiler
    }

    pub fn session(&self) -> &S {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut S {
        &mut self.session
    }

    pub fn replication(&self) -> &ReplicationConfig {
        &self.replication
    }

    // Opciones del builder completadas con los valores por defecto de la conexión.
    fn options_for(&self, query: &QueryBuilder) -> QueryOptions {
        let mut options = query.options.clone();
        if options.page_size.filter(|size| *size > 0).is_none() {
            options.page_size = Some(self.default_page_size);
        }
        if options.consistency.is_none() {
            options.consistency = Some(self.consistency);
        }
        options
    }

    fn write_options(&self, query: &QueryBuilder) -> QueryOptions {
        let mut options = query.options.clone();
        options.page_size = None;
        options.paging_state = None;
        if options.consistency.is_none() {
            options.consistency = Some(self.consistency);
        }
        options
    }

    fn run(&mut self, statement: Statement, options: QueryOptions) -> CqlResult<Rows> {
        debug!("{}", statement);
        let page = self.session.execute(&statement, &options)?;
        Ok(Rows::new(statement, options, page))
    }

    /// Ejecuta el select. Sin `for_page` trae todas las páginas; con
    /// `for_page(n)` recorre las páginas en orden y devuelve sólo la n.
    pub fn get(&mut self, query: &QueryBuilder) -> CqlResult<Collection> {
        let statement = self.compiler.compile_select(query)?;
        let options = self.options_for(query);
        let mut results = self.run(statement, options)?;

        match query.for_page {
            None => {
                let mut collection = Collection::from_rows(results);
                while !collection.is_last_page() {
                    collection.append_next_page(&mut self.session)?;
                }
                Ok(collection)
            }
            Some(page) => {
                // El token sólo sabe continuar: no hay forma de saltar a una página
                let mut current = 1;
                while current < page {
                    if results.is_last_page() {
                        let mut collection = Collection::new();
                        collection.set_rows_instance(results);
                        return Ok(collection);
                    }
                    results = results.next_page(&mut self.session, Some(PAGE_SCAN_TIMEOUT))?;
                    current += 1;
                }
                Ok(Collection::from_rows(results))
            }
        }
    }

    /// Una sola página, retomando desde el token del builder si lo tiene.
    pub fn paginate(&mut self, query: &QueryBuilder, per_page: i32) -> CqlResult<Rows> {
        let statement = self.compiler.compile_select(query)?;
        let options = self.options_for(query).with_page_size(per_page);
        self.run(statement, options)
    }

    pub fn first(&mut self, query: &QueryBuilder) -> CqlResult<Option<Row>> {
        let query = query.clone().limit(1);
        let statement = self.compiler.compile_select(&query)?;
        let options = self.options_for(&query);
        let rows = self.run(statement, options)?;
        Ok(rows.first().cloned())
    }

    pub fn count(&mut self, query: &QueryBuilder) -> CqlResult<i64> {
        let statement = self.compiler.compile_count(query)?;
        let options = self.options_for(query);
        let rows = self.run(statement, options)?;
        Ok(rows
            .first()
            .and_then(|row| row.get("aggregate"))
            .and_then(CqlValue::as_i64)
            .unwrap_or(0))
    }

    /// Una fila va como QUERY; varias van juntas en un BATCH.
    /// Un BATCH lleva a lo sumo `MAX_BATCH_STATEMENTS` sentencias.
    pub fn insert(&mut self, query: &QueryBuilder, rows: &[Record]) -> CqlResult<()> {
        if rows.len() > MAX_BATCH_STATEMENTS {
            return Err(ErrorType::InvalidQuery(format!(
                "{} rows exceed the batch limit of {}",
                rows.len(),
                MAX_BATCH_STATEMENTS
            )));
        }
        let statements = self.compiler.compile_insert(query, rows)?;
        let options = self.write_options(query);
        match statements.as_slice() {
            [] => Ok(()),
            [statement] => {
                self.run(statement.clone(), options)?;
                Ok(())
            }
            _ => {
                debug!("Insertando {} filas en batch", statements.len());
                self.session.batch(&statements, &options)
            }
        }
    }

    pub fn update(&mut self, query: &QueryBuilder, values: &Record) -> CqlResult<()> {
        let statement = self.compiler.compile_update(query, values)?;
        let options = self.write_options(query);
        self.run(statement, options)?;
        Ok(())
    }

    pub fn delete(&mut self, query: &QueryBuilder) -> CqlResult<()> {
        let statement = self.compiler.compile_delete(query)?;
        let options = self.write_options(query);
        self.run(statement, options)?;
        Ok(())
    }

    /// Select en CQL crudo. Trae todas las páginas.
    pub fn select(&mut self, cql: &str, values: Vec<CqlValue>) -> CqlResult<Collection> {
        let options = QueryOptions {
            page_size: Some(self.default_page_size),
            consistency: Some(self.consistency),
            ..QueryOptions::default()
        };
        let rows = self.run(Statement::new(cql, values), options)?;
        let mut collection = Collection::from_rows(rows);
        while !collection.is_last_page() {
            collection.append_next_page(&mut self.session)?;
        }
        Ok(collection)
    }

    /// Ejecuta una sentencia cualquiera sin mirar el resultado.
    pub fn statement(&mut self, cql: &str, values: Vec<CqlValue>) -> CqlResult<()> {
        self.execute_statement(Statement::new(cql, values))
    }

    /// CQL no informa filas afectadas, así que el resultado es 0 ó la
    /// cantidad de filas devueltas.
    pub fn affecting_statement(&mut self, cql: &str, values: Vec<CqlValue>) -> CqlResult<usize> {
        let options = QueryOptions {
            consistency: Some(self.consistency),
            ..QueryOptions::default()
        };
        let rows = self.run(Statement::new(cql, values), options)?;
        Ok(rows.len())
    }

    pub(crate) fn execute_statement(&mut self, statement: Statement) -> CqlResult<()> {
        let options = QueryOptions {
            consistency: Some(self.consistency),
            ..QueryOptions::default()
        };
        self.run(statement, options)?;
        Ok(())
    }

    pub fn begin_transaction(&mut self) -> CqlResult<()> {
        Err(ErrorType::TransactionsNotSupported)
    }

    pub fn commit(&mut self) -> CqlResult<()> {
        Err(ErrorType::TransactionsNotSupported)
    }

    pub fn rollback(&mut self) -> CqlResult<()> {
        Err(ErrorType::TransactionsNotSupported)
    }

    /// Nunca llama al callback.
    pub fn transaction<T>(&mut self, _callback: impl FnOnce(&mut Self) -> CqlResult<T>) -> CqlResult<T> {
        Err(ErrorType::TransactionsNotSupported)
    }

    pub fn schema(&mut self) -> SchemaBuilder<'_> {
        let keyspace = self.keyspace().to_string();
        SchemaBuilder::new(
            &mut self.session,
            self.compiler.table_prefix(),
            keyspace,
            self.replication.clone(),
        )
    }

    /// Repositorio de migraciones sobre la tabla configurada.
    pub fn migrations(&mut self) -> MigrationRepository<'_, S, C> {
        let table = self.migrations_table.clone();
        MigrationRepository::new(self, &table)
    }
}
