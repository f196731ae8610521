// schema_grammar.rs
use crate::error::CqlResult;
use crate::grammar::{CqlGrammar, StatementCompiler};
use crate::query_functions::statement::Statement;
use crate::schema_functions::{
    blueprint::{Blueprint, Command},
    column_definition::ColumnDefinition,
    replication_config::ReplicationConfig,
};
use crate::value_functions::cql_value::CqlValue;

/// Arma las sentencias de definición de esquema (tablas, índices, keyspaces).
#[derive(Debug, Clone, Default)]
pub struct SchemaGrammar {
    names: CqlGrammar,
}

impl SchemaGrammar {
    pub fn new(table_prefix: &str) -> Self {
        SchemaGrammar {
            names: CqlGrammar::with_table_prefix(table_prefix),
        }
    }

    fn wrap(&self, value: &str) -> String {
        self.names.wrap(value)
    }

    fn wrap_table(&self, table: &str) -> String {
        self.names.wrap_table(table)
    }

    fn compile_column(&self, column: &ColumnDefinition) -> String {
        let mut cql = format!("{} {}", self.wrap(&column.name), column.column_type);
        if column.is_static {
            cql.push_str(" static");
        }
        cql
    }

    /// `create table "t" (<columnas>, primary key (...)) [with ...]`.
    /// Sin clave de partición falla antes de generar texto.
    pub fn compile_create(&self, blueprint: &Blueprint) -> CqlResult<Statement> {
        let primary = blueprint
            .primary_key
            .compile(&blueprint.table, |c| self.wrap(c))?;
        let mut definitions: Vec<String> = blueprint
            .columns
            .iter()
            .map(|column| self.compile_column(column))
            .collect();
        definitions.push(primary);

        let mut cql = format!(
            "create table {} ({})",
            self.wrap_table(&blueprint.table),
            definitions.join(", ")
        );
        let with = blueprint.with_options.compile(|c| self.wrap(c));
        if !with.is_empty() {
            cql.push(' ');
            cql.push_str(&with);
        }
        Ok(Statement::raw(cql))
    }

    /// Un `alter table ... add` por cada columna nueva.
    pub fn compile_add(&self, blueprint: &Blueprint) -> Vec<Statement> {
        let table = self.wrap_table(&blueprint.table);
        blueprint
            .columns
            .iter()
            .map(|column| {
                Statement::raw(format!(
                    "alter table {} add {}",
                    table,
                    self.compile_column(column)
                ))
            })
            .collect()
    }

    /// Sentencias de los comandos de un `alter`, en el orden en que se declararon.
    pub fn compile_commands(&self, blueprint: &Blueprint) -> Vec<Statement> {
        blueprint
            .commands
            .iter()
            .map(|command| match command {
                Command::DropColumn(columns) => self.compile_drop_column(&blueprint.table, columns),
                Command::RenameColumn { from, to } => {
                    self.compile_rename_column(&blueprint.table, from, to)
                }
                Command::Index { name, columns } => {
                    self.compile_index(&blueprint.table, name, columns)
                }
                Command::DropIndex(name) => self.compile_drop_index(name),
            })
            .collect()
    }

    pub fn compile_drop_column(&self, table: &str, columns: &[String]) -> Statement {
        let columns: Vec<String> = columns.iter().map(|c| self.wrap(c)).collect();
        let dropped = if columns.len() == 1 {
            columns.join("")
        } else {
            format!("({})", columns.join(", "))
        };
        Statement::raw(format!(
            "alter table {} drop {}",
            self.wrap_table(table),
            dropped
        ))
    }

    pub fn compile_rename_column(&self, table: &str, from: &str, to: &str) -> Statement {
        Statement::raw(format!(
            "alter table {} rename {} to {}",
            self.wrap_table(table),
            self.wrap(from),
            self.wrap(to)
        ))
    }

    pub fn compile_index(&self, table: &str, name: &str, columns: &[String]) -> Statement {
        Statement::raw(format!(
            "CREATE INDEX {} ON {} ({})",
            self.wrap(name),
            self.wrap_table(table),
            self.names.columnize(columns)
        ))
    }

    pub fn compile_drop_index(&self, name: &str) -> Statement {
        Statement::raw(format!("drop index {}", self.wrap(name)))
    }

    pub fn compile_drop(&self, table: &str) -> Statement {
        Statement::raw(format!("drop table {}", self.wrap_table(table)))
    }

    pub fn compile_drop_if_exists(&self, table: &str) -> Statement {
        Statement::raw(format!("drop table if exists {}", self.wrap_table(table)))
    }

    pub fn compile_table_exists(&self, keyspace: &str, table: &str) -> Statement {
        Statement::new(
            "select \"table_name\" from \"system_schema\".\"tables\" where \"table_name\" = ? and \"keyspace_name\" = ?",
            vec![
                CqlValue::from(format!("{}{}", self.names.table_prefix(), table)),
                CqlValue::from(keyspace),
            ],
        )
    }

    pub fn compile_column_listing(&self, keyspace: &str, table: &str) -> Statement {
        Statement::new(
            "select \"column_name\" from \"system_schema\".\"columns\" where \"table_name\" = ? and \"keyspace_name\" = ?",
            vec![
                CqlValue::from(format!("{}{}", self.names.table_prefix(), table)),
                CqlValue::from(keyspace),
            ],
        )
    }

    pub fn compile_get_all_tables(&self, keyspace: &str) -> Statement {
        Statement::new(
            "select \"table_name\" from \"system_schema\".\"tables\" where \"keyspace_name\" = ?",
            vec![CqlValue::from(keyspace)],
        )
    }

    pub fn compile_create_keyspace(&self, name: &str, replication: &ReplicationConfig) -> Statement {
        Statement::raw(format!(
            "CREATE KEYSPACE {} WITH replication = {} AND durable_writes = {}",
            self.wrap(name),
            replication.compile(),
            replication.durable_writes
        ))
    }

    pub fn compile_drop_keyspace(&self, name: &str) -> Statement {
        Statement::raw(format!("DROP KEYSPACE {}", self.wrap(name)))
    }
}
