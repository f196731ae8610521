// schema_builder.rs
use crate::error::CqlResult;
use crate::query_functions::{query_options::QueryOptions, statement::Statement};
use crate::schema_functions::{
    blueprint::Blueprint,
    keyspace_conflict::{KeyspaceConflict, KeyspaceStatus},
    replication_config::ReplicationConfig,
};
use crate::schema_grammar::SchemaGrammar;
use crate::session::{Page, Session};
use log::{debug, info, warn};

/// Operaciones de esquema sobre el keyspace de la conexión.
pub struct SchemaBuilder<'a> {
    session: &'a mut dyn Session,
    grammar: SchemaGrammar,
    keyspace: String,
    replication: ReplicationConfig,
}

impl<'a> SchemaBuilder<'a> {
    pub fn new(
        session: &'a mut dyn Session,
        table_prefix: &str,
        keyspace: String,
        replication: ReplicationConfig,
    ) -> Self {
        SchemaBuilder {
            session,
            grammar: SchemaGrammar::new(table_prefix),
            keyspace,
            replication,
        }
    }

    pub fn grammar(&self) -> &SchemaGrammar {
        &self.grammar
    }

    fn execute(&mut self, statement: &Statement) -> CqlResult<Page> {
        debug!("{}", statement);
        self.session.execute(statement, &QueryOptions::default())
    }

    fn execute_all(&mut self, statements: &[Statement]) -> CqlResult<()> {
        for statement in statements {
            self.execute(statement)?;
        }
        Ok(())
    }

    // Primera columna de cada fila, como texto.
    fn names(page: Page) -> Vec<String> {
        page.rows
            .into_iter()
            .filter_map(|row| {
                row.into_iter()
                    .next()
                    .and_then(|value| value.as_text().map(str::to_string))
            })
            .collect()
    }

    pub fn has_table(&mut self, table: &str) -> CqlResult<bool> {
        let statement = self.grammar.compile_table_exists(&self.keyspace, table);
        Ok(!self.execute(&statement)?.rows.is_empty())
    }

    /// Crea la tabla. Sin clave de partición falla sin tocar la sesión.
    pub fn create(&mut self, table: &str, callback: impl FnOnce(&mut Blueprint)) -> CqlResult<()> {
        let mut blueprint = Blueprint::new(table);
        callback(&mut blueprint);

        let mut statements = vec![self.grammar.compile_create(&blueprint)?];
        statements.extend(self.grammar.compile_commands(&blueprint));
        self.execute_all(&statements)?;
        info!("Tabla {} creada", table);
        Ok(())
    }

    /// Modifica una tabla existente: columnas nuevas primero, después los comandos.
    pub fn table(&mut self, table: &str, callback: impl FnOnce(&mut Blueprint)) -> CqlResult<()> {
        let mut blueprint = Blueprint::new(table);
        callback(&mut blueprint);

        let mut statements = self.grammar.compile_add(&blueprint);
        statements.extend(self.grammar.compile_commands(&blueprint));
        self.execute_all(&statements)
    }

    pub fn drop(&mut self, table: &str) -> CqlResult<()> {
        let statement = self.grammar.compile_drop(table);
        self.execute(&statement)?;
        Ok(())
    }

    pub fn drop_if_exists(&mut self, table: &str) -> CqlResult<()> {
        let statement = self.grammar.compile_drop_if_exists(table);
        self.execute(&statement)?;
        Ok(())
    }

    pub fn get_all_tables(&mut self) -> CqlResult<Vec<String>> {
        let statement = self.grammar.compile_get_all_tables(&self.keyspace);
        Ok(Self::names(self.execute(&statement)?))
    }

    /// Los nombres ya vienen con prefijo, así que se borran tal cual.
    pub fn drop_all_tables(&mut self) -> CqlResult<()> {
        let raw = SchemaGrammar::new("");
        for table in self.get_all_tables()? {
            self.execute(&raw.compile_drop_if_exists(&table))?;
        }
        Ok(())
    }

    pub fn get_column_listing(&mut self, table: &str) -> CqlResult<Vec<String>> {
        let statement = self.grammar.compile_column_listing(&self.keyspace, table);
        Ok(Self::names(self.execute(&statement)?))
    }

    pub fn create_keyspace(&mut self, name: &str) -> CqlResult<()> {
        self.replication.validate()?;
        let statement = self.grammar.compile_create_keyspace(name, &self.replication);
        self.execute(&statement)?;
        info!("Keyspace {} creado", name);
        Ok(())
    }

    pub fn drop_keyspace(&mut self, name: &str) -> CqlResult<()> {
        let statement = self.grammar.compile_drop_keyspace(name);
        self.execute(&statement)?;
        Ok(())
    }

    /// Crea el keyspace. Si ya existe le pregunta al resolver qué hacer;
    /// cualquier otro error se devuelve sin cambios.
    pub fn create_keyspace_or_resolve(
        &mut self,
        name: &str,
        resolver: impl FnOnce(&str) -> KeyspaceConflict,
    ) -> CqlResult<KeyspaceStatus> {
        match self.create_keyspace(name) {
            Ok(()) => Ok(KeyspaceStatus::Created),
            Err(e) if e.is_already_exists() => {
                warn!("Keyspace {} already exists", name);
                match resolver(name) {
                    KeyspaceConflict::Keep => {
                        info!("Se conserva el keyspace {}", name);
                        Ok(KeyspaceStatus::Kept)
                    }
                    KeyspaceConflict::DropAndRecreate => {
                        self.drop_keyspace(name)?;
                        self.create_keyspace(name)?;
                        info!("Keyspace {} borrado y creado de nuevo", name);
                        Ok(KeyspaceStatus::Recreated)
                    }
                }
            }
            Err(e) => Err(e),
        }
    }
}
