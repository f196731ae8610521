// migration_repository.rs
use crate::connection::Connection;
use crate::error::CqlResult;
use crate::grammar::StatementCompiler;
use crate::pager_functions::row::Row;
use crate::query_functions::{query_builder::QueryBuilder, statement::Record};
use crate::session::Session;
use crate::value_functions::cql_value::CqlValue;
use log::info;
use std::collections::BTreeMap;
use uuid::Uuid;

/// Registro de las migraciones ejecutadas. La clave es `(("id"), "batch")`,
/// por eso los filtros por nombre necesitan ALLOW FILTERING.
pub struct MigrationRepository<'a, S: Session, C: StatementCompiler> {
    connection: &'a mut Connection<S, C>,
    table: String,
}

impl<'a, S: Session, C: StatementCompiler> MigrationRepository<'a, S, C> {
    pub fn new(connection: &'a mut Connection<S, C>, table: &str) -> Self {
        MigrationRepository {
            connection,
            table: table.to_string(),
        }
    }

    fn query(&self) -> QueryBuilder {
        QueryBuilder::table(&self.table)
    }

    pub fn create_repository(&mut self) -> CqlResult<()> {
        let table = self.table.clone();
        self.connection.schema().create(&table, |blueprint| {
            blueprint.uuid("id");
            blueprint.string("migration");
            blueprint.integer("batch", false);
            blueprint.primary(&["id"], &["batch"]);
        })
    }

    pub fn repository_exists(&mut self) -> CqlResult<bool> {
        let table = self.table.clone();
        self.connection.schema().has_table(&table)
    }

    pub fn delete_repository(&mut self) -> CqlResult<()> {
        let table = self.table.clone();
        self.connection.schema().drop_if_exists(&table)
    }

    pub fn log(&mut self, migration: &str, batch: i32) -> CqlResult<()> {
        let mut record = Record::new();
        record.insert("id".to_string(), CqlValue::from(Uuid::new_v4()));
        record.insert("migration".to_string(), CqlValue::from(migration));
        record.insert("batch".to_string(), CqlValue::from(batch));
        let query = self.query();
        self.connection.insert(&query, &[record])?;
        info!("Migración {} registrada en el batch {}", migration, batch);
        Ok(())
    }

    /// Nombres de las migraciones ejecutadas, por batch ascendente.
    pub fn get_ran(&mut self) -> CqlResult<Vec<String>> {
        let query = self.query();
        let ran = self
            .connection
            .get(&query)?
            .sort_by("batch")
            .pluck("migration")
            .into_iter()
            .filter_map(|value| value.as_text().map(str::to_string))
            .collect();
        Ok(ran)
    }

    /// Las últimas `steps` migraciones, de la más nueva a la más vieja.
    pub fn get_migrations(&mut self, steps: usize) -> CqlResult<Vec<Row>> {
        let query = self.query().where_op("batch", ">=", 1)?.allow_filtering(true);
        Ok(self
            .connection
            .get(&query)?
            .sort_by_desc("batch")
            .take(steps)
            .into_items())
    }

    pub fn get_last(&mut self) -> CqlResult<Vec<Row>> {
        let last = self.get_last_batch_number()?;
        let query = self.query().where_eq("batch", last).allow_filtering(true);
        Ok(self.connection.get(&query)?.into_items())
    }

    /// Mayor batch registrado; 0 si la tabla está vacía.
    pub fn get_last_batch_number(&mut self) -> CqlResult<i32> {
        let query = self.query().aggregate("max", "batch");
        let last = self
            .connection
            .first(&query)?
            .and_then(|row| row.get("aggregate").and_then(CqlValue::as_i64))
            .unwrap_or(0);
        Ok(last as i32)
    }

    pub fn get_next_batch_number(&mut self) -> CqlResult<i32> {
        Ok(self.get_last_batch_number()? + 1)
    }

    /// Migración -> batch.
    pub fn get_migration_batches(&mut self) -> CqlResult<BTreeMap<String, i32>> {
        let query = self.query().select(&["migration", "batch"]);
        let mut batches = BTreeMap::new();
        for row in self.connection.get(&query)?.iter() {
            let name = row.get("migration").and_then(|v| v.as_text());
            let batch = row.get("batch").and_then(CqlValue::as_i64);
            if let (Some(name), Some(batch)) = (name, batch) {
                batches.insert(name.to_string(), batch as i32);
            }
        }
        Ok(batches)
    }

    /// No se puede borrar por una columna que no es clave: primero se buscan
    /// las claves completas y después se borra cada fila.
    pub fn delete(&mut self, migration: &str) -> CqlResult<()> {
        let lookup = self
            .query()
            .select(&["id", "batch"])
            .where_eq("migration", migration)
            .allow_filtering(true);
        let keys = self.connection.get(&lookup)?;
        for row in keys.iter() {
            let (id, batch) = match (row.get("id"), row.get("batch")) {
                (Some(id), Some(batch)) => (id.clone(), batch.clone()),
                _ => continue,
            };
            let query = self.query().where_eq("id", id).where_eq("batch", batch);
            self.connection.delete(&query)?;
        }
        Ok(())
    }
}
