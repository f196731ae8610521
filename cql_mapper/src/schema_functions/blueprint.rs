use crate::schema_functions::{
    column_definition::ColumnDefinition, primary_key::PrimaryKey, schema_type::SchemaType,
    with_option::WithOption,
};

/// Cambios de una tabla que no son columnas nuevas.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    DropColumn(Vec<String>),
    RenameColumn { from: String, to: String },
    Index { name: String, columns: Vec<String> },
    DropIndex(String),
}

/// Descripción de una tabla: columnas, clave primaria y opciones.
#[derive(Debug, Clone, PartialEq)]
pub struct Blueprint {
    pub table: String,
    pub columns: Vec<ColumnDefinition>,
    pub primary_key: PrimaryKey,
    pub with_options: WithOption,
    pub commands: Vec<Command>,
}

impl Blueprint {
    pub fn new(table: &str) -> Self {
        Blueprint {
            table: table.to_string(),
            columns: vec![],
            primary_key: PrimaryKey::default(),
            with_options: WithOption::default(),
            commands: vec![],
        }
    }

    /// Agrega una columna de cualquier tipo.
    pub fn column(&mut self, name: &str, column_type: SchemaType) -> &mut ColumnDefinition {
        self.columns.push(ColumnDefinition::new(name, column_type));
        let index = self.columns.len() - 1;
        &mut self.columns[index]
    }

    pub fn ascii(&mut self, name: &str) -> &mut ColumnDefinition {
        self.column(name, SchemaType::Ascii)
    }

    pub fn bigint(&mut self, name: &str) -> &mut ColumnDefinition {
        self.column(name, SchemaType::Bigint)
    }

    pub fn blob(&mut self, name: &str) -> &mut ColumnDefinition {
        self.column(name, SchemaType::Blob)
    }

    pub fn boolean(&mut self, name: &str) -> &mut ColumnDefinition {
        self.column(name, SchemaType::Boolean)
    }

    pub fn counter(&mut self, name: &str) -> &mut ColumnDefinition {
        self.column(name, SchemaType::Counter)
    }

    pub fn date(&mut self, name: &str) -> &mut ColumnDefinition {
        self.column(name, SchemaType::Date)
    }

    pub fn decimal(&mut self, name: &str) -> &mut ColumnDefinition {
        self.column(name, SchemaType::Decimal)
    }

    pub fn double(&mut self, name: &str) -> &mut ColumnDefinition {
        self.column(name, SchemaType::Double)
    }

    pub fn float(&mut self, name: &str) -> &mut ColumnDefinition {
        self.column(name, SchemaType::Float)
    }

    pub fn frozen(&mut self, name: &str, inner: SchemaType) -> &mut ColumnDefinition {
        self.column(name, SchemaType::Frozen(Box::new(inner)))
    }

    pub fn inet(&mut self, name: &str) -> &mut ColumnDefinition {
        self.column(name, SchemaType::Inet)
    }

    pub fn int(&mut self, name: &str) -> &mut ColumnDefinition {
        self.column(name, SchemaType::Int)
    }

    /// CQL no tiene autoincrementales: con `auto_increment` la columna es `uuid`.
    pub fn integer(&mut self, name: &str, auto_increment: bool) -> &mut ColumnDefinition {
        if auto_increment {
            return self.uuid(name);
        }
        self.int(name)
    }

    pub fn list_collection(&mut self, name: &str, item: SchemaType) -> &mut ColumnDefinition {
        self.column(name, SchemaType::List(Box::new(item)))
    }

    pub fn map_collection(
        &mut self,
        name: &str,
        key: SchemaType,
        value: SchemaType,
    ) -> &mut ColumnDefinition {
        self.column(name, SchemaType::Map(Box::new(key), Box::new(value)))
    }

    pub fn set_collection(&mut self, name: &str, item: SchemaType) -> &mut ColumnDefinition {
        self.column(name, SchemaType::Set(Box::new(item)))
    }

    pub fn smallint(&mut self, name: &str) -> &mut ColumnDefinition {
        self.column(name, SchemaType::Smallint)
    }

    pub fn string(&mut self, name: &str) -> &mut ColumnDefinition {
        self.column(name, SchemaType::Varchar)
    }

    pub fn text(&mut self, name: &str) -> &mut ColumnDefinition {
        self.column(name, SchemaType::Text)
    }

    pub fn time(&mut self, name: &str) -> &mut ColumnDefinition {
        self.column(name, SchemaType::Time)
    }

    pub fn timestamp(&mut self, name: &str) -> &mut ColumnDefinition {
        self.column(name, SchemaType::Timestamp)
    }

    pub fn timeuuid(&mut self, name: &str) -> &mut ColumnDefinition {
        self.column(name, SchemaType::Timeuuid)
    }

    pub fn tinyint(&mut self, name: &str) -> &mut ColumnDefinition {
        self.column(name, SchemaType::Tinyint)
    }

    pub fn tuple(&mut self, name: &str, types: Vec<SchemaType>) -> &mut ColumnDefinition {
        self.column(name, SchemaType::Tuple(types))
    }

    pub fn uuid(&mut self, name: &str) -> &mut ColumnDefinition {
        self.column(name, SchemaType::Uuid)
    }

    pub fn varchar(&mut self, name: &str) -> &mut ColumnDefinition {
        self.column(name, SchemaType::Varchar)
    }

    pub fn varint(&mut self, name: &str) -> &mut ColumnDefinition {
        self.column(name, SchemaType::Varint)
    }

    /// Clave primaria: columnas de partición y de agrupamiento, en orden.
    pub fn primary(&mut self, partition_key: &[&str], clustering_key: &[&str]) -> &mut Self {
        self.primary_key = PrimaryKey::new(partition_key, clustering_key);
        self
    }

    pub fn partition_key(&mut self, columns: &[&str]) -> &mut Self {
        self.primary_key.partition_key = columns.iter().map(|c| c.to_string()).collect();
        self
    }

    pub fn clustering_key(&mut self, columns: &[&str]) -> &mut Self {
        self.primary_key.clustering_key = columns.iter().map(|c| c.to_string()).collect();
        self
    }

    pub fn with_options(&mut self, callback: impl FnOnce(&mut WithOption)) -> &mut Self {
        callback(&mut self.with_options);
        self
    }

    pub fn drop_column(&mut self, columns: &[&str]) -> &mut Self {
        self.commands.push(Command::DropColumn(
            columns.iter().map(|c| c.to_string()).collect(),
        ));
        self
    }

    pub fn rename_column(&mut self, from: &str, to: &str) -> &mut Self {
        self.commands.push(Command::RenameColumn {
            from: from.to_string(),
            to: to.to_string(),
        });
        self
    }

    /// Índice secundario. Sin nombre se usa `<tabla>_<columnas>_index`.
    pub fn index(&mut self, columns: &[&str], name: Option<&str>) -> &mut Self {
        let name = match name {
            Some(name) => name.to_string(),
            None => format!("{}_{}_index", self.table, columns.join("_")).to_lowercase(),
        };
        self.commands.push(Command::Index {
            name,
            columns: columns.iter().map(|c| c.to_string()).collect(),
        });
        self
    }

    pub fn drop_index(&mut self, name: &str) -> &mut Self {
        self.commands.push(Command::DropIndex(name.to_string()));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auto_increment_becomes_uuid() {
        let mut blueprint = Blueprint::new("users");
        blueprint.integer("id", true);
        blueprint.integer("age", false);
        assert_eq!(blueprint.columns[0].column_type, SchemaType::Uuid);
        assert_eq!(blueprint.columns[1].column_type, SchemaType::Int);
    }

    #[test]
    fn default_index_name() {
        let mut blueprint = Blueprint::new("users");
        blueprint.index(&["email"], None);
        assert_eq!(
            blueprint.commands,
            vec![Command::Index {
                name: "users_email_index".to_string(),
                columns: vec!["email".to_string()],
            }]
        );
    }
}
