use crate::error::{CqlResult, ErrorType};

// Estructura de clave primaria
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PrimaryKey {
    pub partition_key: Vec<String>,  // Clave de partición
    pub clustering_key: Vec<String>, // Clave de agrupamiento
}

impl PrimaryKey {
    pub fn new(partition_key: &[&str], clustering_key: &[&str]) -> Self {
        PrimaryKey {
            partition_key: partition_key.iter().map(|c| c.to_string()).collect(),
            clustering_key: clustering_key.iter().map(|c| c.to_string()).collect(),
        }
    }

    pub fn is_defined(&self) -> bool {
        !self.partition_key.is_empty()
    }

    /// `primary key (("p1", "p2"), "c1", "c2")`. Sin columnas de
    /// agrupamiento queda `primary key (("p1", "p2"))`.
    pub fn compile(&self, table: &str, wrap: impl Fn(&str) -> String) -> CqlResult<String> {
        if !self.is_defined() {
            return Err(ErrorType::MissingPartitionKey {
                table: table.to_string(),
            });
        }
        let partition: Vec<String> = self.partition_key.iter().map(|c| wrap(c)).collect();
        let mut groups = vec![format!("({})", partition.join(", "))];
        groups.extend(self.clustering_key.iter().map(|c| wrap(c)));
        Ok(format!("primary key ({})", groups.join(", ")))
    }
}
