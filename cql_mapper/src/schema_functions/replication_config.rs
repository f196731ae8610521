use crate::error::{CqlResult, ErrorType};
use crate::schema_functions::replication_class::ReplicationClass;
use serde::Deserialize;
use std::collections::BTreeMap;

fn default_replication_factor() -> u32 {
    3
}

fn default_durable_writes() -> bool {
    true
}

// Configuración de replicación
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ReplicationConfig {
    #[serde(default)]
    pub class: ReplicationClass, // Estrategia de replicación
    #[serde(default = "default_replication_factor")]
    pub replication_factor: u32, // Factor de replicación (SimpleStrategy)
    #[serde(default)]
    pub datacenters: BTreeMap<String, u32>, // Factor por datacenter (NetworkTopologyStrategy)
    #[serde(default = "default_durable_writes")]
    pub durable_writes: bool,
}

impl ReplicationConfig {
    pub fn simple(replication_factor: u32) -> Self {
        ReplicationConfig {
            class: ReplicationClass::SimpleStrategy,
            replication_factor,
            datacenters: BTreeMap::new(),
            durable_writes: true,
        }
    }

    pub fn network_topology(datacenters: &[(&str, u32)]) -> Self {
        ReplicationConfig {
            class: ReplicationClass::NetworkTopologyStrategy,
            replication_factor: default_replication_factor(),
            datacenters: datacenters
                .iter()
                .map(|(dc, factor)| (dc.to_string(), *factor))
                .collect(),
            durable_writes: true,
        }
    }

    pub fn validate(&self) -> CqlResult<()> {
        match self.class {
            ReplicationClass::SimpleStrategy if self.replication_factor == 0 => Err(
                ErrorType::InvalidConfig("replication_factor must be positive".to_string()),
            ),
            ReplicationClass::NetworkTopologyStrategy if self.datacenters.is_empty() => Err(
                ErrorType::InvalidConfig("at least one datacenter is required".to_string()),
            ),
            _ => Ok(()),
        }
    }

    /// Mapa de replicación en la sintaxis de CQL:
    /// `{'class': 'NetworkTopologyStrategy', 'dc1': 3}`.
    pub fn compile(&self) -> String {
        let mut entries = vec![format!("'class': '{}'", self.class.as_str())];
        match self.class {
            ReplicationClass::SimpleStrategy => {
                entries.push(format!("'replication_factor': {}", self.replication_factor))
            }
            ReplicationClass::NetworkTopologyStrategy => entries.extend(
                self.datacenters
                    .iter()
                    .map(|(dc, factor)| format!("'{}': {}", dc.replace('\'', "''"), factor)),
            ),
        }
        format!("{{{}}}", entries.join(", "))
    }
}

impl Default for ReplicationConfig {
    fn default() -> Self {
        Self::network_topology(&[("datacenter1", 3)])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn network_topology_map() {
        let config = ReplicationConfig::network_topology(&[("dc1", 3)]);
        assert_eq!(
            config.compile(),
            "{'class': 'NetworkTopologyStrategy', 'dc1': 3}"
        );
    }

    #[test]
    fn simple_strategy_map() {
        assert_eq!(
            ReplicationConfig::simple(2).compile(),
            "{'class': 'SimpleStrategy', 'replication_factor': 2}"
        );
    }

    #[test]
    fn deserializes_with_defaults() {
        let config: ReplicationConfig =
            serde_json::from_str(r#"{"datacenters": {"sa-east": 3}}"#).unwrap();
        assert_eq!(config.class, ReplicationClass::NetworkTopologyStrategy);
        assert!(config.durable_writes);
        assert!(config.validate().is_ok());
    }
}
