use serde::Deserialize;

// Estrategias de replicación de un keyspace
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum ReplicationClass {
    SimpleStrategy,
    #[default]
    NetworkTopologyStrategy,
}

impl ReplicationClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReplicationClass::SimpleStrategy => "SimpleStrategy",
            ReplicationClass::NetworkTopologyStrategy => "NetworkTopologyStrategy",
        }
    }
}
