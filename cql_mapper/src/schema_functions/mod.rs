pub mod blueprint;
pub mod column_definition;
pub mod keyspace_conflict;
pub mod primary_key;
pub mod replication_class;
pub mod replication_config;
pub mod schema_type;
pub mod with_option;
