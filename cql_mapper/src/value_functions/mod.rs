pub mod column_type;
pub mod cql_value;
pub mod host;
