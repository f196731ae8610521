pub mod config;
pub mod connection;
pub mod error;
pub mod error_codes;
pub mod grammar;
pub mod logger;
pub mod message;
pub mod migration_repository;
pub mod native_session;
pub mod schema_builder;
pub mod schema_grammar;
pub mod session;
//Módulos con funciones auxiliares
pub mod message_functions;
pub mod pager_functions;
pub mod query_functions;
pub mod schema_functions;
pub mod value_functions;
