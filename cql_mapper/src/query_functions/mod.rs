pub mod condition;
pub mod operator;
pub mod query_builder;
pub mod query_options;
pub mod statement;
