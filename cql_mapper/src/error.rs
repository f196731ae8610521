// error.rs

use crate::error_codes::ErrorCode;
use std::io;
use thiserror::Error;

/// Código de error ALREADY_EXISTS del protocolo nativo.
pub const ALREADY_EXISTS_CODE: i32 = 0x2400;

/// Resultado usado en todo el crate.
pub type CqlResult<T> = Result<T, ErrorType>;

// Define los tipos de errores
#[derive(Debug, Error)]
pub enum ErrorType {
    /// La tabla no declara ninguna columna de partición.
    #[error("No partition/primary key has been set for the table: {table}")]
    MissingPartitionKey { table: String },

    #[error("Transactions is not supported by Scylla database")]
    TransactionsNotSupported,

    /// Construcciones relacionales sin equivalente en CQL (joins, `or`).
    #[error("Unsupported feature: {0}")]
    UnsupportedFeature(String),

    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Tipo nativo sin conversión al tipo del host.
    #[error("The type -> {0} does not exists.")]
    TypeNotDefined(String),

    #[error("Conversion error: {0}")]
    Conversion(String),

    /// Frame ERROR devuelto por el servidor, sin modificar.
    #[error("Server error {code:#06x}: {message}")]
    Server { code: i32, message: String },

    #[error("Protocol error: {0}")]
    Protocol(String),

    #[error("Authentication error: {0}")]
    Authentication(String),

    #[error("TLS error: {0}")]
    Tls(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl ErrorType {
    /// Indica si el error corresponde a un objeto que ya existe
    /// (keyspace o tabla). Es el único caso que se distingue por texto.
    pub fn is_already_exists(&self) -> bool {
        match self {
            ErrorType::Server { code, message } => {
                ErrorCode::from_code(*code) == ErrorCode::AlreadyExists
                    || message_says_exists(message)
            }
            ErrorType::Protocol(message) => message_says_exists(message),
            _ => false,
        }
    }

    /// Errores de configuración, que se detectan antes de cualquier I/O.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            ErrorType::MissingPartitionKey { .. }
                | ErrorType::TransactionsNotSupported
                | ErrorType::UnsupportedFeature(_)
                | ErrorType::InvalidQuery(_)
                | ErrorType::InvalidConfig(_)
        )
    }
}

fn message_says_exists(message: &str) -> bool {
    let lower = message.to_lowercase();
    lower.contains("already exists") || lower.contains("existing keyspace")
}

impl From<serde_json::Error> for ErrorType {
    fn from(e: serde_json::Error) -> Self {
        ErrorType::InvalidConfig(e.to_string())
    }
}

impl From<rustls::Error> for ErrorType {
    fn from(e: rustls::Error) -> Self {
        ErrorType::Tls(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn already_exists_by_code() {
        let err = ErrorType::Server {
            code: ALREADY_EXISTS_CODE,
            message: "Cannot add".to_string(),
        };
        assert!(err.is_already_exists());
    }

    #[test]
    fn already_exists_by_message() {
        let err = ErrorType::Server {
            code: 0x2200,
            message: "Cannot add existing keyspace \"shop\"".to_string(),
        };
        assert!(err.is_already_exists());

        let other = ErrorType::Server {
            code: 0x2200,
            message: "line 1:0 no viable alternative".to_string(),
        };
        assert!(!other.is_already_exists());
    }

    #[test]
    fn configuration_errors_are_flagged() {
        assert!(ErrorType::TransactionsNotSupported.is_configuration());
        assert!(ErrorType::MissingPartitionKey {
            table: "users".to_string()
        }
        .is_configuration());
        assert!(!ErrorType::Protocol("x".to_string()).is_configuration());
    }
}
