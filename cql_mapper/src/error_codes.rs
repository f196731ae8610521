// error_codes.rs
use crate::error::ALREADY_EXISTS_CODE;

/// Códigos del frame ERROR del protocolo nativo v4.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    ServerError,
    ProtocolError,
    BadCredentials,
    Unavailable,
    Overloaded,
    IsBootstrapping,
    TruncateError,
    WriteTimeout,
    ReadTimeout,
    ReadFailure,
    FunctionFailure,
    WriteFailure,
    SyntaxError,
    Unauthorized,
    Invalid,
    ConfigError,
    AlreadyExists,
    Unprepared,
    Unknown(i32),
}

impl ErrorCode {
    pub fn from_code(code: i32) -> Self {
        match code {
            0x0000 => ErrorCode::ServerError,
            0x000A => ErrorCode::ProtocolError,
            0x0100 => ErrorCode::BadCredentials,
            0x1000 => ErrorCode::Unavailable,
            0x1001 => ErrorCode::Overloaded,
            0x1002 => ErrorCode::IsBootstrapping,
            0x1003 => ErrorCode::TruncateError,
            0x1100 => ErrorCode::WriteTimeout,
            0x1200 => ErrorCode::ReadTimeout,
            0x1300 => ErrorCode::ReadFailure,
            0x1400 => ErrorCode::FunctionFailure,
            0x1500 => ErrorCode::WriteFailure,
            0x2000 => ErrorCode::SyntaxError,
            0x2100 => ErrorCode::Unauthorized,
            0x2200 => ErrorCode::Invalid,
            0x2300 => ErrorCode::ConfigError,
            ALREADY_EXISTS_CODE => ErrorCode::AlreadyExists,
            0x2500 => ErrorCode::Unprepared,
            other => ErrorCode::Unknown(other),
        }
    }

    /// Nombre corto del error, como aparece en los logs del servidor.
    pub fn name(&self) -> &'static str {
        match self {
            ErrorCode::ServerError => "Server_error",
            ErrorCode::ProtocolError => "Protocol_error",
            ErrorCode::BadCredentials => "Bad_credentials",
            ErrorCode::Unavailable => "Unavailable",
            ErrorCode::Overloaded => "Overloaded",
            ErrorCode::IsBootstrapping => "Is_bootstrapping",
            ErrorCode::TruncateError => "Truncate_error",
            ErrorCode::WriteTimeout => "Write_timeout",
            ErrorCode::ReadTimeout => "Read_timeout",
            ErrorCode::ReadFailure => "Read_failure",
            ErrorCode::FunctionFailure => "Function_failure",
            ErrorCode::WriteFailure => "Write_failure",
            ErrorCode::SyntaxError => "Syntax_error",
            ErrorCode::Unauthorized => "Unauthorized",
            ErrorCode::Invalid => "Invalid",
            ErrorCode::ConfigError => "Config_error",
            ErrorCode::AlreadyExists => "Already_exists",
            ErrorCode::Unprepared => "Unprepared",
            ErrorCode::Unknown(_) => "Unknown",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_and_unknown_codes() {
        assert_eq!(ErrorCode::from_code(0x2400), ErrorCode::AlreadyExists);
        assert_eq!(ErrorCode::from_code(0x2000).name(), "Syntax_error");
        assert_eq!(ErrorCode::from_code(0x7777), ErrorCode::Unknown(0x7777));
    }
}
