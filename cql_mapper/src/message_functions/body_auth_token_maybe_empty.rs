use crate::message_functions::notation::{read_bytes, write_bytes};
use std::io;

/// Cuerpo de AUTH_CHALLENGE y AUTH_SUCCESS; el token puede ser null.
#[derive(Debug, Clone, PartialEq)]
pub struct BodyAuthTokenMaybeEmpty {
    pub token: Option<Vec<u8>>,
}

impl BodyAuthTokenMaybeEmpty {
    pub fn serialize(&self) -> io::Result<Vec<u8>> {
        let mut bytes = vec![];
        write_bytes(&mut bytes, self.token.as_deref())?;
        Ok(bytes)
    }

    pub fn deserialize(bytes: &[u8]) -> io::Result<Self> {
        // Algunos servidores mandan el cuerpo vacío en AUTH_SUCCESS
        if bytes.is_empty() {
            return Ok(BodyAuthTokenMaybeEmpty { token: None });
        }
        let mut reader = bytes;
        Ok(BodyAuthTokenMaybeEmpty {
            token: read_bytes(&mut reader)?,
        })
    }
}
