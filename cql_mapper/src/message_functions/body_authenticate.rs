use crate::message_functions::notation::{read_string, write_string};
use std::io;

/// AUTHENTICATE: el servidor indica la clase del autenticador.
#[derive(Debug, Clone, PartialEq)]
pub struct BodyAuthenticate {
    pub authenticator: String,
}

impl BodyAuthenticate {
    pub fn serialize(&self) -> io::Result<Vec<u8>> {
        let mut bytes = vec![];
        write_string(&mut bytes, &self.authenticator)?;
        Ok(bytes)
    }

    pub fn deserialize(bytes: &[u8]) -> io::Result<Self> {
        let mut reader = bytes;
        Ok(BodyAuthenticate {
            authenticator: read_string(&mut reader)?,
        })
    }
}
