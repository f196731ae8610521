use crate::message_functions::notation::{read_bytes, write_bytes};
use std::io;

#[derive(Debug, Clone, PartialEq)]
pub struct BodyAuthResponse {
    pub token: Vec<u8>, // Token de autenticación (SASL)
}

impl BodyAuthResponse {
    /// Serializa el token de `self` como [bytes].
    pub fn serialize(&self) -> io::Result<Vec<u8>> {
        let mut bytes = vec![];
        write_bytes(&mut bytes, Some(&self.token))?;
        Ok(bytes)
    }

    pub fn deserialize(bytes: &[u8]) -> io::Result<Self> {
        let mut reader = bytes;
        let token = read_bytes(&mut reader)?.unwrap_or_default();
        Ok(BodyAuthResponse { token })
    }
}
