use crate::message_functions::notation::{read_string, write_string};
use std::io;

#[derive(Debug, Clone, PartialEq)]
pub struct BodySetKeyspace {
    pub keyspace: String, // Nombre del keyspace que fue cambiado.
}

// Serialización y deserialización de `BodySetKeyspace`
impl BodySetKeyspace {
    pub fn serialize(&self) -> io::Result<Vec<u8>> {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&0x0003_u32.to_be_bytes()); // `kind = 0x0003` para "Set_keyspace".
        write_string(&mut bytes, &self.keyspace)?;
        Ok(bytes)
    }

    pub fn deserialize(bytes: &[u8]) -> io::Result<Self> {
        let mut reader = bytes.get(4..).unwrap_or_default(); // Saltamos el kind.
        Ok(Self {
            keyspace: read_string(&mut reader)?,
        })
    }
}
