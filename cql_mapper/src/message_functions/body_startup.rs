use crate::message_functions::notation::{read_string_map, write_string_map};
use std::io;

pub const CQL_VERSION: &str = "3.0.0";

#[derive(Debug, Clone, PartialEq)]
pub struct BodyStartup {
    pub options: Vec<(String, String)>, // Mapa de opciones, clave-valor
}

impl BodyStartup {
    /// STARTUP con la versión de CQL y el nombre del driver.
    pub fn new() -> Self {
        BodyStartup {
            options: vec![
                ("CQL_VERSION".to_string(), CQL_VERSION.to_string()),
                ("DRIVER_NAME".to_string(), env!("CARGO_PKG_NAME").to_string()),
                (
                    "DRIVER_VERSION".to_string(),
                    env!("CARGO_PKG_VERSION").to_string(),
                ),
            ],
        }
    }

    /// Serializa las opciones como un [string map].
    pub fn serialize(&self) -> io::Result<Vec<u8>> {
        let mut bytes = vec![];
        write_string_map(&mut bytes, &self.options)?;
        Ok(bytes)
    }

    pub fn deserialize(bytes: &[u8]) -> io::Result<Self> {
        let mut reader = bytes;
        Ok(BodyStartup {
            options: read_string_map(&mut reader)?,
        })
    }
}

impl Default for BodyStartup {
    fn default() -> Self {
        Self::new()
    }
}
