use crate::message_functions::notation::{read_bytes, write_bytes};
use crate::value_functions::cql_value::CqlValue;
use std::io;

#[derive(Debug, Clone, PartialEq)]
pub struct QueryValue {
    pub value: Option<Vec<u8>>, // Valor serializado; `None` es null
}

impl QueryValue {
    /// Serializa un valor nativo para enviarlo como parámetro de una query.
    pub fn from_cql(value: &CqlValue) -> crate::error::CqlResult<Self> {
        Ok(QueryValue {
            value: value.serialize()?,
        })
    }

    // Deserializar `QueryValue`
    pub fn deserialize(reader: &mut &[u8]) -> io::Result<Self> {
        Ok(QueryValue {
            value: read_bytes(reader)?,
        })
    }

    // Serializar `QueryValue`
    pub fn serialize(&self, bytes: &mut Vec<u8>) -> io::Result<()> {
        write_bytes(bytes, self.value.as_deref())
    }
}
