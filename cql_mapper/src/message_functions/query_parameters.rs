use crate::message_functions::notation::{read_bytes, short_len, write_bytes};
use crate::message_functions::{consistency::Consistency, query_value::QueryValue};
use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use std::io;

pub const FLAG_VALUES: u8 = 0x01;
pub const FLAG_SKIP_METADATA: u8 = 0x02;
pub const FLAG_PAGE_SIZE: u8 = 0x04;
pub const FLAG_PAGING_STATE: u8 = 0x08;
pub const FLAG_SERIAL_CONSISTENCY: u8 = 0x10;
pub const FLAG_DEFAULT_TIMESTAMP: u8 = 0x20;

#[derive(Debug, Clone, PartialEq)]
pub struct QueryParameters {
    pub consistency: Consistency,                // Nivel de consistencia
    pub values: Vec<QueryValue>,                 // Valores posicionales (flag 0x01)
    pub result_page_size: Option<i32>,           // Tamaño de la página (flag 0x04)
    pub paging_state: Option<Vec<u8>>,           // Estado de paginación (flag 0x08)
    pub serial_consistency: Option<Consistency>, // Consistencia serial (flag 0x10)
    pub timestamp: Option<i64>,                  // Timestamp en microsegundos (flag 0x20)
}

impl QueryParameters {
    pub fn new(consistency: Consistency) -> Self {
        QueryParameters {
            consistency,
            values: vec![],
            result_page_size: None,
            paging_state: None,
            serial_consistency: None,
            timestamp: None,
        }
    }

    /// Calcula los flags según las opciones presentes.
    pub fn flags(&self) -> u8 {
        let mut flags = 0;
        if !self.values.is_empty() {
            flags |= FLAG_VALUES;
        }
        if self.result_page_size.is_some() {
            flags |= FLAG_PAGE_SIZE;
        }
        if self.paging_state.is_some() {
            flags |= FLAG_PAGING_STATE;
        }
        if self.serial_consistency.is_some() {
            flags |= FLAG_SERIAL_CONSISTENCY;
        }
        if self.timestamp.is_some() {
            flags |= FLAG_DEFAULT_TIMESTAMP;
        }
        flags
    }

    /// Serializa los parámetros de consulta en un vector de bytes.
    pub fn serialize(&self, bytes: &mut Vec<u8>) -> io::Result<()> {
        bytes.write_u16::<BigEndian>(self.consistency.as_u16())?;
        bytes.push(self.flags());
        if !self.values.is_empty() {
            bytes.write_u16::<BigEndian>(short_len(self.values.len(), "Query values")?)?;
            for value in &self.values {
                value.serialize(bytes)?;
            }
        }
        if let Some(page_size) = self.result_page_size {
            bytes.write_i32::<BigEndian>(page_size)?;
        }
        if let Some(paging_state) = &self.paging_state {
            write_bytes(bytes, Some(paging_state))?;
        }
        if let Some(serial) = self.serial_consistency {
            bytes.write_u16::<BigEndian>(serial.as_u16())?;
        }
        if let Some(timestamp) = self.timestamp {
            bytes.write_i64::<BigEndian>(timestamp)?;
        }
        Ok(())
    }

    /// Deserializa un slice de bytes en una estructura `QueryParameters`.
    pub fn deserialize(reader: &mut &[u8]) -> io::Result<Self> {
        let consistency = Consistency::from_u16(reader.read_u16::<BigEndian>()?)?;
        let flags = reader.read_u8()?;
        let mut parameters = QueryParameters::new(consistency);

        if flags & FLAG_VALUES != 0 {
            let count = reader.read_u16::<BigEndian>()?;
            for _ in 0..count {
                parameters.values.push(QueryValue::deserialize(reader)?);
            }
        }
        if flags & FLAG_PAGE_SIZE != 0 {
            parameters.result_page_size = Some(reader.read_i32::<BigEndian>()?);
        }
        if flags & FLAG_PAGING_STATE != 0 {
            parameters.paging_state = read_bytes(reader)?;
        }
        if flags & FLAG_SERIAL_CONSISTENCY != 0 {
            parameters.serial_consistency =
                Some(Consistency::from_u16(reader.read_u16::<BigEndian>()?)?);
        }
        if flags & FLAG_DEFAULT_TIMESTAMP != 0 {
            parameters.timestamp = Some(reader.read_i64::<BigEndian>()?);
        }
        Ok(parameters)
    }
}
