use crate::message_functions::notation::{
    capacity_for, read_long_string, short_len, write_long_string,
};
use crate::message_functions::{consistency::Consistency, query_value::QueryValue};
use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use std::io;

/// Tipo de batch: LOGGED (0), UNLOGGED (1) o COUNTER (2).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchType {
    Logged = 0,
    Unlogged = 1,
    Counter = 2,
}

impl BatchType {
    fn from_u8(value: u8) -> io::Result<Self> {
        match value {
            0 => Ok(BatchType::Logged),
            1 => Ok(BatchType::Unlogged),
            2 => Ok(BatchType::Counter),
            _ => Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("Invalid batch type: {}", value),
            )),
        }
    }
}

/// Una sentencia dentro del batch, siempre como texto (kind 0).
#[derive(Debug, Clone, PartialEq)]
pub struct BatchStatement {
    pub query_string: String,
    pub values: Vec<QueryValue>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BodyBatch {
    pub batch_type: BatchType,
    pub statements: Vec<BatchStatement>,
    pub consistency: Consistency,
}

impl BodyBatch {
    pub fn serialize(&self) -> io::Result<Vec<u8>> {
        let mut bytes = vec![self.batch_type as u8];
        bytes.write_u16::<BigEndian>(short_len(self.statements.len(), "Batch statements")?)?;
        for statement in &self.statements {
            bytes.push(0); // kind: query string
            write_long_string(&mut bytes, &statement.query_string)?;
            bytes.write_u16::<BigEndian>(short_len(statement.values.len(), "Batch values")?)?;
            for value in &statement.values {
                value.serialize(&mut bytes)?;
            }
        }
        bytes.write_u16::<BigEndian>(self.consistency.as_u16())?;
        bytes.push(0); // sin flags
        Ok(bytes)
    }

    pub fn deserialize(bytes: &[u8]) -> io::Result<Self> {
        let mut reader = bytes;
        let batch_type = BatchType::from_u8(reader.read_u8()?)?;
        let count = reader.read_u16::<BigEndian>()?;
        let mut statements = Vec::with_capacity(capacity_for(count as usize, reader.len(), 7));
        for _ in 0..count {
            let kind = reader.read_u8()?;
            if kind != 0 {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidData,
                    "Prepared statements are not supported inside a batch",
                ));
            }
            let query_string = read_long_string(&mut reader)?;
            let values_count = reader.read_u16::<BigEndian>()?;
            let mut values = Vec::with_capacity(capacity_for(values_count as usize, reader.len(), 4));
            for _ in 0..values_count {
                values.push(QueryValue::deserialize(&mut reader)?);
            }
            statements.push(BatchStatement {
                query_string,
                values,
            });
        }
        let consistency = Consistency::from_u16(reader.read_u16::<BigEndian>()?)?;
        Ok(BodyBatch {
            batch_type,
            statements,
            consistency,
        })
    }
}
