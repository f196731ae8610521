use crate::message_functions::notation::{read_string, write_string};
use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use std::io;

/// Frame ERROR: código y mensaje. Los campos extra de cada código se ignoran.
#[derive(Debug, Clone, PartialEq)]
pub struct BodyError {
    pub code: i32,
    pub message: String,
}

impl BodyError {
    pub fn serialize(&self) -> io::Result<Vec<u8>> {
        let mut bytes = vec![];
        bytes.write_i32::<BigEndian>(self.code)?;
        write_string(&mut bytes, &self.message)?;
        Ok(bytes)
    }

    pub fn deserialize(bytes: &[u8]) -> io::Result<Self> {
        let mut reader = bytes;
        let code = reader.read_i32::<BigEndian>()?;
        let message = read_string(&mut reader)?;
        Ok(BodyError { code, message })
    }
}
