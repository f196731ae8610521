use crate::message_functions::notation::{read_string, read_string_list, short_len, write_string};
use crate::message_functions::{change_type::ChangeType, target::Target};
use byteorder::{BigEndian, WriteBytesExt};
use std::io;

#[derive(Debug, Clone, PartialEq)]
pub struct SchemaChange {
    pub change_type: ChangeType,
    pub target: Target,
    pub keyspace: String,
    pub name: Option<String>, // Tabla, tipo, función o agregado; no aplica a KEYSPACE
    pub arguments: Vec<String>, // Solo para FUNCTION y AGGREGATE
}

// Serialización y deserialización de `SchemaChange`
impl SchemaChange {
    pub fn serialize(&self) -> io::Result<Vec<u8>> {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&0x0005_u32.to_be_bytes()); // `kind = 0x0005` para "Schema_change".
        write_string(&mut bytes, self.change_type.as_str())?;
        write_string(&mut bytes, self.target.as_str())?;
        write_string(&mut bytes, &self.keyspace)?;
        if let Some(name) = &self.name {
            write_string(&mut bytes, name)?;
        }
        if matches!(self.target, Target::Function | Target::Aggregate) {
            bytes.write_u16::<BigEndian>(short_len(self.arguments.len(), "Function arguments")?)?;
            for argument in &self.arguments {
                write_string(&mut bytes, argument)?;
            }
        }
        Ok(bytes)
    }

    pub fn deserialize(bytes: &[u8]) -> io::Result<Self> {
        let mut reader = bytes.get(4..).unwrap_or_default(); // Saltamos el kind.
        let change_type = ChangeType::from_str_value(&read_string(&mut reader)?)?;
        let target = Target::from_str_value(&read_string(&mut reader)?)?;
        let keyspace = read_string(&mut reader)?;

        let (name, arguments) = match target {
            Target::Keyspace => (None, vec![]),
            Target::Table | Target::Type => (Some(read_string(&mut reader)?), vec![]),
            Target::Function | Target::Aggregate => {
                let name = read_string(&mut reader)?;
                (Some(name), read_string_list(&mut reader)?)
            }
        };

        Ok(SchemaChange {
            change_type,
            target,
            keyspace,
            name,
            arguments,
        })
    }
}
