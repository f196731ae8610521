use crate::error::{CqlResult, ErrorType};
use crate::message_functions::notation::{capacity_for, read_string, write_string};
use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use std::fmt;

// Anidamiento máximo de tipos (frozen<list<map<...>>>) aceptado en una metadata.
const MAX_TYPE_DEPTH: usize = 32;

/// Opción de tipo de una columna, tal como la describe la metadata de ROWS.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnType {
    Custom(String),
    Ascii,
    Bigint,
    Blob,
    Boolean,
    Counter,
    Decimal,
    Double,
    Float,
    Int,
    Timestamp,
    Uuid,
    Varchar,
    Varint,
    Timeuuid,
    Inet,
    Date,
    Time,
    Smallint,
    Tinyint,
    Duration,
    List(Box<ColumnType>),
    Map(Box<ColumnType>, Box<ColumnType>),
    Set(Box<ColumnType>),
    Udt {
        keyspace: String,
        name: String,
        fields: Vec<(String, ColumnType)>,
    },
    Tuple(Vec<ColumnType>),
}

impl ColumnType {
    /// Id de la opción en el protocolo v4.
    pub fn id(&self) -> u16 {
        match self {
            ColumnType::Custom(_) => 0x0000,
            ColumnType::Ascii => 0x0001,
            ColumnType::Bigint => 0x0002,
            ColumnType::Blob => 0x0003,
            ColumnType::Boolean => 0x0004,
            ColumnType::Counter => 0x0005,
            ColumnType::Decimal => 0x0006,
            ColumnType::Double => 0x0007,
            ColumnType::Float => 0x0008,
            ColumnType::Int => 0x0009,
            ColumnType::Timestamp => 0x000B,
            ColumnType::Uuid => 0x000C,
            ColumnType::Varchar => 0x000D,
            ColumnType::Varint => 0x000E,
            ColumnType::Timeuuid => 0x000F,
            ColumnType::Inet => 0x0010,
            ColumnType::Date => 0x0011,
            ColumnType::Time => 0x0012,
            ColumnType::Smallint => 0x0013,
            ColumnType::Tinyint => 0x0014,
            ColumnType::Duration => 0x0015,
            ColumnType::List(_) => 0x0020,
            ColumnType::Map(_, _) => 0x0021,
            ColumnType::Set(_) => 0x0022,
            ColumnType::Udt { .. } => 0x0030,
            ColumnType::Tuple(_) => 0x0031,
        }
    }

    /// Deserializa una [option] de tipo, incluyendo los tipos anidados.
    pub fn deserialize(reader: &mut &[u8]) -> CqlResult<Self> {
        Self::deserialize_nested(reader, 0)
    }

    fn deserialize_nested(reader: &mut &[u8], depth: usize) -> CqlResult<Self> {
        if depth > MAX_TYPE_DEPTH {
            return Err(ErrorType::Protocol(format!(
                "Type option nested deeper than {}",
                MAX_TYPE_DEPTH
            )));
        }
        let inner = |reader: &mut &[u8]| Self::deserialize_nested(reader, depth + 1);
        let id = reader.read_u16::<BigEndian>()?;
        let column_type = match id {
            0x0000 => ColumnType::Custom(read_string(reader)?),
            0x0001 => ColumnType::Ascii,
            0x0002 => ColumnType::Bigint,
            0x0003 => ColumnType::Blob,
            0x0004 => ColumnType::Boolean,
            0x0005 => ColumnType::Counter,
            0x0006 => ColumnType::Decimal,
            0x0007 => ColumnType::Double,
            0x0008 => ColumnType::Float,
            0x0009 => ColumnType::Int,
            // 0x000A es "text" en versiones viejas del protocolo
            0x000A | 0x000D => ColumnType::Varchar,
            0x000B => ColumnType::Timestamp,
            0x000C => ColumnType::Uuid,
            0x000E => ColumnType::Varint,
            0x000F => ColumnType::Timeuuid,
            0x0010 => ColumnType::Inet,
            0x0011 => ColumnType::Date,
            0x0012 => ColumnType::Time,
            0x0013 => ColumnType::Smallint,
            0x0014 => ColumnType::Tinyint,
            0x0015 => ColumnType::Duration,
            0x0020 => ColumnType::List(Box::new(inner(reader)?)),
            0x0021 => {
                let key = inner(reader)?;
                let value = inner(reader)?;
                ColumnType::Map(Box::new(key), Box::new(value))
            }
            0x0022 => ColumnType::Set(Box::new(inner(reader)?)),
            0x0030 => {
                let keyspace = read_string(reader)?;
                let name = read_string(reader)?;
                let count = reader.read_u16::<BigEndian>()? as usize;
                let mut fields = Vec::with_capacity(capacity_for(count, reader.len(), 4));
                for _ in 0..count {
                    let field_name = read_string(reader)?;
                    fields.push((field_name, inner(reader)?));
                }
                ColumnType::Udt {
                    keyspace,
                    name,
                    fields,
                }
            }
            0x0031 => {
                let count = reader.read_u16::<BigEndian>()? as usize;
                let mut types = Vec::with_capacity(capacity_for(count, reader.len(), 2));
                for _ in 0..count {
                    types.push(inner(reader)?);
                }
                ColumnType::Tuple(types)
            }
            other => return Err(ErrorType::TypeNotDefined(format!("{:#06x}", other))),
        };
        Ok(column_type)
    }

    pub fn serialize(&self, bytes: &mut Vec<u8>) -> CqlResult<()> {
        bytes.write_u16::<BigEndian>(self.id())?;
        match self {
            ColumnType::Custom(class) => write_string(bytes, class)?,
            ColumnType::List(inner) | ColumnType::Set(inner) => inner.serialize(bytes)?,
            ColumnType::Map(key, value) => {
                key.serialize(bytes)?;
                value.serialize(bytes)?;
            }
            ColumnType::Udt {
                keyspace,
                name,
                fields,
            } => {
                write_string(bytes, keyspace)?;
                write_string(bytes, name)?;
                bytes.write_u16::<BigEndian>(fields.len() as u16)?;
                for (field_name, field_type) in fields {
                    write_string(bytes, field_name)?;
                    field_type.serialize(bytes)?;
                }
            }
            ColumnType::Tuple(types) => {
                bytes.write_u16::<BigEndian>(types.len() as u16)?;
                for inner in types {
                    inner.serialize(bytes)?;
                }
            }
            _ => {}
        }
        Ok(())
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnType::Custom(class) => write!(f, "'{}'", class),
            ColumnType::Ascii => write!(f, "ascii"),
            ColumnType::Bigint => write!(f, "bigint"),
            ColumnType::Blob => write!(f, "blob"),
            ColumnType::Boolean => write!(f, "boolean"),
            ColumnType::Counter => write!(f, "counter"),
            ColumnType::Decimal => write!(f, "decimal"),
            ColumnType::Double => write!(f, "double"),
            ColumnType::Float => write!(f, "float"),
            ColumnType::Int => write!(f, "int"),
            ColumnType::Timestamp => write!(f, "timestamp"),
            ColumnType::Uuid => write!(f, "uuid"),
            ColumnType::Varchar => write!(f, "varchar"),
            ColumnType::Varint => write!(f, "varint"),
            ColumnType::Timeuuid => write!(f, "timeuuid"),
            ColumnType::Inet => write!(f, "inet"),
            ColumnType::Date => write!(f, "date"),
            ColumnType::Time => write!(f, "time"),
            ColumnType::Smallint => write!(f, "smallint"),
            ColumnType::Tinyint => write!(f, "tinyint"),
            ColumnType::Duration => write!(f, "duration"),
            ColumnType::List(inner) => write!(f, "list<{}>", inner),
            ColumnType::Map(key, value) => write!(f, "map<{}, {}>", key, value),
            ColumnType::Set(inner) => write!(f, "set<{}>", inner),
            ColumnType::Udt { name, .. } => write!(f, "frozen<{}>", name),
            ColumnType::Tuple(types) => {
                let names: Vec<String> = types.iter().map(|t| t.to_string()).collect();
                write!(f, "tuple<{}>", names.join(", "))
            }
        }
    }
}
