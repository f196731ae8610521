use std::fmt;

/// Tipo de una columna al definir una tabla.
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaType {
    Ascii,
    Bigint,
    Blob,
    Boolean,
    Counter,
    Date,
    Decimal,
    Double,
    Float,
    Frozen(Box<SchemaType>),
    Inet,
    Int,
    List(Box<SchemaType>),
    Map(Box<SchemaType>, Box<SchemaType>),
    Set(Box<SchemaType>),
    Smallint,
    Text,
    Time,
    Timestamp,
    Timeuuid,
    Tinyint,
    Tuple(Vec<SchemaType>),
    Uuid,
    Varchar,
    Varint,
    /// Tipo definido por el usuario, por nombre.
    Udt(String),
}

impl fmt::Display for SchemaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemaType::Ascii => write!(f, "ascii"),
            SchemaType::Bigint => write!(f, "bigint"),
            SchemaType::Blob => write!(f, "blob"),
            SchemaType::Boolean => write!(f, "boolean"),
            SchemaType::Counter => write!(f, "counter"),
            SchemaType::Date => write!(f, "date"),
            SchemaType::Decimal => write!(f, "decimal"),
            SchemaType::Double => write!(f, "double"),
            SchemaType::Float => write!(f, "float"),
            SchemaType::Frozen(inner) => write!(f, "frozen<{}>", inner),
            SchemaType::Inet => write!(f, "inet"),
            SchemaType::Int => write!(f, "int"),
            SchemaType::List(inner) => write!(f, "list<{}>", inner),
            SchemaType::Map(key, value) => write!(f, "map<{}, {}>", key, value),
            SchemaType::Set(inner) => write!(f, "set<{}>", inner),
            SchemaType::Smallint => write!(f, "smallint"),
            SchemaType::Text => write!(f, "text"),
            SchemaType::Time => write!(f, "time"),
            SchemaType::Timestamp => write!(f, "timestamp"),
            SchemaType::Timeuuid => write!(f, "timeuuid"),
            SchemaType::Tinyint => write!(f, "tinyint"),
            SchemaType::Tuple(types) => {
                let names: Vec<String> = types.iter().map(|t| t.to_string()).collect();
                write!(f, "tuple<{}>", names.join(", "))
            }
            SchemaType::Uuid => write!(f, "uuid"),
            SchemaType::Varchar => write!(f, "varchar"),
            SchemaType::Varint => write!(f, "varint"),
            SchemaType::Udt(name) => write!(f, "\"{}\"", name.replace('"', "\"\"")),
        }
    }
}
