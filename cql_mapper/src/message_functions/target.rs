#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Keyspace,
    Table,
    Type,
    Function,
    Aggregate,
}

impl Target {
    /// Nombre del objetivo tal como viaja en el frame.
    pub fn as_str(&self) -> &'static str {
        match self {
            Target::Keyspace => "KEYSPACE",
            Target::Table => "TABLE",
            Target::Type => "TYPE",
            Target::Function => "FUNCTION",
            Target::Aggregate => "AGGREGATE",
        }
    }

    /// Intenta convertir el texto recibido en el tipo de objetivo correspondiente.
    pub fn from_str_value(value: &str) -> std::io::Result<Self> {
        match value {
            "KEYSPACE" => Ok(Target::Keyspace),
            "TABLE" => Ok(Target::Table),
            "TYPE" => Ok(Target::Type),
            "FUNCTION" => Ok(Target::Function),
            "AGGREGATE" => Ok(Target::Aggregate),
            _ => Err(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!("Objetivo no válido: {}", value),
            )),
        }
    }
}
