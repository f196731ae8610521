#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeType {
    Created,
    Updated,
    Dropped,
}

impl ChangeType {
    // Representación textual del tipo de cambio en el protocolo
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeType::Created => "CREATED",
            ChangeType::Updated => "UPDATED",
            ChangeType::Dropped => "DROPPED",
        }
    }

    // Interpreta el [string] recibido en el frame
    pub fn from_str_value(value: &str) -> std::io::Result<Self> {
        match value {
            "CREATED" => Ok(ChangeType::Created),
            "UPDATED" => Ok(ChangeType::Updated),
            "DROPPED" => Ok(ChangeType::Dropped),
            _ => Err(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!("Tipo de cambio no válido: {}", value),
            )),
        }
    }
}
