use crate::error::{CqlResult, ErrorType};
use crate::message_functions::notation::{capacity_for, read_bytes, write_bytes};
use crate::message_functions::{metadata::Metadata, row_content::RowContent};
use crate::value_functions::cql_value::CqlValue;
use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};

#[derive(Debug, Clone, PartialEq)]
pub struct BodyRows {
    pub metadata: Metadata,            // Metadata sobre las columnas.
    pub rows_count: u32,               // Número de filas.
    pub rows_content: Vec<RowContent>, // Contenido de las filas.
}

// Serialización y deserialización de `BodyRows`
impl BodyRows {
    pub fn serialize(&self) -> CqlResult<Vec<u8>> {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&0x0002_u32.to_be_bytes()); // `kind = 0x0002` para "Rows".
        self.metadata.serialize(&mut bytes)?;
        bytes.write_u32::<BigEndian>(self.rows_count)?;

        for row in &self.rows_content {
            for value in &row.values {
                write_bytes(&mut bytes, value.as_deref())?;
            }
        }
        Ok(bytes)
    }

    pub fn deserialize(bytes: &[u8]) -> CqlResult<Self> {
        let mut reader = bytes.get(4..).unwrap_or_default(); // Saltamos el kind.

        let metadata = Metadata::deserialize(&mut reader)?;
        let rows_count = reader.read_u32::<BigEndian>()?;
        let columns = metadata.columns_count as usize;

        if columns == 0 && rows_count > 0 {
            return Err(ErrorType::Protocol(format!(
                "{} rows without columns",
                rows_count
            )));
        }
        // Cada celda trae al menos su largo [int]
        let row_len = columns.saturating_mul(4);
        let mut rows_content =
            Vec::with_capacity(capacity_for(rows_count as usize, reader.len(), row_len));
        for _ in 0..rows_count {
            let mut values = Vec::with_capacity(capacity_for(columns, reader.len(), 4));
            for _ in 0..columns {
                values.push(read_bytes(&mut reader)?);
            }
            rows_content.push(RowContent { values });
        }

        Ok(Self {
            metadata,
            rows_count,
            rows_content,
        })
    }

    /// Decodifica cada celda según el tipo de su columna.
    pub fn decode(&self) -> CqlResult<Vec<Vec<CqlValue>>> {
        self.rows_content
            .iter()
            .map(|row| {
                self.metadata
                    .column_specs
                    .iter()
                    .zip(&row.values)
                    .map(|(spec, cell)| CqlValue::deserialize(&spec.col_type, cell.as_deref()))
                    .collect()
            })
            .collect()
    }
}
