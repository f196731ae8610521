use crate::error::CqlResult;
use crate::message_functions::column_spec::ColumnSpec;
use crate::message_functions::notation::{
    capacity_for, read_bytes, read_string, write_bytes, write_string,
};
use crate::value_functions::column_type::ColumnType;
use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};

pub const FLAG_GLOBAL_TABLES_SPEC: u32 = 0x0001;
pub const FLAG_HAS_MORE_PAGES: u32 = 0x0002;
pub const FLAG_NO_METADATA: u32 = 0x0004;

#[derive(Debug, Clone, PartialEq)]
pub struct Metadata {
    pub flags: u32,                                  // Flags de la respuesta.
    pub columns_count: u32,                          // Número de columnas.
    pub paging_state: Option<Vec<u8>>,               // Token para pedir la página siguiente.
    pub global_table_spec: Option<(String, String)>, // Especificación de keyspace y tabla global.
    pub column_specs: Vec<ColumnSpec>,               // Especificaciones de las columnas.
}

impl Metadata {
    /// Arma la metadata de una página; los flags se derivan de los campos.
    pub fn new(
        global_table_spec: Option<(String, String)>,
        column_specs: Vec<ColumnSpec>,
        paging_state: Option<Vec<u8>>,
    ) -> Self {
        let mut flags = 0;
        if global_table_spec.is_some() {
            flags |= FLAG_GLOBAL_TABLES_SPEC;
        }
        if paging_state.is_some() {
            flags |= FLAG_HAS_MORE_PAGES;
        }
        Metadata {
            flags,
            columns_count: column_specs.len() as u32,
            paging_state,
            global_table_spec,
            column_specs,
        }
    }

    pub fn has_more_pages(&self) -> bool {
        self.flags & FLAG_HAS_MORE_PAGES != 0
    }

    /// Serializa la estructura en un vector de bytes.
    pub fn serialize(&self, bytes: &mut Vec<u8>) -> CqlResult<()> {
        bytes.write_u32::<BigEndian>(self.flags)?;
        bytes.write_u32::<BigEndian>(self.columns_count)?;

        if self.has_more_pages() {
            write_bytes(bytes, self.paging_state.as_deref())?;
        }
        if self.flags & FLAG_NO_METADATA != 0 {
            return Ok(());
        }

        if let Some((ks, table)) = &self.global_table_spec {
            write_string(bytes, ks)?;
            write_string(bytes, table)?;
        }

        for col in &self.column_specs {
            if self.global_table_spec.is_none() {
                write_string(bytes, col.keyspace.as_deref().unwrap_or_default())?;
                write_string(bytes, col.table.as_deref().unwrap_or_default())?;
            }
            write_string(bytes, &col.name)?;
            col.col_type.serialize(bytes)?;
        }
        Ok(())
    }

    /// Deserializa la metadata de un RESULT de tipo Rows.
    pub fn deserialize(reader: &mut &[u8]) -> CqlResult<Self> {
        let flags = reader.read_u32::<BigEndian>()?;
        let columns_count = reader.read_u32::<BigEndian>()?;

        let paging_state = if flags & FLAG_HAS_MORE_PAGES != 0 {
            read_bytes(reader)?
        } else {
            None
        };

        if flags & FLAG_NO_METADATA != 0 {
            return Ok(Self {
                flags,
                columns_count,
                paging_state,
                global_table_spec: None,
                column_specs: vec![],
            });
        }

        let global_table_spec = if flags & FLAG_GLOBAL_TABLES_SPEC != 0 {
            let keyspace = read_string(reader)?;
            let table = read_string(reader)?;
            Some((keyspace, table))
        } else {
            None
        };

        let mut column_specs =
            Vec::with_capacity(capacity_for(columns_count as usize, reader.len(), 4));
        for _ in 0..columns_count {
            let (keyspace, table) = match &global_table_spec {
                Some(_) => (None, None),
                None => (Some(read_string(reader)?), Some(read_string(reader)?)),
            };
            let name = read_string(reader)?;
            let col_type = ColumnType::deserialize(reader)?;
            column_specs.push(ColumnSpec {
                keyspace,
                table,
                name,
                col_type,
            });
        }
        Ok(Self {
            flags,
            columns_count,
            paging_state,
            global_table_spec,
            column_specs,
        })
    }
}
