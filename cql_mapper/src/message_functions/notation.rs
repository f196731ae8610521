// Tipos básicos del protocolo nativo: [short], [int], [string], [long string],
// [bytes], [string list] y [string map]. Todos en big endian.
use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use std::io;

fn invalid_utf8(campo: &str) -> io::Error {
    io::Error::new(
        io::ErrorKind::InvalidData,
        format!("Invalid UTF-8 in {}", campo),
    )
}

/// Largo de un campo con prefijo [short]. Falla si no entra en u16.
pub fn short_len(len: usize, campo: &str) -> io::Result<u16> {
    u16::try_from(len).map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{} too long: {} > {}", campo, len, u16::MAX),
        )
    })
}

/// Largo de un campo con prefijo [int]. Falla si no entra en i32.
pub fn int_len(len: usize, campo: &str) -> io::Result<i32> {
    i32::try_from(len).map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{} too long: {} > {}", campo, len, i32::MAX),
        )
    })
}

/// Capacidad inicial para `count` elementos leídos del frame: nunca más
/// de los que entran en los bytes que quedan.
pub fn capacity_for(count: usize, remaining: usize, min_item_len: usize) -> usize {
    count.min(remaining / min_item_len.max(1))
}

// Consume `len` bytes del reader sin reservar más de lo que hay.
fn take(reader: &mut &[u8], len: usize) -> io::Result<Vec<u8>> {
    if len > reader.len() {
        return Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            format!("Expected {} bytes, {} left", len, reader.len()),
        ));
    }
    let (head, rest) = reader.split_at(len);
    *reader = rest;
    Ok(head.to_vec())
}

/// Lee un [string]: largo u16 seguido de los bytes UTF-8.
pub fn read_string(reader: &mut &[u8]) -> io::Result<String> {
    let len = reader.read_u16::<BigEndian>()? as usize;
    let bytes = take(reader, len)?;
    String::from_utf8(bytes).map_err(|_| invalid_utf8("[string]"))
}

/// Lee un [long string]: largo i32 seguido de los bytes UTF-8.
pub fn read_long_string(reader: &mut &[u8]) -> io::Result<String> {
    let len = reader.read_i32::<BigEndian>()?;
    if len < 0 {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            "Negative [long string] length",
        ));
    }
    let bytes = take(reader, len as usize)?;
    String::from_utf8(bytes).map_err(|_| invalid_utf8("[long string]"))
}

/// Lee un [bytes]. Un largo negativo representa null.
pub fn read_bytes(reader: &mut &[u8]) -> io::Result<Option<Vec<u8>>> {
    let len = reader.read_i32::<BigEndian>()?;
    if len < 0 {
        return Ok(None);
    }
    Ok(Some(take(reader, len as usize)?))
}

pub fn read_string_list(reader: &mut &[u8]) -> io::Result<Vec<String>> {
    let count = reader.read_u16::<BigEndian>()? as usize;
    let mut list = Vec::with_capacity(capacity_for(count, reader.len(), 2));
    for _ in 0..count {
        list.push(read_string(reader)?);
    }
    Ok(list)
}

pub fn read_string_map(reader: &mut &[u8]) -> io::Result<Vec<(String, String)>> {
    let count = reader.read_u16::<BigEndian>()? as usize;
    let mut entries = Vec::with_capacity(capacity_for(count, reader.len(), 4));
    for _ in 0..count {
        let key = read_string(reader)?;
        let value = read_string(reader)?;
        entries.push((key, value));
    }
    Ok(entries)
}

pub fn write_string(bytes: &mut Vec<u8>, value: &str) -> io::Result<()> {
    bytes.write_u16::<BigEndian>(short_len(value.len(), "[string]")?)?;
    bytes.extend_from_slice(value.as_bytes());
    Ok(())
}

pub fn write_long_string(bytes: &mut Vec<u8>, value: &str) -> io::Result<()> {
    bytes.write_i32::<BigEndian>(int_len(value.len(), "[long string]")?)?;
    bytes.extend_from_slice(value.as_bytes());
    Ok(())
}

/// Escribe un [bytes]; `None` se serializa con largo -1.
pub fn write_bytes(bytes: &mut Vec<u8>, value: Option<&[u8]>) -> io::Result<()> {
    match value {
        Some(data) => {
            bytes.write_i32::<BigEndian>(int_len(data.len(), "[bytes]")?)?;
            bytes.extend_from_slice(data);
        }
        None => bytes.write_i32::<BigEndian>(-1)?,
    }
    Ok(())
}

pub fn write_string_map(bytes: &mut Vec<u8>, entries: &[(String, String)]) -> io::Result<()> {
    bytes.write_u16::<BigEndian>(short_len(entries.len(), "[string map]")?)?;
    for (key, value) in entries {
        write_string(bytes, key)?;
        write_string(bytes, value)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_bytes_use_negative_length() {
        let mut bytes = vec![];
        write_bytes(&mut bytes, None).unwrap();
        assert_eq!(bytes, vec![0xFF, 0xFF, 0xFF, 0xFF]);

        let mut reader = &bytes[..];
        assert_eq!(read_bytes(&mut reader).unwrap(), None);
    }

    #[test]
    fn string_map_reads_back_in_order() {
        let entries = vec![
            ("CQL_VERSION".to_string(), "3.0.0".to_string()),
            ("DRIVER_NAME".to_string(), "cql_mapper".to_string()),
        ];
        let mut bytes = vec![];
        write_string_map(&mut bytes, &entries).unwrap();

        let mut reader = &bytes[..];
        assert_eq!(read_string_map(&mut reader).unwrap(), entries);
        assert!(reader.is_empty());
    }

    #[test]
    fn truncated_string_is_an_error() {
        let bytes = [0x00, 0x05, b'a', b'b'];
        let mut reader = &bytes[..];
        assert!(read_string(&mut reader).is_err());
    }

    #[test]
    fn oversized_string_is_rejected_on_write() {
        let long = "x".repeat(u16::MAX as usize + 1);
        let mut bytes = vec![];
        let err = write_string(&mut bytes, &long).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
        assert!(bytes.is_empty());
    }

    #[test]
    fn bytes_length_beyond_frame_fails_without_allocating() {
        let bytes = [0x7F, 0xFF, 0xFF, 0xFF, 0x01];
        let mut reader = &bytes[..];
        let err = read_bytes(&mut reader).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }

    #[test]
    fn capacity_is_bounded_by_remaining_bytes() {
        assert_eq!(capacity_for(i32::MAX as usize, 12, 4), 3);
        assert_eq!(capacity_for(2, 100, 4), 2);
        assert_eq!(capacity_for(5, 10, 0), 5);
    }
}
