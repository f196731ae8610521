use crate::error::{CqlResult, ErrorType};
use crate::message_functions::notation::{capacity_for, read_bytes, write_bytes};
use crate::value_functions::column_type::ColumnType;
use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Timelike, Utc};
use rust_decimal::Decimal;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use uuid::Uuid;

/// Los días de `date` se cuentan desde 2^31 = 1970-01-01.
const DATE_EPOCH_OFFSET: i64 = 1 << 31;
const NANOS_PER_SECOND: i64 = 1_000_000_000;
// Decimales que admite `rust_decimal::Decimal`.
const MAX_DECIMAL_SCALE: u32 = 28;

/// Valor nativo de CQL.
#[derive(Debug, Clone, PartialEq)]
pub enum CqlValue {
    Null,
    Ascii(String),
    Text(String),
    Bigint(i64),
    Counter(i64),
    Blob(Vec<u8>),
    Boolean(bool),
    Decimal(Decimal),
    Double(f64),
    Float(f32),
    Int(i32),
    Smallint(i16),
    Tinyint(i8),
    Varint(i128),
    Timestamp(DateTime<Utc>),
    Date(NaiveDate),
    Time(NaiveTime),
    Uuid(Uuid),
    Timeuuid(Uuid),
    Inet(IpAddr),
    Duration {
        months: i32,
        days: i32,
        nanoseconds: i64,
    },
    List(Vec<CqlValue>),
    Set(Vec<CqlValue>),
    Map(Vec<(CqlValue, CqlValue)>),
    Tuple(Vec<CqlValue>),
    Udt(Vec<(String, CqlValue)>),
    Custom {
        class: String,
        data: Vec<u8>,
    },
}

impl CqlValue {
    pub fn is_null(&self) -> bool {
        matches!(self, CqlValue::Null)
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            CqlValue::Text(s) | CqlValue::Ascii(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            CqlValue::Bigint(v) | CqlValue::Counter(v) => Some(*v),
            CqlValue::Int(v) => Some(*v as i64),
            CqlValue::Smallint(v) => Some(*v as i64),
            CqlValue::Tinyint(v) => Some(*v as i64),
            CqlValue::Varint(v) => i64::try_from(*v).ok(),
            _ => None,
        }
    }

    pub fn as_uuid(&self) -> Option<Uuid> {
        match self {
            CqlValue::Uuid(u) | CqlValue::Timeuuid(u) => Some(*u),
            _ => None,
        }
    }

    /// Serializa el valor como contenido de un [bytes]. `Null` no tiene
    /// contenido y devuelve `None`.
    pub fn serialize(&self) -> CqlResult<Option<Vec<u8>>> {
        let mut bytes = vec![];
        match self {
            CqlValue::Null => return Ok(None),
            CqlValue::Ascii(s) | CqlValue::Text(s) => bytes.extend_from_slice(s.as_bytes()),
            CqlValue::Bigint(v) | CqlValue::Counter(v) => bytes.write_i64::<BigEndian>(*v)?,
            CqlValue::Blob(data) => bytes.extend_from_slice(data),
            CqlValue::Boolean(b) => bytes.push(u8::from(*b)),
            CqlValue::Decimal(d) => {
                bytes.write_i32::<BigEndian>(d.scale() as i32)?;
                bytes.extend(varint_to_bytes(d.mantissa()));
            }
            CqlValue::Double(v) => bytes.write_f64::<BigEndian>(*v)?,
            CqlValue::Float(v) => bytes.write_f32::<BigEndian>(*v)?,
            CqlValue::Int(v) => bytes.write_i32::<BigEndian>(*v)?,
            CqlValue::Smallint(v) => bytes.write_i16::<BigEndian>(*v)?,
            CqlValue::Tinyint(v) => bytes.write_i8(*v)?,
            CqlValue::Varint(v) => bytes.extend(varint_to_bytes(*v)),
            CqlValue::Timestamp(ts) => bytes.write_i64::<BigEndian>(ts.timestamp_millis())?,
            CqlValue::Date(date) => {
                let days = date.signed_duration_since(unix_epoch_date()).num_days();
                bytes.write_u32::<BigEndian>((days + DATE_EPOCH_OFFSET) as u32)?;
            }
            CqlValue::Time(time) => {
                let nanos = time.num_seconds_from_midnight() as i64 * NANOS_PER_SECOND
                    + time.nanosecond() as i64;
                bytes.write_i64::<BigEndian>(nanos)?;
            }
            CqlValue::Uuid(u) | CqlValue::Timeuuid(u) => bytes.extend_from_slice(u.as_bytes()),
            CqlValue::Inet(IpAddr::V4(ip)) => bytes.extend_from_slice(&ip.octets()),
            CqlValue::Inet(IpAddr::V6(ip)) => bytes.extend_from_slice(&ip.octets()),
            CqlValue::Duration {
                months,
                days,
                nanoseconds,
            } => {
                write_vint(&mut bytes, *months as i64);
                write_vint(&mut bytes, *days as i64);
                write_vint(&mut bytes, *nanoseconds);
            }
            CqlValue::List(items) | CqlValue::Set(items) => {
                bytes.write_i32::<BigEndian>(items.len() as i32)?;
                for item in items {
                    write_bytes(&mut bytes, item.serialize()?.as_deref())?;
                }
            }
            CqlValue::Map(entries) => {
                bytes.write_i32::<BigEndian>(entries.len() as i32)?;
                for (key, value) in entries {
                    write_bytes(&mut bytes, key.serialize()?.as_deref())?;
                    write_bytes(&mut bytes, value.serialize()?.as_deref())?;
                }
            }
            CqlValue::Tuple(items) => {
                for item in items {
                    write_bytes(&mut bytes, item.serialize()?.as_deref())?;
                }
            }
            CqlValue::Udt(fields) => {
                for (_, value) in fields {
                    write_bytes(&mut bytes, value.serialize()?.as_deref())?;
                }
            }
            CqlValue::Custom { data, .. } => bytes.extend_from_slice(data),
        }
        Ok(Some(bytes))
    }

    /// Decodifica el contenido de una celda según su tipo de columna.
    pub fn deserialize(column_type: &ColumnType, data: Option<&[u8]>) -> CqlResult<Self> {
        let data = match data {
            Some(data) => data,
            None => return Ok(CqlValue::Null),
        };
        let mut reader = data;
        let value = match column_type {
            ColumnType::Custom(class) => CqlValue::Custom {
                class: class.clone(),
                data: data.to_vec(),
            },
            ColumnType::Ascii => CqlValue::Ascii(utf8(data)?),
            ColumnType::Varchar => CqlValue::Text(utf8(data)?),
            ColumnType::Bigint => CqlValue::Bigint(reader.read_i64::<BigEndian>()?),
            ColumnType::Counter => CqlValue::Counter(reader.read_i64::<BigEndian>()?),
            ColumnType::Blob => CqlValue::Blob(data.to_vec()),
            ColumnType::Boolean => CqlValue::Boolean(reader.read_u8()? != 0),
            ColumnType::Decimal => {
                let scale = reader.read_i32::<BigEndian>()?;
                let unscaled = varint_from_bytes(reader)?;
                CqlValue::Decimal(decimal_from_parts(unscaled, scale)?)
            }
            ColumnType::Double => CqlValue::Double(reader.read_f64::<BigEndian>()?),
            ColumnType::Float => CqlValue::Float(reader.read_f32::<BigEndian>()?),
            ColumnType::Int => CqlValue::Int(reader.read_i32::<BigEndian>()?),
            ColumnType::Smallint => CqlValue::Smallint(reader.read_i16::<BigEndian>()?),
            ColumnType::Tinyint => CqlValue::Tinyint(reader.read_i8()?),
            ColumnType::Varint => CqlValue::Varint(varint_from_bytes(data)?),
            ColumnType::Timestamp => {
                let millis = reader.read_i64::<BigEndian>()?;
                let ts = Utc.timestamp_millis_opt(millis).single().ok_or_else(|| {
                    ErrorType::Conversion(format!("timestamp out of range: {}", millis))
                })?;
                CqlValue::Timestamp(ts)
            }
            ColumnType::Date => {
                let raw = reader.read_u32::<BigEndian>()? as i64;
                let days = raw - DATE_EPOCH_OFFSET;
                let date = unix_epoch_date()
                    .checked_add_signed(chrono::Duration::days(days))
                    .ok_or_else(|| ErrorType::Conversion(format!("date out of range: {}", days)))?;
                CqlValue::Date(date)
            }
            ColumnType::Time => {
                let nanos = reader.read_i64::<BigEndian>()?;
                let time = NaiveTime::from_num_seconds_from_midnight_opt(
                    (nanos / NANOS_PER_SECOND) as u32,
                    (nanos % NANOS_PER_SECOND) as u32,
                )
                .ok_or_else(|| ErrorType::Conversion(format!("time out of range: {}", nanos)))?;
                CqlValue::Time(time)
            }
            ColumnType::Uuid => CqlValue::Uuid(uuid_from(data)?),
            ColumnType::Timeuuid => CqlValue::Timeuuid(uuid_from(data)?),
            ColumnType::Inet => CqlValue::Inet(inet_from(data)?),
            ColumnType::Duration => {
                let months = read_vint(&mut reader)? as i32;
                let days = read_vint(&mut reader)? as i32;
                let nanoseconds = read_vint(&mut reader)?;
                CqlValue::Duration {
                    months,
                    days,
                    nanoseconds,
                }
            }
            ColumnType::List(inner) => CqlValue::List(read_elements(&mut reader, inner)?),
            ColumnType::Set(inner) => CqlValue::Set(read_elements(&mut reader, inner)?),
            ColumnType::Map(key_type, value_type) => {
                let count = reader.read_i32::<BigEndian>()?.max(0) as usize;
                // Cada entrada trae al menos dos largos [int]
                let mut entries = Vec::with_capacity(capacity_for(count, reader.len(), 8));
                for _ in 0..count {
                    let key = read_bytes(&mut reader)?;
                    let value = read_bytes(&mut reader)?;
                    entries.push((
                        Self::deserialize(key_type, key.as_deref())?,
                        Self::deserialize(value_type, value.as_deref())?,
                    ));
                }
                CqlValue::Map(entries)
            }
            ColumnType::Tuple(types) => {
                let mut items = Vec::with_capacity(types.len());
                for item_type in types {
                    // Una tupla puede venir truncada; los elementos faltantes son null
                    if reader.is_empty() {
                        items.push(CqlValue::Null);
                        continue;
                    }
                    let item = read_bytes(&mut reader)?;
                    items.push(Self::deserialize(item_type, item.as_deref())?);
                }
                CqlValue::Tuple(items)
            }
            ColumnType::Udt { fields, .. } => {
                let mut values = Vec::with_capacity(fields.len());
                for (name, field_type) in fields {
                    if reader.is_empty() {
                        values.push((name.clone(), CqlValue::Null));
                        continue;
                    }
                    let field = read_bytes(&mut reader)?;
                    values.push((name.clone(), Self::deserialize(field_type, field.as_deref())?));
                }
                CqlValue::Udt(values)
            }
        };
        Ok(value)
    }
}

fn read_elements(reader: &mut &[u8], inner: &ColumnType) -> CqlResult<Vec<CqlValue>> {
    let count = reader.read_i32::<BigEndian>()?.max(0) as usize;
    let mut items = Vec::with_capacity(capacity_for(count, reader.len(), 4));
    for _ in 0..count {
        let item = read_bytes(reader)?;
        items.push(CqlValue::deserialize(inner, item.as_deref())?);
    }
    Ok(items)
}

/// Arma un `Decimal` desde el valor sin escala y la escala del protocolo.
/// Una escala negativa multiplica por 10^-escala. Más de
/// `MAX_DECIMAL_SCALE` decimales se redondean (mitad lejos de cero).
fn decimal_from_parts(unscaled: i128, scale: i32) -> CqlResult<Decimal> {
    let out_of_range = || {
        ErrorType::Conversion(format!(
            "decimal {}E{} out of range",
            unscaled,
            -(scale as i64)
        ))
    };
    if scale < 0 {
        let value = 10i128
            .checked_pow(scale.unsigned_abs())
            .and_then(|factor| unscaled.checked_mul(factor))
            .ok_or_else(out_of_range)?;
        return Decimal::try_from_i128_with_scale(value, 0).map_err(|_| out_of_range());
    }

    let scale = scale as u32;
    if scale <= MAX_DECIMAL_SCALE {
        return Decimal::try_from_i128_with_scale(unscaled, scale).map_err(|_| out_of_range());
    }
    let rounded = match 10i128.checked_pow(scale - MAX_DECIMAL_SCALE) {
        Some(divisor) => {
            let quotient = unscaled / divisor;
            let remainder = (unscaled % divisor).abs();
            if remainder >= divisor - remainder {
                quotient + unscaled.signum()
            } else {
                quotient
            }
        }
        // Más de 38 dígitos de diferencia: el valor redondea a cero
        None => 0,
    };
    Decimal::try_from_i128_with_scale(rounded, MAX_DECIMAL_SCALE).map_err(|_| out_of_range())
}

fn unix_epoch_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(1970, 1, 1).unwrap_or(NaiveDate::MIN)
}

fn utf8(data: &[u8]) -> CqlResult<String> {
    String::from_utf8(data.to_vec()).map_err(|_| ErrorType::Conversion("invalid UTF-8".to_string()))
}

fn uuid_from(data: &[u8]) -> CqlResult<Uuid> {
    Uuid::from_slice(data).map_err(|e| ErrorType::Conversion(e.to_string()))
}

fn inet_from(data: &[u8]) -> CqlResult<IpAddr> {
    match data.len() {
        4 => {
            let mut octets = [0u8; 4];
            octets.copy_from_slice(data);
            Ok(IpAddr::V4(Ipv4Addr::from(octets)))
        }
        16 => {
            let mut octets = [0u8; 16];
            octets.copy_from_slice(data);
            Ok(IpAddr::V6(Ipv6Addr::from(octets)))
        }
        len => Err(ErrorType::Conversion(format!("invalid inet length {}", len))),
    }
}

/// Complemento a dos big endian con la menor cantidad de bytes.
pub fn varint_to_bytes(value: i128) -> Vec<u8> {
    let bytes = value.to_be_bytes();
    let mut start = 0;
    while start < bytes.len() - 1 {
        let redundant = (bytes[start] == 0x00 && bytes[start + 1] & 0x80 == 0)
            || (bytes[start] == 0xFF && bytes[start + 1] & 0x80 != 0);
        if !redundant {
            break;
        }
        start += 1;
    }
    bytes[start..].to_vec()
}

pub fn varint_from_bytes(data: &[u8]) -> CqlResult<i128> {
    if data.is_empty() || data.len() > 16 {
        return Err(ErrorType::Conversion(format!(
            "varint of {} bytes is not supported",
            data.len()
        )));
    }
    let fill = if data[0] & 0x80 != 0 { 0xFF } else { 0x00 };
    let mut buffer = [fill; 16];
    buffer[16 - data.len()..].copy_from_slice(data);
    Ok(i128::from_be_bytes(buffer))
}

// [vint] con zig-zag, usado por `duration`
fn write_vint(bytes: &mut Vec<u8>, value: i64) {
    let zigzag = ((value << 1) ^ (value >> 63)) as u64;
    let bits = 64 - zigzag.leading_zeros() as usize;
    let size = if bits == 0 { 1 } else { ((bits + 6) / 7).min(9) };
    let extra = size - 1;
    let mut encoded = vec![0u8; size];
    let mut rest = zigzag;
    for i in (1..size).rev() {
        encoded[i] = rest as u8;
        rest >>= 8;
    }
    let mask = if extra >= 8 { 0xFF } else { !(0xFFu8 >> extra) };
    encoded[0] = mask | rest as u8;
    bytes.extend(encoded);
}

fn read_vint(reader: &mut &[u8]) -> CqlResult<i64> {
    let first = reader.read_u8()?;
    let extra = first.leading_ones();
    let mut value = match 0xFFu8.checked_shr(extra) {
        Some(mask) => (first & mask) as u64,
        None => 0,
    };
    for _ in 0..extra {
        value = (value << 8) | reader.read_u8()? as u64;
    }
    Ok(((value >> 1) as i64) ^ -((value & 1) as i64))
}

impl From<i32> for CqlValue {
    fn from(v: i32) -> Self {
        CqlValue::Int(v)
    }
}

impl From<i64> for CqlValue {
    fn from(v: i64) -> Self {
        CqlValue::Bigint(v)
    }
}

impl From<bool> for CqlValue {
    fn from(v: bool) -> Self {
        CqlValue::Boolean(v)
    }
}

impl From<f64> for CqlValue {
    fn from(v: f64) -> Self {
        CqlValue::Double(v)
    }
}

impl From<&str> for CqlValue {
    fn from(v: &str) -> Self {
        CqlValue::Text(v.to_string())
    }
}

impl From<String> for CqlValue {
    fn from(v: String) -> Self {
        CqlValue::Text(v)
    }
}

impl From<Uuid> for CqlValue {
    fn from(v: Uuid) -> Self {
        CqlValue::Uuid(v)
    }
}

impl From<Decimal> for CqlValue {
    fn from(v: Decimal) -> Self {
        CqlValue::Decimal(v)
    }
}

impl From<IpAddr> for CqlValue {
    fn from(v: IpAddr) -> Self {
        CqlValue::Inet(v)
    }
}

impl From<DateTime<Utc>> for CqlValue {
    fn from(v: DateTime<Utc>) -> Self {
        CqlValue::Timestamp(v)
    }
}

impl<T: Into<CqlValue>> From<Option<T>> for CqlValue {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(CqlValue::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn reencode(column_type: &ColumnType, value: &CqlValue) -> CqlValue {
        let bytes = value.serialize().unwrap();
        CqlValue::deserialize(column_type, bytes.as_deref()).unwrap()
    }

    #[test]
    fn varint_uses_minimal_encoding() {
        assert_eq!(varint_to_bytes(0), vec![0x00]);
        assert_eq!(varint_to_bytes(127), vec![0x7F]);
        assert_eq!(varint_to_bytes(128), vec![0x00, 0x80]);
        assert_eq!(varint_to_bytes(-1), vec![0xFF]);
        assert_eq!(varint_to_bytes(-129), vec![0xFF, 0x7F]);
        assert_eq!(varint_from_bytes(&[0xFF, 0x7F]).unwrap(), -129);
    }

    #[test]
    fn decimal_keeps_its_scale() {
        let value = CqlValue::Decimal(Decimal::from_str("-12.500").unwrap());
        let bytes = value.serialize().unwrap().unwrap();
        assert_eq!(&bytes[..4], &[0, 0, 0, 3]);
        assert_eq!(reencode(&ColumnType::Decimal, &value), value);
    }

    #[test]
    fn date_is_offset_from_two_to_the_31() {
        let date = CqlValue::Date(NaiveDate::from_ymd_opt(1970, 1, 2).unwrap());
        let bytes = date.serialize().unwrap().unwrap();
        assert_eq!(bytes, vec![0x80, 0x00, 0x00, 0x01]);
        assert_eq!(reencode(&ColumnType::Date, &date), date);
    }

    #[test]
    fn duration_vints_round_trip() {
        let value = CqlValue::Duration {
            months: 1,
            days: -3,
            nanoseconds: 90_000_000_000,
        };
        assert_eq!(reencode(&ColumnType::Duration, &value), value);
    }

    #[test]
    fn collections_nest() {
        let column_type = ColumnType::Map(
            Box::new(ColumnType::Varchar),
            Box::new(ColumnType::Set(Box::new(ColumnType::Int))),
        );
        let value = CqlValue::Map(vec![
            (
                CqlValue::Text("a".to_string()),
                CqlValue::Set(vec![CqlValue::Int(1), CqlValue::Int(2)]),
            ),
            (CqlValue::Text("b".to_string()), CqlValue::Set(vec![])),
        ]);
        assert_eq!(reencode(&column_type, &value), value);
    }

    #[test]
    fn null_cell_is_null() {
        assert_eq!(
            CqlValue::deserialize(&ColumnType::Int, None).unwrap(),
            CqlValue::Null
        );
        assert_eq!(CqlValue::Null.serialize().unwrap(), None);
    }

    #[test]
    fn bad_inet_length_fails() {
        assert!(matches!(
            CqlValue::deserialize(&ColumnType::Inet, Some(&[1, 2, 3])),
            Err(ErrorType::Conversion(_))
        ));
    }

    #[test]
    fn negative_decimal_scale_multiplies() {
        // 1E+3: escala -3, valor sin escala 1
        let bytes = [0xFF, 0xFF, 0xFF, 0xFD, 0x01];
        let value = CqlValue::deserialize(&ColumnType::Decimal, Some(&bytes));
        assert_eq!(value.unwrap(), CqlValue::Decimal(Decimal::from(1000)));

        let bytes = [0x80, 0x00, 0x00, 0x00, 0x01];
        let huge = CqlValue::deserialize(&ColumnType::Decimal, Some(&bytes));
        assert!(matches!(huge, Err(ErrorType::Conversion(_))));
    }

    #[test]
    fn decimal_scale_above_limit_is_rounded() {
        let bytes = [0x00, 0x00, 0x00, 0x1E, 0x01];
        let tiny = CqlValue::deserialize(&ColumnType::Decimal, Some(&bytes));
        assert_eq!(tiny.unwrap(), CqlValue::Decimal(Decimal::ZERO));

        // 150E-30 = 1.5E-28, redondea a 2E-28
        let half = CqlValue::deserialize(
            &ColumnType::Decimal,
            Some(&[0x00, 0x00, 0x00, 0x1E, 0x00, 0x96]),
        );
        assert_eq!(half.unwrap(), CqlValue::Decimal(Decimal::new(2, 28)));

        let bytes = [0x7F, 0xFF, 0xFF, 0xFF, 0x05];
        let far = CqlValue::deserialize(&ColumnType::Decimal, Some(&bytes));
        assert_eq!(far.unwrap(), CqlValue::Decimal(Decimal::ZERO));
    }

    #[test]
    fn collection_count_beyond_cell_fails_without_allocating() {
        let list = ColumnType::List(Box::new(ColumnType::Int));
        assert!(CqlValue::deserialize(&list, Some(&[0x7F, 0xFF, 0xFF, 0xFF])).is_err());

        let map = ColumnType::Map(Box::new(ColumnType::Int), Box::new(ColumnType::Int));
        assert!(CqlValue::deserialize(&map, Some(&[0x7F, 0xFF, 0xFF, 0xFF])).is_err());
    }
}
