//! Conversión entre valores nativos de CQL y valores del host (`serde_json::Value`).
//!
//! `to_host` es la hidratación de las filas leídas; `from_host` arma el valor
//! nativo a partir del tipo de la columna. Los tipos sin equivalente en el host
//! (`duration` y tipos custom) fallan con `ErrorType::TypeNotDefined`.

use crate::error::{CqlResult, ErrorType};
use crate::value_functions::{column_type::ColumnType, cql_value::CqlValue};
use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use rust_decimal::Decimal;
use serde_json::{Map, Number, Value};
use std::net::IpAddr;
use std::str::FromStr;
use uuid::Uuid;

const SECONDS_PER_DAY: i64 = 86_400;

/// Convierte un valor nativo en un valor del host.
pub fn to_host(value: &CqlValue) -> CqlResult<Value> {
    let host = match value {
        CqlValue::Null => Value::Null,
        CqlValue::Ascii(s) | CqlValue::Text(s) => Value::String(s.clone()),
        CqlValue::Bigint(v) | CqlValue::Counter(v) => Value::from(*v),
        CqlValue::Int(v) => Value::from(*v),
        CqlValue::Smallint(v) => Value::from(*v),
        CqlValue::Tinyint(v) => Value::from(*v),
        CqlValue::Varint(v) => match i64::try_from(*v) {
            Ok(small) => Value::from(small),
            Err(_) => Value::String(v.to_string()),
        },
        CqlValue::Boolean(b) => Value::Bool(*b),
        CqlValue::Double(v) => float_to_host(*v)?,
        CqlValue::Float(v) => float_to_host(*v as f64)?,
        CqlValue::Decimal(d) => Value::String(d.to_string()),
        CqlValue::Timestamp(ts) => Value::from(ts.timestamp()),
        CqlValue::Date(date) => {
            let days = date.signed_duration_since(epoch()).num_days();
            Value::from(days * SECONDS_PER_DAY)
        }
        CqlValue::Time(time) => Value::String(time.format("%H:%M:%S%.9f").to_string()),
        CqlValue::Uuid(u) | CqlValue::Timeuuid(u) => Value::String(u.hyphenated().to_string()),
        CqlValue::Inet(ip) => Value::String(ip.to_string()),
        CqlValue::Blob(data) => Value::Array(data.iter().map(|b| Value::from(*b)).collect()),
        CqlValue::List(items) | CqlValue::Set(items) | CqlValue::Tuple(items) => {
            Value::Array(items.iter().map(to_host).collect::<CqlResult<Vec<_>>>()?)
        }
        CqlValue::Udt(fields) => {
            let mut object = Map::new();
            for (name, field) in fields {
                object.insert(name.clone(), to_host(field)?);
            }
            Value::Object(object)
        }
        CqlValue::Map(entries) => {
            let mut object = Map::new();
            for (key, entry) in entries {
                object.insert(map_key(key)?, to_host(entry)?);
            }
            Value::Object(object)
        }
        CqlValue::Duration { .. } => return Err(ErrorType::TypeNotDefined("duration".to_string())),
        CqlValue::Custom { class, .. } => return Err(ErrorType::TypeNotDefined(class.clone())),
    };
    Ok(host)
}

/// Arma el valor nativo de una columna a partir de un valor del host.
pub fn from_host(value: &Value, column_type: &ColumnType) -> CqlResult<CqlValue> {
    if value.is_null() {
        return Ok(CqlValue::Null);
    }
    let native = match column_type {
        ColumnType::Ascii => CqlValue::Ascii(host_string(value)?),
        ColumnType::Varchar => CqlValue::Text(host_string(value)?),
        ColumnType::Bigint => CqlValue::Bigint(host_i64(value)?),
        ColumnType::Counter => CqlValue::Counter(host_i64(value)?),
        ColumnType::Int => CqlValue::Int(narrow(host_i64(value)?, column_type)?),
        ColumnType::Smallint => CqlValue::Smallint(narrow(host_i64(value)?, column_type)?),
        ColumnType::Tinyint => CqlValue::Tinyint(narrow(host_i64(value)?, column_type)?),
        ColumnType::Varint => CqlValue::Varint(host_i128(value)?),
        ColumnType::Boolean => match value {
            Value::Bool(b) => CqlValue::Boolean(*b),
            other => return Err(mismatch(other, column_type)),
        },
        ColumnType::Double => CqlValue::Double(host_f64(value)?),
        ColumnType::Float => CqlValue::Float(host_f64(value)? as f32),
        ColumnType::Decimal => {
            let text = match value {
                Value::String(s) => s.clone(),
                Value::Number(n) => n.to_string(),
                other => return Err(mismatch(other, column_type)),
            };
            CqlValue::Decimal(
                Decimal::from_str(&text).map_err(|e| ErrorType::Conversion(e.to_string()))?,
            )
        }
        ColumnType::Timestamp => CqlValue::Timestamp(host_timestamp(value)?),
        ColumnType::Date => CqlValue::Date(host_date(value)?),
        ColumnType::Time => {
            let text = host_string(value)?;
            let time = NaiveTime::parse_from_str(&text, "%H:%M:%S%.f")
                .map_err(|e| ErrorType::Conversion(e.to_string()))?;
            CqlValue::Time(time)
        }
        ColumnType::Uuid => CqlValue::Uuid(host_uuid(value)?),
        ColumnType::Timeuuid => CqlValue::Timeuuid(host_uuid(value)?),
        ColumnType::Inet => {
            let text = host_string(value)?;
            let ip = IpAddr::from_str(&text).map_err(|e| ErrorType::Conversion(e.to_string()))?;
            CqlValue::Inet(ip)
        }
        ColumnType::Blob => match value {
            Value::String(s) => CqlValue::Blob(s.as_bytes().to_vec()),
            Value::Array(items) => {
                let mut data = Vec::with_capacity(items.len());
                for item in items {
                    data.push(narrow(host_i64(item)?, column_type)?);
                }
                CqlValue::Blob(data)
            }
            other => return Err(mismatch(other, column_type)),
        },
        ColumnType::List(inner) => CqlValue::List(host_items(value, inner, column_type)?),
        ColumnType::Set(inner) => CqlValue::Set(host_items(value, inner, column_type)?),
        ColumnType::Map(key_type, value_type) => match value {
            Value::Object(object) => {
                let mut entries = Vec::with_capacity(object.len());
                for (key, entry) in object {
                    entries.push((
                        from_host(&Value::String(key.clone()), key_type)?,
                        from_host(entry, value_type)?,
                    ));
                }
                CqlValue::Map(entries)
            }
            other => return Err(mismatch(other, column_type)),
        },
        ColumnType::Tuple(types) => match value {
            Value::Array(items) if items.len() <= types.len() => {
                let mut values = Vec::with_capacity(types.len());
                for (index, item_type) in types.iter().enumerate() {
                    let item = items.get(index).unwrap_or(&Value::Null);
                    values.push(from_host(item, item_type)?);
                }
                CqlValue::Tuple(values)
            }
            other => return Err(mismatch(other, column_type)),
        },
        ColumnType::Udt { fields, .. } => match value {
            Value::Object(object) => {
                let mut values = Vec::with_capacity(fields.len());
                for (name, field_type) in fields {
                    let field = object.get(name).unwrap_or(&Value::Null);
                    values.push((name.clone(), from_host(field, field_type)?));
                }
                CqlValue::Udt(values)
            }
            other => return Err(mismatch(other, column_type)),
        },
        ColumnType::Duration | ColumnType::Custom(_) => {
            return Err(ErrorType::TypeNotDefined(column_type.to_string()))
        }
    };
    Ok(native)
}

fn epoch() -> NaiveDate {
    NaiveDate::from_ymd_opt(1970, 1, 1).unwrap_or(NaiveDate::MIN)
}

fn mismatch(value: &Value, column_type: &ColumnType) -> ErrorType {
    ErrorType::Conversion(format!("cannot convert {} into {}", value, column_type))
}

fn float_to_host(v: f64) -> CqlResult<Value> {
    Number::from_f64(v)
        .map(Value::Number)
        .ok_or_else(|| ErrorType::Conversion(format!("{} has no host representation", v)))
}

fn map_key(key: &CqlValue) -> CqlResult<String> {
    match to_host(key)? {
        Value::String(s) => Ok(s),
        other => Ok(other.to_string()),
    }
}

fn host_string(value: &Value) -> CqlResult<String> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        other => Err(ErrorType::Conversion(format!("{} is not a string", other))),
    }
}

fn host_i64(value: &Value) -> CqlResult<i64> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .ok_or_else(|| ErrorType::Conversion(format!("{} is not an integer", n))),
        Value::String(s) => s
            .trim()
            .parse::<i64>()
            .map_err(|e| ErrorType::Conversion(e.to_string())),
        other => Err(ErrorType::Conversion(format!("{} is not an integer", other))),
    }
}

fn host_i128(value: &Value) -> CqlResult<i128> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .map(i128::from)
            .ok_or_else(|| ErrorType::Conversion(format!("{} is not an integer", n))),
        Value::String(s) => s
            .trim()
            .parse::<i128>()
            .map_err(|e| ErrorType::Conversion(e.to_string())),
        other => Err(ErrorType::Conversion(format!("{} is not an integer", other))),
    }
}

fn host_f64(value: &Value) -> CqlResult<f64> {
    match value {
        Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| ErrorType::Conversion(format!("{} is not a number", n))),
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|e| ErrorType::Conversion(e.to_string())),
        other => Err(ErrorType::Conversion(format!("{} is not a number", other))),
    }
}

fn narrow<T: TryFrom<i64>>(value: i64, column_type: &ColumnType) -> CqlResult<T> {
    T::try_from(value)
        .map_err(|_| ErrorType::Conversion(format!("{} out of range for {}", value, column_type)))
}

fn host_uuid(value: &Value) -> CqlResult<Uuid> {
    let text = host_string(value)?;
    Uuid::parse_str(&text).map_err(|e| ErrorType::Conversion(e.to_string()))
}

// Los timestamps del host son segundos desde epoch o texto RFC 3339
fn host_timestamp(value: &Value) -> CqlResult<DateTime<Utc>> {
    match value {
        Value::String(s) if s.parse::<i64>().is_err() => DateTime::parse_from_rfc3339(s)
            .map(|ts| ts.with_timezone(&Utc))
            .map_err(|e| ErrorType::Conversion(e.to_string())),
        other => {
            let seconds = host_i64(other)?;
            Utc.timestamp_opt(seconds, 0)
                .single()
                .ok_or_else(|| ErrorType::Conversion(format!("timestamp out of range: {}", seconds)))
        }
    }
}

fn host_date(value: &Value) -> CqlResult<NaiveDate> {
    match value {
        Value::String(s) if s.parse::<i64>().is_err() => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map_err(|e| ErrorType::Conversion(e.to_string())),
        other => {
            let seconds = host_i64(other)?;
            epoch()
                .checked_add_signed(chrono::Duration::days(seconds.div_euclid(SECONDS_PER_DAY)))
                .ok_or_else(|| ErrorType::Conversion(format!("date out of range: {}", seconds)))
        }
    }
}

fn host_items(value: &Value, inner: &ColumnType, column_type: &ColumnType) -> CqlResult<Vec<CqlValue>> {
    match value {
        Value::Array(items) => items.iter().map(|item| from_host(item, inner)).collect(),
        other => Err(mismatch(other, column_type)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    // host -> nativo -> bytes -> nativo -> host
    fn round_trip(value: Value, column_type: ColumnType) -> Value {
        let native = from_host(&value, &column_type).unwrap();
        let bytes = native.serialize().unwrap();
        let decoded = CqlValue::deserialize(&column_type, bytes.as_deref()).unwrap();
        to_host(&decoded).unwrap()
    }

    #[test]
    fn decimal_round_trip() {
        let original = json!("1234.5600");
        assert_eq!(round_trip(original.clone(), ColumnType::Decimal), original);
    }

    #[test]
    fn uuid_round_trip() {
        let original = json!("0b8e1a6c-4c7b-4c7e-9f6a-2f1c7d3e9a10");
        assert_eq!(round_trip(original.clone(), ColumnType::Uuid), original);
        assert_eq!(round_trip(original.clone(), ColumnType::Timeuuid), original);
    }

    #[test]
    fn inet_and_date_round_trip() {
        let ip = json!("2001:db8::1");
        assert_eq!(round_trip(ip.clone(), ColumnType::Inet), ip);

        let date = json!(1_700_006_400);
        assert_eq!(round_trip(date.clone(), ColumnType::Date), date);
    }

    #[test]
    fn timestamp_is_seconds() {
        let original = json!(1_700_000_123);
        assert_eq!(round_trip(original.clone(), ColumnType::Timestamp), original);

        let parsed = from_host(&json!("2023-11-14T22:15:23Z"), &ColumnType::Timestamp).unwrap();
        assert_eq!(to_host(&parsed).unwrap(), original);
    }

    #[test]
    fn collections_round_trip() {
        let list = json!([1, 2, 3]);
        assert_eq!(
            round_trip(list.clone(), ColumnType::List(Box::new(ColumnType::Int))),
            list
        );

        let map = json!({"a": "1.5", "b": "2"});
        let map_type = ColumnType::Map(Box::new(ColumnType::Varchar), Box::new(ColumnType::Decimal));
        assert_eq!(round_trip(map.clone(), map_type), map);

        let udt = json!({"street": "Paseo Colon", "number": 850});
        let udt_type = ColumnType::Udt {
            keyspace: "shop".to_string(),
            name: "address".to_string(),
            fields: vec![
                ("street".to_string(), ColumnType::Varchar),
                ("number".to_string(), ColumnType::Int),
            ],
        };
        assert_eq!(round_trip(udt.clone(), udt_type), udt);
    }

    #[test]
    fn int_keyed_map_stringifies_keys() {
        let value = CqlValue::Map(vec![(CqlValue::Int(7), CqlValue::Boolean(true))]);
        assert_eq!(to_host(&value).unwrap(), json!({"7": true}));
    }

    #[test]
    fn time_keeps_nanoseconds() {
        let original = json!("13:45:07.000000123");
        assert_eq!(round_trip(original.clone(), ColumnType::Time), original);
    }

    #[test]
    fn duration_has_no_host_type() {
        let value = CqlValue::Duration {
            months: 0,
            days: 1,
            nanoseconds: 0,
        };
        assert!(matches!(to_host(&value), Err(ErrorType::TypeNotDefined(_))));

        let custom = CqlValue::Custom {
            class: "org.apache.cassandra.db.marshal.DynamicCompositeType".to_string(),
            data: vec![],
        };
        assert!(matches!(to_host(&custom), Err(ErrorType::TypeNotDefined(_))));
    }

    #[test]
    fn int_overflow_is_rejected() {
        assert!(matches!(
            from_host(&json!(5_000_000_000i64), &ColumnType::Int),
            Err(ErrorType::Conversion(_))
        ));
    }
}
