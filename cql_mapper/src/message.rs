// message.rs
use crate::error::{CqlResult, ErrorType};
use crate::message_functions::{
    body::Body, body_auth_response::BodyAuthResponse,
    body_auth_token_maybe_empty::BodyAuthTokenMaybeEmpty, body_authenticate::BodyAuthenticate,
    body_batch::BodyBatch, body_error::BodyError, body_query::BodyQuery, body_rows::BodyRows,
    body_set_keyspace::BodySetKeyspace, body_startup::BodyStartup, body_void::BodyVoid,
    schema_change::SchemaChange,
};
use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use std::io::Read;

pub const VERSION_REQUEST: u8 = 0x04; //04 -> 00000100, el primer 0 nos define una solicitud
pub const VERSION_RESPONSE: u8 = 0x84; //84 -> 10000100, el primer 1 nos define una respuesta

pub const OPCODE_ERROR: u8 = 0x00;
pub const OPCODE_STARTUP: u8 = 0x01;
pub const OPCODE_READY: u8 = 0x02;
pub const OPCODE_AUTHENTICATE: u8 = 0x03;
pub const OPCODE_OPTIONS: u8 = 0x05;
pub const OPCODE_SUPPORTED: u8 = 0x06;
pub const OPCODE_QUERY: u8 = 0x07;
pub const OPCODE_RESULT: u8 = 0x08;
pub const OPCODE_BATCH: u8 = 0x0D;
pub const OPCODE_AUTH_CHALLENGE: u8 = 0x0E;
pub const OPCODE_AUTH_RESPONSE: u8 = 0x0F;
pub const OPCODE_AUTH_SUCCESS: u8 = 0x10;

pub const RESULT_VOID: u32 = 0x0001;
pub const RESULT_ROWS: u32 = 0x0002;
pub const RESULT_SET_KEYSPACE: u32 = 0x0003;
pub const RESULT_PREPARED: u32 = 0x0004;
pub const RESULT_SCHEMA_CHANGE: u32 = 0x0005;

const HEADER_LEN: usize = 9;
// Límite del protocolo para el cuerpo de un frame (256 MB)
const MAX_BODY_LEN: u32 = 256 * 1024 * 1024;

#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub version: u8, // Versión del protocolo
    pub flags: u8,   // Flags del frame (sin compresión ni tracing)
    pub stream: i16, // ID del stream
    pub opcode: u8,  // Código de operación (ej: QUERY)
    pub body: Body,  // Cuerpo del mensaje como enum Body
}

impl Message {
    pub fn new(version: u8, opcode: u8, body: Body) -> Self {
        Self {
            version,
            flags: 0x00,
            stream: 0x0001,
            opcode,
            body,
        }
    }

    pub fn request(opcode: u8, body: Body) -> Self {
        Self::new(VERSION_REQUEST, opcode, body)
    }

    pub fn response(opcode: u8, body: Body) -> Self {
        Self::new(VERSION_RESPONSE, opcode, body)
    }

    pub fn is_response(&self) -> bool {
        self.version & 0x80 != 0
    }

    pub fn serialize(&self) -> CqlResult<Vec<u8>> {
        let body_bytes = self.body.serialize()?;

        let mut message = Vec::with_capacity(HEADER_LEN + body_bytes.len());
        message.push(self.version);
        message.push(self.flags);
        message.write_i16::<BigEndian>(self.stream)?;
        message.push(self.opcode);
        message.write_u32::<BigEndian>(body_bytes.len() as u32)?;
        message.extend(body_bytes);
        Ok(message)
    }

    fn deserialize_result_kind(body_bytes: &[u8]) -> CqlResult<Body> {
        let kind = body_bytes
            .get(..4)
            .ok_or_else(|| ErrorType::Protocol("RESULT without kind".to_string()))?
            .read_u32::<BigEndian>()?;
        match kind {
            RESULT_VOID => Ok(Body::Void(BodyVoid)),
            RESULT_ROWS => Ok(Body::Rows(BodyRows::deserialize(body_bytes)?)),
            RESULT_SET_KEYSPACE => Ok(Body::SetKeyspace(BodySetKeyspace::deserialize(
                body_bytes,
            )?)),
            RESULT_SCHEMA_CHANGE => Ok(Body::SchemaChange(SchemaChange::deserialize(
                body_bytes,
            )?)),
            RESULT_PREPARED => Err(ErrorType::Protocol(
                "Prepared results are not supported".to_string(),
            )),
            _ => Err(ErrorType::Protocol(format!("Unknown result kind: {}", kind))),
        }
    }

    fn deserialize_opcode(opcode: u8, body_bytes: &[u8]) -> CqlResult<Body> {
        let body = match opcode {
            OPCODE_ERROR => Body::Error(BodyError::deserialize(body_bytes)?),
            OPCODE_STARTUP => Body::Startup(BodyStartup::deserialize(body_bytes)?),
            OPCODE_READY => Body::Ready,
            OPCODE_AUTHENTICATE => Body::Authenticate(BodyAuthenticate::deserialize(body_bytes)?),
            OPCODE_OPTIONS => Body::Options,
            OPCODE_SUPPORTED => Body::Supported(body_bytes.to_vec()),
            OPCODE_QUERY => Body::Query(BodyQuery::deserialize(body_bytes)?),
            OPCODE_RESULT => Self::deserialize_result_kind(body_bytes)?,
            OPCODE_BATCH => Body::Batch(BodyBatch::deserialize(body_bytes)?),
            OPCODE_AUTH_CHALLENGE => {
                Body::AuthChallenge(BodyAuthTokenMaybeEmpty::deserialize(body_bytes)?)
            }
            OPCODE_AUTH_RESPONSE => Body::AuthResponse(BodyAuthResponse::deserialize(body_bytes)?),
            OPCODE_AUTH_SUCCESS => {
                Body::AuthSuccess(BodyAuthTokenMaybeEmpty::deserialize(body_bytes)?)
            }
            _ => {
                return Err(ErrorType::Protocol(format!(
                    "Opcode desconocido: {:#04x}",
                    opcode
                )))
            }
        };
        Ok(body)
    }

    // Lee un frame completo: header de 9 bytes y luego el cuerpo.
    pub fn deserialize(reader: &mut dyn Read) -> CqlResult<Self> {
        let mut header = [0; HEADER_LEN];
        reader.read_exact(&mut header)?;

        let version = header[0];
        if version & 0x7F != VERSION_REQUEST {
            return Err(ErrorType::Protocol(format!(
                "Unsupported protocol version: {:#04x}",
                version
            )));
        }
        let flags = header[1];
        let stream = (&header[2..4]).read_i16::<BigEndian>()?;
        let opcode = header[4];
        let length = (&header[5..9]).read_u32::<BigEndian>()?;
        if length > MAX_BODY_LEN {
            return Err(ErrorType::Protocol(format!(
                "Frame body too large: {} bytes",
                length
            )));
        }

        let mut body_bytes = vec![0; length as usize];
        reader.read_exact(&mut body_bytes)?;

        let body = Self::deserialize_opcode(opcode, &body_bytes)?;
        Ok(Self {
            version,
            flags,
            stream,
            opcode,
            body,
        })
    }

    /// Convierte un frame ERROR en el error del crate; el resto pasa sin cambios.
    pub fn into_result(self) -> CqlResult<Self> {
        match self.body {
            Body::Error(error) => Err(ErrorType::Server {
                code: error.code,
                message: error.message,
            }),
            _ => Ok(self),
        }
    }
}

/// Crea el mensaje de inicio con la versión de CQL usada.
pub fn create_startup_message() -> Message {
    Message::request(OPCODE_STARTUP, Body::Startup(BodyStartup::new()))
}

/// Crea una respuesta de autenticación con el token SASL.
pub fn create_auth_response_message(token: Vec<u8>) -> Message {
    Message::request(
        OPCODE_AUTH_RESPONSE,
        Body::AuthResponse(BodyAuthResponse { token }),
    )
}

pub fn create_query_message(query: BodyQuery) -> Message {
    Message::request(OPCODE_QUERY, Body::Query(query))
}

pub fn create_batch_message(batch: BodyBatch) -> Message {
    Message::request(OPCODE_BATCH, Body::Batch(batch))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message_functions::column_spec::ColumnSpec;
    use crate::message_functions::consistency::Consistency;
    use crate::message_functions::metadata::Metadata;
    use crate::message_functions::query_parameters::QueryParameters;
    use crate::message_functions::row_content::RowContent;
    use crate::value_functions::column_type::ColumnType;

    #[test]
    fn query_frame_has_v4_header() {
        let message = create_query_message(BodyQuery {
            query_string: "select * from \"users\"".to_string(),
            parameters: QueryParameters::new(Consistency::LocalOne),
        });
        let bytes = message.serialize().unwrap();
        assert_eq!(bytes[0], VERSION_REQUEST);
        assert_eq!(bytes[4], OPCODE_QUERY);
        let length = (&bytes[5..9]).read_u32::<BigEndian>().unwrap() as usize;
        assert_eq!(length, bytes.len() - HEADER_LEN);

        let parsed = Message::deserialize(&mut &bytes[..]).unwrap();
        assert_eq!(parsed, message);
    }

    #[test]
    fn rows_result_with_paging_state() {
        let rows = BodyRows {
            metadata: Metadata::new(
                Some(("shop".to_string(), "users".to_string())),
                vec![ColumnSpec::new("name", ColumnType::Varchar)],
                Some(vec![1, 2, 3]),
            ),
            rows_count: 1,
            rows_content: vec![RowContent {
                values: vec![Some(b"ana".to_vec())],
            }],
        };
        let message = Message::response(OPCODE_RESULT, Body::Rows(rows));
        let bytes = message.serialize().unwrap();
        let parsed = Message::deserialize(&mut &bytes[..]).unwrap();
        assert!(parsed.is_response());
        match parsed.body {
            Body::Rows(rows) => assert_eq!(rows.metadata.paging_state, Some(vec![1, 2, 3])),
            other => panic!("unexpected body {:?}", other),
        }
    }

    #[test]
    fn error_frame_becomes_server_error() {
        let message = Message::response(
            OPCODE_ERROR,
            Body::Error(BodyError {
                code: 0x2400,
                message: "Cannot add existing keyspace \"shop\"".to_string(),
            }),
        );
        let bytes = message.serialize().unwrap();
        let parsed = Message::deserialize(&mut &bytes[..]).unwrap();
        let err = parsed.into_result().unwrap_err();
        assert!(err.is_already_exists());
    }

    #[test]
    fn wrong_protocol_version_is_rejected() {
        let bytes = [0x83, 0, 0, 1, OPCODE_READY, 0, 0, 0, 0];
        assert!(matches!(
            Message::deserialize(&mut &bytes[..]),
            Err(ErrorType::Protocol(_))
        ));
    }
}
