use crate::error::CqlResult;
use crate::message_functions::{
    body_auth_response::BodyAuthResponse, body_auth_token_maybe_empty::BodyAuthTokenMaybeEmpty,
    body_authenticate::BodyAuthenticate, body_batch::BodyBatch, body_error::BodyError,
    body_query::BodyQuery, body_rows::BodyRows, body_set_keyspace::BodySetKeyspace,
    body_startup::BodyStartup, body_void::BodyVoid, schema_change::SchemaChange,
};

// Definición del enum Body para manejar los pedidos y las respuestas.
#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    Startup(BodyStartup),           // Mensaje STARTUP
    Options,                        // Mensaje OPTIONS (sin cuerpo)
    Query(BodyQuery),               // Consulta CQL
    Batch(BodyBatch),               // Varias sentencias en un solo frame
    AuthResponse(BodyAuthResponse), // Respuesta de autenticación
    Ready,                          // READY (sin cuerpo)
    Error(BodyError),
    Authenticate(BodyAuthenticate),
    AuthChallenge(BodyAuthTokenMaybeEmpty),
    AuthSuccess(BodyAuthTokenMaybeEmpty),
    Supported(Vec<u8>),
    Void(BodyVoid),
    Rows(BodyRows),
    SetKeyspace(BodySetKeyspace),
    SchemaChange(SchemaChange),
}

impl Body {
    pub fn serialize(&self) -> CqlResult<Vec<u8>> {
        let bytes = match self {
            Body::Startup(startup_body) => startup_body.serialize()?,
            Body::Options | Body::Ready => vec![], // No tienen cuerpo
            Body::Query(query_body) => query_body.serialize()?,
            Body::Batch(batch_body) => batch_body.serialize()?,
            Body::AuthResponse(auth_response) => auth_response.serialize()?,
            Body::Error(error_body) => error_body.serialize()?,
            Body::Authenticate(auth_body) => auth_body.serialize()?,
            Body::AuthChallenge(auth_body) | Body::AuthSuccess(auth_body) => {
                auth_body.serialize()?
            }
            Body::Supported(bytes) => bytes.clone(),
            Body::Void(void_body) => void_body.serialize(),
            Body::Rows(rows_body) => rows_body.serialize()?,
            Body::SetKeyspace(set_keyspace_body) => set_keyspace_body.serialize()?,
            Body::SchemaChange(schema_change) => schema_change.serialize()?,
        };
        Ok(bytes)
    }
}
