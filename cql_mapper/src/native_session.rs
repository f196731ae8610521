// native_session.rs
use crate::config::{ConnectionConfig, SslConfig};
use crate::error::{CqlResult, ErrorType};
use crate::message::{self, Message};
use crate::message_functions::{
    body::Body,
    body_batch::{BatchStatement, BatchType, BodyBatch},
    body_query::BodyQuery,
    consistency::Consistency,
    query_parameters::QueryParameters,
    query_value::QueryValue,
};
use crate::query_functions::{query_options::QueryOptions, statement::Statement};
use crate::session::{Page, Session};
use log::{debug, error, info, warn};
use rustls::client::{ServerCertVerified, ServerCertVerifier};
use rustls::{
    Certificate, ClientConfig, ClientConnection, PrivateKey, RootCertStore, ServerName,
    StreamOwned,
};
use sasl::client::mechanisms::Plain;
use sasl::client::Mechanism;
use std::fs::File;
use std::io::{self, BufReader, Read, Write};
use std::net::{SocketAddr, TcpStream, ToSocketAddrs};
use std::sync::Arc;
use std::time::{Duration, SystemTime};

/// Socket con o sin TLS.
pub enum NativeStream {
    Plain(TcpStream),
    Tls(Box<StreamOwned<ClientConnection, TcpStream>>),
}

impl NativeStream {
    fn tcp(&self) -> &TcpStream {
        match self {
            NativeStream::Plain(socket) => socket,
            NativeStream::Tls(stream) => &stream.sock,
        }
    }
}

impl Read for NativeStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            NativeStream::Plain(socket) => socket.read(buf),
            NativeStream::Tls(stream) => stream.read(buf),
        }
    }
}

impl Write for NativeStream {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            NativeStream::Plain(socket) => socket.write(buf),
            NativeStream::Tls(stream) => stream.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            NativeStream::Plain(socket) => socket.flush(),
            NativeStream::Tls(stream) => stream.flush(),
        }
    }
}

// Acepta cualquier certificado del servidor (verify_peer = false).
struct NoVerification;

impl ServerCertVerifier for NoVerification {
    fn verify_server_cert(
        &self,
        _end_entity: &Certificate,
        _intermediates: &[Certificate],
        _server_name: &ServerName,
        _scts: &mut dyn Iterator<Item = &[u8]>,
        _ocsp_response: &[u8],
        _now: SystemTime,
    ) -> Result<ServerCertVerified, rustls::Error> {
        Ok(ServerCertVerified::assertion())
    }
}

fn open_pem(path: &std::path::Path) -> CqlResult<BufReader<File>> {
    let file = File::open(path)
        .map_err(|e| ErrorType::Tls(format!("No se pudo abrir {}: {}", path.display(), e)))?;
    Ok(BufReader::new(file))
}

// Certificados raíz: el archivo configurado o los del sistema.
fn load_root_certificates(ssl: &SslConfig) -> CqlResult<RootCertStore> {
    let mut root_cert_store = RootCertStore::empty();
    match &ssl.trusted_cert {
        Some(path) => {
            let certs = rustls_pemfile::certs(&mut open_pem(path)?)?;
            for cert in certs {
                root_cert_store
                    .add(&Certificate(cert))
                    .map_err(|e| ErrorType::Tls(format!("Certificado no válido: {}", e)))?;
            }
        }
        None => {
            for cert in rustls_native_certs::load_native_certs()? {
                if root_cert_store.add(&Certificate(cert.0)).is_err() {
                    warn!("Se ignora un certificado del sistema no válido");
                }
            }
        }
    }
    Ok(root_cert_store)
}

fn load_client_identity(ssl: &SslConfig) -> CqlResult<Option<(Vec<Certificate>, PrivateKey)>> {
    let (cert_path, key_path) = match (&ssl.client_cert, &ssl.private_key) {
        (Some(cert), Some(key)) => (cert, key),
        _ => return Ok(None),
    };
    let certs: Vec<Certificate> = rustls_pemfile::certs(&mut open_pem(cert_path)?)?
        .into_iter()
        .map(Certificate)
        .collect();

    let mut keys = rustls_pemfile::pkcs8_private_keys(&mut open_pem(key_path)?)?;
    if keys.is_empty() {
        keys = rustls_pemfile::rsa_private_keys(&mut open_pem(key_path)?)?;
    }
    let key = keys.into_iter().next().ok_or_else(|| {
        ErrorType::Tls(format!("No hay clave privada en {}", key_path.display()))
    })?;
    Ok(Some((certs, PrivateKey(key))))
}

/// Arma la configuración TLS del cliente a partir de la sección `ssl`.
pub fn tls_client_config(ssl: &SslConfig) -> CqlResult<Arc<ClientConfig>> {
    let builder = ClientConfig::builder()
        .with_safe_defaults()
        .with_root_certificates(load_root_certificates(ssl)?);
    let mut config = match load_client_identity(ssl)? {
        Some((certs, key)) => builder.with_single_cert(certs, key)?,
        None => builder.with_no_client_auth(),
    };
    if !ssl.verify_peer {
        warn!("Verificación del certificado del servidor deshabilitada");
        config
            .dangerous()
            .set_certificate_verifier(Arc::new(NoVerification));
    }
    Ok(Arc::new(config))
}

// Host sin el puerto, para el SNI.
fn server_host(address: &str) -> &str {
    let host = match address.rfind(':') {
        Some(pos) if !address.ends_with(']') => &address[..pos],
        _ => address,
    };
    host.trim_start_matches('[').trim_end_matches(']')
}

fn connect_tcp(address: &str, timeout: Option<Duration>) -> CqlResult<TcpStream> {
    let addrs: Vec<SocketAddr> = address.to_socket_addrs()?.collect();
    let mut last_error = io::Error::new(
        io::ErrorKind::NotFound,
        format!("No se resolvió ninguna dirección para {}", address),
    );
    for addr in addrs {
        let attempt = match timeout {
            Some(timeout) => TcpStream::connect_timeout(&addr, timeout),
            None => TcpStream::connect(addr),
        };
        match attempt {
            Ok(socket) => return Ok(socket),
            Err(e) => last_error = e,
        }
    }
    Err(last_error.into())
}

/// Sesión sobre el protocolo nativo v4. Un solo pedido en vuelo, stream 1.
pub struct NativeSession {
    stream: NativeStream,
    keyspace: Option<String>,
    consistency: Consistency,
    request_timeout: Option<Duration>,
}

impl NativeSession {
    /// Prueba los puntos de contacto en orden y se queda con el primero que responde.
    pub fn connect(config: &ConnectionConfig) -> CqlResult<Self> {
        config.validate()?;
        let tls = if config.use_tls() {
            Some(tls_client_config(&config.ssl)?)
        } else {
            None
        };

        let mut last_error = None;
        for address in config.contact_addresses() {
            match Self::connect_to(&address, config, tls.clone()) {
                Ok(session) => return Ok(session),
                Err(e) => {
                    warn!("No se pudo conectar a {}: {}", address, e);
                    last_error = Some(e);
                }
            }
        }
        let e = last_error.unwrap_or_else(|| {
            ErrorType::InvalidConfig("at least one contact point is required in `host`".to_string())
        });
        error!("Ningún punto de contacto disponible: {}", e);
        Err(e)
    }

    fn connect_to(
        address: &str,
        config: &ConnectionConfig,
        tls: Option<Arc<ClientConfig>>,
    ) -> CqlResult<Self> {
        let socket = connect_tcp(address, config.connect_timeout())?;
        let request_timeout = config.request_timeout();
        socket.set_read_timeout(request_timeout)?;
        socket.set_write_timeout(request_timeout)?;
        socket.set_nodelay(true)?;

        let stream = match tls {
            Some(tls) => {
                let server_name = ServerName::try_from(server_host(address)).map_err(|_| {
                    ErrorType::Tls(format!("Nombre del servidor no válido: {}", address))
                })?;
                let client = ClientConnection::new(tls, server_name)?;
                NativeStream::Tls(Box::new(StreamOwned::new(client, socket)))
            }
            None => NativeStream::Plain(socket),
        };

        let mut session = NativeSession::from_stream(stream, config.consistency);
        session.request_timeout = request_timeout;
        session.handshake(config.username.as_deref(), config.password.as_deref())?;
        info!("Conectado a {}", address);

        if !config.keyspace.is_empty() {
            session.use_keyspace(&config.keyspace)?;
        }
        Ok(session)
    }

    /// Sesión sobre un stream ya abierto. No hace el handshake.
    pub fn from_stream(stream: NativeStream, consistency: Consistency) -> Self {
        NativeSession {
            stream,
            keyspace: None,
            consistency,
            request_timeout: None,
        }
    }

    // Escribe un frame y espera la respuesta. Un ERROR se convierte en error.
    fn round_trip(&mut self, request: &Message) -> CqlResult<Message> {
        self.stream.write_all(&request.serialize()?)?;
        self.stream.flush()?;
        let response = Message::deserialize(&mut self.stream)?;
        if !response.is_response() {
            return Err(ErrorType::Protocol(
                "Se recibió una solicitud en lugar de una respuesta".to_string(),
            ));
        }
        response.into_result()
    }

    /// STARTUP y, si el servidor lo pide, autenticación SASL PLAIN.
    pub fn handshake(&mut self, username: Option<&str>, password: Option<&str>) -> CqlResult<()> {
        debug!("Mensaje STARTUP enviado");
        let response = self.round_trip(&message::create_startup_message())?;
        match response.opcode {
            message::OPCODE_READY => Ok(()),
            message::OPCODE_AUTHENTICATE => {
                if let Body::Authenticate(body) = &response.body {
                    debug!("El servidor pide autenticación: {}", body.authenticator);
                }
                self.authenticate(username.unwrap_or_default(), password.unwrap_or_default())
            }
            other => Err(ErrorType::Protocol(format!(
                "Respuesta inesperada al STARTUP: {:#04x}",
                other
            ))),
        }
    }

    fn authenticate(&mut self, username: &str, password: &str) -> CqlResult<()> {
        let mut mechanism = Plain::new(username, password);
        let token = mechanism.initial();
        let response = self
            .round_trip(&message::create_auth_response_message(token))
            .map_err(|e| match e {
                ErrorType::Server { message, .. } => ErrorType::Authentication(message),
                other => other,
            })?;
        match response.opcode {
            message::OPCODE_AUTH_SUCCESS => {
                debug!("Autenticación exitosa");
                Ok(())
            }
            message::OPCODE_AUTH_CHALLENGE => Err(ErrorType::Authentication(
                "PLAIN no admite challenges adicionales".to_string(),
            )),
            other => Err(ErrorType::Protocol(format!(
                "Respuesta inesperada al AUTH_RESPONSE: {:#04x}",
                other
            ))),
        }
    }

    pub fn use_keyspace(&mut self, keyspace: &str) -> CqlResult<()> {
        let statement = Statement::raw(format!("USE \"{}\"", keyspace.replace('"', "\"\"")));
        self.execute(&statement, &QueryOptions::default())?;
        self.keyspace = Some(keyspace.to_string());
        Ok(())
    }

    fn parameters(&self, statement: &Statement, options: &QueryOptions) -> CqlResult<QueryParameters> {
        let mut parameters = QueryParameters::new(options.consistency.unwrap_or(self.consistency));
        parameters.values = statement
            .values
            .iter()
            .map(QueryValue::from_cql)
            .collect::<CqlResult<_>>()?;
        parameters.result_page_size = options.page_size.filter(|size| *size > 0);
        parameters.paging_state = options.paging_state.clone();
        Ok(parameters)
    }

    // Aplica el timeout del pedido y lo restaura después.
    fn with_timeout<T>(
        &mut self,
        timeout: Option<Duration>,
        request: impl FnOnce(&mut Self) -> CqlResult<T>,
    ) -> CqlResult<T> {
        if timeout.is_none() {
            return request(self);
        }
        self.stream.tcp().set_read_timeout(timeout)?;
        let result = request(self);
        self.stream.tcp().set_read_timeout(self.request_timeout)?;
        result
    }
}

impl Session for NativeSession {
    fn execute(&mut self, statement: &Statement, options: &QueryOptions) -> CqlResult<Page> {
        let parameters = self.parameters(statement, options)?;
        let request = message::create_query_message(BodyQuery {
            query_string: statement.query.clone(),
            parameters,
        });
        debug!("QUERY: {}", statement.query);

        let response = self.with_timeout(options.timeout, |session| session.round_trip(&request))?;
        match response.body {
            Body::Rows(rows) => {
                let decoded = rows.decode()?;
                Ok(Page::new(
                    rows.metadata.column_specs,
                    decoded,
                    rows.metadata.paging_state,
                ))
            }
            Body::SetKeyspace(body) => {
                self.keyspace = Some(body.keyspace);
                Ok(Page::void())
            }
            Body::SchemaChange(change) => {
                info!(
                    "Cambio de esquema: {:?} {:?} {}.{}",
                    change.change_type,
                    change.target,
                    change.keyspace,
                    change.name.as_deref().unwrap_or("")
                );
                Ok(Page::void())
            }
            Body::Void(_) => Ok(Page::void()),
            other => Err(ErrorType::Protocol(format!(
                "Resultado inesperado: {:?}",
                other
            ))),
        }
    }

    fn batch(&mut self, statements: &[Statement], options: &QueryOptions) -> CqlResult<()> {
        let statements = statements
            .iter()
            .map(|statement| {
                Ok(BatchStatement {
                    query_string: statement.query.clone(),
                    values: statement
                        .values
                        .iter()
                        .map(QueryValue::from_cql)
                        .collect::<CqlResult<_>>()?,
                })
            })
            .collect::<CqlResult<Vec<_>>>()?;
        debug!("BATCH de {} sentencias", statements.len());

        let request = message::create_batch_message(BodyBatch {
            batch_type: BatchType::Logged,
            statements,
            consistency: options.consistency.unwrap_or(self.consistency),
        });
        self.with_timeout(options.timeout, |session| session.round_trip(&request))?;
        Ok(())
    }

    fn keyspace(&self) -> Option<&str> {
        self.keyspace.as_deref()
    }
}
