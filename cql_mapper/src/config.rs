// config.rs
use crate::error::{CqlResult, ErrorType};
use crate::message_functions::consistency::Consistency;
use crate::schema_functions::replication_config::ReplicationConfig;
use serde::Deserialize;
use std::fs;
use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_PORT: u16 = 9042;
pub const DEFAULT_PAGE_SIZE: i32 = 5000;

/// `host` acepta un texto con puntos de contacto separados por coma o una lista.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum HostList {
    One(String),
    Many(Vec<String>),
}

impl Default for HostList {
    fn default() -> Self {
        HostList::One(String::new())
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SslConfig {
    #[serde(default = "default_true")]
    pub verify_peer: bool,
    pub trusted_cert: Option<PathBuf>,
    pub client_cert: Option<PathBuf>,
    #[serde(alias = "private_cert")]
    pub private_key: Option<PathBuf>,
}

impl Default for SslConfig {
    fn default() -> Self {
        SslConfig {
            verify_peer: true,
            trusted_cert: None,
            client_cert: None,
            private_key: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LoggerConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_directory")]
    pub directory: PathBuf,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        LoggerConfig {
            level: default_log_level(),
            directory: default_log_directory(),
        }
    }
}

/// Configuración de la conexión, leída de JSON y pasada explícitamente.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ConnectionConfig {
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(default)]
    pub host: HostList,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub keyspace: String,
    pub username: Option<String>,
    pub password: Option<String>,
    #[serde(default)]
    pub consistency: Consistency,
    pub page_size: Option<i32>,
    pub timeout: Option<f64>,         // segundos
    pub connect_timeout: Option<f64>, // segundos
    pub request_timeout: Option<f64>, // segundos
    #[serde(default = "default_scheme")]
    pub scheme: String,
    #[serde(default)]
    pub ssl: SslConfig,
    #[serde(default)]
    pub prefix: String,
    #[serde(default = "default_migrations")]
    pub migrations: String,
    #[serde(default)]
    pub replication: ReplicationConfig,
    #[serde(default)]
    pub log: LoggerConfig,
}

fn default_true() -> bool {
    true
}

fn default_name() -> String {
    "scylla".to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_scheme() -> String {
    "tcp".to_string()
}

fn default_migrations() -> String {
    "migrations".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_directory() -> PathBuf {
    PathBuf::from("logs")
}

// Valores que no entran en un `Duration` se descartan; `validate` los rechaza.
fn seconds(value: Option<f64>) -> Option<Duration> {
    value
        .filter(|secs| *secs > 0.0)
        .and_then(|secs| Duration::try_from_secs_f64(secs).ok())
}

impl ConnectionConfig {
    /// Configuración mínima: un host y un keyspace, el resto por defecto.
    pub fn new(host: &str, keyspace: &str) -> Self {
        ConnectionConfig {
            name: default_name(),
            host: HostList::One(host.to_string()),
            port: DEFAULT_PORT,
            keyspace: keyspace.to_string(),
            username: None,
            password: None,
            consistency: Consistency::default(),
            page_size: None,
            timeout: None,
            connect_timeout: None,
            request_timeout: None,
            scheme: default_scheme(),
            ssl: SslConfig::default(),
            prefix: String::new(),
            migrations: default_migrations(),
            replication: ReplicationConfig::default(),
            log: LoggerConfig::default(),
        }
    }

    pub fn from_json_str(json: &str) -> CqlResult<Self> {
        let config: ConnectionConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> CqlResult<Self> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| {
            ErrorType::InvalidConfig(format!(
                "No se pudo leer {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;
        Self::from_json_str(&content)
    }

    /// Puntos de contacto sin espacios ni entradas vacías.
    pub fn contact_points(&self) -> Vec<String> {
        let raw: Vec<&str> = match &self.host {
            HostList::One(hosts) => hosts.split(',').collect(),
            HostList::Many(hosts) => hosts.iter().map(|h| h.as_str()).collect(),
        };
        raw.into_iter()
            .map(str::trim)
            .filter(|h| !h.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// `host:port` por cada punto de contacto. Un host que ya trae puerto se respeta.
    pub fn contact_addresses(&self) -> Vec<String> {
        self.contact_points()
            .into_iter()
            .map(|host| {
                if host.parse::<SocketAddr>().is_ok() {
                    host
                } else if let Ok(ip) = host.parse::<IpAddr>() {
                    SocketAddr::new(ip, self.port).to_string()
                } else if host.contains(':') {
                    host
                } else {
                    format!("{}:{}", host, self.port)
                }
            })
            .collect()
    }

    pub fn default_page_size(&self) -> i32 {
        self.page_size
            .filter(|size| *size > 0)
            .unwrap_or(DEFAULT_PAGE_SIZE)
    }

    pub fn use_tls(&self) -> bool {
        self.scheme.eq_ignore_ascii_case("tls")
    }

    pub fn connect_timeout(&self) -> Option<Duration> {
        seconds(self.connect_timeout).or_else(|| seconds(self.timeout))
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        seconds(self.request_timeout).or_else(|| seconds(self.timeout))
    }

    pub fn validate(&self) -> CqlResult<()> {
        if self.contact_points().is_empty() {
            return Err(ErrorType::InvalidConfig(
                "at least one contact point is required in `host`".to_string(),
            ));
        }
        if self.keyspace.trim().is_empty() {
            return Err(ErrorType::InvalidConfig("`keyspace` is required".to_string()));
        }
        if !matches!(self.scheme.to_lowercase().as_str(), "tcp" | "tls") {
            return Err(ErrorType::InvalidConfig(format!(
                "unknown scheme `{}`, expected tcp or tls",
                self.scheme
            )));
        }
        if self.ssl.client_cert.is_some() != self.ssl.private_key.is_some() {
            return Err(ErrorType::InvalidConfig(
                "ssl.client_cert and ssl.private_key must be set together".to_string(),
            ));
        }
        if self.username.is_some() != self.password.is_some() {
            return Err(ErrorType::InvalidConfig(
                "username and password must be set together".to_string(),
            ));
        }
        for value in [self.timeout, self.connect_timeout, self.request_timeout]
            .into_iter()
            .flatten()
        {
            if Duration::try_from_secs_f64(value).is_err() {
                return Err(ErrorType::InvalidConfig(format!(
                    "invalid timeout: {}",
                    value
                )));
            }
        }
        self.replication.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_applied() {
        let config =
            ConnectionConfig::from_json_str(r#"{"host": "10.0.0.1", "keyspace": "shop"}"#).unwrap();
        assert_eq!(config.port, 9042);
        assert_eq!(config.default_page_size(), 5000);
        assert_eq!(config.consistency, Consistency::LocalOne);
        assert_eq!(config.migrations, "migrations");
        assert!(!config.use_tls());
        assert!(config.ssl.verify_peer);
    }

    #[test]
    fn contact_points_are_trimmed() {
        let config = ConnectionConfig::new(" a , b,,c ", "shop");
        assert_eq!(config.contact_points(), vec!["a", "b", "c"]);
        assert_eq!(
            config.contact_addresses(),
            vec!["a:9042", "b:9042", "c:9042"]
        );
    }

    #[test]
    fn host_list_and_explicit_port() {
        let config = ConnectionConfig::from_json_str(
            r#"{"host": ["127.0.0.1:19042", "node2"], "keyspace": "shop", "consistency": "QUORUM"}"#,
        )
        .unwrap();
        assert_eq!(
            config.contact_addresses(),
            vec!["127.0.0.1:19042", "node2:9042"]
        );
        assert_eq!(config.consistency, Consistency::Quorum);
    }

    #[test]
    fn validation_errors() {
        assert!(matches!(
            ConnectionConfig::from_json_str(r#"{"keyspace": "shop"}"#),
            Err(ErrorType::InvalidConfig(_))
        ));
        assert!(matches!(
            ConnectionConfig::from_json_str(r#"{"host": "a", "keyspace": ""}"#),
            Err(ErrorType::InvalidConfig(_))
        ));
        assert!(matches!(
            ConnectionConfig::from_json_str(
                r#"{"host": "a", "keyspace": "k", "ssl": {"client_cert": "c.pem"}}"#
            ),
            Err(ErrorType::InvalidConfig(_))
        ));
    }

    #[test]
    fn ipv6_contact_point_gets_brackets() {
        let config = ConnectionConfig::new("::1", "shop");
        assert_eq!(config.contact_addresses(), vec!["[::1]:9042"]);
    }

    #[test]
    fn timeouts_in_seconds() {
        let config = ConnectionConfig::from_json_str(
            r#"{"host": "a", "keyspace": "k", "timeout": 3, "connect_timeout": 1.5}"#,
        )
        .unwrap();
        assert_eq!(config.connect_timeout(), Some(Duration::from_millis(1500)));
        assert_eq!(config.request_timeout(), Some(Duration::from_secs(3)));
    }

    #[test]
    fn unrepresentable_timeout_is_rejected() {
        assert!(matches!(
            ConnectionConfig::from_json_str(r#"{"host": "a", "keyspace": "k", "timeout": 1e20}"#),
            Err(ErrorType::InvalidConfig(_))
        ));

        // Armada a mano, sin validar: el timeout se ignora en vez de fallar
        let mut config = ConnectionConfig::new("a", "k");
        config.request_timeout = Some(1e20);
        assert!(config.validate().is_err());
        assert_eq!(config.request_timeout(), None);
    }
}
