// logger.rs
use crate::config::LoggerConfig;
use crate::error::{CqlResult, ErrorType};
use flexi_logger::{Duplicate, FileSpec, Logger, LoggerHandle, WriteMode};

/// Inicia el logger de archivos. Lo llama la aplicación; la librería solo
/// usa las macros de `log`. Hay que conservar el handle para que se
/// vacíe el buffer al terminar.
pub fn init_logger(config: &LoggerConfig) -> CqlResult<LoggerHandle> {
    // Los logs van a la carpeta configurada
    let file_spec = FileSpec::default().directory(config.directory.clone());

    Logger::try_with_str(&config.level)
        .map_err(|e| ErrorType::InvalidConfig(format!("invalid log level: {}", e)))?
        .log_to_file(file_spec)
        .write_mode(WriteMode::BufferAndFlush)
        .duplicate_to_stdout(Duplicate::Info)
        .format(|write, _now, record| {
            write!(
                write,
                "{} [{}] - {}",
                chrono::Local::now().format("%Y-%m-%d: %H:%M:%S"),
                record.level(),
                record.args()
            )
        })
        .start()
        .map_err(|e| ErrorType::InvalidConfig(format!("could not start logger: {}", e)))
}
