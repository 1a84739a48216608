use std::io::{Read, Write};
use std::path::PathBuf;

use log::{info, LevelFilter};

use crate::config::{self, ConfigError};
use crate::core_service::{ExtensionService, ServiceError};
use crate::host::TabMirror;
use crate::logging;
use crate::transport::{handle_frame, read_frame, write_frame, TransportError};

#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("service error: {0}")]
    Service(#[from] ServiceError),
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),
    #[error("logging setup failed: {0}")]
    Logging(#[source] std::io::Error),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeOptions {
    pub config_path: Option<PathBuf>,
    pub shortcuts_path: Option<PathBuf>,
    pub state_db_path: Option<PathBuf>,
    pub log_level: LevelFilter,
}

impl Default for RuntimeOptions {
    fn default() -> Self {
        Self {
            config_path: None,
            shortcuts_path: None,
            state_db_path: None,
            log_level: LevelFilter::Info,
        }
    }
}

pub fn parse_cli_args(args: &[String]) -> Result<RuntimeOptions, String> {
    let mut options = RuntimeOptions::default();
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--config" => options.config_path = Some(PathBuf::from(flag_value(&mut iter, arg)?)),
            "--shortcuts" => {
                options.shortcuts_path = Some(PathBuf::from(flag_value(&mut iter, arg)?))
            }
            "--state-db" => {
                options.state_db_path = Some(PathBuf::from(flag_value(&mut iter, arg)?))
            }
            "--log-level" => {
                let raw = flag_value(&mut iter, arg)?;
                options.log_level = raw
                    .parse()
                    .map_err(|_| format!("invalid log level: {raw}"))?;
            }
            // The browser launches native hosts with the caller's origin and,
            // on Windows, a parent window handle.
            other if other.starts_with("chrome-extension://") => {}
            other if other.starts_with("--parent-window=") => {}
            other => return Err(format!("unknown argument: {other}")),
        }
    }
    Ok(options)
}

fn flag_value<'a>(
    iter: &mut impl Iterator<Item = &'a String>,
    flag: &str,
) -> Result<&'a str, String> {
    iter.next()
        .map(String::as_str)
        .ok_or_else(|| format!("missing value for {flag}"))
}

pub fn run_with_options(options: RuntimeOptions) -> Result<(), RuntimeError> {
    let mut config = config::load(options.config_path.as_deref())?;
    if !config.config_path.exists() {
        config::save(&config)?;
    }
    if let Some(path) = options.shortcuts_path {
        config.shortcuts_path = path;
    }
    if let Some(path) = options.state_db_path {
        config.state_db_path = path;
    }

    logging::init(&config.log_dir, options.log_level).map_err(RuntimeError::Logging)?;
    info!(
        "startup config_path={} shortcuts_path={} state_db_path={}",
        config.config_path.display(),
        config.shortcuts_path.display(),
        config.state_db_path.display(),
    );

    let mut service = ExtensionService::new(config)?;
    service.load_shortcuts();

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    let handled = serve(&mut service, &mut stdin.lock(), &mut stdout.lock())?;
    info!("host disconnected after {handled} events");
    Ok(())
}

/// Answers framed events until the reader reaches end of stream. Shortcuts
/// must already be loaded (or failed); anything earlier gets `not_ready`.
pub fn serve(
    service: &mut ExtensionService,
    reader: &mut impl Read,
    writer: &mut impl Write,
) -> Result<usize, TransportError> {
    let mut mirror = TabMirror::default();
    let mut handled = 0;
    while let Some(frame) = read_frame(reader)? {
        let response = handle_frame(service, &mut mirror, &frame)?;
        write_frame(writer, response.as_bytes())?;
        handled += 1;
    }
    Ok(handled)
}
