//! Startup configuration.
//!
//! Flags win over environment variables, which win over defaults.

use crate::error::ConfigError;
use crate::refresh::DEFAULT_REFRESH_INTERVAL;
use crate::worker::DEFAULT_MAX_BODY_BYTES;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

pub const USAGE: &str = "\
Usage: suggest-service [--bind <addr:port>] [--source <path>] [--refresh-secs <n>]
                       [--max-connections <n>] [--max-body-bytes <n>]
       suggest-service <address> <port>

Environment: SUGGEST_BIND, SUGGEST_SOURCE, SUGGEST_REFRESH_SECS,
             SUGGEST_MAX_CONNECTIONS, SUGGEST_MAX_BODY_BYTES, RUST_LOG

Example: suggest-service --bind 0.0.0.0:80 --source suggestions.json";

pub const DEFAULT_BIND: &str = "127.0.0.1:8080";
pub const DEFAULT_SOURCE: &str = "suggestions.json";

#[derive(Debug, Clone, PartialEq)]
pub struct ServiceConfig {
    pub bind_addr: SocketAddr,
    /// JSON document the index is loaded from.
    pub source_path: PathBuf,
    pub refresh_interval: Duration,
    /// Upper bound on live connection workers; `None` is unbounded.
    pub max_connections: Option<usize>,
    pub max_body_bytes: usize,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 8080)),
            source_path: PathBuf::from(DEFAULT_SOURCE),
            refresh_interval: DEFAULT_REFRESH_INTERVAL,
            max_connections: None,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }
}

impl ServiceConfig {
    /// Reads the process arguments and environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::parse(std::env::args().skip(1), |key| std::env::var(key).ok())
    }

    /// `args` excludes the program name.
    pub fn parse<I, E>(args: I, env: E) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = String>,
        E: Fn(&str) -> Option<String>,
    {
        let mut bind = env("SUGGEST_BIND");
        let mut source = env("SUGGEST_SOURCE");
        let mut refresh = env("SUGGEST_REFRESH_SECS");
        let mut max_connections = env("SUGGEST_MAX_CONNECTIONS");
        let mut max_body = env("SUGGEST_MAX_BODY_BYTES");
        let mut positional = Vec::new();

        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            let slot = match arg.as_str() {
                "--bind" => &mut bind,
                "--source" => &mut source,
                "--refresh-secs" => &mut refresh,
                "--max-connections" => &mut max_connections,
                "--max-body-bytes" => &mut max_body,
                other if !other.starts_with("--") => {
                    positional.push(other.to_string());
                    continue;
                }
                other => {
                    tracing::warn!("Ignoring unknown flag {}", other);
                    continue;
                }
            };
            *slot = Some(args.next().ok_or(ConfigError::MissingValue(arg))?);
        }

        // Legacy form: `<address> <port>`
        if let [address, port] = positional.as_slice() {
            bind = Some(format!("{}:{}", address, port));
        }

        let mut config = Self::default();
        if let Some(value) = bind {
            config.bind_addr = parse_value("bind", &value)?;
        }
        if let Some(value) = source {
            config.source_path = PathBuf::from(value);
        }
        if let Some(value) = refresh {
            let secs: u64 = parse_value("refresh-secs", &value)?;
            if secs == 0 {
                return Err(invalid("refresh-secs", &value, "must be at least 1"));
            }
            config.refresh_interval = Duration::from_secs(secs);
        }
        if let Some(value) = max_connections {
            let limit: usize = parse_value("max-connections", &value)?;
            if limit == 0 {
                return Err(invalid("max-connections", &value, "must be at least 1"));
            }
            config.max_connections = Some(limit);
        }
        if let Some(value) = max_body {
            config.max_body_bytes = parse_value("max-body-bytes", &value)?;
        }

        Ok(config)
    }
}

fn parse_value<T>(name: &str, value: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e: T::Err| invalid(name, value, &e.to_string()))
}

fn invalid(name: &str, value: &str, reason: &str) -> ConfigError {
    ConfigError::InvalidValue {
        name: name.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}
