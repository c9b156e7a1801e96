use anyhow::{anyhow, Context};
use std::net::SocketAddr;
use std::time::Duration;
use teamfolio_core::earnings::AccrualPolicy;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub listen_addr: SocketAddr,
    pub backend_url: String,
    pub request_timeout: Duration,
    pub accrual_policy: AccrualPolicy,
    pub log_format: LogFormat,
    /// Allowed browser origin; any origin when unset
    pub cors_origin: Option<String>,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let listen_addr = var("TEAMFOLIO_LISTEN_ADDR")
            .unwrap_or_else(|| "0.0.0.0:8088".to_string())
            .parse::<SocketAddr>()
            .context("TEAMFOLIO_LISTEN_ADDR must be host:port")?;

        let backend_url =
            var("TEAMFOLIO_BACKEND_URL").unwrap_or_else(|| "http://127.0.0.1:5000".to_string());
        if !backend_url.starts_with("http://") && !backend_url.starts_with("https://") {
            return Err(anyhow!(
                "TEAMFOLIO_BACKEND_URL must be an http(s) URL, got '{}'",
                backend_url
            ));
        }

        let timeout_secs = match var("TEAMFOLIO_REQUEST_TIMEOUT_SECS") {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .context("TEAMFOLIO_REQUEST_TIMEOUT_SECS must be a whole number of seconds")?,
            None => 10,
        };

        let accrual_policy = match var("TEAMFOLIO_ACCRUAL_POLICY") {
            Some(raw) => raw
                .parse::<AccrualPolicy>()
                .map_err(|e| anyhow!("TEAMFOLIO_ACCRUAL_POLICY: {}", e))?,
            None => AccrualPolicy::default(),
        };

        let log_format = match var("TEAMFOLIO_LOG_FORMAT").as_deref().map(str::trim) {
            None | Some("pretty") => LogFormat::Pretty,
            Some("json") => LogFormat::Json,
            Some(other) => return Err(anyhow!("unknown TEAMFOLIO_LOG_FORMAT '{}'", other)),
        };

        Ok(Self {
            listen_addr,
            backend_url,
            request_timeout: Duration::from_secs(timeout_secs),
            accrual_policy,
            log_format,
            cors_origin: var("TEAMFOLIO_CORS_ORIGIN"),
        })
    }
}
