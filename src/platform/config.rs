use std::env;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use directories::ProjectDirs;

use crate::usecase::services::debounce::DEFAULT_QUIESCENCE;
use crate::usecase::services::export_service::DEFAULT_BATCH_SIZE;

pub const DEFAULT_UPSTREAM_BASE_URL: &str = "https://api.bemomentiq.com";

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub upstream_base_url: String,
    pub dashboard_api_url: String,
    pub request_timeout: Duration,
    pub search_debounce: Duration,
    pub export_batch_size: u64,
    pub export_dir: PathBuf,
}

fn parse_var<T: std::str::FromStr>(key: &str, default: T) -> Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(value) => value
            .trim()
            .parse()
            .with_context(|| format!("{key} has an invalid value: {value}")),
        Err(_) => Ok(default),
    }
}

pub fn default_export_dir() -> Result<PathBuf> {
    let project_dirs = ProjectDirs::from("com", "tap", "tap-dashboard")
        .ok_or_else(|| anyhow!("unable to resolve data directory"))?;
    Ok(project_dirs.data_local_dir().join("exports"))
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let port: u16 = parse_var("PORT", 3000).context("PORT must be a valid u16")?;

        let upstream_base_url = env::var("UPSTREAM_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_UPSTREAM_BASE_URL.to_string());

        let dashboard_api_url = env::var("DASHBOARD_API_URL")
            .unwrap_or_else(|_| format!("http://127.0.0.1:{port}"));

        let request_timeout = Duration::from_secs(parse_var("REQUEST_TIMEOUT_SECS", 30_u64)?);

        let search_debounce = Duration::from_millis(parse_var(
            "SEARCH_DEBOUNCE_MS",
            DEFAULT_QUIESCENCE.as_millis() as u64,
        )?);

        let export_batch_size = parse_var("EXPORT_BATCH_SIZE", DEFAULT_BATCH_SIZE)?;
        if export_batch_size == 0 {
            anyhow::bail!("EXPORT_BATCH_SIZE must be greater than zero");
        }

        let export_dir = match env::var("EXPORT_DIR") {
            Ok(dir) => PathBuf::from(dir),
            Err(_) => default_export_dir()?,
        };

        Ok(Self {
            port,
            upstream_base_url,
            dashboard_api_url,
            request_timeout,
            search_debounce,
            export_batch_size,
            export_dir,
        })
    }
}
