use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};

use mirror_db::DEFAULT_READER_POOL_SIZE;

#[derive(Debug, Clone)]
pub struct Config {
    pub db_path: PathBuf,
    pub host: String,
    pub port: u16,
    pub reader_pool_size: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let db_path = var("MIRROR_DB_PATH").unwrap_or_else(|| "mirror.db".into());
        let host = var("MIRROR_HOST").unwrap_or_else(|| "0.0.0.0".into());
        let port: u16 = match var("MIRROR_PORT") {
            Some(v) => v.parse().context("MIRROR_PORT must be a port number")?,
            None => 8000,
        };
        let reader_pool_size: usize = match var("MIRROR_READER_POOL") {
            Some(v) => v
                .parse()
                .context("MIRROR_READER_POOL must be a connection count")?,
            None => DEFAULT_READER_POOL_SIZE,
        };

        Ok(Self {
            db_path: db_path.into(),
            host,
            port,
            reader_pool_size,
        })
    }

    pub fn bind_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("invalid bind address {}:{}", self.host, self.port))
    }
}
