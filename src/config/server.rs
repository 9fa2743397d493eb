use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::types::UrlBases;

pub const DEFAULT_FRONTEND_BASE_URL: &str = "http://localhost:5173";

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub data_dir: PathBuf,
    /// Public base URL of this server (e.g., "https://comments.example.com").
    /// Embedded in every project's write URL. Derived from host and port if not set.
    pub backend_base_url: Option<String>,
    /// Base URL of the comment viewer that project read URLs point at.
    pub frontend_base_url: String,
}

impl ServerConfig {
    /// Loads a configuration file. Keys missing from the file keep their defaults.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        toml::from_str(&content)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e.message())))
    }

    pub fn socket_addr(&self) -> std::result::Result<SocketAddr, std::net::AddrParseError> {
        format!("{}:{}", self.host, self.port).parse()
    }

    #[must_use]
    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join("marginalia.db")
    }

    #[must_use]
    pub fn backend_base_url(&self) -> String {
        match &self.backend_base_url {
            Some(url) => url.clone(),
            None => format!("http://{}:{}", self.host, self.port),
        }
    }

    #[must_use]
    pub fn url_bases(&self) -> UrlBases {
        UrlBases {
            backend_base_url: self.backend_base_url(),
            frontend_base_url: self.frontend_base_url.clone(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            data_dir: PathBuf::from("./data"),
            backend_base_url: None,
            frontend_base_url: DEFAULT_FRONTEND_BASE_URL.to_string(),
        }
    }
}
