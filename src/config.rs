// SPDX-License-Identifier: GPL-2.0-or-later
/// Defines the configuration file format for soundboard.
use std::{
    fmt::Display,
    net::{IpAddr, Ipv4Addr, SocketAddr},
    path::PathBuf,
};

use serde::{Deserialize, Serialize};

use crate::Error;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Config {
    /// The URL to the PostgreSQL database in the format "postgres://<user>:<pass>@host/database_name"
    pub database_url: String,
    /// The HTTP server configuration options
    #[serde(default)]
    pub http_api: HttpApi,
}

impl Config {
    /// Replace the configured database URL, if one is given.
    ///
    /// The `DATABASE_URL` environment variable arrives here through the CLI and wins over
    /// the configuration file.
    pub fn with_database_url(mut self, database_url: Option<String>) -> Self {
        if let Some(url) = database_url {
            self.database_url = url;
        }
        self
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct HttpApi {
    /// The address the HTTP server listens on.
    pub url: SocketAddr,
    /// The path to an x509 certificate the server should use for HTTPS.
    pub tls_certificate: Option<PathBuf>,
    /// The path to the key for the given certificate.
    pub tls_key: Option<PathBuf>,
}

impl HttpApi {
    /// The certificate and key to serve HTTPS with, or `None` for plain HTTP.
    pub fn tls(&self) -> Result<Option<(PathBuf, PathBuf)>, Error> {
        match (&self.tls_certificate, &self.tls_key) {
            (None, None) => Ok(None),
            (Some(cert), Some(key)) => Ok(Some((cert.clone(), key.clone()))),
            _ => Err(Error::ConfigValueError(
                "'tls_certificate' and 'tls_key' must both be set or neither should be set."
                    .into(),
            )),
        }
    }
}

impl Default for HttpApi {
    fn default() -> Self {
        HttpApi {
            url: SocketAddr::new(IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1)), 8080),
            tls_certificate: None,
            tls_key: None,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            database_url: "postgres:///soundboard".to_string(),
            http_api: Default::default(),
        }
    }
}

impl Display for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            toml::ser::to_string_pretty(&self).unwrap_or_default()
        )
    }
}

/// Load a [`Config`] instance from the given path.
pub fn load_config(path: &str) -> Result<Config, Error> {
    let path = PathBuf::from(path);
    let config_string = std::fs::read_to_string(path)?;
    let config: Config = toml::from_str(&config_string).map_err(|err| {
        println!("Example config format:\n\n{}", Config::default());
        err
    })?;
    Ok(config)
}
