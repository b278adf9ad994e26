//! Server configuration from environment variables

use std::net::SocketAddr;
use std::path::PathBuf;

use tm_core::store::CorruptPolicy;
use tracing::warn;

use crate::auth::Credentials;

const DEFAULT_PORT: u16 = 4000;
const DEFAULT_DATA_FILE: &str = "db.json";
const DEFAULT_AUTH_USER: &str = "admin";
const DEFAULT_AUTH_PASS: &str = "password123";

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub data_file: PathBuf,
    pub on_corrupt: CorruptPolicy,
    pub credentials: Credentials,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build the config from any variable source; unusable values fall back
    /// to defaults with a warning.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let port = match var("PORT") {
            Some(raw) => raw.parse().unwrap_or_else(|_| {
                warn!("Ignoring invalid PORT '{}', using {}", raw, DEFAULT_PORT);
                DEFAULT_PORT
            }),
            None => DEFAULT_PORT,
        };

        let data_file = var("TM_DATA_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_FILE));

        let on_corrupt = match var("TM_ON_CORRUPT") {
            Some(raw) => raw.parse().unwrap_or_else(|_| {
                warn!(
                    "Ignoring invalid TM_ON_CORRUPT '{}', using '{}'",
                    raw,
                    CorruptPolicy::default().as_str()
                );
                CorruptPolicy::default()
            }),
            None => CorruptPolicy::default(),
        };

        let credentials = match (var("AUTH_USER"), var("AUTH_PASS")) {
            (Some(username), Some(password)) => Credentials::new(username, password),
            (username, password) => {
                warn!("AUTH_USER/AUTH_PASS not fully set; falling back to default credentials");
                Credentials::new(
                    username.unwrap_or_else(|| DEFAULT_AUTH_USER.to_string()),
                    password.unwrap_or_else(|| DEFAULT_AUTH_PASS.to_string()),
                )
            }
        };

        Self {
            port,
            data_file,
            on_corrupt,
            credentials,
        }
    }

    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::from(([0, 0, 0, 0], self.port))
    }
}
