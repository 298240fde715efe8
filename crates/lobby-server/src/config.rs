//! Server configuration loaded from environment variables.

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};

/// Placeholder JWT secrets that MUST NOT be used.
const PLACEHOLDER_SECRETS: &[&str] = &["change-me", "dev-secret-change-me"];

#[derive(Debug, Clone)]
pub struct Config {
    /// Env: `LOBBY_HOST` / `LOBBY_PORT`. Default: `0.0.0.0:3000`.
    pub addr: SocketAddr,

    /// Env: `LOBBY_DB_PATH`. Default: `lobby.db`.
    pub db_path: PathBuf,

    /// HS256 secret shared with the identity service that issues tokens.
    /// Env: `LOBBY_JWT_SECRET`. Required.
    pub jwt_secret: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let host = lookup("LOBBY_HOST").unwrap_or_else(|| "0.0.0.0".into());
        let port: u16 = lookup("LOBBY_PORT")
            .unwrap_or_else(|| "3000".into())
            .parse()
            .context("LOBBY_PORT is not a valid port")?;
        let addr: SocketAddr = format!("{}:{}", host, port)
            .parse()
            .context("LOBBY_HOST is not a valid address")?;

        let db_path = lookup("LOBBY_DB_PATH")
            .unwrap_or_else(|| "lobby.db".into())
            .into();

        let jwt_secret = lookup("LOBBY_JWT_SECRET").unwrap_or_default();
        if jwt_secret.is_empty() || PLACEHOLDER_SECRETS.contains(&jwt_secret.as_str()) {
            bail!("LOBBY_JWT_SECRET is unset or still a placeholder");
        }

        Ok(Self {
            addr,
            db_path,
            jwt_secret,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_only_secret_is_set() {
        let config = Config::from_lookup(lookup(&[("LOBBY_JWT_SECRET", "s3cret")])).unwrap();
        assert_eq!(config.addr, ([0, 0, 0, 0], 3000).into());
        assert_eq!(config.db_path, PathBuf::from("lobby.db"));
        assert_eq!(config.jwt_secret, "s3cret");
    }

    #[test]
    fn overrides_are_read() {
        let config = Config::from_lookup(lookup(&[
            ("LOBBY_HOST", "127.0.0.1"),
            ("LOBBY_PORT", "8080"),
            ("LOBBY_DB_PATH", "/tmp/rooms.db"),
            ("LOBBY_JWT_SECRET", "s3cret"),
        ]))
        .unwrap();
        assert_eq!(config.addr, ([127, 0, 0, 1], 8080).into());
        assert_eq!(config.db_path, PathBuf::from("/tmp/rooms.db"));
    }

    #[test]
    fn missing_or_placeholder_secret_is_fatal() {
        assert!(Config::from_lookup(lookup(&[])).is_err());
        assert!(Config::from_lookup(lookup(&[("LOBBY_JWT_SECRET", "dev-secret-change-me")])).is_err());
    }

    #[test]
    fn bad_port_is_fatal() {
        let result = Config::from_lookup(lookup(&[
            ("LOBBY_PORT", "http"),
            ("LOBBY_JWT_SECRET", "s3cret"),
        ]));
        assert!(result.is_err());
    }
}
