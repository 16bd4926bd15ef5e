//! Runtime configuration read from `AVAILABILITY_*` environment variables.

use anyhow::{Context, Result};
use std::net::SocketAddr;

use crate::domain::reconciliation::MatchPolicy;

pub const DATABASE_URL_VAR: &str = "AVAILABILITY_DATABASE_URL";
pub const BIND_ADDR_VAR: &str = "AVAILABILITY_BIND_ADDR";
pub const ALLOWED_ORIGIN_VAR: &str = "AVAILABILITY_ALLOWED_ORIGIN";
pub const MATCH_POLICY_VAR: &str = "AVAILABILITY_MATCH_POLICY";

const DEFAULT_DATABASE_URL: &str = "sqlite:availability.db";
const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";
const DEFAULT_ALLOWED_ORIGIN: &str = "http://localhost:8080";

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub database_url: String,
    pub bind_addr: SocketAddr,
    /// Origin of the grid UI allowed by CORS
    pub allowed_origin: String,
    pub match_policy: MatchPolicy,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            allowed_origin: DEFAULT_ALLOWED_ORIGIN.to_string(),
            match_policy: MatchPolicy::default(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build the configuration from any variable source; unset or empty
    /// variables fall back to the defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let database_url =
            get(DATABASE_URL_VAR).unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());

        let bind_addr = get(BIND_ADDR_VAR).unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr: SocketAddr = bind_addr
            .trim()
            .parse()
            .with_context(|| {
                format!("{} is not a socket address: '{}'", BIND_ADDR_VAR, bind_addr)
            })?;

        let allowed_origin =
            get(ALLOWED_ORIGIN_VAR).unwrap_or_else(|| DEFAULT_ALLOWED_ORIGIN.to_string());

        let match_policy = match get(MATCH_POLICY_VAR) {
            Some(value) => value
                .parse::<MatchPolicy>()
                .map_err(|e| anyhow::anyhow!("{}: {}", MATCH_POLICY_VAR, e))?,
            None => MatchPolicy::default(),
        };

        Ok(Self {
            database_url,
            bind_addr,
            allowed_origin,
            match_policy,
        })
    }
}
