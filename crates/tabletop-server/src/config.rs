//! Server settings from the environment.

use anyhow::{ensure, Context};
use std::net::SocketAddr;
use tabletop_core::{SessionConfig, LIFE_MAX, LIFE_MIN};

const DEFAULT_ADDR: &str = "0.0.0.0:8080";

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub addr: SocketAddr,
    /// Settings for newly created sessions
    pub session: SessionConfig,
}

impl ServerConfig {
    /// Load from `SERVER_ADDR`, `STARTING_LIFE`, `PLAYER_NAME` and `GAME_FORMAT`.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let addr = lookup("SERVER_ADDR")
            .unwrap_or_else(|| DEFAULT_ADDR.into())
            .parse()
            .context("SERVER_ADDR must be a socket address")?;

        let mut session = SessionConfig::default();
        if let Some(life) = lookup("STARTING_LIFE") {
            let value: i32 = life
                .trim()
                .parse()
                .with_context(|| format!("STARTING_LIFE must be an integer, got {:?}", life))?;
            ensure!(
                (LIFE_MIN..=LIFE_MAX).contains(&value),
                "STARTING_LIFE must be between {} and {}, got {}",
                LIFE_MIN,
                LIFE_MAX,
                value
            );
            session.starting_life = value;
        }
        if let Some(name) = lookup("PLAYER_NAME") {
            session.player_name = name;
        }
        if let Some(format) = lookup("GAME_FORMAT") {
            session.format = format;
        }

        Ok(Self { addr, session })
    }
}
