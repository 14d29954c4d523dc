use std::{env, net::SocketAddr};
use thiserror::Error;

use crate::shared::UserId;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
pub const DEFAULT_ROOM_NAME: &str = "Server Notices";

/// Server notices settings resolved from environment variables
#[derive(Debug, Clone, Default)]
pub struct ServerNoticesConfig {
    /// Account that owns notice rooms and sends notices. `None` disables the feature.
    pub system_user_id: Option<UserId>,
    pub room_name: String,
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
    pub room_topic: Option<String>,
}

impl ServerNoticesConfig {
    /// Config with the given system account and default room name
    pub fn enabled(system_user_id: impl Into<String>) -> Self {
        Self {
            system_user_id: Some(UserId::new(system_user_id)),
            room_name: DEFAULT_ROOM_NAME.to_string(),
            ..Self::default()
        }
    }

    pub fn disabled() -> Self {
        Self {
            room_name: DEFAULT_ROOM_NAME.to_string(),
            ..Self::default()
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.system_user_id.is_some()
    }

    fn from_vars(lookup: &impl Fn(&str) -> Option<String>) -> Self {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        Self {
            system_user_id: read("SERVER_NOTICES_SYSTEM_MXID").map(UserId::new),
            room_name: read("SERVER_NOTICES_ROOM_NAME")
                .unwrap_or_else(|| DEFAULT_ROOM_NAME.to_string()),
            display_name: read("SERVER_NOTICES_DISPLAY_NAME"),
            avatar_url: read("SERVER_NOTICES_AVATAR_URL"),
            room_topic: read("SERVER_NOTICES_ROOM_TOPIC"),
        }
    }
}

/// Runtime configuration for the binary
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub notices: ServerNoticesConfig,
}

impl AppConfig {
    /// Reads and validates configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Builds configuration from an arbitrary variable lookup
    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let bind_value = lookup("APP_BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_value
            .parse()
            .map_err(|err| ConfigError::BindAddress(bind_value.clone(), err))?;

        Ok(Self {
            bind_addr,
            notices: ServerNoticesConfig::from_vars(&lookup),
        })
    }
}

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid APP_BIND_ADDR value {0:?}: {1}")]
    BindAddress(String, std::net::AddrParseError),
}
