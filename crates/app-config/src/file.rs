//! The JSON config file shared with the rest of the application.
//!
//! Only the `ytdlp` object is read, everything else in the file is ignored.

use std::{fs, path::Path};

use serde::{Deserialize, Serialize};

pub const DEFAULT_SERVER_ADDRESS: &str = "localhost";
pub const DEFAULT_SERVER_PORT: u16 = 2345;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GatewayFileConfig {
    #[serde(default)]
    pub ytdlp: Option<YtDlpFileConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct YtDlpFileConfig {
    pub enabled: Option<bool>,
    pub enable_server: Option<bool>,
    pub server_address: Option<String>,
    pub server_port: Option<u16>,
}

/// Final word on whether and where the gateway listens
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListenSettings {
    pub enabled: bool,
    pub host: String,
    pub port: u16,
}
impl Default for ListenSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            host: DEFAULT_SERVER_ADDRESS.to_string(),
            port: DEFAULT_SERVER_PORT,
        }
    }
}
impl ListenSettings {
    #[must_use]
    pub fn with_overrides(mut self, host: Option<String>, port: Option<u16>) -> Self {
        if let Some(host) = host {
            self.host = host;
        }

        if let Some(port) = port {
            self.port = port;
        }

        self
    }
}

impl GatewayFileConfig {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let contents = fs::read_to_string(path)?;

        Self::parse(&contents)
    }

    pub fn parse(contents: &str) -> anyhow::Result<Self> {
        Ok(serde_json::from_str(contents)?)
    }

    /// A file without a `ytdlp` object disables the gateway,
    /// as does `enabled` or `enable_server` being explicitly `false`.
    #[must_use]
    pub fn listen_settings(&self) -> ListenSettings {
        let Some(conf) = &self.ytdlp else {
            return ListenSettings {
                enabled: false,
                ..Default::default()
            };
        };

        let defaults = ListenSettings::default();

        ListenSettings {
            enabled: conf.enabled != Some(false) && conf.enable_server != Some(false),
            host: conf.server_address.clone().unwrap_or(defaults.host),
            port: conf.server_port.unwrap_or(defaults.port),
        }
    }
}
