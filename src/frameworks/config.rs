use serde::Deserialize;
use std::fmt;
use std::path::Path;
use std::time::Duration;

use crate::domain::{ControllerEndpoint, ProbeError};
use crate::frameworks::cli::Args;

// Defaults used when neither flags, environment nor file set a value.
pub const DEFAULT_CONTROLLER: &str = "unifi.openprotocol.xyz";
pub const DEFAULT_PORT: u16 = 8443;
pub const DEFAULT_USERNAME: &str = "testadmin";
pub const DEFAULT_SITE: &str = "default";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

// Optional TOML settings file.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub controller: Option<String>,
    pub port: Option<u16>,
    pub username: Option<String>,
    pub site: Option<String>,
    pub insecure: Option<bool>,
    pub timeout_secs: Option<u64>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self, ProbeError> {
        let raw = std::fs::read_to_string(path).map_err(|err| {
            ProbeError::Config(format!("failed to read {}: {err}", path.display()))
        })?;
        Self::parse(&raw)
            .map_err(|err| ProbeError::Config(format!("{}: {err}", path.display())))
    }

    pub fn parse(raw: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(raw)
    }
}

/// Settings for one run, fixed before the workflow starts.
#[derive(Clone)]
pub struct Settings {
    pub endpoint: ControllerEndpoint,
    pub username: String,
    pub site: String,
    pub password: Option<String>,
    // `None` disables the request timeout.
    pub timeout: Option<Duration>,
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("endpoint", &self.endpoint)
            .field("username", &self.username)
            .field("site", &self.site)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl Settings {
    // Flags and environment (already merged by clap) win over the file.
    pub fn resolve(args: &Args) -> Result<Self, ProbeError> {
        let file = match &args.config {
            Some(path) => FileConfig::load(path)?,
            None => FileConfig::default(),
        };
        Self::merge(args, file)
    }

    pub fn merge(args: &Args, file: FileConfig) -> Result<Self, ProbeError> {
        let host = args
            .controller
            .clone()
            .or(file.controller)
            .unwrap_or_else(|| DEFAULT_CONTROLLER.to_string());
        if host.trim().is_empty() {
            return Err(ProbeError::Config("controller host is empty".to_string()));
        }

        let site = args
            .site
            .clone()
            .or(file.site)
            .unwrap_or_else(|| DEFAULT_SITE.to_string());
        if site.is_empty() {
            return Err(ProbeError::Config("site name is empty".to_string()));
        }

        let timeout_secs = args
            .timeout_secs
            .or(file.timeout_secs)
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        Ok(Self {
            endpoint: ControllerEndpoint {
                host,
                port: args.port.or(file.port).unwrap_or(DEFAULT_PORT),
                insecure: args.insecure.or(file.insecure).unwrap_or(false),
            },
            username: args
                .username
                .clone()
                .or(file.username)
                .unwrap_or_else(|| DEFAULT_USERNAME.to_string()),
            site,
            password: args.password.clone(),
            timeout: (timeout_secs > 0).then(|| Duration::from_secs(timeout_secs)),
        })
    }
}
