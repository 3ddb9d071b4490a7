use clap::Parser;
use clap::builder::BoolishValueParser;
use std::path::PathBuf;

/// Checks a UniFi controller's session login, site listing and guest
/// authorization endpoints.
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "unifi-auth-test", version, about)]
pub struct Args {
    /// Hardware address to authorize as a guest once the session is verified.
    #[arg(value_name = "MAC")]
    pub mac: Option<String>,

    /// TOML file with controller settings.
    #[arg(long, env = "UNIFI_CONFIG", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Controller hostname or IP address.
    #[arg(long, env = "UNIFI_CONTROLLER")]
    pub controller: Option<String>,

    #[arg(long, env = "UNIFI_PORT")]
    pub port: Option<u16>,

    #[arg(long, env = "UNIFI_USERNAME")]
    pub username: Option<String>,

    /// Site used for guest authorization.
    #[arg(long, env = "UNIFI_SITE")]
    pub site: Option<String>,

    /// Skip TLS certificate validation (self-signed controllers).
    #[arg(
        long,
        env = "UNIFI_INSECURE",
        num_args = 0..=1,
        default_missing_value = "true",
        value_parser = BoolishValueParser::new()
    )]
    pub insecure: Option<bool>,

    /// Request timeout in seconds; 0 waits indefinitely.
    #[arg(long, env = "UNIFI_TIMEOUT_SECS")]
    pub timeout_secs: Option<u64>,

    /// Password to use instead of prompting.
    #[arg(long, env = "UNIFI_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,
}
