//! Connection settings read from flags or the `UFM_*` environment.

use std::time::Duration;

use clap::Args;
use fabric::{Scheme, UfmConfig};

/// Connection flags. Each one falls back to its `UFM_*` environment variable.
#[derive(Args, Debug, Clone, Default)]
pub struct ConnectionArgs {
    /// Username of ufm.
    #[arg(long, env = "UFM_USERNAME", global = true)]
    pub username: Option<String>,

    /// Password of ufm.
    #[arg(long, env = "UFM_PASSWORD", global = true, hide_env_values = true)]
    pub password: Option<String>,

    /// IP address or hostname of ufm server.
    #[arg(long, env = "UFM_ADDRESS", global = true)]
    pub address: Option<String>,

    /// REST API port of ufm [default: 443 for https, 80 for http].
    #[arg(long, env = "UFM_PORT", global = true)]
    pub port: Option<u16>,

    /// http or https.
    #[arg(
        long = "http-schema",
        env = "UFM_HTTP_SCHEMA",
        global = true,
        value_parser = parse_scheme,
    )]
    pub scheme: Option<Scheme>,

    /// Certificate of ufm (PEM). Without it, https peers are not verified.
    #[arg(long, env = "UFM_CERTIFICATE", global = true, hide_env_values = true)]
    pub certificate: Option<String>,

    /// Per-request timeout in seconds.
    #[arg(long, env = "UFM_TIMEOUT", global = true, value_name = "SECONDS")]
    pub timeout: Option<u64>,
}

fn parse_scheme(value: &str) -> Result<Scheme, fabric::UfmError> {
    value.parse()
}

impl ConnectionArgs {
    /// Builds the immutable client configuration, failing if username,
    /// password or address is missing.
    pub fn into_config(self) -> fabric::Result<UfmConfig> {
        let config = UfmConfig {
            username: self.username.unwrap_or_default(),
            password: self.password.unwrap_or_default(),
            address: self.address.unwrap_or_default(),
            port: self.port,
            scheme: self.scheme.unwrap_or_default(),
            certificate: self.certificate.filter(|pem| !pem.trim().is_empty()),
            timeout: self.timeout.map(Duration::from_secs),
        };
        config.validate()?;
        Ok(config)
    }
}
