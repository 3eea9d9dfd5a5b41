//! Command-line argument parsing with clap.

use std::path::PathBuf;

use clap::Parser;

use crate::client::Config;

/// Operation grammar, printed alongside usage errors.
pub const USAGE: &str = "operations:
  capabilities
  get PATH+
  subscribe PATH+
  ((update|replace PATH JSON)|(delete PATH))+";

/// gNMI command-line client.
#[derive(Parser, Debug, Clone)]
#[command(name = "gnmi")]
#[command(version, about, long_about = None, after_help = USAGE)]
pub struct Cli {
    /// Address of the gNMI endpoint.
    #[arg(short, long, env = "GNMI_ADDR", default_value = "localhost:9339")]
    pub addr: String,

    /// Username to authenticate with.
    #[arg(long, env = "GNMI_USERNAME")]
    pub username: Option<String>,

    /// Password to authenticate with.
    #[arg(long, env = "GNMI_PASSWORD")]
    pub password: Option<String>,

    /// Enable TLS.
    #[arg(long)]
    pub tls: bool,

    /// Path to the server CA certificate file.
    #[arg(long)]
    pub cafile: Option<PathBuf>,

    /// Path to the client TLS certificate file.
    #[arg(long)]
    pub certfile: Option<PathBuf>,

    /// Path to the client TLS private key file.
    #[arg(long)]
    pub keyfile: Option<PathBuf>,

    /// Operation tokens: `get PATH+`, `subscribe PATH+`, or a sequence of
    /// `update PATH JSON`, `replace PATH JSON`, and `delete PATH`.
    #[arg(trailing_var_arg = true)]
    pub args: Vec<String>,
}

impl Cli {
    /// Collect the connection-relevant flags into a [`Config`].
    #[must_use]
    pub fn config(&self) -> Config {
        Config {
            addr: self.addr.clone(),
            username: self.username.clone(),
            password: self.password.clone(),
            tls: self.tls,
            cafile: self.cafile.clone(),
            certfile: self.certfile.clone(),
            keyfile: self.keyfile.clone(),
        }
    }
}
