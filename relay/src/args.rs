use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;

/// Chat relay
#[derive(Debug, Parser)]
#[command(name = "relay", about = "Relay chat requests to the Claude API with a server-held credential")]
pub struct Args {
    /// Path to configuration file; defaults and environment are used when absent
    #[arg(short, long, env = "RELAY_CONFIG")]
    pub config: Option<PathBuf>,

    /// Override the listen address
    #[arg(long, env = "RELAY_LISTEN")]
    pub listen: Option<SocketAddr>,

    /// Override only the listen port
    #[arg(short, long, env = "PORT")]
    pub port: Option<u16>,
}

impl Args {
    /// Listen address after applying `--listen` and `--port` on top of `configured`
    pub fn listen_address(&self, configured: SocketAddr) -> SocketAddr {
        let mut address = self.listen.unwrap_or(configured);
        if let Some(port) = self.port {
            address.set_port(port);
        }
        address
    }
}
