use std::path::PathBuf;

use clap::Parser;

/// Murmur voice-cloning speech server
#[derive(Debug, Parser)]
#[command(name = "murmur", about = "Turn text into speech in a cloned voice")]
pub struct Args {
    /// Path to configuration file, built-in defaults when omitted
    #[arg(short, long, env = "MURMUR_CONFIG")]
    pub config: Option<PathBuf>,

    /// Override the listen address
    #[arg(long, env = "MURMUR_LISTEN")]
    pub listen: Option<std::net::SocketAddr>,
}
