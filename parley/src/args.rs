use std::path::PathBuf;

use clap::Parser;

/// Parley chat relay server
#[derive(Debug, Parser)]
#[command(name = "parley", about = "Chat relay between a conversational UI and generation backends")]
pub struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "parley.toml", env = "PARLEY_CONFIG")]
    pub config: PathBuf,

    /// Override the listen address
    #[arg(long, env = "PARLEY_LISTEN")]
    pub listen: Option<std::net::SocketAddr>,
}
