use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "netadmin",
    about = "Network administration API: VLAN records over REST",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Start the API server
    Serve(ServeArgs),
    /// Load and validate a store file without serving it
    Check(StoreArgs),
    /// Print the records in a store file
    List(StoreArgs),
}

#[derive(Args)]
pub struct ServeArgs {
    /// TOML config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// Listen address; overrides the config file and PORT
    #[arg(long)]
    pub bind: Option<SocketAddr>,
    /// Store file; overrides the config file and VLAN_STORE_PATH
    #[arg(long)]
    pub store: Option<PathBuf>,
}

#[derive(Args)]
pub struct StoreArgs {
    #[arg(long, env = "VLAN_STORE_PATH", default_value = "vlans.json")]
    pub store: PathBuf,
}
