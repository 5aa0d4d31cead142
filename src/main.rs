//! Command-line client for the Hola tunnel API
//!
//! # Usage
//!
//! ## Tunnel (default)
//! ```bash
//! hola-tunnel tunnel --country de
//! hola-tunnel --uuid <UUID> --session-key <KEY> tunnel --country us --url
//! ```
//!
//! ## Session
//! ```bash
//! hola-tunnel session
//! ```

use clap::{Parser, Subcommand};

use hola_tunnel::cli::{
    CommonArgs,
    session::{SessionArgs, run_session_mode},
    tunnel::{TunnelArgs, run_tunnel_mode},
};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(name = "hola-tunnel")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Configuration file path
    #[arg(long, global = true, value_name = "CONFIG")]
    config: Option<String>,

    /// Device id of a stored session
    #[arg(long, global = true, value_name = "UUID", requires = "session_key")]
    uuid: Option<String>,

    /// Session key of a stored session
    #[arg(long, global = true, value_name = "SESSION_KEY", requires = "uuid")]
    session_key: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Establish or validate a session and print its credentials
    Session,

    /// Request a tunnel for a country
    Tunnel {
        /// Country code (defaults to the configured default country)
        #[arg(short, long, value_name = "COUNTRY")]
        country: Option<String>,

        /// Print a proxy URL instead of JSON
        #[arg(long)]
        url: bool,

        /// Proxy URL scheme used with --url
        #[arg(long, default_value = "https", requires = "url")]
        scheme: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let common = CommonArgs {
        config: cli.config,
        uuid: cli.uuid,
        session_key: cli.session_key,
        verbose: cli.verbose,
    };

    match cli.command {
        Some(Commands::Session) => run_session_mode(SessionArgs { common }).await,
        Some(Commands::Tunnel {
            country,
            url,
            scheme,
        }) => {
            let args = TunnelArgs {
                common,
                country,
                url,
                scheme,
            };
            run_tunnel_mode(args).await
        }
        None => {
            // Default: tunnel for the configured default country
            let args = TunnelArgs {
                common,
                country: None,
                url: false,
                scheme: "https".to_string(),
            };
            run_tunnel_mode(args).await
        }
    }
}
