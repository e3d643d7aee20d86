mod config;
mod serve;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use commission_core::codec::header_row;
use tracing_subscriber::EnvFilter;

/// Commissioning submission service.
#[derive(Parser)]
#[command(
    name = "commission",
    version,
    about = "Commissioning submission intake and review service"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP API server
    Serve {
        /// Port to listen on (default 8080, or [server] port from --config)
        #[arg(long)]
        port: Option<u16>,
        /// Path to a TOML config file
        #[arg(long)]
        config: Option<PathBuf>,
        /// Keep submissions in process memory instead of Google Sheets
        #[arg(long)]
        memory: bool,
        /// Path to TLS certificate PEM file (requires --tls-key)
        #[arg(long)]
        tls_cert: Option<PathBuf>,
        /// Path to TLS private key PEM file (requires --tls-cert)
        #[arg(long)]
        tls_key: Option<PathBuf>,
    },

    /// Print the sheet header row, tab-separated, for setting up a new sheet
    Headers,
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "info,commission=debug".into()),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve {
            port,
            config,
            memory,
            tls_cert,
            tls_key,
        } => {
            // Validate TLS flags: both must be provided or neither
            if tls_cert.is_some() != tls_key.is_some() {
                eprintln!("error: --tls-cert and --tls-key must both be provided");
                process::exit(1);
            }
            init_tracing();

            let file = match config {
                Some(path) => match config::read_config(&path) {
                    Ok(file) => file,
                    Err(e) => {
                        eprintln!("error: {}", e);
                        process::exit(1);
                    }
                },
                None => config::FileConfig::default(),
            };
            let settings = match config::resolve(port, memory, file, |key| std::env::var(key).ok())
            {
                Ok(settings) => settings,
                Err(e) => {
                    eprintln!("error: {}", e);
                    process::exit(1);
                }
            };

            let rt = match tokio::runtime::Runtime::new() {
                Ok(rt) => rt,
                Err(e) => {
                    eprintln!("error: failed to create tokio runtime: {}", e);
                    process::exit(1);
                }
            };
            if let Err(e) = rt.block_on(serve::start_server(settings, tls_cert, tls_key)) {
                eprintln!("Server error: {}", e);
                process::exit(1);
            }
        }
        Commands::Headers => {
            println!("{}", header_row().join("\t"));
        }
    }
}
