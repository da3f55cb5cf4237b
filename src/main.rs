mod cli;
mod config;
mod extract;
mod lookup;
mod notify;
mod resolver;
mod session;
mod shell;
#[cfg(test)]
mod test_support;

use clap::Parser;
use cli::{Cli, Command};
use config::Settings;
use shell::ResolveOptions;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let settings = match Settings::from_args(&cli.settings) {
        Ok(settings) => settings,
        Err(e) => {
            tracing::error!(error = %e, "invalid configuration");
            eprintln!("knowfetch: {e}");
            std::process::exit(2);
        }
    };

    match cli.command {
        Command::Extract { input } => {
            if let Err(e) = shell::run_extract(&input) {
                tracing::debug!(error = %e, "extract failed");
                eprintln!("knowfetch extract: {e}");
                std::process::exit(1);
            }
        }
        Command::Resolve {
            input,
            copy,
            open,
            download,
            share,
            json,
        } => {
            let options = ResolveOptions {
                copy,
                share,
                open,
                download,
                json,
            };
            if let Err(e) = shell::run_resolve(&settings, input, options).await {
                tracing::error!(error = %e, "resolve failed");
                eprintln!("knowfetch resolve: {e}");
                std::process::exit(1);
            }
        }
        Command::Shell => {
            if let Err(e) = shell::run_shell(&settings).await {
                tracing::error!(error = %e, "shell failed");
                eprintln!("knowfetch shell: {e}");
                std::process::exit(1);
            }
        }
    }
}
