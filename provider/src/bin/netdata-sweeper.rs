//! netdata-sweeper: revoke every pending invitation of a space.
//!
//! Reads `NETDATA_CLOUD_URL` and `NETDATA_CLOUD_AUTH_TOKEN` like the provider.

use std::process::ExitCode;

use clap::Parser;
use netdata_provider::{init_logging, sweep_invitations, ProviderConfig, ProviderError, ProviderSettings, SPACE_ID_ENV};
use tracing::error;

#[derive(Parser, Debug)]
#[command(name = "netdata-sweeper", version, about, long_about = None)]
struct Args {
    /// Space whose pending invitations are revoked.
    #[arg(long, env = SPACE_ID_ENV)]
    space_id: String,

    /// Overrides NETDATA_CLOUD_URL.
    #[arg(long)]
    url: Option<String>,
}

fn run(args: &Args) -> Result<usize, ProviderError> {
    let config = ProviderConfig::load(&ProviderSettings {
        url: args.url.clone(),
        auth_token: None,
    })?;
    sweep_invitations(&config.client(), &args.space_id)
}

fn main() -> ExitCode {
    let args = Args::parse();
    if let Err(e) = init_logging() {
        eprintln!("netdata-sweeper: {e}");
        return ExitCode::FAILURE;
    }

    match run(&args) {
        Ok(count) => {
            println!("revoked {count} invitation(s) in space {}", args.space_id);
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "sweep failed");
            ExitCode::FAILURE
        }
    }
}
