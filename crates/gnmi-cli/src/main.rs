//! gNMI CLI binary entrypoint.

use std::io::{self, Write};
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use gnmi_cli::cli::{Cli, USAGE};
use gnmi_cli::client::DeviceClient;
use gnmi_cli::error::CliError;
use gnmi_cli::ops::{Intent, parse_operations};
use gnmi_cli::commands;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("failed to create async runtime: {e}");
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(run(cli)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if matches!(e, CliError::Usage(_)) {
                eprintln!("{USAGE}");
            }
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    // Grammar violations must fail before anything is dialed.
    let intent = parse_operations(&cli.args)?;
    let config = cli.config();
    let mut stdout = io::stdout().lock();

    let result = match intent {
        Intent::Get(paths) => {
            let mut client = DeviceClient::dial(&config).await?;
            commands::get::run(&mut client, &mut stdout, &paths).await
        }
        Intent::Subscribe(paths) => {
            let client = DeviceClient::dial(&config).await?;
            commands::subscribe::run(client, &mut stdout, &paths).await
        }
        Intent::Set(operations) => {
            let mut client = DeviceClient::dial(&config).await?;
            commands::set::run(&mut client, &operations).await
        }
    };

    stdout.flush()?;
    result
}
