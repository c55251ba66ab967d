use std::{io::IsTerminal, process::ExitCode};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::warn;

use tcp_messenger::{LoopExit, Role, Session, cli::Cli, establish};

fn init_tracing() {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .try_init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing();

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to start the async runtime")
    {
        Ok(runtime) => runtime,
        Err(err) => {
            eprintln!("Error: {err:#}");
            return ExitCode::FAILURE;
        }
    };

    let outcome = runtime.block_on(run(cli));

    // Don't wait on a receive task or a stdin read that is still blocked.
    runtime.shutdown_background();

    // Fatal errors bypass the log filter so RUST_LOG can't hide them.
    match outcome {
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<LoopExit> {
    let role = cli.role();
    if let (Role::Listener { .. }, Some(address)) = (&role, &cli.address) {
        warn!("ignoring address {address}, it is only used when connecting");
    }

    let connection = establish(&role)
        .await
        .context("error setting up the connection")?;

    let session = Session::new(connection);
    Ok(session.run(tokio::io::stdin(), tokio::io::stdout()).await)
}
