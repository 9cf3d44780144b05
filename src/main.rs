use clap::Parser;
use postie::infrastructure::http_client::HyperHttpClient;
use postie::infrastructure::logging::setup_tracing;
use postie::presentation::cli::Cli;
use postie::RequestExecutor;
use std::process::ExitCode;

/// postie: send one HTTP request, see status, timing, headers and body
///
/// Runs as a one-shot command, or with `--interactive` as a terminal form
/// with toggleable headers and a response panel.
#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match cli.config() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{}", err);
            return ExitCode::FAILURE;
        }
    };

    // The form owns the terminal; log lines would corrupt it.
    if !cli.interactive {
        setup_tracing(config.verbose);
    }

    let mut executor = RequestExecutor::new(Box::new(HyperHttpClient::new()));
    if let Some(timeout) = config.timeout {
        executor = executor.with_timeout(timeout);
    }

    match cli.run(executor, &config).await {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{}", err);
            ExitCode::FAILURE
        }
    }
}
