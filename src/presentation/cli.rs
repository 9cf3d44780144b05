use crate::application::builders::request_builder::RequestBuilder;
use crate::application::services::RequestExecutor;
use crate::domain::entities::RequestDescription;
use crate::infrastructure::config::Config;
use crate::infrastructure::output;
use crate::presentation::tui::{self, app::App};
use anyhow::{Result, anyhow};
use clap::Parser;
use colored::Colorize;
use std::process::ExitCode;

/// CLI configuration for postie
#[derive(Parser, Debug)]
#[command(name = "postie", version)]
#[command(about = "postie: send an HTTP request and inspect the response", long_about = None)]
pub struct Cli {
    /// Target URL (optional with --interactive)
    pub url: Option<String>,

    #[arg(short = 'X', long, default_value = "GET")]
    pub method: String,

    /// Header as 'Key: Value'; prefix with '!' to keep it but not send it
    #[arg(short = 'H', long = "header")]
    pub headers: Vec<String>,

    /// Request body; '@path' reads it from a file
    #[arg(short = 'd', long = "data")]
    pub body: Option<String>,

    /// Validate the body as JSON and default the content type
    #[arg(long)]
    pub json: bool,

    /// Give up after this many milliseconds
    #[arg(short = 't', long = "timeout", value_name = "MS")]
    pub timeout_ms: Option<u64>,

    #[arg(short, long)]
    pub verbose: bool,

    /// Write the response body to a file
    #[arg(short, long)]
    pub output: Option<String>,

    /// Print the whole outcome as JSON
    #[arg(long)]
    pub report: bool,

    /// Open the interactive request form
    #[arg(short, long)]
    pub interactive: bool,
}

impl Cli {
    pub fn config(&self) -> Result<Config> {
        Config::new(self.timeout_ms, self.verbose, self.report)
    }

    pub fn build_request(&self) -> Result<RequestDescription> {
        let url = self
            .url
            .as_deref()
            .ok_or_else(|| anyhow!("A URL is required unless --interactive is given"))?;

        RequestBuilder::new()
            .method(&self.method)
            .url(url)
            .headers(&self.headers)?
            .body(&self.body)?
            .json(self.json)
            .build()
    }

    pub async fn run(&self, executor: RequestExecutor, config: &Config) -> Result<ExitCode> {
        if self.interactive {
            return self.run_interactive(executor).await;
        }

        let request = self.build_request()?;
        let result = executor.send(request).await;

        if config.report {
            println!("{}", output::render_report(&result)?);
            return Ok(if result.is_ok() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            });
        }

        let response = match result {
            Ok(response) => response,
            Err(error) => {
                output::print_error(&error);
                return Ok(ExitCode::FAILURE);
            }
        };

        match &self.output {
            Some(path) => {
                std::fs::write(path, &response.body)?;
                if config.verbose {
                    output::print_summary(&response);
                }
                println!("{}", format!("Saved response to {}", path).dimmed());
            }
            None => output::print_response(&response, config.verbose),
        }

        Ok(ExitCode::SUCCESS)
    }

    async fn run_interactive(&self, executor: RequestExecutor) -> Result<ExitCode> {
        let app = match self.url {
            Some(_) => App::new(self.build_request()?),
            None => App::default(),
        };
        let runtime = tokio::runtime::Handle::current();

        tokio::task::spawn_blocking(move || tui::run(runtime, executor, app))
            .await
            .map_err(|e| anyhow!("Interactive session crashed: {}", e))??;

        Ok(ExitCode::SUCCESS)
    }
}
