use crate::domain::entities::{ResponseDescription, StatusClass};
use crate::domain::errors::ErrorDescription;
use anyhow::{Result, anyhow};
use colored::{ColoredString, Colorize};
use serde::Serialize;
use serde_json::Value;

/// Status line shown for failed sends.
pub const ERROR_BADGE: &str = "0 Error";

/// Pretty-prints JSON bodies; anything else comes back untouched.
pub fn format_body(body: &str) -> String {
    pretty_json(body).unwrap_or_else(|| body.to_string())
}

fn pretty_json(body: &str) -> Option<String> {
    let json = serde_json::from_str::<Value>(body).ok()?;
    serde_json::to_string_pretty(&json).ok()
}

pub fn format_elapsed(elapsed_ms: f64) -> String {
    format!("{:.2}ms", elapsed_ms)
}

pub fn format_headers(headers: &[(String, String)]) -> String {
    headers
        .iter()
        .map(|(key, value)| format!("{}: {}", key, value))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn status_label(response: &ResponseDescription) -> String {
    if response.status_text.is_empty() {
        response.status.to_string()
    } else {
        format!("{} {}", response.status, response.status_text)
    }
}

fn status_badge(response: &ResponseDescription) -> ColoredString {
    let label = status_label(response);
    match response.status_class() {
        StatusClass::Success => label.green().bold(),
        StatusClass::Redirection => label.yellow().bold(),
        StatusClass::ClientError | StatusClass::ServerError => label.red().bold(),
        StatusClass::Informational => label.cyan().bold(),
    }
}

/// Status badge, timing and headers.
pub fn print_summary(response: &ResponseDescription) {
    println!(
        "{}  {}",
        status_badge(response),
        format_elapsed(response.elapsed_ms).dimmed()
    );
    if !response.headers.is_empty() {
        println!("{}", format_headers(&response.headers).cyan());
    }
}

pub fn print_response(response: &ResponseDescription, verbose: bool) {
    if verbose {
        print_summary(response);
        println!();
    }
    print_response_body(&response.body);
}

pub fn print_response_body(body: &str) {
    match pretty_json(body) {
        Some(pretty) => println!("{}", pretty.green()),
        None => println!("{}", body.white()),
    }
}

pub fn print_error(error: &ErrorDescription) {
    eprintln!("{}  {}", ERROR_BADGE.red().bold(), error.kind.to_string().dimmed());
    eprintln!("{}", error.message.red());
}

/// The full outcome of a send, serialized for `--report`.
#[derive(Debug, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Report<'a> {
    Response(&'a ResponseDescription),
    Error(&'a ErrorDescription),
}

impl<'a> From<&'a Result<ResponseDescription, ErrorDescription>> for Report<'a> {
    fn from(result: &'a Result<ResponseDescription, ErrorDescription>) -> Self {
        match result {
            Ok(response) => Report::Response(response),
            Err(error) => Report::Error(error),
        }
    }
}

pub fn render_report(result: &Result<ResponseDescription, ErrorDescription>) -> Result<String> {
    serde_json::to_string_pretty(&Report::from(result))
        .map_err(|e| anyhow!("Failed to format report: {}", e))
}
