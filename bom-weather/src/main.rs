use std::process::ExitCode;

use bom_weather::{ServiceConfig, WeatherRequest, WeatherService};
use tracing_subscriber::EnvFilter;

const USAGE: &str = "\
usage: bom-weather <location> <state> <date_from> [date_to]
       bom-weather states

Dates are YYYY-MM-DD. Configuration is read from BOM_* environment
variables; log level from RUST_LOG (default: info).";

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();

    let request = match args.as_slice() {
        [cmd] if cmd == "states" => {
            return print_json(&bom_weather::domain::AustralianState::all());
        }
        [location, state, from] => WeatherRequest::day(location, state, from),
        [location, state, from, to] => WeatherRequest::range(location, state, from, to),
        _ => {
            eprintln!("{USAGE}");
            return ExitCode::from(2);
        }
    };

    let config = match ServiceConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let service = match WeatherService::new(config) {
        Ok(service) => service,
        Err(e) => {
            eprintln!("Failed to create agency client: {e}");
            return ExitCode::FAILURE;
        }
    };

    let result = service.get_weather_data(&request).await;
    tracing::debug!(session = ?service.session_info(), "session");

    let code = print_json(&result);
    if result.success { code } else { ExitCode::FAILURE }
}

fn print_json<T: serde::Serialize>(value: &T) -> ExitCode {
    match serde_json::to_string_pretty(value) {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Failed to serialize output: {e}");
            ExitCode::FAILURE
        }
    }
}
