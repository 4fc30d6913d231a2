use std::io::{BufRead, Write};

use sampling_sandbox::command::{execute_json, execute_json_batch, CommandResponse};
use sampling_sandbox::fixtures::default_scenario;
use sampling_sandbox::scenario::Scenario;
use sampling_sandbox::settings::SandboxSettings;
use sampling_sandbox::state::Session;

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sampling_sandbox=info".into()),
        )
        .init();

    let loaded = match parse_scenario_arg() {
        Some(scenario) => Ok(scenario),
        None => Scenario::load(default_scenario()),
    };
    let scenario = match loaded {
        Ok(scenario) => scenario,
        Err(e) => {
            tracing::error!("Default scenario is invalid: {e}");
            std::process::exit(1);
        }
    };
    tracing::info!("Scenario '{}' ready", scenario.id());

    let mut session = Session::new(scenario, SandboxSettings::load());
    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout().lock();

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                tracing::error!("Failed to read stdin: {e}");
                break;
            }
        };
        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        let output = if input.starts_with('[') {
            match execute_json_batch(&mut session, input) {
                Ok(responses) => serde_json::to_string(&responses),
                Err(e) => serde_json::to_string(&error_response(e)),
            }
        } else {
            match execute_json(&mut session, input) {
                Ok(response) => serde_json::to_string(&response),
                Err(e) => serde_json::to_string(&error_response(e)),
            }
        };

        match output {
            Ok(json) => {
                if writeln!(stdout, "{json}").is_err() {
                    break;
                }
            }
            Err(e) => tracing::error!("Failed to serialize response: {e}"),
        }
    }
}

fn error_response(msg: String) -> CommandResponse {
    CommandResponse {
        success: false,
        error: Some(msg),
        data: None,
    }
}

/// `--scenario <path>`; `None` (default scenario) when absent or unreadable
fn parse_scenario_arg() -> Option<Scenario> {
    let args: Vec<String> = std::env::args().collect();
    let mut i = 1;
    while i < args.len() {
        if args[i] == "--scenario" && i + 1 < args.len() {
            let path = &args[i + 1];
            match std::fs::read_to_string(path) {
                Ok(json) => match Scenario::from_json(&json) {
                    Ok(scenario) => {
                        tracing::info!(
                            "Loaded scenario from {path} ({} valid regions)",
                            scenario.valid_regions().len()
                        );
                        return Some(scenario);
                    }
                    Err(e) => {
                        tracing::error!("Invalid scenario in {path}, using default: {e}");
                    }
                },
                Err(e) => {
                    tracing::error!("Failed to read scenario file {path}: {e}");
                }
            }
            break;
        }
        i += 1;
    }
    None
}
