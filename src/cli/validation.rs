use crate::cli::args::{CliArgs, Command};
use crate::output::OutputFormat;

const PRIORITIES: [&str; 4] = ["low", "medium", "high", "critical"];

pub fn validate(args: &CliArgs) -> Result<(), String> {
    if let Some(timeout) = args.timeout {
        if timeout == 0 {
            return Err("invalid --timeout, expected positive integer".to_string());
        }
    }
    if let Some(url) = args.base_url.as_deref() {
        reqwest::Url::parse(url.trim()).map_err(|e| format!("invalid --base-url '{url}': {e}"))?;
    }
    match args.command.as_ref() {
        Some(Command::List(list)) => {
            if let Some(raw) = list.format.as_deref() {
                OutputFormat::parse(raw).ok_or_else(|| {
                    format!("invalid --format '{raw}', expected text, json or html")
                })?;
            }
            if let Some(raw) = list.priority.as_deref() {
                if !raw.is_empty() && !PRIORITIES.contains(&raw) {
                    return Err(format!(
                        "invalid --priority '{raw}', expected low, medium, high or critical"
                    ));
                }
            }
        }
        Some(Command::Add(add)) => {
            if !PRIORITIES.contains(&add.priority.as_str()) {
                return Err(format!(
                    "invalid --priority '{}', expected low, medium, high or critical",
                    add.priority
                ));
            }
        }
        _ => {}
    }
    Ok(())
}
