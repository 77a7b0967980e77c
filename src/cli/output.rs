//! Terminal output formatting with colors
//!
//! Respects NO_COLOR, CLICOLOR, CLICOLOR_FORCE automatically.

use colored::Colorize;
use serde::Serialize;

use crate::application::ApplicationError;
use crate::cli::{CliResult, OutputFormat};
use crate::domain::{Endpoint, EnvironmentRecord, JobView};

/// Print error (red bold "error:" prefix) to stderr
pub fn error(msg: &(impl std::fmt::Display + ?Sized)) {
    eprintln!("{}: {}", "error".red().bold(), msg);
}

/// Print success status (green checkmark)
pub fn success(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("{} {}", "✓".green(), msg);
}

/// Print section header (cyan bold)
pub fn header(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("{}", msg.to_string().cyan().bold());
}

/// Print an aligned `key : value` line
pub fn field(key: &str, value: &(impl std::fmt::Display + ?Sized)) {
    println!("{:<52}: {}", key, value);
}

/// Text of the `--what-if` report for one operation
pub fn what_if_message(action: &str, target: &str) -> String {
    format!(
        "Performing the operation \"{}\" on target \"{}\".",
        action, target
    )
}

/// Print a `--what-if` report (yellow prefix) to stderr
pub fn what_if(action: &str, target: &str) {
    eprintln!("{}: {}", "What if".yellow(), what_if_message(action, target));
}

/// Print plain output (no color, for data)
pub fn info(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("{}", msg);
}

fn json<T: Serialize + ?Sized>(value: &T) -> CliResult<()> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|e| ApplicationError::OperationFailed {
            context: "render JSON".to_string(),
            source: Box::new(e),
        })?;
    info(&text);
    Ok(())
}

/// Render one environment.
pub fn environment(record: &EnvironmentRecord, format: OutputFormat) -> CliResult<()> {
    match format {
        OutputFormat::Json => json(record),
        OutputFormat::Text => {
            field("Name", &record.name);
            field("EnableAdfsAuthentication", &record.on_premise);
            for (endpoint, value) in &record.endpoints {
                field(endpoint.label(), value);
            }
            Ok(())
        }
    }
}

/// Render a list of environments.
pub fn environments(records: &[EnvironmentRecord], format: OutputFormat) -> CliResult<()> {
    match format {
        OutputFormat::Json => json(records),
        OutputFormat::Text => {
            if records.is_empty() {
                info("No environments stored");
            }
            for record in records {
                let arm = record
                    .endpoint(Endpoint::ResourceManager)
                    .unwrap_or("-");
                println!("{:<24} {}", record.name.bold(), arm);
            }
            Ok(())
        }
    }
}

/// Render a job.
pub fn job(view: &JobView, format: OutputFormat) -> CliResult<()> {
    match format {
        OutputFormat::Json => json(view),
        OutputFormat::Text => {
            let opt = |v: &Option<String>| v.clone().unwrap_or_default();
            field("Name", &view.name);
            field("ID", &view.id);
            field("Type", &opt(&view.kind));
            field("JobType", &opt(&view.job_type));
            field("DisplayName", &opt(&view.display_name));
            field("ClientRequestId", &opt(&view.client_request_id));
            field("State", &opt(&view.state));
            field("StateDescription", &opt(&view.state_description));
            field(
                "StartTime",
                &view.start_time.map(|t| t.to_rfc3339()).unwrap_or_default(),
            );
            field(
                "EndTime",
                &view.end_time.map(|t| t.to_rfc3339()).unwrap_or_default(),
            );
            field("TargetObjectId", &opt(&view.target_object_id));
            field("TargetObjectType", &opt(&view.target_object_type));
            field("TargetObjectName", &opt(&view.target_object_name));
            field("AllowedActions", &format!("{{{}}}", view.allowed_actions.join(", ")));
            field("Tasks", &format!("{{{}}}", view.tasks.join(", ")));
            field("Errors", &format!("{{{}}}", view.errors.join(", ")));
            Ok(())
        }
    }
}
