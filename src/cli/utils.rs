use async_trait::async_trait;
use serde_json::{json, Value};
use std::io::{BufRead, Write};

use crate::cli::OutputFormat;
use crate::client::screens::Confirm;
use crate::types::{Record, UserProfile};

/// Output a success message in the appropriate format
pub fn output_success(
    output_format: &OutputFormat,
    message: &str,
    data: Option<Value>,
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({
                "success": true,
                "message": message
            });

            if let (Some(response), Some(Value::Object(extra))) = (response.as_object_mut(), data) {
                response.extend(extra);
            }

            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            println!("✓ {}", message);
        }
    }
    Ok(())
}

/// Output an error message in the appropriate format
pub fn output_error(output_format: &OutputFormat, message: &str) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let response = json!({
                "success": false,
                "error": message
            });
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            eprintln!("Error: {}", message);
        }
    }
    Ok(())
}

/// Output an empty collection in the appropriate format
pub fn output_empty_collection(
    output_format: &OutputFormat,
    collection_name: &str,
    message: &str,
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&json!({
                collection_name: []
            }))?);
        }
        OutputFormat::Text => {
            println!("{}", message);
        }
    }
    Ok(())
}

pub fn output_records(output_format: &OutputFormat, records: &[&Record]) -> anyhow::Result<()> {
    if records.is_empty() {
        return output_empty_collection(output_format, "records", "No records found");
    }

    match output_format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&json!({ "records": records }))?);
        }
        OutputFormat::Text => {
            let width = records
                .iter()
                .map(|r| r.title.chars().count())
                .max()
                .unwrap_or(0)
                .clamp(5, 40);

            println!("{:>4}  {:<width$}  DESCRIPTION", "ID", "TITLE", width = width);
            for record in records {
                println!(
                    "{:>4}  {:<width$}  {}",
                    record.id,
                    truncate(&record.title, width),
                    truncate(&record.description, 60),
                    width = width
                );
            }
        }
    }
    Ok(())
}

pub fn output_record(output_format: &OutputFormat, record: &Record) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(record)?);
        }
        OutputFormat::Text => {
            println!("#{} {}", record.id, record.title);
            println!("{}", record.description);
        }
    }
    Ok(())
}

pub fn output_profile(output_format: &OutputFormat, profile: &UserProfile) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&json!({ "profile": profile }))?);
        }
        OutputFormat::Text => {
            println!("Name:  {}", profile.name);
            println!("Email: {}", profile.email);
            println!("Theme: {}", profile.preferences.theme);
        }
    }
    Ok(())
}

fn truncate(value: &str, max: usize) -> String {
    if value.chars().count() <= max {
        return value.to_string();
    }
    let cut: String = value.chars().take(max.saturating_sub(1)).collect();
    format!("{}…", cut)
}

/// Read one line from stdin after printing `prompt` to stderr
pub async fn prompt_line(prompt: &str) -> anyhow::Result<String> {
    let prompt = prompt.to_string();
    let line = tokio::task::spawn_blocking(move || -> std::io::Result<String> {
        let mut stderr = std::io::stderr();
        write!(stderr, "{}", prompt)?;
        stderr.flush()?;

        let mut line = String::new();
        std::io::stdin().lock().read_line(&mut line)?;
        Ok(line)
    })
    .await??;

    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

/// Take `value` if given, otherwise ask for it
pub async fn value_or_prompt(value: Option<String>, prompt: &str) -> anyhow::Result<String> {
    match value {
        Some(value) => Ok(value),
        None => prompt_line(prompt).await,
    }
}

/// y/N confirmation on the terminal
pub struct TerminalConfirm;

#[async_trait]
impl Confirm for TerminalConfirm {
    async fn confirm(&self, prompt: &str) -> bool {
        match prompt_line(&format!("{} [y/N] ", prompt)).await {
            Ok(answer) => matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"),
            Err(e) => {
                tracing::warn!("Could not read confirmation: {}", e);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncates_long_text() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdefghij", 5), "abcd…");
    }
}
