use anyhow::{Context, Result};
use colored::Colorize;
use std::fmt::Write as _;
use std::fs;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use airychat_models::ChatRequest;
use crate::{get_logs_dir, mask_api_key, safe_truncate};

const CONSOLE_BODY_LIMIT: usize = 5000;

/// Seconds since the epoch, used to pair request and response log files
pub fn request_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}

fn describe_url(url: &str) -> String {
    let mut out = String::new();
    match reqwest::Url::parse(url) {
        Ok(parsed_url) => {
            let port = parsed_url.port().map(|p| p.to_string()).unwrap_or_else(|| {
                if parsed_url.scheme() == "https" { "443 (default)".to_string() } else { "80 (default)".to_string() }
            });
            let _ = writeln!(out, "URL: {}", url);
            let _ = writeln!(out, "Host: {}", parsed_url.host_str().unwrap_or("unknown"));
            let _ = writeln!(out, "Port: {}", port);
            let _ = writeln!(out, "Scheme: {}", parsed_url.scheme());
        }
        Err(_) => {
            let _ = writeln!(out, "URL: {}", url);
        }
    }
    out
}

fn pretty_body(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|json| serde_json::to_string_pretty(&json).ok())
        .unwrap_or_else(|| body.to_string())
}

fn print_truncated(text: &str) {
    if text.chars().count() > CONSOLE_BODY_LIMIT {
        println!("{}", safe_truncate(text, CONSOLE_BODY_LIMIT));
        println!("\n{}", format!("... (truncated, total {} bytes)", text.len()).bright_black());
    } else {
        println!("{}", text);
    }
}

/// Log HTTP request details for debugging (console output)
pub fn log_request(url: &str, request: &ChatRequest, api_key: &str, verbose: bool) {
    if !verbose {
        return;
    }

    println!("\n{}", "═".repeat(80).bright_cyan());
    println!("{}", "🔍 HTTP REQUEST DEBUG".bright_cyan().bold());
    println!("{}", "═".repeat(80).bright_cyan());
    print!("{}", describe_url(url));

    println!("\n{}", "Headers:".bright_yellow());
    println!("  Content-Type: application/json");
    println!("  Authorization: Bearer {}", mask_api_key(api_key));

    println!("\n{}", "Request Body:".bright_yellow());
    match serde_json::to_string_pretty(request) {
        Ok(json) => print_truncated(&json),
        Err(e) => println!("{}", format!("Error serializing request: {}", e).red()),
    }

    println!("{}", "═".repeat(80).bright_cyan());
    println!();
}

/// Log HTTP response details for debugging (console output)
pub fn log_response(status: reqwest::StatusCode, body: &str, verbose: bool) {
    if !verbose {
        return;
    }

    println!("\n{}", "═".repeat(80).bright_green());
    println!("{}", "📥 HTTP RESPONSE DEBUG".bright_green().bold());
    println!("{}", "═".repeat(80).bright_green());

    println!("{}: {} {}",
        "Status".bright_yellow(),
        status.as_u16(),
        status.canonical_reason().unwrap_or("Unknown")
    );

    println!("\n{}", "Response Body:".bright_yellow());
    print_truncated(&pretty_body(body));

    println!("{}", "═".repeat(80).bright_green());
    println!();
}

/// Render the request log file body
pub fn format_request_log(url: &str, request: &ChatRequest, api_key: &str, timestamp: u64) -> String {
    let mut log_content = String::new();
    log_content.push_str("HTTP REQUEST LOG\n");
    log_content.push_str("================\n\n");
    let _ = writeln!(log_content, "Timestamp: {}", timestamp);
    let _ = writeln!(log_content, "Model: {}\n", request.model);
    log_content.push_str(&describe_url(url));
    log_content.push('\n');

    log_content.push_str("Headers:\n");
    log_content.push_str("  Content-Type: application/json\n");
    let _ = writeln!(log_content, "  Authorization: Bearer {}\n", mask_api_key(api_key));

    log_content.push_str("Request Body:\n");
    match serde_json::to_string_pretty(request) {
        Ok(json) => {
            log_content.push_str(&json);
            log_content.push('\n');
        }
        Err(e) => {
            let _ = writeln!(log_content, "Error serializing request: {}", e);
        }
    }
    log_content
}

/// Log HTTP request to file for persistent debugging
pub fn log_request_to_file(url: &str, request: &ChatRequest, api_key: &str, timestamp: u64) -> Result<PathBuf> {
    let logs_dir = get_logs_dir()?;

    let model_name = request.model.replace('/', "-");
    let file_path = logs_dir.join(format!("req-{}-{}.txt", timestamp, model_name));

    fs::write(&file_path, format_request_log(url, request, api_key, timestamp))
        .with_context(|| format!("Failed to write request log to {}", file_path.display()))?;

    tracing::debug!("request logged to {}", file_path.display());
    Ok(file_path)
}

/// Log HTTP response to file for persistent debugging
pub fn log_response_to_file(
    status: reqwest::StatusCode,
    body: &str,
    request_timestamp: u64,
    model: &str,
) -> Result<PathBuf> {
    let logs_dir = get_logs_dir()?;

    // Same timestamp and model as the matching request file
    let model_name = model.replace('/', "-");
    let file_path = logs_dir.join(format!("resp-{}-{}.txt", request_timestamp, model_name));

    let mut log_content = String::new();
    log_content.push_str("HTTP RESPONSE LOG\n");
    log_content.push_str("=================\n\n");
    let _ = writeln!(log_content, "Timestamp: {}", request_timestamp);
    let _ = writeln!(log_content, "Model: {}\n", model);
    let _ = writeln!(log_content, "Status: {} {}\n",
        status.as_u16(),
        status.canonical_reason().unwrap_or("Unknown")
    );
    log_content.push_str("Response Body:\n");
    log_content.push_str(&pretty_body(body));
    log_content.push('\n');
    let _ = writeln!(log_content, "\n---\nResponse Size: {} bytes", body.len());

    fs::write(&file_path, log_content)
        .with_context(|| format!("Failed to write response log to {}", file_path.display()))?;

    tracing::debug!("response logged to {}", file_path.display());
    Ok(file_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_request_log_masks_key_and_shows_body() {
        let request = ChatRequest::single_prompt("llama3-8b-8192", "2+2?");
        let log = format_request_log(
            "https://api.groq.com/openai/v1/chat/completions",
            &request,
            "gsk_secretsecretsecret",
            1_700_000_000,
        );

        assert!(log.contains("Timestamp: 1700000000"));
        assert!(log.contains("Host: api.groq.com"));
        assert!(log.contains("Port: 443 (default)"));
        assert!(log.contains("Bearer gsk_secret***"));
        assert!(!log.contains("gsk_secretsecretsecret"));
        assert!(log.contains("\"content\": \"2+2?\""));
    }

    #[test]
    fn test_request_log_unparseable_url() {
        let request = ChatRequest::single_prompt("m", "p");
        let log = format_request_log("not a url", &request, "k", 1);
        assert!(log.contains("URL: not a url"));
        assert!(!log.contains("Host:"));
    }

    #[test]
    fn test_pretty_body_falls_back_to_raw() {
        assert_eq!(pretty_body("plain text"), "plain text");
        assert!(pretty_body("{\"a\":1}").contains("\"a\": 1"));
    }

    #[test]
    #[serial]
    fn test_request_and_response_files_share_timestamp() {
        let temp = tempfile::TempDir::new().unwrap();
        let old_home = std::env::var("HOME").ok();
        std::env::set_var("HOME", temp.path());

        let request = ChatRequest::single_prompt("meta/llama", "hi");
        let req_path = log_request_to_file("http://localhost:1/v1/chat/completions", &request, "key", 42).unwrap();
        let resp_path = log_response_to_file(reqwest::StatusCode::OK, "{}", 42, "meta/llama").unwrap();

        assert!(req_path.ends_with("req-42-meta-llama.txt"));
        assert!(resp_path.ends_with("resp-42-meta-llama.txt"));
        let resp = std::fs::read_to_string(resp_path).unwrap();
        assert!(resp.contains("Status: 200 OK"));

        match old_home {
            Some(home) => std::env::set_var("HOME", home),
            None => std::env::remove_var("HOME"),
        }
    }
}
