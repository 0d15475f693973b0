//! Integration tests for the `memory-bank` CLI binary.

use serde_json::Value;
use std::fs;
use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

const RULES: &str = "## Core Files

### 5. Tech Context (techContext.md)
**Purpose**: Technologies used
**Structure**:
- Stack
- Development Setup
";

fn write_file(path: &Path, content: &str) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content)?;
    Ok(())
}

fn memory_bank_cmd(root: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_memory-bank"));
    cmd.env("PRJ_CONFIG_HOME", root.join(".config"));
    cmd.env_remove("RUST_LOG");
    cmd.arg("--root").arg(root);
    cmd
}

fn run_json(cmd: &mut Command) -> Result<Value, Box<dyn std::error::Error>> {
    let output = cmd.output()?;
    assert!(
        output.status.success(),
        "memory-bank failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8(output.stdout)?;
    Ok(serde_json::from_str(&stdout)?)
}

#[test]
fn test_memory_bank_init_writes_every_document() -> Result<(), Box<dyn std::error::Error>> {
    let tmp = TempDir::new()?;
    write_file(&tmp.path().join(".clinerules"), RULES)?;

    let payload = run_json(memory_bank_cmd(tmp.path()).arg("init"))?;
    let written = payload
        .get("written")
        .and_then(Value::as_array)
        .ok_or("missing written list")?;
    assert_eq!(written.len(), 6);
    assert!(written.iter().any(|name| name.as_str() == Some("techContext")));

    let tech = fs::read_to_string(tmp.path().join("memory-bank/techContext.md"))?;
    assert!(tech.starts_with("# Tech Context\n\n> Technologies used\n"));
    assert!(tech.contains("## Development Setup\n"));

    let again = run_json(memory_bank_cmd(tmp.path()).arg("init"))?;
    assert_eq!(
        again
            .get("written")
            .and_then(Value::as_array)
            .map(Vec::len),
        Some(0)
    );
    Ok(())
}

#[test]
fn test_memory_bank_search_returns_hits() -> Result<(), Box<dyn std::error::Error>> {
    let tmp = TempDir::new()?;
    write_file(
        &tmp.path().join("memory-bank/techContext.md"),
        "# Tech Context\n\n## Stack\n\nWe use PostgreSQL for storage.\n",
    )?;

    let payload = run_json(
        memory_bank_cmd(tmp.path())
            .arg("search")
            .arg("PostgreSQL for storage"),
    )?;
    assert_eq!(
        payload.get("query").and_then(Value::as_str),
        Some("PostgreSQL for storage")
    );
    assert!(payload.get("message").is_none());
    let results = payload
        .get("results")
        .and_then(Value::as_array)
        .ok_or("missing results")?;
    assert_eq!(results.len(), 1);
    assert_eq!(
        results[0].get("document_name").and_then(Value::as_str),
        Some("techContext")
    );
    assert_eq!(
        results[0].get("relevance_score").and_then(Value::as_f64),
        Some(1.0)
    );
    assert_eq!(
        results[0].get("snippet").and_then(Value::as_str),
        Some("**Stack**: We use PostgreSQL for storage.")
    );
    Ok(())
}

#[test]
fn test_memory_bank_search_reports_no_results() -> Result<(), Box<dyn std::error::Error>> {
    let tmp = TempDir::new()?;
    write_file(
        &tmp.path().join("memory-bank/techContext.md"),
        "## Stack\n\nWe use PostgreSQL for storage.\n",
    )?;

    let payload = run_json(
        memory_bank_cmd(tmp.path())
            .arg("search")
            .arg("kubernetes operator"),
    )?;
    assert_eq!(
        payload
            .get("results")
            .and_then(Value::as_array)
            .map(Vec::len),
        Some(0)
    );
    assert_eq!(
        payload.get("message").and_then(Value::as_str),
        Some("No results found for 'kubernetes operator'")
    );
    Ok(())
}

#[test]
fn test_memory_bank_search_rejects_short_query() -> Result<(), Box<dyn std::error::Error>> {
    let tmp = TempDir::new()?;
    write_file(
        &tmp.path().join("memory-bank/techContext.md"),
        "## Stack\n\nRust.\n",
    )?;

    let output = memory_bank_cmd(tmp.path())
        .arg("search")
        .arg("rust")
        .output()?;
    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("Search query too short: 4 characters (minimum: 5)"),
        "unexpected stderr: {stderr}"
    );
    Ok(())
}

#[test]
fn test_memory_bank_analyze_flags_missing_sections() -> Result<(), Box<dyn std::error::Error>> {
    let tmp = TempDir::new()?;
    write_file(&tmp.path().join(".clinerules"), RULES)?;
    run_json(memory_bank_cmd(tmp.path()).arg("init"))?;
    write_file(
        &tmp.path().join("memory-bank/techContext.md"),
        "# Tech Context\n\n> Last Updated: 2024-01-01\n\n## Stack\n\nRust.\n",
    )?;

    let payload = run_json(memory_bank_cmd(tmp.path()).arg("analyze"))?;
    let reports = payload.as_array().ok_or("analyze must return a list")?;
    assert_eq!(reports.len(), 6);

    let tech = reports
        .iter()
        .find(|report| report.get("document_type").and_then(Value::as_str) == Some("techContext"))
        .ok_or("missing techContext report")?;
    assert_eq!(
        tech.get("status").and_then(Value::as_str),
        Some("needs-update")
    );
    assert_eq!(
        tech.get("recommendation").and_then(Value::as_str),
        Some("Add missing sections: Development Setup")
    );

    let fresh = reports
        .iter()
        .filter(|report| report.get("status").and_then(Value::as_str) == Some("good"))
        .count();
    assert_eq!(fresh, 5);
    Ok(())
}
