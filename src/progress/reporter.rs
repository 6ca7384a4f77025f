use serde::Serialize;
use std::io::{self, Write};

/// Structured progress event emitted to stderr during the lookup loop.
#[derive(Debug, Serialize)]
pub struct ProgressEvent {
    #[serde(rename = "type")]
    pub event_type: String,
    pub tool: String,
    pub processed: u64,
    pub total: u64,
    pub percent: f64,
    pub elapsed_ms: u64,
}

/// Structured warning/info notice emitted to stderr for degraded steps.
#[derive(Debug, Serialize)]
pub struct NoticeEvent {
    #[serde(rename = "type")]
    pub event_type: String,
    pub tool: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    pub message: String,
}

/// Report lookup progress to stderr as JSONL.
pub fn report_progress(processed: u64, total: u64, elapsed_ms: u64) {
    let percent = if total == 0 {
        100.0
    } else {
        (processed as f64 / total as f64) * 100.0
    };
    let event = ProgressEvent {
        event_type: "progress".to_owned(),
        tool: "foliomatch".to_owned(),
        processed,
        total,
        percent,
        elapsed_ms,
    };
    let mut stderr = io::stderr().lock();
    let _ = write_event_line(&mut stderr, &event);
}

/// Report a coded warning (soft absence, dropped data) to stderr as JSONL.
pub fn report_warning(code: &str, message: &str) {
    emit_notice("warning", Some(code), message);
}

/// Report an informational notice (skipped optional step) to stderr as JSONL.
pub fn report_info(message: &str) {
    emit_notice("info", None, message);
}

fn emit_notice(event_type: &str, code: Option<&str>, message: &str) {
    let notice = NoticeEvent {
        event_type: event_type.to_owned(),
        tool: "foliomatch".to_owned(),
        code: code.map(str::to_owned),
        message: message.to_owned(),
    };
    let mut stderr = io::stderr().lock();
    let _ = write_event_line(&mut stderr, &notice);
}

fn write_event_line<T: Serialize>(out: &mut dyn Write, event: &T) -> Result<(), String> {
    serde_json::to_writer(&mut *out, event)
        .map_err(|error| format!("failed to serialize event: {error}"))?;
    out.write_all(b"\n")
        .map_err(|error| format!("failed to write event newline: {error}"))?;
    out.flush()
        .map_err(|error| format!("failed to flush event output: {error}"))?;
    Ok(())
}
