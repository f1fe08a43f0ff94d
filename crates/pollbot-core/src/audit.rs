use std::{
    fs::OpenOptions,
    io::Write,
    path::{Path, PathBuf},
};

use chrono::Utc;
use serde::Serialize;

use crate::{errors::Error, Result};

const AUDIT_MAX_TEXT: usize = 500;

/// RFC3339 timestamp in UTC.
pub fn iso_timestamp_utc() -> String {
    Utc::now().to_rfc3339()
}

/// One line of the audit trail.
#[derive(Clone, Debug, Serialize)]
pub struct AuditEvent {
    pub timestamp: String,
    pub event: String,
    pub chat_id: i64,
    pub user_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accepted: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AuditEvent {
    pub fn poll_command(
        chat_id: i64,
        user_id: i64,
        username: Option<&str>,
        content: &str,
        command: Option<&str>,
        response: &str,
        accepted: bool,
    ) -> Self {
        Self {
            timestamp: iso_timestamp_utc(),
            event: "poll_command".to_string(),
            chat_id,
            user_id,
            username: username.map(|s| s.to_string()),
            command: command.map(|s| s.to_string()),
            content: Some(content.to_string()),
            response: Some(response.to_string()),
            accepted: Some(accepted),
            error: None,
        }
    }

    pub fn error(chat_id: i64, user_id: i64, username: Option<&str>, error: &str) -> Self {
        Self {
            timestamp: iso_timestamp_utc(),
            event: "error".to_string(),
            chat_id,
            user_id,
            username: username.map(|s| s.to_string()),
            command: None,
            content: None,
            response: None,
            accepted: None,
            error: Some(error.to_string()),
        }
    }
}

/// Append-only audit log (JSON lines or a readable block format).
#[derive(Clone, Debug)]
pub struct AuditLogger {
    path: PathBuf,
    json: bool,
}

impl AuditLogger {
    pub fn new(path: impl Into<PathBuf>, json: bool) -> Self {
        Self {
            path: path.into(),
            json,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn write(&self, mut event: AuditEvent) -> Result<()> {
        if let Some(s) = &event.content {
            event.content = Some(truncate_text(s, AUDIT_MAX_TEXT));
        }
        if let Some(s) = &event.response {
            event.response = Some(truncate_text(s, AUDIT_MAX_TEXT));
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        if self.json {
            let line = serde_json::to_string(&event)?;
            writeln!(file, "{line}")?;
            return Ok(());
        }

        let mut out = String::new();
        out.push('\n');
        out.push_str(&"=".repeat(60));

        let value = serde_json::to_value(&event)?;
        let Some(obj) = value.as_object() else {
            return Err(Error::External(
                "audit event is not a JSON object".to_string(),
            ));
        };
        for (k, v) in obj {
            out.push('\n');
            out.push_str(k);
            out.push_str(": ");
            match v {
                serde_json::Value::String(s) => out.push_str(s),
                other => out.push_str(&other.to_string()),
            }
        }
        out.push('\n');

        file.write_all(out.as_bytes())?;
        Ok(())
    }
}

pub fn truncate_text(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        return s.to_string();
    }
    let mut out = s.chars().take(max_len).collect::<String>();
    out.push_str("...");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn tmp_file(prefix: &str) -> PathBuf {
        let ts = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or(Duration::from_secs(0))
            .as_nanos();
        let pid = std::process::id();
        PathBuf::from(format!("/tmp/{prefix}-{pid}-{ts}.log"))
    }

    #[test]
    fn truncate_text_adds_ellipsis() {
        let s = "a".repeat(AUDIT_MAX_TEXT + 10);
        let t = truncate_text(&s, AUDIT_MAX_TEXT);
        assert!(t.ends_with("..."));
        assert_eq!(t.len(), AUDIT_MAX_TEXT + 3);
    }

    #[test]
    fn json_mode_writes_one_line_per_event() {
        let log = AuditLogger::new(tmp_file("pollbot-audit-json"), true);
        log.write(AuditEvent::poll_command(
            -100,
            7,
            Some("alice"),
            "!poll vote 1",
            Some("vote"),
            "You have already voted.",
            false,
        ))
        .unwrap();
        log.write(AuditEvent::error(-100, 7, None, "send failed"))
            .unwrap();

        let written = std::fs::read_to_string(log.path()).unwrap();
        let lines: Vec<&str> = written.lines().collect();
        assert_eq!(lines.len(), 2);

        let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first["event"], "poll_command");
        assert_eq!(first["command"], "vote");
        assert_eq!(first["accepted"], false);
        assert!(first.get("error").is_none());

        let _ = std::fs::remove_file(log.path());
    }

    #[test]
    fn plain_mode_truncates_long_response() {
        let log = AuditLogger::new(tmp_file("pollbot-audit-plain"), false);
        let response = "y".repeat(AUDIT_MAX_TEXT + 50);
        log.write(AuditEvent::poll_command(
            1, 2, None, "!poll show", Some("show"), &response, true,
        ))
        .unwrap();

        let written = std::fs::read_to_string(log.path()).unwrap();
        assert!(written.contains("event: poll_command"));
        assert!(written.contains("..."));
        assert!(!written.contains(&response));

        let _ = std::fs::remove_file(log.path());
    }
}
