use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::{OpenOptions, create_dir_all};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::common::paths;

const LOG_FILE_NAME: &str = "getent_commands.jsonl";

#[derive(Debug, Serialize, Deserialize)]
pub struct GetentCommandLog {
    pub timestamp: DateTime<Utc>,
    pub command: String,
    pub args: Vec<String>,
    pub stdout: String,
    pub stderr: String,
    pub exit_code: Option<i32>,
    pub success: bool,
    pub database: String,
}

/// Appends one JSON line per getent invocation.
#[derive(Debug, Clone)]
pub struct GetentCommandLogger {
    log_dir: PathBuf,
}

impl GetentCommandLogger {
    pub fn new(log_dir: impl Into<PathBuf>) -> Result<Self> {
        let log_dir = log_dir.into();
        create_dir_all(&log_dir).context("Failed to create getent log directory")?;
        Ok(Self { log_dir })
    }

    pub fn default_location() -> Result<Self> {
        Self::new(paths::logs_dir()?)
    }

    /// Log location without creating anything, for read-only commands.
    pub fn existing(log_dir: impl Into<PathBuf>) -> Self {
        Self {
            log_dir: log_dir.into(),
        }
    }

    pub fn log_dir(&self) -> &Path {
        &self.log_dir
    }

    pub fn log_command(
        &self,
        command: &str,
        args: &[String],
        output: &std::process::Output,
        database: &str,
    ) -> Result<()> {
        let log_entry = GetentCommandLog {
            timestamp: Utc::now(),
            command: command.to_string(),
            args: args.to_vec(),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            exit_code: output.status.code(),
            success: output.status.success(),
            database: database.to_string(),
        };

        let log_file = self.get_log_file_path();
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_file)
            .context("Failed to open getent log file")?;

        let json_line =
            serde_json::to_string(&log_entry).context("Failed to serialize getent command log")?;

        writeln!(file, "{json_line}").context("Failed to write to getent log file")?;

        Ok(())
    }

    fn get_log_file_path(&self) -> PathBuf {
        self.log_dir.join(LOG_FILE_NAME)
    }

    /// Newest first.
    pub fn get_logs(&self) -> Result<Vec<GetentCommandLog>> {
        let log_file = self.get_log_file_path();
        if !log_file.exists() {
            return Ok(Vec::new());
        }

        let content =
            std::fs::read_to_string(&log_file).context("Failed to read getent log file")?;

        let mut logs = Vec::new();
        for line in content.lines() {
            if line.trim().is_empty() {
                continue;
            }
            let log: GetentCommandLog =
                serde_json::from_str(line).context("Failed to parse getent log entry")?;
            logs.push(log);
        }

        logs.reverse();
        Ok(logs)
    }

    pub fn clear_logs(&self) -> Result<()> {
        let log_file = self.get_log_file_path();
        if log_file.exists() {
            std::fs::remove_file(&log_file).context("Failed to remove getent log file")?;
        }
        Ok(())
    }

    pub fn print_recent_logs(&self, limit: Option<usize>) -> Result<()> {
        use crate::ui::prelude::*;

        let logs = self.get_logs()?;
        let limit = limit.unwrap_or(10);

        if logs.is_empty() {
            emit(
                Level::Info,
                "getent.logs.empty",
                "No getent command logs found.",
                None,
            );
            return Ok(());
        }

        emit(
            Level::Info,
            "getent.logs.list.start",
            "Recent getent invocations:",
            None,
        );
        separator(false);

        for (i, log) in logs.iter().take(limit).enumerate() {
            let time_str = log.timestamp.format("%Y-%m-%d %H:%M:%S UTC").to_string();
            let mut text_block = String::new();
            text_block.push_str(&format!("Log Entry #{}\n", i + 1));
            text_block.push_str(&format!("  Time: {time_str}\n"));
            text_block.push_str(&format!(
                "  Command: {} {}\n",
                log.command,
                log.args.join(" ")
            ));
            text_block.push_str(&format!("  Database: {}\n", log.database));
            text_block.push_str(&format!(
                "  Success: {}",
                if log.success { "Yes" } else { "No" }
            ));
            if let Some(code) = log.exit_code {
                text_block.push_str(&format!("\n  Exit Code: {code}"));
            }
            if !log.stderr.trim().is_empty() {
                text_block.push_str(&format!(
                    "\n  STDERR:\n{}",
                    Self::indent_text(&log.stderr, 4)
                ));
            }

            let data = serde_json::json!({
                "index": i + 1,
                "timestamp": time_str,
                "command": log.command,
                "args": log.args,
                "database": log.database,
                "success": log.success,
                "exit_code": log.exit_code,
                "stdout": log.stdout,
                "stderr": log.stderr,
            });
            emit(Level::Info, "getent.logs.entry", &text_block, Some(data));
            separator(true);
        }

        Ok(())
    }

    fn indent_text(text: &str, indent: usize) -> String {
        let indent_str = " ".repeat(indent);
        text.lines()
            .map(|line| format!("{indent_str}{line}"))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
