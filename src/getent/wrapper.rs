use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use crate::getent::error::GetentError;
use crate::getent::logging::GetentCommandLogger;
use crate::getent::outcome::QueryOutcome;
use crate::getent::query::Query;
use crate::getent::records::ResultSet;
use crate::ui::prelude::*;

pub const GETENT_BIN: &str = "getent";

/// Runs getent and turns its answer into a [`QueryOutcome`].
#[derive(Debug, Clone)]
pub struct DatabaseQuery {
    program: PathBuf,
    logger: Option<GetentCommandLogger>,
}

impl DatabaseQuery {
    /// Resolve getent from `$PATH`.
    pub fn locate() -> Result<Self, GetentError> {
        let program = which::which(GETENT_BIN)?;
        Ok(Self::with_program(program))
    }

    /// Resolve getent from an explicit search path (same syntax as `$PATH`).
    pub fn locate_in<P: AsRef<OsStr>>(search_path: P) -> Result<Self, GetentError> {
        let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("/"));
        let program = which::which_in(GETENT_BIN, Some(search_path), cwd)?;
        Ok(Self::with_program(program))
    }

    /// Use a known binary without searching.
    pub fn with_program(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            logger: None,
        }
    }

    pub fn with_logger(mut self, logger: GetentCommandLogger) -> Self {
        self.logger = Some(logger);
        self
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    fn execute_and_log_command(
        &self,
        mut command: Command,
        args: &[String],
        database: &str,
    ) -> Result<Output, GetentError> {
        let output = command.output().map_err(GetentError::ExecutionError)?;

        if let Some(logger) = &self.logger
            && let Err(e) = logger.log_command(
                &command.get_program().to_string_lossy(),
                args,
                &output,
                database,
            )
        {
            emit(
                Level::Warn,
                "getent.log.failed",
                &format!("Warning: Failed to log getent command: {e}"),
                None,
            );
        }

        Ok(output)
    }

    pub fn execute(&self, query: &Query) -> Result<QueryOutcome, GetentError> {
        let args = query.args();

        if is_debug_enabled() {
            emit(
                Level::Debug,
                "getent.exec",
                &format!("Running {} {}", self.program.display(), args.join(" ")),
                Some(serde_json::json!({
                    "program": self.program.display().to_string(),
                    "args": args,
                })),
            );
        }

        let mut cmd = Command::new(&self.program);
        cmd.args(&args);
        let output = self.execute_and_log_command(cmd, &args, query.database())?;

        match output.status.code() {
            Some(0) => {
                let stdout = String::from_utf8_lossy(&output.stdout);
                Ok(QueryOutcome {
                    name: query.result_name(),
                    records: ResultSet::parse(&stdout, query.separator()),
                    msg: None,
                })
            }
            code => match GetentError::from_exit_code(code) {
                err @ GetentError::KeyNotFound if !query.fails_on_missing_key() => {
                    let mut records = ResultSet::new();
                    records.insert(query.key().unwrap_or_default(), None);
                    Ok(QueryOutcome {
                        name: query.result_name(),
                        records,
                        msg: Some(err.to_string()),
                    })
                }
                err => Err(err),
            },
        }
    }
}
