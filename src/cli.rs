use anyhow::{Result, bail};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::common::config::{Config, Overrides};
use crate::common::paths;
use crate::getent::{
    DatabaseQuery, GetentCommandLogger, GetentError, Query, QueryOutcome, failure_payload,
};
use crate::ui::{self, prelude::*};

/// Query name-service databases through getent
#[derive(Parser, Debug)]
#[command(
    name = "getent-query",
    author,
    version,
    about,
    long_about = None,
    args_conflicts_with_subcommands = true
)]
pub struct Cli {
    /// Activate debug mode and log every getent invocation
    #[arg(short, long, global = true)]
    pub debug: bool,

    /// Output format
    #[arg(long, global = true, value_enum)]
    pub output: Option<OutputFormat>,

    /// Disable colored text output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Use this getent binary instead of searching for one
    #[arg(long = "getent", global = true, value_name = "PATH")]
    pub getent_path: Option<PathBuf>,

    #[command(flatten)]
    pub query: QueryArgs,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Args, Debug, Default)]
pub struct QueryArgs {
    /// Database to query (passwd, group, hosts, services, ...)
    pub database: Option<String>,

    /// Only return the record for this key
    pub key: Option<String>,

    /// Field separator, a single character or one of \t, \n, \\
    #[arg(short, long, value_parser = parse_split)]
    pub split: Option<char>,

    /// Succeed with a null value when the key is missing
    #[arg(long, overrides_with = "fail_key")]
    pub no_fail_key: bool,

    /// Fail when the key is missing (default)
    #[arg(long, overrides_with = "no_fail_key")]
    pub fail_key: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Inspect the configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
    /// Inspect the getent command log written in debug mode
    Log {
        #[command(subcommand)]
        command: LogCommands,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Print the effective configuration
    Show,
}

#[derive(Subcommand, Debug)]
pub enum LogCommands {
    /// Show recent invocations, newest first
    Show {
        #[arg(short, long)]
        limit: Option<usize>,
    },
    /// Delete the log
    Clear,
}

pub fn parse_split(s: &str) -> Result<char, String> {
    match s {
        "\\t" => return Ok('\t'),
        "\\n" => return Ok('\n'),
        "\\\\" => return Ok('\\'),
        _ => {}
    }
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(c),
        _ => Err(format!("expected a single character, got '{s}'")),
    }
}

impl QueryArgs {
    fn fail_key_override(&self) -> Option<bool> {
        if self.no_fail_key {
            Some(false)
        } else if self.fail_key {
            Some(true)
        } else {
            None
        }
    }
}

impl Cli {
    pub fn overrides(&self) -> Overrides {
        Overrides {
            fail_key: self.query.fail_key_override(),
            output: self.output,
            color: self.no_color.then_some(false),
            getent_path: self.getent_path.clone(),
        }
    }
}

/// Build the query from parsed arguments and configured defaults.
pub fn build_query(args: &QueryArgs, config: &Config) -> Result<Query> {
    let Some(database) = &args.database else {
        bail!("A database is required, e.g. `getent-query passwd root`");
    };

    let mut query = Query::new(database.as_str()).fail_on_missing_key(config.fail_key);
    if let Some(key) = &args.key {
        query = query.with_key(key.as_str());
    }
    if let Some(split) = args.split {
        query = query.with_split(split);
    }
    Ok(query)
}

fn build_runner(config: &Config) -> Result<DatabaseQuery> {
    let runner = if let Some(program) = &config.getent_path {
        DatabaseQuery::with_program(program)
    } else if let Some(search_path) = config.joined_search_path()? {
        DatabaseQuery::locate_in(search_path)?
    } else {
        DatabaseQuery::locate()?
    };

    if !is_debug_enabled() {
        return Ok(runner);
    }

    match GetentCommandLogger::default_location() {
        Ok(logger) => Ok(runner.with_logger(logger)),
        Err(e) => {
            emit(
                Level::Warn,
                "getent.log.unavailable",
                &format!("Warning: getent commands will not be logged: {e:#}"),
                None,
            );
            Ok(runner)
        }
    }
}

fn print_outcome(outcome: &QueryOutcome) {
    let payload = outcome.to_payload();

    if matches!(get_output_format(), OutputFormat::Json) {
        let (level, code) = if outcome.is_degraded() {
            (Level::Warn, "getent.query.key_missing")
        } else {
            (Level::Success, "getent.query.ok")
        };
        let message = outcome.msg.as_deref().unwrap_or("Query succeeded");
        emit(level, code, message, Some(payload));
        return;
    }

    if let Some(msg) = &outcome.msg {
        emit(Level::Warn, "getent.query.key_missing", msg, None);
    }
    emit(Level::Info, "getent.query.name", &format!("{}:", outcome.name), None);
    for (key, values) in outcome.records.iter() {
        let line = match values {
            Some(values) => format!("  {key} -> [{}]", values.join(", ")),
            None => format!("  {key} -> null"),
        };
        emit(Level::Info, "getent.query.record", &line, None);
    }
}

/// Run a query. The outer error is setup trouble (bad arguments or config),
/// the inner one is getent's answer.
pub fn execute_query(
    args: &QueryArgs,
    config: &Config,
) -> Result<std::result::Result<QueryOutcome, GetentError>> {
    let query = build_query(args, config)?;

    match build_runner(config) {
        Ok(runner) => Ok(runner.execute(&query)),
        Err(e) => Ok(Err(e.downcast::<GetentError>()?)),
    }
}

/// Run a query and report it. Returns the process exit code.
pub fn run_query(args: &QueryArgs, config: &Config) -> Result<i32> {
    let err = match execute_query(args, config)? {
        Ok(outcome) => {
            print_outcome(&outcome);
            return Ok(0);
        }
        Err(err) => err,
    };

    emit(
        Level::Error,
        err.code(),
        &err.to_string(),
        Some(failure_payload(&err)),
    );
    if is_debug_enabled()
        && let Some(exception) = err.exception()
    {
        emit(Level::Debug, "getent.exception", &exception, None);
    }
    Ok(1)
}

pub fn run(cli: Cli) -> Result<i32> {
    ui::set_debug_mode(cli.debug);

    let config = Config::load()?.apply_overrides(cli.overrides());
    ui::init(config.output, config.color);

    match &cli.command {
        Some(Commands::Config {
            command: ConfigCommands::Show,
        }) => {
            let text = config.to_toml()?;
            emit(
                Level::Info,
                "config.show",
                text.trim_end(),
                Some(serde_json::to_value(&config)?),
            );
            Ok(0)
        }
        Some(Commands::Log { command }) => {
            let logger = GetentCommandLogger::existing(paths::logs_dir_path()?);
            match command {
                LogCommands::Show { limit } => logger.print_recent_logs(*limit)?,
                LogCommands::Clear => {
                    logger.clear_logs()?;
                    emit(
                        Level::Success,
                        "getent.logs.cleared",
                        "Cleared getent command log",
                        None,
                    );
                }
            }
            Ok(0)
        }
        None => run_query(&cli.query, &config),
    }
}
