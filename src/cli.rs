//! Command-line interface for user-session.
//!
//! Uses lexopt for minimal binary size overhead.

use std::ffi::OsString;
use std::path::PathBuf;

use crate::api::{Pagination, UserId, UserRecord};

/// A client command.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Authenticate and store the session.
    Login {
        email: String,
        password: Option<String>,
    },
    /// Clear the stored session.
    Logout,
    /// Restore and verify the stored session, refreshing the user.
    Status,
    /// Check whether the stored token is still accepted.
    Verify,
    /// Print the stored session without contacting the API.
    Whoami,
    /// List one page of users.
    List(Pagination),
    /// Fetch one user.
    Show(UserId),
    /// Create a user from a JSON record.
    Add(UserRecord),
    /// Update a user from a JSON record.
    Update(UserId, UserRecord),
    /// Delete a user.
    Delete(UserId),
}

/// Command-line arguments.
#[derive(Debug, Clone, Default)]
pub struct Args {
    /// Command to run.
    pub command: Option<Command>,
    /// Path to configuration file.
    pub config: Option<PathBuf>,
    /// API base URL (overrides config file).
    pub api_url: Option<String>,
    /// Session storage file (overrides config file).
    pub storage: Option<PathBuf>,
    /// Request timeout in seconds.
    pub timeout_secs: Option<u64>,
    /// Log level (error, warn, info, debug, trace).
    pub log_level: Option<String>,
    /// Show version and exit.
    pub version: bool,
    /// Show help and exit.
    pub help: bool,
}

/// Parse command-line arguments.
pub fn parse_args() -> Result<Args, ArgsError> {
    parse_args_from(std::env::args_os())
}

/// Parse arguments from an iterator (for testing).
///
/// The first item is the program name.
pub fn parse_args_from<I>(args: I) -> Result<Args, ArgsError>
where
    I: IntoIterator<Item = OsString>,
{
    use lexopt::prelude::*;

    let mut result = Args::default();
    let mut parser = lexopt::Parser::from_iter(args);

    let mut positionals: Vec<String> = Vec::new();
    let mut email: Option<String> = None;
    let mut password: Option<String> = None;
    let mut page: Option<u32> = None;
    let mut limit: Option<u32> = None;

    while let Some(arg) = parser.next()? {
        match arg {
            Short('h') | Long("help") => {
                result.help = true;
            }
            Short('V') | Long("version") => {
                result.version = true;
            }
            Short('c') | Long("config") => {
                result.config = Some(parser.value()?.parse()?);
            }
            Short('u') | Long("api-url") => {
                result.api_url = Some(parser.value()?.parse()?);
            }
            Short('s') | Long("storage") => {
                result.storage = Some(parser.value()?.parse()?);
            }
            Short('t') | Long("timeout") => {
                let value: String = parser.value()?.parse()?;
                result.timeout_secs = Some(
                    value
                        .parse()
                        .map_err(|_| ArgsError::InvalidValue("timeout", value))?,
                );
            }
            Short('l') | Long("log-level") => {
                result.log_level = Some(parser.value()?.parse()?);
            }
            Short('e') | Long("email") => {
                email = Some(parser.value()?.parse()?);
            }
            Short('P') | Long("password") => {
                password = Some(parser.value()?.parse()?);
            }
            Long("page") => {
                let value: String = parser.value()?.parse()?;
                page = Some(parse_positive("page", value)?);
            }
            Long("limit") => {
                let value: String = parser.value()?.parse()?;
                limit = Some(parse_positive("limit", value)?);
            }
            Value(val) => {
                positionals.push(val.string()?);
            }
            _ => return Err(arg.unexpected().into()),
        }
    }

    let mut positionals = positionals.into_iter();
    if let Some(name) = positionals.next() {
        let command = match name.as_str() {
            "login" => Command::Login {
                email: email
                    .or_else(|| positionals.next())
                    .ok_or(ArgsError::MissingArgument("email"))?,
                password,
            },
            "logout" => Command::Logout,
            "status" => Command::Status,
            "verify" => Command::Verify,
            "whoami" => Command::Whoami,
            "list" => Command::List(Pagination::new(
                page.unwrap_or(Pagination::DEFAULT_PAGE),
                limit.unwrap_or(Pagination::DEFAULT_LIMIT),
            )),
            "show" => Command::Show(parse_id(positionals.next())?),
            "add" | "register" => Command::Add(parse_record(positionals.next())?),
            "update" => {
                let id = parse_id(positionals.next())?;
                Command::Update(id, parse_record(positionals.next())?)
            }
            "delete" => Command::Delete(parse_id(positionals.next())?),
            _ => return Err(ArgsError::UnknownCommand(name.clone())),
        };

        if let Some(extra) = positionals.next() {
            return Err(ArgsError::UnexpectedArgument(extra));
        }
        result.command = Some(command);
    }

    Ok(result)
}

fn parse_positive(name: &'static str, value: String) -> Result<u32, ArgsError> {
    match value.parse::<u32>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(ArgsError::InvalidValue(name, value)),
    }
}

fn parse_id(value: Option<String>) -> Result<UserId, ArgsError> {
    let value = value.ok_or(ArgsError::MissingArgument("id"))?;
    value
        .parse()
        .map_err(|_| ArgsError::InvalidValue("id", value))
}

fn parse_record(value: Option<String>) -> Result<UserRecord, ArgsError> {
    let value = value.ok_or(ArgsError::MissingArgument("record"))?;
    serde_json::from_str(&value).map_err(|_| ArgsError::InvalidValue("record", value))
}

/// Print help message.
pub fn print_help() {
    let version = env!("CARGO_PKG_VERSION");
    println!(
        r#"user-session {version}
Session-aware client for a user-management REST API

USAGE:
    user-session [OPTIONS] <COMMAND> [ARGS]

COMMANDS:
    login <EMAIL>           Log in (password via -P or USER_SESSION_PASSWORD)
    logout                  Clear the stored session
    status                  Verify the stored session and refresh the user
    verify                  Check whether the stored token is still valid
    whoami                  Print the stored session (no request)
    list                    List users (--page, --limit)
    show <ID>               Show one user
    add <JSON>              Create a user (alias: register)
    update <ID> <JSON>      Update a user
    delete <ID>             Delete a user

OPTIONS:
    -u, --api-url <URL>     API base URL [default: https://vuejsreg.in/api]
    -s, --storage <FILE>    Session storage file
    -c, --config <FILE>     Path to configuration file (JSON)
    -t, --timeout <SECS>    Request timeout in seconds (0 disables)
    -l, --log-level <LVL>   Log level (error, warn, info, debug, trace)
    -e, --email <EMAIL>     Login email
    -P, --password <PASS>   Login password
        --page <N>          Page to list [default: 1]
        --limit <N>         Users per page [default: 10]
    -h, --help              Print help
    -V, --version           Print version

ENVIRONMENT VARIABLES:
    USER_SESSION_API_URL    API base URL (overrides config)
    USER_SESSION_STORAGE    Session storage file (overrides config)
    USER_SESSION_TIMEOUT    Request timeout in seconds (overrides config)
    USER_SESSION_LOG_LEVEL  Log level (overrides config)
    USER_SESSION_PASSWORD   Login password
    RUST_LOG                Alternative log level setting

EXAMPLES:
    user-session login a@example.com -P secret
    user-session list --page 2 --limit 5
    user-session update 3 '{{"name": "New Name"}}'
"#
    );
}

/// Print version.
pub fn print_version() {
    println!("user-session {}", env!("CARGO_PKG_VERSION"));
}

/// Argument parsing errors.
#[derive(Debug)]
pub enum ArgsError {
    /// Lexopt parsing error.
    Lexopt(lexopt::Error),
    /// Invalid argument value.
    InvalidValue(&'static str, String),
    /// Unexpected positional argument.
    UnexpectedArgument(String),
    /// Command name not recognized.
    UnknownCommand(String),
    /// Required positional argument missing.
    MissingArgument(&'static str),
}

impl std::fmt::Display for ArgsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Lexopt(e) => write!(f, "{}", e),
            Self::InvalidValue(name, value) => {
                write!(f, "invalid value for {}: '{}'", name, value)
            }
            Self::UnexpectedArgument(arg) => {
                write!(f, "unexpected argument: '{}'", arg)
            }
            Self::UnknownCommand(name) => write!(f, "unknown command: '{}'", name),
            Self::MissingArgument(name) => write!(f, "missing argument: <{}>", name),
        }
    }
}

impl std::error::Error for ArgsError {}

impl From<lexopt::Error> for ArgsError {
    fn from(e: lexopt::Error) -> Self {
        Self::Lexopt(e)
    }
}
