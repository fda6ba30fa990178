//! Purpose: `payloads` CLI entry point.
//! Role: Binary crate root; parses args, runs one pipeline command, emits JSON on stdout.
//! Invariants: Errors are emitted as a single JSON object on stderr.
//! Invariants: Process exit code is derived from `api::to_exit_code`.
//! Invariants: Logs go to stderr through `tracing`; stdout carries only command output.
#![allow(clippy::result_large_err)]
use std::ffi::OsString;
use std::io::{self, Read};
use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum, ValueHint, error::ErrorKind as ClapErrorKind};
use serde_json::{Map, Value, json};
use tracing_subscriber::EnvFilter;

mod command_dispatch;

use payloads::api::{
    CommandSink, DEFAULT_STACK, Error, ErrorKind, Pipeline, PipelineConfig, QueryResource,
    to_exit_code, to_http_status,
};
use payloads::messages::Command as PipelineCommand;

fn main() {
    init_tracing();
    let exit_code = match run() {
        Ok(code) => code,
        Err(err) => {
            emit_error(&err);
            to_exit_code(err.kind())
        }
    };
    std::process::exit(exit_code);
}

fn run() -> Result<i32, Error> {
    let cli = match Cli::try_parse_from(std::env::args_os().collect::<Vec<OsString>>()) {
        Ok(cli) => cli,
        Err(err) => match err.kind() {
            ClapErrorKind::DisplayHelp
            | ClapErrorKind::DisplayVersion
            | ClapErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => {
                err.print().map_err(|io_err| {
                    Error::new(ErrorKind::Io)
                        .with_message("failed to write help")
                        .with_source(io_err)
                })?;
                let exit_code = if matches!(
                    err.kind(),
                    ClapErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
                ) {
                    2
                } else {
                    0
                };
                return Ok(exit_code);
            }
            _ => {
                return Err(Error::new(ErrorKind::Usage)
                    .with_message(clap_error_summary(&err))
                    .with_hint("Try `payloads --help`."));
            }
        },
    };

    let config = PipelineConfig::default().with_default_stack(cli.default_stack);
    let pipeline = Pipeline::new(config)?;
    command_dispatch::dispatch_command(cli.command, &pipeline)?;
    Ok(0)
}

#[derive(Parser)]
#[command(
    name = "payloads",
    version,
    about = "Decode, validate, and translate app API request payloads",
    long_about = None,
    after_help = r#"EXAMPLES
  $ payloads query apps 'names=web,worker&order_by=-created_at'
  $ payloads query app-droplets 'per_page=50' --app-guid 2f4c
  $ payloads body app-create --file create.json
  $ payloads body app-patch --file patch.json --app-guid a1 --space-guid s1
  $ payloads resources

Set RUST_LOG=debug to trace decode and validation decisions on stderr."#,
    arg_required_else_help = true
)]
struct Cli {
    #[arg(
        long,
        global = true,
        default_value = DEFAULT_STACK,
        help = "Stack used when an app is created without lifecycle data"
    )]
    default_stack: String,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    #[command(about = "Decode a list query string and print the list command")]
    Query {
        #[arg(value_enum)]
        resource: ResourceArg,
        #[arg(default_value = "", help = "Raw query string, with or without a leading '?'")]
        query: String,
        #[arg(long, help = "Parent app GUID (required for app-scoped resources)")]
        app_guid: Option<String>,
    },
    #[command(about = "Decode and validate a JSON body and print the resulting command")]
    Body {
        #[arg(value_enum)]
        payload: PayloadArg,
        #[arg(
            long,
            value_hint = ValueHint::FilePath,
            help = "Read the body from a file instead of stdin"
        )]
        file: Option<PathBuf>,
        #[arg(long, help = "App GUID from the request URL")]
        app_guid: Option<String>,
        #[arg(long, help = "Space GUID the app belongs to")]
        space_guid: Option<String>,
    },
    #[command(about = "Print the configured resource table")]
    Resources,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum ResourceArg {
    Apps,
    AppRoutes,
    AppDroplets,
    AppPackages,
    AppProcesses,
}

impl ResourceArg {
    fn resource(self) -> QueryResource {
        match self {
            ResourceArg::Apps => QueryResource::Apps,
            ResourceArg::AppRoutes => QueryResource::AppRoutes,
            ResourceArg::AppDroplets => QueryResource::AppDroplets,
            ResourceArg::AppPackages => QueryResource::AppPackages,
            ResourceArg::AppProcesses => QueryResource::AppProcesses,
        }
    }
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum PayloadArg {
    AppCreate,
    AppPatch,
    AppPatchEnvVars,
    AppSetCurrentDroplet,
}

/// Stands in for the repository: prints nothing itself, hands back the command as JSON.
struct EchoSink;

impl CommandSink for EchoSink {
    type Entity = Value;

    fn submit(&mut self, command: PipelineCommand) -> Result<Value, Error> {
        serde_json::to_value(&command).map_err(|err| {
            Error::new(ErrorKind::Internal)
                .with_message("failed to encode command")
                .with_source(err)
        })
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(io::stderr)
        .try_init();
}

fn read_body(file: Option<&PathBuf>) -> Result<Vec<u8>, Error> {
    match file {
        Some(path) => std::fs::read(path).map_err(|err| {
            Error::new(ErrorKind::Io)
                .with_message(format!("failed to read {}", path.display()))
                .with_hint("Check the path passed to --file.")
                .with_source(err)
        }),
        None => {
            let mut buf = Vec::new();
            io::stdin().read_to_end(&mut buf).map_err(|err| {
                Error::new(ErrorKind::Io)
                    .with_message("failed to read request body from stdin")
                    .with_source(err)
            })?;
            Ok(buf)
        }
    }
}

fn required_arg(value: Option<String>, flag: &str, context: &str) -> Result<String, Error> {
    value.ok_or_else(|| {
        Error::new(ErrorKind::Usage)
            .with_message(format!("{context} requires {flag}"))
            .with_hint(format!("Pass {flag} <guid>."))
    })
}

fn emit_json(value: Value) {
    let json = serde_json::to_string_pretty(&value)
        .unwrap_or_else(|_| "{\"error\":\"json encode failed\"}".to_string());
    println!("{json}");
}

fn emit_error(err: &Error) {
    let json = serde_json::to_string(&error_json(err)).unwrap_or_else(|_| {
        "{\"error\":{\"kind\":\"Internal\",\"message\":\"json encode failed\"}}".to_string()
    });
    eprintln!("{json}");
}

fn error_message(err: &Error) -> String {
    if let Some(message) = err.message() {
        return message.to_string();
    }
    match err.kind() {
        ErrorKind::Internal => "internal error".to_string(),
        ErrorKind::Usage => "usage error".to_string(),
        ErrorKind::Decode => "request could not be decoded".to_string(),
        ErrorKind::Validation => "request failed validation".to_string(),
        ErrorKind::Config => "invalid configuration".to_string(),
        ErrorKind::Io => "i/o error".to_string(),
    }
}

fn error_causes(err: &Error) -> Vec<String> {
    let mut causes = Vec::new();
    let mut cur = std::error::Error::source(err);
    while let Some(source) = cur {
        causes.push(source.to_string());
        cur = source.source();
    }
    causes
}

fn error_json(err: &Error) -> Value {
    let mut inner = Map::new();
    inner.insert("kind".to_string(), json!(err.kind()));
    inner.insert("message".to_string(), json!(error_message(err)));
    inner.insert("http_status".to_string(), json!(to_http_status(err.kind())));
    if !err.field_errors().is_empty() {
        inner.insert("field_errors".to_string(), json!(err.field_errors()));
    }
    if let Some(hint) = err.hint() {
        inner.insert("hint".to_string(), json!(hint));
    }
    let causes = error_causes(err);
    if !causes.is_empty() {
        inner.insert("causes".to_string(), json!(causes));
    }

    let mut outer = Map::new();
    outer.insert("error".to_string(), Value::Object(inner));
    Value::Object(outer)
}

fn clap_error_summary(err: &clap::Error) -> String {
    for line in err.to_string().lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if let Some(rest) = trimmed.strip_prefix("error:") {
            return rest.trim().to_string();
        }
        return trimmed.to_string();
    }
    "invalid arguments".to_string()
}
