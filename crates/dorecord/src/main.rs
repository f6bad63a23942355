// # digital_ocean_domain_record
//
// Binary module: create or delete one DNS record on DigitalOcean.
//
// This is a THIN integration layer only. All reconciliation logic lives in
// dorecord-core; all HTTP logic lives in dorecord-provider-digitalocean.
//
// The binary is responsible for:
// 1. Reading the module arguments (JSON)
// 2. Initializing logging and the runtime
// 3. Running one invocation
// 4. Printing exactly one JSON result envelope on stdout
//
// ## Invocation
//
// The orchestration engine passes the path of a JSON arguments file as the
// first argument. Without an argument, the JSON is read from stdin.
//
// ```bash
// echo '{"domain": "example.com", "name": "www", "data": "127.0.0.1"}' > args.json
// DO_API_TOKEN=... digital_ocean_domain_record args.json
// ```
//
// ## Environment
//
// - `DO_API_TOKEN`, `DO_API_KEY`: credential fallbacks when `api_token` is unset
// - `DO_API_URL`: API base URL (default https://api.digitalocean.com/v2)
// - `DO_API_TIMEOUT`: HTTP timeout in seconds (default 30)
// - `DORECORD_LOG_LEVEL`: trace, debug, info, warn, error (default warn)
//
// Logs go to stderr; stdout carries only the result envelope.

use anyhow::{Context, Result};
use dorecord_core::{Error, ModuleArgs, ModuleResult};
use std::env;
use std::io::Read;
use std::process::ExitCode;
use tracing::{Level, error, info};
use tracing_subscriber::FmtSubscriber;

/// Exit codes for different termination scenarios
#[derive(Debug, Clone, Copy)]
enum ModuleExitCode {
    /// Success envelope printed
    Success = 0,
    /// Failure envelope printed
    Failed = 1,
    /// Logging or runtime could not be initialized
    RuntimeError = 2,
}

impl From<ModuleExitCode> for ExitCode {
    fn from(code: ModuleExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

/// Parse the log level, falling back to WARN
fn log_level() -> Level {
    match env::var("DORECORD_LOG_LEVEL")
        .unwrap_or_default()
        .to_lowercase()
        .as_str()
    {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "error" => Level::ERROR,
        _ => Level::WARN,
    }
}

/// Read the raw module arguments from the file named on the command line,
/// or from stdin
fn read_args() -> Result<ModuleArgs> {
    match env::args_os().nth(1) {
        Some(path) => Ok(ModuleArgs::load(path)?),
        None => {
            let mut input = String::new();
            std::io::stdin()
                .read_to_string(&mut input)
                .context("Failed to read module arguments from stdin")?;
            Ok(ModuleArgs::from_json(&input)?)
        }
    }
}

fn main() -> ExitCode {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level())
        .with_writer(std::io::stderr)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return ModuleExitCode::RuntimeError.into();
    }

    // Single-threaded: one list call, then at most one mutation
    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return ModuleExitCode::RuntimeError.into();
        }
    };

    let result = match read_args() {
        Ok(args) => rt.block_on(run(args)),
        Err(e) => ModuleResult::failure(&Error::config(format!("{e:#}"))),
    };

    println!("{}", result.to_json());

    if result.is_failure() {
        ModuleExitCode::Failed.into()
    } else {
        ModuleExitCode::Success.into()
    }
}

/// Run one invocation against DigitalOcean
#[cfg(feature = "digitalocean")]
async fn run(args: ModuleArgs) -> ModuleResult {
    use dorecord_provider_digitalocean::DigitalOceanProvider;

    info!("Starting digital_ocean_domain_record (check_mode: {})", args.check_mode);

    let result = dorecord_core::execute(&args, |key| env::var(key).ok(), DigitalOceanProvider::new).await;

    if let Err(e) = &result {
        error!("Module failed: {}", e);
    }
    ModuleResult::from(result)
}

/// Without a provider compiled in, every invocation fails
#[cfg(not(feature = "digitalocean"))]
async fn run(_args: ModuleArgs) -> ModuleResult {
    error!("No DNS provider compiled in");
    ModuleResult::failure(&Error::config(
        "digital_ocean_domain_record was built without the digitalocean feature",
    ))
}
