//! user-session binary entry point.

use std::process::ExitCode;
use std::sync::Arc;

use tracing::{debug, error};
use user_session::cli::{self, Args};
use user_session::config::Config;
use user_session::{commands, logging, FileStore, HttpUserApi, SessionStore};

#[tokio::main]
async fn main() -> ExitCode {
    let args = match cli::parse_args() {
        Ok(args) => args,
        Err(e) => {
            eprintln!("error: {}", e);
            eprintln!("Run 'user-session --help' for usage.");
            return ExitCode::from(2);
        }
    };

    if args.help {
        cli::print_help();
        return ExitCode::SUCCESS;
    }
    if args.version {
        cli::print_version();
        return ExitCode::SUCCESS;
    }

    let config = match Config::load(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {}", e);
            return ExitCode::from(2);
        }
    };

    logging::try_init_with_filter(Some(config.log_filter())).ok();

    match run(args, &config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let Some(command) = args.command else {
        cli::print_help();
        return Ok(());
    };

    let storage_path = config.storage_path()?;
    debug!("Using session storage {}", storage_path.display());

    let api = Arc::new(HttpUserApi::new(&config.api.base_url, config.timeout())?);
    let storage = Arc::new(FileStore::open(storage_path)?);
    let store = SessionStore::init(api, storage);

    let output = commands::execute(&store, command).await?;
    println!("{}", serde_json::to_string_pretty(&output)?);

    store.close()?;
    Ok(())
}
