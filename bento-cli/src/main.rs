use bento_cli::{commands, telemetry, Args, CliError, CliResult};
use bento_client::{ClientConfig, Console};
use clap::Parser;

#[tokio::main]
async fn main() {
    let args = Args::parse();
    match run(args).await {
        Ok(output) => print!("{}", output),
        Err(err) => {
            eprintln!("error: {}", err);
            if let Some(hint) = err.hint() {
                eprintln!("{}", hint);
            }
            std::process::exit(err.exit_code());
        }
    }
}

async fn run(args: Args) -> CliResult<String> {
    let mut config = ClientConfig::load(args.config.as_deref())?;
    if let Some(level) = args.log_level {
        config.log.level = level;
    }
    if args.json_logs {
        config.log.json = true;
    }
    telemetry::init(&config.log)?;
    let state_file = config.state_file()?;
    tracing::debug!(api = %config.api_base_url, storage = %state_file.display(), "Configuration loaded");

    let mut console = Console::from_config(&config).map_err(CliError::from)?;
    if let Some(token) = args.token {
        console.client().set_auth_token(token);
    }
    commands::run(&mut console, args.command).await
}
