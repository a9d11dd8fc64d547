mod cli;
mod commands;
mod formatting;
mod settings;

use std::process::ExitCode;

use tracing_subscriber::EnvFilter;

use cli::Commands;
use commands::{run_detect, run_render, run_serve};
use formatting::render_error;
use settings::load_provider;

#[tokio::main]
async fn main() -> ExitCode {
    run().await
}

async fn run() -> ExitCode {
    let args = cli::parse();
    init_tracing(args.verbose);

    let provider = match load_provider(args.config.as_deref()) {
        Ok(provider) => provider,
        Err(err) => return render_error(err, args.format),
    };

    match args.command {
        Commands::Render { url, output } => run_render(&provider, url, output, args.format).await,
        Commands::Detect { user_agent } => run_detect(&provider, user_agent, args.format),
        Commands::Serve { listen, origin } => {
            run_serve(&provider, listen, origin, args.format).await
        }
    }
}

/// Logs go to stderr so rendered HTML on stdout stays clean.
fn init_tracing(verbose: bool) {
    let default_directive = if verbose {
        "prerender=debug,prerender_lib=debug,tower_http=debug"
    } else {
        "prerender=info,prerender_lib=info"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
