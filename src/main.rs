//! ansible-launch - resolve and run configured ansible-playbook invocations
//!
//! This is the main entry point for the ansible-launch CLI.

mod cli;

use ansible_launch::config::{Config, LogFormat, LoggingConfig};
use ansible_launch::error::Error;
use cli::commands::CommandContext;
use cli::output::OutputFormatter;
use cli::{Cli, Commands};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() {
    // Parse command line arguments
    let cli = Cli::parse_args();

    // Load settings
    let config = match Config::load(cli.settings.as_ref()) {
        Ok(config) => config,
        Err(e) => {
            OutputFormatter::new(!cli.no_color, cli.is_json(), cli.verbosity())
                .error(&format!("{:#}", e));
            std::process::exit(1);
        }
    };

    init_logging(cli.verbosity(), &config.logging);

    // Create command context
    let mut ctx = CommandContext::new(&cli, config);

    // Execute the appropriate command
    let result = match &cli.command {
        Commands::Run(args) => args.execute(&mut ctx).await,
        Commands::Show(args) => args.execute(&mut ctx).await,
        Commands::List(args) => args.execute(&mut ctx).await,
        Commands::Export(args) => args.execute(&mut ctx).await,
    };

    let exit_code = match result {
        Ok(code) => code,
        Err(e) => {
            ctx.output.error(&format!("{:#}", e));
            e.downcast_ref::<Error>().map_or(1, Error::exit_code)
        }
    };

    ctx.output.flush();
    std::process::exit(exit_code);
}

/// Initialize logging based on verbosity level
///
/// `RUST_LOG` wins; otherwise `-v` picks the level, falling back to the
/// configured `log_level`.
fn init_logging(verbosity: u8, logging: &LoggingConfig) {
    let filter = match verbosity {
        0 => logging.log_level.as_str(),
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(filter))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let registry = tracing_subscriber::registry().with(env_filter);

    match logging.log_format {
        LogFormat::Full => registry
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(verbosity >= 3),
            )
            .init(),
        LogFormat::Compact => registry
            .with(fmt::layer().with_writer(std::io::stderr).compact())
            .init(),
        LogFormat::Json => registry
            .with(fmt::layer().with_writer(std::io::stderr).json())
            .init(),
    }
}
