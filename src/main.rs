//! tensor-processor CLI entry point.

use clap::Parser;

use tensor_processor::cli::{commands, Cli, Commands};
use tensor_processor::infrastructure::logging::LoggerImpl;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let _logger = match LoggerImpl::init(&cli.log_config()) {
        Ok(logger) => logger,
        Err(err) => tensor_processor::cli::handle_error(err, cli.json),
    };

    let result = match cli.command {
        Commands::Show(args) => commands::show::execute(args, cli.json),
        Commands::Extract(args) => commands::extract::execute(args, cli.json).await,
    };

    if let Err(err) = result {
        tensor_processor::cli::handle_error(err, cli.json);
    }
}
