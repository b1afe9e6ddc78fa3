use clap::Parser as _;
use tracing::debug;
use tracing_subscriber::filter::LevelFilter;

use listphile::{
    application::{Application, ApplicationError},
    cli::Cli,
};

#[snafu::report]
fn main() -> Result<(), ApplicationError> {
    let cli_args = Cli::parse();
    setup_tracing(&cli_args);
    debug!("Parsed CLI arguments: {cli_args:?}");

    Application::run(cli_args)?;

    Ok(())
}

fn setup_tracing(cli_args: &Cli) {
    let level = cli_args.log_level.to_level_filter();
    if level != LevelFilter::OFF {
        tracing_subscriber::fmt()
            .with_max_level(level)
            .with_writer(std::io::stderr)
            .without_time()
            .compact()
            .init();
    }
}
