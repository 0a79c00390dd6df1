use tracing_subscriber::EnvFilter;

mod command;
mod output;
mod plot;
mod runtime;

fn main() -> anyhow::Result<()> {
    let args = command::CommandArgs::parse_args();

    // RUST_LOG takes precedence over the verbosity flags
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(args.default_log_level()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    command::run(args)
}
