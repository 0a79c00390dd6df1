use clap::{Parser, Subcommand};

use self::{runtime_report::RuntimeReportArg, summarize::SummarizeArg};

mod runtime_report;
mod summarize;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// Log debug messages
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Log errors only
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    mode: Mode,
}

impl CommandArgs {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    pub fn default_log_level(&self) -> &'static str {
        match (self.verbose, self.quiet) {
            (true, _) => "debug",
            (_, true) => "error",
            _ => "info",
        }
    }
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Summarize the cross-validation results of one dataset
    Summarize(#[clap(flatten)] SummarizeArg),
    /// Combine the per-phase runtime files of one dataset into runtimes.csv
    RuntimeReport(#[clap(flatten)] RuntimeReportArg),
}

pub fn run(args: CommandArgs) -> anyhow::Result<()> {
    match args.mode {
        Mode::Summarize(arg) => summarize::run(&arg)?,
        Mode::RuntimeReport(arg) => runtime_report::run(&arg)?,
    }
    Ok(())
}
