use std::path::PathBuf;

use clap::Args;
use foldstats_analysis::{algorithm::Algorithm, layout::DatasetLayout};

use crate::runtime;

#[derive(Debug, Clone, Args)]
pub(crate) struct RuntimeReportArg {
    /// Dataset directory produced by the training pipeline
    pub dataset_dir: PathBuf,

    /// Algorithm selection mask limiting the algorithm rows of the report
    #[arg(long, default_value = "1111111")]
    pub algorithms: String,
}

pub(crate) fn run(arg: &RuntimeReportArg) -> anyhow::Result<()> {
    let algorithms = Algorithm::decode_selection(&arg.algorithms)?;
    // label columns are irrelevant here
    let layout = DatasetLayout::new(&arg.dataset_dir, "", None);
    runtime::write_runtime_report(
        &layout.runtime_dir(),
        &layout.runtime_report_path(),
        &algorithms,
    )
}
