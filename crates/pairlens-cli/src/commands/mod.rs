mod analyze;

use crate::cli::{Cli, Command};
use crate::error::CliError;
use crate::output;

pub use analyze::AnalysisRun;

/// Runs the selected command and renders its result.
///
/// Analysis failures are rendered as a failure envelope when JSON output was
/// requested, then returned so the process exits with the matching code.
pub async fn run(cli: &Cli) -> Result<(), CliError> {
    match &cli.command {
        Command::Analyze(args) => match analyze::run(args).await {
            Ok(run) => output::render(&run, cli.format, cli.pretty),
            Err(failure) => {
                if let CliError::Analysis(error) = &failure.error {
                    output::render_failure(error, failure.meta, cli.format, cli.pretty)?;
                }
                Err(failure.error)
            }
        },
    }
}
