use std::process::ExitCode;

/// Exit status for the CLI.
///
/// - `Success` (0): destination file updated (or config created)
/// - `Failure` (1): configuration, precondition, or filesystem failure
/// - `ExpansionFailed` (2): the preprocessor failed on a staged file
/// - `ExtractionFailed` (3): the string-extraction utility failed
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ExitStatus {
    Success,
    Failure,
    ExpansionFailed,
    ExtractionFailed,
}

impl From<ExitStatus> for ExitCode {
    fn from(status: ExitStatus) -> Self {
        match status {
            ExitStatus::Success => ExitCode::from(0),
            ExitStatus::Failure => ExitCode::from(1),
            ExitStatus::ExpansionFailed => ExitCode::from(2),
            ExitStatus::ExtractionFailed => ExitCode::from(3),
        }
    }
}

impl ExitStatus {
    /// Exit status for an error that escaped a command.
    pub fn from_error(err: &anyhow::Error) -> Self {
        err.downcast_ref::<crate::error::PipelineError>()
            .map(|e| e.exit_status())
            .unwrap_or(Self::Failure)
    }
}
