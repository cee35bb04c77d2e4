use std::process::ExitCode;

/// Exit status for CLI commands.
///
/// - `Success` (0): no relationship issues
/// - `Failure` (1): ambiguous or unresolvable relationships were found
/// - `Error` (2): files could not be parsed, or the command failed
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ExitStatus {
    Success,
    Failure,
    Error,
}

impl From<ExitStatus> for ExitCode {
    fn from(status: ExitStatus) -> Self {
        match status {
            ExitStatus::Success => ExitCode::from(0),
            ExitStatus::Failure => ExitCode::from(1),
            ExitStatus::Error => ExitCode::from(2),
        }
    }
}
