use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    Success,
    FindingsPresent,
    InvalidArgs,
    AssessmentFailed,
}

impl ExitCode {
    pub const fn as_i32(self) -> i32 {
        match self {
            ExitCode::Success => 0,
            ExitCode::FindingsPresent => 1,
            ExitCode::InvalidArgs => 2,
            ExitCode::AssessmentFailed => 10,
        }
    }

    /// Untagged errors are assessment failures.
    pub fn of(err: &anyhow::Error) -> Self {
        err.chain()
            .find_map(|cause| cause.downcast_ref::<ExitError>())
            .map_or(ExitCode::AssessmentFailed, |exit| exit.code)
    }

    /// Follow-up hints printed under `next:`; empty when none apply.
    pub fn next_steps(self) -> &'static [&'static str] {
        match self {
            ExitCode::Success | ExitCode::FindingsPresent => &[],
            ExitCode::InvalidArgs => &[
                "list valid rule ids with `secassess rules`",
                "check the input path, `--exclude` globs and the config file (`secassess config --show`)",
            ],
            ExitCode::AssessmentFailed => &[
                "rerun with `--verbose` (or SECASSESS_LOG=debug) for details",
                "see `secassess --help` for available commands and options",
            ],
        }
    }
}

#[derive(Debug)]
pub struct ExitError {
    pub code: ExitCode,
    pub err: anyhow::Error,
}

impl ExitError {
    pub fn new(code: ExitCode, err: anyhow::Error) -> Self {
        Self { code, err }
    }
}

impl fmt::Display for ExitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.err.fmt(f)
    }
}

impl std::error::Error for ExitError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(self.err.as_ref())
    }
}

pub fn exit_code(err: &anyhow::Error) -> i32 {
    ExitCode::of(err).as_i32()
}

pub fn invalid_args(message: impl Into<String>) -> anyhow::Error {
    ExitError::new(ExitCode::InvalidArgs, anyhow::anyhow!(message.into())).into()
}

pub fn invalid_args_err(err: anyhow::Error) -> anyhow::Error {
    ExitError::new(ExitCode::InvalidArgs, err).into()
}

pub fn findings_present(count: usize) -> anyhow::Error {
    ExitError::new(
        ExitCode::FindingsPresent,
        anyhow::anyhow!("{count} finding(s) reported"),
    )
    .into()
}
