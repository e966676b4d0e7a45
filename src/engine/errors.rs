use thiserror::Error;

use super::registry::SessionId;

/// The loaded text could not be read as a program.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LoadError {
    #[error("program is not valid UTF-8 (valid up to byte {valid_up_to})")]
    NotUtf8 { valid_up_to: usize },

    /// NUL or other control characters; almost certainly a binary file.
    #[error("line {line}: unexpected control character, input looks binary")]
    Binary { line: usize },
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FinishReason {
    #[error("end of program")]
    EndOfProgram,
    #[error("invalid instruction pointer")]
    InvalidInstructionPointer,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StepError {
    #[error("execution finished: {0}")]
    ExecutionFinished(FinishReason),

    #[error("invalid instruction pointer: rip = {rip}")]
    InvalidInstructionPointer { rip: i64 },

    #[error("no history available")]
    NoHistory,

    #[error("line {line}: malformed `{text}`: {reason}")]
    Malformed { line: usize, text: String, reason: String },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("unknown session {0}")]
    UnknownSession(SessionId),

    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Step(#[from] StepError),
}
