//! Crate-boundary error type. Interpreter faults stay internal
//! ([`crate::interpreter::Fault`]); this enum is what the CLI and any
//! embedding caller see when loading or creating a process fails.

use crate::process::CreateError;

#[derive(Debug, thiserror::Error)]
pub enum VmError {
    #[error(transparent)]
    Create(#[from] CreateError),
    #[error("failed to read bytecode image: {0}")]
    Io(#[from] std::io::Error),
}
