#![doc = r#"
NVM library crate.

This crate exposes the virtual machine core modules for use by binaries and
tests.

Modules:
- image: NVM0 bytecode image validation
- capability: fixed-size capability set and literal-equality checks
- process: Process Control Block and Process Table, the core data model
- syscall: EXIT/PRINT syscall dispatch
- interpreter: single-step opcode execution, split by opcode family
- scheduler: cooperative round-robin execution over a process table
- logging: the File/Stdout/None log sink
- error: crate-boundary error type

In tests, shared image builders are available under `crate::test_utils`.
"#]

pub mod capability;
pub mod error;
pub mod image;
pub mod interpreter;
pub mod logging;
pub mod process;
pub mod scheduler;
pub mod syscall;

pub use error::VmError;
pub use process::{Pcb, Pid, ProcessTable};

#[cfg(test)]
pub mod test_utils;
