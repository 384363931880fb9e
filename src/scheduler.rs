//! Scheduler: cooperative round-robin execution over a [`ProcessTable`].
//!
//! The scheduler never touches process internals directly, only
//! `interpreter::step` and the table's `active_pids()` view.

use crate::interpreter::{self, memory::DeviceMemory};
use crate::process::{Pid, ProcessTable};

/// Instructions granted to a process per scheduling turn. A quantum is
/// an instruction count, not a wall-clock slice: the VM has no timer device.
pub const DEFAULT_QUANTUM: u32 = 10_000;

/// Runs a single process to completion, ignoring every other slot. This is
/// the convenience path the CLI uses for `nvm <image>`.
pub fn run_to_completion(table: &mut ProcessTable, pid: Pid, emit: &mut dyn FnMut(u8)) {
    let mut devmem = DeviceMemory::new();
    log::info!("process {}: starting", pid);
    let Some(proc) = table.get_mut(pid) else {
        return;
    };
    while interpreter::step(proc, emit, &mut devmem) == interpreter::StepOutcome::Continue {}
    log::info!("process {}: exited with code {}", pid, proc.exit_code());
}

/// Gives every active process up to [`DEFAULT_QUANTUM`] instructions, in
/// ascending pid order, then returns. Call repeatedly until no process is
/// active to run a full multi-process schedule.
pub fn tick(table: &mut ProcessTable, devmem: &mut DeviceMemory, emit: &mut dyn FnMut(u8)) {
    for pid in table.active_pids().collect::<Vec<_>>() {
        let Some(proc) = table.get_mut(pid) else {
            continue;
        };
        for _ in 0..DEFAULT_QUANTUM {
            if !proc.is_active() {
                break;
            }
            if interpreter::step(proc, emit, devmem) == interpreter::StepOutcome::Stopped {
                log::info!("process {}: exited with code {}", pid, proc.exit_code());
                break;
            }
        }
    }
}
