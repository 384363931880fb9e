//! Syscall Dispatcher: decodes a syscall id and performs its effect on the
//! executing process.

use crate::process::Pcb;

/// Defined syscall ids.
pub mod id {
    pub const EXIT: u8 = 0x00;
    pub const PRINT: u8 = 0x0E;
}

/// Outcome of a syscall, distinct from an interpreter [`Fault`](crate::interpreter::Fault):
/// an unknown id terminates the process, but a malformed `PRINT` only aborts
/// the syscall itself.
pub enum SyscallOutcome {
    Ok,
    /// The syscall itself faulted without terminating the process.
    Warned,
    /// The process was terminated (by EXIT, or by an unknown id).
    Terminated,
}

/// Dispatches `syscall_id` against `proc`, writing console output through
/// `emit` for `PRINT`.
pub fn dispatch(syscall_id: u8, proc: &mut Pcb, emit: &mut dyn FnMut(u8)) -> SyscallOutcome {
    match syscall_id {
        id::EXIT => {
            let code = proc.pop().unwrap_or(0);
            proc.terminate(code);
            SyscallOutcome::Terminated
        }
        id::PRINT => match proc.pop() {
            Some(value) => {
                emit((value & 0xFF) as u8);
                SyscallOutcome::Ok
            }
            None => {
                log::warn!("process {}: stack underflow in PRINT syscall", proc.pid());
                SyscallOutcome::Warned
            }
        },
        other => {
            log::warn!(
                "process {}: unknown syscall id {:#04x}",
                proc.pid(),
                other
            );
            proc.terminate(-1);
            SyscallOutcome::Terminated
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::ProcessTable;

    const HALT: &[u8] = &[0x4E, 0x56, 0x4D, 0x30, 0x00];

    #[test]
    fn exit_pops_exit_code() {
        let mut table = ProcessTable::new();
        let pid = table.create(HALT, &[]).unwrap();
        let proc = table.get_mut(pid).unwrap();
        proc.push(7);
        let outcome = dispatch(id::EXIT, proc, &mut |_| {});
        assert!(matches!(outcome, SyscallOutcome::Terminated));
        assert_eq!(proc.exit_code(), 7);
        assert!(!proc.is_active());
    }

    #[test]
    fn exit_with_empty_stack_defaults_to_zero() {
        let mut table = ProcessTable::new();
        let pid = table.create(HALT, &[]).unwrap();
        let proc = table.get_mut(pid).unwrap();
        dispatch(id::EXIT, proc, &mut |_| {});
        assert_eq!(proc.exit_code(), 0);
    }

    #[test]
    fn print_emits_low_byte_and_pops() {
        let mut table = ProcessTable::new();
        let pid = table.create(HALT, &[]).unwrap();
        let proc = table.get_mut(pid).unwrap();
        proc.push(0x1F41); // low byte 0x41 = 'A'
        let mut out = Vec::new();
        let outcome = dispatch(id::PRINT, proc, &mut |b| out.push(b));
        assert!(matches!(outcome, SyscallOutcome::Ok));
        assert_eq!(out, vec![0x41]);
        assert_eq!(proc.sp(), 0);
    }

    #[test]
    fn print_on_empty_stack_warns_without_terminating() {
        let mut table = ProcessTable::new();
        let pid = table.create(HALT, &[]).unwrap();
        let proc = table.get_mut(pid).unwrap();
        let outcome = dispatch(id::PRINT, proc, &mut |_| {});
        assert!(matches!(outcome, SyscallOutcome::Warned));
        assert!(proc.is_active());
    }

    #[test]
    fn unknown_id_terminates_with_fault_code() {
        let mut table = ProcessTable::new();
        let pid = table.create(HALT, &[]).unwrap();
        let proc = table.get_mut(pid).unwrap();
        let outcome = dispatch(0x7F, proc, &mut |_| {});
        assert!(matches!(outcome, SyscallOutcome::Terminated));
        assert_eq!(proc.exit_code(), -1);
    }
}
