//! SYSCALL/BREAK: the two opcodes that reach outside the interpreter loop.

use super::{decode_u8, Dispatched, Fault};
use crate::process::Pcb;
use crate::syscall::{self, SyscallOutcome};

/// Reads the syscall id and dispatches it through [`syscall::dispatch`]. A
/// `Warned` outcome (e.g. PRINT on an empty stack) is not a fault: the
/// process keeps running.
pub(crate) fn syscall(proc: &mut Pcb, emit: &mut dyn FnMut(u8)) -> Result<Dispatched, Fault> {
    let id = decode_u8(proc)?;
    match syscall::dispatch(id, proc, emit) {
        SyscallOutcome::Ok | SyscallOutcome::Warned => Ok(Dispatched::Ran),
        SyscallOutcome::Terminated => Ok(Dispatched::Halted),
    }
}

/// BREAK leaves process state untouched; it only emits a debug trace.
pub fn debug_break(proc: &Pcb) {
    log::debug!(
        "process {}: BREAK at ip={:#x} sp={}",
        proc.pid(),
        proc.ip(),
        proc.sp()
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::ProcessTable;
    use crate::syscall::id;

    fn with_proc<R>(image: &[u8], f: impl FnOnce(&mut Pcb) -> R) -> R {
        let mut table = ProcessTable::new();
        let pid = table.create(image, &[]).unwrap();
        f(table.get_mut(pid).unwrap())
    }

    #[test]
    fn syscall_exit_halts_with_popped_code() {
        // magic(4), SYSCALL id byte = EXIT
        let image: &[u8] = &[0x4E, 0x56, 0x4D, 0x30, id::EXIT];
        with_proc(image, |proc| {
            proc.ip = 4;
            proc.push(7);
            let outcome = syscall(proc, &mut |_| {}).unwrap();
            assert!(matches!(outcome, Dispatched::Halted));
        });
    }

    #[test]
    fn syscall_print_on_empty_stack_is_not_a_fault() {
        let image: &[u8] = &[0x4E, 0x56, 0x4D, 0x30, id::PRINT];
        with_proc(image, |proc| {
            proc.ip = 4;
            let outcome = syscall(proc, &mut |_| {}).unwrap();
            assert!(matches!(outcome, Dispatched::Ran));
            assert!(proc.is_active());
        });
    }

    #[test]
    fn syscall_unknown_id_halts_with_fault_exit_code() {
        let image: &[u8] = &[0x4E, 0x56, 0x4D, 0x30, 0xAB];
        with_proc(image, |proc| {
            proc.ip = 4;
            let outcome = syscall(proc, &mut |_| {}).unwrap();
            assert!(matches!(outcome, Dispatched::Halted));
        });
    }

    #[test]
    fn debug_break_does_not_change_state() {
        let image: &[u8] = &[0x4E, 0x56, 0x4D, 0x30, 0x00];
        with_proc(image, |proc| {
            proc.push(42);
            let ip_before = proc.ip();
            let sp_before = proc.sp();
            debug_break(proc);
            assert_eq!(proc.ip(), ip_before);
            assert_eq!(proc.sp(), sp_before);
        });
    }
}
