/*!
Interpreter: one-instruction execution over a process control block.

[`step`] is the single entry point: it fetches one opcode byte, advances
`ip`, and delegates to a family handler module.

```text
stack.rs          - PUSH/POP/DUP/SWAP
arithmetic.rs      - ADD/SUB/MUL/DIV/MOD
compare.rs          - CMP/EQ/NEQ/GT/LT
control_flow.rs     - JMP/JZ/JNZ/CALL/RET
memory.rs           - LOAD/STORE/STORE_ABS (+ device-memory shim)
misc.rs             - HALT/NOP/BREAK/SYSCALL/unknown opcode
```

Every opcode either completes normally, leaving all invariants intact, or
returns a [`Fault`], which `step` turns into `exit_code = -1, active = false`
and a WARN log record before reporting [`StepOutcome::Stopped`] to the
scheduler.
*/

pub mod arithmetic;
pub mod compare;
pub mod control_flow;
pub mod memory;
pub mod misc;
pub mod stack;

use crate::process::{Pcb, MAX_LOCALS};
use memory::DeviceMemory;

/// Opcode byte values.
pub mod op {
    pub const HALT: u8 = 0x00;
    pub const NOP: u8 = 0x01;
    pub const PUSH: u8 = 0x02;
    pub const POP: u8 = 0x04;
    pub const DUP: u8 = 0x05;
    pub const SWAP: u8 = 0x06;
    pub const ADD: u8 = 0x10;
    pub const SUB: u8 = 0x11;
    pub const MUL: u8 = 0x12;
    pub const DIV: u8 = 0x13;
    pub const MOD: u8 = 0x14;
    pub const CMP: u8 = 0x20;
    pub const EQ: u8 = 0x21;
    pub const NEQ: u8 = 0x22;
    pub const GT: u8 = 0x23;
    pub const LT: u8 = 0x24;
    pub const JMP: u8 = 0x30;
    pub const JZ: u8 = 0x31;
    pub const JNZ: u8 = 0x32;
    pub const CALL: u8 = 0x33;
    pub const RET: u8 = 0x34;
    pub const LOAD: u8 = 0x40;
    pub const STORE: u8 = 0x41;
    pub const STORE_ABS: u8 = 0x45;
    pub const SYSCALL: u8 = 0x50;
    pub const BREAK: u8 = 0x51;
}

/// Every way an instruction can terminate its process.
#[derive(Debug, thiserror::Error)]
pub enum Fault {
    #[error("stack overflow in {op}")]
    StackOverflow { op: &'static str },
    #[error("stack underflow in {op}")]
    StackUnderflow { op: &'static str },
    #[error("division by zero in {op}")]
    DivisionByZero { op: &'static str },
    #[error("unknown opcode {0:#04x}")]
    UnknownOpcode(u8),
    #[error("truncated immediate operand")]
    TruncatedImmediate,
    #[error("invalid jump target {0:#x}")]
    InvalidJumpTarget(i32),
    #[error("invalid local index {0}")]
    InvalidLocalIndex(u8),
    #[error("missing capability for {op}")]
    CapabilityDenied { op: &'static str },
    #[error("invalid absolute address {0:#010x}")]
    InvalidAbsoluteAddress(u32),
    #[error("instruction pointer out of bounds")]
    IpOutOfBounds,
}

/// What the scheduler should do after one [`step`] call.
#[derive(Debug, PartialEq, Eq)]
pub enum StepOutcome {
    /// The process is still active; schedule it again.
    Continue,
    /// The process terminated (HALT, EXIT, or a fault).
    Stopped,
}

/// Executes one instruction on `proc`. `emit` receives bytes written by the
/// `PRINT` syscall; `devmem` backs `STORE_ABS`.
pub fn step(proc: &mut Pcb, emit: &mut dyn FnMut(u8), devmem: &mut DeviceMemory) -> StepOutcome {
    if proc.ip() < 0 || proc.ip() as usize >= proc.bytecode().len() {
        fault(proc, Fault::IpOutOfBounds);
        return StepOutcome::Stopped;
    }

    let opcode = proc.bytecode()[proc.ip() as usize];
    proc.ip += 1;

    let result = dispatch(opcode, proc, emit, devmem);

    match result {
        Ok(Dispatched::Ran) => StepOutcome::Continue,
        Ok(Dispatched::Halted) => StepOutcome::Stopped,
        Err(f) => {
            fault(proc, f);
            StepOutcome::Stopped
        }
    }
}

/// Internal: did this opcode merely run, or did it terminate the process
/// through a defined (non-fault) path such as HALT or SYSCALL EXIT?
pub(crate) enum Dispatched {
    Ran,
    Halted,
}

fn dispatch(
    opcode: u8,
    proc: &mut Pcb,
    emit: &mut dyn FnMut(u8),
    devmem: &mut DeviceMemory,
) -> Result<Dispatched, Fault> {
    use op::*;
    match opcode {
        HALT => {
            proc.terminate(0);
            Ok(Dispatched::Halted)
        }
        NOP => Ok(Dispatched::Ran),
        PUSH => stack::push(proc).map(|()| Dispatched::Ran),
        POP => stack::pop(proc).map(|()| Dispatched::Ran),
        DUP => stack::dup(proc).map(|()| Dispatched::Ran),
        SWAP => stack::swap(proc).map(|()| Dispatched::Ran),
        ADD | SUB | MUL | DIV | MOD => {
            arithmetic::apply(opcode, proc).map(|()| Dispatched::Ran)
        }
        CMP | EQ | NEQ | GT | LT => compare::apply(opcode, proc).map(|()| Dispatched::Ran),
        JMP | JZ | JNZ => control_flow::jump(opcode, proc).map(|()| Dispatched::Ran),
        CALL => control_flow::call(proc).map(|()| Dispatched::Ran),
        RET => control_flow::ret(proc).map(|()| Dispatched::Ran),
        LOAD => memory::load(proc).map(|()| Dispatched::Ran),
        STORE => memory::store(proc).map(|()| Dispatched::Ran),
        STORE_ABS => memory::store_abs(proc, devmem).map(|()| Dispatched::Ran),
        SYSCALL => misc::syscall(proc, emit),
        BREAK => {
            misc::debug_break(proc);
            Ok(Dispatched::Ran)
        }
        other => Err(Fault::UnknownOpcode(other)),
    }
}

fn fault(proc: &mut Pcb, f: Fault) {
    log::warn!("process {}: {}", proc.pid(), f);
    proc.terminate(-1);
}

/// Reads a big-endian 32-bit immediate at `ip`, checking `ip + 3 < size`
/// first, then advances `ip` by 4.
pub(crate) fn decode_i32(proc: &mut Pcb) -> Result<i32, Fault> {
    let ip = proc.ip();
    let size = proc.size();
    if ip.checked_add(3).is_none_or(|last| last >= size) {
        return Err(Fault::TruncatedImmediate);
    }
    let bytes = proc.bytecode();
    let i = ip as usize;
    let value = u32::from_be_bytes([bytes[i], bytes[i + 1], bytes[i + 2], bytes[i + 3]]);
    proc.ip += 4;
    Ok(value as i32)
}

/// Reads an 8-bit local-variable index at `ip`, checking `ip < size` first,
/// then advances `ip` by 1. Faults if the index is out of `[0, MAX_LOCALS)`.
pub(crate) fn decode_local_index(proc: &mut Pcb) -> Result<usize, Fault> {
    let ip = proc.ip();
    if ip >= proc.size() {
        return Err(Fault::TruncatedImmediate);
    }
    let index = proc.bytecode()[ip as usize];
    proc.ip += 1;
    if (index as usize) >= MAX_LOCALS {
        return Err(Fault::InvalidLocalIndex(index));
    }
    Ok(index as usize)
}

/// Reads a raw 8-bit operand at `ip` (the `SYSCALL` id), checking `ip < size`
/// first, then advances `ip` by 1.
pub(crate) fn decode_u8(proc: &mut Pcb) -> Result<u8, Fault> {
    let ip = proc.ip();
    if ip >= proc.size() {
        return Err(Fault::TruncatedImmediate);
    }
    let byte = proc.bytecode()[ip as usize];
    proc.ip += 1;
    Ok(byte)
}

/// Validates a jump/call/return target: must land in `[ENTRY_POINT, size)`.
pub(crate) fn validate_target(proc: &Pcb, target: i32) -> Result<i32, Fault> {
    if target >= crate::image::ENTRY_POINT && target < proc.size() {
        Ok(target)
    } else {
        Err(Fault::InvalidJumpTarget(target))
    }
}
