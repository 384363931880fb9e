//! PUSH/POP/DUP/SWAP: the stack-manipulation opcode family.

use super::{decode_i32, Fault};
use crate::process::Pcb;

pub fn push(proc: &mut Pcb) -> Result<(), Fault> {
    let value = decode_i32(proc)?;
    if proc.push(value) {
        Ok(())
    } else {
        Err(Fault::StackOverflow { op: "PUSH" })
    }
}

pub fn pop(proc: &mut Pcb) -> Result<(), Fault> {
    proc.pop()
        .map(|_| ())
        .ok_or(Fault::StackUnderflow { op: "POP" })
}

pub fn dup(proc: &mut Pcb) -> Result<(), Fault> {
    let top = proc.peek().ok_or(Fault::StackUnderflow { op: "DUP" })?;
    if proc.push(top) {
        Ok(())
    } else {
        Err(Fault::StackOverflow { op: "DUP" })
    }
}

pub fn swap(proc: &mut Pcb) -> Result<(), Fault> {
    let top = proc.pop().ok_or(Fault::StackUnderflow { op: "SWAP" })?;
    let second = match proc.pop() {
        Some(v) => v,
        None => {
            // Restore the popped value before reporting the fault so the
            // stack is left exactly as it was found.
            proc.push(top);
            return Err(Fault::StackUnderflow { op: "SWAP" });
        }
    };
    proc.push(top);
    proc.push(second);
    Ok(())
}
