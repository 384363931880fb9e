//! JMP/JZ/JNZ/CALL/RET: control transfer opcodes.

use super::{decode_i32, op, validate_target, Fault};
use crate::process::Pcb;

/// JMP always jumps; JZ/JNZ pop a value first and jump conditionally.
pub fn jump(opcode: u8, proc: &mut Pcb) -> Result<(), Fault> {
    let condition = match opcode {
        op::JMP => None,
        op::JZ => Some(proc.pop().ok_or(Fault::StackUnderflow { op: "JZ" })? == 0),
        op::JNZ => Some(proc.pop().ok_or(Fault::StackUnderflow { op: "JNZ" })? != 0),
        _ => unreachable!("jump called with non-jump opcode"),
    };

    let target = decode_i32(proc)?;
    if condition.unwrap_or(true) {
        proc.ip = validate_target(proc, target)?;
    }
    Ok(())
}

/// Pushes the post-operand `ip` as the return address, then jumps.
pub fn call(proc: &mut Pcb) -> Result<(), Fault> {
    let target = decode_i32(proc)?;
    let return_addr = proc.ip();
    let checked_target = validate_target(proc, target)?;
    if !proc.push(return_addr) {
        return Err(Fault::StackOverflow { op: "CALL" });
    }
    proc.ip = checked_target;
    Ok(())
}

pub fn ret(proc: &mut Pcb) -> Result<(), Fault> {
    let addr = proc.pop().ok_or(Fault::StackUnderflow { op: "RET" })?;
    proc.ip = validate_target(proc, addr)?;
    Ok(())
}
