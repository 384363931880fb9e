//! CMP/EQ/NEQ/GT/LT: comparison opcodes over the top two words.

use super::{op, Fault};
use crate::process::Pcb;

fn op_name(opcode: u8) -> &'static str {
    match opcode {
        op::CMP => "CMP",
        op::EQ => "EQ",
        op::NEQ => "NEQ",
        op::GT => "GT",
        op::LT => "LT",
        _ => unreachable!("compare::apply called with non-comparison opcode"),
    }
}

pub fn apply(opcode: u8, proc: &mut Pcb) -> Result<(), Fault> {
    let name = op_name(opcode);
    let top = proc.pop().ok_or(Fault::StackUnderflow { op: name })?;
    let second = match proc.pop() {
        Some(v) => v,
        None => {
            proc.push(top);
            return Err(Fault::StackUnderflow { op: name });
        }
    };

    let result = match opcode {
        op::CMP => match second.cmp(&top) {
            std::cmp::Ordering::Less => -1,
            std::cmp::Ordering::Equal => 0,
            std::cmp::Ordering::Greater => 1,
        },
        op::EQ => (top == second) as i32,
        op::NEQ => (top != second) as i32,
        op::GT => (second > top) as i32,
        op::LT => (second < top) as i32,
        _ => unreachable!(),
    };

    proc.push(result);
    Ok(())
}
