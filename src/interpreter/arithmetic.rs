//! ADD/SUB/MUL/DIV/MOD: two's-complement arithmetic over the top two words.

use super::{op, Fault};
use crate::process::Pcb;

fn op_name(opcode: u8) -> &'static str {
    match opcode {
        op::ADD => "ADD",
        op::SUB => "SUB",
        op::MUL => "MUL",
        op::DIV => "DIV",
        op::MOD => "MOD",
        _ => unreachable!("arithmetic::apply called with non-arithmetic opcode"),
    }
}

/// Pops `top`/`second`, applies `opcode`'s operation, pushes one result.
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
        op::ADD => second.wrapping_add(top),
        op::SUB => second.wrapping_sub(top),
        op::MUL => second.wrapping_mul(top),
        op::DIV => {
            if top == 0 {
                proc.push(second);
                proc.push(top);
                return Err(Fault::DivisionByZero { op: name });
            }
            second.wrapping_div(top)
        }
        op::MOD => {
            if top == 0 {
                proc.push(second);
                proc.push(top);
                return Err(Fault::DivisionByZero { op: name });
            }
            second.wrapping_rem(top)
        }
        _ => unreachable!(),
    };

    proc.push(result);
    Ok(())
}
