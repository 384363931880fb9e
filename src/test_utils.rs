//! Shared test utilities for building minimal NVM0 bytecode images.
//!
//! These helpers de-duplicate image construction logic across tests in the
//! interpreter, process, and scheduler modules.

#![allow(dead_code)]

use crate::image::MAGIC;
use crate::interpreter::op;

/// Prefixes `body` with the NVM0 magic, producing a complete image.
pub fn image(body: &[u8]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(MAGIC.len() + body.len());
    bytes.extend_from_slice(&MAGIC);
    bytes.extend_from_slice(body);
    bytes
}

/// `PUSH <value>` as raw bytes: opcode + big-endian 4-byte immediate.
pub fn push(value: i32) -> Vec<u8> {
    let mut bytes = vec![op::PUSH];
    bytes.extend_from_slice(&value.to_be_bytes());
    bytes
}

/// An image that halts immediately.
pub fn halt_image() -> Vec<u8> {
    image(&[op::HALT])
}

/// An image that calls `SYSCALL EXIT` after pushing `code`.
pub fn exit_image(code: i32) -> Vec<u8> {
    let mut body = push(code);
    body.push(op::SYSCALL);
    body.push(crate::syscall::id::EXIT);
    image(&body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn halt_image_has_magic_and_one_opcode() {
        let img = halt_image();
        assert_eq!(&img[0..4], &MAGIC);
        assert_eq!(img[4], op::HALT);
    }

    #[test]
    fn exit_image_encodes_push_then_syscall() {
        let img = exit_image(9);
        assert_eq!(&img[0..4], &MAGIC);
        assert_eq!(img[4], op::PUSH);
        assert_eq!(&img[5..9], &9i32.to_be_bytes());
        assert_eq!(img[9], op::SYSCALL);
        assert_eq!(img[10], crate::syscall::id::EXIT);
    }
}
