//! Process Control Block and Process Table: the fixed-capacity data model
//! every other component mutates in place.

use crate::capability::CapabilitySet;
use crate::image::{self, ImageError, ENTRY_POINT};

/// Number of process slots in the table.
pub const MAX_PROCESSES: usize = 8;
/// Number of words on a process's data stack.
pub const STACK_SIZE: usize = 256;
/// Number of local variable slots per process.
pub const MAX_LOCALS: usize = 32;

/// Process identifier: a table slot index.
pub type Pid = u8;

/// One process's complete register/stack/local state.
///
/// `bytecode` borrows the caller-owned image buffer for the process's
/// lifetime; the table that owns the `Pcb` also bounds that borrow.
pub struct Pcb<'img> {
    bytecode: &'img [u8],
    pub(crate) ip: i32,
    pub(crate) sp: i32,
    stack: [i32; STACK_SIZE],
    locals: [i32; MAX_LOCALS],
    caps: CapabilitySet,
    pid: Pid,
    active: bool,
    /// Reserved for future message-passing IPC; never set to `true` in this
    /// version.
    #[allow(dead_code)]
    blocked: bool,
    exit_code: i32,
}

impl<'img> Pcb<'img> {
    fn new(bytecode: &'img [u8], pid: Pid, caps: CapabilitySet) -> Self {
        Self {
            bytecode,
            ip: ENTRY_POINT,
            sp: 0,
            stack: [0; STACK_SIZE],
            locals: [0; MAX_LOCALS],
            caps,
            pid,
            active: true,
            blocked: false,
            exit_code: 0,
        }
    }

    pub fn pid(&self) -> Pid {
        self.pid
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn exit_code(&self) -> i32 {
        self.exit_code
    }

    pub fn ip(&self) -> i32 {
        self.ip
    }

    pub fn sp(&self) -> i32 {
        self.sp
    }

    pub fn size(&self) -> i32 {
        self.bytecode.len() as i32
    }

    pub fn bytecode(&self) -> &[u8] {
        self.bytecode
    }

    pub fn has_capability(&self, cap: u16) -> bool {
        self.caps.has(cap)
    }

    pub fn stack_slice(&self) -> &[i32] {
        &self.stack[..self.sp as usize]
    }

    pub fn local(&self, index: usize) -> i32 {
        self.locals[index]
    }

    pub fn set_local(&mut self, index: usize, value: i32) {
        self.locals[index] = value;
    }

    pub fn push(&mut self, value: i32) -> bool {
        if (self.sp as usize) >= STACK_SIZE {
            return false;
        }
        self.stack[self.sp as usize] = value;
        self.sp += 1;
        true
    }

    pub fn pop(&mut self) -> Option<i32> {
        if self.sp <= 0 {
            return None;
        }
        self.sp -= 1;
        Some(self.stack[self.sp as usize])
    }

    pub fn peek(&self) -> Option<i32> {
        if self.sp <= 0 {
            None
        } else {
            Some(self.stack[self.sp as usize - 1])
        }
    }

    /// Terminates the process. Once `active` is `false`, `exit_code` is
    /// never written again.
    pub fn terminate(&mut self, exit_code: i32) {
        if self.active {
            self.exit_code = exit_code;
            self.active = false;
        }
    }
}

/// Fixed-capacity table of process slots, indexed by [`Pid`].
#[derive(Default)]
pub struct ProcessTable<'img> {
    slots: Vec<Option<Pcb<'img>>>,
}

impl<'img> ProcessTable<'img> {
    pub fn new() -> Self {
        Self {
            slots: (0..MAX_PROCESSES).map(|_| None).collect(),
        }
    }

    /// Validates `image`'s magic, then scans slots in ascending order for
    /// the first with `active = false`, initializes it, and returns its pid.
    pub fn create(
        &mut self,
        image: &'img [u8],
        caps: &[u16],
    ) -> Result<Pid, CreateError> {
        image::validate(image)?;

        for (i, slot) in self.slots.iter_mut().enumerate() {
            if slot.as_ref().is_none_or(|p| !p.is_active()) {
                *slot = Some(Pcb::new(image, i as Pid, CapabilitySet::from_slice(caps)));
                return Ok(i as Pid);
            }
        }
        Err(CreateError::NoFreeSlot)
    }

    pub fn get(&self, pid: Pid) -> Option<&Pcb<'img>> {
        self.slots.get(pid as usize)?.as_ref()
    }

    pub fn get_mut(&mut self, pid: Pid) -> Option<&mut Pcb<'img>> {
        self.slots.get_mut(pid as usize)?.as_mut()
    }

    pub fn is_active(&self, pid: Pid) -> bool {
        self.get(pid).is_some_and(Pcb::is_active)
    }

    /// Defined only when the slot exists and is inactive; `-1` otherwise.
    pub fn exit_code(&self, pid: Pid) -> i32 {
        match self.get(pid) {
            Some(pcb) if !pcb.is_active() => pcb.exit_code(),
            _ => -1,
        }
    }

    /// Pids of every currently active slot, in ascending order.
    pub fn active_pids(&self) -> impl Iterator<Item = Pid> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, s)| s.as_ref().filter(|p| p.is_active()).map(|_| i as Pid))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CreateError {
    #[error(transparent)]
    Image(#[from] ImageError),
    #[error("no free process slots")]
    NoFreeSlot,
}
