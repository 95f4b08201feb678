use crate::ast::Direction;

use super::{Machine, MachineError, PendingCall};

/// Outcome of one readiness scan over the call queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scan {
    /// Nothing queued at all.
    Empty,
    /// Work is queued but no entry is eligible — deadlock if it stays so.
    Stalled,
    /// Index of the earliest eligible entry.
    Runnable(usize),
}

impl Machine {
    /// Scan the queue in insertion order and report the first call whose
    /// `in` bindings are all ready. A binding that names a missing
    /// variable fails the run outright.
    pub fn select_runnable(&self) -> Result<Scan, MachineError> {
        if self.queue.is_empty() {
            return Ok(Scan::Empty);
        }
        for (index, call) in self.queue.iter().enumerate() {
            if self.eligible(call)? {
                return Ok(Scan::Runnable(index));
            }
        }
        Ok(Scan::Stalled)
    }

    /// Scan and dequeue. Skipped entries keep their relative order.
    pub fn pop_runnable(&mut self) -> Result<Option<PendingCall>, MachineError> {
        match self.select_runnable()? {
            Scan::Runnable(index) => Ok(self.queue.remove(index)),
            Scan::Empty | Scan::Stalled => Ok(None),
        }
    }

    fn eligible(&self, call: &PendingCall) -> Result<bool, MachineError> {
        for binding in &call.bindings {
            let var = self.store.read(&binding.name)?;
            // Reservation check: nothing sets `bound` today, but a
            // reserved variable would block the call just like an
            // unready input.
            if var.bound {
                return Ok(false);
            }
            if binding.direction == Direction::In && !var.ready {
                return Ok(false);
            }
        }
        Ok(true)
    }
}
