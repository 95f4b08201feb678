use std::io::Write;

use super::store::{Value, VarStore};
use super::{MachineError, PendingCall};

/// Built-in operations. The executor resolves call names here before
/// consulting the function registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intrinsic {
    Add,
    Print,
}

impl Intrinsic {
    pub fn resolve(name: &str) -> Option<Intrinsic> {
        match name {
            "add" => Some(Intrinsic::Add),
            "print" => Some(Intrinsic::Print),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Intrinsic::Add => "add",
            Intrinsic::Print => "print",
        }
    }

    /// Intrinsics address their call's bindings positionally; the
    /// in/out tags are documentation only.
    pub fn run(
        self,
        store: &mut VarStore,
        call: &PendingCall,
        out: &mut dyn Write,
    ) -> Result<(), MachineError> {
        match self {
            Intrinsic::Add => {
                let lhs = store.read(self.slot(call, 0, 3)?)?.value.as_int();
                let rhs = store.read(self.slot(call, 1, 3)?)?.value.as_int();
                let dst = self.slot(call, 2, 3)?;
                store.write(dst, Value::Int(lhs + rhs), true)
            }
            Intrinsic::Print => {
                let value = &store.read(self.slot(call, 0, 1)?)?.value;
                writeln!(out, "{}", value)?;
                Ok(())
            }
        }
    }

    fn slot<'a>(
        self,
        call: &'a PendingCall,
        index: usize,
        expected: usize,
    ) -> Result<&'a str, MachineError> {
        call.bindings
            .get(index)
            .map(|binding| binding.name.as_str())
            .ok_or(MachineError::BindingArity {
                intrinsic: self.name(),
                expected,
                got: call.bindings.len(),
            })
    }
}
