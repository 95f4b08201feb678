pub mod intrinsics;
pub mod scheduler;
pub mod store;

use std::collections::VecDeque;
use std::io::Write;

use crate::ast::{Binding, Instruction, Program};

use self::intrinsics::Intrinsic;
use self::store::{Value, VarStore};

#[derive(Debug, thiserror::Error)]
pub enum MachineError {
    #[error("variable already declared: {name}")]
    AlreadyDeclared { name: String },

    #[error("unknown variable: {name}")]
    UnknownVariable { name: String },

    #[error("unknown function: {name}")]
    UnknownFunction { name: String },

    #[error("deadlock: {pending} call(s) queued, none runnable")]
    Deadlocked { pending: usize },

    #[error("{intrinsic} takes {expected} bindings, got {got}")]
    BindingArity { intrinsic: &'static str, expected: usize, got: usize },

    #[error("output write failed: {0}")]
    Output(#[from] std::io::Error),
}

/// Driver loop position. `Halted` and `Deadlocked` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Initializing,
    Running,
    Draining,
    Halted,
    Deadlocked,
}

/// A queued, not-yet-executed invocation: the function name plus the
/// binding list snapshotted at `call` time.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingCall {
    pub function: String,
    pub bindings: Vec<Binding>,
}

/// The interpreter: one flat variable store, one shared call queue,
/// one transient binding accumulator. Strictly single-threaded; an
/// ineligible call just stays queued until a later scan.
#[derive(Debug)]
pub struct Machine {
    program: Program,
    store: VarStore,
    queue: VecDeque<PendingCall>,
    bindlist: Vec<Binding>,
    phase: Phase,
}

impl Machine {
    /// Wrap a parsed program. The registry must contain `_entry`.
    pub fn new(program: Program) -> Result<Machine, MachineError> {
        if program.function(Program::ENTRY).is_none() {
            return Err(MachineError::UnknownFunction { name: Program::ENTRY.to_string() });
        }
        Ok(Machine {
            program,
            store: VarStore::default(),
            queue: VecDeque::new(),
            bindlist: Vec::new(),
            phase: Phase::Initializing,
        })
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Run the whole program: `_entry` synchronously, then drain the
    /// queue until it empties or no queued call is eligible.
    pub fn run(&mut self, out: &mut dyn Write) -> Result<(), MachineError> {
        self.phase = Phase::Running;
        self.run_function(Program::ENTRY)?;

        self.phase = Phase::Draining;
        loop {
            match self.pop_runnable()? {
                Some(call) => self.execute_call(call, out)?,
                None if self.queue.is_empty() => {
                    self.phase = Phase::Halted;
                    return Ok(());
                }
                None => {
                    self.phase = Phase::Deadlocked;
                    return Err(MachineError::Deadlocked { pending: self.queue.len() });
                }
            }
        }
    }

    /// Execute one instruction against the shared store and queue.
    fn exec(&mut self, instruction: &Instruction) -> Result<(), MachineError> {
        match instruction {
            Instruction::Declare { name, ty } => self.store.declare(name, ty),
            Instruction::Assign { name, literal } => {
                self.store.write(name, Value::from_literal(literal), true)
            }
            Instruction::Bind { direction, name } => {
                self.bindlist.push(Binding { name: name.clone(), direction: *direction });
                Ok(())
            }
            Instruction::Call { function } => {
                // Snapshot the accumulator; later binds belong to the
                // next call.
                self.queue.push_back(PendingCall {
                    function: function.clone(),
                    bindings: std::mem::take(&mut self.bindlist),
                });
                Ok(())
            }
            Instruction::Copy { dst, src } => {
                let (value, ready) = {
                    let src = self.store.read(src)?;
                    (src.value.clone(), src.ready)
                };
                self.store.write(dst, value, ready)
            }
            Instruction::Delete { name } => self.store.delete(name),
        }
    }

    /// Run a function body synchronously, instruction by instruction.
    /// A nested `call` only enqueues onto the shared queue; bodies
    /// never block and never recurse into execution.
    fn run_function(&mut self, name: &str) -> Result<(), MachineError> {
        let function = self
            .program
            .function(name)
            .cloned()
            .ok_or_else(|| MachineError::UnknownFunction { name: name.to_string() })?;
        for instruction in &function.body {
            self.exec(instruction)?;
        }
        Ok(())
    }

    /// Dispatch a dequeued call: intrinsics first, then the registry.
    fn execute_call(&mut self, call: PendingCall, out: &mut dyn Write) -> Result<(), MachineError> {
        match Intrinsic::resolve(&call.function) {
            Some(intrinsic) => intrinsic.run(&mut self.store, &call, out),
            None => self.run_function(&call.function),
        }
    }
}
