use serde::{Deserialize, Serialize};

/// Which way a binding flows relative to the call that consumes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    In,
    Out,
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::In => write!(f, "in"),
            Direction::Out => write!(f, "out"),
        }
    }
}

/// A directional association between a global variable name and a
/// pending call's parameter slot. Bindings are scheduling metadata:
/// the named variable stays global, never renamed into a frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Binding {
    pub name: String,
    pub direction: Direction,
}

/// One decoded IL line. Execution dispatches on the variant, never on
/// the keyword string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Instruction {
    /// `var <name> <type>`
    Declare { name: String, ty: String },

    /// `assg <name> <literal>` — the literal is kept raw; consumers coerce
    Assign { name: String, literal: String },

    /// `bind <in|out> <name>`
    Bind { direction: Direction, name: String },

    /// `call <fnname>` — seals the accumulated bindings into a queue entry
    Call { function: String },

    /// `copy <dst> <src>`
    Copy { dst: String, src: String },

    /// `del <name>`
    Delete { name: String },
}

impl std::fmt::Display for Instruction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Instruction::Declare { name, ty } => write!(f, "var {} {}", name, ty),
            Instruction::Assign { name, literal } => write!(f, "assg {} {}", name, literal),
            Instruction::Bind { direction, name } => write!(f, "bind {} {}", direction, name),
            Instruction::Call { function } => write!(f, "call {}", function),
            Instruction::Copy { dst, src } => write!(f, "copy {} {}", dst, src),
            Instruction::Delete { name } => write!(f, "del {}", name),
        }
    }
}

/// A named body of instructions, registered once at start-up and never
/// mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Function {
    pub name: String,
    pub body: Vec<Instruction>,
}

/// All registered functions, in definition order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Program {
    pub functions: Vec<Function>,
}

impl Program {
    /// Reserved entry function, run unconditionally before scheduling.
    pub const ENTRY: &'static str = "_entry";

    pub fn function(&self, name: &str) -> Option<&Function> {
        self.functions.iter().find(|func| func.name == name)
    }

    /// Register a function. A later definition with the same name
    /// replaces the earlier one.
    pub fn register(&mut self, function: Function) {
        match self.functions.iter_mut().find(|f| f.name == function.name) {
            Some(slot) => *slot = function,
            None => self.functions.push(function),
        }
    }
}

impl std::fmt::Display for Program {
    /// Re-emits canonical IL text, one instruction per line.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for function in &self.functions {
            writeln!(f, "- {}", function.name)?;
            for instruction in &function.body {
                writeln!(f, "{}", instruction)?;
            }
            writeln!(f, "---")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Program {
        Program {
            functions: vec![Function {
                name: "_entry".to_string(),
                body: vec![
                    Instruction::Declare { name: "a".to_string(), ty: "int".to_string() },
                    Instruction::Assign { name: "a".to_string(), literal: "2".to_string() },
                    Instruction::Bind { direction: Direction::In, name: "a".to_string() },
                    Instruction::Call { function: "print".to_string() },
                ],
            }],
        }
    }

    #[test]
    fn display_emits_canonical_il() {
        let text = sample().to_string();
        assert_eq!(text, "- _entry\nvar a int\nassg a 2\nbind in a\ncall print\n---\n");
    }

    #[test]
    fn lookup_by_name() {
        let program = sample();
        assert!(program.function("_entry").is_some());
        assert!(program.function("missing").is_none());
    }

    #[test]
    fn register_replaces_same_name() {
        let mut program = sample();
        program.register(Function { name: "_entry".to_string(), body: vec![] });
        assert_eq!(program.functions.len(), 1);
        assert!(program.function("_entry").unwrap().body.is_empty());
    }

    #[test]
    fn serializes_direction_lowercase() {
        let json = serde_json::to_string(&Direction::In).unwrap();
        assert_eq!(json, "\"in\"");
    }

    #[test]
    fn program_json_round_trip() {
        let program = sample();
        let json = serde_json::to_string(&program).unwrap();
        let back: Program = serde_json::from_str(&json).unwrap();
        assert_eq!(back, program);
    }
}
