use std::collections::HashMap;

use super::MachineError;

/// An untyped scalar. The store never coerces; consumers that need an
/// integer call `as_int`.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    Empty,
    Int(i64),
    Text(String),
}

impl Value {
    pub fn from_literal(literal: &str) -> Value {
        match literal.parse::<i64>() {
            Ok(n) => Value::Int(n),
            Err(_) => Value::Text(literal.to_string()),
        }
    }

    /// Integer coercion: the leading integer of a text value, 0 when
    /// there is none.
    pub fn as_int(&self) -> i64 {
        match self {
            Value::Empty => 0,
            Value::Int(n) => *n,
            Value::Text(text) => {
                let text = text.trim();
                let (sign, digits) = match text.strip_prefix('-') {
                    Some(rest) => (-1, rest),
                    None => (1, text.strip_prefix('+').unwrap_or(text)),
                };
                let end = digits
                    .find(|c: char| !c.is_ascii_digit())
                    .unwrap_or(digits.len());
                digits[..end].parse::<i64>().map(|n| sign * n).unwrap_or(0)
            }
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Empty => write!(f, "nil"),
            Value::Int(n) => write!(f, "{}", n),
            Value::Text(text) => write!(f, "{}", text),
        }
    }
}

/// One entry in the flat, shared variable namespace.
#[derive(Debug, Clone)]
pub struct Variable {
    pub ty: String,
    pub value: Value,
    pub ready: bool,
    /// Reservation flag checked by the scheduler. No operation sets it
    /// today; it stays inert on purpose.
    pub bound: bool,
}

/// Flat name-to-variable map. There is no call-local scoping: every
/// function body reads and writes the same names its caller used.
#[derive(Debug, Default)]
pub struct VarStore {
    vars: HashMap<String, Variable>,
}

impl VarStore {
    pub fn declare(&mut self, name: &str, ty: &str) -> Result<(), MachineError> {
        if self.vars.contains_key(name) {
            return Err(MachineError::AlreadyDeclared { name: name.to_string() });
        }
        self.vars.insert(
            name.to_string(),
            Variable { ty: ty.to_string(), value: Value::Empty, ready: false, bound: false },
        );
        Ok(())
    }

    pub fn read(&self, name: &str) -> Result<&Variable, MachineError> {
        self.vars
            .get(name)
            .ok_or_else(|| MachineError::UnknownVariable { name: name.to_string() })
    }

    pub fn write(&mut self, name: &str, value: Value, ready: bool) -> Result<(), MachineError> {
        let var = self
            .vars
            .get_mut(name)
            .ok_or_else(|| MachineError::UnknownVariable { name: name.to_string() })?;
        var.value = value;
        var.ready = ready;
        Ok(())
    }

    pub fn delete(&mut self, name: &str) -> Result<(), MachineError> {
        self.vars
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| MachineError::UnknownVariable { name: name.to_string() })
    }

    #[cfg(test)]
    pub fn read_mut(&mut self, name: &str) -> Result<&mut Variable, MachineError> {
        self.vars
            .get_mut(name)
            .ok_or_else(|| MachineError::UnknownVariable { name: name.to_string() })
    }
}
