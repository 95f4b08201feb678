pub mod ansi;
pub mod json;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Severity {
    Error,
    #[allow(dead_code)] // reserved for lint-style output
    Warning,
}

/// A user-facing report: message, optional source location, notes.
/// The IL is line-oriented, so locations are 1-based line numbers.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
    pub line: Option<usize>,
    pub notes: Vec<String>,
    pub source: Option<String>,
}

impl Diagnostic {
    pub fn error(message: impl Into<String>) -> Self {
        Diagnostic {
            severity: Severity::Error,
            message: message.into(),
            line: None,
            notes: Vec::new(),
            source: None,
        }
    }

    pub fn with_line(mut self, line: usize) -> Self {
        self.line = Some(line);
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}

// ---- From impls for each layer's error type ----

impl From<&crate::lexer::LexError> for Diagnostic {
    fn from(e: &crate::lexer::LexError) -> Self {
        Diagnostic::error(format!("unexpected '{}'", e.snippet)).with_line(e.line)
    }
}

impl From<&crate::parser::ParseError> for Diagnostic {
    fn from(e: &crate::parser::ParseError) -> Self {
        Diagnostic::error(e.to_string()).with_line(e.line())
    }
}

impl From<&crate::machine::MachineError> for Diagnostic {
    fn from(e: &crate::machine::MachineError) -> Self {
        let d = Diagnostic::error(e.to_string());
        match e {
            crate::machine::MachineError::Deadlocked { .. } => {
                d.with_note("queued calls are waiting on inputs no scheduled call produces")
            }
            _ => d,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_builder() {
        let d = Diagnostic::error("boom");
        assert_eq!(d.severity, Severity::Error);
        assert_eq!(d.message, "boom");
        assert!(d.line.is_none());
        assert!(d.notes.is_empty());
    }

    #[test]
    fn builder_chaining() {
        let d = Diagnostic::error("bad").with_line(3).with_note("context");
        assert_eq!(d.line, Some(3));
        assert_eq!(d.notes, vec!["context"]);
    }

    #[test]
    fn from_lex_error_carries_line() {
        let e = crate::lexer::LexError { line: 4, snippet: ":=".to_string() };
        let d = Diagnostic::from(&e);
        assert_eq!(d.line, Some(4));
        assert!(d.message.contains(":="));
    }

    #[test]
    fn from_parse_error_carries_line() {
        let e = crate::parser::ParseError::NotInDefinition { line: 7 };
        let d = Diagnostic::from(&e);
        assert_eq!(d.line, Some(7));
    }

    #[test]
    fn from_machine_error_no_line() {
        let e = crate::machine::MachineError::UnknownVariable { name: "x".to_string() };
        let d = Diagnostic::from(&e);
        assert!(d.line.is_none());
        assert!(d.message.contains('x'));
    }

    #[test]
    fn deadlock_gets_a_note() {
        let e = crate::machine::MachineError::Deadlocked { pending: 2 };
        let d = Diagnostic::from(&e);
        assert!(d.message.contains('2'));
        assert_eq!(d.notes.len(), 1);
    }
}
