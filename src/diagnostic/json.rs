use super::{Diagnostic, Severity};

/// One-line JSON rendering, for tooling that wraps the interpreter.
pub fn render(d: &Diagnostic) -> String {
    let severity = match d.severity {
        Severity::Error => "error",
        Severity::Warning => "warning",
    };

    let mut obj = serde_json::json!({
        "severity": severity,
        "message": d.message,
        "notes": d.notes,
    });

    if let Some(line) = d.line {
        obj["line"] = serde_json::Value::from(line);
    }

    serde_json::to_string(&obj).unwrap_or_else(|_| {
        r#"{"severity":"error","message":"internal error serializing diagnostic"}"#.to_string()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_json(s: &str) -> serde_json::Value {
        serde_json::from_str(s).expect("valid JSON")
    }

    #[test]
    fn render_basic_error() {
        let out = render(&Diagnostic::error("unknown variable: x"));
        let v = parse_json(&out);
        assert_eq!(v["severity"], "error");
        assert_eq!(v["message"], "unknown variable: x");
        assert!(v.get("line").is_none() || v["line"].is_null());
    }

    #[test]
    fn render_with_line() {
        let out = render(&Diagnostic::error("bad").with_line(3));
        let v = parse_json(&out);
        assert_eq!(v["line"], 3);
    }

    #[test]
    fn render_with_notes() {
        let out = render(&Diagnostic::error("bad").with_note("first").with_note("second"));
        let v = parse_json(&out);
        let notes = v["notes"].as_array().unwrap();
        assert_eq!(notes.len(), 2);
        assert_eq!(notes[0], "first");
    }

    #[test]
    fn render_is_single_line() {
        let out = render(&Diagnostic::error("multi\ncontext").with_line(1).with_note("n"));
        assert_eq!(out.lines().count(), 1);
    }
}
