use super::{Diagnostic, Severity};

pub struct AnsiRenderer {
    pub use_color: bool,
}

impl AnsiRenderer {
    fn bold(&self, s: &str) -> String {
        if self.use_color { format!("\x1b[1m{s}\x1b[0m") } else { s.to_string() }
    }

    fn bold_red(&self, s: &str) -> String {
        if self.use_color { format!("\x1b[1;31m{s}\x1b[0m") } else { s.to_string() }
    }

    fn cyan(&self, s: &str) -> String {
        if self.use_color { format!("\x1b[36m{s}\x1b[0m") } else { s.to_string() }
    }

    fn dim(&self, s: &str) -> String {
        if self.use_color { format!("\x1b[2m{s}\x1b[0m") } else { s.to_string() }
    }

    pub fn render(&self, d: &Diagnostic) -> String {
        let mut out = String::new();

        let severity_label = match d.severity {
            Severity::Error => self.bold_red("error"),
            Severity::Warning => self.bold(&self.cyan("warning")),
        };
        out.push_str(&format!("{}: {}\n", severity_label, self.bold(&d.message)));

        // Show the offending line when we know where it is
        if let (Some(line), Some(source)) = (d.line, &d.source) {
            out.push_str(&format!("  {} line {}\n", self.cyan("-->"), line));

            if let Some(text) = source.lines().nth(line.saturating_sub(1)) {
                let gutter = line.to_string().len();
                let pipe = self.cyan("|");
                let pad = " ".repeat(gutter);
                let line_num = self.cyan(&format!("{line:>gutter$}"));

                out.push_str(&format!("{pad} {pipe}\n"));
                out.push_str(&format!("{line_num} {pipe} {text}\n"));
                out.push_str(&format!("{pad} {pipe}\n"));
            }
        }

        for note in &d.notes {
            out.push_str(&format!("  {} note: {}\n", self.dim("="), note));
        }

        out
    }
}
