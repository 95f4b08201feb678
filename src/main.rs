mod ast;
mod diagnostic;
mod lexer;
mod machine;
mod parser;

use std::io::{self, IsTerminal};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};

use diagnostic::Diagnostic;
use diagnostic::ansi::AnsiRenderer;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Emit {
    /// Parsed program as JSON
    Json,
    /// Canonical IL text
    Il,
}

/// aeolis — a dataflow-scheduled intermediate language interpreter
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// IL source file
    file: PathBuf,

    /// Dump the parsed program instead of running it
    #[arg(long, value_enum)]
    emit: Option<Emit>,

    /// Report errors as one-line JSON on stderr
    #[arg(long)]
    json: bool,

    /// Disable ANSI styling on error output
    #[arg(long)]
    no_color: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(diagnostic) => {
            report(&cli, &diagnostic);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), Diagnostic> {
    let source = std::fs::read_to_string(&cli.file)
        .map_err(|e| Diagnostic::error(format!("cannot read {}: {}", cli.file.display(), e)))?;

    let tokens =
        lexer::lex(&source).map_err(|e| Diagnostic::from(&e).with_source(source.clone()))?;
    let program =
        parser::parse(tokens).map_err(|e| Diagnostic::from(&e).with_source(source.clone()))?;

    match cli.emit {
        Some(Emit::Json) => {
            let json = serde_json::to_string_pretty(&program)
                .map_err(|e| Diagnostic::error(format!("cannot serialize program: {}", e)))?;
            println!("{}", json);
        }
        Some(Emit::Il) => {
            print!("{}", program);
        }
        None => {
            let mut machine = machine::Machine::new(program).map_err(|e| Diagnostic::from(&e))?;
            let stdout = io::stdout();
            let mut out = stdout.lock();
            machine.run(&mut out).map_err(|e| Diagnostic::from(&e))?;
        }
    }

    Ok(())
}

fn report(cli: &Cli, diagnostic: &Diagnostic) {
    if cli.json {
        eprintln!("{}", diagnostic::json::render(diagnostic));
    } else {
        let renderer = AnsiRenderer {
            use_color: !cli.no_color && io::stderr().is_terminal(),
        };
        eprint!("{}", renderer.render(diagnostic));
    }
}
