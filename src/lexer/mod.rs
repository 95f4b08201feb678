use logos::Logos;

#[derive(Logos, Debug, PartialEq, Clone)]
#[logos(skip r"[ \t\r]+")]
pub enum Token {
    // Instruction keywords — one per IL command
    #[token("var")]
    Var,
    #[token("assg")]
    Assg,
    #[token("bind")]
    Bind,
    #[token("call")]
    Call,
    #[token("copy")]
    Copy,
    #[token("del")]
    Del,

    // Binding directions
    #[token("in")]
    In,
    #[token("out")]
    Out,

    // Function delimiters. `---` must win over `-`; logos prefers the
    // longer literal.
    #[token("---")]
    CloseDef,
    #[token("-")]
    OpenDef,

    #[regex(r"-?[0-9]+", |lex| lex.slice().parse::<i64>().ok())]
    Int(i64),

    // Identifiers: `_entry` and friends, so leading underscores allowed
    #[regex(r"[A-Za-z_][A-Za-z0-9_]*", |lex| lex.slice().to_string())]
    Ident(String),

    // Newlines are significant: the IL is one instruction per line
    #[token("\n")]
    Newline,
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Token::Var => write!(f, "var"),
            Token::Assg => write!(f, "assg"),
            Token::Bind => write!(f, "bind"),
            Token::Call => write!(f, "call"),
            Token::Copy => write!(f, "copy"),
            Token::Del => write!(f, "del"),
            Token::In => write!(f, "in"),
            Token::Out => write!(f, "out"),
            Token::CloseDef => write!(f, "---"),
            Token::OpenDef => write!(f, "-"),
            Token::Int(n) => write!(f, "{}", n),
            Token::Ident(name) => write!(f, "{}", name),
            Token::Newline => write!(f, "\\n"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unexpected '{snippet}' at line {line}")]
pub struct LexError {
    pub line: usize,
    pub snippet: String,
}

/// Lex IL source into tokens tagged with their 1-based line number.
pub fn lex(source: &str) -> Result<Vec<(Token, usize)>, LexError> {
    let mut lexer = Token::lexer(source);
    let mut tokens = Vec::new();
    let mut line = 1;

    while let Some(result) = lexer.next() {
        match result {
            Ok(token) => {
                let is_newline = token == Token::Newline;
                tokens.push((token, line));
                if is_newline {
                    line += 1;
                }
            }
            Err(()) => {
                let span = lexer.span();
                return Err(LexError {
                    line,
                    snippet: source[span].to_string(),
                });
            }
        }
    }

    Ok(tokens)
}
