use crate::ast::{Direction, Function, Instruction, Program};
use crate::lexer::Token;

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("unknown instruction '{token}'")]
    UnknownInstruction { token: String, line: usize },

    #[error("function definition opened inside another definition")]
    AlreadyInDefinition { line: usize },

    #[error("instruction outside a function definition")]
    NotInDefinition { line: usize },

    #[error("expected a name")]
    ExpectedName { line: usize },

    #[error("expected 'in' or 'out', got '{token}'")]
    ExpectedDirection { token: String, line: usize },

    #[error("trailing tokens after instruction")]
    TrailingTokens { line: usize },
}

impl ParseError {
    /// 1-based source line the error points at.
    pub fn line(&self) -> usize {
        match self {
            ParseError::UnknownInstruction { line, .. }
            | ParseError::AlreadyInDefinition { line }
            | ParseError::NotInDefinition { line }
            | ParseError::ExpectedName { line }
            | ParseError::ExpectedDirection { line, .. }
            | ParseError::TrailingTokens { line } => *line,
        }
    }
}

type Result<T> = std::result::Result<T, ParseError>;

/// Build the function registry from a lexed token stream.
///
/// `- <name>` opens a definition, `---` closes it, everything else is
/// an instruction line belonging to the open definition. A definition
/// left open at end of input is discarded; the missing function then
/// surfaces at machine start.
pub fn parse(tokens: Vec<(Token, usize)>) -> Result<Program> {
    let mut program = Program::default();
    let mut current: Option<Function> = None;

    for (line, tokens) in split_lines(tokens) {
        match tokens.first() {
            Some(Token::OpenDef) => {
                if current.is_some() {
                    return Err(ParseError::AlreadyInDefinition { line });
                }
                let mut cursor = Line::new(&tokens[1..], line);
                let name = cursor.ident()?;
                cursor.finish()?;
                current = Some(Function { name, body: Vec::new() });
            }
            Some(Token::CloseDef) => {
                let function = current.take().ok_or(ParseError::NotInDefinition { line })?;
                Line::new(&tokens[1..], line).finish()?;
                program.register(function);
            }
            Some(_) => {
                let instruction = instruction(&tokens, line)?;
                match current.as_mut() {
                    Some(function) => function.body.push(instruction),
                    None => return Err(ParseError::NotInDefinition { line }),
                }
            }
            None => {} // blank line
        }
    }

    Ok(program)
}

/// Group tokens by source line, dropping the newline markers.
fn split_lines(tokens: Vec<(Token, usize)>) -> Vec<(usize, Vec<Token>)> {
    let mut lines: Vec<(usize, Vec<Token>)> = Vec::new();
    let mut line = 1;
    let mut buffer = Vec::new();

    for (token, at) in tokens {
        if token == Token::Newline {
            lines.push((line, std::mem::take(&mut buffer)));
        } else {
            line = at;
            buffer.push(token);
        }
    }
    if !buffer.is_empty() {
        lines.push((line, buffer));
    }

    lines
}

fn instruction(tokens: &[Token], line: usize) -> Result<Instruction> {
    let keyword = &tokens[0];
    let mut cursor = Line::new(&tokens[1..], line);

    let instruction = match keyword {
        Token::Var => Instruction::Declare { name: cursor.ident()?, ty: cursor.ident()? },
        Token::Assg => Instruction::Assign { name: cursor.ident()?, literal: cursor.literal()? },
        Token::Bind => Instruction::Bind { direction: cursor.direction()?, name: cursor.ident()? },
        Token::Call => Instruction::Call { function: cursor.ident()? },
        Token::Copy => Instruction::Copy { dst: cursor.ident()?, src: cursor.ident()? },
        Token::Del => Instruction::Delete { name: cursor.ident()? },
        other => {
            return Err(ParseError::UnknownInstruction { token: other.to_string(), line });
        }
    };

    cursor.finish()?;
    Ok(instruction)
}

/// Cursor over one line's operand tokens.
struct Line<'a> {
    tokens: &'a [Token],
    pos: usize,
    line: usize,
}

impl<'a> Line<'a> {
    fn new(tokens: &'a [Token], line: usize) -> Self {
        Line { tokens, pos: 0, line }
    }

    fn next(&mut self) -> Option<&'a Token> {
        let token = self.tokens.get(self.pos);
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn ident(&mut self) -> Result<String> {
        match self.next() {
            Some(Token::Ident(name)) => Ok(name.clone()),
            _ => Err(ParseError::ExpectedName { line: self.line }),
        }
    }

    /// Assignment literals: an integer or a bare word.
    fn literal(&mut self) -> Result<String> {
        match self.next() {
            Some(Token::Int(n)) => Ok(n.to_string()),
            Some(Token::Ident(word)) => Ok(word.clone()),
            _ => Err(ParseError::ExpectedName { line: self.line }),
        }
    }

    fn direction(&mut self) -> Result<Direction> {
        match self.next() {
            Some(Token::In) => Ok(Direction::In),
            Some(Token::Out) => Ok(Direction::Out),
            Some(other) => {
                Err(ParseError::ExpectedDirection { token: other.to_string(), line: self.line })
            }
            None => Err(ParseError::ExpectedDirection { token: "".to_string(), line: self.line }),
        }
    }

    fn finish(&mut self) -> Result<()> {
        if self.pos < self.tokens.len() {
            return Err(ParseError::TrailingTokens { line: self.line });
        }
        Ok(())
    }
}
