//! Template lexing and parsing.

use super::{FuncMap, TemplateError};

const LEFT_DELIM: &str = "{{";
const RIGHT_DELIM: &str = "}}";
const COMMENT_OPEN: &str = "/*";
const COMMENT_CLOSE: &str = "*/";

#[derive(Debug, Clone)]
pub(crate) enum Node {
    Text(String),
    Action(Pipeline),
}

#[derive(Debug, Clone)]
pub(crate) struct Pipeline {
    pub(crate) line: usize,
    pub(crate) commands: Vec<Command>,
}

#[derive(Debug, Clone)]
pub(crate) enum Command {
    Operand(Operand),
    Call { func: String, args: Vec<Operand> },
}

#[derive(Debug, Clone)]
pub(crate) enum Operand {
    Dot,
    Field(Vec<String>),
    Str(String),
    Int(i64),
    Bool(bool),
    /// Zero-argument function used as an argument.
    Call(String),
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Pipe,
    Dot,
    Field(Vec<String>),
    Str(String),
    Int(i64),
    Bool(bool),
    Ident(String),
}

const fn is_space(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\r' | '\n')
}

fn is_ident_start(c: char) -> bool {
    c == '_' || c.is_alphabetic()
}

fn is_ident_char(c: char) -> bool {
    c == '_' || c.is_alphanumeric()
}

/// Parse `source` into a node list.
pub(crate) fn parse(name: &str, source: &str, funcs: &FuncMap) -> Result<Vec<Node>, TemplateError> {
    Parser {
        name,
        source,
        funcs,
        pos: 0,
        line: 1,
        line_pos: 0,
        nodes: Vec::new(),
    }
    .run()
}

struct Parser<'a> {
    name: &'a str,
    source: &'a str,
    funcs: &'a FuncMap,
    pos: usize,
    /// Line number at `line_pos`.
    line: usize,
    line_pos: usize,
    nodes: Vec<Node>,
}

impl<'a> Parser<'a> {
    fn run(mut self) -> Result<Vec<Node>, TemplateError> {
        let source = self.source;
        let mut trim_leading = false;

        while let Some(found) = source[self.pos..].find(LEFT_DELIM) {
            let open = self.pos + found;
            let mut text = &source[self.pos..open];
            if trim_leading {
                text = text.trim_start_matches(is_space);
            }

            let line = self.line_at(open);
            self.pos = open + LEFT_DELIM.len();
            if self.at_left_trim() {
                text = text.trim_end_matches(is_space);
                self.pos += 1;
            }
            self.push_text(text);

            self.skip_space();
            trim_leading = if self.rest().starts_with(COMMENT_OPEN) {
                self.comment(line)?
            } else {
                self.action(line)?
            };
        }

        let mut tail = &source[self.pos..];
        if trim_leading {
            tail = tail.trim_start_matches(is_space);
        }
        self.push_text(tail);
        Ok(self.nodes)
    }

    fn rest(&self) -> &'a str {
        &self.source[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    /// Line of `offset`. Offsets must not decrease between calls.
    fn line_at(&mut self, offset: usize) -> usize {
        self.line += self.source[self.line_pos..offset].matches('\n').count();
        self.line_pos = offset;
        self.line
    }

    fn error(&self, line: usize, message: impl Into<String>) -> TemplateError {
        TemplateError::Parse {
            name: self.name.to_string(),
            line,
            message: message.into(),
        }
    }

    fn push_text(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        if let Some(Node::Text(prev)) = self.nodes.last_mut() {
            prev.push_str(text);
        } else {
            self.nodes.push(Node::Text(text.to_string()));
        }
    }

    /// `{{-` followed by whitespace.
    fn at_left_trim(&self) -> bool {
        let mut chars = self.rest().chars();
        chars.next() == Some('-') && chars.next().is_some_and(is_space)
    }

    /// Returns true if any whitespace was skipped.
    fn skip_space(&mut self) -> bool {
        let rest = self.rest();
        let skipped = rest.len() - rest.trim_start_matches(is_space).len();
        self.pos += skipped;
        skipped > 0
    }

    /// Consume a closing delimiter at the cursor, optionally preceded by a
    /// trim marker. Returns `Some(trim)` when the delimiter was consumed.
    fn close_delim(&mut self, after_space: bool) -> Option<bool> {
        if after_space && self.rest().starts_with("-}}") {
            self.pos += 1 + RIGHT_DELIM.len();
            Some(true)
        } else if self.rest().starts_with(RIGHT_DELIM) {
            self.pos += RIGHT_DELIM.len();
            Some(false)
        } else {
            None
        }
    }

    fn comment(&mut self, line: usize) -> Result<bool, TemplateError> {
        self.pos += COMMENT_OPEN.len();
        let Some(end) = self.rest().find(COMMENT_CLOSE) else {
            return Err(self.error(line, "unclosed comment"));
        };
        self.pos += end + COMMENT_CLOSE.len();
        let spaced = self.skip_space();
        self.close_delim(spaced)
            .ok_or_else(|| self.error(line, "comment ends before closing delimiter"))
    }

    /// Lex and parse one action. Returns whether the action ended with a
    /// right trim marker.
    fn action(&mut self, line: usize) -> Result<bool, TemplateError> {
        let mut tokens = Vec::new();
        // The opening delimiter (and any trim marker) already consumed the
        // separator, so a `-}}` right after it is a valid trim.
        let mut spaced = true;

        let trim = loop {
            if let Some(trim) = self.close_delim(spaced) {
                break trim;
            }
            let Some(c) = self.peek() else {
                return Err(self.error(line, "unclosed action"));
            };

            if is_space(c) {
                spaced = self.skip_space();
                continue;
            }
            spaced = false;

            let token = match c {
                '|' => {
                    self.pos += 1;
                    Token::Pipe
                }
                '"' => Token::Str(self.quoted(line)?),
                '`' => Token::Str(self.raw_string(line)?),
                '.' => self.field(),
                '-' | '0'..='9' => Token::Int(self.number(line)?),
                c if is_ident_start(c) => match self.ident() {
                    "true" => Token::Bool(true),
                    "false" => Token::Bool(false),
                    "nil" => return Err(self.error(line, "nil is not a command")),
                    ident => Token::Ident(ident.to_string()),
                },
                other => {
                    return Err(self.error(line, format!("unexpected {other:?} in command")));
                }
            };
            tokens.push(token);
        };

        let pipeline = self.pipeline(line, tokens)?;
        self.nodes.push(Node::Action(pipeline));
        Ok(trim)
    }

    fn ident(&mut self) -> &'a str {
        let rest = self.rest();
        let len = rest.len() - rest.trim_start_matches(is_ident_char).len();
        self.pos += len;
        &rest[..len]
    }

    fn field(&mut self) -> Token {
        let mut path = Vec::new();
        while self.rest().starts_with('.') {
            let next = self.rest()[1..].chars().next();
            if !next.is_some_and(is_ident_start) {
                break;
            }
            self.pos += 1;
            path.push(self.ident().to_string());
        }
        if path.is_empty() {
            self.pos += 1;
            Token::Dot
        } else {
            Token::Field(path)
        }
    }

    fn number(&mut self, line: usize) -> Result<i64, TemplateError> {
        let source = self.source;
        let start = self.pos;
        if self.rest().starts_with('-') {
            self.pos += 1;
        }
        let rest = self.rest();
        let digits = rest.len() - rest.trim_start_matches(|c: char| c.is_ascii_digit()).len();
        self.pos += digits;
        let literal = &source[start..self.pos];
        if digits == 0 || self.peek().is_some_and(is_ident_char) {
            return Err(self.error(line, format!("bad number syntax: {literal:?}")));
        }
        literal
            .parse()
            .map_err(|_| self.error(line, format!("bad number syntax: {literal:?}")))
    }

    fn quoted(&mut self, line: usize) -> Result<String, TemplateError> {
        self.pos += 1;
        let mut value = String::new();
        let mut chars = self.rest().char_indices();
        while let Some((i, c)) = chars.next() {
            match c {
                '"' => {
                    self.pos += i + 1;
                    return Ok(value);
                }
                '\n' => break,
                '\\' => match chars.next() {
                    Some((_, 'n')) => value.push('\n'),
                    Some((_, 't')) => value.push('\t'),
                    Some((_, 'r')) => value.push('\r'),
                    Some((_, escaped @ ('"' | '\\'))) => value.push(escaped),
                    Some((_, other)) => {
                        return Err(self.error(line, format!("unknown escape sequence: \\{other}")));
                    }
                    None => break,
                },
                other => value.push(other),
            }
        }
        Err(self.error(line, "unterminated quoted string"))
    }

    fn raw_string(&mut self, line: usize) -> Result<String, TemplateError> {
        self.pos += 1;
        let Some(end) = self.rest().find('`') else {
            return Err(self.error(line, "unterminated raw quoted string"));
        };
        let value = self.rest()[..end].to_string();
        self.pos += end + 1;
        Ok(value)
    }

    fn pipeline(&self, line: usize, tokens: Vec<Token>) -> Result<Pipeline, TemplateError> {
        let mut commands = Vec::new();
        for (stage, group) in tokens.split(|t| *t == Token::Pipe).enumerate() {
            let command = self.command(line, group)?;
            if stage > 0 && matches!(command, Command::Operand(_)) {
                return Err(self.error(
                    line,
                    format!("non executable command in pipeline stage {}", stage + 1),
                ));
            }
            commands.push(command);
        }
        Ok(Pipeline { line, commands })
    }

    fn command(&self, line: usize, tokens: &[Token]) -> Result<Command, TemplateError> {
        let Some((first, args)) = tokens.split_first() else {
            return Err(self.error(line, "missing value for command"));
        };

        if let Token::Ident(func) = first {
            self.check_func(line, func)?;
            let args = args
                .iter()
                .map(|t| self.operand(line, t))
                .collect::<Result<Vec<_>, _>>()?;
            return Ok(Command::Call {
                func: func.clone(),
                args,
            });
        }

        if let Some(extra) = args.first() {
            return Err(self.error(line, format!("unexpected {extra:?} after operand")));
        }
        Ok(Command::Operand(self.operand(line, first)?))
    }

    fn operand(&self, line: usize, token: &Token) -> Result<Operand, TemplateError> {
        Ok(match token {
            Token::Dot => Operand::Dot,
            Token::Field(path) => Operand::Field(path.clone()),
            Token::Str(s) => Operand::Str(s.clone()),
            Token::Int(n) => Operand::Int(*n),
            Token::Bool(b) => Operand::Bool(*b),
            Token::Ident(func) => {
                self.check_func(line, func)?;
                Operand::Call(func.clone())
            }
            Token::Pipe => return Err(self.error(line, "unexpected pipe")),
        })
    }

    fn check_func(&self, line: usize, func: &str) -> Result<(), TemplateError> {
        if self.funcs.contains(func) {
            Ok(())
        } else {
            Err(self.error(line, format!("function {func:?} not defined")))
        }
    }
}
