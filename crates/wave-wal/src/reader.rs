//! S-expression reader
//!
//! Turns WAL source text into [`Expr`] trees. `;` starts a comment that runs
//! to the end of the line and `'x` is shorthand for `(quote x)`.

use std::fmt;

use crate::{Error, Result};

/// A parsed WAL form.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Int(i64),
    Float(f64),
    Str(String),
    Bool(bool),
    Symbol(String),
    List(Vec<Expr>),
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(n) => write!(f, "{n}"),
            Self::Float(v) => write!(f, "{v:?}"),
            Self::Str(s) => write!(f, "{s:?}"),
            Self::Bool(true) => f.write_str("#t"),
            Self::Bool(false) => f.write_str("#f"),
            Self::Symbol(s) => f.write_str(s),
            Self::List(items) => {
                f.write_str("(")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str(")")
            }
        }
    }
}

/// Deepest list or quote nesting the reader accepts.
pub const MAX_DEPTH: usize = 128;

struct Reader<'a> {
    src: &'a str,
    pos: usize,
    depth: usize,
}

fn is_delimiter(c: char) -> bool {
    c.is_whitespace() || matches!(c, '(' | ')' | '"' | ';' | '\'')
}

impl<'a> Reader<'a> {
    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn skip_trivia(&mut self) {
        while let Some(c) = self.peek() {
            if c.is_whitespace() {
                self.bump();
            } else if c == ';' {
                while let Some(c) = self.bump() {
                    if c == '\n' {
                        break;
                    }
                }
            } else {
                break;
            }
        }
    }

    fn form(&mut self) -> Result<Expr> {
        self.skip_trivia();
        let start = self.pos;
        match self.bump() {
            None => Err(Error::syntax(start, "unexpected end of input")),
            Some('(') => self.nested(start, |reader| reader.list(start)),
            Some(')') => Err(Error::syntax(start, "unexpected ')'")),
            Some('\'') => {
                let quoted = self.nested(start, Self::form)?;
                Ok(Expr::List(vec![Expr::Symbol("quote".into()), quoted]))
            }
            Some('"') => self.string(start),
            Some(_) => {
                while self.peek().is_some_and(|c| !is_delimiter(c)) {
                    self.bump();
                }
                Ok(atom(&self.src[start..self.pos]))
            }
        }
    }

    fn nested(&mut self, start: usize, f: impl FnOnce(&mut Self) -> Result<Expr>) -> Result<Expr> {
        if self.depth >= MAX_DEPTH {
            return Err(Error::syntax(start, "expression nested too deeply"));
        }
        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        result
    }

    fn list(&mut self, start: usize) -> Result<Expr> {
        let mut items = Vec::new();
        loop {
            self.skip_trivia();
            match self.peek() {
                None => return Err(Error::syntax(start, "unbalanced parenthesis: missing ')'")),
                Some(')') => {
                    self.bump();
                    return Ok(Expr::List(items));
                }
                Some(_) => items.push(self.form()?),
            }
        }
    }

    fn string(&mut self, start: usize) -> Result<Expr> {
        let mut out = String::new();
        loop {
            match self.bump() {
                None => return Err(Error::syntax(start, "unterminated string")),
                Some('"') => return Ok(Expr::Str(out)),
                Some('\\') => match self.bump() {
                    Some('n') => out.push('\n'),
                    Some('t') => out.push('\t'),
                    Some(c) => out.push(c),
                    None => return Err(Error::syntax(start, "unterminated string")),
                },
                Some(c) => out.push(c),
            }
        }
    }
}

fn atom(text: &str) -> Expr {
    match text {
        "#t" => return Expr::Bool(true),
        "#f" => return Expr::Bool(false),
        _ => {}
    }
    let (negative, digits) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text),
    };
    let radix = if let Some(hex) = digits.strip_prefix("0x") {
        Some((hex, 16))
    } else {
        digits.strip_prefix("0b").map(|bin| (bin, 2))
    };
    // the sign belongs before the prefix only
    let prefixed = radix
        .filter(|(body, _)| !body.starts_with(['+', '-']))
        .and_then(|(body, radix)| i64::from_str_radix(body, radix).ok())
        .and_then(|n| if negative { n.checked_neg() } else { Some(n) });
    if let Some(n) = prefixed {
        return Expr::Int(n);
    }
    if let Ok(n) = text.parse::<i64>() {
        return Expr::Int(n);
    }
    // only text that looks numeric, so `inf` or `nan` stay symbols
    let numeric_start = digits
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_digit() || c == '.');
    match text.parse::<f64>() {
        Ok(v) if numeric_start => Expr::Float(v),
        _ => Expr::Symbol(text.to_string()),
    }
}

/// Read every top-level form in `src`.
pub fn read(src: &str) -> Result<Vec<Expr>> {
    let mut reader = Reader {
        src,
        pos: 0,
        depth: 0,
    };
    let mut forms = Vec::new();
    loop {
        reader.skip_trivia();
        if reader.peek().is_none() {
            return Ok(forms);
        }
        forms.push(reader.form()?);
    }
}

/// Read exactly one form.
pub fn read_one(src: &str) -> Result<Expr> {
    let mut forms = read(src)?;
    match forms.len() {
        1 => Ok(forms.remove(0)),
        0 => Err(Error::syntax(0, "empty expression")),
        n => Err(Error::syntax(0, format!("expected one expression, found {n}"))),
    }
}
