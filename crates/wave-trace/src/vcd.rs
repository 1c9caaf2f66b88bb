//! Value Change Dump decoder
//!
//! Decodes the whole file into a [`Trace`]. Header keywords other than
//! `$timescale`, `$scope`, `$upscope`, `$var` and `$enddefinitions` are
//! skipped up to their `$end`.

use std::collections::HashMap;
use std::str::{Lines, SplitWhitespace};

use crate::trace::{Signal, Timescale, Trace};
use crate::{Error, Result, Value};

const UNITS: [&str; 6] = ["s", "ms", "us", "ns", "ps", "fs"];

/// Whitespace-separated tokens tagged with their 1-based line number.
struct Tokens<'a> {
    lines: std::iter::Enumerate<Lines<'a>>,
    words: Option<SplitWhitespace<'a>>,
    line: usize,
}

impl<'a> Tokens<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            lines: text.lines().enumerate(),
            words: None,
            line: 0,
        }
    }

    /// Collect tokens up to the next `$end`, which is consumed.
    fn until_end(&mut self, keyword: &str) -> Result<Vec<&'a str>> {
        let start = self.line;
        let mut body = Vec::new();
        for token in self.by_ref() {
            if token == "$end" {
                return Ok(body);
            }
            body.push(token);
        }
        Err(Error::parse(start, format!("{keyword} is missing its $end")))
    }
}

impl<'a> Iterator for Tokens<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        loop {
            if let Some(word) = self.words.as_mut().and_then(Iterator::next) {
                return Some(word);
            }
            let (n, line) = self.lines.next()?;
            self.line = n + 1;
            self.words = Some(line.split_whitespace());
        }
    }
}

/// Widest vector a `$var` may declare.
pub const MAX_WIDTH: u32 = 1 << 20;

/// Accumulates the trace while the body is decoded.
#[derive(Default)]
struct Builder {
    trace: Trace,
    codes: HashMap<String, usize>,
    slot_widths: Vec<u32>,
    scopes: Vec<String>,
}

impl Builder {
    fn declare(&mut self, line: usize, fields: &[&str]) -> Result<()> {
        let [kind, size, code, reference, ..] = fields else {
            return Err(Error::parse(line, "$var needs a type, size, identifier and name"));
        };
        let width: u32 = size
            .parse()
            .map_err(|_| Error::parse(line, format!("invalid $var size '{size}'")))?;
        if width > MAX_WIDTH {
            return Err(Error::parse(
                line,
                format!("$var size {width} exceeds the supported maximum of {MAX_WIDTH} bits"),
            ));
        }

        let slot = match self.codes.get(*code) {
            Some(&slot) => slot,
            None => {
                let slot = self.trace.waves.len();
                self.trace.waves.push(Vec::new());
                self.slot_widths.push(width);
                self.codes.insert((*code).to_string(), slot);
                slot
            }
        };

        let name = if self.scopes.is_empty() {
            (*reference).to_string()
        } else {
            format!("{}.{}", self.scopes.join("."), reference)
        };
        if self.trace.by_name.contains_key(&name) {
            tracing::debug!(%name, "duplicate $var declaration ignored");
            return Ok(());
        }
        self.trace.by_name.insert(name.clone(), self.trace.signals.len());
        self.trace.signals.push(Signal {
            name,
            width,
            kind: (*kind).to_string(),
            slot,
        });
        Ok(())
    }

    fn timestamp(&mut self, line: usize, time: u64) -> Result<()> {
        match self.trace.timestamps.last() {
            Some(&last) if time < last => Err(Error::parse(
                line,
                format!("timestamp #{time} is earlier than #{last}"),
            )),
            Some(&last) if time == last => Ok(()),
            _ => {
                self.trace.timestamps.push(time);
                Ok(())
            }
        }
    }

    fn change(&mut self, line: usize, code: &str, raw: Change<'_>) -> Result<()> {
        let slot = *self
            .codes
            .get(code)
            .ok_or_else(|| Error::parse(line, format!("unknown identifier code '{code}'")))?;
        if self.trace.timestamps.is_empty() {
            // changes before the first timestamp belong to time 0
            self.trace.timestamps.push(0);
        }
        let index = self.trace.timestamps.len() - 1;
        let value = match raw {
            Change::Bits(bits) => Value::bits(bits, self.slot_widths[slot]),
            Change::Real(v) => Value::Real(v),
        };
        let wave = &mut self.trace.waves[slot];
        match wave.last_mut() {
            Some((last, current)) if *last == index => *current = value,
            _ => wave.push((index, value)),
        }
        Ok(())
    }

    fn finish(mut self) -> Trace {
        if !self.trace.timestamps.is_empty() {
            for wave in &mut self.trace.waves {
                if wave.first().is_none_or(|(i, _)| *i > 0) {
                    wave.insert(0, (0, Value::unknown()));
                }
            }
        }
        self.trace
    }
}

/// Four-state characters plus the nine-value extras some simulators emit.
fn is_state_char(c: char) -> bool {
    matches!(c.to_ascii_lowercase(), '0' | '1' | 'x' | 'z' | 'u' | 'w' | 'l' | 'h' | '-')
}

enum Change<'a> {
    Bits(&'a str),
    Real(f64),
}

fn parse_timescale(line: usize, body: &[&str]) -> Result<Timescale> {
    let joined: String = body.concat();
    let split = joined
        .find(|c: char| !c.is_ascii_digit())
        .ok_or_else(|| Error::parse(line, format!("invalid $timescale '{joined}'")))?;
    let (magnitude, unit) = joined.split_at(split);
    let magnitude: u32 = magnitude
        .parse()
        .map_err(|_| Error::parse(line, format!("invalid $timescale '{joined}'")))?;
    if !matches!(magnitude, 1 | 10 | 100) || !UNITS.contains(&unit) {
        return Err(Error::parse(line, format!("invalid $timescale '{joined}'")));
    }
    Ok(Timescale {
        magnitude,
        unit: unit.to_string(),
    })
}

/// Decode VCD text into a [`Trace`].
pub fn parse(text: &str) -> Result<Trace> {
    let mut tokens = Tokens::new(text);
    let mut builder = Builder::default();

    // header
    loop {
        let Some(token) = tokens.next() else {
            return Err(Error::parse(tokens.line, "missing $enddefinitions"));
        };
        let line = tokens.line;
        match token {
            "$timescale" => {
                let body = tokens.until_end(token)?;
                builder.trace.timescale = Some(parse_timescale(line, &body)?);
            }
            "$scope" => {
                let body = tokens.until_end(token)?;
                let name = body
                    .get(1)
                    .ok_or_else(|| Error::parse(line, "$scope without a name"))?;
                builder.scopes.push((*name).to_string());
            }
            "$upscope" => {
                tokens.until_end(token)?;
                if builder.scopes.pop().is_none() {
                    return Err(Error::parse(line, "$upscope without an open $scope"));
                }
            }
            "$var" => {
                let body = tokens.until_end(token)?;
                builder.declare(line, &body)?;
            }
            "$enddefinitions" => {
                tokens.until_end(token)?;
                break;
            }
            keyword if keyword.starts_with('$') => {
                tokens.until_end(keyword)?;
            }
            other => {
                return Err(Error::parse(line, format!("unexpected '{other}' in header")));
            }
        }
    }

    // value changes
    while let Some(token) = tokens.next() {
        let line = tokens.line;
        let mut chars = token.chars();
        let Some(lead) = chars.next() else { continue };
        let rest = chars.as_str();
        match lead {
            '#' => {
                let time = rest
                    .parse()
                    .map_err(|_| Error::parse(line, format!("invalid timestamp '{token}'")))?;
                builder.timestamp(line, time)?;
            }
            '$' => match token {
                "$dumpvars" | "$dumpall" | "$dumpon" | "$dumpoff" | "$end" => {}
                keyword => {
                    tokens.until_end(keyword)?;
                }
            },
            'b' | 'B' => {
                if !rest.chars().all(is_state_char) {
                    return Err(Error::parse(line, format!("invalid vector value '{token}'")));
                }
                let code = tokens
                    .next()
                    .ok_or_else(|| Error::parse(line, "vector change without identifier"))?;
                builder.change(line, code, Change::Bits(rest))?;
            }
            'r' | 'R' => {
                let value: f64 = rest
                    .parse()
                    .map_err(|_| Error::parse(line, format!("invalid real value '{token}'")))?;
                let code = tokens
                    .next()
                    .ok_or_else(|| Error::parse(line, "real change without identifier"))?;
                builder.change(line, code, Change::Real(value))?;
            }
            lead if is_state_char(lead) => {
                if rest.is_empty() {
                    return Err(Error::parse(line, format!("scalar change '{token}' has no identifier")));
                }
                builder.change(line, rest, Change::Bits(&token[..lead.len_utf8()]))?;
            }
            _ => {
                return Err(Error::parse(line, format!("unexpected '{token}'")));
            }
        }
    }

    let trace = builder.finish();
    tracing::debug!(
        signals = trace.signals().len(),
        steps = trace.len(),
        "decoded VCD"
    );
    Ok(trace)
}
