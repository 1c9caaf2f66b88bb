//! Expression evaluation against a decoded trace
//!
//! An [`Evaluator`] walks forms with a current time step (`INDEX`). Bare
//! signal names evaluate to the signal's value at that step. `find`,
//! `count` and `reval` temporarily move the index and always restore it.

use std::collections::HashMap;

use wave_trace::Trace;

use crate::builtins;
use crate::reader::{Expr, MAX_DEPTH, read};
use crate::value::Value;
use crate::{Error, Result};

/// Special forms handled by the evaluator rather than as builtins.
pub const SPECIAL_FORMS: &[&str] = &[
    "quote", "if", "do", "let", "define", "set", "and", "&&", "or", "||", "find", "count",
    "reval", "prev", "step",
];

/// Symbols with a fixed meaning at every time step.
pub const RESERVED_SYMBOLS: &[&str] = &["INDEX", "TS", "MAX-INDEX", "SIGNALS", "true", "false", "nil"];

/// Evaluates WAL forms over one trace.
pub struct Evaluator<'t> {
    trace: &'t Trace,
    index: usize,
    scopes: Vec<HashMap<String, Value>>,
    depth: usize,
}

/// Convert a step or timestamp into a WAL integer.
fn int(context: &str, n: impl TryInto<i64>) -> Result<i64> {
    n.try_into().map_err(|_| Error::Overflow(context.to_string()))
}

impl<'t> Evaluator<'t> {
    pub fn new(trace: &'t Trace) -> Self {
        Self {
            trace,
            index: 0,
            scopes: vec![HashMap::new()],
            depth: 0,
        }
    }

    /// The current time step.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Read and evaluate every form in `src`, returning the last result.
    pub fn eval_str(&mut self, src: &str) -> Result<Value> {
        let forms = read(src)?;
        tracing::debug!(forms = forms.len(), "evaluating WAL source");
        self.eval_all(&forms)
    }

    /// Evaluate forms in order; an empty body yields `nil`.
    pub fn eval_all(&mut self, forms: &[Expr]) -> Result<Value> {
        let mut last = Value::Nil;
        for form in forms {
            last = self.eval(form)?;
        }
        Ok(last)
    }

    pub fn eval(&mut self, expr: &Expr) -> Result<Value> {
        match expr {
            Expr::Int(n) => Ok(Value::Int(*n)),
            Expr::Float(v) => Ok(Value::Float(*v)),
            Expr::Str(s) => Ok(Value::Str(s.clone())),
            Expr::Bool(b) => Ok(Value::Bool(*b)),
            Expr::Symbol(name) => self.lookup(name),
            Expr::List(items) => {
                if self.depth >= MAX_DEPTH {
                    return Err(Error::TooDeep(MAX_DEPTH));
                }
                self.depth += 1;
                let result = match items.split_first() {
                    None => Ok(Value::List(Vec::new())),
                    Some((Expr::Symbol(head), args)) => self.call(head, args),
                    Some((head, _)) => Err(Error::NotCallable(head.to_string())),
                };
                self.depth -= 1;
                result
            }
        }
    }

    fn lookup(&self, name: &str) -> Result<Value> {
        if let Some(value) = self.scopes.iter().rev().find_map(|scope| scope.get(name)) {
            return Ok(value.clone());
        }
        match name {
            "INDEX" => Ok(Value::Int(int(name, self.index)?)),
            "TS" => {
                let ts = self
                    .trace
                    .timestamp(self.index)
                    .ok_or_else(|| self.out_of_range(self.index))?;
                Ok(Value::Int(int(name, ts)?))
            }
            "MAX-INDEX" => Ok(Value::Int(int(name, self.trace.len())? - 1)),
            "SIGNALS" => Ok(Value::List(
                self.trace
                    .signal_names()
                    .into_iter()
                    .map(|name| Value::Str(name.to_string()))
                    .collect(),
            )),
            "true" => Ok(Value::Bool(true)),
            "false" => Ok(Value::Bool(false)),
            "nil" => Ok(Value::Nil),
            _ if self.trace.contains(name) => self
                .trace
                .value_at(name, self.index)
                .map(Value::from_signal)
                .ok_or_else(|| self.out_of_range(self.index)),
            _ => Err(Error::UndefinedSymbol(name.to_string())),
        }
    }

    fn out_of_range(&self, index: impl TryInto<i64>) -> Error {
        Error::IndexOutOfRange {
            index: index.try_into().unwrap_or(i64::MAX),
            len: self.trace.len(),
        }
    }

    fn call(&mut self, name: &str, args: &[Expr]) -> Result<Value> {
        match name {
            "quote" => {
                let [quoted] = args else {
                    return Err(Error::arity(name, "1", args.len()));
                };
                Ok(Value::from_quoted(quoted))
            }
            "if" => {
                let (cond, then, otherwise) = match args {
                    [cond, then] => (cond, then, None),
                    [cond, then, otherwise] => (cond, then, Some(otherwise)),
                    _ => return Err(Error::arity(name, "2 or 3", args.len())),
                };
                if self.eval(cond)?.is_truthy() {
                    self.eval(then)
                } else {
                    otherwise.map_or(Ok(Value::Nil), |e| self.eval(e))
                }
            }
            "do" => self.eval_all(args),
            "let" => self.eval_let(args),
            "define" | "set" => {
                let [Expr::Symbol(var), value] = args else {
                    return Err(Error::type_error(name, "expected a symbol and a value"));
                };
                let value = self.eval(value)?;
                self.bind(name == "set", var, value.clone())?;
                Ok(value)
            }
            "and" | "&&" => {
                let mut last = Value::Bool(true);
                for arg in args {
                    last = self.eval(arg)?;
                    if !last.is_truthy() {
                        return Ok(Value::Bool(false));
                    }
                }
                Ok(last)
            }
            "or" | "||" => {
                for arg in args {
                    let value = self.eval(arg)?;
                    if value.is_truthy() {
                        return Ok(value);
                    }
                }
                Ok(Value::Bool(false))
            }
            "find" | "count" => {
                let [cond] = args else {
                    return Err(Error::arity(name, "1", args.len()));
                };
                let hits = self.matching_indices(cond)?;
                if name == "count" {
                    Ok(Value::Int(int(name, hits.len())?))
                } else {
                    Ok(Value::List(hits))
                }
            }
            "reval" => {
                let [expr, offset] = args else {
                    return Err(Error::arity(name, "2", args.len()));
                };
                let offset = self.eval_int(name, offset)?;
                self.eval_relative(expr, offset)
            }
            "prev" => {
                let [expr] = args else {
                    return Err(Error::arity(name, "1", args.len()));
                };
                self.eval_relative(expr, -1)
            }
            "step" => {
                let offset = match args {
                    [] => 1,
                    [offset] => self.eval_int(name, offset)?,
                    _ => return Err(Error::arity(name, "0 or 1", args.len())),
                };
                self.index = self.offset_index(offset)?;
                Ok(Value::Int(int(name, self.index)?))
            }
            _ => {
                let builtin =
                    builtins::lookup(name).ok_or_else(|| Error::UndefinedFunction(name.to_string()))?;
                let values = args
                    .iter()
                    .map(|arg| self.eval(arg))
                    .collect::<Result<Vec<_>>>()?;
                builtin(name, values)
            }
        }
    }

    fn eval_let(&mut self, args: &[Expr]) -> Result<Value> {
        let Some((Expr::List(bindings), body)) = args.split_first() else {
            return Err(Error::type_error("let", "expected a binding list"));
        };
        self.scopes.push(HashMap::new());
        let result = self.let_body(bindings, body);
        self.scopes.pop();
        result
    }

    fn let_body(&mut self, bindings: &[Expr], body: &[Expr]) -> Result<Value> {
        for binding in bindings {
            let Expr::List(pair) = binding else {
                return Err(Error::type_error("let", format!("malformed binding {binding}")));
            };
            let [Expr::Symbol(var), value] = pair.as_slice() else {
                return Err(Error::type_error("let", format!("malformed binding {binding}")));
            };
            let value = self.eval(value)?;
            self.bind(false, var, value)?;
        }
        self.eval_all(body)
    }

    /// `define` binds in the innermost scope, `set` updates an existing
    /// binding wherever it lives.
    fn bind(&mut self, existing: bool, var: &str, value: Value) -> Result<()> {
        if existing {
            let scope = self
                .scopes
                .iter_mut()
                .rev()
                .find(|scope| scope.contains_key(var))
                .ok_or_else(|| Error::UndefinedSymbol(var.to_string()))?;
            scope.insert(var.to_string(), value);
        } else if let Some(scope) = self.scopes.last_mut() {
            scope.insert(var.to_string(), value);
        }
        Ok(())
    }

    fn eval_int(&mut self, function: &str, expr: &Expr) -> Result<i64> {
        match self.eval(expr)? {
            Value::Int(n) => Ok(n),
            other => Err(Error::type_error(
                function,
                format!("expected an integer offset, got {} '{other}'", other.type_name()),
            )),
        }
    }

    fn offset_index(&self, offset: i64) -> Result<usize> {
        let target = int("step", self.index)?.saturating_add(offset);
        usize::try_from(target)
            .ok()
            .filter(|&i| i < self.trace.len())
            .ok_or_else(|| self.out_of_range(target))
    }

    fn eval_relative(&mut self, expr: &Expr, offset: i64) -> Result<Value> {
        let target = self.offset_index(offset)?;
        self.at_index(target, |ev| ev.eval(expr))
    }

    fn matching_indices(&mut self, cond: &Expr) -> Result<Vec<Value>> {
        let mut hits = Vec::new();
        for i in 0..self.trace.len() {
            if self.at_index(i, |ev| ev.eval(cond))?.is_truthy() {
                hits.push(Value::Int(int("find", i)?));
            }
        }
        Ok(hits)
    }

    /// Run `f` with the index moved to `index`, restoring it afterwards
    /// even when `f` fails.
    fn at_index<T>(&mut self, index: usize, f: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        let saved = self.index;
        self.index = index;
        let result = f(self);
        self.index = saved;
        result
    }
}
