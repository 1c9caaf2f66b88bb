//! Pure builtin functions
//!
//! Every builtin receives its already-evaluated arguments. Forms that need
//! the evaluator itself (`find`, `step`, `let`, ...) live in `eval`.

use std::cmp::Ordering;

use crate::value::{Number, Value};
use crate::{Error, Result};

pub(crate) type Builtin = fn(&str, Vec<Value>) -> Result<Value>;

/// Names of all builtin functions, for help text and suggestions.
pub const NAMES: &[&str] = &[
    "+", "-", "*", "/", "**", "=", "!=", "<", ">", "<=", ">=", "not", "!", "length", "list",
    "first", "last", "nth", "sum", "min", "max", "abs",
];

pub(crate) fn lookup(name: &str) -> Option<Builtin> {
    let builtin: Builtin = match name {
        "+" => add,
        "-" => sub,
        "*" => mul,
        "/" => div,
        "**" => pow,
        "=" => eq,
        "!=" => ne,
        "<" | ">" | "<=" | ">=" => compare,
        "not" | "!" => not,
        "length" => length,
        "list" => list,
        "first" | "last" => first_last,
        "nth" => nth,
        "sum" => sum,
        "min" | "max" => min_max,
        "abs" => abs,
        _ => return None,
    };
    Some(builtin)
}

fn expect_args(name: &str, args: &[Value], expected: usize) -> Result<()> {
    if args.len() != expected {
        return Err(Error::arity(name, &expected.to_string(), args.len()));
    }
    Ok(())
}

fn numbers(name: &str, args: &[Value]) -> Result<Vec<Number>> {
    args.iter()
        .map(|v| {
            v.number().ok_or_else(|| {
                Error::type_error(name, format!("expected numbers, got {} '{v}'", v.type_name()))
            })
        })
        .collect()
}

fn list_arg<'a>(name: &str, value: &'a Value) -> Result<&'a [Value]> {
    value
        .as_list()
        .ok_or_else(|| Error::type_error(name, "argument must be a list"))
}

fn fold(
    name: &str,
    nums: Vec<Number>,
    int_op: fn(i64, i64) -> Option<i64>,
    float_op: fn(f64, f64) -> f64,
) -> Result<Value> {
    let mut iter = nums.into_iter();
    let Some(mut acc) = iter.next() else {
        return Err(Error::arity(name, "at least 1", 0));
    };
    for n in iter {
        acc = match (acc, n) {
            (Number::Int(a), Number::Int(b)) => {
                Number::Int(int_op(a, b).ok_or_else(|| Error::Overflow(name.to_string()))?)
            }
            (a, b) => Number::Float(float_op(a.as_f64(), b.as_f64())),
        };
    }
    Ok(acc.into())
}

fn add(name: &str, args: Vec<Value>) -> Result<Value> {
    if args.is_empty() {
        return Ok(Value::Int(0));
    }
    fold(name, numbers(name, &args)?, i64::checked_add, |a, b| a + b)
}

fn sub(name: &str, args: Vec<Value>) -> Result<Value> {
    let nums = numbers(name, &args)?;
    match nums.as_slice() {
        [] => Err(Error::arity(name, "at least 1", 0)),
        [Number::Int(n)] => n
            .checked_neg()
            .map(Value::Int)
            .ok_or_else(|| Error::Overflow(name.to_string())),
        [Number::Float(v)] => Ok(Value::Float(-v)),
        _ => fold(name, nums, i64::checked_sub, |a, b| a - b),
    }
}

fn mul(name: &str, args: Vec<Value>) -> Result<Value> {
    if args.is_empty() {
        return Ok(Value::Int(1));
    }
    fold(name, numbers(name, &args)?, i64::checked_mul, |a, b| a * b)
}

/// Integer division stays integral when exact, otherwise yields a float.
fn div(name: &str, args: Vec<Value>) -> Result<Value> {
    let nums = numbers(name, &args)?;
    let mut iter = nums.into_iter();
    let Some(first) = iter.next() else {
        return Err(Error::arity(name, "at least 1", 0));
    };
    let rest: Vec<Number> = iter.collect();
    let (mut acc, rest) = if rest.is_empty() {
        (Number::Int(1), vec![first])
    } else {
        (first, rest)
    };
    for n in rest {
        acc = match (acc, n) {
            (_, Number::Int(0)) => return Err(Error::DivisionByZero),
            (_, Number::Float(b)) if b == 0.0 => return Err(Error::DivisionByZero),
            (Number::Int(a), Number::Int(b)) if a.checked_rem(b) == Some(0) => Number::Int(
                a.checked_div(b)
                    .ok_or_else(|| Error::Overflow(name.to_string()))?,
            ),
            (a, b) => Number::Float(a.as_f64() / b.as_f64()),
        };
    }
    Ok(acc.into())
}

fn pow(name: &str, args: Vec<Value>) -> Result<Value> {
    expect_args(name, &args, 2)?;
    let nums = numbers(name, &args)?;
    match (nums[0], nums[1]) {
        (Number::Int(base), Number::Int(exp)) if exp >= 0 => u32::try_from(exp)
            .ok()
            .and_then(|exp| base.checked_pow(exp))
            .map(Value::Int)
            .ok_or_else(|| Error::Overflow(name.to_string())),
        (base, exp) => Ok(Value::Float(base.as_f64().powf(exp.as_f64()))),
    }
}

fn eq(name: &str, args: Vec<Value>) -> Result<Value> {
    if args.is_empty() {
        return Err(Error::arity(name, "at least 1", 0));
    }
    Ok(Value::Bool(args.windows(2).all(|w| w[0].wal_eq(&w[1]))))
}

fn ne(name: &str, args: Vec<Value>) -> Result<Value> {
    expect_args(name, &args, 2)?;
    Ok(Value::Bool(!args[0].wal_eq(&args[1])))
}

/// Ordering of two values: numbers numerically, strings lexically.
/// Mixed or unknown (`x`) operands are unordered.
fn order(a: &Value, b: &Value) -> Option<Ordering> {
    match (a.number(), b.number()) {
        (Some(x), Some(y)) => x.cmp_with(y),
        _ => match (a, b) {
            (Value::Str(x), Value::Str(y)) => Some(x.cmp(y)),
            _ => None,
        },
    }
}

fn compare(name: &str, args: Vec<Value>) -> Result<Value> {
    if args.len() < 2 {
        return Err(Error::arity(name, "at least 2", args.len()));
    }
    let holds = |o: Ordering| match name {
        "<" => o == Ordering::Less,
        ">" => o == Ordering::Greater,
        "<=" => o != Ordering::Greater,
        _ => o != Ordering::Less,
    };
    Ok(Value::Bool(
        args.windows(2)
            .all(|w| order(&w[0], &w[1]).is_some_and(holds)),
    ))
}

fn not(name: &str, args: Vec<Value>) -> Result<Value> {
    expect_args(name, &args, 1)?;
    Ok(Value::Bool(!args[0].is_truthy()))
}

fn length(name: &str, args: Vec<Value>) -> Result<Value> {
    expect_args(name, &args, 1)?;
    let len = match &args[0] {
        Value::Str(s) => s.chars().count(),
        other => list_arg(name, other)?.len(),
    };
    let len = i64::try_from(len).map_err(|_| Error::Overflow(name.to_string()))?;
    Ok(Value::Int(len))
}

fn list(_: &str, args: Vec<Value>) -> Result<Value> {
    Ok(Value::List(args))
}

fn first_last(name: &str, args: Vec<Value>) -> Result<Value> {
    expect_args(name, &args, 1)?;
    let items = list_arg(name, &args[0])?;
    let item = if name == "first" {
        items.first()
    } else {
        items.last()
    };
    Ok(item.cloned().unwrap_or(Value::Nil))
}

fn nth(name: &str, args: Vec<Value>) -> Result<Value> {
    expect_args(name, &args, 2)?;
    let Value::Int(n) = args[0] else {
        return Err(Error::type_error(name, "index must be an integer"));
    };
    let items = list_arg(name, &args[1])?;
    usize::try_from(n)
        .ok()
        .and_then(|i| items.get(i))
        .cloned()
        .ok_or_else(|| {
            Error::type_error(name, format!("index {n} out of bounds for {} items", items.len()))
        })
}

fn sum(name: &str, args: Vec<Value>) -> Result<Value> {
    expect_args(name, &args, 1)?;
    let items = list_arg(name, &args[0])?;
    add(name, items.to_vec())
}

fn min_max(name: &str, args: Vec<Value>) -> Result<Value> {
    let items = match args.as_slice() {
        [Value::List(items)] => items.clone(),
        _ => args,
    };
    let nums = numbers(name, &items)?;
    let pick = |a: Number, b: Number| {
        let ord = b.cmp_with(a);
        let better = if name == "min" {
            ord == Some(Ordering::Less)
        } else {
            ord == Some(Ordering::Greater)
        };
        if better { b } else { a }
    };
    nums.into_iter()
        .reduce(pick)
        .map(Value::from)
        .ok_or_else(|| Error::arity(name, "at least 1", 0))
}

fn abs(name: &str, args: Vec<Value>) -> Result<Value> {
    expect_args(name, &args, 1)?;
    match numbers(name, &args)?[0] {
        Number::Int(n) => n
            .checked_abs()
            .map(Value::Int)
            .ok_or_else(|| Error::Overflow(name.to_string())),
        Number::Float(v) => Ok(Value::Float(v.abs())),
    }
}
