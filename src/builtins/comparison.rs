//! Comparison operations: =, !=, <, >, <=, >=
//!
//! `=` and `!=` use structural equality over every variant. The ordering
//! predicates are defined on numbers only, promoting across int and float;
//! any comparison involving NaN is unordered and answers false.

use crate::env::Env;
use crate::error::{EvalError, ARITY_TWO};
use crate::value::Value;
use std::cmp::Ordering;
use std::sync::Arc;

fn compare_numbers(name: &str, a: &Value, b: &Value) -> Result<Option<Ordering>, EvalError> {
    let (x, y) = match (a, b) {
        (Value::Int(x), Value::Int(y)) => return Ok(Some(x.cmp(y))),
        (Value::Int(x), Value::Float(y)) => (*x as f64, *y),
        (Value::Float(x), Value::Int(y)) => (*x, *y as f64),
        (Value::Float(x), Value::Float(y)) => (*x, *y),
        (Value::Int(_) | Value::Float(_), other) => {
            return Err(EvalError::type_error(name, "number", other))
        }
        (other, _) => return Err(EvalError::type_error(name, "number", other)),
    };
    Ok(x.partial_cmp(&y))
}

fn ordering(
    name: &'static str,
    args: &[Value],
    accept: fn(Ordering) -> bool,
) -> Result<Value, EvalError> {
    if args.len() != 2 {
        return Err(EvalError::arity_error(name, ARITY_TWO, args.len()));
    }
    match compare_numbers(name, &args[0], &args[1])? {
        Some(order) => Ok(Value::Bool(accept(order))),
        None => Ok(Value::Bool(false)),
    }
}

fn equal(args: &[Value]) -> Result<Value, EvalError> {
    if args.len() != 2 {
        return Err(EvalError::arity_error("=", ARITY_TWO, args.len()));
    }
    Ok(Value::Bool(Value::equal(&args[0], &args[1])))
}

fn not_equal(args: &[Value]) -> Result<Value, EvalError> {
    if args.len() != 2 {
        return Err(EvalError::arity_error("!=", ARITY_TWO, args.len()));
    }
    Ok(Value::Bool(!Value::equal(&args[0], &args[1])))
}

pub fn register(env: &Arc<Env>) {
    env.set("=", Value::native("=", equal));
    env.set("!=", Value::native("!=", not_equal));
    env.set(
        "<",
        Value::native("<", |args| ordering("<", args, Ordering::is_lt)),
    );
    env.set(
        ">",
        Value::native(">", |args| ordering(">", args, Ordering::is_gt)),
    );
    env.set(
        "<=",
        Value::native("<=", |args| ordering("<=", args, Ordering::is_le)),
    );
    env.set(
        ">=",
        Value::native(">=", |args| ordering(">=", args, Ordering::is_ge)),
    );
}
