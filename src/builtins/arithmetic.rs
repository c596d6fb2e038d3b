//! Arithmetic operations: +, -, *, /
//!
//! Left folds over at least one argument. Integer operands stay integral;
//! any float operand promotes the rest of the fold to floats. Integer
//! division truncates and rejects a zero divisor.

use crate::env::Env;
use crate::error::{EvalError, ARITY_AT_LEAST_ONE};
use crate::value::Value;
use std::sync::Arc;

#[derive(Clone, Copy)]
enum Op {
    Add,
    Sub,
    Mul,
    Div,
}

fn int_op(op: Op, a: i64, b: i64) -> Result<Value, EvalError> {
    match op {
        Op::Add => Ok(Value::Int(a.wrapping_add(b))),
        Op::Sub => Ok(Value::Int(a.wrapping_sub(b))),
        Op::Mul => Ok(Value::Int(a.wrapping_mul(b))),
        Op::Div => {
            if b == 0 {
                Err(EvalError::DivByZero)
            } else {
                Ok(Value::Int(a.wrapping_div(b)))
            }
        }
    }
}

fn float_op(op: Op, a: f64, b: f64) -> Value {
    Value::Float(match op {
        Op::Add => a + b,
        Op::Sub => a - b,
        Op::Mul => a * b,
        Op::Div => a / b,
    })
}

fn step(name: &str, op: Op, accum: Value, operand: &Value) -> Result<Value, EvalError> {
    match (accum, operand) {
        (Value::Int(a), Value::Int(b)) => int_op(op, a, *b),
        (Value::Int(a), Value::Float(b)) => Ok(float_op(op, a as f64, *b)),
        (Value::Float(a), Value::Int(b)) => Ok(float_op(op, a, *b as f64)),
        (Value::Float(a), Value::Float(b)) => Ok(float_op(op, a, *b)),
        (_, other) => Err(EvalError::type_error(name, "number", other)),
    }
}

fn fold(name: &'static str, op: Op, args: &[Value]) -> Result<Value, EvalError> {
    let mut accum = match args.first() {
        Some(first @ (Value::Int(_) | Value::Float(_))) => first.clone(),
        Some(other) => return Err(EvalError::type_error(name, "number", other)),
        None => return Err(EvalError::arity_error(name, ARITY_AT_LEAST_ONE, 0)),
    };
    for operand in &args[1..] {
        accum = step(name, op, accum, operand)?;
    }
    Ok(accum)
}

pub fn register(env: &Arc<Env>) {
    env.set("+", Value::native("+", |args| fold("+", Op::Add, args)));
    env.set("-", Value::native("-", |args| fold("-", Op::Sub, args)));
    env.set("*", Value::native("*", |args| fold("*", Op::Mul, args)));
    env.set("/", Value::native("/", |args| fold("/", Op::Div, args)));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_fold_stays_integer() {
        let result = fold("+", Op::Add, &[Value::Int(1), Value::Int(2), Value::Int(3)]);
        assert!(matches!(result, Ok(Value::Int(6))));
    }

    #[test]
    fn test_float_operand_promotes() {
        let result = fold("+", Op::Add, &[Value::Int(1), Value::Float(2.0)]);
        assert!(matches!(result, Ok(Value::Float(n)) if n == 3.0));

        let result = fold("*", Op::Mul, &[Value::Float(2.5), Value::Int(2)]);
        assert!(matches!(result, Ok(Value::Float(n)) if n == 5.0));
    }

    #[test]
    fn test_single_argument_is_identity() {
        assert!(matches!(fold("-", Op::Sub, &[Value::Int(5)]), Ok(Value::Int(5))));
    }

    #[test]
    fn test_integer_division_truncates() {
        let result = fold("/", Op::Div, &[Value::Int(7), Value::Int(2)]);
        assert!(matches!(result, Ok(Value::Int(3))));
    }

    #[test]
    fn test_integer_division_by_zero() {
        let result = fold("/", Op::Div, &[Value::Int(1), Value::Int(0)]);
        assert!(matches!(result, Err(EvalError::DivByZero)));
    }

    #[test]
    fn test_non_number_rejected() {
        let result = fold("+", Op::Add, &[Value::Int(1), Value::Str("x".into())]);
        assert!(matches!(result, Err(EvalError::TypeMismatch { .. })));
    }

    #[test]
    fn test_no_arguments_rejected() {
        assert!(matches!(fold("+", Op::Add, &[]), Err(EvalError::Arity { .. })));
    }
}
