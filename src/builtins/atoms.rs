//! Atoms: one-slot mutable cells with identity.
//!
//! `swap!` is a compare-and-swap loop: the update function runs outside the
//! lock and the result is installed only if the cell still holds the value
//! that was read, so concurrent swaps never lose updates.

use crate::env::Env;
use crate::error::{EvalError, ARITY_AT_LEAST_TWO, ARITY_ONE, ARITY_TWO};
use crate::eval;
use crate::value::Value;
use std::sync::{Arc, Mutex};

fn cell<'a>(name: &str, value: &'a Value) -> Result<&'a Arc<Mutex<Value>>, EvalError> {
    match value {
        Value::Atom(cell) => Ok(cell),
        other => Err(EvalError::type_error(name, "atom", other)),
    }
}

fn atom(args: &[Value]) -> Result<Value, EvalError> {
    if args.len() != 1 {
        return Err(EvalError::arity_error("atom", ARITY_ONE, args.len()));
    }
    Ok(Value::Atom(Arc::new(Mutex::new(args[0].clone()))))
}

fn deref(args: &[Value]) -> Result<Value, EvalError> {
    if args.len() != 1 {
        return Err(EvalError::arity_error("deref", ARITY_ONE, args.len()));
    }
    Ok(cell("deref", &args[0])?.lock().unwrap().clone())
}

fn reset_bang(args: &[Value]) -> Result<Value, EvalError> {
    if args.len() != 2 {
        return Err(EvalError::arity_error("reset!", ARITY_TWO, args.len()));
    }
    *cell("reset!", &args[0])?.lock().unwrap() = args[1].clone();
    Ok(args[1].clone())
}

fn swap_bang(args: &[Value]) -> Result<Value, EvalError> {
    if args.len() < 2 {
        return Err(EvalError::arity_error("swap!", ARITY_AT_LEAST_TWO, args.len()));
    }
    let cell = cell("swap!", &args[0])?;
    loop {
        let snapshot = cell.lock().unwrap().clone();
        let mut call_args = Vec::with_capacity(args.len() - 1);
        call_args.push(snapshot.clone());
        call_args.extend_from_slice(&args[2..]);
        let result = eval::apply(&args[1], call_args)?;

        let mut guard = cell.lock().unwrap();
        if Value::equal(&guard, &snapshot) {
            *guard = result.clone();
            return Ok(result);
        }
    }
}

pub fn register(env: &Arc<Env>) {
    env.set("atom", Value::native("atom", atom));
    env.set(
        "atom?",
        Value::native("atom?", |args| {
            Ok(Value::Bool(matches!(args.first(), Some(Value::Atom(_)))))
        }),
    );
    env.set("deref", Value::native("deref", deref));
    env.set("reset!", Value::native("reset!", reset_bang));
    env.set("swap!", Value::native("swap!", swap_bang));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_atom_deref_reset() {
        let a = atom(&[Value::Int(1)]).unwrap();
        assert!(matches!(deref(std::slice::from_ref(&a)), Ok(Value::Int(1))));
        assert!(matches!(
            reset_bang(&[a.clone(), Value::Int(2)]),
            Ok(Value::Int(2))
        ));
        assert!(matches!(deref(&[a]), Ok(Value::Int(2))));
    }

    #[test]
    fn test_swap_passes_extra_args() {
        let a = atom(&[Value::Int(10)]).unwrap();
        let add = Value::native("+", |args: &[Value]| {
            match (&args[0], &args[1]) {
                (Value::Int(x), Value::Int(y)) => Ok(Value::Int(x + y)),
                _ => unreachable!(),
            }
        });
        let result = swap_bang(&[a.clone(), add, Value::Int(5)]).unwrap();
        assert!(matches!(result, Value::Int(15)));
        assert!(matches!(deref(&[a]), Ok(Value::Int(15))));
    }
}
