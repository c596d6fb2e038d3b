//! User-raised errors.

use crate::env::Env;
use crate::error::{EvalError, ARITY_ONE};
use crate::value::Value;
use std::sync::Arc;

/// Raise an arbitrary value; it propagates until a `try`/`catch` binds it.
fn throw(args: &[Value]) -> Result<Value, EvalError> {
    if args.len() != 1 {
        return Err(EvalError::arity_error("throw", ARITY_ONE, args.len()));
    }
    Err(EvalError::Raised(args[0].clone()))
}

pub fn register(env: &Arc<Env>) {
    env.set("throw", Value::native("throw", throw));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_throw_carries_payload() {
        match throw(&[Value::Int(42)]) {
            Err(EvalError::Raised(Value::Int(42))) => {}
            other => panic!("expected raised 42, got {:?}", other),
        }
    }
}
